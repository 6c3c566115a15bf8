//! Defender-side façade over the whole pipeline. Every operation takes
//! plain values and returns plain values; entropy is always injected so
//! callers (and tests) control determinism.

use std::path::Path;

use ark_bn254::Fr;
use ark_ff::{PrimeField, Zero};
use ark_std::rand::{CryptoRng, RngCore};

use crate::board::Board;
use crate::codec::{self, Secret, ShotProofPayload};
use crate::error::Error;
use crate::merkle::FixedTree;
use crate::mimc;
use crate::prover;
use crate::{BOARD_SIZE, NUM_LEAVES};

pub struct CommitResult {
    /// The salted root, `0x`-hex. The only value the defender publishes.
    pub root_hex: String,
    pub secret: Secret,
}

pub struct ShootResult {
    pub payload: ShotProofPayload,
    /// Redundant with `payload.public.hit`; kept for callers that only want
    /// the outcome.
    pub bit: u8,
}

pub struct VerifyResult {
    pub valid: bool,
    pub hit: u8,
}

/// Place the standard fleet at random and return the resulting bit grid.
#[cfg(feature = "rand")]
pub fn init_board<R: rand::Rng>(rng: &mut R) -> Board {
    rng.gen::<crate::board::Fleet>().to_board()
}

/// Commit to a board: validate, build the tree, sample a salt, publish the
/// salted root, and make sure proof keys exist.
pub fn commit<R: RngCore + CryptoRng>(
    board: &Board,
    keys_dir: &Path,
    rng: &mut R,
) -> Result<CommitResult, Error> {
    board.validate()?;

    let tree = FixedTree::build(&board.flatten(), NUM_LEAVES, mimc::pad_leaf())?;
    let tree_root = tree.root();

    // 256 fresh bits reduced into the field; the reduction keeps the salt
    // uniform up to negligible bias.
    let mut salt_bytes = [0u8; 32];
    rng.fill_bytes(&mut salt_bytes);
    let salt = Fr::from_be_bytes_mod_order(&salt_bytes);
    let salted_root = mimc::hash_node(salt, tree_root);

    prover::ensure_keys(keys_dir, rng)?;

    tracing::info!(root = %codec::fe_to_hex(&salted_root), "board committed");
    let secret = Secret {
        board: board.clone(),
        tree,
        salt_hex: codec::fe_to_hex(&salt),
    };
    Ok(CommitResult {
        root_hex: codec::fe_to_hex(&salted_root),
        secret,
    })
}

/// Answer a shot at (row, col) with a proof bound to the committed root.
pub fn shoot<R: RngCore + CryptoRng>(
    secret: &Secret,
    keys_dir: &Path,
    row: u8,
    col: u8,
    rng: &mut R,
) -> Result<ShootResult, Error> {
    if row as usize >= BOARD_SIZE || col as usize >= BOARD_SIZE {
        return Err(Error::CoordinateOutOfRange);
    }
    let salt = secret.salt()?;

    let idx = row as usize * BOARD_SIZE + col as usize;
    let bit = secret.board.bit(row, col);
    let (path, dir) = secret.tree.path(idx)?;

    let (proof, public) = prover::prove_shot(
        keys_dir,
        bit,
        idx,
        &path,
        &dir,
        secret.tree.root(),
        salt,
        rng,
    )?;

    Ok(ShootResult {
        payload: ShotProofPayload { proof, public },
        bit,
    })
}

/// Verify a shot payload against a trusted salted root.
///
/// Transport layers sometimes strip or zero the numeric root field; a
/// missing or zero public root is restored from `trusted_root` before the
/// binding check, so such payloads still verify against exactly the root
/// the caller trusts and nothing else.
pub fn verify_with_root(
    vk_path: &Path,
    trusted_root: Fr,
    mut payload: ShotProofPayload,
) -> Result<VerifyResult, Error> {
    match payload.public.root {
        Some(r) if !r.is_zero() => {}
        _ => payload.public.root = Some(trusted_root),
    }

    let valid = prover::verify_shot(vk_path, &payload.proof, &payload.public, trusted_root)?;
    if payload.public.hit > 1 {
        return Err(Error::HitOutOfRange);
    }
    Ok(VerifyResult {
        valid,
        hit: payload.public.hit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Direction, Fleet, Ship, ShipClass};
    use crate::prover::ShotPublic;
    use rand::{rngs::StdRng, SeedableRng};
    use std::path::PathBuf;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(0)
    }

    fn sample_board() -> Board {
        Fleet {
            ships: vec![
                Ship::new(ShipClass::Carrier, (3, 2), Direction::Vertical),
                Ship::new(ShipClass::Battleship, (1, 3), Direction::Horizontal),
                Ship::new(ShipClass::Cruiser, (7, 4), Direction::Vertical),
                Ship::new(ShipClass::Submarine, (5, 7), Direction::Horizontal),
                Ship::new(ShipClass::Destroyer, (7, 7), Direction::Horizontal),
            ],
        }
        .to_board()
    }

    fn sample_secret() -> Secret {
        let board = sample_board();
        let tree = FixedTree::build(&board.flatten(), NUM_LEAVES, mimc::pad_leaf()).unwrap();
        Secret {
            board,
            tree,
            salt_hex: "0xabc123".into(),
        }
    }

    fn nowhere() -> PathBuf {
        PathBuf::from("/nonexistent/battleship-keys")
    }

    #[test]
    #[cfg(feature = "rand")]
    fn init_board_is_committable() {
        for _ in 0..10 {
            let board = init_board(&mut rand::thread_rng());
            board.validate().unwrap();
        }
    }

    #[test]
    fn commit_rejects_invalid_board_before_any_io() {
        let board = Board::default();
        let err = commit(&board, &nowhere(), &mut test_rng());
        assert!(matches!(err, Err(Error::BoardInvalid(_))));
    }

    #[test]
    fn shoot_rejects_out_of_range_before_any_crypto() {
        let secret = sample_secret();
        let err = shoot(&secret, &nowhere(), 10, 0, &mut test_rng());
        assert!(matches!(err, Err(Error::CoordinateOutOfRange)));
        let err = shoot(&secret, &nowhere(), 0, 10, &mut test_rng());
        assert!(matches!(err, Err(Error::CoordinateOutOfRange)));
    }

    #[test]
    fn shoot_rejects_malformed_salt() {
        let mut secret = sample_secret();
        secret.salt_hex = "abc123".into(); // no 0x prefix
        let err = shoot(&secret, &nowhere(), 0, 0, &mut test_rng());
        assert!(matches!(err, Err(Error::SaltMissingOrMalformed)));

        secret.salt_hex.clear();
        let err = shoot(&secret, &nowhere(), 0, 0, &mut test_rng());
        assert!(matches!(err, Err(Error::SaltMissingOrMalformed)));
    }

    #[test]
    fn verify_rejects_root_mismatch_before_deserializing() {
        let payload = ShotProofPayload {
            proof: vec![],
            public: ShotPublic {
                root: Some(Fr::from(1u64)),
                hit: 0,
                row: 0,
                col: 0,
            },
        };
        let err = verify_with_root(&nowhere().join("shot.vk"), Fr::from(2u64), payload);
        assert!(matches!(err, Err(Error::RootMismatch)));
    }

    #[test]
    fn verify_injects_trusted_root_into_sanitized_payload() {
        // Root stripped by transport: injection must get us past the
        // presence and binding checks, down to proof deserialization.
        for root in [None, Some(Fr::zero())] {
            let payload = ShotProofPayload {
                proof: vec![],
                public: ShotPublic {
                    root,
                    hit: 0,
                    row: 0,
                    col: 0,
                },
            };
            let err = verify_with_root(&nowhere().join("shot.vk"), Fr::from(9u64), payload);
            assert!(matches!(err, Err(Error::ProofDeserialization(_))));
        }
    }
}
