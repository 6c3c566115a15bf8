//! MiMC over the BN254 scalar field, used both for Merkle leaves/nodes and
//! for the salted-root wrapper.
//!
//! The permutation is the classic `x -> (x + k + c_i)^5` round function with
//! 110 rounds, turned into a one-way compression with Miyaguchi-Preneel:
//! `h' = E_h(m) + m + h`. Hashing absorbs field elements one at a time from
//! a zero state. The circuit gadget in [`crate::shot_circuit`] replays the
//! exact same schedule over the same constants; the two sides must never
//! diverge, or every proof binds to a different root than the committer
//! published.

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField, Zero};
use sha3::{Digest, Keccak256};
use std::sync::OnceLock;

/// Number of rounds of the MiMC permutation.
pub const MIMC_ROUNDS: usize = 110;

/// Seed string for the round-constant chain.
const CONSTANTS_SEED: &[u8] = b"mimc-bn254-battleship";

static ROUND_CONSTANTS: OnceLock<Vec<Fr>> = OnceLock::new();
static PAD_LEAF: OnceLock<Fr> = OnceLock::new();

/// Round constants, derived once by iterating Keccak-256 from a fixed seed
/// and reducing each digest into the field.
pub fn round_constants() -> &'static [Fr] {
    ROUND_CONSTANTS.get_or_init(|| {
        let mut digest: [u8; 32] = Keccak256::digest(CONSTANTS_SEED).into();
        let mut constants = Vec::with_capacity(MIMC_ROUNDS);
        for _ in 0..MIMC_ROUNDS {
            digest = Keccak256::digest(digest).into();
            constants.push(Fr::from_be_bytes_mod_order(&digest));
        }
        constants
    })
}

/// MiMC block encryption of `message` under `key`.
fn encrypt(message: Fr, key: Fr) -> Fr {
    let mut x = message;
    for c in round_constants() {
        x = (x + key + c).pow([5u64]);
    }
    x + key
}

/// Absorb `elems` in order into a fresh sponge state and squeeze one element.
pub fn hash(elems: &[Fr]) -> Fr {
    let mut state = Fr::zero();
    for &m in elems {
        state = encrypt(m, state) + m + state;
    }
    state
}

/// Leaf hash of a single board cell. The bit is interpreted as 0 or 1 in the
/// field before absorption.
pub fn hash_leaf(bit: u8) -> Fr {
    hash(&[Fr::from(bit)])
}

/// 2-to-1 node hash. Absorption order (left, then right) is part of the
/// commitment contract.
pub fn hash_node(left: Fr, right: Fr) -> Fr {
    hash(&[left, right])
}

/// The padding leaf `H_leaf(0)`, computed once. Slots 100..128 of the leaf
/// vector all carry this value.
pub fn pad_leaf() -> Fr {
    *PAD_LEAF.get_or_init(|| hash_leaf(0))
}
