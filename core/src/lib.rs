//! Zero-knowledge battleship core.
//!
//! A defender commits to a hidden 10x10 board with a single salted Merkle
//! root, then answers every shot with a Groth16 proof that the claimed
//! HIT/MISS is the committed bit at the claimed coordinate. Nothing else
//! about the board leaks; the tree root itself never leaves the defender.
//!
//! The public surface is the defender service in [`service`]: commit a
//! board, answer a shot, verify an answer against a trusted root. Everything
//! underneath (MiMC, the fixed tree, the circuit, key management) is exposed
//! for tests and for callers that need the primitives directly.

pub mod board;
pub mod codec;
pub mod error;
pub mod merkle;
pub mod mimc;
pub mod prover;
pub mod service;
pub mod shot_circuit;

/// Scalar field of BN254; every hash and commitment lives here.
pub use ark_bn254::Fr;

pub use board::{Board, Direction, Fleet, Position, Ship, ShipClass};
pub use codec::{fe_from_hex, fe_to_hex, Secret, ShotProofPayload};
pub use error::Error;
pub use merkle::FixedTree;
pub use prover::ShotPublic;
#[cfg(feature = "rand")]
pub use service::init_board;
pub use service::{commit, shoot, verify_with_root, CommitResult, ShootResult, VerifyResult};

/// Side length of the grid.
pub const BOARD_SIZE: usize = 10;

/// Ship cells on a valid board: the standard fleet 5+4+3+3+2.
pub const SHIP_CELLS: usize = 17;

/// Depth of the fixed Merkle tree.
pub const MERKLE_DEPTH: usize = 7;

/// Leaf slots: next power of two above the 100 board cells.
pub const NUM_LEAVES: usize = 1 << MERKLE_DEPTH;
