use thiserror::Error;

/// Failure taxonomy for the commitment and proof pipeline. Every fallible
/// operation surfaces one of these; there is no local recovery.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid board: {0}")]
    BoardInvalid(&'static str),

    #[error("row/col out of range")]
    CoordinateOutOfRange,

    #[error("missing or invalid salt in secret")]
    SaltMissingOrMalformed,

    /// Path/dir length disagrees with the tree depth. Indicates a corrupted
    /// secret bundle, not bad caller input.
    #[error("bad path length")]
    BadPathLength,

    #[error("merkle build: {0}")]
    MerkleBuild(&'static str),

    #[error("leaf index out of range")]
    LeafIndexOutOfRange,

    #[error("invalid field element encoding: {0}")]
    FieldEncoding(String),

    #[error("key io: {0}")]
    KeyIo(#[from] std::io::Error),

    #[error("cannot decode key material: {0}")]
    KeyDeserialization(String),

    #[error("proof generation failed: {0}")]
    ProofGeneration(String),

    #[error("cannot decode proof: {0}")]
    ProofDeserialization(String),

    #[error("proof payload missing public root")]
    MissingPublicRoot,

    #[error("root mismatch: proof root != trusted root")]
    RootMismatch,

    #[error("invalid hit public output")]
    HitOutOfRange,
}
