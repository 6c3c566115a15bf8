//! Groth16 lifecycle for the shot circuit: one-time trusted setup with
//! persisted keys, per-shot proving, and verification.
//!
//! Keys live as two compressed blobs, `shot.pk` and `shot.vk`, in a
//! caller-chosen directory. If both exist and parse they are reused;
//! anything else triggers a fresh setup. Setup is compute-heavy and must
//! stay off the hot path; concurrent first-time setup across processes
//! sharing a directory is the caller's hazard to serialize.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, Proof, ProvingKey, VerifyingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_snark::SNARK;
use ark_std::rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::mimc;
use crate::shot_circuit::ShotCircuit;
use crate::MERKLE_DEPTH;

pub const PK_FILE: &str = "shot.pk";
pub const VK_FILE: &str = "shot.vk";

/// Public outputs carried alongside the proof bytes. `root` is the salted
/// root the proof is bound to; it may be absent on the wire (sanitizing
/// transports), in which case the verifier restores it from the trusted
/// root before checking anything.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotPublic {
    #[serde(
        with = "crate::codec::fr_opt_dec",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub root: Option<Fr>,
    pub hit: u8,
    pub row: u8,
    pub col: u8,
}

/// Make sure proving/verifying keys exist in `dir`, running the trusted
/// setup if either file is missing or unparseable. Idempotent: a second
/// call with intact files touches nothing.
pub fn ensure_keys<R: RngCore + CryptoRng>(dir: &Path, rng: &mut R) -> Result<(), Error> {
    fs::create_dir_all(dir)?;
    let pk_path = dir.join(PK_FILE);
    let vk_path = dir.join(VK_FILE);

    if load_pk(&pk_path).is_ok() && load_vk(&vk_path).is_ok() {
        tracing::debug!(dir = %dir.display(), "reusing shot circuit keys");
        return Ok(());
    }

    tracing::info!(dir = %dir.display(), "running trusted setup for the shot circuit");
    let (pk, vk) = Groth16::<Bn254>::circuit_specific_setup(ShotCircuit::default(), rng)
        .map_err(|e| Error::ProofGeneration(e.to_string()))?;

    write_key(&pk_path, &pk)?;
    write_key(&vk_path, &vk)?;
    tracing::info!(dir = %dir.display(), "wrote {PK_FILE} and {VK_FILE}");
    Ok(())
}

/// Prove one shot. `tree_root` is the unsalted root; the public salted root
/// is recomputed here from the salt rather than trusted from the caller.
#[allow(clippy::too_many_arguments)]
pub fn prove_shot<R: RngCore + CryptoRng>(
    keys_dir: &Path,
    bit: u8,
    idx: usize,
    path: &[Fr],
    dir: &[bool],
    tree_root: Fr,
    salt: Fr,
    rng: &mut R,
) -> Result<(Vec<u8>, ShotPublic), Error> {
    if path.len() != MERKLE_DEPTH || dir.len() != MERKLE_DEPTH {
        return Err(Error::BadPathLength);
    }

    let salted_root = mimc::hash_node(salt, tree_root);
    let row = (idx / 10) as u8;
    let col = (idx % 10) as u8;

    let public = ShotPublic {
        root: Some(salted_root),
        hit: bit,
        row,
        col,
    };

    let circuit = ShotCircuit {
        bit: Some(bit == 1),
        path: Some(path.try_into().map_err(|_| Error::BadPathLength)?),
        dir: Some(dir.try_into().map_err(|_| Error::BadPathLength)?),
        salt: Some(salt),
        root: Some(salted_root),
        hit: Some(bit == 1),
        row: Some(row),
        col: Some(col),
    };

    let pk = load_pk(&keys_dir.join(PK_FILE))?;
    tracing::debug!(row, col, "generating shot proof");
    let proof = Groth16::<Bn254>::prove(&pk, circuit, rng)
        .map_err(|e| Error::ProofGeneration(e.to_string()))?;

    let mut bytes = Vec::new();
    proof
        .serialize_compressed(&mut bytes)
        .map_err(|e| Error::ProofGeneration(e.to_string()))?;
    Ok((bytes, public))
}

/// Verify a shot proof against the trusted salted root.
///
/// The root binding is checked before any cryptography: a payload whose
/// public root differs from `trusted_root` proves an opening of some other
/// commitment and is rejected outright. Cryptographic rejection and
/// verifier-internal failures both come back as `Ok(false)`; neither is
/// distinguished for the caller beyond "do not trust this answer".
pub fn verify_shot(
    vk_path: &Path,
    proof_bytes: &[u8],
    public: &ShotPublic,
    trusted_root: Fr,
) -> Result<bool, Error> {
    let root = public.root.ok_or(Error::MissingPublicRoot)?;
    if root != trusted_root {
        return Err(Error::RootMismatch);
    }

    let proof = Proof::<Bn254>::deserialize_compressed(proof_bytes)
        .map_err(|e| Error::ProofDeserialization(e.to_string()))?;
    let vk = load_vk(vk_path)?;

    let inputs = [
        root,
        Fr::from(public.hit),
        Fr::from(public.row),
        Fr::from(public.col),
    ];
    match Groth16::<Bn254>::verify(&vk, &inputs, &proof) {
        Ok(accepted) => Ok(accepted),
        Err(e) => {
            tracing::debug!(error = %e, "verifier rejected proof");
            Ok(false)
        }
    }
}

pub fn load_vk(path: &Path) -> Result<VerifyingKey<Bn254>, Error> {
    let file = BufReader::new(File::open(path)?);
    VerifyingKey::deserialize_compressed(file).map_err(key_err)
}

fn load_pk(path: &Path) -> Result<ProvingKey<Bn254>, Error> {
    let file = BufReader::new(File::open(path)?);
    ProvingKey::deserialize_compressed(file).map_err(key_err)
}

fn write_key<T: CanonicalSerialize>(path: &Path, key: &T) -> Result<(), Error> {
    let mut file = BufWriter::new(File::create(path)?);
    key.serialize_compressed(&mut file).map_err(key_err)?;
    file.flush()?;
    Ok(())
}

fn key_err(e: SerializationError) -> Error {
    match e {
        SerializationError::IoError(io) => Error::KeyIo(io),
        other => Error::KeyDeserialization(other.to_string()),
    }
}
