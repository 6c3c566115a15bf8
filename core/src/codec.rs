//! Wire and persistence types: the defender's secret bundle, the shot proof
//! payload, and the field-element encodings used across trust boundaries.
//!
//! Salted roots and salts travel as `0x`-prefixed lowercase hex (minimal
//! width, uppercase accepted on input). Field elements inside JSON travel as
//! decimal strings; proof bytes inside JSON travel as standard base64.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::Error;
use crate::merkle::FixedTree;
use crate::prover::ShotPublic;

/// The defender's private state, written by `commit` and read by every
/// `shoot`. Never crosses the trust boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Secret {
    pub board: Board,
    pub tree: FixedTree,
    #[serde(rename = "saltHex")]
    pub salt_hex: String,
}

impl Secret {
    /// Parse the commitment salt out of the bundle.
    pub fn salt(&self) -> Result<Fr, Error> {
        if self.salt_hex.is_empty() {
            return Err(Error::SaltMissingOrMalformed);
        }
        fe_from_hex(&self.salt_hex).map_err(|_| Error::SaltMissingOrMalformed)
    }
}

/// What `shoot` produces and `verify` consumes: opaque proof bytes plus the
/// public outputs they are bound to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShotProofPayload {
    #[serde(with = "base64_bytes")]
    pub proof: Vec<u8>,
    pub public: ShotPublic,
}

/// Encode a field element as `0x`-prefixed minimal-width lowercase hex.
pub fn fe_to_hex(x: &Fr) -> String {
    format!("0x{:x}", fe_to_biguint(x))
}

/// Decode a `0x`-prefixed hex field element. Uppercase digits are accepted;
/// values at or above the field order reduce modulo the order.
pub fn fe_from_hex(s: &str) -> Result<Fr, Error> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| Error::FieldEncoding(format!("missing 0x prefix: {s:?}")))?;
    if digits.is_empty() {
        return Err(Error::FieldEncoding("empty hex value".into()));
    }
    let n = BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| Error::FieldEncoding(format!("invalid hex value: {s:?}")))?;
    Ok(biguint_to_fe(&n))
}

/// Encode a field element as a decimal string.
pub fn fe_to_dec(x: &Fr) -> String {
    fe_to_biguint(x).to_str_radix(10)
}

/// Decode a decimal-string field element, reducing modulo the field order.
pub fn fe_from_dec(s: &str) -> Result<Fr, Error> {
    let n = BigUint::parse_bytes(s.as_bytes(), 10)
        .ok_or_else(|| Error::FieldEncoding(format!("invalid decimal value: {s:?}")))?;
    Ok(biguint_to_fe(&n))
}

fn fe_to_biguint(x: &Fr) -> BigUint {
    BigUint::from_bytes_be(&x.into_bigint().to_bytes_be())
}

fn biguint_to_fe(n: &BigUint) -> Fr {
    Fr::from_be_bytes_mod_order(&n.to_bytes_be())
}

/// Serde adapter: `Vec<u8>` as standard base64.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `Option<Fr>` as an optional decimal string. JSON lacks
/// arbitrary-precision integers, and some transports strip numeric fields
/// entirely, so absence must survive a round trip.
pub mod fr_opt_dec {
    use ark_bn254::Fr;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<Fr>, ser: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(x) => ser.serialize_some(&super::fe_to_dec(x)),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Fr>, D::Error> {
        match Option::<String>::deserialize(de)? {
            Some(s) => super::fe_from_dec(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;

    #[test]
    fn hex_round_trip() {
        let mut rng = ark_std::test_rng();
        for _ in 0..16 {
            let x = Fr::rand(&mut rng);
            let hex = fe_to_hex(&x);
            assert!(hex.starts_with("0x"));
            assert_eq!(hex, hex.to_lowercase());
            assert_eq!(fe_from_hex(&hex).unwrap(), x);
        }
    }

    #[test]
    fn hex_accepts_uppercase_digits() {
        let x = Fr::from(0xdeadbeefu64);
        let upper = format!("0x{}", fe_to_hex(&x)[2..].to_uppercase());
        assert_eq!(fe_from_hex(&upper).unwrap(), x);
    }

    #[test]
    fn hex_requires_prefix() {
        assert!(fe_from_hex("deadbeef").is_err());
        assert!(fe_from_hex("0x").is_err());
        assert!(fe_from_hex("0xzz").is_err());
    }

    #[test]
    fn hex_is_minimal_width() {
        assert_eq!(fe_to_hex(&Fr::from(0u64)), "0x0");
        assert_eq!(fe_to_hex(&Fr::from(0xabcu64)), "0xabc");
    }

    #[test]
    fn dec_round_trip() {
        let x = Fr::from(123456789u64);
        assert_eq!(fe_from_dec(&fe_to_dec(&x)).unwrap(), x);
    }

    #[test]
    fn payload_json_carries_base64_proof_and_decimal_root() {
        let payload = ShotProofPayload {
            proof: vec![1, 2, 3, 250],
            public: ShotPublic {
                root: Some(Fr::from(77u64)),
                hit: 1,
                row: 3,
                col: 7,
            },
        };
        let v: serde_json::Value = serde_json::to_value(&payload).unwrap();
        assert_eq!(v["proof"], serde_json::json!("AQID+g=="));
        assert_eq!(v["public"]["root"], serde_json::json!("77"));
        assert_eq!(v["public"]["hit"], serde_json::json!(1));

        let back: ShotProofPayload = serde_json::from_value(v).unwrap();
        assert_eq!(back.proof, payload.proof);
        assert_eq!(back.public.root, Some(Fr::from(77u64)));
    }

    #[test]
    fn payload_survives_stripped_root() {
        let json = r#"{"proof":"AQID","public":{"hit":0,"row":1,"col":2}}"#;
        let payload: ShotProofPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.public.root, None);
        assert_eq!(payload.public.row, 1);
    }
}
