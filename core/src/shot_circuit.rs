//! The per-shot R1CS statement.
//!
//! Proves that the claimed hit/miss at a declared coordinate is exactly the
//! committed bit under the published salted root:
//!
//! 1. `bit` and `hit` are boolean, and `hit = bit`.
//! 2. The leaf hash of `bit`, folded up the authentication path, yields the
//!    (never published) tree root.
//! 3. One more node hash binds the secret salt to that root and must equal
//!    the public salted root.
//! 4. The direction bits of the walk equal the 7-bit decomposition of
//!    `row * 10 + col`, so a path for any other leaf cannot be passed off as
//!    this coordinate. An index >= 128 has no 7-bit decomposition, which is
//!    what rejects out-of-grid coordinates.
//!
//! The MiMC gadget below replays [`crate::mimc`] over the same constant
//! table; the two implementations must agree or no proof verifies.

use ark_bn254::Fr;
use ark_ff::{Field, One};
use ark_r1cs_std::alloc::AllocVar;
use ark_r1cs_std::boolean::Boolean;
use ark_r1cs_std::eq::EqGadget;
use ark_r1cs_std::fields::fp::FpVar;
use ark_r1cs_std::fields::FieldVar;
use ark_r1cs_std::select::CondSelectGadget;
use ark_relations::ns;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystemRef, SynthesisError};

use crate::mimc;
use crate::MERKLE_DEPTH;

/// Witness assignment for one shot. `None` everywhere for key generation;
/// fully populated for proving. Public inputs are allocated in the order
/// `(root, hit, row, col)` and the verifier must supply them in that order.
#[derive(Clone, Debug, Default)]
pub struct ShotCircuit {
    // Private witness.
    pub bit: Option<bool>,
    pub path: Option<[Fr; MERKLE_DEPTH]>,
    pub dir: Option<[bool; MERKLE_DEPTH]>,
    pub salt: Option<Fr>,

    // Public inputs.
    pub root: Option<Fr>,
    pub hit: Option<bool>,
    pub row: Option<u8>,
    pub col: Option<u8>,
}

impl ConstraintSynthesizer<Fr> for ShotCircuit {
    fn generate_constraints(self, cs: ConstraintSystemRef<Fr>) -> Result<(), SynthesisError> {
        let root = FpVar::new_input(ns!(cs, "root"), || {
            self.root.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let hit = FpVar::new_input(ns!(cs, "hit"), || {
            self.hit
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let row = FpVar::new_input(ns!(cs, "row"), || {
            self.row
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;
        let col = FpVar::new_input(ns!(cs, "col"), || {
            self.col
                .map(Fr::from)
                .ok_or(SynthesisError::AssignmentMissing)
        })?;

        let bit = Boolean::new_witness(ns!(cs, "bit"), || {
            self.bit.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let salt = FpVar::new_witness(ns!(cs, "salt"), || {
            self.salt.ok_or(SynthesisError::AssignmentMissing)
        })?;
        let mut path = Vec::with_capacity(MERKLE_DEPTH);
        let mut dir = Vec::with_capacity(MERKLE_DEPTH);
        for k in 0..MERKLE_DEPTH {
            path.push(FpVar::new_witness(ns!(cs, "path"), || {
                self.path
                    .map(|p| p[k])
                    .ok_or(SynthesisError::AssignmentMissing)
            })?);
            dir.push(Boolean::new_witness(ns!(cs, "dir"), || {
                self.dir
                    .map(|d| d[k])
                    .ok_or(SynthesisError::AssignmentMissing)
            })?);
        }

        // hit is a raw field input; pin it to {0,1} and to the committed bit.
        // The bit itself is boolean by allocation.
        let bit_fe = FpVar::from(bit);
        hit.mul_equals(&(hit.clone() - FpVar::one()), &FpVar::zero())?;
        hit.enforce_equal(&bit_fe)?;

        // Leaf hash, then the walk to the tree root.
        let mut curr = mimc_hash_gadget(&[bit_fe])?;
        for k in 0..MERKLE_DEPTH {
            let left = FpVar::conditionally_select(&dir[k], &path[k], &curr)?;
            let right = FpVar::conditionally_select(&dir[k], &curr, &path[k])?;
            curr = mimc_hash_gadget(&[left, right])?;
        }

        // The tree root never appears in public; only its salted wrapper does.
        let salted = mimc_hash_gadget(&[salt, curr])?;
        salted.enforce_equal(&root)?;

        // Bind the public coordinate to the walk: the direction bits must be
        // exactly the LSB-first bits of row*10 + col.
        let ten = FpVar::constant(Fr::from(10u64));
        let idx = &row * &ten + &col;
        let idx_val = match (self.row, self.col) {
            (Some(r), Some(c)) => Some(r as usize * 10 + c as usize),
            _ => None,
        };
        let mut recomposed = FpVar::<Fr>::zero();
        let mut coeff = Fr::one();
        for (k, d) in dir.iter().enumerate() {
            let idx_bit = Boolean::new_witness(ns!(cs, "idx_bit"), || {
                idx_val
                    .map(|v| (v >> k) & 1 == 1)
                    .ok_or(SynthesisError::AssignmentMissing)
            })?;
            recomposed += FpVar::from(idx_bit.clone()) * FpVar::constant(coeff);
            idx_bit.enforce_equal(d)?;
            coeff.double_in_place();
        }
        recomposed.enforce_equal(&idx)?;

        Ok(())
    }
}

fn mimc_encrypt_gadget(message: FpVar<Fr>, key: &FpVar<Fr>) -> Result<FpVar<Fr>, SynthesisError> {
    let mut x = message;
    for &c in mimc::round_constants() {
        let t = &x + key + FpVar::constant(c);
        let t2 = t.square()?;
        let t4 = t2.square()?;
        x = t4 * &t;
    }
    Ok(x + key)
}

/// In-circuit mirror of [`mimc::hash`].
fn mimc_hash_gadget(elems: &[FpVar<Fr>]) -> Result<FpVar<Fr>, SynthesisError> {
    let mut state = FpVar::<Fr>::zero();
    for m in elems {
        let enc = mimc_encrypt_gadget(m.clone(), &state)?;
        state = enc + m + &state;
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::FixedTree;
    use crate::NUM_LEAVES;
    use ark_r1cs_std::R1CSVar;
    use ark_relations::r1cs::ConstraintSystem;

    fn sample_bits() -> Vec<u8> {
        let mut bits = vec![0u8; 100];
        for i in [5usize, 17, 37, 60, 98] {
            bits[i] = 1;
        }
        bits
    }

    /// Honest witness for a shot at (row, col) against a fresh commitment.
    fn witness_for(row: u8, col: u8) -> ShotCircuit {
        let bits = sample_bits();
        let tree = FixedTree::build(&bits, NUM_LEAVES, mimc::pad_leaf()).unwrap();
        let idx = row as usize * 10 + col as usize;
        let bit = bits[idx] == 1;
        let (path, dir) = tree.path(idx).unwrap();
        let salt = Fr::from(0xfeed_beefu64);
        let salted_root = mimc::hash_node(salt, tree.root());

        ShotCircuit {
            bit: Some(bit),
            path: Some(path.try_into().unwrap()),
            dir: Some(dir.try_into().unwrap()),
            salt: Some(salt),
            root: Some(salted_root),
            hit: Some(bit),
            row: Some(row),
            col: Some(col),
        }
    }

    fn is_satisfied(circuit: ShotCircuit) -> bool {
        let cs = ConstraintSystem::<Fr>::new_ref();
        circuit.generate_constraints(cs.clone()).unwrap();
        cs.is_satisfied().unwrap()
    }

    #[test]
    fn honest_witness_satisfies() {
        // (3, 7) is a ship cell, (0, 0) is water.
        assert!(is_satisfied(witness_for(3, 7)));
        assert!(is_satisfied(witness_for(0, 0)));
    }

    #[test]
    fn gadget_matches_native_hash() {
        let cs = ConstraintSystem::<Fr>::new_ref();
        let a = Fr::from(11u64);
        let b = Fr::from(22u64);
        let av = FpVar::new_witness(cs.clone(), || Ok(a)).unwrap();
        let bv = FpVar::new_witness(cs, || Ok(b)).unwrap();
        let out = mimc_hash_gadget(&[av, bv]).unwrap();
        assert_eq!(out.value().unwrap(), mimc::hash_node(a, b));
    }

    #[test]
    fn flipped_hit_is_unsatisfiable() {
        let mut circuit = witness_for(3, 7);
        circuit.hit = Some(!circuit.hit.unwrap());
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn mismatched_coordinate_is_unsatisfiable() {
        // Keep the (3, 7) path but claim the shot was at (3, 8).
        let mut circuit = witness_for(3, 7);
        circuit.col = Some(8);
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn foreign_root_is_unsatisfiable() {
        let mut circuit = witness_for(3, 7);
        circuit.root = Some(Fr::from(1u64));
        assert!(!is_satisfied(circuit));
    }

    #[test]
    fn index_past_tree_width_is_unsatisfiable() {
        // row*10 + col = 128 cannot decompose into 7 bits.
        let mut circuit = witness_for(0, 0);
        circuit.row = Some(12);
        circuit.col = Some(8);
        assert!(!is_satisfied(circuit));
    }
}
