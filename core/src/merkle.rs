//! Fixed-shape binary Merkle tree over the padded leaf vector.
//!
//! The tree is stored level-major: `levels[0]` holds the 128 hashed leaves,
//! `levels[depth]` holds the root. There is no pointer graph and no
//! incremental update; the defender rebuilds the whole tree at commit time
//! and keeps it in the secret bundle for path extraction.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::Error;
use crate::mimc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeJson", into = "TreeJson")]
pub struct FixedTree {
    levels: Vec<Vec<Fr>>,
}

impl FixedTree {
    /// Build a tree of exactly `size` leaves from a bit vector. Bits are
    /// hashed with the leaf hash; slots past `bits.len()` carry `pad_leaf`.
    pub fn build(bits: &[u8], size: usize, pad_leaf: Fr) -> Result<Self, Error> {
        if size == 0 || size & (size - 1) != 0 {
            return Err(Error::MerkleBuild("size must be a power of two"));
        }
        if bits.len() > size {
            return Err(Error::MerkleBuild("too many leaves"));
        }

        let mut level = Vec::with_capacity(size);
        for i in 0..size {
            if i < bits.len() {
                level.push(mimc::hash_leaf(bits[i]));
            } else {
                level.push(pad_leaf);
            }
        }

        let mut levels = vec![level];
        let mut n = size;
        while n > 1 {
            let prev = &levels[levels.len() - 1];
            let up = prev
                .chunks_exact(2)
                .map(|pair| mimc::hash_node(pair[0], pair[1]))
                .collect();
            levels.push(up);
            n /= 2;
        }

        Ok(Self { levels })
    }

    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn root(&self) -> Fr {
        self.levels[self.levels.len() - 1][0]
    }

    /// Sibling hashes and direction bits for leaf `idx`.
    ///
    /// `dir[k]` is true iff the current node at level `k` is the right child
    /// of its parent, i.e. bit `k` of `idx` (LSB first). Starting from the
    /// leaf and folding `hash_node` along `(path, dir)` reproduces the root;
    /// that fold is exactly what the shot circuit enforces.
    pub fn path(&self, idx: usize) -> Result<(Vec<Fr>, Vec<bool>), Error> {
        if idx >= self.levels[0].len() {
            return Err(Error::LeafIndexOutOfRange);
        }
        let mut path = Vec::with_capacity(self.depth());
        let mut dir = Vec::with_capacity(self.depth());
        let mut cur = idx;
        for level in 0..self.depth() {
            let is_right = cur % 2 == 1;
            let sib = if is_right { cur - 1 } else { cur + 1 };
            path.push(self.levels[level][sib]);
            dir.push(is_right);
            cur /= 2;
        }
        Ok((path, dir))
    }
}

/// JSON form of the tree: levels as decimal field elements, leaves first.
#[derive(Serialize, Deserialize)]
struct TreeJson {
    depth: usize,
    levels: Vec<Vec<String>>,
}

impl From<FixedTree> for TreeJson {
    fn from(t: FixedTree) -> Self {
        TreeJson {
            depth: t.depth(),
            levels: t
                .levels
                .iter()
                .map(|lvl| lvl.iter().map(codec::fe_to_dec).collect())
                .collect(),
        }
    }
}

impl TryFrom<TreeJson> for FixedTree {
    type Error = Error;

    fn try_from(t: TreeJson) -> Result<Self, Error> {
        if t.levels.len() != t.depth + 1 {
            return Err(Error::MerkleBuild("level count disagrees with depth"));
        }
        let mut levels = Vec::with_capacity(t.levels.len());
        for (k, lvl) in t.levels.iter().enumerate() {
            if lvl.len() != t.levels[0].len() >> k {
                return Err(Error::MerkleBuild("level sizes must halve"));
            }
            levels.push(
                lvl.iter()
                    .map(|s| codec::fe_from_dec(s))
                    .collect::<Result<Vec<_>, _>>()?,
            );
        }
        if levels.last().map(Vec::len) != Some(1) {
            return Err(Error::MerkleBuild("missing root level"));
        }
        Ok(Self { levels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NUM_LEAVES;

    fn sample_bits() -> Vec<u8> {
        let mut bits = vec![0u8; 100];
        for i in [0usize, 9, 37, 55, 99] {
            bits[i] = 1;
        }
        bits
    }

    #[test]
    fn rejects_non_power_of_two() {
        let err = FixedTree::build(&[0, 1], 100, mimc::pad_leaf());
        assert!(matches!(err, Err(Error::MerkleBuild(_))));
    }

    #[test]
    fn rejects_too_many_leaves() {
        let bits = vec![0u8; 129];
        let err = FixedTree::build(&bits, NUM_LEAVES, mimc::pad_leaf());
        assert!(matches!(err, Err(Error::MerkleBuild(_))));
    }

    #[test]
    fn rejects_out_of_range_index() {
        let t = FixedTree::build(&sample_bits(), NUM_LEAVES, mimc::pad_leaf()).unwrap();
        assert!(matches!(t.path(NUM_LEAVES), Err(Error::LeafIndexOutOfRange)));
    }

    #[test]
    fn path_recomputes_root_for_every_leaf() {
        let bits = sample_bits();
        let t = FixedTree::build(&bits, NUM_LEAVES, mimc::pad_leaf()).unwrap();
        for idx in 0..NUM_LEAVES {
            let bit = if idx < bits.len() { bits[idx] } else { 0 };
            let (path, dir) = t.path(idx).unwrap();
            let mut curr = mimc::hash_leaf(bit);
            for (sib, is_right) in path.iter().zip(&dir) {
                curr = if *is_right {
                    mimc::hash_node(*sib, curr)
                } else {
                    mimc::hash_node(curr, *sib)
                };
            }
            assert_eq!(curr, t.root(), "leaf {idx}");
        }
    }

    #[test]
    fn direction_bits_follow_index() {
        let t = FixedTree::build(&sample_bits(), NUM_LEAVES, mimc::pad_leaf()).unwrap();
        let (_, dir) = t.path(37).unwrap();
        for (k, bit) in dir.iter().enumerate() {
            assert_eq!(*bit, (37 >> k) & 1 == 1);
        }
    }

    #[test]
    fn explicit_zero_leaves_match_padding() {
        // Appending literal zero bits beyond the board is indistinguishable
        // from letting the builder pad, since the pad leaf is H_leaf(0).
        let short = sample_bits();
        let mut long = short.clone();
        long.resize(NUM_LEAVES, 0);
        let a = FixedTree::build(&short, NUM_LEAVES, mimc::pad_leaf()).unwrap();
        let b = FixedTree::build(&long, NUM_LEAVES, mimc::pad_leaf()).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn json_round_trip() {
        let t = FixedTree::build(&sample_bits(), NUM_LEAVES, mimc::pad_leaf()).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let back: FixedTree = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
