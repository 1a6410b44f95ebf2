use crate::error::MerkleTreeError;
use crate::hash::{hash_pair, Digest};

/// Binary Merkle tree over a fixed ordered set of leaf digests.
///
/// Levels are stored bottom-up: level 0 holds the leaves, the last level
/// holds the single root. Adjacent nodes are paired and hashed with the
/// sorted-pair rule; an unpaired trailing node at any level is promoted
/// unchanged to the next level, never duplicated, so a promoted node
/// contributes no sibling to a proof. Construction is deterministic for
/// a fixed leaf ordering.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<Digest>>,
}

impl MerkleTree {
    pub fn new(leaves: Vec<Digest>) -> Result<Self, MerkleTreeError> {
        if leaves.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        let mut levels = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let level = &levels[levels.len() - 1];
            let mut next_level = Vec::with_capacity(level.len().div_ceil(2));
            for chunk in level.chunks(2) {
                if chunk.len() == 2 {
                    next_level.push(hash_pair(&chunk[0], &chunk[1]));
                } else {
                    // odd node: promote unchanged
                    next_level.push(chunk[0]);
                }
            }
            levels.push(next_level);
        }

        Ok(Self { levels })
    }

    pub fn root(&self) -> Digest {
        self.levels[self.levels.len() - 1][0]
    }

    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Sibling digests from the leaf at `leaf_index` up to just below the
    /// root, in bottom-up order.
    pub fn proof(&self, leaf_index: usize) -> Result<Vec<Digest>, MerkleTreeError> {
        if leaf_index >= self.levels[0].len() {
            return Err(MerkleTreeError::IndexOutOfRange);
        }

        let mut proof = Vec::new();
        let mut current_index = leaf_index;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_index = if current_index % 2 == 0 {
                current_index + 1
            } else {
                current_index - 1
            };
            if sibling_index < level.len() {
                proof.push(level[sibling_index]);
            }
            current_index /= 2;
        }

        Ok(proof)
    }
}

/// Folds a proof over a leaf digest and compares the result to `root`.
///
/// Each step combines the running digest with the next sibling using the
/// same sorted-pair hash as construction, so pair-internal order does not
/// matter while the sequence order of the proof does.
pub fn verify_proof(leaf: Digest, proof: &[Digest], root: Digest) -> bool {
    proof.iter().fold(leaf, |acc, node| hash_pair(&acc, node)) == root
}
