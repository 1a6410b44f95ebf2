use std::{
    collections::{HashMap, HashSet},
    fs,
    path::Path,
    result,
};

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::{
    csv_entry::CsvEntry,
    error::{MerkleTreeError, MerkleTreeError::MerkleValidationError},
    hash::Digest,
    merkle_tree::{verify_proof, MerkleTree},
    tree_node::TreeNode,
    utils::{hex_encode, write_file_atomic},
    Address,
};

pub type Result<T> = result::Result<T, MerkleTreeError>;

/// Helper function to compute max total claim from tree nodes
fn get_max_total_claim(tree_nodes: &[TreeNode]) -> Result<U256> {
    let mut total = U256::zero();
    for node in tree_nodes {
        total = total
            .checked_add(node.amount)
            .ok_or(MerkleTreeError::ArithmeticError)?;
    }
    Ok(total)
}

/// Merkle tree which will be used to distribute tokens to claimants.
/// Contains all the information necessary to verify claims against the root.
///
/// This is also the proof-distribution artifact: serialized to pretty JSON
/// with hex-encoded digests, preserving digest byte order and proof order
/// exactly.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropMerkleTree {
    /// The merkle root, which is uploaded on-chain
    #[serde_as(as = "Hex")]
    pub merkle_root: Digest,
    pub max_num_nodes: u64,
    pub max_total_claim: U256,
    pub tree_nodes: Vec<TreeNode>,
}

impl AirdropMerkleTree {
    pub fn new(tree_nodes: Vec<TreeNode>) -> Result<Self> {
        if tree_nodes.is_empty() {
            return Err(MerkleTreeError::EmptyInput);
        }

        // Duplicate claimants are a caller error: the tree semantics for a
        // whitelist carrying the same address twice are undefined, so we
        // refuse to build rather than silently merge.
        let mut seen: HashSet<Address> = HashSet::with_capacity(tree_nodes.len());
        for tree_node in &tree_nodes {
            if !seen.insert(tree_node.claimant) {
                return Err(MerkleTreeError::DuplicateClaimant(hex_encode(
                    tree_node.claimant,
                )));
            }
        }

        let mut tree_nodes = tree_nodes;
        let leaves: Vec<Digest> = tree_nodes.iter().map(|node| node.hash()).collect();
        let merkle_tree = MerkleTree::new(leaves)?;
        let merkle_root = merkle_tree.root();

        // Generate proofs for each tree node and store them
        for (i, tree_node) in tree_nodes.iter_mut().enumerate() {
            tree_node.proof = merkle_tree.proof(i)?;
            tree_node.index = i as u64;
        }

        let max_total_claim = get_max_total_claim(&tree_nodes)?;
        let tree = AirdropMerkleTree {
            merkle_root,
            max_num_nodes: tree_nodes.len() as u64,
            max_total_claim,
            tree_nodes,
        };

        tracing::info!(
            root = %hex_encode(tree.merkle_root),
            nodes = tree.max_num_nodes,
            max_total_claim = %tree.max_total_claim,
            "built merkle tree"
        );
        tree.validate()?;
        tree.verify_proof()?;
        Ok(tree)
    }

    /// Load a merkle tree from a csv path
    pub fn new_from_csv(path: &Path) -> Result<Self> {
        let csv_entries = CsvEntry::new_from_file(path)?;
        let tree_nodes: Vec<TreeNode> = csv_entries
            .into_iter()
            .map(TreeNode::try_from)
            .collect::<Result<_>>()?;
        let tree = Self::new(tree_nodes)?;
        Ok(tree)
    }

    /// Load a merkle tree from a JSON artifact previously written with
    /// [`write_to_file`](Self::write_to_file).
    pub fn new_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let tree: Self = serde_json::from_str(&contents)?;
        tree.validate()?;
        tree.verify_proof()?;
        Ok(tree)
    }

    /// Write the proof-distribution artifact atomically as pretty JSON.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        write_file_atomic(path, &serialized)?;
        Ok(())
    }

    pub fn get_node(&self, claimant: &Address) -> Option<&TreeNode> {
        self.tree_nodes
            .iter()
            .find(|node| node.claimant == *claimant)
    }

    pub fn get_proof(&self, claimant: &Address) -> Result<Vec<Digest>> {
        let node = self
            .get_node(claimant)
            .ok_or_else(|| MerkleValidationError("Claimant not found".to_string()))?;
        Ok(node.proof.clone())
    }

    fn validate(&self) -> Result<()> {
        // The tree can be at most height 32, which is a max node count of
        // 2^32 - 1.
        if self.max_num_nodes > 2u64.pow(32) - 1 {
            return Err(MerkleValidationError("Merkle tree too large".to_string()));
        }

        // validate that the length is equal to the max_num_nodes
        if self.tree_nodes.len() != self.max_num_nodes as usize {
            return Err(MerkleValidationError(
                "Tree nodes length does not equal max_num_nodes".to_string(),
            ));
        }

        // validate that there are no duplicate claimants
        let unique_nodes: HashSet<_> = self.tree_nodes.iter().map(|n| n.claimant).collect();
        if unique_nodes.len() != self.tree_nodes.len() {
            return Err(MerkleValidationError(
                "Duplicate claimants found".to_string(),
            ));
        }

        Ok(())
    }

    /// verify that every stored proof leads from its node's leaf back to
    /// the root
    pub fn verify_proof(&self) -> Result<()> {
        for node in &self.tree_nodes {
            if !verify_proof(node.hash(), &node.proof, self.merkle_root) {
                return Err(MerkleValidationError(format!(
                    "Invalid proof for claimant: {}",
                    hex_encode(node.claimant)
                )));
            }
        }
        Ok(())
    }

    // Converts Merkle Tree to a map for faster key access
    pub fn convert_to_hashmap(&self) -> HashMap<Address, TreeNode> {
        self.tree_nodes
            .iter()
            .map(|node| (node.claimant, node.clone()))
            .collect()
    }
}
