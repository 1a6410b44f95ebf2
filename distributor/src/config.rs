use merkle_tree::{AirdropMerkleTree, Digest};
use primitive_types::U256;

use crate::signature::ClaimDomain;

/// Published configuration a distributor is constructed with. Read once
/// at construction, immutable thereafter.
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// The committed merkle root.
    pub root: Digest,
    /// Domain-separation parameters for authorization signatures.
    pub domain: ClaimDomain,
    /// Maximum number of tokens that can ever be claimed.
    pub max_total_claim: U256,
    /// Maximum number of nodes that can ever be claimed.
    pub max_num_nodes: u64,
}

impl DistributorConfig {
    /// Builds a config from a tree's published metadata.
    pub fn from_tree(tree: &AirdropMerkleTree, domain: ClaimDomain) -> Self {
        Self {
            root: tree.merkle_root,
            domain,
            max_total_claim: tree.max_total_claim,
            max_num_nodes: tree.max_num_nodes,
        }
    }
}
