pub mod airdrop_merkle_tree;
mod csv_entry;
mod error;
mod hash;
mod merkle_tree;
mod tree_node;
mod utils;

// Re-export main types
pub use airdrop_merkle_tree::AirdropMerkleTree;
pub use csv_entry::CsvEntry;
pub use error::MerkleTreeError;
pub use hash::{hash_pair, keccak256, Digest};
pub use merkle_tree::{verify_proof, MerkleTree};
pub use tree_node::{leaf_digest, TreeNode};
pub use utils::{hex_encode, parse_address, parse_digest, write_file_atomic};

/// 20-byte Ethereum-style account identifier.
pub type Address = [u8; 20];

// Trees are capped at 2^32 - 1 leaves, so no valid proof can ever be
// longer than 32 siblings.
pub const MAX_PROOF_LEN: usize = 32;
