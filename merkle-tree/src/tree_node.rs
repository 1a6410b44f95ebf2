use primitive_types::U256;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};

use crate::csv_entry::CsvEntry;
use crate::error::MerkleTreeError;
use crate::hash::{hashv, keccak256, Digest};
use crate::utils::parse_address;
use crate::Address;

/// Canonical leaf digest for a `(claimant, amount)` grant.
///
/// The grant is ABI-encoded as `pad32(claimant) || be32(amount)` and then
/// keccak-hashed twice. The second round prevents an internal tree node
/// from being replayed as a leaf.
pub fn leaf_digest(claimant: &Address, amount: U256) -> Digest {
    let mut encoded = [0u8; 64];
    encoded[12..32].copy_from_slice(claimant);
    amount.to_big_endian(&mut encoded[32..64]);
    let inner = hashv!(&encoded);
    keccak256(&inner)
}

/// Represents the claim information for an account.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Address of the claimant; will be responsible for signing the claim
    #[serde_as(as = "Hex")]
    pub claimant: Address,
    /// Amount the claimant is entitled to
    pub amount: U256,
    /// Claimant's proof of inclusion in the Merkle tree
    #[serde_as(as = "Vec<Hex>")]
    #[serde(default)]
    pub proof: Vec<Digest>,
    /// Position of this node's leaf in the tree
    #[serde(default)]
    pub index: u64,
}

impl TreeNode {
    pub fn new(claimant: Address, amount: U256) -> Self {
        Self {
            claimant,
            amount,
            proof: Vec::new(),
            index: 0,
        }
    }

    pub fn hash(&self) -> Digest {
        leaf_digest(&self.claimant, self.amount)
    }
}

impl TryFrom<CsvEntry> for TreeNode {
    type Error = MerkleTreeError;

    fn try_from(entry: CsvEntry) -> Result<Self, Self::Error> {
        let claimant = parse_address(&entry.address)?;
        let amount = U256::from_dec_str(&entry.amount).map_err(|e| {
            MerkleTreeError::MerkleValidationError(format!(
                "invalid amount {:?}: {e}",
                entry.amount
            ))
        })?;
        Ok(Self::new(claimant, amount))
    }
}
