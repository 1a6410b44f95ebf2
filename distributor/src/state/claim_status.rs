use merkle_tree::Address;
use primitive_types::U256;

/// Record of one redeemed grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimStatus {
    /// Address that claimed the tokens.
    pub claimant: Address,
    /// Amount claimed.
    pub amount: U256,
}
