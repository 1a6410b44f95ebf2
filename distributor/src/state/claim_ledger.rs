use std::collections::HashMap;

use merkle_tree::Address;
use primitive_types::U256;

use crate::error::ClaimError;
use crate::state::ClaimStatus;

/// The claimed-set: which addresses have redeemed, plus running totals.
/// Initialized empty, mutated only by successful claims, never reset.
/// Owned by one distributor instance behind a single mutex.
#[derive(Debug, Default)]
pub struct ClaimLedger {
    claims: HashMap<Address, ClaimStatus>,
    total_amount_claimed: U256,
    num_nodes_claimed: u64,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_claimed(&self, claimant: &Address) -> bool {
        self.claims.contains_key(claimant)
    }

    pub fn status(&self, claimant: &Address) -> Option<&ClaimStatus> {
        self.claims.get(claimant)
    }

    pub fn total_amount_claimed(&self) -> U256 {
        self.total_amount_claimed
    }

    pub fn num_nodes_claimed(&self) -> u64 {
        self.num_nodes_claimed
    }

    /// Marks `claimant` as claimed and bumps the totals. The caller must
    /// have checked `is_claimed` first.
    pub fn record(&mut self, claimant: Address, amount: U256) -> Result<(), ClaimError> {
        self.total_amount_claimed = self
            .total_amount_claimed
            .checked_add(amount)
            .ok_or(ClaimError::ArithmeticError)?;
        self.num_nodes_claimed = self
            .num_nodes_claimed
            .checked_add(1)
            .ok_or(ClaimError::ArithmeticError)?;
        self.claims.insert(claimant, ClaimStatus { claimant, amount });
        Ok(())
    }

    /// Undoes a `record` after a failed token transfer, restoring the
    /// totals.
    pub fn rollback(&mut self, claimant: &Address) {
        if let Some(status) = self.claims.remove(claimant) {
            self.total_amount_claimed =
                self.total_amount_claimed.saturating_sub(status.amount);
            self.num_nodes_claimed = self.num_nodes_claimed.saturating_sub(1);
        }
    }
}
