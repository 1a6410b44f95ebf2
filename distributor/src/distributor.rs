use merkle_tree::{Address, Digest};
use parking_lot::Mutex;
use primitive_types::U256;

use crate::config::DistributorConfig;
use crate::state::{ClaimLedger, ClaimStatus};
use crate::token::TokenTransfer;

/// Claim verifier for one published merkle root.
///
/// All configuration is injected at construction and immutable afterward.
/// The claimed-set is the only mutable state, owned by this instance
/// behind one mutex; `claim` holds that lock across check, mark, and the
/// token transfer so they commit as a single unit. See
/// [`claim`](MerkleDistributor::claim).
pub struct MerkleDistributor<T: TokenTransfer> {
    pub(crate) config: DistributorConfig,
    pub(crate) ledger: Mutex<ClaimLedger>,
    pub(crate) token: T,
}

impl<T: TokenTransfer> MerkleDistributor<T> {
    pub fn new(config: DistributorConfig, token: T) -> Self {
        Self {
            config,
            ledger: Mutex::new(ClaimLedger::new()),
            token,
        }
    }

    pub fn root(&self) -> Digest {
        self.config.root
    }

    pub fn config(&self) -> &DistributorConfig {
        &self.config
    }

    pub fn token(&self) -> &T {
        &self.token
    }

    pub fn is_claimed(&self, claimant: &Address) -> bool {
        self.ledger.lock().is_claimed(claimant)
    }

    pub fn claim_status(&self, claimant: &Address) -> Option<ClaimStatus> {
        self.ledger.lock().status(claimant).cloned()
    }

    pub fn total_amount_claimed(&self) -> U256 {
        self.ledger.lock().total_amount_claimed()
    }

    pub fn num_nodes_claimed(&self) -> u64 {
        self.ledger.lock().num_nodes_claimed()
    }
}
