pub mod claim;
pub mod config;
pub mod distributor;
pub mod error;
pub mod signature;
pub mod state;
pub mod token;

pub use claim::{ClaimEvent, ClaimRequest};
pub use config::DistributorConfig;
pub use distributor::MerkleDistributor;
pub use error::ClaimError;
pub use signature::ClaimDomain;
pub use state::{ClaimLedger, ClaimStatus};
pub use token::{InMemoryToken, TokenTransfer};
