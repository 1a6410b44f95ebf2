mod claim_ledger;
mod claim_status;

pub use claim_ledger::ClaimLedger;
pub use claim_status::ClaimStatus;
