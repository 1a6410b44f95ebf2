use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleTreeError {
    #[error("Merkle Tree Validation Error: {0}")]
    MerkleValidationError(String),
    #[error("Duplicate claimant: {0}")]
    DuplicateClaimant(String),
    #[error("Arithmetic Error (overflow/underflow)")]
    ArithmeticError,
    #[error("Empty input provided")]
    EmptyInput,
    #[error("Index out of range")]
    IndexOutOfRange,
    #[error("Proof verification failed")]
    ProofFailure,
    #[error("io Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde Error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Csv Error: {0}")]
    CsvError(#[from] csv::Error),
}
