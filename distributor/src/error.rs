use thiserror::Error;

/// Claim rejection kinds. None of these are retriable without changing
/// the input: resubmitting an identical request fails identically.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    #[error("address has already claimed")]
    AlreadyClaimed,
    #[error("invalid merkle proof")]
    InvalidProof,
    #[error("invalid authorization signature")]
    InvalidSignature,
    #[error("malformed input: {0}")]
    MalformedInput(&'static str),
    #[error("maximum number of claimed nodes exceeded")]
    MaxNodesExceeded,
    #[error("exceeded maximum total claim")]
    ExceededMaxClaim,
    #[error("arithmetic error (overflow/underflow)")]
    ArithmeticError,
    #[error("token transfer failed")]
    TransferFailed,
}
