use merkle_tree::{hex_encode, leaf_digest, verify_proof, Address, Digest, MAX_PROOF_LEN};
use primitive_types::U256;

use crate::distributor::MerkleDistributor;
use crate::error::ClaimError;
use crate::signature::{claim_digest, recover_claimer};
use crate::token::TokenTransfer;

/// One claim attempt: the grant pair, its membership proof, and the
/// claimant's authorization signature.
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    pub claimant: Address,
    pub amount: U256,
    pub proof: Vec<Digest>,
    pub signature: Vec<u8>,
}

/// Observable record emitted once per successful claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimEvent {
    pub claimant: Address,
    pub amount: U256,
}

impl<T: TokenTransfer> MerkleDistributor<T> {
    /// Verifies one claim request and, if every check passes, marks the
    /// claimant as claimed and signals the token transfer.
    ///
    /// Checks run cheapest first: structural screen, claimed-set lookup,
    /// proof fold against the committed root, signature recovery, then
    /// the distribution caps. Any failure rejects the whole request with
    /// no state mutation, so resubmitting identical input fails
    /// identically. The claimed mark and the transfer commit as one unit
    /// under the ledger lock; if the transfer reports failure the mark is
    /// rolled back before the lock is released, preserving "claimed
    /// implies tokens were sent exactly once".
    pub fn claim(&self, request: &ClaimRequest) -> Result<ClaimEvent, ClaimError> {
        let leaf = self.screen(request)?;

        let mut ledger = self.ledger.lock();

        if ledger.is_claimed(&request.claimant) {
            tracing::debug!(claimant = %hex_encode(request.claimant), "already claimed");
            return Err(ClaimError::AlreadyClaimed);
        }

        if !verify_proof(leaf, &request.proof, self.config.root) {
            tracing::debug!(claimant = %hex_encode(request.claimant), "merkle proof mismatch");
            return Err(ClaimError::InvalidProof);
        }

        let digest = claim_digest(&self.config.domain, &request.claimant, request.amount);
        let signer = recover_claimer(&digest, &request.signature)?;
        if signer != request.claimant {
            tracing::debug!(
                claimant = %hex_encode(request.claimant),
                signer = %hex_encode(signer),
                "signature does not authorize claimant"
            );
            return Err(ClaimError::InvalidSignature);
        }

        let next_nodes = ledger
            .num_nodes_claimed()
            .checked_add(1)
            .ok_or(ClaimError::ArithmeticError)?;
        if next_nodes > self.config.max_num_nodes {
            return Err(ClaimError::MaxNodesExceeded);
        }
        let next_total = ledger
            .total_amount_claimed()
            .checked_add(request.amount)
            .ok_or(ClaimError::ArithmeticError)?;
        if next_total > self.config.max_total_claim {
            return Err(ClaimError::ExceededMaxClaim);
        }

        ledger.record(request.claimant, request.amount)?;

        if !self.token.transfer(request.claimant, request.amount) {
            ledger.rollback(&request.claimant);
            tracing::warn!(
                claimant = %hex_encode(request.claimant),
                amount = %request.amount,
                "token transfer failed, claim rolled back"
            );
            return Err(ClaimError::TransferFailed);
        }

        tracing::info!(
            claimant = %hex_encode(request.claimant),
            amount = %request.amount,
            "claim succeeded"
        );
        Ok(ClaimEvent {
            claimant: request.claimant,
            amount: request.amount,
        })
    }

    /// Structural screen. Returns the recomputed leaf digest so the
    /// proof fold does not hash the grant twice.
    fn screen(&self, request: &ClaimRequest) -> Result<Digest, ClaimError> {
        if request.claimant == [0u8; 20] {
            return Err(ClaimError::MalformedInput("zero claimant address"));
        }
        if request.proof.len() > MAX_PROOF_LEN {
            return Err(ClaimError::MalformedInput("proof exceeds maximum depth"));
        }
        if request.signature.len() != 65 {
            return Err(ClaimError::MalformedInput("signature must be 65 bytes"));
        }
        let leaf = leaf_digest(&request.claimant, request.amount);
        // An empty proof is only meaningful for a singleton tree, where
        // the leaf is the root.
        if request.proof.is_empty() && leaf != self.config.root {
            return Err(ClaimError::MalformedInput(
                "empty proof for non-singleton tree",
            ));
        }
        Ok(leaf)
    }
}
