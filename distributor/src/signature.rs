//! Detachable claim-authorization signatures.
//!
//! A claim request carries a 65-byte `r || s || v` secp256k1 signature
//! over an EIP-712-style typed digest. The digest is domain-separated by
//! contract identity and chain identity so a signature cannot be replayed
//! against another deployment, and it binds exactly one
//! `(account, amount)` pair. This check is orthogonal to the Merkle
//! proof: the proof shows the pair is in the committed set, the signature
//! shows the request was authorized by that account's key.

use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use merkle_tree::{keccak256, Address, Digest};
use primitive_types::U256;
use sha3::{Digest as _, Keccak256};

use crate::error::ClaimError;

const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const CLAIM_TYPE: &[u8] = b"AirdropClaim(address account,uint256 amount)";

/// Domain-separation parameters, injected as configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl ClaimDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn separator(&self) -> Digest {
        let mut preimage = Vec::with_capacity(160);
        preimage.extend_from_slice(&keccak256(EIP712_DOMAIN_TYPE));
        preimage.extend_from_slice(&keccak256(self.name.as_bytes()));
        preimage.extend_from_slice(&keccak256(self.version.as_bytes()));
        preimage.extend_from_slice(&u256_be(U256::from(self.chain_id)));
        preimage.extend_from_slice(&pad32(&self.verifying_contract));
        keccak256(&preimage)
    }
}

fn u256_be(value: U256) -> [u8; 32] {
    let mut out = [0u8; 32];
    value.to_big_endian(&mut out);
    out
}

fn pad32(address: &Address) -> [u8; 32] {
    let mut out = [0u8; 32];
    out[12..].copy_from_slice(address);
    out
}

/// Typed digest binding one `(account, amount)` pair under `domain`.
pub fn claim_digest(domain: &ClaimDomain, account: &Address, amount: U256) -> Digest {
    let mut struct_preimage = Vec::with_capacity(96);
    struct_preimage.extend_from_slice(&keccak256(CLAIM_TYPE));
    struct_preimage.extend_from_slice(&pad32(account));
    struct_preimage.extend_from_slice(&u256_be(amount));
    let struct_hash = keccak256(&struct_preimage);

    let mut preimage = Vec::with_capacity(66);
    preimage.extend_from_slice(&[0x19, 0x01]);
    preimage.extend_from_slice(&domain.separator());
    preimage.extend_from_slice(&struct_hash);
    keccak256(&preimage)
}

/// Ethereum-style address of a verifying key: keccak of the uncompressed
/// public key, last 20 bytes.
pub fn claimer_address(key: &VerifyingKey) -> Address {
    let encoded = key.to_encoded_point(false);
    let hash = Keccak256::digest(&encoded.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..32]);
    address
}

/// Recovers the signing address from a 65-byte `r || s || v` signature
/// over `digest`.
///
/// `v` is accepted as 0/1 or 27/28 and normalized; a high-`s` signature
/// is normalized with the matching recovery-id flip. A wrong length or an
/// unrecognized `v` is a structural defect, failures inside the curve
/// math are `InvalidSignature`.
pub fn recover_claimer(digest: &Digest, signature: &[u8]) -> Result<Address, ClaimError> {
    if signature.len() != 65 {
        return Err(ClaimError::MalformedInput("signature must be 65 bytes"));
    }
    let mut v = match signature[64] {
        v @ 0..=1 => v,
        v @ 27..=28 => v - 27,
        _ => return Err(ClaimError::MalformedInput("invalid recovery id")),
    };

    let mut sig =
        Signature::from_slice(&signature[..64]).map_err(|_| ClaimError::InvalidSignature)?;
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        v ^= 1;
    }
    let recovery_id = RecoveryId::from_byte(v).ok_or(ClaimError::InvalidSignature)?;

    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| ClaimError::InvalidSignature)?;
    Ok(claimer_address(&key))
}

/// Claimant-side signing helper, used by tests and the CLI.
pub fn sign_claim(
    signing_key: &SigningKey,
    domain: &ClaimDomain,
    account: &Address,
    amount: U256,
) -> Result<[u8; 65], ClaimError> {
    let digest = claim_digest(domain, account, amount);
    let (sig, recovery_id) = signing_key
        .sign_prehash_recoverable(&digest)
        .map_err(|_| ClaimError::InvalidSignature)?;
    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&sig.to_bytes());
    out[64] = recovery_id.to_byte();
    Ok(out)
}
