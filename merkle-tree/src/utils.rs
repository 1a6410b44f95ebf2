use std::fs;
use std::path::Path;

use crate::error::MerkleTreeError;
use crate::hash::Digest;
use crate::Address;

/// Parses an Ethereum-style address from a hex string, with or without a
/// `0x` prefix. The zero address is rejected as structurally invalid.
pub fn parse_address(addr_str: &str) -> Result<Address, MerkleTreeError> {
    let cleaned = addr_str
        .trim()
        .strip_prefix("0x")
        .unwrap_or_else(|| addr_str.trim());
    if cleaned.len() != 40 {
        return Err(MerkleTreeError::MerkleValidationError(format!(
            "invalid address length: expected 40 hex chars, got {}",
            cleaned.len()
        )));
    }
    let mut address = [0u8; 20];
    hex::decode_to_slice(cleaned, &mut address).map_err(|e| {
        MerkleTreeError::MerkleValidationError(format!("invalid hex encoding: {e}"))
    })?;
    if address == [0u8; 20] {
        return Err(MerkleTreeError::MerkleValidationError(
            "zero address not allowed".to_string(),
        ));
    }
    Ok(address)
}

/// Parses a 32-byte digest from a hex string (`0x` prefix optional).
pub fn parse_digest(digest_str: &str) -> Result<Digest, MerkleTreeError> {
    let cleaned = digest_str
        .trim()
        .strip_prefix("0x")
        .unwrap_or_else(|| digest_str.trim());
    if cleaned.len() != 64 {
        return Err(MerkleTreeError::MerkleValidationError(format!(
            "invalid digest length: expected 64 hex chars, got {}",
            cleaned.len()
        )));
    }
    let mut digest = [0u8; 32];
    hex::decode_to_slice(cleaned, &mut digest).map_err(|e| {
        MerkleTreeError::MerkleValidationError(format!("invalid hex encoding: {e}"))
    })?;
    Ok(digest)
}

pub fn hex_encode(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Writes `contents` to a temporary sibling file and renames it over
/// `path`, so readers never observe a half-written artifact.
pub fn write_file_atomic(path: &Path, contents: &str) -> Result<(), MerkleTreeError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
