//! Keccak256 helpers shared by tree construction and proof verification.

/// 32-byte keccak256 digest.
pub type Digest = [u8; 32];

macro_rules! hashv {
    ($($expr:expr),* $(,)?) => {{
        use sha3::Digest as _;
        let mut hasher = sha3::Keccak256::new();
        $(
            hasher.update($expr);
        )*
        let out: [u8; 32] = hasher.finalize().into();
        out
    }};
}
pub(crate) use hashv;

pub fn keccak256(data: &[u8]) -> Digest {
    hashv!(data)
}

/// Hashes two child digests into their parent.
///
/// The pair is sorted as big-endian byte sequences before concatenation,
/// so verification does not need to track left/right position.
pub fn hash_pair(a: &Digest, b: &Digest) -> Digest {
    if a <= b {
        hashv!(a, b)
    } else {
        hashv!(b, a)
    }
}
