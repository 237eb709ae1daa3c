//! Register digests for determinism and cross-implementation equivalence checks.
//! BLAKE2b-256 over the registers' 8-byte little-endian encodings.

use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;

/// Blake2b-256 hash (32-byte output).
#[must_use]
pub fn blake2b256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2bVar::new(32).expect("BLAKE2b-256 output size 32 is valid");
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize_variable(&mut out).expect("32-byte output");
    out
}

/// Digest of a register vector. Equal vectors give equal digests.
#[must_use]
pub fn register_digest(registers: &[i64]) -> [u8; 32] {
    let bytes: Vec<u8> = registers.iter().flat_map(|r| r.to_le_bytes()).collect();
    blake2b256(&bytes)
}

/// Lowercase hex rendering of a digest.
#[must_use]
pub fn digest_hex(digest: &[u8]) -> String {
    let mut result = String::with_capacity(digest.len() * 2);
    for &b in digest {
        result.push_str(&format!("{:02x}", b));
    }
    result
}
