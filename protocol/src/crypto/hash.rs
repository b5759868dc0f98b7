//! # Hashing Utilities
//!
//! Meridian's digest of record is **SHA-512-half**: SHA-512, truncated to
//! its first 32 bytes. It shows up everywhere a 256-bit identifier is
//! needed — proposal signing hashes, transaction IDs, ledger hashes.
//!
//! ## Why SHA-512-half and not plain SHA-256?
//!
//! Two reasons, one practical and one historical:
//!
//! 1. On 64-bit hardware SHA-512 is *faster* than SHA-256 for short inputs —
//!    it chews 64-bit words natively.
//! 2. Truncating a wide digest kills length-extension attacks dead. SHA-256
//!    alone is vulnerable; half of SHA-512 is not. You get the safety of a
//!    double-hash construction for the price of a single pass.
//!
//! Plain SHA-256 is kept around for interoperability with the rest of the
//! world, and for deriving peer IDs where compatibility with external
//! tooling matters more than speed.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

// ---------------------------------------------------------------------------
// Hash256 — the universal 32-byte identifier
// ---------------------------------------------------------------------------

/// A 256-bit hash value.
///
/// Used for ledger hashes, transaction IDs, proposal positions, and signing
/// hashes alike. It is a plain value type: `Copy`, totally ordered, and
/// cheap to compare — which matters, because the mempool keys a `BTreeMap`
/// with these.
///
/// The all-zero value doubles as the conventional "empty/untracked"
/// sentinel (see [`Hash256::ZERO`]); no real digest ever collides with it
/// in practice, and consensus code never treats it as a valid ledger.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Hash256([u8; 32]);

impl Hash256 {
    /// The all-zero hash, used as the "nothing here" sentinel.
    pub const ZERO: Hash256 = Hash256([0u8; 32]);

    /// Wraps raw digest bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `true` iff this is the all-zero sentinel.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a hex-encoded hash string.
    ///
    /// Returns an error if the hex is malformed or the wrong length.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(hex::FromHexError::OddLength);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({}…)", &self.to_hex()[..16])
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

// ---------------------------------------------------------------------------
// Digest functions
// ---------------------------------------------------------------------------

/// Compute SHA-512-half: SHA-512 truncated to its first 32 bytes.
///
/// The workhorse digest of the protocol. Deterministic, length-extension
/// resistant, and fast on 64-bit hardware.
///
/// # Example
///
/// ```
/// use meridian_protocol::crypto::sha512_half;
///
/// let h = sha512_half(b"meridian");
/// assert_eq!(h.as_bytes().len(), 32);
/// ```
pub fn sha512_half(data: &[u8]) -> Hash256 {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let wide = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&wide[..32]);
    Hash256::from_bytes(out)
}

/// SHA-512-half over multiple byte slices without concatenation overhead.
///
/// Feeding parts sequentially into the hasher gives the same result as
/// hashing their concatenation, minus the temporary buffer. Used for
/// composite preimages like `(prefix || payload)`.
pub fn sha512_half_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let wide = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&wide[..32]);
    Hash256::from_bytes(out)
}

/// Compute the SHA-256 hash and return a fixed-size array.
///
/// Kept for external compatibility and peer-ID derivation. For
/// Meridian-internal identifiers, prefer [`sha512_half`].
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}
