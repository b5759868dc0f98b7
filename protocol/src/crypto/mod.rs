//! # Cryptographic Primitives for Meridian
//!
//! Everything security-relevant in the consensus core flows through this
//! module: proposal signatures, signing hashes, transaction IDs.
//!
//! We deliberately chose boring, well-audited cryptography:
//!
//! - **Ed25519** for signatures — fast, deterministic, and nobody has
//!   broken it.
//! - **SHA-512-half** for digests — a wide hash truncated to 256 bits,
//!   which gets you length-extension resistance for free.
//! - **SHA-256** where the outside world expects it.
//!
//! Everything here is a thin, type-safe wrapper around audited
//! implementations. If you're tempted to optimize these functions, go read
//! about timing attacks and come back when you've lost the urge.

pub mod hash;
pub mod keys;

// Re-export the things people actually need so they don't have to memorize
// our module hierarchy.
pub use hash::{sha256_array, sha512_half, sha512_half_multi, Hash256};
pub use keys::{KeyError, MeridianKeypair, MeridianPublicKey, MeridianSignature, PeerId};
