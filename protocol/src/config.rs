//! # Protocol Configuration & Constants
//!
//! Every magic number in Meridian lives here. If you're hardcoding a
//! constant somewhere else, you're doing it wrong and you owe the team
//! coffee.
//!
//! Several of these values are burned into signing hashes that peers must
//! reproduce bit-for-bit. Changing them after launch is somewhere between
//! "difficult" and "career-ending", so choose wisely during devnet.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Hash Prefixes
// ---------------------------------------------------------------------------
//
// Each kind of signed or identified object gets a distinct 4-byte prefix
// mixed into its digest. Domain separation the old-fashioned way: a proposal
// signature can never be replayed as anything else, because nothing else
// hashes with "PRP\0" in front.

/// Prefix for the proposal signing hash: "PRP\0". The first 4 bytes of the
/// 72-byte signing preimage (see [`crate::consensus::LedgerProposal`]).
pub const HASH_PREFIX_PROPOSAL: u32 = 0x5052_5000;

/// Prefix for content-derived transaction IDs: "TXN\0".
pub const HASH_PREFIX_TX_ID: u32 = 0x5458_4E00;

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 — deterministic signatures, 128-bit security, no nonce footguns.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Ed25519 secret keys and seeds are 32 bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes. If yours isn't, something
/// has gone terribly wrong.
pub const SIGNATURE_LENGTH: usize = 64;

/// Digest length in bytes. SHA-512-half truncates a 64-byte digest to 32.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Exact size of the proposal signing preimage:
/// `magic:4 | propose_seq:4 | previous_ledger:32 | position:32`.
pub const PROPOSAL_PREIMAGE_LENGTH: usize = 72;

// ---------------------------------------------------------------------------
// Transaction Pool
// ---------------------------------------------------------------------------

/// Default maximum number of candidate transactions the pool will hold.
/// Insertion beyond this is rejected outright — the pool never evicts an
/// existing candidate to make room.
pub const DEFAULT_POOL_CAPACITY: usize = 10_000;

/// How often the node's scheduler should call [`crate::mempool::TxPool::timer_entry`]
/// to reconcile a lagging pool against the canonical chain.
pub const POOL_SYNC_INTERVAL: Duration = Duration::from_secs(1);
