//! Candidate transactions as the pool sees them.
//!
//! The mempool does not interpret transactions. It needs exactly two things
//! from one: a stable, content-derived identifier, and ownership of the
//! bytes so it can hand them back to the proposal builder. Validation,
//! execution, fees — all of that belongs to layers that are not this crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::HASH_PREFIX_TX_ID;
use crate::crypto::{sha512_half_multi, Hash256};

/// A transaction identifier: SHA-512-half over the prefixed payload.
///
/// Content-derived, so the same bytes always map to the same ID no matter
/// which peer submitted them — which is precisely what makes pool
/// deduplication and confirmed-set matching work.
pub type TxId = Hash256;

/// An opaque candidate transaction.
///
/// Equality is by ID. Two transactions with the same payload *are* the same
/// transaction, and the pool will tell you so.
#[derive(Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: TxId,
    payload: Vec<u8>,
}

impl Transaction {
    /// Wraps raw transaction bytes, deriving the canonical ID.
    ///
    /// The ID is `sha512_half("TXN\0" || payload)`. The prefix keeps
    /// transaction IDs in their own hash domain — a payload that happens to
    /// equal some proposal preimage can never collide with its signing hash.
    pub fn new(payload: Vec<u8>) -> Self {
        let id = sha512_half_multi(&[&HASH_PREFIX_TX_ID.to_be_bytes(), &payload]);
        Self { id, payload }
    }

    /// The stable content-derived identifier.
    pub fn id(&self) -> TxId {
        self.id
    }

    /// The raw transaction bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
