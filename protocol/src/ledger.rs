//! The narrow seam between the mempool and the canonical chain.
//!
//! The pool never talks to a storage engine. It asks one question — "do you
//! have the ledger with this hash?" — through [`LedgerReader`], and gets
//! back just enough of a closed ledger to reconcile itself: sequence,
//! parent hash, and the confirmed transaction IDs.
//!
//! The real implementation lives in the node's storage layer.
//! [`LedgerDirectory`] is an in-memory implementation for tests and
//! single-process devnets.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::crypto::Hash256;
use crate::transaction::TxId;

/// The slice of a closed ledger the mempool cares about.
///
/// A closed ledger is final: its transaction set is confirmed and its
/// position in the chain (sequence + parent hash) will never change.
#[derive(Debug, Clone)]
pub struct ClosedLedger {
    /// The ledger's own hash-identifier.
    pub hash: Hash256,
    /// Position in the chain. Strictly increasing along any branch.
    pub sequence: u32,
    /// Hash of the immediately preceding ledger.
    pub parent_hash: Hash256,
    /// IDs of the transactions this ledger confirmed.
    pub tx_ids: Vec<TxId>,
}

/// Read-only lookup into the node's ledger store.
///
/// `Send + Sync` because the pool's timer calls this from whatever thread
/// the scheduler happens to own. Implementations must not block for long —
/// the pool deliberately performs this lookup outside its lock, but the
/// timer tick still waits on it.
pub trait LedgerReader: Send + Sync {
    /// Returns the closed ledger with the given hash, if the node has it
    /// locally. `None` means "not yet" — callers retry, they don't error.
    fn ledger_by_hash(&self, hash: &Hash256) -> Option<ClosedLedger>;
}

/// In-memory [`LedgerReader`] backed by a hash map.
///
/// Enough ledger store for tests and devnet wiring. It holds closed
/// ledgers only; there is no notion of open or validating ledgers here.
#[derive(Debug, Default)]
pub struct LedgerDirectory {
    ledgers: RwLock<HashMap<Hash256, ClosedLedger>>,
}

impl LedgerDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a closed ledger, keyed by its hash.
    pub fn insert(&self, ledger: ClosedLedger) {
        self.ledgers.write().insert(ledger.hash, ledger);
    }

    /// Number of ledgers held.
    pub fn len(&self) -> usize {
        self.ledgers.read().len()
    }

    /// `true` if no ledgers are held.
    pub fn is_empty(&self) -> bool {
        self.ledgers.read().is_empty()
    }
}

impl LedgerReader for LedgerDirectory {
    fn ledger_by_hash(&self, hash: &Hash256) -> Option<ClosedLedger> {
        self.ledgers.read().get(hash).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::sha512_half;

    fn ledger(tag: &[u8], sequence: u32) -> ClosedLedger {
        ClosedLedger {
            hash: sha512_half(tag),
            sequence,
            parent_hash: sha512_half(b"parent"),
            tx_ids: Vec::new(),
        }
    }

    #[test]
    fn lookup_finds_inserted_ledger() {
        let dir = LedgerDirectory::new();
        let l = ledger(b"ledger-100", 100);
        let hash = l.hash;
        dir.insert(l);

        let found = dir.ledger_by_hash(&hash).unwrap();
        assert_eq!(found.sequence, 100);
    }

    #[test]
    fn lookup_misses_unknown_hash() {
        let dir = LedgerDirectory::new();
        assert!(dir.ledger_by_hash(&sha512_half(b"nope")).is_none());
    }
}
