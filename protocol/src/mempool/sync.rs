//! The pool's ledger-sequence window.
//!
//! The pool's contents are only meaningful relative to a range of ledger
//! sequences: transactions inserted since `pool_start_seq`, confirmations
//! processed up to `max_advance_seq`. [`SyncStatus`] tracks that window and
//! nothing else. It is owned exclusively by the pool and mutated only under
//! the pool's lock.
//!
//! ## State machine
//!
//! ```text
//!            first insert                confirmation past the window
//!   Empty ----------------> Tracking --------------------------------> Lagging
//!     ^                        ^   |                                      |
//!     |                        +---+<--- timer flushes missed ancestor ---+
//!     +------------- pool drains to zero (from any state) ---------------+
//! ```
//!
//! `Lagging` means a confirmation arrived for a ledger beyond the one the
//! pool expected to process next — typically because the node validated a
//! ledger whose ancestor it never applied to the pool. The timer path uses
//! `prev_hash` to locate that ancestor and flush it.

use serde::{Deserialize, Serialize};

use crate::crypto::Hash256;

/// Where the pool's window currently stands. See the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncState {
    /// Pool is empty; the window is untracked.
    Empty,
    /// Confirmations are arriving in step with the window.
    Tracking,
    /// A confirmation ran ahead of the window; reconciliation needed.
    Lagging,
}

/// The ledger-sequence window for which the pool's contents are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyncStatus {
    /// Ledger sequence at which the pool most recently became non-empty.
    /// 0 means empty/untracked.
    pub pool_start_seq: u32,
    /// Highest ledger sequence for which a confirmation has been processed
    /// since `pool_start_seq` was set.
    pub max_advance_seq: u32,
    /// Parent hash of the last-processed confirmation; the breadcrumb the
    /// timer follows to locate a missed ancestor ledger.
    pub prev_hash: Hash256,
}

impl SyncStatus {
    /// Returns the all-zero, untracked status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets to the untracked state. Called whenever the pool drains.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Marks the window open at `ledger_seq` if it isn't open already.
    /// Called on the first successful insertion into an empty pool.
    pub fn note_first_insert(&mut self, ledger_seq: u32) {
        if self.pool_start_seq == 0 {
            self.pool_start_seq = ledger_seq;
        }
    }

    /// Records a processed confirmation for `ledger_seq` whose parent is
    /// `parent_hash`.
    ///
    /// Advances `max_advance_seq` monotonically, and slides the window
    /// start past the just-confirmed ledger when the confirmation lands
    /// exactly on it. No-op while untracked — a confirmation against an
    /// unopened window carries no information.
    pub fn advance(&mut self, ledger_seq: u32, parent_hash: Hash256) {
        if self.pool_start_seq == 0 {
            return;
        }

        if self.max_advance_seq < ledger_seq {
            self.max_advance_seq = ledger_seq;
        }

        if ledger_seq == self.pool_start_seq {
            self.pool_start_seq = self.max_advance_seq + 1;
        }

        self.prev_hash = parent_hash;
    }

    /// `true` while no confirmation has run ahead of the window — i.e. the
    /// pool has not fallen behind the chain.
    pub fn is_current(&self) -> bool {
        self.max_advance_seq <= self.pool_start_seq
    }

    /// Classifies the window. `is_current()` is simply "not `Lagging`".
    pub fn state(&self) -> SyncState {
        if self.pool_start_seq == 0 {
            SyncState::Empty
        } else if self.max_advance_seq > self.pool_start_seq {
            SyncState::Lagging
        } else {
            SyncState::Tracking
        }
    }
}
