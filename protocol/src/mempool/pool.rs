//! The candidate transaction pool.
//!
//! Thread-safe pool of transactions awaiting ledger inclusion. Candidates
//! are held in arrival order for proposal selection, indexed by ID for
//! removal without a scan, and shadowed by an *avoid set* of IDs already
//! offered to the proposal builder — so two consecutive selections never
//! hand out the same transaction.
//!
//! ## Design
//!
//! - One owned inner state behind a single `parking_lot::Mutex`. Every
//!   public operation takes the lock for its whole body and does no I/O
//!   inside it, so operations are mutually atomic and the lock is never
//!   held across anything slow.
//! - `BTreeMap<OrderKey, Transaction>` carries the selection order
//!   (arrival, then ID — deterministic and total); `HashMap<TxId, OrderKey>`
//!   is the locator index. The two move in lockstep: `|entries| == |index|`
//!   always.
//! - The ledger store is consulted only by [`TxPool::timer_entry`], and
//!   only *outside* the lock; the result feeds a separately-locked
//!   [`TxPool::remove_txs`] call.
//! - At capacity the pool rejects. It never evicts a candidate to make
//!   room — eviction under consensus load reorders what peers see, and a
//!   full pool is the submitter's problem, not the proposer's.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info, trace, warn};

use crate::config::DEFAULT_POOL_CAPACITY;
use crate::crypto::Hash256;
use crate::ledger::LedgerReader;
use crate::mempool::sync::SyncStatus;
use crate::transaction::{Transaction, TxId};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable parameters for pool behaviour.
#[derive(Debug, Clone)]
pub struct TxPoolConfig {
    /// Maximum number of candidates the pool will hold. Insertions beyond
    /// this fail with [`TxPoolError::PoolFull`]; nothing is ever evicted.
    pub capacity: usize,
}

impl Default for TxPoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
        }
    }
}

// ---------------------------------------------------------------------------
// OrderKey — selection-order key
// ---------------------------------------------------------------------------

/// Composite key for the candidate ordering.
///
/// Candidates are offered oldest-first. The arrival counter is unique per
/// pool instance, which already guarantees a total order; the transaction
/// ID rides along as a tiebreaker so the order stays total even if the
/// counter semantics ever change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct OrderKey {
    arrival: u64,
    id: TxId,
}

// ---------------------------------------------------------------------------
// TxPoolError
// ---------------------------------------------------------------------------

/// Errors returned by pool operations.
///
/// `PoolFull` and `AlreadyPresent` are ordinary business outcomes the
/// submitter handles. `IndexCorruption` is a broken internal invariant:
/// fatal to the operation, logged at error severity, and never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxPoolError {
    /// The pool is at capacity. The candidate was not inserted and nothing
    /// was evicted.
    #[error("transaction pool is full ({capacity} candidates)")]
    PoolFull { capacity: usize },

    /// A candidate with the same ID is already pooled. No change was made.
    #[error("transaction {id} is already in the pool")]
    AlreadyPresent { id: TxId },

    /// The locator index disagreed with the candidate store. This is a
    /// programming bug, not user error; the structural insertion has been
    /// rolled back.
    #[error("pool index inconsistent for transaction {id}")]
    IndexCorruption { id: TxId },
}

// ---------------------------------------------------------------------------
// TxPool
// ---------------------------------------------------------------------------

/// Everything the lock guards. All four structures plus the sync window
/// mutate together or not at all.
struct PoolInner {
    /// Candidates in selection order.
    entries: BTreeMap<OrderKey, Transaction>,
    /// Locator index: ID → ordering key. Mirrors `entries` exactly.
    index: HashMap<TxId, OrderKey>,
    /// IDs already offered via `top_transactions` (or marked through
    /// `update_avoid`) and not to be offered again.
    avoid: HashSet<TxId>,
    /// Monotonic arrival counter feeding `OrderKey`.
    arrival: u64,
    /// The ledger-sequence window for which this pool's view is valid.
    sync: SyncStatus,
}

impl PoolInner {
    /// Removes one candidate from all three structures. Returns `false`
    /// if the ID was not pooled.
    fn evict(&mut self, id: &TxId) -> bool {
        match self.index.remove(id) {
            Some(key) => {
                self.entries.remove(&key);
                self.avoid.remove(id);
                true
            }
            None => false,
        }
    }
}

/// The shared, capacity-bounded transaction pool.
///
/// Concurrently touched by the submission path (`insert_tx`), the proposal
/// builder (`top_transactions`, `update_avoid`), ledger close
/// (`remove_txs`) and the reconciliation timer (`timer_entry`). Each
/// operation is atomic with respect to every other.
pub struct TxPool {
    inner: Mutex<PoolInner>,
    capacity: usize,
    /// Injected ledger lookup; consulted by the timer, never under the lock.
    ledger: Arc<dyn LedgerReader>,
}

impl fmt::Debug for TxPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("TxPool")
            .field("len", &inner.entries.len())
            .field("avoid", &inner.avoid.len())
            .field("capacity", &self.capacity)
            .field("sync", &inner.sync)
            .finish()
    }
}

impl TxPool {
    /// Creates a pool with the given configuration and ledger lookup.
    pub fn new(config: TxPoolConfig, ledger: Arc<dyn LedgerReader>) -> Self {
        Self {
            inner: Mutex::new(PoolInner {
                entries: BTreeMap::new(),
                index: HashMap::new(),
                avoid: HashSet::new(),
                arrival: 0,
                sync: SyncStatus::new(),
            }),
            capacity: config.capacity,
            ledger,
        }
    }

    /// Adds a candidate transaction observed at ledger sequence
    /// `ledger_seq`.
    ///
    /// Checks, in order: capacity (full pools reject, never evict), then
    /// duplicate ID. On the first insertion into an empty pool the sync
    /// window opens at `ledger_seq`.
    ///
    /// The `IndexCorruption` arm guards the `|entries| == |index|`
    /// invariant: if the locator index already held a binding for an ID the
    /// candidate store did not know, the structural insertion is rolled
    /// back and the fault is surfaced instead of absorbed.
    pub fn insert_tx(&self, tx: Transaction, ledger_seq: u32) -> Result<(), TxPoolError> {
        let id = tx.id();
        let mut inner = self.inner.lock();

        if inner.entries.len() >= self.capacity {
            warn!(tx = %id, capacity = self.capacity, "pool full, insert rejected");
            return Err(TxPoolError::PoolFull {
                capacity: self.capacity,
            });
        }

        if inner.index.contains_key(&id) {
            trace!(tx = %id, "inserting an existing candidate, no change");
            return Err(TxPoolError::AlreadyPresent { id });
        }

        let key = OrderKey {
            arrival: inner.arrival,
            id,
        };
        inner.entries.insert(key, tx);

        if let Some(stale) = inner.index.insert(id, key) {
            // The index held a binding the candidate store didn't. Roll the
            // structural insert back and restore the old binding so the two
            // stay in lockstep even while broken.
            inner.entries.remove(&key);
            inner.index.insert(id, stale);
            error!(tx = %id, "locator index inconsistent with candidate store");
            return Err(TxPoolError::IndexCorruption { id });
        }

        inner.arrival += 1;
        inner.sync.note_first_insert(ledger_seq);

        trace!(tx = %id, ledger_seq, "inserted new candidate");
        debug_assert_eq!(inner.entries.len(), inner.index.len());
        Ok(())
    }

    /// Selects up to `limit` candidate IDs for the next proposal.
    ///
    /// Scans candidates in selection order, skipping anything already in
    /// the avoid set. Every returned ID is added to the avoid set before
    /// this call returns, so an immediately following call yields a
    /// disjoint set — "don't re-propose what I just proposed". Returns the
    /// empty set once all non-avoided candidates are exhausted. Never
    /// blocks on anything but the pool lock, never errors.
    pub fn top_transactions(&self, limit: usize) -> HashSet<TxId> {
        let mut inner = self.inner.lock();

        info!(
            candidates = inner.entries.len(),
            avoid = inner.avoid.len(),
            "selecting proposal candidates"
        );

        let mut selected = HashSet::new();
        for key in inner.entries.keys() {
            if selected.len() >= limit {
                break;
            }
            if !inner.avoid.contains(&key.id) {
                selected.insert(key.id);
            }
        }
        inner.avoid.extend(selected.iter().copied());

        selected
    }

    /// Marks transactions seen in a competing proposal as already offered.
    ///
    /// Every ID in `observed` that is currently pooled joins the avoid set;
    /// IDs the pool doesn't hold are ignored. Nothing is removed — the
    /// candidates stay pooled in case the competing proposal loses.
    ///
    /// Applies unconditionally on every call. Whether repeat applications
    /// within a short window should be throttled is an unresolved policy
    /// question; until someone resolves it, the honest behavior is no
    /// throttle at all.
    pub fn update_avoid(&self, observed: &[TxId]) {
        let mut inner = self.inner.lock();
        for id in observed {
            if inner.index.contains_key(id) {
                inner.avoid.insert(*id);
            }
        }
    }

    /// Retires the transactions confirmed by a closed ledger.
    ///
    /// Every confirmed ID found in the pool is removed from candidates,
    /// index, and avoid set in one step; IDs the pool never held are
    /// skipped. Then the sync window advances: it resets entirely if the
    /// pool drained, and otherwise records `ledger_seq` and remembers
    /// `parent_hash` so a later [`timer_entry`](Self::timer_entry) can walk
    /// back to a missed ancestor.
    pub fn remove_txs(&self, confirmed: &[TxId], ledger_seq: u32, parent_hash: Hash256) {
        let mut inner = self.inner.lock();

        info!(ledger_seq, confirmed = confirmed.len(), "removing confirmed transactions");

        for id in confirmed {
            if !inner.evict(id) {
                // Expected for most of a ledger's transaction set — the
                // pool only ever held the slice submitted through us.
                debug!(tx = %id, "confirmed transaction not pooled, skipping");
            }
        }

        debug_assert_eq!(inner.entries.len(), inner.index.len());

        if inner.entries.is_empty() {
            inner.sync.reset();
            return;
        }

        inner.sync.advance(ledger_seq, parent_hash);
    }

    /// Removes a single transaction, wherever it appears.
    ///
    /// A no-op (logged at warn — the caller believed it was pooled) if the
    /// ID is absent. Resets the sync window if this drained the pool.
    pub fn remove_tx(&self, id: &TxId) {
        let mut inner = self.inner.lock();

        if !inner.evict(id) {
            warn!(tx = %id, "remove requested for transaction not in pool");
        }

        if inner.entries.is_empty() {
            inner.sync.reset();
        }
    }

    /// `true` while the pool has not observed a confirmation beyond the
    /// ledger it expects to process next — i.e. it has not fallen behind
    /// the chain.
    pub fn is_available(&self) -> bool {
        self.inner.lock().sync.is_current()
    }

    /// Periodic reconciliation, driven by the node's scheduler.
    ///
    /// When the pool has fallen behind, looks up the remembered ancestor
    /// ledger and, if the node has it locally, flushes its confirmed set
    /// through [`remove_txs`](Self::remove_txs). The lookup runs outside
    /// the pool lock: holding it across a store consultation would stall
    /// every submitter, and feeding the result through the normal removal
    /// entry point avoids any lock re-entrancy. If the ledger isn't known
    /// yet this tick is a no-op and the next one retries.
    pub fn timer_entry(&self) {
        let prev_hash = {
            let inner = self.inner.lock();
            if inner.sync.is_current() {
                return;
            }
            inner.sync.prev_hash
        };

        if prev_hash.is_zero() {
            return;
        }

        // Outside the lock from here on.
        if let Some(ledger) = self.ledger.ledger_by_hash(&prev_hash) {
            info!(
                ledger_seq = ledger.sequence,
                hash = %ledger.hash,
                "pool found missed ancestor ledger"
            );
            self.remove_txs(&ledger.tx_ids, ledger.sequence, ledger.parent_hash);
        }
    }

    /// Number of pooled candidates.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// `true` if the pool holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// `true` if a candidate with this ID is pooled.
    pub fn contains(&self, id: &TxId) -> bool {
        self.inner.lock().index.contains_key(id)
    }

    /// Number of IDs currently in the avoid set.
    pub fn avoid_len(&self) -> usize {
        self.inner.lock().avoid.len()
    }

    /// A snapshot of the sync window.
    pub fn sync_status(&self) -> SyncStatus {
        self.inner.lock().sync
    }
}
