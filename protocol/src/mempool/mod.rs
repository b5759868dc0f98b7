//! # Transaction Pool
//!
//! The mempool proper ([`TxPool`]) and its ledger-sequence window
//! ([`SyncStatus`]). The pool feeds candidates into proposal building and
//! retires them as ledgers close; the window tracks whether the pool's
//! view of confirmations is current or lagging behind the chain — and if
//! lagging, where to look to catch up.

pub mod pool;
pub mod sync;

pub use pool::{TxPool, TxPoolConfig, TxPoolError};
pub use sync::{SyncState, SyncStatus};
