// Copyright (c) 2026 Meridian Contributors. MIT License.
// See LICENSE for details.

//! # Meridian Protocol — Consensus & Mempool Core
//!
//! The two hard problems of a ledger node live in this crate: agreeing on
//! the next ledger's transaction set, and feeding that agreement without
//! losing track of reality when the chain moves underneath you.
//!
//! - **consensus** — The `LedgerProposal`: a signed assertion of "the next
//!   transaction set is X". Deterministic signing-hash construction,
//!   sequence-bound signatures, and nothing clever. Clever gets you forked.
//! - **mempool** — The `TxPool`: a capacity-bounded, lock-guarded pool of
//!   candidate transactions with an embedded sync window that survives
//!   ledger reorganizations without losing or double-counting anything.
//! - **crypto** — Ed25519 keys and the SHA-512-half digest. Thin, type-safe
//!   wrappers around audited implementations. We do not roll our own.
//! - **ledger** — The narrow seam through which the pool consults the
//!   canonical chain. A trait, not a storage engine.
//! - **transaction** — The minimal transaction record the pool manages:
//!   a content-derived ID and opaque bytes.
//! - **config** — Every protocol constant, in one place, with its reason.
//!
//! What is deliberately *not* here: the Byzantine round structure (how many
//! proposals make consensus), RPC plumbing, key custody, and the storage
//! engine. Those are collaborators, reached through narrow interfaces.
//!
//! ## Design Philosophy
//!
//! 1. Correctness over performance (but we're still fast).
//! 2. Every lock has one owner and every entry point is atomic.
//! 3. Errors are values. "Not found" is not an exception.
//! 4. If it touches consensus, it has tests. Plural.

pub mod config;
pub mod consensus;
pub mod crypto;
pub mod ledger;
pub mod mempool;
pub mod transaction;
