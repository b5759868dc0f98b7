//! # Consensus Primitives
//!
//! The authentication layer of the agreement protocol: signed ledger
//! position proposals. The surrounding round structure — how many proposals
//! constitute consensus, timeout schedules, avalanche thresholds — lives in
//! the node, not here. This module only guarantees that a proposal you
//! verified really was issued, at that sequence, for that position, by the
//! peer it claims.

pub mod proposal;

pub use proposal::{LedgerProposal, ProposalError};
