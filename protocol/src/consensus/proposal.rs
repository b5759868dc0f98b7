//! # Ledger Proposals
//!
//! A proposal is one participant's signed claim: "building on ledger P, the
//! next transaction set should be X." The agreement protocol upstream
//! collects these from peers; this module defines the object itself —
//! construction, the deterministic signing hash, signing, verification, and
//! the one sanctioned way to move a proposal forward.
//!
//! ## The signing hash
//!
//! The signed message is never the proposal struct. It is a fixed 72-byte
//! preimage, hashed with SHA-512-half:
//!
//! ```text
//! magic:4 ("PRP\0") | propose_seq:4 | previous_ledger:32 | position:32
//! ```
//!
//! All integers big-endian, all widths fixed. Peers recompute this layout
//! byte-for-byte, so it is wire format, not an implementation detail.
//!
//! Binding the sequence number into the hash means an old signature cannot
//! be replayed against a newer (or older) position; binding the previous
//! ledger hash means it cannot be replayed across ledgers. Every call to
//! [`LedgerProposal::change_position`] bumps the sequence and therefore
//! invalidates every signature issued before it.

use std::fmt;

use thiserror::Error;

use crate::config::{HASH_PREFIX_PROPOSAL, PROPOSAL_PREIMAGE_LENGTH};
use crate::crypto::{
    sha512_half, Hash256, MeridianKeypair, MeridianPublicKey, MeridianSignature, PeerId,
};

/// Errors from proposal construction and signing.
#[derive(Debug, Error)]
pub enum ProposalError {
    /// The wire bytes did not decode to a valid public key. The proposal is
    /// not constructed at all — no partial object, nothing to clean up.
    #[error("proposal carries invalid public key bytes")]
    InvalidPublicKey,

    /// `sign()` was called on a proposal received from a peer. Only
    /// self-authored proposals hold the private key.
    #[error("cannot sign a proposal without a private key")]
    NoPrivateKey,

    /// The signing primitive itself reported failure. Practically
    /// unreachable with a well-formed Ed25519 key, but never swallowed.
    #[error("signing primitive failed")]
    SigningFailed,
}

/// A consensus position proposal.
///
/// Two construction paths, one type:
///
/// - [`LedgerProposal::from_peer`] for proposals received off the wire.
///   These can be verified but not signed.
/// - [`LedgerProposal::from_seed`] for this node's own proposal. Holds the
///   private key; starts at sequence 0.
///
/// The signing hash is a pure function of `(magic, propose_seq,
/// previous_ledger, position)` — proposals with identical tuples are
/// indistinguishable to verification no matter how they were built.
pub struct LedgerProposal {
    previous_ledger: Hash256,
    position: Hash256,
    propose_seq: u32,
    public_key: MeridianPublicKey,
    /// Present only for self-authored proposals. Never serialized.
    keypair: Option<MeridianKeypair>,
    peer_id: PeerId,
}

impl LedgerProposal {
    /// Builds a proposal received from a peer.
    ///
    /// The public key bytes are validated up front; malformed or degenerate
    /// encodings fail with [`ProposalError::InvalidPublicKey`] and produce
    /// no object. The peer ID is derived from the parsed key.
    pub fn from_peer(
        public_key_bytes: &[u8],
        propose_seq: u32,
        position: Hash256,
        previous_ledger: Hash256,
    ) -> Result<Self, ProposalError> {
        let public_key = MeridianPublicKey::try_from_slice(public_key_bytes)
            .map_err(|_| ProposalError::InvalidPublicKey)?;
        let peer_id = public_key.peer_id();

        Ok(Self {
            previous_ledger,
            position,
            propose_seq,
            public_key,
            keypair: None,
            peer_id,
        })
    }

    /// Builds this node's own proposal from its identity seed.
    ///
    /// Key derivation is deterministic, so a restarted node with the same
    /// seed speaks with the same identity. `propose_seq` starts at 0 and
    /// only ever moves through [`change_position`](Self::change_position).
    pub fn from_seed(seed: &[u8; 32], previous_ledger: Hash256, position: Hash256) -> Self {
        let keypair = MeridianKeypair::from_seed(seed);
        let public_key = keypair.public_key();
        let peer_id = public_key.peer_id();

        Self {
            previous_ledger,
            position,
            propose_seq: 0,
            public_key,
            keypair: Some(keypair),
            peer_id,
        }
    }

    /// Computes the deterministic signing hash.
    ///
    /// Serializes the 72-byte preimage in fixed order — magic, sequence,
    /// previous ledger, position — and applies SHA-512-half. Pure function,
    /// no side effects; call it as often as you like.
    pub fn signing_hash(&self) -> Hash256 {
        let mut preimage = Vec::with_capacity(PROPOSAL_PREIMAGE_LENGTH);
        preimage.extend_from_slice(&HASH_PREFIX_PROPOSAL.to_be_bytes());
        preimage.extend_from_slice(&self.propose_seq.to_be_bytes());
        preimage.extend_from_slice(self.previous_ledger.as_bytes());
        preimage.extend_from_slice(self.position.as_bytes());
        debug_assert_eq!(preimage.len(), PROPOSAL_PREIMAGE_LENGTH);

        sha512_half(&preimage)
    }

    /// Signs the current signing hash with this node's private key.
    ///
    /// Fails with [`ProposalError::NoPrivateKey`] on a peer-constructed
    /// proposal, and with [`ProposalError::SigningFailed`] if the primitive
    /// reports failure — a broken signature is surfaced, never broadcast.
    pub fn sign(&self) -> Result<MeridianSignature, ProposalError> {
        let keypair = self.keypair.as_ref().ok_or(ProposalError::NoPrivateKey)?;
        keypair
            .try_sign(self.signing_hash().as_bytes())
            .map_err(|_| ProposalError::SigningFailed)
    }

    /// Verifies a signature against the current signing hash.
    ///
    /// No side effects. Note that "current" matters: a signature issued
    /// before a [`change_position`](Self::change_position) call verifies
    /// against the *old* hash and will fail here, by design.
    pub fn check_sign(&self, signature: &MeridianSignature) -> bool {
        self.public_key
            .verify(self.signing_hash().as_bytes(), signature)
    }

    /// Moves the proposal to a new position.
    ///
    /// Sets the position hash and increments `propose_seq` by exactly one.
    /// Nothing else changes. This is the only sanctioned way to advance a
    /// proposal; the sequence bump folds into the signing hash and
    /// invalidates all previously issued signatures.
    pub fn change_position(&mut self, new_position: Hash256) {
        self.position = new_position;
        self.propose_seq += 1;
    }

    /// The hash of the ledger this proposal builds on.
    pub fn previous_ledger(&self) -> Hash256 {
        self.previous_ledger
    }

    /// The proposed transaction-set hash.
    pub fn position(&self) -> Hash256 {
        self.position
    }

    /// How many times this proposal has changed position. 0 for a fresh
    /// self-authored proposal.
    pub fn propose_seq(&self) -> u32 {
        self.propose_seq
    }

    /// The signer's public key.
    pub fn public_key(&self) -> &MeridianPublicKey {
        &self.public_key
    }

    /// The signer's stable peer identifier.
    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    /// `true` iff this proposal holds the private key and can sign.
    pub fn is_ours(&self) -> bool {
        self.keypair.is_some()
    }
}

impl fmt::Debug for LedgerProposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The keypair stays out of debug output entirely.
        f.debug_struct("LedgerProposal")
            .field("peer_id", &self.peer_id)
            .field("propose_seq", &self.propose_seq)
            .field("previous_ledger", &self.previous_ledger)
            .field("position", &self.position)
            .field("ours", &self.keypair.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(tag: &[u8]) -> Hash256 {
        sha512_half(tag)
    }

    const SEED: [u8; 32] = [7u8; 32];

    // -- Construction -------------------------------------------------------

    #[test]
    fn self_proposal_starts_at_sequence_zero() {
        let p = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        assert_eq!(p.propose_seq(), 0);
        assert!(p.is_ours());
    }

    #[test]
    fn peer_proposal_carries_given_sequence() {
        let ours = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        let theirs = LedgerProposal::from_peer(
            ours.public_key().as_bytes(),
            5,
            h(b"pos"),
            h(b"prev"),
        )
        .unwrap();
        assert_eq!(theirs.propose_seq(), 5);
        assert!(!theirs.is_ours());
    }

    #[test]
    fn peer_proposal_rejects_malformed_key() {
        let err = LedgerProposal::from_peer(&[0xFFu8; 32], 0, h(b"pos"), h(b"prev"));
        assert!(matches!(err, Err(ProposalError::InvalidPublicKey)));

        let err = LedgerProposal::from_peer(&[1, 2, 3], 0, h(b"pos"), h(b"prev"));
        assert!(matches!(err, Err(ProposalError::InvalidPublicKey)));
    }

    #[test]
    fn peer_id_matches_public_key_derivation() {
        let p = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        assert_eq!(p.peer_id(), p.public_key().peer_id());
    }

    // -- Signing hash -------------------------------------------------------

    #[test]
    fn signing_hash_matches_hand_serialized_preimage() {
        // The 72-byte layout is wire format. Serialize it by hand and make
        // sure the implementation agrees, byte for byte.
        let prev = h(b"prev");
        let pos = h(b"pos");
        let p = LedgerProposal::from_seed(&SEED, prev, pos);

        let mut preimage = Vec::new();
        preimage.extend_from_slice(&0x5052_5000u32.to_be_bytes());
        preimage.extend_from_slice(&0u32.to_be_bytes());
        preimage.extend_from_slice(prev.as_bytes());
        preimage.extend_from_slice(pos.as_bytes());
        assert_eq!(preimage.len(), 72);

        assert_eq!(p.signing_hash(), sha512_half(&preimage));
    }

    #[test]
    fn signing_hash_is_construction_independent() {
        // Same (seq, prev, position) tuple, different construction paths:
        // identical signing hashes. Verification cannot tell them apart.
        let ours = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        let theirs = LedgerProposal::from_peer(
            ours.public_key().as_bytes(),
            0,
            h(b"pos"),
            h(b"prev"),
        )
        .unwrap();

        assert_eq!(ours.signing_hash(), theirs.signing_hash());
    }

    #[test]
    fn signing_hash_depends_on_every_field() {
        let base = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));

        let other_prev = LedgerProposal::from_seed(&SEED, h(b"prev2"), h(b"pos"));
        assert_ne!(base.signing_hash(), other_prev.signing_hash());

        let other_pos = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos2"));
        assert_ne!(base.signing_hash(), other_pos.signing_hash());

        let mut other_seq = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        other_seq.change_position(h(b"pos"));
        assert_ne!(base.signing_hash(), other_seq.signing_hash());
    }

    // -- Sign / verify ------------------------------------------------------

    #[test]
    fn sign_verify_roundtrip() {
        let p = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        let sig = p.sign().unwrap();
        assert!(p.check_sign(&sig));
    }

    #[test]
    fn peer_verifies_our_signature() {
        // The full wire scenario: we sign, the peer reconstructs the
        // proposal from wire fields and verifies.
        let ours = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        let sig = ours.sign().unwrap();

        let theirs = LedgerProposal::from_peer(
            ours.public_key().as_bytes(),
            ours.propose_seq(),
            ours.position(),
            ours.previous_ledger(),
        )
        .unwrap();
        assert!(theirs.check_sign(&sig));
    }

    #[test]
    fn peer_proposal_cannot_sign() {
        let ours = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos"));
        let theirs =
            LedgerProposal::from_peer(ours.public_key().as_bytes(), 0, h(b"pos"), h(b"prev"))
                .unwrap();
        assert!(matches!(theirs.sign(), Err(ProposalError::NoPrivateKey)));
    }

    #[test]
    fn old_signature_dies_with_the_position() {
        let mut p = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"pos-x"));
        let sig = p.sign().unwrap();
        assert!(p.check_sign(&sig));

        p.change_position(h(b"pos-y"));
        assert!(!p.check_sign(&sig));

        // A fresh signature over the new position verifies again.
        let sig2 = p.sign().unwrap();
        assert!(p.check_sign(&sig2));
    }

    // -- change_position ----------------------------------------------------

    #[test]
    fn change_position_increments_by_exactly_one() {
        let mut p = LedgerProposal::from_seed(&SEED, h(b"prev"), h(b"a"));
        let prev_ledger = p.previous_ledger();

        p.change_position(h(b"b"));
        assert_eq!(p.propose_seq(), 1);
        assert_eq!(p.position(), h(b"b"));

        p.change_position(h(b"c"));
        assert_eq!(p.propose_seq(), 2);

        // Only the position and sequence move.
        assert_eq!(p.previous_ledger(), prev_ledger);
    }
}
