//! # Key Management
//!
//! Ed25519 keypairs for Meridian node identities.
//!
//! A node that participates in consensus holds exactly one signing keypair.
//! Its proposals are signed with the private half; peers attribute and
//! verify them through the public half and the [`PeerId`] derived from it.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Key generation uses the OS CSPRNG (`OsRng`). If your OS RNG is broken,
//!   you have bigger problems than Meridian.
//! - Key bytes are never logged. If you add logging to this module, you
//!   will be asked to leave.

use std::fmt;
use std::hash::{Hash, Hasher};

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::sha256_array;

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed — leaking details about
/// key material through error messages is a classic footgun.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("signing operation failed")]
    SigningFailed,
}

// ---------------------------------------------------------------------------
// MeridianKeypair
// ---------------------------------------------------------------------------

/// A node identity keypair wrapping an Ed25519 signing key.
///
/// This is what a validator keeps under lock and key. It never leaves the
/// process, never appears in a serialized proposal, and never gets a
/// `Serialize` impl — exporting secret material should be a deliberate act,
/// not a side effect of shoving a struct into JSON.
pub struct MeridianKeypair {
    signing_key: SigningKey,
}

impl MeridianKeypair {
    /// Generate a fresh keypair using the OS cryptographic RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Constructs a keypair deterministically from a 32-byte seed.
    ///
    /// The seed is used directly as the Ed25519 secret scalar. This is how
    /// a node derives its consensus identity from configured seed material.
    ///
    /// **Warning**: a weak seed makes a weak key. Feed this a proper CSPRNG
    /// or KDF output, nothing less.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// Returns the public half of this identity.
    pub fn public_key(&self) -> MeridianPublicKey {
        MeridianPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// Sign a message, surfacing failure from the underlying primitive.
    ///
    /// Ed25519 signing essentially cannot fail with a well-formed key, but
    /// "essentially" is not "provably", and a signing failure that gets
    /// silently dropped would hand peers an unsigned proposal. So the
    /// fallible path stays fallible all the way up.
    pub fn try_sign(&self, message: &[u8]) -> Result<MeridianSignature, KeyError> {
        let sig = self
            .signing_key
            .try_sign(message)
            .map_err(|_| KeyError::SigningFailed)?;
        Ok(MeridianSignature {
            bytes: sig.to_bytes().to_vec(),
        })
    }

    /// Verify a signature against this keypair's public key.
    pub fn verify(&self, message: &[u8], signature: &MeridianSignature) -> bool {
        self.public_key().verify(message, signature)
    }
}

impl Clone for MeridianKeypair {
    /// Cloning a keypair is allowed but should make you uncomfortable.
    /// Every copy of a private key is another thing to protect.
    fn clone(&self) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&self.signing_key.to_bytes()),
        }
    }
}

impl fmt::Debug for MeridianKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material in debug output. Not even partially.
        write!(f, "MeridianKeypair(pub={})", self.public_key().to_hex())
    }
}

// ---------------------------------------------------------------------------
// MeridianPublicKey
// ---------------------------------------------------------------------------

/// The public half of a node identity, safe to put on the wire.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeridianPublicKey {
    bytes: [u8; 32],
}

impl MeridianPublicKey {
    /// Try to create a public key from a byte slice.
    ///
    /// Validates the length *and* that the bytes decode to a valid Ed25519
    /// point. We don't accept any 32 bytes off the wire — low-order points
    /// and other degenerate encodings are rejected here, once, so the rest
    /// of the consensus code never has to think about them.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != 32 {
            return Err(KeyError::InvalidPublicKey);
        }
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(slice);

        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;

        Ok(Self { bytes })
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Verify a signature against this public key.
    ///
    /// Boolean, not `Result`: callers want yes/no, and we don't distinguish
    /// "bad signature" from "wrong key" — giving attackers a detailed error
    /// oracle is a bad idea.
    pub fn verify(&self, message: &[u8], signature: &MeridianSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let sig_bytes: [u8; 64] = match signature.bytes.as_slice().try_into() {
            Ok(b) => b,
            Err(_) => return false,
        };
        let dalek_sig = DalekSignature::from_bytes(&sig_bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Derives the stable peer identifier for this key.
    ///
    /// Deterministic: the same public key always yields the same [`PeerId`],
    /// which is what lets peers deduplicate and attribute proposals.
    pub fn peer_id(&self) -> PeerId {
        PeerId(sha256_array(&self.bytes))
    }

    /// Hex-encoded representation. 64 characters for 32 bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl Hash for MeridianPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for MeridianPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for MeridianPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MeridianPublicKey({}…)", &self.to_hex()[..16])
    }
}

// ---------------------------------------------------------------------------
// PeerId
// ---------------------------------------------------------------------------

/// A compact, hash-derived identifier for a consensus participant.
///
/// `PeerId = SHA-256(public key bytes)`. Proposals from the same key always
/// carry the same peer ID, so "one proposal per peer per position" is a
/// simple map lookup for the agreement logic upstream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeerId([u8; 32]);

impl PeerId {
    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Base58-encoded representation — the short form used in logs and
    /// operator tooling.
    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.to_base58())
    }
}

// ---------------------------------------------------------------------------
// MeridianSignature
// ---------------------------------------------------------------------------

/// An Ed25519 signature over a message. 64 bytes, deterministic for a given
/// (key, message) pair.
///
/// Stored as `Vec<u8>` for serde compatibility, but always exactly 64 bytes
/// when produced by us. A malformed signature off the wire simply fails
/// verification — no panics, just `false`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeridianSignature {
    bytes: Vec<u8>,
}

impl MeridianSignature {
    /// Create a signature from a raw 64-byte representation.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Wraps arbitrary wire bytes as a signature, without validation.
    /// Verification decides whether they mean anything.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex-encoded signature string. 128 characters for a valid sig.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for MeridianSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        if hex_str.len() >= 128 {
            write!(f, "MeridianSignature({}…{})", &hex_str[..8], &hex_str[120..])
        } else {
            write!(f, "MeridianSignature({})", hex_str)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_produces_working_keypair() {
        let kp = MeridianKeypair::generate();
        let sig = kp.try_sign(b"proposal bytes").unwrap();
        assert!(kp.verify(b"proposal bytes", &sig));
    }

    #[test]
    fn wrong_message_fails_verification() {
        let kp = MeridianKeypair::generate();
        let sig = kp.try_sign(b"correct message").unwrap();
        assert!(!kp.verify(b"wrong message", &sig));
    }

    #[test]
    fn wrong_key_fails_verification() {
        let kp1 = MeridianKeypair::generate();
        let kp2 = MeridianKeypair::generate();
        let sig = kp1.try_sign(b"message").unwrap();
        assert!(!kp2.verify(b"message", &sig));
    }

    #[test]
    fn deterministic_from_seed() {
        let seed = [42u8; 32];
        let kp1 = MeridianKeypair::from_seed(&seed);
        let kp2 = MeridianKeypair::from_seed(&seed);
        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn deterministic_signatures() {
        // Ed25519 is deterministic — same key + same message = same signature.
        let kp = MeridianKeypair::generate();
        let sig1 = kp.try_sign(b"determinism").unwrap();
        let sig2 = kp.try_sign(b"determinism").unwrap();
        assert_eq!(sig1.as_bytes(), sig2.as_bytes());
    }

    #[test]
    fn try_from_slice_accepts_real_key() {
        let kp = MeridianKeypair::generate();
        let pk = MeridianPublicKey::try_from_slice(kp.public_key().as_bytes()).unwrap();
        assert_eq!(pk, kp.public_key());
    }

    #[test]
    fn try_from_slice_rejects_wrong_length() {
        assert!(MeridianPublicKey::try_from_slice(&[0u8; 16]).is_err());
        assert!(MeridianPublicKey::try_from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn try_from_slice_rejects_non_point_bytes() {
        // 32 bytes of 0xFF is not a canonical Ed25519 point encoding.
        assert!(MeridianPublicKey::try_from_slice(&[0xFFu8; 32]).is_err());
    }

    #[test]
    fn peer_id_is_stable_per_key() {
        let kp = MeridianKeypair::generate();
        let a = kp.public_key().peer_id();
        let b = kp.public_key().peer_id();
        assert_eq!(a, b);

        let other = MeridianKeypair::generate();
        assert_ne!(a, other.public_key().peer_id());
    }

    #[test]
    fn malformed_signature_just_fails() {
        let kp = MeridianKeypair::generate();
        let truncated = MeridianSignature::from_slice(&[0u8; 12]);
        assert!(!kp.verify(b"anything", &truncated));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = MeridianKeypair::generate();
        let debug_str = format!("{:?}", kp);
        assert!(debug_str.starts_with("MeridianKeypair(pub="));
        assert!(!debug_str.contains("signing_key"));
    }
}
