//! Issuer-signature verification for the free-registration path

use crate::errors::*;
use didreg_types::{Label, PublicKey, WhitelistMessage};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};

/// Domain tag for whitelist payloads
const WHITELIST_TAG: &[u8] = b"DIDREG_WHITELIST_V1";

/// Compute the digest the issuer signs for a whitelist authorization
///
/// Binds the approval to one deployment (`chain_id`, `controller_id`) and
/// one (minter, label, label_length, nonce, duration) tuple. The encoding
/// is fixed; changing it is a wire-format break.
pub fn whitelist_payload_digest(
    chain_id: u64,
    controller_id: &PublicKey,
    minter: &PublicKey,
    label: &str,
    label_length: u64,
    nonce: u64,
    duration: u64,
) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(WHITELIST_TAG);
    hasher.update(chain_id.to_le_bytes());
    hasher.update(controller_id.as_bytes());
    hasher.update(minter.as_bytes());
    hasher.update(label_length.to_le_bytes());
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label.as_bytes());
    hasher.update(nonce.to_le_bytes());
    hasher.update(duration.to_le_bytes());
    hasher.finalize().into()
}

/// Verifies whitelist messages against the protocol-configured issuer key
#[derive(Debug, Clone)]
pub struct WhitelistVerifier {
    issuer: VerifyingKey,
    chain_id: u64,
    controller_id: PublicKey,
}

impl WhitelistVerifier {
    /// Create a verifier bound to one issuer and one deployment
    pub fn new(issuer: VerifyingKey, chain_id: u64, controller_id: PublicKey) -> Self {
        Self {
            issuer,
            chain_id,
            controller_id,
        }
    }

    /// Check that the issuer signed this message for the presented label
    ///
    /// The payload digest is recomputed from the revealed label, so a
    /// message replayed against any other label fails verification. Fails
    /// with `InvalidSignature` when the signature is malformed or was not
    /// produced by the issuer over this exact payload.
    pub fn verify_signature(&self, message: &WhitelistMessage, label: &Label) -> Result<()> {
        if message.signature.len() != 64 {
            return Err(ControllerError::InvalidSignature);
        }
        let signature = Signature::from_slice(&message.signature)
            .map_err(|_| ControllerError::InvalidSignature)?;

        let digest = whitelist_payload_digest(
            self.chain_id,
            &self.controller_id,
            &message.minter,
            label.as_str(),
            message.label_length,
            message.nonce,
            message.duration,
        );
        self.issuer
            .verify(&digest, &signature)
            .map_err(|_| ControllerError::InvalidSignature)
    }

    /// Check the presented label against the approved length class
    ///
    /// Prevents a short-label approval from being claimed against a longer,
    /// pricier label.
    pub fn check_label_length(&self, message: &WhitelistMessage, label: &Label) -> Result<()> {
        if message.label_length != label.len() as u64 {
            return Err(ControllerError::LabelLengthMismatch {
                label: label.as_str().to_string(),
                actual: label.len() as u64,
                approved: message.label_length,
            });
        }
        Ok(())
    }
}
