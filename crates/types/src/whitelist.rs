//! Issuer-signed whitelist messages for free registration

use crate::keys::PublicKey;
use serde::{Deserialize, Serialize};

/// Off-chain issued authorization for one free registration
///
/// The issuer signs `(chain_id, controller_id, minter, label, label_length,
/// nonce, duration)`; the controller verifies the signature against its
/// configured issuer key and consumes the `(minter, nonce)` pair exactly
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistMessage {
    /// Account the registration is issued to
    pub minter: PublicKey,
    /// Approved label
    pub label: String,
    /// Byte length of the approved label
    pub label_length: u64,
    /// Per-minter replay nonce
    pub nonce: u64,
    /// Registration duration in seconds
    pub duration: u64,
    /// 64-byte Ed25519 issuer signature
    pub signature: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_json_round_trip() {
        let message = WhitelistMessage {
            minter: PublicKey::new([1u8; 32]),
            label: "alice".to_string(),
            label_length: 5,
            nonce: 7,
            duration: 86400 * 365,
            signature: vec![0u8; 64],
        };

        let json = serde_json::to_string(&message).unwrap();
        let decoded: WhitelistMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, message);
    }
}
