//! Per-minter nonce ledger for the whitelist path

use crate::errors::*;
use didreg_types::PublicKey;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

/// Tracks which (minter, nonce) pairs have been consumed
///
/// Nonces are scoped per-minter, so independent minters holding the same
/// nonce value never collide. A consumed pair is permanently inert through
/// the public API.
#[derive(Debug, Default)]
pub struct NonceLedger {
    used: Arc<RwLock<HashSet<(PublicKey, u64)>>>,
}

impl NonceLedger {
    /// Create an empty nonce ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a (minter, nonce) pair has been consumed
    pub fn is_used(&self, minter: &PublicKey, nonce: u64) -> bool {
        self.used.read().contains(&(*minter, nonce))
    }

    /// Consume a (minter, nonce) pair
    ///
    /// The check and the insert happen under one write lock.
    pub fn mark_used(&self, minter: &PublicKey, nonce: u64) -> Result<()> {
        let mut used = self.used.write();
        if !used.insert((*minter, nonce)) {
            return Err(ControllerError::NonceAlreadyUsed {
                minter: minter.to_string(),
                nonce,
            });
        }
        Ok(())
    }

    /// Release a pair consumed earlier in a failed operation
    pub(crate) fn unmark(&self, minter: &PublicKey, nonce: u64) {
        self.used.write().remove(&(*minter, nonce));
    }
}
