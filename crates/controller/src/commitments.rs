//! Commitment hashing and the age-windowed commitment store
//!
//! The commit-reveal protocol hides a desired label behind a Sha256
//! commitment until a minimum age has elapsed, so an observer of the reveal
//! cannot front-run it with a commit-then-reveal of their own.

use crate::errors::*;
use didreg_types::{Label, PublicKey, Secret};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;

/// Domain tag for plain commitments
const COMMITMENT_TAG: &[u8] = b"DIDREG_COMMITMENT_V1";
/// Domain tag for with-config commitments
const COMMITMENT_CONFIG_TAG: &[u8] = b"DIDREG_COMMITMENT_CONFIG_V1";

/// 32-byte commitment digest
pub type CommitmentHash = [u8; 32];

/// Compute the commitment hash for a plain registration
///
/// Deterministic over (label, owner, duration, secret). The label is
/// length-prefixed so adjacent variable-width fields cannot alias.
pub fn make_commitment(
    label: &Label,
    owner: &PublicKey,
    duration: u64,
    secret: &Secret,
) -> CommitmentHash {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_TAG);
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label.as_str().as_bytes());
    hasher.update(owner.as_bytes());
    hasher.update(duration.to_le_bytes());
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

/// Compute the commitment hash for a registration with resolver config
///
/// Domain-separated from [`make_commitment`]: a commitment made for one
/// variant can never be revealed through the other. Duration is not part
/// of this variant's preimage.
pub fn make_commitment_with_config(
    label: &Label,
    owner: &PublicKey,
    secret: &Secret,
    resolver: &PublicKey,
    referral: &PublicKey,
) -> CommitmentHash {
    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_CONFIG_TAG);
    hasher.update((label.len() as u64).to_le_bytes());
    hasher.update(label.as_str().as_bytes());
    hasher.update(owner.as_bytes());
    hasher.update(secret.as_bytes());
    hasher.update(resolver.as_bytes());
    hasher.update(referral.as_bytes());
    hasher.finalize().into()
}

/// Commitment hash → record-time store
///
/// A hash maps to at most one live record time. Entries are created by
/// `put`, consumed by `take_if_valid`, and overwritten only once expired.
#[derive(Debug, Default)]
pub struct CommitmentStore {
    commitments: Arc<RwLock<HashMap<CommitmentHash, u64>>>,
}

impl CommitmentStore {
    /// Create an empty commitment store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a commitment at `now`
    ///
    /// Fails with `AlreadyCommitted` while a live entry exists, i.e. one
    /// younger than `max_age`. Expired entries are overwritten.
    pub fn put(&self, hash: CommitmentHash, now: u64, max_age: u64) -> Result<()> {
        let mut commitments = self.commitments.write();
        if let Some(&recorded_at) = commitments.get(&hash) {
            if now.saturating_sub(recorded_at) < max_age {
                return Err(ControllerError::AlreadyCommitted {
                    hash: hex::encode(hash),
                });
            }
        }
        commitments.insert(hash, now);
        Ok(())
    }

    /// Consume a commitment if its age falls inside `[min_age, max_age]`
    ///
    /// Returns the original record time so a failed reveal can restore the
    /// entry. The check and the delete happen under one write lock.
    pub fn take_if_valid(
        &self,
        hash: CommitmentHash,
        now: u64,
        min_age: u64,
        max_age: u64,
    ) -> Result<u64> {
        let mut commitments = self.commitments.write();
        let recorded_at =
            *commitments
                .get(&hash)
                .ok_or_else(|| ControllerError::CommitmentNotFound {
                    hash: hex::encode(hash),
                })?;

        let age = now.saturating_sub(recorded_at);
        if age < min_age {
            return Err(ControllerError::CommitmentTooNew {
                hash: hex::encode(hash),
                age,
                min_age,
            });
        }
        if age > max_age {
            return Err(ControllerError::CommitmentTooOld {
                hash: hex::encode(hash),
                age,
                max_age,
            });
        }

        commitments.remove(&hash);
        Ok(recorded_at)
    }

    /// Re-insert a consumed commitment after a failed reveal
    pub(crate) fn restore(&self, hash: CommitmentHash, recorded_at: u64) {
        self.commitments.write().insert(hash, recorded_at);
    }

    /// Stored record time for a hash, if any
    pub fn get(&self, hash: &CommitmentHash) -> Option<u64> {
        self.commitments.read().get(hash).copied()
    }
}
