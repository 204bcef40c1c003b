//! Registrar controller orchestration
//!
//! Drives the commit-reveal registration flow, the issuer-authorized free
//! registration path, renewals, and the read-only queries. All internal
//! state (commitments, nonces) is owned here; ownership records live in the
//! external registrar.

use crate::commitments::{
    make_commitment, make_commitment_with_config, CommitmentHash, CommitmentStore,
};
use crate::errors::*;
use crate::nonces::NonceLedger;
use crate::services::{Clock, PriceOracle, ReferralHub, Registrar};
use crate::whitelist::WhitelistVerifier;
use didreg_types::{Amount, Label, Price, PublicKey, Secret, WhitelistMessage};
use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Immutable controller configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Youngest age at which a commitment may be revealed (seconds)
    pub min_commitment_age: u64,
    /// Oldest age at which a commitment may be revealed (seconds)
    pub max_commitment_age: u64,
    /// Shortest registration the controller accepts (seconds)
    pub min_registration_duration: u64,
    /// Chain the whitelist issuer signs for
    pub chain_id: u64,
    /// This deployment's identity inside signed whitelist payloads
    pub controller_id: PublicKey,
    /// Trusted whitelist issuer
    pub issuer: VerifyingKey,
}

/// Outcome of a paid registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationReceipt {
    pub label: Label,
    pub owner: PublicKey,
    pub commitment: CommitmentHash,
    pub cost: Amount,
    pub refund: Amount,
    pub expires_at: u64,
}

/// Outcome of a whitelist (free) registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreeRegistrationReceipt {
    pub label: Label,
    pub minter: PublicKey,
    pub nonce: u64,
    pub expires_at: u64,
}

/// Outcome of a renewal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewalReceipt {
    pub label: Label,
    pub cost: Amount,
    pub refund: Amount,
    pub expires_at: u64,
}

/// Name-registration controller for secondary labels under the root name
pub struct RegistrarController {
    config: ControllerConfig,
    clock: Arc<dyn Clock>,
    commitments: CommitmentStore,
    nonces: NonceLedger,
    verifier: WhitelistVerifier,
    registrar: Arc<dyn Registrar>,
    prices: Arc<dyn PriceOracle>,
    referral_hub: Arc<dyn ReferralHub>,
}

impl RegistrarController {
    /// Create a controller over its collaborators
    pub fn new(
        config: ControllerConfig,
        clock: Arc<dyn Clock>,
        registrar: Arc<dyn Registrar>,
        prices: Arc<dyn PriceOracle>,
        referral_hub: Arc<dyn ReferralHub>,
    ) -> Self {
        let verifier = WhitelistVerifier::new(config.issuer, config.chain_id, config.controller_id);
        Self {
            config,
            clock,
            commitments: CommitmentStore::new(),
            nonces: NonceLedger::new(),
            verifier,
            registrar,
            prices,
            referral_hub,
        }
    }

    /// Record a commitment hash
    ///
    /// Fails with `AlreadyCommitted` while a live commitment for the same
    /// hash exists; an expired one is overwritten.
    pub fn commit(&self, hash: CommitmentHash) -> Result<()> {
        let now = self.clock.now();
        self.commitments
            .put(hash, now, self.config.max_commitment_age)?;
        debug!(target: "didreg", "Recorded commitment {} at {}", hex::encode(hash), now);
        Ok(())
    }

    /// Reveal a commitment and register `label` to `owner` for `duration`
    pub async fn register(
        &self,
        label: &Label,
        owner: &PublicKey,
        duration: u64,
        secret: &Secret,
        payment: Amount,
    ) -> Result<RegistrationReceipt> {
        let hash = make_commitment(label, owner, duration, secret);
        self.register_revealed(label, owner, duration, payment, hash, None, None)
            .await
    }

    /// Reveal a with-config commitment: registration plus resolver binding
    /// and referral bookkeeping
    ///
    /// `resolver` and `referral` are part of the commitment preimage; the
    /// zero key means "none", matching what was committed.
    #[allow(clippy::too_many_arguments)]
    pub async fn register_with_config(
        &self,
        label: &Label,
        owner: &PublicKey,
        duration: u64,
        secret: &Secret,
        resolver: PublicKey,
        referral: PublicKey,
        payment: Amount,
    ) -> Result<RegistrationReceipt> {
        let hash = make_commitment_with_config(label, owner, secret, &resolver, &referral);
        self.register_revealed(
            label,
            owner,
            duration,
            payment,
            hash,
            Some(resolver).filter(|r| r != &PublicKey::new([0u8; 32])),
            Some(referral).filter(|r| r != &PublicKey::new([0u8; 32])),
        )
        .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn register_revealed(
        &self,
        label: &Label,
        owner: &PublicKey,
        duration: u64,
        payment: Amount,
        hash: CommitmentHash,
        resolver: Option<PublicKey>,
        referral: Option<PublicKey>,
    ) -> Result<RegistrationReceipt> {
        let now = self.clock.now();
        let recorded_at = self.commitments.take_if_valid(
            hash,
            now,
            self.config.min_commitment_age,
            self.config.max_commitment_age,
        )?;

        // The commitment is consumed; every later failure restores it so a
        // failed reveal can be retried inside the age window.
        let result = self
            .finish_registration(label, owner, duration, payment, hash, resolver, referral)
            .await;
        if result.is_err() {
            self.commitments.restore(hash, recorded_at);
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish_registration(
        &self,
        label: &Label,
        owner: &PublicKey,
        duration: u64,
        payment: Amount,
        hash: CommitmentHash,
        resolver: Option<PublicKey>,
        referral: Option<PublicKey>,
    ) -> Result<RegistrationReceipt> {
        self.validate_duration(duration)?;
        self.validate_label(label)?;

        let price = self.prices.price_of(label, duration).await?;
        let cost = self.require_payment(payment, &price)?;

        let expires_at = self
            .registrar
            .register_ownership(label, owner, duration)
            .await?;

        if let Some(resolver) = resolver {
            self.registrar.bind_resolver(label, &resolver).await?;
        }
        if let Some(referral) = referral {
            self.referral_hub.record_commission(&referral, cost).await?;
        }

        info!(
            target: "didreg",
            "Registered {} to {} until {} (cost {}, commitment {})",
            label,
            owner,
            expires_at,
            cost,
            hex::encode(hash)
        );

        Ok(RegistrationReceipt {
            label: label.clone(),
            owner: *owner,
            commitment: hash,
            cost,
            refund: payment - cost,
            expires_at,
        })
    }

    /// Register `label` to the message's minter for free, authorized by an
    /// issuer signature and consumed exactly once per (minter, nonce)
    pub async fn whitelist_register(
        &self,
        message: &WhitelistMessage,
        label: &Label,
        resolver: Option<PublicKey>,
    ) -> Result<FreeRegistrationReceipt> {
        self.verifier.verify_signature(message, label)?;

        if self.nonces.is_used(&message.minter, message.nonce) {
            return Err(ControllerError::NonceAlreadyUsed {
                minter: message.minter.to_string(),
                nonce: message.nonce,
            });
        }

        self.verifier.check_label_length(message, label)?;
        self.validate_label(label)?;

        // Consume the nonce before any external call; a re-entrant use of
        // the same message is rejected even mid-operation.
        self.nonces.mark_used(&message.minter, message.nonce)?;

        let expires_at = match self
            .registrar
            .register_ownership(label, &message.minter, message.duration)
            .await
        {
            Ok(expires_at) => expires_at,
            Err(err) => {
                // Ownership was never created, so the authorization is
                // still unspent.
                self.nonces.unmark(&message.minter, message.nonce);
                return Err(err);
            }
        };

        if let Some(resolver) = resolver {
            self.registrar.bind_resolver(label, &resolver).await?;
        }

        info!(
            target: "didreg",
            "Whitelist-registered {} to {} until {} (nonce {})",
            label,
            message.minter,
            expires_at,
            message.nonce
        );

        Ok(FreeRegistrationReceipt {
            label: label.clone(),
            minter: message.minter,
            nonce: message.nonce,
            expires_at,
        })
    }

    /// Extend an existing live registration
    pub async fn renew(
        &self,
        label: &Label,
        duration: u64,
        payment: Amount,
    ) -> Result<RenewalReceipt> {
        let price = self.prices.price_of(label, duration).await?;
        let cost = self.require_payment(payment, &price)?;

        let expires_at = self.registrar.renew_ownership(label, duration).await?;

        info!(
            target: "didreg",
            "Renewed {} until {} (cost {})",
            label,
            expires_at,
            cost
        );

        Ok(RenewalReceipt {
            label: label.clone(),
            cost,
            refund: payment - cost,
            expires_at,
        })
    }

    /// Quote the rent for a label over a duration
    pub async fn rent_price(&self, label: &Label, duration: u64) -> Result<Price> {
        self.prices.price_of(label, duration).await
    }

    /// Whether a label is valid and currently unowned or expired
    pub async fn available(&self, label: &Label) -> Result<bool> {
        if !label.is_valid() {
            return Ok(false);
        }
        self.registrar.available(label).await
    }

    /// Stored record time for a commitment hash, if one is live
    pub fn commitments(&self, hash: &CommitmentHash) -> Option<u64> {
        self.commitments.get(hash)
    }

    fn validate_duration(&self, duration: u64) -> Result<()> {
        if duration < self.config.min_registration_duration {
            return Err(ControllerError::DurationTooShort {
                duration,
                min_duration: self.config.min_registration_duration,
            });
        }
        Ok(())
    }

    fn validate_label(&self, label: &Label) -> Result<()> {
        label
            .validate()
            .map_err(|_| ControllerError::LabelInvalid {
                label: label.as_str().to_string(),
            })
    }

    fn require_payment(&self, payment: Amount, price: &Price) -> Result<Amount> {
        let required = price.total();
        if payment < required {
            return Err(ControllerError::InsufficientPayment {
                sent: payment,
                required,
            });
        }
        Ok(required)
    }
}
