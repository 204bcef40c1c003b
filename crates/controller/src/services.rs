//! Collaborator seams: clock, ownership registrar, price oracle, referral hub
//!
//! The controller depends on each external service through a narrow trait so
//! the test suite can substitute in-memory doubles. The stubs here are the
//! same doubles, shipped as library code.

use crate::errors::*;
use async_trait::async_trait;
use didreg_types::{Amount, Label, Price, PublicKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the controller's notion of current time (seconds)
pub trait Clock: Send + Sync + std::fmt::Debug {
    fn now(&self) -> u64;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }
}

/// Settable clock for deterministic age-window tests
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.now.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// The external ownership ledger the controller is an authorized caller of
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Whether the label is unowned or its registration has expired
    async fn available(&self, label: &Label) -> Result<bool>;

    /// Create or overwrite ownership of an available label; returns expiry
    async fn register_ownership(
        &self,
        label: &Label,
        owner: &PublicKey,
        duration: u64,
    ) -> Result<u64>;

    /// Extend a live registration; returns the new expiry
    async fn renew_ownership(&self, label: &Label, duration: u64) -> Result<u64>;

    /// Bind a resolver to a registered label
    async fn bind_resolver(&self, label: &Label, resolver: &PublicKey) -> Result<()>;
}

/// Duration-based pricing consulted, not owned, by the controller
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn price_of(&self, label: &Label, duration: u64) -> Result<Price>;
}

/// Commission bookkeeping for referred registrations
#[async_trait]
pub trait ReferralHub: Send + Sync {
    async fn record_commission(&self, referrer: &PublicKey, amount: Amount) -> Result<()>;
}

/// Ownership record held by the in-memory registrar
#[derive(Debug, Clone)]
pub struct OwnershipRecord {
    pub owner: PublicKey,
    pub expires_at: u64,
}

/// In-memory registrar backed by a label → ownership map
#[derive(Debug)]
pub struct InMemoryRegistrar {
    clock: Arc<dyn Clock>,
    records: Arc<RwLock<HashMap<Label, OwnershipRecord>>>,
}

impl InMemoryRegistrar {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Current ownership record for a label, live or expired
    pub fn record(&self, label: &Label) -> Option<OwnershipRecord> {
        self.records.read().get(label).cloned()
    }

    fn is_live(&self, record: &OwnershipRecord) -> bool {
        record.expires_at > self.clock.now()
    }
}

#[async_trait]
impl Registrar for InMemoryRegistrar {
    async fn available(&self, label: &Label) -> Result<bool> {
        let records = self.records.read();
        Ok(match records.get(label) {
            Some(record) => !self.is_live(record),
            None => true,
        })
    }

    async fn register_ownership(
        &self,
        label: &Label,
        owner: &PublicKey,
        duration: u64,
    ) -> Result<u64> {
        let mut records = self.records.write();
        if let Some(record) = records.get(label) {
            if self.is_live(record) {
                return Err(ControllerError::NameUnavailable {
                    label: label.as_str().to_string(),
                });
            }
        }
        let expires_at = self.clock.now().saturating_add(duration);
        records.insert(
            label.clone(),
            OwnershipRecord {
                owner: *owner,
                expires_at,
            },
        );
        Ok(expires_at)
    }

    async fn renew_ownership(&self, label: &Label, duration: u64) -> Result<u64> {
        let mut records = self.records.write();
        match records.get_mut(label) {
            Some(record) if record.expires_at > self.clock.now() => {
                record.expires_at = record.expires_at.saturating_add(duration);
                Ok(record.expires_at)
            }
            _ => Err(ControllerError::NameNotFound {
                label: label.as_str().to_string(),
            }),
        }
    }

    async fn bind_resolver(&self, _label: &Label, _resolver: &PublicKey) -> Result<()> {
        Ok(())
    }
}

/// Fixed per-length yearly rates, scaled linearly with duration
#[derive(Debug, Clone)]
pub struct StaticPriceOracle {
    /// Yearly base rate for labels of length 1, 2, 3, 4, and 5+
    pub yearly_rates: [Amount; 5],
}

const SECONDS_PER_YEAR: u64 = 60 * 60 * 24 * 365;

impl Default for StaticPriceOracle {
    fn default() -> Self {
        Self {
            yearly_rates: [10_000_000, 5_000_000, 1_500_000, 500_000, 150_000],
        }
    }
}

#[async_trait]
impl PriceOracle for StaticPriceOracle {
    async fn price_of(&self, label: &Label, duration: u64) -> Result<Price> {
        let class = label.len().clamp(1, 5) - 1;
        let yearly = self.yearly_rates[class];
        let base = (yearly as u128)
            .saturating_mul(duration as u128)
            .checked_div(SECONDS_PER_YEAR as u128)
            .unwrap_or(0)
            .min(u64::MAX as u128) as Amount;
        Ok(Price::new(base, 0))
    }
}

/// Referral hub double that accumulates recorded commissions
#[derive(Debug, Default)]
pub struct RecordingReferralHub {
    commissions: Arc<RwLock<Vec<(PublicKey, Amount)>>>,
}

impl RecordingReferralHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commissions(&self) -> Vec<(PublicKey, Amount)> {
        self.commissions.read().clone()
    }
}

#[async_trait]
impl ReferralHub for RecordingReferralHub {
    async fn record_commission(&self, referrer: &PublicKey, amount: Amount) -> Result<()> {
        self.commissions.write().push((*referrer, amount));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registrar_availability_tracks_expiry() {
        let clock = Arc::new(ManualClock::new(1_000));
        let registrar = InMemoryRegistrar::new(clock.clone());
        let label = Label::new("alice");
        let owner = PublicKey::new([1u8; 32]);

        assert!(registrar.available(&label).await.unwrap());
        let expiry = registrar
            .register_ownership(&label, &owner, 3_600)
            .await
            .unwrap();
        assert_eq!(expiry, 4_600);
        assert!(!registrar.available(&label).await.unwrap());

        clock.set(4_601);
        assert!(registrar.available(&label).await.unwrap());
    }

    #[tokio::test]
    async fn test_registrar_rejects_live_name() {
        let clock = Arc::new(ManualClock::new(0));
        let registrar = InMemoryRegistrar::new(clock);
        let label = Label::new("alice");

        registrar
            .register_ownership(&label, &PublicKey::new([1u8; 32]), 100)
            .await
            .unwrap();
        let err = registrar
            .register_ownership(&label, &PublicKey::new([2u8; 32]), 100)
            .await
            .unwrap_err();
        assert!(matches!(err, ControllerError::NameUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_renew_extends_live_name_only() {
        let clock = Arc::new(ManualClock::new(0));
        let registrar = InMemoryRegistrar::new(clock.clone());
        let label = Label::new("alice");

        let err = registrar.renew_ownership(&label, 100).await.unwrap_err();
        assert!(matches!(err, ControllerError::NameNotFound { .. }));

        registrar
            .register_ownership(&label, &PublicKey::new([1u8; 32]), 100)
            .await
            .unwrap();
        assert_eq!(registrar.renew_ownership(&label, 50).await.unwrap(), 150);

        clock.set(200);
        let err = registrar.renew_ownership(&label, 50).await.unwrap_err();
        assert!(matches!(err, ControllerError::NameNotFound { .. }));
    }

    #[tokio::test]
    async fn test_oracle_scales_with_length_and_duration() {
        let oracle = StaticPriceOracle::default();
        let year = SECONDS_PER_YEAR;

        let short = oracle.price_of(&Label::new("do"), year).await.unwrap();
        let long = oracle.price_of(&Label::new("alice"), year).await.unwrap();
        assert_eq!(short.total(), 5_000_000);
        assert_eq!(long.total(), 150_000);

        let half = oracle.price_of(&Label::new("alice"), year / 2).await.unwrap();
        assert_eq!(half.total(), 75_000);
    }
}
