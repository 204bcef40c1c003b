//! Commit-reveal registration controller for the name registry
//!
//! This crate implements the registration front door for human-readable
//! labels: a commit-reveal flow that hides the desired label until a minimum
//! commitment age has passed, a paid registration and renewal path priced by
//! an external oracle, and an issuer-signed whitelist path for free
//! registrations with per-minter nonce replay protection. Ownership itself
//! lives in an external registrar the controller is an authorized caller of.

pub mod commitments;
pub mod controller;
pub mod errors;
pub mod nonces;
pub mod services;
pub mod whitelist;

pub use commitments::{make_commitment, make_commitment_with_config, CommitmentHash, CommitmentStore};
pub use controller::{
    ControllerConfig, FreeRegistrationReceipt, RegistrarController, RegistrationReceipt,
    RenewalReceipt,
};
pub use errors::{ControllerError, Result};
pub use nonces::NonceLedger;
pub use services::{
    Clock, InMemoryRegistrar, ManualClock, OwnershipRecord, PriceOracle, RecordingReferralHub,
    ReferralHub, Registrar, StaticPriceOracle, SystemClock,
};
pub use whitelist::{whitelist_payload_digest, WhitelistVerifier};
