//! Error types for the registrar controller

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("commitment already recorded: {hash}")]
    AlreadyCommitted { hash: String },

    #[error("commitment not found: {hash}")]
    CommitmentNotFound { hash: String },

    #[error("commitment too new: {hash} (age {age}s, minimum {min_age}s)")]
    CommitmentTooNew { hash: String, age: u64, min_age: u64 },

    #[error("commitment too old: {hash} (age {age}s, maximum {max_age}s)")]
    CommitmentTooOld { hash: String, age: u64, max_age: u64 },

    #[error("registration duration too short: {duration}s (minimum {min_duration}s)")]
    DurationTooShort { duration: u64, min_duration: u64 },

    #[error("invalid label: {label}")]
    LabelInvalid { label: String },

    #[error("label length mismatch: {label} is {actual} bytes, message approves {approved}")]
    LabelLengthMismatch {
        label: String,
        actual: u64,
        approved: u64,
    },

    #[error("insufficient payment: sent {sent}, required {required}")]
    InsufficientPayment { sent: u64, required: u64 },

    #[error("name unavailable: {label}")]
    NameUnavailable { label: String },

    #[error("name not found: {label}")]
    NameNotFound { label: String },

    #[error("invalid whitelist signature")]
    InvalidSignature,

    #[error("nonce already used: minter {minter}, nonce {nonce}")]
    NonceAlreadyUsed { minter: String, nonce: u64 },

    #[error("collaborator backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ControllerError>;
