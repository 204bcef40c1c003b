//! Shared data model for the didreg registrar controller
//!
//! This crate holds the leaf types exchanged between the controller and its
//! collaborators: validated labels, 32-byte public keys, reveal secrets,
//! price amounts, and the signed whitelist message format.

pub mod keys;
pub mod label;
pub mod price;
pub mod whitelist;

pub use keys::*;
pub use label::*;
pub use price::*;
pub use whitelist::*;
