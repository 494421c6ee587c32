//! Agora Types - Core type definitions for the Agora governance engine.
//!
//! This crate provides the fundamental types used throughout Agora:
//! - Addresses (20-byte, Bech32m encoded)
//! - TokenAmount (u128 base units, 18 decimals)
//! - Timestamps (unix seconds)

pub mod address;
pub mod amount;
pub mod error;
pub mod time;

mod serialization;

pub use address::Address;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use time::{days, Timestamp, SECS_PER_DAY};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{days, Address, Timestamp, TokenAmount, TypesError};
}
