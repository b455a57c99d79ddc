//! Credential material exchanged with the payment provider.

pub mod secret;

pub use secret::*;
