//! Common types used across the Havona client library.

pub mod common;
pub mod fields;
pub mod serde_helpers;

pub use common::*;
