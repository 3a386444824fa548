//! # voxtask common library
//!
//! Shared code for the voxtask crates:
//! - Error and result types
//! - Configuration loading (TOML file, root folder resolution)
//! - Webhook signature verification

pub mod config;
pub mod error;
pub mod signature;

pub use error::{Error, Result};
