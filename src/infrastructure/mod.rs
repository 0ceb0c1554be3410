//! Infrastructure layer module
//!
//! - Configuration management
//! - Logging infrastructure
//! - Project setup and engine bootstrap

pub mod config;
pub mod logging;
pub mod setup;
