//! Domain layer for the Veritas live analysis client
//!
//! This module contains core models and the port traits that external
//! collaborators (scorer, URL extractor, key-value store) implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
