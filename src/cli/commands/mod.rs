//! CLI command implementations.

pub mod analyze;
pub mod history;
pub mod init;
pub mod live;
pub mod sample;
pub mod scan;
