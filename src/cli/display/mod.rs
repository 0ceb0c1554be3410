//! Display framework for CLI output formatting.
//!
//! Shared primitives for colors, tables, detail views and spinners used
//! across command output.

pub mod colors;
pub mod detail;
pub mod progress;
pub mod table;
pub mod view;

use console::style;

pub use colors::*;
pub use detail::*;
pub use progress::*;
pub use table::*;
pub use view::*;

/// Render a success action result.
pub fn action_success(message: &str) -> String {
    format!("{} {}", style("\u{2713}").green().bold(), message)
}

/// Render a failure action result.
pub fn action_failure(message: &str) -> String {
    format!("{} {}", style("\u{2717}").red().bold(), message)
}
