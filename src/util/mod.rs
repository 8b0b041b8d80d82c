//! Terminal text helpers.
//!
//! Unicode-aware width measurement and column fitting for the movie list,
//! and sanitizing of titles that come from untrusted catalogs.

mod text;

pub use text::{display_width, fit_to_width, strip_control_chars, truncate_to_width};
