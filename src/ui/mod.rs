//! Terminal user interface.
//!
//! - `loop_runner`: event loop and terminal lifecycle
//! - `input`: key dispatch through the keybinding registry
//! - `events`: background task results
//! - `render`: frame layout, with one module per panel or overlay

mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod movies;
mod pagination;
mod picker;
mod render;
mod status;
mod tokens;

pub use helpers::spawn_catalog_fetch;
pub use loop_runner::{run, Action};
