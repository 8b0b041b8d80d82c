//! Terminal movie board: browse, rate, filter and paginate a movie list that
//! is persisted to a local key-value store.

pub mod app;
pub mod board;
pub mod catalog;
pub mod config;
pub mod keybindings;
pub mod storage;
pub mod theme;
pub mod ui;
pub mod util;
