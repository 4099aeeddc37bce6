//! Full-screen terminal UI.

pub mod app;
pub mod chat;
pub mod event;
pub mod markdown;

pub use event::run_tui;
