//! Top-level TUI state.

mod state;

pub use state::{App, SessionFlag};
