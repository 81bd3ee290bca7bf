//! TUI rendering components.

mod dashboard;
mod login;
mod orders;
pub mod overlay;
mod render;
mod settings;

pub use render::draw;
