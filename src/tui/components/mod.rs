//! Widgets shared by the login screen and the board

mod help;
mod text_input;

pub use help::HelpOverlay;
pub use text_input::{render_secret_field, render_text_field};
