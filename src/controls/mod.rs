//! Interactive controls
//!
//! Keyboard and mouse input is mapped to [`Command`] values by the
//! [`keymap`] and applied by the [`InputController`].

pub mod command;
pub mod controller;
pub mod keymap;
pub mod selection;

pub use command::{Command, Direction, ModelCommand, ViewAxis, ViewCommand};
pub use controller::InputController;
pub use keymap::{command_for_key, fire_command};
pub use selection::Selection;
