//! Input commands
//!
//! Every key press or click the viewer reacts to is first turned into one of
//! these plain values; [`InputController`](super::InputController) then
//! applies it. Nothing here knows about winit.

use crate::gfx::scene::ObjectKind;

/// Sign applied to a step or rotation angle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Positive => 1.0,
            Direction::Negative => -1.0,
        }
    }
}

/// Axes of the current view, recomputed from the camera on every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAxis {
    /// `normalize(look_at × up)`
    Right,
    /// `normalize(center - eye)`
    LookAt,
    Up,
}

/// Camera navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// Move eye and center along an axis
    Translate(ViewAxis, Direction),
    /// Move only the center along the right axis
    Turn(Direction),
    /// Move the center along up, then rebuild up
    Pitch(Direction),
    /// Tilt up along the right axis
    Roll(Direction),
}

/// Transform of the selected object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCommand {
    Translate(ViewAxis, Direction),
    Rotate(ViewAxis, Direction),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SelectNext(ObjectKind),
    SelectPrevious(ObjectKind),
    Deselect,
    View(ViewCommand),
    ResetView,
    Model(ModelCommand),
    /// Clear translation and orientation of every object
    ResetTransforms,
    ToggleTextureMode,
    /// Launch a friendly missile at normalized screen coordinates
    Fire { x: f32, y: f32 },
}
