//! Key and mouse bindings
//!
//! | Key            | Plain                        | With shift                  |
//! |----------------|------------------------------|-----------------------------|
//! | Right / Left   | next / previous triangle set |                             |
//! | Up / Down      | next / previous ellipsoid    |                             |
//! | Space          | deselect                     |                             |
//! | A / D          | move view left / right       | turn left / right           |
//! | W / S          | move view forward / back     | pitch down / up             |
//! | Q / E          | move view up / down          | roll left / right           |
//! | Escape         | reset view                   |                             |
//! | K / ;          | move model left / right      | rotate about up − / +       |
//! | O / L          | move model forward / back    | rotate about right − / +    |
//! | I / P          | move model up / down         | rotate about look-at + / −  |
//! | Backspace      | reset all model transforms   |                             |
//! | B              | toggle texture mode          |                             |
//!
//! A left click fires a friendly missile at the clicked point.

use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    keyboard::KeyCode,
};

use super::command::{
    Command, Direction::Negative as Neg, Direction::Positive as Pos, ModelCommand, ViewAxis,
    ViewCommand,
};
use crate::gfx::scene::ObjectKind;

/// Command bound to `code`, if any
pub fn command_for_key(code: KeyCode, shift: bool) -> Option<Command> {
    use ModelCommand::{Rotate, Translate as Move};
    use ViewAxis::{LookAt, Right, Up};
    use ViewCommand::{Pitch, Roll, Translate, Turn};

    let command = match (code, shift) {
        (KeyCode::ArrowRight, _) => Command::SelectNext(ObjectKind::TriangleSet),
        (KeyCode::ArrowLeft, _) => Command::SelectPrevious(ObjectKind::TriangleSet),
        (KeyCode::ArrowUp, _) => Command::SelectNext(ObjectKind::Ellipsoid),
        (KeyCode::ArrowDown, _) => Command::SelectPrevious(ObjectKind::Ellipsoid),
        (KeyCode::Space, _) => Command::Deselect,

        (KeyCode::KeyA, false) => Command::View(Translate(Right, Pos)),
        (KeyCode::KeyA, true) => Command::View(Turn(Pos)),
        (KeyCode::KeyD, false) => Command::View(Translate(Right, Neg)),
        (KeyCode::KeyD, true) => Command::View(Turn(Neg)),
        (KeyCode::KeyW, false) => Command::View(Translate(LookAt, Pos)),
        (KeyCode::KeyW, true) => Command::View(Pitch(Neg)),
        (KeyCode::KeyS, false) => Command::View(Translate(LookAt, Neg)),
        (KeyCode::KeyS, true) => Command::View(Pitch(Pos)),
        (KeyCode::KeyQ, false) => Command::View(Translate(Up, Pos)),
        (KeyCode::KeyQ, true) => Command::View(Roll(Neg)),
        (KeyCode::KeyE, false) => Command::View(Translate(Up, Neg)),
        (KeyCode::KeyE, true) => Command::View(Roll(Pos)),
        (KeyCode::Escape, _) => Command::ResetView,

        (KeyCode::KeyK, false) => Command::Model(Move(Right, Pos)),
        (KeyCode::KeyK, true) => Command::Model(Rotate(Up, Neg)),
        (KeyCode::Semicolon, false) => Command::Model(Move(Right, Neg)),
        (KeyCode::Semicolon, true) => Command::Model(Rotate(Up, Pos)),
        (KeyCode::KeyL, false) => Command::Model(Move(LookAt, Neg)),
        (KeyCode::KeyL, true) => Command::Model(Rotate(Right, Pos)),
        (KeyCode::KeyO, false) => Command::Model(Move(LookAt, Pos)),
        (KeyCode::KeyO, true) => Command::Model(Rotate(Right, Neg)),
        (KeyCode::KeyI, false) => Command::Model(Move(Up, Pos)),
        (KeyCode::KeyI, true) => Command::Model(Rotate(LookAt, Pos)),
        (KeyCode::KeyP, false) => Command::Model(Move(Up, Neg)),
        (KeyCode::KeyP, true) => Command::Model(Rotate(LookAt, Neg)),

        (KeyCode::Backspace, _) => Command::ResetTransforms,
        (KeyCode::KeyB, _) => Command::ToggleTextureMode,
        _ => return None,
    };
    Some(command)
}

/// Fire command for a click at `position` inside a surface of `size`
///
/// Both axes are mirrored: `x = 1 - px / width`, `y = 1 - py / height`.
pub fn fire_command(position: PhysicalPosition<f64>, size: PhysicalSize<u32>) -> Option<Command> {
    if size.width == 0 || size.height == 0 {
        return None;
    }
    Some(Command::Fire {
        x: 1.0 - (position.x / size.width as f64) as f32,
        y: 1.0 - (position.y / size.height as f64) as f32,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_keys_ignore_shift() {
        for shift in [false, true] {
            assert_eq!(
                command_for_key(KeyCode::ArrowRight, shift),
                Some(Command::SelectNext(ObjectKind::TriangleSet))
            );
            assert_eq!(
                command_for_key(KeyCode::ArrowDown, shift),
                Some(Command::SelectPrevious(ObjectKind::Ellipsoid))
            );
        }
    }

    #[test]
    fn test_shift_turns_model_moves_into_rotations() {
        assert_eq!(
            command_for_key(KeyCode::KeyK, false),
            Some(Command::Model(ModelCommand::Translate(ViewAxis::Right, Pos)))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyK, true),
            Some(Command::Model(ModelCommand::Rotate(ViewAxis::Up, Neg)))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyL, true),
            Some(Command::Model(ModelCommand::Rotate(ViewAxis::Right, Pos)))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyP, true),
            Some(Command::Model(ModelCommand::Rotate(ViewAxis::LookAt, Neg)))
        );
    }

    #[test]
    fn test_view_keys() {
        assert_eq!(
            command_for_key(KeyCode::KeyW, false),
            Some(Command::View(ViewCommand::Translate(ViewAxis::LookAt, Pos)))
        );
        assert_eq!(
            command_for_key(KeyCode::KeyS, true),
            Some(Command::View(ViewCommand::Pitch(Pos)))
        );
        assert_eq!(command_for_key(KeyCode::Escape, true), Some(Command::ResetView));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(command_for_key(KeyCode::KeyZ, false), None);
        assert_eq!(command_for_key(KeyCode::F1, true), None);
    }

    #[test]
    fn test_click_is_mirrored_and_normalized() {
        let size = PhysicalSize::new(512, 512);
        match fire_command(PhysicalPosition::new(128.0, 384.0), size) {
            Some(Command::Fire { x, y }) => {
                assert!((x - 0.75).abs() < 1e-6);
                assert!((y - 0.25).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(fire_command(PhysicalPosition::new(1.0, 1.0), PhysicalSize::new(0, 10)), None);
    }
}
