use cgmath::{Rad, Vector3};

use super::{
    command::{Command, ModelCommand, ViewAxis, ViewCommand},
    selection::Selection,
};
use crate::{
    gfx::{camera::ViewCamera, resources::TextureMode, scene::Scene},
    simulation::ProjectileSimulator,
};

/// Applies input commands to the scene, the camera and the simulator
///
/// Owns the current selection and texture mode; the highlight flags in the
/// scene always mirror the selection.
pub struct InputController {
    selection: Option<Selection>,
    texture_mode: TextureMode,
    rotate_theta: f32,
}

impl InputController {
    pub fn new(rotate_theta: f32) -> Self {
        Self {
            selection: None,
            texture_mode: TextureMode::default(),
            rotate_theta,
        }
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn texture_mode(&self) -> TextureMode {
        self.texture_mode
    }

    pub fn apply(
        &mut self,
        command: Command,
        scene: &mut Scene,
        camera: &mut ViewCamera,
        simulator: &mut ProjectileSimulator,
    ) {
        log::debug!("applying {command:?}");
        let delta = scene.view_delta();

        match command {
            Command::SelectNext(kind) => {
                self.select(Selection::next(self.selection, kind, scene.count(kind)), scene)
            }
            Command::SelectPrevious(kind) => {
                self.select(Selection::previous(self.selection, kind, scene.count(kind)), scene)
            }
            Command::Deselect => {
                self.selection = None;
                scene.set_highlight(None);
            }
            Command::View(view) => Self::apply_view(view, delta, camera),
            Command::ResetView => camera.reset(),
            Command::Model(model) => self.apply_model(model, delta, scene, camera),
            Command::ResetTransforms => scene.reset_transforms(),
            Command::ToggleTextureMode => {
                self.texture_mode = self.texture_mode.toggled();
                log::info!("texture mode: {:?}", self.texture_mode);
            }
            Command::Fire { x, y } => simulator.fire(x, y),
        }
    }

    fn select(&mut self, selection: Option<Selection>, scene: &mut Scene) {
        // An empty collection leaves the current selection alone
        let Some(selection) = selection else {
            return;
        };
        self.selection = Some(selection);
        scene.set_highlight(Some((selection.kind, selection.index)));
    }

    fn axis(camera: &ViewCamera, axis: ViewAxis) -> Vector3<f32> {
        match axis {
            ViewAxis::Right => camera.right(),
            ViewAxis::LookAt => camera.look_at(),
            ViewAxis::Up => camera.up,
        }
    }

    fn apply_view(view: ViewCommand, delta: f32, camera: &mut ViewCamera) {
        match view {
            ViewCommand::Translate(axis, direction) => {
                let offset = Self::axis(camera, axis) * (direction.sign() * delta);
                camera.translate(offset);
            }
            ViewCommand::Turn(direction) => {
                let offset = camera.right() * (direction.sign() * delta);
                camera.turn(offset);
            }
            ViewCommand::Pitch(direction) => {
                let offset = camera.up * (direction.sign() * delta);
                camera.pitch(offset);
            }
            ViewCommand::Roll(direction) => {
                let offset = camera.right() * (direction.sign() * delta);
                camera.roll(offset);
            }
        }
    }

    fn apply_model(&self, model: ModelCommand, delta: f32, scene: &mut Scene, camera: &ViewCamera) {
        let Some(selection) = self.selection else {
            return;
        };
        let Some(transform) = scene.transform_mut(selection.kind, selection.index) else {
            return;
        };

        match model {
            ModelCommand::Translate(axis, direction) => {
                transform.translate(Self::axis(camera, axis) * (direction.sign() * delta));
            }
            ModelCommand::Rotate(axis, direction) => {
                transform.rotate(
                    Self::axis(camera, axis),
                    Rad(direction.sign() * self.rotate_theta),
                );
            }
        }
    }
}
