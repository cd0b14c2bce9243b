//! Per-frame draw planning
//!
//! Walks the scene and the projectile records in draw order and produces a
//! [`FramePlan`]: one [`DrawCommand`] per indexed draw with its uniforms
//! already computed. Building the plan advances the simulation, so exactly
//! one plan must be built per presented frame.

use cgmath::Matrix4;

use crate::{
    gfx::{
        camera::ViewCamera,
        resources::{Material, TextureMode},
        scene::{MeshKey, ObjectTransform, Scene, TextureKey, ENEMY_ARCHETYPE, FRIENDLY_ARCHETYPE},
    },
    simulation::ProjectileSimulator,
};

/// Per-draw uniform block
///
/// MUST match the `Draw` struct in `blinn_phong.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub pvm: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    /// -1 untextured, 0 replace, 1 modulate
    pub texture_mode: i32,
    _padding: [f32; 2],
}

impl DrawUniform {
    pub fn new(model: Matrix4<f32>, view_proj: Matrix4<f32>, material: &Material, texture_mode: i32) -> Self {
        let extend = |v: [f32; 3]| [v[0], v[1], v[2], 1.0];
        Self {
            model: model.into(),
            pvm: (view_proj * model).into(),
            ambient: extend(material.ambient),
            diffuse: extend(material.diffuse),
            specular: extend(material.specular),
            shininess: material.shininess,
            texture_mode,
            _padding: [0.0; 2],
        }
    }
}

/// One indexed draw
#[derive(Debug, Clone, Copy)]
pub struct DrawCommand {
    pub mesh: MeshKey,
    pub texture: Option<TextureKey>,
    pub uniform: DrawUniform,
}

/// Everything needed to record one frame
#[derive(Debug, Clone)]
pub struct FramePlan {
    pub eye: [f32; 3],
    pub draws: Vec<DrawCommand>,
}

/// Composes model matrices and orders the draws of a frame
pub struct FrameRenderer {
    highlight_scale: f32,
}

impl FrameRenderer {
    pub fn new(highlight_scale: f32) -> Self {
        Self { highlight_scale }
    }

    /// Plans the frame and advances every projectile by one step
    ///
    /// Order: triangle sets, then each enemy missile followed by its
    /// advance, then each friendly missile followed by its advance. Friendly
    /// missiles that arrived during this frame are dropped at the end.
    pub fn plan(
        &self,
        scene: &Scene,
        camera: &ViewCamera,
        simulator: &mut ProjectileSimulator,
        texture_mode: TextureMode,
    ) -> FramePlan {
        let view_proj = camera.build_view_projection_matrix();
        let mut draws = Vec::with_capacity(
            scene.triangle_sets.len() + simulator.enemies().len() + simulator.friendlies().len(),
        );

        for set in &scene.triangle_sets {
            draws.push(self.draw(set.mesh, &set.transform, &set.material, view_proj, texture_mode));
        }

        let enemy = scene.archetype(ENEMY_ARCHETYPE);
        if enemy.is_none() && !simulator.enemies().is_empty() {
            log::warn!("no enemy archetype mesh; enemy missiles are not drawn");
        }
        for index in 0..simulator.enemies().len() {
            if let Some((archetype, mesh)) = enemy {
                let transform = archetype
                    .transform
                    .with_translation(simulator.enemies()[index].position);
                draws.push(self.draw(mesh, &transform, &archetype.material, view_proj, texture_mode));
            }
            simulator.advance_enemy(index);
        }

        let friendly = scene.archetype(FRIENDLY_ARCHETYPE);
        for index in 0..simulator.friendlies().len() {
            if let Some((archetype, mesh)) = friendly {
                let transform = archetype
                    .transform
                    .with_translation(simulator.friendlies()[index].position);
                draws.push(self.draw(mesh, &transform, &archetype.material, view_proj, texture_mode));
            }
            simulator.advance_friendly(index);
        }

        simulator.end_frame();

        FramePlan {
            eye: camera.eye.into(),
            draws,
        }
    }

    fn draw(
        &self,
        mesh: MeshKey,
        transform: &ObjectTransform,
        material: &Material,
        view_proj: Matrix4<f32>,
        texture_mode: TextureMode,
    ) -> DrawCommand {
        let model = transform.model_matrix(self.highlight_scale);
        DrawCommand {
            mesh,
            texture: material.texture,
            uniform: DrawUniform::new(
                model,
                view_proj,
                material,
                TextureMode::shader_value(material, texture_mode),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ProjectileConfig, ViewDefaults},
        gfx::scene::{
            description::{EllipsoidDescription, MaterialDescription, TriangleSetDescription},
            SceneDescription,
        },
    };

    fn material(texture: &str) -> MaterialDescription {
        MaterialDescription {
            ambient: [0.1, 0.1, 0.1],
            diffuse: [0.6, 0.4, 0.4],
            specular: [0.3, 0.3, 0.3],
            n: 11.0,
            texture: texture.to_string(),
        }
    }

    fn ellipsoid(x: f32) -> EllipsoidDescription {
        EllipsoidDescription {
            x,
            y: 0.5,
            z: 0.5,
            a: 0.05,
            b: 0.05,
            c: 0.05,
            ambient: [0.1, 0.1, 0.1],
            diffuse: [0.0, 0.0, 0.6],
            specular: [0.3, 0.3, 0.3],
            n: 5.0,
            texture: "none".to_string(),
        }
    }

    fn scene(ellipsoids: Vec<EllipsoidDescription>) -> Scene {
        let set = TriangleSetDescription {
            material: material("stone.png"),
            vertices: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, -1.0]; 3],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            triangles: vec![[0, 1, 2]],
        };
        let description = SceneDescription {
            triangle_sets: vec![set],
            ellipsoids,
        };
        Scene::from_description(&description, 16).unwrap()
    }

    fn camera() -> ViewCamera {
        ViewCamera::new(ViewDefaults::default(), 1.0)
    }

    #[test]
    fn test_uniform_layout_size() {
        assert_eq!(std::mem::size_of::<DrawUniform>(), 192);
    }

    #[test]
    fn test_draw_order_and_count() {
        let scene = scene(vec![ellipsoid(0.2), ellipsoid(0.8)]);
        let mut simulator = ProjectileSimulator::with_seed(ProjectileConfig::default(), 3);
        simulator.fire(0.5, 0.9);

        let plan = FrameRenderer::new(1.2).plan(&scene, &camera(), &mut simulator, TextureMode::Replace);
        // one triangle set, four enemies, one friendly
        assert_eq!(plan.draws.len(), 6);

        assert_eq!(plan.draws[0].mesh, scene.triangle_sets[0].mesh);
        assert_eq!(plan.draws[0].uniform.texture_mode, 0);
        let enemy_mesh = scene.ellipsoids[ENEMY_ARCHETYPE].mesh.unwrap();
        let friendly_mesh = scene.ellipsoids[FRIENDLY_ARCHETYPE].mesh.unwrap();
        assert!(plan.draws[1..5].iter().all(|d| d.mesh == enemy_mesh));
        assert_eq!(plan.draws[5].mesh, friendly_mesh);
        assert_eq!(plan.draws[5].uniform.texture_mode, -1);
        assert_eq!(plan.eye, [0.5, 0.5, -1.5]);
    }

    #[test]
    fn test_enemy_drawn_at_position_before_advance() {
        let scene = scene(vec![ellipsoid(0.2), ellipsoid(0.8)]);
        let mut simulator = ProjectileSimulator::with_seed(ProjectileConfig::default(), 9);
        let before = simulator.enemies()[0].position;

        let plan = FrameRenderer::new(1.2).plan(&scene, &camera(), &mut simulator, TextureMode::Replace);

        // The archetype center maps to center + missile position
        let model = Matrix4::from(plan.draws[1].uniform.model);
        let center = scene.ellipsoids[ENEMY_ARCHETYPE].transform.center;
        let placed = model * center.extend(1.0);
        let expected = center + before;
        assert!((placed.x - expected.x).abs() < 1e-5);
        assert!((placed.y - expected.y).abs() < 1e-5);
        assert!((placed.z - expected.z).abs() < 1e-5);

        let after = simulator.enemies()[0].position;
        assert_ne!(before, after);
    }

    #[test]
    fn test_missing_archetype_still_advances() {
        let scene = scene(Vec::new());
        let mut simulator = ProjectileSimulator::with_seed(ProjectileConfig::default(), 5);
        simulator.fire(0.1, 0.9);
        let enemy = simulator.enemies()[0].position;
        let friendly = simulator.friendlies()[0].position;

        let plan = FrameRenderer::new(1.2).plan(&scene, &camera(), &mut simulator, TextureMode::Modulate);

        assert_eq!(plan.draws.len(), 1);
        assert_eq!(plan.draws[0].uniform.texture_mode, 1);
        assert_ne!(simulator.enemies()[0].position, enemy);
        assert_ne!(simulator.friendlies()[0].position, friendly);
    }

    #[test]
    fn test_highlighted_set_is_scaled() {
        let mut scene = scene(Vec::new());
        let mut simulator = ProjectileSimulator::with_seed(ProjectileConfig::default(), 5);
        let renderer = FrameRenderer::new(1.2);

        let plain = renderer.plan(&scene, &camera(), &mut simulator, TextureMode::Replace);
        scene.set_highlight(Some((crate::gfx::scene::ObjectKind::TriangleSet, 0)));
        let highlighted = renderer.plan(&scene, &camera(), &mut simulator, TextureMode::Replace);

        assert_eq!(plain.draws[0].uniform.model[0][0], 1.0);
        assert!((highlighted.draws[0].uniform.model[0][0] - 1.2).abs() < 1e-6);
    }
}
