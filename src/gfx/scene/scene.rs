use std::collections::HashMap;

use cgmath::{MetricSpace, Vector3};
use slotmap::SlotMap;

use crate::{
    error::SceneError,
    gfx::{
        geometry::{generate_ellipsoid, GeometryData},
        resources::{Material, TextureResource},
    },
};

use super::{
    description::{MaterialDescription, SceneDescription, NO_TEXTURE},
    object::{Ellipsoid, Mesh, ObjectKind, ObjectTransform, TriangleSet},
    MeshKey, TextureKey,
};

/// Ellipsoid drawn for every enemy missile
pub const ENEMY_ARCHETYPE: usize = 0;
/// Ellipsoid drawn for every friendly missile
pub const FRIENDLY_ARCHETYPE: usize = 1;

const FALLBACK_VIEW_DELTA: f32 = 0.01;

/// Axis-aligned box around everything in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min: Vector3::new(f32::MAX, f32::MAX, f32::MAX),
            max: Vector3::new(f32::MIN, f32::MIN, f32::MIN),
        }
    }

    fn include(&mut self, point: [f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(point[axis]);
            self.max[axis] = self.max[axis].max(point[axis]);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    pub fn diagonal(&self) -> f32 {
        self.min.distance(self.max)
    }
}

/// GPU side of one texture slot
pub struct TextureBinding {
    pub resource: TextureResource,
    pub bind_group: wgpu::BindGroup,
}

/// One distinct texture image referenced by the scene
pub struct TextureSlot {
    pub name: String,
    /// `false` while the placeholder is bound
    pub loaded: bool,
    binding: Option<TextureBinding>,
}

/// Scene statistics for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub triangle_set_count: usize,
    pub ellipsoid_count: usize,
    pub mesh_count: usize,
    pub texture_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

/// Owns every scene object together with the meshes and textures they use
pub struct Scene {
    pub triangle_sets: Vec<TriangleSet>,
    pub ellipsoids: Vec<Ellipsoid>,
    meshes: SlotMap<MeshKey, Mesh>,
    textures: SlotMap<TextureKey, TextureSlot>,
    bounds: Bounds,
}

impl Scene {
    /// Builds the scene from a parsed description
    ///
    /// Every triangle set is validated again. Ellipsoids whose tessellation
    /// is rejected stay in the scene without a mesh and are never drawn.
    pub fn from_description(
        description: &SceneDescription,
        longitude_steps: u32,
    ) -> Result<Self, SceneError> {
        let mut scene = Scene {
            triangle_sets: Vec::with_capacity(description.triangle_sets.len()),
            ellipsoids: Vec::with_capacity(description.ellipsoids.len()),
            meshes: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            bounds: Bounds::empty(),
        };
        let mut texture_names = HashMap::new();

        for (index, set) in description.triangle_sets.iter().enumerate() {
            set.validate(index)?;

            let geometry = set.to_geometry();
            for &vertex in &geometry.vertices {
                scene.bounds.include(vertex);
            }
            let center = Vector3::from(geometry.centroid());
            let material = scene.material(&set.material, &mut texture_names);

            scene.triangle_sets.push(TriangleSet {
                material,
                mesh: scene.meshes.insert(Mesh::new(geometry)),
                transform: ObjectTransform::new(center),
            });
        }

        for ellipsoid in &description.ellipsoids {
            let shape = ellipsoid.shape();
            let (min, max) = shape.bounds();
            scene.bounds.include(min);
            scene.bounds.include(max);

            let mesh = generate_ellipsoid(&shape, longitude_steps)
                .ok()
                .map(|geometry| scene.meshes.insert(Mesh::new(geometry)));

            let material = scene.material(
                &MaterialDescription {
                    ambient: ellipsoid.ambient,
                    diffuse: ellipsoid.diffuse,
                    specular: ellipsoid.specular,
                    n: ellipsoid.n,
                    texture: ellipsoid.texture.clone(),
                },
                &mut texture_names,
            );

            scene.ellipsoids.push(Ellipsoid {
                shape,
                material,
                mesh,
                transform: ObjectTransform::new(Vector3::from(shape.center())),
            });
        }

        let stats = scene.statistics();
        log::info!(
            "scene ready: {} triangle sets, {} ellipsoids, {} meshes ({} triangles, {} vertices), {} textures",
            stats.triangle_set_count,
            stats.ellipsoid_count,
            stats.mesh_count,
            stats.total_triangles,
            stats.total_vertices,
            stats.texture_count
        );

        Ok(scene)
    }

    fn material(
        &mut self,
        description: &MaterialDescription,
        texture_names: &mut HashMap<String, TextureKey>,
    ) -> Material {
        let material = Material::new(
            description.ambient,
            description.diffuse,
            description.specular,
            description.n,
        );
        if description.texture == NO_TEXTURE {
            return material;
        }

        let textures = &mut self.textures;
        let key = *texture_names
            .entry(description.texture.clone())
            .or_insert_with(|| {
                textures.insert(TextureSlot {
                    name: description.texture.clone(),
                    loaded: false,
                    binding: None,
                })
            });
        material.with_texture(key)
    }

    pub fn count(&self, kind: ObjectKind) -> usize {
        match kind {
            ObjectKind::TriangleSet => self.triangle_sets.len(),
            ObjectKind::Ellipsoid => self.ellipsoids.len(),
        }
    }

    pub fn transform(&self, kind: ObjectKind, index: usize) -> Option<&ObjectTransform> {
        match kind {
            ObjectKind::TriangleSet => self.triangle_sets.get(index).map(|o| &o.transform),
            ObjectKind::Ellipsoid => self.ellipsoids.get(index).map(|o| &o.transform),
        }
    }

    pub fn transform_mut(&mut self, kind: ObjectKind, index: usize) -> Option<&mut ObjectTransform> {
        match kind {
            ObjectKind::TriangleSet => self.triangle_sets.get_mut(index).map(|o| &mut o.transform),
            ObjectKind::Ellipsoid => self.ellipsoids.get_mut(index).map(|o| &mut o.transform),
        }
    }

    fn transforms_mut(&mut self) -> impl Iterator<Item = &mut ObjectTransform> {
        self.triangle_sets
            .iter_mut()
            .map(|o| &mut o.transform)
            .chain(self.ellipsoids.iter_mut().map(|o| &mut o.transform))
    }

    /// Highlights exactly `target`, or nothing when `None`
    pub fn set_highlight(&mut self, target: Option<(ObjectKind, usize)>) {
        for transform in self.transforms_mut() {
            transform.on = false;
        }
        if let Some((kind, index)) = target {
            if let Some(transform) = self.transform_mut(kind, index) {
                transform.on = true;
            }
        }
    }

    /// The highlighted object, if any
    pub fn highlighted(&self) -> Option<(ObjectKind, usize)> {
        let sets = self
            .triangle_sets
            .iter()
            .position(|o| o.transform.on)
            .map(|i| (ObjectKind::TriangleSet, i));
        sets.or_else(|| {
            self.ellipsoids
                .iter()
                .position(|o| o.transform.on)
                .map(|i| (ObjectKind::Ellipsoid, i))
        })
    }

    /// Clears translation and orientation of every object
    pub fn reset_transforms(&mut self) {
        for transform in self.transforms_mut() {
            transform.reset();
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Step used by every translation command: a hundredth of the scene diagonal
    pub fn view_delta(&self) -> f32 {
        if self.bounds.is_empty() {
            return FALLBACK_VIEW_DELTA;
        }
        self.bounds.diagonal() / 100.0
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    /// Archetype ellipsoid `index` together with its mesh, when it has one
    pub fn archetype(&self, index: usize) -> Option<(&Ellipsoid, MeshKey)> {
        let ellipsoid = self.ellipsoids.get(index)?;
        Some((ellipsoid, ellipsoid.mesh?))
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureKey, &TextureSlot)> {
        self.textures.iter()
    }

    pub fn texture_bind_group(&self, key: TextureKey) -> Option<&wgpu::BindGroup> {
        self.textures
            .get(key)?
            .binding
            .as_ref()
            .map(|b| &b.bind_group)
    }

    /// Installs the GPU texture for slot `key`; `loaded` marks a decoded image
    pub fn set_texture_binding(&mut self, key: TextureKey, binding: TextureBinding, loaded: bool) {
        match self.textures.get_mut(key) {
            Some(slot) => {
                slot.binding = Some(binding);
                slot.loaded = loaded;
            }
            None => log::warn!("texture binding for unknown slot {key:?} dropped"),
        }
    }

    /// Uploads every mesh that is not on the GPU yet
    pub fn init_gpu_resources(&mut self, device: &wgpu::Device) {
        for (key, mesh) in self.meshes.iter_mut() {
            mesh.init_gpu_resources(device, &format!("Mesh {key:?}"));
        }
    }

    pub fn statistics(&self) -> SceneStatistics {
        let geometries: Vec<&GeometryData> = self.meshes.values().map(Mesh::geometry).collect();
        SceneStatistics {
            triangle_set_count: self.triangle_sets.len(),
            ellipsoid_count: self.ellipsoids.len(),
            mesh_count: self.meshes.len(),
            texture_count: self.textures.len(),
            total_triangles: geometries.iter().map(|g| g.triangle_count()).sum(),
            total_vertices: geometries.iter().map(|g| g.vertex_count()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::description::{EllipsoidDescription, TriangleSetDescription};

    fn material(texture: &str) -> MaterialDescription {
        MaterialDescription {
            ambient: [0.1; 3],
            diffuse: [0.6; 3],
            specular: [0.3; 3],
            n: 11.0,
            texture: texture.to_string(),
        }
    }

    fn triangle(texture: &str, offset: f32) -> TriangleSetDescription {
        TriangleSetDescription {
            material: material(texture),
            vertices: vec![[offset, 0.0, 0.0], [offset + 1.0, 0.0, 0.0], [offset, 1.0, 0.0]],
            normals: vec![[0.0, 0.0, -1.0]; 3],
            uvs: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
            triangles: vec![[0, 1, 2]],
        }
    }

    fn sphere(x: f32, texture: &str) -> EllipsoidDescription {
        EllipsoidDescription {
            x,
            y: 0.0,
            z: 0.0,
            a: 0.5,
            b: 0.5,
            c: 0.5,
            ambient: [0.1; 3],
            diffuse: [0.0, 0.0, 0.6],
            specular: [0.3; 3],
            n: 5.0,
            texture: texture.to_string(),
        }
    }

    fn sample_scene() -> Scene {
        let description = SceneDescription {
            triangle_sets: vec![triangle("stone.png", 0.0), triangle("stone.png", 2.0)],
            ellipsoids: vec![sphere(0.0, NO_TEXTURE), sphere(1.0, "moon.png")],
        };
        Scene::from_description(&description, 8).unwrap()
    }

    #[test]
    fn test_builds_objects_and_meshes() {
        let scene = sample_scene();
        let stats = scene.statistics();
        assert_eq!(stats.triangle_set_count, 2);
        assert_eq!(stats.ellipsoid_count, 2);
        assert_eq!(stats.mesh_count, 4);
        assert_eq!(stats.total_triangles, 2 + 2 * (8 * 2 * 2 + 2 * 8));
    }

    #[test]
    fn test_centers_are_vertex_means() {
        let scene = sample_scene();
        let center = scene.triangle_sets[1].transform.center;
        assert!((center.x - (2.0 + 1.0 / 3.0)).abs() < 1e-6);
        assert_eq!(scene.ellipsoids[1].transform.center, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_texture_names_share_slots() {
        let scene = sample_scene();
        assert_eq!(scene.textures().count(), 2);
        assert_eq!(
            scene.triangle_sets[0].material.texture,
            scene.triangle_sets[1].material.texture
        );
        assert!(scene.ellipsoids[0].material.texture.is_none());
        assert!(scene.textures().all(|(_, slot)| !slot.loaded));
    }

    #[test]
    fn test_view_delta_is_hundredth_of_diagonal() {
        let scene = sample_scene();
        let bounds = scene.bounds();
        assert_eq!(bounds.min, Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vector3::new(3.0, 1.0, 0.5));
        assert!((scene.view_delta() - bounds.diagonal() / 100.0).abs() < 1e-7);

        let empty = Scene::from_description(&SceneDescription::default(), 8).unwrap();
        assert_eq!(empty.view_delta(), FALLBACK_VIEW_DELTA);
    }

    #[test]
    fn test_highlight_is_exclusive() {
        let mut scene = sample_scene();
        scene.set_highlight(Some((ObjectKind::TriangleSet, 1)));
        assert_eq!(scene.highlighted(), Some((ObjectKind::TriangleSet, 1)));

        scene.set_highlight(Some((ObjectKind::Ellipsoid, 0)));
        assert_eq!(scene.highlighted(), Some((ObjectKind::Ellipsoid, 0)));
        assert!(scene.triangle_sets.iter().all(|o| !o.transform.on));

        scene.set_highlight(None);
        assert_eq!(scene.highlighted(), None);
    }

    #[test]
    fn test_rejected_tessellation_keeps_object_without_mesh() {
        let description = SceneDescription {
            triangle_sets: vec![],
            ellipsoids: vec![sphere(0.0, NO_TEXTURE)],
        };
        let scene = Scene::from_description(&description, 7).unwrap();
        assert_eq!(scene.ellipsoids.len(), 1);
        assert!(scene.archetype(ENEMY_ARCHETYPE).is_none());
        assert!(scene.archetype(FRIENDLY_ARCHETYPE).is_none());
    }

    #[test]
    fn test_malformed_set_fails_load() {
        let mut broken = triangle(NO_TEXTURE, 0.0);
        broken.uvs.pop();
        let description = SceneDescription {
            triangle_sets: vec![broken],
            ellipsoids: vec![],
        };
        assert!(matches!(
            Scene::from_description(&description, 8),
            Err(SceneError::Malformed { index: 0, .. })
        ));
    }

    #[test]
    fn test_reset_transforms_restores_every_object() {
        let mut scene = sample_scene();
        scene.transform_mut(ObjectKind::Ellipsoid, 1).unwrap().translate(Vector3::new(1.0, 0.0, 0.0));
        scene.transform_mut(ObjectKind::TriangleSet, 0).unwrap().rotate(Vector3::unit_z(), cgmath::Rad(0.3));
        scene.reset_transforms();

        for kind in [ObjectKind::TriangleSet, ObjectKind::Ellipsoid] {
            for index in 0..scene.count(kind) {
                let transform = scene.transform(kind, index).unwrap();
                assert_eq!(transform.translation, Vector3::new(0.0, 0.0, 0.0));
                assert_eq!(transform.x_axis, Vector3::unit_x());
            }
        }
    }
}
