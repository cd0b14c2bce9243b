use cgmath::{InnerSpace, Matrix3, Matrix4, Rad, Vector3, Vector4, Zero};
use wgpu::util::DeviceExt;

use crate::gfx::{
    geometry::{EllipsoidShape, GeometryData},
    resources::Material,
};

use super::MeshKey;

/// The two families of selectable scene objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    TriangleSet,
    Ellipsoid,
}

/// GPU copies of a mesh's three vertex streams and its index list
pub struct MeshBuffers {
    pub positions: wgpu::Buffer,
    pub normals: wgpu::Buffer,
    pub uvs: wgpu::Buffer,
    pub indices: wgpu::Buffer,
    pub index_count: u32,
}

/// Immutable triangle mesh, uploaded once and shared by every draw of it
pub struct Mesh {
    geometry: GeometryData,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn new(geometry: GeometryData) -> Self {
        Self {
            geometry,
            buffers: None,
        }
    }

    pub fn geometry(&self) -> &GeometryData {
        &self.geometry
    }

    pub fn index_count(&self) -> u32 {
        self.geometry.indices.len() as u32
    }

    /// `None` until [`init_gpu_resources`](Self::init_gpu_resources) ran
    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }

    pub fn init_gpu_resources(&mut self, device: &wgpu::Device, label: &str) {
        if self.buffers.is_some() {
            return;
        }

        let create = |suffix: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} {suffix}")),
                contents,
                usage,
            })
        };

        let buffers = MeshBuffers {
            positions: create(
                "Positions",
                bytemuck::cast_slice(&self.geometry.vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            normals: create(
                "Normals",
                bytemuck::cast_slice(&self.geometry.normals),
                wgpu::BufferUsages::VERTEX,
            ),
            uvs: create(
                "UVs",
                bytemuck::cast_slice(&self.geometry.tex_coords),
                wgpu::BufferUsages::VERTEX,
            ),
            indices: create(
                "Indices",
                bytemuck::cast_slice(&self.geometry.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: self.index_count(),
        };

        log::debug!(
            "uploaded {label}: {} vertices, {} triangles",
            self.geometry.vertex_count(),
            self.geometry.triangle_count()
        );
        self.buffers = Some(buffers);
    }
}

/// Interactive placement of one object
///
/// Orientation lives entirely in the two tracked axes; the third axis is
/// their cross product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    /// Pivot for highlight scaling and rotation
    pub center: Vector3<f32>,
    pub translation: Vector3<f32>,
    pub x_axis: Vector3<f32>,
    pub y_axis: Vector3<f32>,
    /// Highlight flag; at most one object in a scene has it set
    pub on: bool,
}

impl ObjectTransform {
    pub fn new(center: Vector3<f32>) -> Self {
        Self {
            center,
            translation: Vector3::zero(),
            x_axis: Vector3::unit_x(),
            y_axis: Vector3::unit_y(),
            on: false,
        }
    }

    pub fn z_axis(&self) -> Vector3<f32> {
        self.x_axis.cross(self.y_axis).normalize()
    }

    /// Rotation whose columns are the tracked basis vectors
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_cols(
            self.x_axis.extend(0.0),
            self.y_axis.extend(0.0),
            self.z_axis().extend(0.0),
            Vector4::unit_w(),
        )
    }

    /// `T(translation) · T(center) · R · S · T(-center)`
    ///
    /// `S` scales uniformly by `highlight_scale` when the object is
    /// highlighted and is the identity otherwise.
    pub fn model_matrix(&self, highlight_scale: f32) -> Matrix4<f32> {
        let scale = if self.on {
            Matrix4::from_scale(highlight_scale)
        } else {
            Matrix4::from_scale(1.0)
        };

        Matrix4::from_translation(self.translation)
            * Matrix4::from_translation(self.center)
            * self.rotation_matrix()
            * scale
            * Matrix4::from_translation(-self.center)
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.translation += offset;
    }

    /// Rotates both tracked axes about `axis` and re-orthonormalizes them
    pub fn rotate(&mut self, axis: Vector3<f32>, angle: Rad<f32>) {
        if axis.magnitude2() <= f32::EPSILON {
            log::warn!("ignoring rotation about a zero-length axis");
            return;
        }

        let rotation = Matrix3::from_axis_angle(axis.normalize(), angle);
        let x = rotation * self.x_axis;
        let y = rotation * self.y_axis;

        // Gram-Schmidt keeps the basis from drifting over many small rotations
        self.x_axis = x.normalize();
        self.y_axis = (y - self.x_axis * y.dot(self.x_axis)).normalize();
    }

    /// Clears translation and orientation; the highlight flag is kept
    pub fn reset(&mut self) {
        self.translation = Vector3::zero();
        self.x_axis = Vector3::unit_x();
        self.y_axis = Vector3::unit_y();
    }

    /// Copy of this transform placed at another translation
    pub fn with_translation(&self, translation: Vector3<f32>) -> Self {
        Self {
            translation,
            ..*self
        }
    }
}

/// Loaded polygonal object
pub struct TriangleSet {
    pub material: Material,
    pub mesh: MeshKey,
    pub transform: ObjectTransform,
}

/// Procedural ellipsoid; `mesh` is `None` when tessellation was rejected
pub struct Ellipsoid {
    pub shape: EllipsoidShape,
    pub material: Material,
    pub mesh: Option<MeshKey>,
    pub transform: ObjectTransform,
}

pub trait DrawMesh<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
}

impl<'a, 'b> DrawMesh<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        let Some(buffers) = mesh.buffers() else {
            return; // Skip drawing if not uploaded
        };
        // wgpu rejects empty buffer slices
        if buffers.index_count == 0 {
            return;
        }

        self.set_vertex_buffer(0, buffers.positions.slice(..));
        self.set_vertex_buffer(1, buffers.normals.slice(..));
        self.set_vertex_buffer(2, buffers.uvs.slice(..));
        self.set_index_buffer(buffers.indices.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..buffers.index_count, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{EuclideanSpace, Point3, SquareMatrix, Transform};

    fn assert_close(actual: Vector3<f32>, expected: Vector3<f32>) {
        assert!(
            (actual - expected).magnitude() < 1e-5,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn test_fresh_transform_is_identity() {
        let transform = ObjectTransform::new(Vector3::new(0.3, -2.0, 5.0));
        let m = transform.model_matrix(1.2);
        let id = Matrix4::<f32>::identity();
        for col in 0..4 {
            assert!((m[col] - id[col]).magnitude() < 1e-5, "{m:?}");
        }
    }

    #[test]
    fn test_model_matrix_is_deterministic() {
        let mut transform = ObjectTransform::new(Vector3::new(0.5, 0.5, 0.5));
        transform.rotate(Vector3::new(1.0, 2.0, 3.0), Rad(0.7));
        transform.translate(Vector3::new(0.1, 0.0, -0.2));
        transform.on = true;

        let first = transform.model_matrix(1.2);
        let second = transform.model_matrix(1.2);
        let a: &[f32; 16] = first.as_ref();
        let b: &[f32; 16] = second.as_ref();
        assert_eq!(a.map(f32::to_bits), b.map(f32::to_bits));
    }

    #[test]
    fn test_highlight_scales_about_center() {
        let center = Vector3::new(1.0, 2.0, 3.0);
        let mut transform = ObjectTransform::new(center);
        transform.on = true;
        let m = transform.model_matrix(1.2);

        let pivot = m.transform_point(Point3::new(1.0, 2.0, 3.0));
        assert_close(pivot.to_vec(), Vector3::new(1.0, 2.0, 3.0));

        let offset = m.transform_point(Point3::new(2.0, 2.0, 3.0));
        assert_close(offset.to_vec(), Vector3::new(2.2, 2.0, 3.0));
    }

    #[test]
    fn test_rotation_columns_are_basis() {
        let mut transform = ObjectTransform::new(Vector3::zero());
        transform.rotate(Vector3::unit_y(), Rad(std::f32::consts::FRAC_PI_2));

        let m = transform.model_matrix(1.2);
        let x_image = m.transform_vector(Vector3::unit_x());
        assert_close(x_image, transform.x_axis);
        assert_close(transform.x_axis, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_rotations_keep_basis_orthonormal() {
        let mut transform = ObjectTransform::new(Vector3::new(0.5, 0.5, 0.5));
        let axes = [
            Vector3::unit_x(),
            Vector3::new(0.3, 1.0, -0.2),
            Vector3::unit_z(),
            Vector3::new(-1.0, 0.5, 2.0),
        ];
        let theta = Rad(std::f32::consts::PI / 50.0);

        for step in 0..1000 {
            let axis = axes[step % axes.len()];
            let sign = if step % 3 == 0 { -1.0 } else { 1.0 };
            transform.rotate(axis, theta * sign);

            assert!((transform.x_axis.magnitude() - 1.0).abs() < 1e-5);
            assert!((transform.y_axis.magnitude() - 1.0).abs() < 1e-5);
            assert!(transform.x_axis.dot(transform.y_axis).abs() < 1e-5);
        }
    }

    #[test]
    fn test_zero_axis_rotation_is_ignored() {
        let mut transform = ObjectTransform::new(Vector3::zero());
        transform.rotate(Vector3::zero(), Rad(1.0));
        assert_eq!(transform, ObjectTransform::new(Vector3::zero()));
    }

    #[test]
    fn test_reset_keeps_highlight() {
        let mut transform = ObjectTransform::new(Vector3::new(1.0, 1.0, 1.0));
        transform.on = true;
        transform.translate(Vector3::new(0.5, 0.0, 0.0));
        transform.rotate(Vector3::unit_z(), Rad(0.4));
        transform.reset();

        assert!(transform.on);
        assert_eq!(transform.translation, Vector3::zero());
        assert_eq!(transform.x_axis, Vector3::unit_x());
        assert_eq!(transform.y_axis, Vector3::unit_y());
    }

    #[test]
    fn test_translation_override_leaves_source_untouched() {
        let transform = ObjectTransform::new(Vector3::new(0.0, 1.0, 0.0));
        let moved = transform.with_translation(Vector3::new(0.25, 2.0, 0.0));

        assert_eq!(transform.translation, Vector3::zero());
        let origin = moved.model_matrix(1.2).transform_point(Point3::new(0.0, 1.0, 0.0));
        assert_close(origin.to_vec(), Vector3::new(0.25, 3.0, 0.0));
    }
}
