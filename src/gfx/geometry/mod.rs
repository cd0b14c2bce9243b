//! # Procedural and Loaded Geometry
//!
//! Every mesh in a scene passes through [`GeometryData`] before it becomes a
//! GPU-backed [`Mesh`](crate::gfx::scene::Mesh): triangle sets are copied in
//! from the scene description and ellipsoids are tessellated by
//! [`generate_ellipsoid`].
//!
//! ```rust
//! use missile_command::gfx::geometry::{generate_ellipsoid, EllipsoidShape};
//!
//! let sphere = generate_ellipsoid(&EllipsoidShape::unit_sphere(), 8).unwrap();
//! assert_eq!(sphere.vertex_count(), 8 * 3 + 2);
//! ```

pub mod ellipsoid;

pub use ellipsoid::{generate_ellipsoid, EllipsoidShape};

/// Represents geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z), not necessarily unit length
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices, three per triangle
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Arithmetic mean of all vertex positions
    ///
    /// Returns the origin for empty geometry.
    pub fn centroid(&self) -> [f32; 3] {
        if self.vertices.is_empty() {
            return [0.0; 3];
        }

        let sum = self.vertices.iter().fold([0.0f32; 3], |acc, v| {
            [acc[0] + v[0], acc[1] + v[1], acc[2] + v[2]]
        });
        let n = self.vertices.len() as f32;
        [sum[0] / n, sum[1] / n, sum[2] / n]
    }

    /// Checks that every attribute stream has one entry per vertex and that
    /// every index refers to an existing vertex
    pub fn validate(&self) -> Result<(), String> {
        let count = self.vertices.len();
        if self.normals.len() != count {
            return Err(format!(
                "{} vertices but {} normals",
                count,
                self.normals.len()
            ));
        }
        if self.tex_coords.len() != count {
            return Err(format!(
                "{} vertices but {} uvs",
                count,
                self.tex_coords.len()
            ));
        }
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "{} indices is not a whole number of triangles",
                self.indices.len()
            ));
        }
        if let Some(bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(format!("index {bad} out of range for {count} vertices"));
        }
        Ok(())
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
