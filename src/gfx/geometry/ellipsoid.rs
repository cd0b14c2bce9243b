//! # Ellipsoid Tessellation
//!
//! Builds a closed latitude/longitude mesh for an axis-aligned ellipsoid.
//! The two poles are single vertices; every latitude band in between holds
//! one vertex per longitude step and the longitude seam is closed by index.

use std::f32::consts::PI;

use super::GeometryData;
use crate::error::GeometryError;

/// Axis-aligned ellipsoid: center `(x, y, z)` and radii `(a, b, c)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsoidShape {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EllipsoidShape {
    /// Sphere of radius 1 at the origin
    pub fn unit_sphere() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            a: 1.0,
            b: 1.0,
            c: 1.0,
        }
    }

    pub fn center(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Corners of the axis-aligned box enclosing the ellipsoid
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        (
            [self.x - self.a, self.y - self.b, self.z - self.c],
            [self.x + self.a, self.y + self.b, self.z + self.c],
        )
    }

    /// Unnormalized outward normal: the gradient of the implicit surface
    fn gradient(&self, p: [f32; 3]) -> [f32; 3] {
        [
            2.0 / (self.a * self.a) * (p[0] - self.x),
            2.0 / (self.b * self.b) * (p[1] - self.y),
            2.0 / (self.c * self.c) * (p[2] - self.z),
        ]
    }

    /// Maps a point on the unit sphere onto this ellipsoid
    fn place(&self, unit: [f32; 3]) -> [f32; 3] {
        [
            unit[0] * self.a + self.x,
            unit[1] * self.b + self.y,
            unit[2] * self.c + self.z,
        ]
    }
}

/// Tessellates `shape` with `steps` longitude divisions
///
/// `steps` must be even and at least 4. The result has
/// `steps * (steps/2 - 1) + 2` vertices and
/// `steps * (steps/2 - 2) * 2 + 2 * steps` triangles.
///
/// The longitude seam shares its vertices, so the last strip of each band
/// interpolates `u` from `(steps - 1) / steps` back to 0 and a textured
/// ellipsoid shows one seam column.
///
/// # Errors
/// Returns [`GeometryError`] (and logs it) for an odd or too small step
/// count; no partial mesh is produced.
pub fn generate_ellipsoid(shape: &EllipsoidShape, steps: u32) -> Result<GeometryData, GeometryError> {
    if steps % 2 != 0 {
        log::error!("in generate_ellipsoid: uneven number of longitude steps ({steps})");
        return Err(GeometryError::OddSteps(steps));
    }
    if steps < 4 {
        log::error!("in generate_ellipsoid: number of longitude steps too small ({steps})");
        return Err(GeometryError::TooFewSteps(steps));
    }

    let angle_incr = 2.0 * PI / steps as f32;
    let bands = steps / 2 - 1;
    let mut data = GeometryData::new();

    let mut push_vertex = |data: &mut GeometryData, unit: [f32; 3], uv: [f32; 2]| {
        let position = shape.place(unit);
        data.vertices.push(position);
        data.normals.push(shape.gradient(position));
        data.tex_coords.push(uv);
    };

    // South pole
    push_vertex(&mut data, [0.0, -1.0, 0.0], [0.5, 0.0]);

    for band in 0..bands {
        let lat_angle = -PI / 2.0 + (band + 1) as f32 * angle_incr;
        let lat_radius = lat_angle.cos();
        let lat_y = lat_angle.sin();
        // Measured pole to pole, so every band sits strictly between the pole v values
        let v = (lat_angle + PI / 2.0) / PI;

        for long in 0..steps {
            let long_angle = long as f32 * angle_incr;
            push_vertex(
                &mut data,
                [
                    lat_radius * long_angle.sin(),
                    lat_y,
                    lat_radius * long_angle.cos(),
                ],
                [long as f32 / steps as f32, v],
            );
        }
    }

    // North pole
    push_vertex(&mut data, [0.0, 1.0, 0.0], [0.5, 1.0]);

    let ring = |band: u32, long: u32| 1 + band * steps + long % steps;

    // South pole fan
    for long in 0..steps {
        data.indices
            .extend_from_slice(&[0, ring(0, long), ring(0, long + 1)]);
    }

    // Quads between neighbouring bands
    for band in 0..bands - 1 {
        for long in 0..steps {
            let ll = ring(band, long);
            let lr = ring(band, long + 1);
            let ul = ring(band + 1, long);
            let ur = ring(band + 1, long + 1);
            data.indices.extend_from_slice(&[ll, ul, ur]);
            data.indices.extend_from_slice(&[ll, ur, lr]);
        }
    }

    // North pole fan
    let north = data.vertices.len() as u32 - 1;
    for long in 0..steps {
        data.indices.extend_from_slice(&[
            ring(bands - 1, long),
            north,
            ring(bands - 1, long + 1),
        ]);
    }

    Ok(data)
}
