use cgmath::*;

use crate::config::ViewDefaults;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Free look-at camera driven by eye, center and up vectors
///
/// All navigation is expressed in terms of the view's own look-at and
/// right directions, so the same key always moves relative to the screen.
#[derive(Debug, Clone, Copy)]
pub struct ViewCamera {
    pub eye: Vector3<f32>,
    pub center: Vector3<f32>,
    pub up: Vector3<f32>,
    defaults: ViewDefaults,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl ViewCamera {
    pub fn new(defaults: ViewDefaults, aspect: f32) -> Self {
        Self {
            eye: defaults.eye,
            center: defaults.center,
            up: defaults.up,
            defaults,
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 10.0,
        }
    }

    /// Unit vector from eye toward center
    pub fn look_at(&self) -> Vector3<f32> {
        (self.center - self.eye).normalize()
    }

    /// Unit vector `look_at × up`
    pub fn right(&self) -> Vector3<f32> {
        self.look_at().cross(self.up).normalize()
    }

    /// Moves eye and center together
    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.eye += offset;
        self.center += offset;
    }

    /// Turns the view by moving only the center
    pub fn turn(&mut self, offset: Vector3<f32>) {
        self.center += offset;
    }

    /// Moves the center by `offset` and rebuilds up so it stays
    /// perpendicular to the new viewing direction
    pub fn pitch(&mut self, offset: Vector3<f32>) {
        let right = self.right();
        self.center += offset;
        self.up = right.cross(self.center - self.eye).normalize();
    }

    /// Tilts the up vector by `offset`
    pub fn roll(&mut self, offset: Vector3<f32>) {
        self.up = (self.up + offset).normalize();
    }

    /// Restores eye, center and up
    pub fn reset(&mut self) {
        self.eye = self.defaults.eye;
        self.center = self.defaults.center;
        self.up = self.defaults.up;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.eye),
            Point3::from_vec(self.center),
            self.up,
        )
    }

    pub fn build_projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        self.build_projection_matrix() * self.build_view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> ViewCamera {
        ViewCamera::new(ViewDefaults::default(), 1.0)
    }

    #[test]
    fn test_default_basis() {
        let camera = camera();
        assert!((camera.look_at() - Vector3::unit_z()).magnitude() < 1e-6);
        // Looking down +z with +y up puts screen right at world -x
        assert!((camera.right() - Vector3::new(-1.0, 0.0, 0.0)).magnitude() < 1e-6);
    }

    #[test]
    fn test_center_projects_to_screen_middle_inside_depth_range() {
        let camera = camera();
        let clip = camera.build_view_projection_matrix() * camera.center.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0, "depth {}", ndc.z);
    }

    #[test]
    fn test_pitch_keeps_up_perpendicular() {
        let mut camera = camera();
        for _ in 0..25 {
            let offset = camera.up * 0.05;
            camera.pitch(offset);
            assert!(camera.up.dot(camera.look_at()).abs() < 1e-5);
            assert!((camera.up.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_translate_and_reset() {
        let mut camera = camera();
        let right = camera.right();
        camera.translate(right * 0.1);
        camera.turn(right * 0.1);
        camera.roll(right * 0.1);
        assert!((camera.eye - ViewDefaults::default().eye).magnitude() > 0.0);

        camera.reset();
        assert_eq!(camera.eye, ViewDefaults::default().eye);
        assert_eq!(camera.center, ViewDefaults::default().center);
        assert_eq!(camera.up, ViewDefaults::default().up);
    }

    #[test]
    fn test_resize_ignores_zero_area() {
        let mut camera = camera();
        camera.resize(800, 400);
        assert_eq!(camera.aspect, 2.0);
        camera.resize(0, 400);
        assert_eq!(camera.aspect, 2.0);
    }
}
