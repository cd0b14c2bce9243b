pub mod view_camera;

// Re-export main types
pub use view_camera::{ViewCamera, OPENGL_TO_WGPU_MATRIX};
