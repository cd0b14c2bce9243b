//! # Graphics Module
//!
//! Camera, geometry generation, scene management, GPU resources and the
//! renderer.
//!
//! - **Camera** ([`camera`]) - look-at camera navigated in its own frame
//! - **Geometry** ([`geometry`]) - CPU meshes and ellipsoid tessellation
//! - **Scene** ([`scene`]) - triangle sets, ellipsoids and their resource tables
//! - **Resources** ([`resources`]) - materials, textures and global uniforms
//! - **Rendering** ([`rendering`]) - frame planning and the wgpu engine
//!
//! ```no_run
//! use missile_command::gfx::geometry::{generate_ellipsoid, EllipsoidShape};
//!
//! let mesh = generate_ellipsoid(&EllipsoidShape::unit_sphere(), 32).unwrap();
//! println!("{} triangles", mesh.triangle_count());
//! ```

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::ViewCamera;
pub use rendering::{FrameRenderer, RenderEngine};
