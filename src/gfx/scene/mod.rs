//! # Scene Management Module
//!
//! Holds everything that is drawn: triangle sets loaded from the scene
//! description, procedural ellipsoids, and the typed resource tables their
//! meshes and textures live in.
//!
//! ## Key Components
//!
//! - [`Scene`] - owns objects, meshes and texture slots
//! - [`ObjectTransform`] - interactive placement and the model matrix built from it
//! - [`SceneDescription`] - the parsed `triangles.json` / `ellipsoids.json` pair
//! - [`vertex`] - layouts of the three vertex streams
//!
//! ## Usage
//!
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//! use missile_command::gfx::scene::{load_description, DirectorySource, Scene};
//!
//! let source = Arc::new(DirectorySource::new("assets"));
//! let description = load_description(source, Duration::from_secs(3)).unwrap();
//! let scene = Scene::from_description(&description, 32).unwrap();
//! println!("{:?}", scene.statistics());
//! ```

pub mod description;
pub mod object;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod vertex;

slotmap::new_key_type! {
    /// Handle into the scene's mesh table
    pub struct MeshKey;
    /// Handle into the scene's texture table
    pub struct TextureKey;
}

// Re-export main types
pub use description::{
    load_description, DirectorySource, MemorySource, SceneDescription, SceneSource,
};
pub use object::{DrawMesh, Ellipsoid, Mesh, ObjectKind, ObjectTransform, TriangleSet};
pub use scene::{
    Bounds, Scene, SceneStatistics, TextureBinding, TextureSlot, ENEMY_ARCHETYPE,
    FRIENDLY_ARCHETYPE,
};
