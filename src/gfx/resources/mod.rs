// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles materials, textures and the global uniform bind group.

pub mod global_bindings;
pub mod material;
pub mod texture_loader;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO};
pub use material::{Material, TextureMode};
pub use texture_loader::{ImageData, LoadedTexture, TextureLoader};
pub use texture_resource::TextureResource;
