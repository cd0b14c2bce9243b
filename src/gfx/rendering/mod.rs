// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! [`FrameRenderer`] turns the scene and the projectile records into a
//! [`FramePlan`]; [`RenderEngine`] records that plan on the GPU.

pub mod frame_renderer;
pub mod pipeline_manager;
pub mod render_engine;

// Re-export main types
pub use frame_renderer::{DrawCommand, DrawUniform, FramePlan, FrameRenderer};
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
