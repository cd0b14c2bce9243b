// src/lib.rs
//! Missile Command
//!
//! An interactive wgpu scene of triangle sets and procedural ellipsoids,
//! with view and model navigation and a small projectile simulation whose
//! missiles are drawn as ellipsoid instances.

pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod gfx;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::MissileApp;
pub use config::ViewerConfig;

/// Loads the scene configured by `MISSILE_*` environment variables and runs
/// the viewer until its window is closed
pub fn run() -> anyhow::Result<()> {
    MissileApp::new(ViewerConfig::from_env())?.run()
}
