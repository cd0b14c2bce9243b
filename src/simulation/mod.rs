// src/simulation/mod.rs
//! Simulation system
//!
//! Per-frame state that is not part of the static scene: the enemy and
//! friendly missiles.

pub mod projectiles;

pub use projectiles::{EnemyMissile, FriendlyMissile, ProjectileSimulator};
