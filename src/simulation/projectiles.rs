//! # Missile Simulation
//!
//! Enemy missiles fall from above the play area with a small sideways
//! drift and are respawned in place once they drop below the ground.
//! Friendly missiles launch from one of three silos and home straight at the
//! point that was clicked.
//!
//! The simulator has no clock of its own. The frame renderer advances each
//! record right after drawing it and calls
//! [`end_frame`](ProjectileSimulator::end_frame) once all draws are issued.

use cgmath::{InnerSpace, Vector2, Vector3};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::config::ProjectileConfig;

/// Silo positions friendly missiles start from
pub const RIGHT_SILO: [f32; 3] = [0.9, 0.1, 0.0];
pub const LEFT_SILO: [f32; 3] = [0.1, 0.1, 0.0];
pub const CENTER_SILO: [f32; 3] = [0.5, 0.1, 0.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyMissile {
    pub position: Vector3<f32>,
    /// Subtracted from `x` every frame; negative on the left half
    pub fall_rate: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FriendlyMissile {
    pub position: Vector3<f32>,
    pub target: Vector2<f32>,
    /// Set once the missile is within the arrival radius of its target
    pub arrived: bool,
}

impl FriendlyMissile {
    /// Silo chosen by the horizontal click position
    pub fn launch_site(target_x: f32) -> Vector3<f32> {
        let site = if target_x > 0.7 {
            RIGHT_SILO
        } else if target_x < 0.3 {
            LEFT_SILO
        } else {
            CENTER_SILO
        };
        Vector3::from(site)
    }

    fn remaining(&self) -> Vector2<f32> {
        self.target - self.position.truncate()
    }
}

/// Owns the enemy and friendly missile collections
pub struct ProjectileSimulator {
    config: ProjectileConfig,
    rng: StdRng,
    enemies: Vec<EnemyMissile>,
    friendlies: Vec<FriendlyMissile>,
}

impl ProjectileSimulator {
    pub fn new(config: ProjectileConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Deterministic simulator for tests and replays
    pub fn with_seed(config: ProjectileConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ProjectileConfig, rng: StdRng) -> Self {
        let mut simulator = Self {
            config,
            rng,
            enemies: Vec::with_capacity(config.enemy_count),
            friendlies: Vec::new(),
        };
        for _ in 0..config.enemy_count {
            let enemy = simulator.spawn_enemy();
            simulator.enemies.push(enemy);
        }
        log::debug!("spawned {} enemy missiles", simulator.enemies.len());
        simulator
    }

    pub fn enemies(&self) -> &[EnemyMissile] {
        &self.enemies
    }

    pub fn friendlies(&self) -> &[FriendlyMissile] {
        &self.friendlies
    }

    fn spawn_enemy(&mut self) -> EnemyMissile {
        let (low, high) = self.config.spawn_height;
        let x = self.rng.random_range(0.0..1.0);
        let y = self.rng.random_range(low..high);
        let drift = self
            .rng
            .random_range(self.config.min_drift..self.config.max_drift);

        EnemyMissile {
            position: Vector3::new(x, y, 0.0),
            fall_rate: if x < 0.5 { -drift } else { drift },
        }
    }

    /// Launches a friendly missile at normalized screen position `(x, y)`
    pub fn fire(&mut self, x: f32, y: f32) {
        let missile = FriendlyMissile {
            position: FriendlyMissile::launch_site(x),
            target: Vector2::new(x, y),
            arrived: false,
        };
        log::debug!(
            "friendly missile from {:?} toward ({x:.3}, {y:.3})",
            missile.position
        );
        self.friendlies.push(missile);
    }

    /// Moves enemy `index` one frame down, respawning it below ground
    pub fn advance_enemy(&mut self, index: usize) {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return;
        };
        enemy.position.y -= self.config.fall_step;
        enemy.position.x -= enemy.fall_rate;

        if enemy.position.y < 0.0 {
            let respawned = self.spawn_enemy();
            self.enemies[index] = respawned;
        }
    }

    /// Moves friendly `index` one step toward its target
    pub fn advance_friendly(&mut self, index: usize) {
        let step = self.config.friendly_step;
        let radius = self.config.arrival_radius;
        let Some(missile) = self.friendlies.get_mut(index) else {
            return;
        };
        if missile.arrived {
            return;
        }

        let remaining = missile.remaining();
        if remaining.magnitude2() == 0.0 {
            missile.arrived = true;
            return;
        }

        let offset = remaining.normalize() * step;
        missile.position.x += offset.x;
        missile.position.y += offset.y;

        if missile.remaining().magnitude() <= radius {
            missile.arrived = true;
        }
    }

    /// Drops friendly missiles that arrived; returns how many were removed
    pub fn end_frame(&mut self) -> usize {
        let before = self.friendlies.len();
        self.friendlies.retain(|m| !m.arrived);
        let removed = before - self.friendlies.len();
        if removed > 0 {
            log::debug!("{removed} friendly missiles reached their targets");
        }
        removed
    }
}
