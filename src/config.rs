//! Viewer configuration
//!
//! Defaults reproduce the classic missile-command scene: camera half a unit
//! in front of a unit cube of play space, a white light above and behind the
//! eye, and four falling enemy missiles. A handful of values can be
//! overridden from the environment.

use std::{path::PathBuf, time::Duration};

use cgmath::Vector3;

/// Complete configuration handed to the host application
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Directory holding `triangles.json`, `ellipsoids.json` and texture images
    pub scene_dir: PathBuf,
    /// Wall-clock budget for fetching each scene description document
    pub load_timeout: Duration,
    /// Longitude steps used to tessellate every ellipsoid
    pub longitude_steps: u32,
    pub window_size: (u32, u32),
    pub view: ViewDefaults,
    pub light: LightConfig,
    /// Angle applied by one model rotation command, in radians
    pub rotate_theta: f32,
    /// Uniform scale applied to the highlighted object
    pub highlight_scale: f32,
    pub projectiles: ProjectileConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scene_dir: PathBuf::from("assets"),
            load_timeout: Duration::from_secs(3),
            longitude_steps: 32,
            window_size: (512, 512),
            view: ViewDefaults::default(),
            light: LightConfig::default(),
            rotate_theta: std::f32::consts::PI / 50.0,
            highlight_scale: 1.2,
            projectiles: ProjectileConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Builds the default configuration and applies environment overrides
    ///
    /// Recognised variables: `MISSILE_SCENE_DIR`, `MISSILE_LOAD_TIMEOUT_MS`,
    /// `MISSILE_LONGITUDE_STEPS` and `MISSILE_WINDOW_SIZE` (`WIDTHxHEIGHT`).
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("MISSILE_SCENE_DIR") {
            config.scene_dir = PathBuf::from(dir);
        }

        if let Some(ms) = parse_env::<u64>("MISSILE_LOAD_TIMEOUT_MS") {
            config.load_timeout = Duration::from_millis(ms);
        }

        if let Some(steps) = parse_env::<u32>("MISSILE_LONGITUDE_STEPS") {
            config.longitude_steps = steps;
        }

        if let Ok(size) = std::env::var("MISSILE_WINDOW_SIZE") {
            match parse_window_size(&size) {
                Some(parsed) => config.window_size = parsed,
                None => log::warn!("ignoring MISSILE_WINDOW_SIZE={size:?}, expected WIDTHxHEIGHT"),
            }
        }

        config
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring {name}={raw:?}, not a number");
            None
        }
    }
}

fn parse_window_size(raw: &str) -> Option<(u32, u32)> {
    let (width, height) = raw.trim().split_once(['x', 'X'])?;
    let width = width.trim().parse().ok()?;
    let height = height.trim().parse().ok()?;
    (width > 0 && height > 0).then_some((width, height))
}

/// Default eye, look-at center and up vector in world space
#[derive(Debug, Clone, Copy)]
pub struct ViewDefaults {
    pub eye: Vector3<f32>,
    pub center: Vector3<f32>,
    pub up: Vector3<f32>,
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.5, 0.5, -1.5),
            center: Vector3::new(0.5, 0.5, 0.5),
            up: Vector3::new(0.0, 1.0, 0.0),
        }
    }
}

/// Single point light used by the Blinn-Phong shader
#[derive(Copy, Clone, Debug)]
pub struct LightConfig {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub position: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient: [1.0, 1.0, 1.0],
            diffuse: [1.0, 1.0, 1.0],
            specular: [1.0, 1.0, 1.0],
            position: [0.5, 2.0, -1.0],
        }
    }
}

/// Constants driving the enemy and friendly missile simulation
#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    /// Enemy missiles alive at any time
    pub enemy_count: usize,
    /// Per-frame decrease of an enemy's height
    pub fall_step: f32,
    /// Lower bound of the horizontal drift magnitude
    pub min_drift: f32,
    /// Exclusive upper bound of the horizontal drift magnitude
    pub max_drift: f32,
    /// Spawn height range `[start, end)` for enemies
    pub spawn_height: (f32, f32),
    /// Distance a friendly missile travels per frame
    pub friendly_step: f32,
    /// Remaining distance at which a friendly missile counts as arrived
    pub arrival_radius: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            enemy_count: 4,
            fall_step: 0.002,
            min_drift: 0.000_05,
            max_drift: 0.001,
            spawn_height: (1.0, 3.0),
            friendly_step: 0.01,
            arrival_radius: 0.01,
        }
    }
}
