//! Error types for loading, geometry generation and rendering
//!
//! Every failure is logged where it happens and ends the phase it occurred in.
//! Nothing here is retried: loading is single-shot.

use std::time::Duration;

/// Failures while fetching or interpreting the scene description
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("unable to open {name} file: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("gave up on {name} file after {elapsed:?}")]
    Timeout { name: String, elapsed: Duration },

    #[error("unable to parse {name} file: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("triangle set {index} is malformed: {reason}")]
    Malformed { index: usize, reason: String },

    #[error("scene source worker for {name} disconnected")]
    Disconnected { name: String },
}

/// Rejected ellipsoid tessellation requests
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("uneven number of longitude steps: {0}")]
    OddSteps(u32),

    #[error("number of longitude steps too small: {0}")]
    TooFewSteps(u32),
}

/// Texture images that could not be read or decoded
///
/// Never fatal: the object keeps its placeholder texture.
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    #[error("unable to load texture {path}: {source}")]
    Decode {
        path: std::path::PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// GPU setup and per-frame failures
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("unable to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    Adapter(String),

    #[error("unable to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("error during {stage} of '{label}': {message}")]
    CompileOrLink {
        stage: &'static str,
        label: String,
        message: String,
    },

    #[error("unable to acquire frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}
