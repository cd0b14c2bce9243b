//! # Scene Description
//!
//! The scene arrives as two JSON documents: `triangles.json`, an array of
//! triangle sets each carrying its own material, and `ellipsoids.json`, an
//! array of ellipsoid shapes with inline reflectivities. A texture named
//! `"none"` means the object is untextured.
//!
//! Documents are fetched through a [`SceneSource`] so the loader does not
//! care whether they live in a directory or in memory.

use std::{
    collections::HashMap,
    path::PathBuf,
    sync::{
        mpsc::{self, RecvTimeoutError},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::SceneError,
    gfx::geometry::{EllipsoidShape, GeometryData},
};

pub const TRIANGLES_DOCUMENT: &str = "triangles.json";
pub const ELLIPSOIDS_DOCUMENT: &str = "ellipsoids.json";

/// Texture name marking an untextured object
pub const NO_TEXTURE: &str = "none";

fn no_texture() -> String {
    NO_TEXTURE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub n: f32,
    #[serde(default = "no_texture")]
    pub texture: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleSetDescription {
    pub material: MaterialDescription,
    pub vertices: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleSetDescription {
    /// Checks stream lengths and index ranges of set number `index`
    pub fn validate(&self, index: usize) -> Result<(), SceneError> {
        let count = self.vertices.len();
        let malformed = |reason: String| SceneError::Malformed { index, reason };

        if count == 0 || self.triangles.is_empty() {
            return Err(malformed(format!(
                "empty set ({count} vertices, {} triangles)",
                self.triangles.len()
            )));
        }

        if self.normals.len() != count {
            return Err(malformed(format!(
                "{count} vertices but {} normals",
                self.normals.len()
            )));
        }
        if self.uvs.len() != count {
            return Err(malformed(format!("{count} vertices but {} uvs", self.uvs.len())));
        }
        if let Some(bad) = self.triangles.iter().flatten().find(|&&i| i as usize >= count) {
            return Err(malformed(format!(
                "triangle index {bad} out of range for {count} vertices"
            )));
        }
        Ok(())
    }

    pub fn to_geometry(&self) -> GeometryData {
        GeometryData {
            vertices: self.vertices.clone(),
            tex_coords: self.uvs.clone(),
            normals: self.normals.clone(),
            indices: self.triangles.iter().flatten().copied().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipsoidDescription {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub n: f32,
    #[serde(default = "no_texture")]
    pub texture: String,
}

impl EllipsoidDescription {
    pub fn shape(&self) -> EllipsoidShape {
        EllipsoidShape {
            x: self.x,
            y: self.y,
            z: self.z,
            a: self.a,
            b: self.b,
            c: self.c,
        }
    }
}

/// Both documents, parsed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDescription {
    pub triangle_sets: Vec<TriangleSetDescription>,
    pub ellipsoids: Vec<EllipsoidDescription>,
}

impl SceneDescription {
    /// Parses the two documents and validates every triangle set
    pub fn from_json(triangles: &str, ellipsoids: &str) -> Result<Self, SceneError> {
        let triangle_sets: Vec<TriangleSetDescription> = parse(TRIANGLES_DOCUMENT, triangles)?;
        for (index, set) in triangle_sets.iter().enumerate() {
            set.validate(index)?;
        }
        let ellipsoids = parse(ELLIPSOIDS_DOCUMENT, ellipsoids)?;

        Ok(Self {
            triangle_sets,
            ellipsoids,
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(name: &str, text: &str) -> Result<T, SceneError> {
    serde_json::from_str(text).map_err(|source| SceneError::Parse {
        name: name.to_string(),
        source,
    })
}

/// Where scene documents and texture images come from
pub trait SceneSource: Send + Sync {
    /// Returns the full text of document `name`
    fn fetch(&self, name: &str) -> Result<String, SceneError>;

    /// Location of texture image `name`
    fn locate(&self, name: &str) -> PathBuf;
}

/// Reads documents and textures from one directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SceneSource for DirectorySource {
    fn fetch(&self, name: &str) -> Result<String, SceneError> {
        std::fs::read_to_string(self.root.join(name)).map_err(|source| SceneError::Io {
            name: name.to_string(),
            source,
        })
    }

    fn locate(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Documents held in memory, keyed by name
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, name: &str, text: impl Into<String>) -> Self {
        self.documents.insert(name.to_string(), text.into());
        self
    }
}

impl SceneSource for MemorySource {
    fn fetch(&self, name: &str) -> Result<String, SceneError> {
        self.documents.get(name).cloned().ok_or_else(|| SceneError::Io {
            name: name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such document"),
        })
    }

    fn locate(&self, name: &str) -> PathBuf {
        PathBuf::from(name)
    }
}

/// Fetches and parses both documents, giving each fetch `timeout`
///
/// Fetches run on a worker thread; a fetch still running when the budget
/// runs out fails the whole load. Every failure is logged.
pub fn load_description<S>(source: Arc<S>, timeout: Duration) -> Result<SceneDescription, SceneError>
where
    S: SceneSource + ?Sized + 'static,
{
    let result = fetch_with_timeout(&source, TRIANGLES_DOCUMENT, timeout).and_then(|triangles| {
        let ellipsoids = fetch_with_timeout(&source, ELLIPSOIDS_DOCUMENT, timeout)?;
        SceneDescription::from_json(&triangles, &ellipsoids)
    });

    match &result {
        Ok(description) => log::info!(
            "loaded scene description: {} triangle sets, {} ellipsoids",
            description.triangle_sets.len(),
            description.ellipsoids.len()
        ),
        Err(e) => log::error!("scene load failed: {e}"),
    }
    result
}

fn fetch_with_timeout<S>(source: &Arc<S>, name: &str, timeout: Duration) -> Result<String, SceneError>
where
    S: SceneSource + ?Sized + 'static,
{
    let (sender, receiver) = mpsc::channel();
    let worker_source = Arc::clone(source);
    let document = name.to_string();

    thread::spawn(move || {
        // Nobody listens any more once the fetch has timed out
        let _ = sender.send(worker_source.fetch(&document));
    });

    let started = Instant::now();
    match receiver.recv_timeout(timeout) {
        Ok(result) => result,
        Err(RecvTimeoutError::Timeout) => Err(SceneError::Timeout {
            name: name.to_string(),
            elapsed: started.elapsed(),
        }),
        Err(RecvTimeoutError::Disconnected) => Err(SceneError::Disconnected {
            name: name.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT_TRIANGLE: &str = r#"[{
        "material": {"ambient": [0.1,0.1,0.1], "diffuse": [0.6,0.4,0.4],
                     "specular": [0.3,0.3,0.3], "n": 11, "texture": "tree.png"},
        "vertices": [[0,0,0],[1,0,0],[0,1,0]],
        "normals": [[0,0,-1],[0,0,-1],[0,0,-1]],
        "uvs": [[0,0],[1,0],[0,1]],
        "triangles": [[0,1,2]]
    }]"#;

    const UNIT_SPHERE: &str = r#"[{
        "x": 0, "y": 0, "z": 0, "a": 1, "b": 1, "c": 1,
        "ambient": [0.1,0.1,0.1], "diffuse": [0.0,0.0,0.6],
        "specular": [0.3,0.3,0.3], "n": 5, "texture": "none"
    }]"#;

    struct StalledSource;

    impl SceneSource for StalledSource {
        fn fetch(&self, _name: &str) -> Result<String, SceneError> {
            thread::sleep(Duration::from_millis(500));
            Ok("[]".to_string())
        }

        fn locate(&self, name: &str) -> PathBuf {
            PathBuf::from(name)
        }
    }

    #[test]
    fn test_parses_both_documents() {
        let description = SceneDescription::from_json(UNIT_TRIANGLE, UNIT_SPHERE).unwrap();
        assert_eq!(description.triangle_sets.len(), 1);
        assert_eq!(description.ellipsoids.len(), 1);
        assert_eq!(description.triangle_sets[0].material.texture, "tree.png");
        assert_eq!(description.ellipsoids[0].shape(), EllipsoidShape::unit_sphere());

        let geometry = description.triangle_sets[0].to_geometry();
        assert_eq!(geometry.indices, vec![0, 1, 2]);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn test_missing_texture_defaults_to_none() {
        let ellipsoids = r#"[{"x":0,"y":0,"z":0,"a":1,"b":1,"c":1,
            "ambient":[0,0,0],"diffuse":[0,0,0],"specular":[0,0,0],"n":1}]"#;
        let description = SceneDescription::from_json("[]", ellipsoids).unwrap();
        assert_eq!(description.ellipsoids[0].texture, NO_TEXTURE);
    }

    #[test]
    fn test_rejects_out_of_range_triangle() {
        let broken = UNIT_TRIANGLE.replace("[[0,1,2]]", "[[0,1,3]]");
        let err = SceneDescription::from_json(&broken, UNIT_SPHERE).unwrap_err();
        assert!(matches!(err, SceneError::Malformed { index: 0, .. }), "{err}");
    }

    #[test]
    fn test_rejects_empty_triangle_set() {
        let empty = r#"[{
            "material": {"ambient": [0,0,0], "diffuse": [0,0,0],
                         "specular": [0,0,0], "n": 1, "texture": "none"},
            "vertices": [], "normals": [], "uvs": [], "triangles": []
        }]"#;
        let err = SceneDescription::from_json(empty, UNIT_SPHERE).unwrap_err();
        assert!(matches!(err, SceneError::Malformed { index: 0, .. }), "{err}");

        let no_triangles = UNIT_TRIANGLE.replace("[[0,1,2]]", "[]");
        let err = SceneDescription::from_json(&no_triangles, UNIT_SPHERE).unwrap_err();
        assert!(matches!(err, SceneError::Malformed { index: 0, .. }), "{err}");
    }

    #[test]
    fn test_rejects_unparsable_document() {
        let err = SceneDescription::from_json(UNIT_TRIANGLE, "{not json").unwrap_err();
        match err {
            SceneError::Parse { name, .. } => assert_eq!(name, ELLIPSOIDS_DOCUMENT),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_load_from_memory_source() {
        let source = MemorySource::new()
            .with_document(TRIANGLES_DOCUMENT, UNIT_TRIANGLE)
            .with_document(ELLIPSOIDS_DOCUMENT, UNIT_SPHERE);
        let description = load_description(Arc::new(source), Duration::from_secs(3)).unwrap();
        assert_eq!(description.triangle_sets.len(), 1);
    }

    #[test]
    fn test_missing_document_is_io_error() {
        let source = MemorySource::new().with_document(TRIANGLES_DOCUMENT, UNIT_TRIANGLE);
        let err = load_description(Arc::new(source), Duration::from_secs(3)).unwrap_err();
        assert!(matches!(err, SceneError::Io { ref name, .. } if name == ELLIPSOIDS_DOCUMENT));
    }

    #[test]
    fn test_slow_source_times_out() {
        let err = load_description(Arc::new(StalledSource), Duration::from_millis(20)).unwrap_err();
        match err {
            SceneError::Timeout { name, elapsed } => {
                assert_eq!(name, TRIANGLES_DOCUMENT);
                assert!(elapsed >= Duration::from_millis(20));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_directory_source_reads_files() {
        let dir = std::env::temp_dir().join(format!("missile-command-scene-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TRIANGLES_DOCUMENT), UNIT_TRIANGLE).unwrap();
        std::fs::write(dir.join(ELLIPSOIDS_DOCUMENT), UNIT_SPHERE).unwrap();

        let source = DirectorySource::new(&dir);
        assert_eq!(source.locate("tree.png"), dir.join("tree.png"));
        let description = load_description(Arc::new(source), Duration::from_secs(3)).unwrap();
        assert_eq!(description.ellipsoids.len(), 1);
    }
}
