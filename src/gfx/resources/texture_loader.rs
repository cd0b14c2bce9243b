//! Background texture decoding
//!
//! Images are decoded on worker threads and handed back over a channel. The
//! frame loop drains finished images without ever blocking on a decode.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use crate::{error::TextureError, gfx::scene::TextureKey};

/// Decoded RGBA8 image ready for GPU upload
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw RGBA pixel data, bottom row first
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ImageData {
    /// Decodes an image file and flips it so `v = 0` samples the image bottom
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path_ref = path.as_ref();
        log::debug!("Loading image from: {:?}", path_ref);

        let img = image::open(path_ref).map_err(|source| TextureError::Decode {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let rgba_img = img.flipv().to_rgba8();
        let (width, height) = rgba_img.dimensions();
        log::info!("Loaded image {}x{} from {:?}", width, height, path_ref);

        Ok(Self {
            data: rgba_img.into_raw(),
            width,
            height,
        })
    }

    /// Shrinks the image so neither side exceeds `max_dim`, keeping its aspect
    ///
    /// Returns `None` when `data` does not hold `width * height` pixels.
    pub fn fit_within(self, max_dim: u32) -> Option<Self> {
        let Some((width, height)) = fitted_size(self.width, self.height, max_dim) else {
            return Some(self);
        };
        let source = image::RgbaImage::from_raw(self.width, self.height, self.data)?;
        log::warn!(
            "downscaling {}x{} texture to {width}x{height} (device limit {max_dim})",
            self.width,
            self.height
        );
        let resized = image::imageops::resize(&source, width, height, image::imageops::FilterType::Triangle);
        Some(Self {
            data: resized.into_raw(),
            width,
            height,
        })
    }
}

/// Size that fits `width` x `height` inside a `max_dim` square, or `None` if it already fits
pub fn fitted_size(width: u32, height: u32, max_dim: u32) -> Option<(u32, u32)> {
    let longest = width.max(height);
    if longest <= max_dim {
        return None;
    }
    let scale = |side: u32| (u64::from(side) * u64::from(max_dim) / u64::from(longest)).max(1) as u32;
    Some((scale(width), scale(height)))
}

/// Outcome of one background decode
#[derive(Debug)]
pub struct LoadedTexture {
    pub key: TextureKey,
    pub result: Result<ImageData, TextureError>,
}

/// Spawns decode jobs and collects their results
pub struct TextureLoader {
    sender: Sender<LoadedTexture>,
    receiver: Receiver<LoadedTexture>,
    pending: usize,
}

impl Default for TextureLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureLoader {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            sender,
            receiver,
            pending: 0,
        }
    }

    /// Starts decoding `path` for texture slot `key`
    pub fn request(&mut self, key: TextureKey, path: PathBuf) {
        let sender = self.sender.clone();
        self.pending += 1;
        thread::spawn(move || {
            let result = ImageData::from_file(&path);
            // The loader may already be gone when the app shuts down mid-load
            let _ = sender.send(LoadedTexture { key, result });
        });
    }

    /// Decodes still in flight
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Returns every image finished since the last call, without blocking
    pub fn drain(&mut self) -> Vec<LoadedTexture> {
        let finished: Vec<_> = self.receiver.try_iter().collect();
        self.pending -= finished.len().min(self.pending);
        finished
    }

    /// Blocks up to `timeout` for the next finished image
    #[cfg(test)]
    pub fn recv_timeout(&mut self, timeout: std::time::Duration) -> Option<LoadedTexture> {
        let loaded = self.receiver.recv_timeout(timeout).ok()?;
        self.pending = self.pending.saturating_sub(1);
        Some(loaded)
    }
}
