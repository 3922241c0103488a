//! Frame source over a directory of pre-extracted still images.
//!
//! Accepts a directory of jpeg/png stills (typically dumped by an
//! external frame-extraction step) and serves them in alphabetical order.
//! This is the real-input path that works without the FFmpeg feature.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use super::FrameSource;
use crate::frame::Frame;

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Ordered frame source over a still-image directory.
pub struct ImageDirSource {
    files: Vec<PathBuf>,
    next: usize,
}

impl ImageDirSource {
    /// Fails when the directory cannot be read or holds no image files.
    pub fn new(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("failed to open frame directory {}", dir.display()))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(anyhow!(
                "frame directory {} contains no jpeg/png files",
                dir.display()
            ));
        }

        log::info!(
            "ImageDirSource: {} frames in {}",
            files.len(),
            dir.display()
        );
        Ok(Self { files, next: 0 })
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;

        let decoded = image::open(path)
            .with_context(|| format!("failed to decode frame {}", path.display()))?
            .to_rgb8();

        let (width, height) = decoded.dimensions();
        Frame::new(decoded.into_raw(), width, height)
            .ok_or_else(|| anyhow!("decoded frame {} has a malformed buffer", path.display()))
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_an_open_error() {
        assert!(ImageDirSource::new(Path::new("/nonexistent/frames")).is_err());
    }

    #[test]
    fn empty_directory_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageDirSource::new(dir.path()).is_err());
    }

    #[test]
    fn serves_frames_in_alphabetical_order() {
        let dir = tempfile::tempdir().unwrap();
        for (name, shade) in [("b_frame.png", 200u8), ("a_frame.png", 10u8)] {
            let img = image::RgbImage::from_pixel(4, 4, image::Rgb([shade, shade, shade]));
            img.save(dir.path().join(name)).unwrap();
        }

        let mut source = ImageDirSource::new(dir.path()).unwrap();
        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.pixels()[0], 10);
        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.pixels()[0], 200);
        assert!(source.next_frame().unwrap().is_none());
    }
}
