//! Local video file frame source.
//!
//! `FileSource` accepts local paths only (no URL schemes). A `stub://`
//! path selects a deterministic synthetic clip used by tests and demo
//! runs; anything else is decoded with FFmpeg behind the `decode-ffmpeg`
//! feature. Construction fails when the source cannot be opened — that is
//! the fatal, non-retryable case; once frames are flowing, read problems
//! are surfaced per-frame and handled by the sampler.

use anyhow::{anyhow, Result};

use super::FrameSource;
use crate::detect::BoundingBox;
use crate::frame::Frame;

const STUB_PREFIX: &str = "stub://";
const STUB_WIDTH: u32 = 320;
const STUB_HEIGHT: u32 = 240;
const STUB_DEFAULT_FRAMES: u64 = 30;

/// Configuration for a local file source.
#[derive(Clone, Debug)]
pub struct FileConfig {
    /// Local file path, or `stub://<name>[:frames]` for a synthetic clip.
    pub path: String,
}

/// Local file frame source.
pub struct FileSource {
    backend: FileBackend,
}

enum FileBackend {
    Synthetic(SyntheticFileSource),
    #[cfg(feature = "decode-ffmpeg")]
    Ffmpeg(super::file_ffmpeg::FfmpegFileSource),
}

impl FileSource {
    pub fn new(config: FileConfig) -> Result<Self> {
        if !is_local_file_path(&config.path) {
            return Err(anyhow!(
                "file ingestion only supports local paths (no URL schemes)"
            ));
        }
        if let Some(rest) = config.path.strip_prefix(STUB_PREFIX) {
            return Ok(Self {
                backend: FileBackend::Synthetic(SyntheticFileSource::new(rest)),
            });
        }
        #[cfg(feature = "decode-ffmpeg")]
        {
            Ok(Self {
                backend: FileBackend::Ffmpeg(super::file_ffmpeg::FfmpegFileSource::open(
                    &config.path,
                )?),
            })
        }
        #[cfg(not(feature = "decode-ffmpeg"))]
        {
            Err(anyhow!(
                "opening '{}' requires the decode-ffmpeg feature",
                config.path
            ))
        }
    }
}

impl FrameSource for FileSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        match &mut self.backend {
            FileBackend::Synthetic(source) => source.next_frame(),
            #[cfg(feature = "decode-ffmpeg")]
            FileBackend::Ffmpeg(source) => source.next_frame(),
        }
    }
}

// ----------------------------------------------------------------------------
// Synthetic source (stub://) for tests and demo runs
// ----------------------------------------------------------------------------

/// Finite synthetic clip: a colored square drifting across a dark
/// background. `stub://<name>:<frames>` overrides the frame count.
struct SyntheticFileSource {
    frame_limit: u64,
    produced: u64,
}

impl SyntheticFileSource {
    fn new(spec: &str) -> Self {
        let frame_limit = spec
            .rsplit_once(':')
            .and_then(|(_, count)| count.parse::<u64>().ok())
            .unwrap_or(STUB_DEFAULT_FRAMES);
        log::info!("FileSource: synthetic clip, {} frames", frame_limit);
        Self {
            frame_limit,
            produced: 0,
        }
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.produced >= self.frame_limit {
            return Ok(None);
        }
        self.produced += 1;

        let mut frame = Frame::filled(STUB_WIDTH, STUB_HEIGHT, [20, 20, 20]);
        // Square drifts right one pixel per frame, staying near center.
        let x = (STUB_WIDTH as f32 / 2.0 - 30.0) + (self.produced % 20) as f32;
        let y = STUB_HEIGHT as f32 / 2.0 - 30.0;
        frame.paint(&BoundingBox::new(x, y, x + 60.0, y + 60.0), [200, 40, 40]);
        Ok(Some(frame))
    }
}

fn is_local_file_path(path: &str) -> bool {
    if path.trim().is_empty() {
        return false;
    }
    if path.starts_with(STUB_PREFIX) {
        return true;
    }
    !path.contains("://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_url_schemes_and_empty_paths() {
        assert!(FileSource::new(FileConfig {
            path: "rtsp://camera".to_string()
        })
        .is_err());
        assert!(FileSource::new(FileConfig {
            path: "  ".to_string()
        })
        .is_err());
    }

    #[test]
    fn stub_source_is_finite() {
        let mut source = FileSource::new(FileConfig {
            path: "stub://clip:4".to_string(),
        })
        .unwrap();
        let mut frames = 0;
        while source.next_frame().unwrap().is_some() {
            frames += 1;
        }
        assert_eq!(frames, 4);
        // Exhausted sources stay exhausted.
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn stub_frames_have_expected_dimensions() {
        let mut source = FileSource::new(FileConfig {
            path: "stub://clip".to_string(),
        })
        .unwrap();
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.width, STUB_WIDTH);
        assert_eq!(frame.height, STUB_HEIGHT);
    }
}
