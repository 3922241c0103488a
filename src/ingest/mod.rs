//! Frame ingestion sources.
//!
//! This module provides the sources a video pass can read frames from:
//! - Local video files (feature: decode-ffmpeg)
//! - Directories of pre-extracted still images (jpeg/png)
//! - Synthetic `stub://` sources (tests, demo runs)
//!
//! Sources are sequential and non-restartable: a frame sequence is
//! consumed at most once. End-of-stream is reported distinctly from a
//! read error — `Ok(None)` versus `Err` — because a mid-stream failure
//! leaves the frames already read valid, while an open failure is fatal
//! for the run.

use anyhow::Result;

use crate::frame::Frame;

pub mod file;
#[cfg(feature = "decode-ffmpeg")]
pub(crate) mod file_ffmpeg;
pub mod image_dir;
mod sampler;

pub use file::{FileConfig, FileSource};
pub use image_dir::ImageDirSource;
pub use sampler::FrameSampler;

/// A sequential frame producer.
pub trait FrameSource {
    /// Produce the next decoded frame.
    ///
    /// `Ok(None)` means the source is exhausted. `Err` means a read
    /// failed; the caller decides whether frames read so far still count.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}
