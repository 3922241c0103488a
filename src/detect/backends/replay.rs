use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::detect::backend::DetectorBackend;
use crate::detect::result::RawDetection;

/// Replay backend: serves a pre-recorded queue of per-frame detections.
///
/// Used two ways: as the test double for the engine, and as the CLI's
/// offline mode, replaying detections dumped to JSON by an external
/// detector run. Frames beyond the recorded script report no detections.
pub struct ReplayBackend {
    labels: Vec<String>,
    frames: VecDeque<Vec<RawDetection>>,
}

/// On-disk schema for a replay script.
#[derive(Serialize, Deserialize)]
pub struct ReplayScript {
    pub labels: Vec<String>,
    pub frames: Vec<Vec<RawDetection>>,
}

impl ReplayBackend {
    pub fn from_script(labels: Vec<String>, frames: Vec<Vec<RawDetection>>) -> Self {
        Self {
            labels,
            frames: frames.into(),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read detections file {}", path.display()))?;
        let script: ReplayScript = serde_json::from_str(&raw)
            .with_context(|| format!("invalid detections file {}", path.display()))?;
        Ok(Self::from_script(script.labels, script.frames))
    }
}

impl DetectorBackend for ReplayBackend {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }

    fn detect(&mut self, _pixels: &[u8], _width: u32, _height: u32) -> Result<Vec<RawDetection>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
