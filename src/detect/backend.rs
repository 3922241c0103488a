use anyhow::Result;

use crate::detect::result::RawDetection;

/// Detector backend trait.
///
/// The detector is a black box at the engine boundary: given one decoded
/// RGB24 frame it returns the detections it found, and exposes a label
/// table mapping class IDs to label strings. Callers construct a backend
/// once and pass it into the engine explicitly; there is no process-wide
/// detector singleton.
pub trait DetectorBackend: Send {
    /// Backend identifier.
    fn name(&self) -> &'static str;

    /// Class-ID to label table. IDs outside this table are reported as
    /// `unknown_<id>` by the filter.
    fn labels(&self) -> &[String];

    /// Run detection on a frame.
    ///
    /// `pixels` is the RGB24 buffer of a single frame. Implementations
    /// must treat it as read-only and ephemeral.
    fn detect(&mut self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<RawDetection>>;

    /// Optional warm-up hook.
    fn warm_up(&mut self) -> Result<()> {
        Ok(())
    }
}
