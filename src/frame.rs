//! Decoded frame container.
//!
//! `Frame` is the unit handed from ingest sources to the engine: an owned
//! RGB24 buffer plus dimensions. Crops are clamped to the frame bounds; a
//! region that is empty after clamping yields `None` rather than an error,
//! so one malformed bounding box never aborts a frame.

use crate::detect::BoundingBox;

/// One decoded video frame, RGB24 (3 bytes per pixel, row-major).
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    /// Create a frame from an RGB24 buffer. The buffer length must be
    /// exactly `width * height * 3`.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if data.len() != (width as usize) * (height as usize) * 3 {
            return None;
        }
        Some(Self {
            data,
            width,
            height,
        })
    }

    /// Solid-color frame. Used by synthetic sources and tests.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 3);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgb);
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// RGB value at (x, y). Callers must stay in bounds.
    pub(crate) fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    /// Overwrite the region covered by `bbox` with a solid color.
    /// Out-of-bounds parts are ignored. Used by synthetic sources.
    pub fn paint(&mut self, bbox: &BoundingBox, rgb: [u8; 3]) {
        let x1 = bbox.x1.max(0.0).min(self.width as f32) as u32;
        let y1 = bbox.y1.max(0.0).min(self.height as f32) as u32;
        let x2 = bbox.x2.max(0.0).min(self.width as f32) as u32;
        let y2 = bbox.y2.max(0.0).min(self.height as f32) as u32;
        for y in y1..y2 {
            for x in x1..x2 {
                let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 3;
                self.data[idx..idx + 3].copy_from_slice(&rgb);
            }
        }
    }

    /// Crop the region covered by `bbox`, clamped to frame bounds.
    ///
    /// Returns `None` when the clamped region is empty (degenerate box,
    /// fully out-of-frame box, or inverted coordinates).
    pub fn crop(&self, bbox: &BoundingBox) -> Option<Frame> {
        let x1 = bbox.x1.max(0.0).min(self.width as f32) as u32;
        let y1 = bbox.y1.max(0.0).min(self.height as f32) as u32;
        let x2 = bbox.x2.max(0.0).min(self.width as f32) as u32;
        let y2 = bbox.y2.max(0.0).min(self.height as f32) as u32;

        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        let (w, h) = (x2 - x1, y2 - y1);
        let mut data = Vec::with_capacity((w as usize) * (h as usize) * 3);
        for y in y1..y2 {
            let start = ((y as usize) * (self.width as usize) + (x1 as usize)) * 3;
            let end = start + (w as usize) * 3;
            data.extend_from_slice(&self.data[start..end]);
        }
        Some(Frame {
            data,
            width: w,
            height: h,
        })
    }
}
