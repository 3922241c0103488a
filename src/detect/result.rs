use serde::{Deserialize, Serialize};

/// Axis-aligned box in pixel coordinates, `x1 < x2`, `y1 < y2` when valid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn is_valid(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }
}

/// One object instance reported by the detector for one frame.
///
/// The class is an index into the backend's label table; resolution to a
/// label string happens in the filter, so a truncated table degrades to a
/// synthesized `unknown_<id>` label instead of failing the frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// A detection with its class resolved to a label string.
#[derive(Clone, Debug)]
pub struct Detection {
    pub class: String,
    pub confidence: f32,
    pub bbox: BoundingBox,
}

/// Resolve a class ID against a backend label table.
///
/// IDs outside the table synthesize `unknown_<id>` (noise suppression,
/// not an error).
pub fn resolve_label(labels: &[String], class_id: usize) -> String {
    match labels.get(class_id) {
        Some(label) => label.clone(),
        None => format!("unknown_{}", class_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_center_and_validity() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 60.0);
        assert_eq!(b.center(), (20.0, 40.0));
        assert!(b.is_valid());
        assert!(!BoundingBox::new(30.0, 20.0, 10.0, 60.0).is_valid());
        assert!(!BoundingBox::new(10.0, 20.0, 10.0, 60.0).is_valid());
    }

    #[test]
    fn unknown_ids_synthesize_labels() {
        let labels = vec!["person".to_string(), "cup".to_string()];
        assert_eq!(resolve_label(&labels, 1), "cup");
        assert_eq!(resolve_label(&labels, 7), "unknown_7");
    }
}
