//! Spatial weighting of candidate detections.
//!
//! Two policies, selected explicitly by the caller:
//!
//! - `CenterDistance`: per-detection weight `1 - d/d_max`, where `d` is
//!   the box-center distance to the frame center and `d_max` the
//!   center-to-corner distance. Centered objects score near 1, corner
//!   objects near 0. Camera focus as a proxy for salience.
//! - `PersonProximity`: per class, the running minimum distance from any
//!   candidate of that class to any reference-category detection in the
//!   same frame. Selection picks the class closest to a person, not the
//!   highest accumulated weight; see [`crate::aggregate::ProximityTable`].

use serde::{Deserialize, Serialize};

use crate::detect::BoundingBox;

/// Weighting/selection policy for a video pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeightingPolicy {
    #[default]
    CenterDistance,
    PersonProximity,
}

impl WeightingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightingPolicy::CenterDistance => "center-distance",
            WeightingPolicy::PersonProximity => "person-proximity",
        }
    }
}

impl std::str::FromStr for WeightingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "center-distance" => Ok(WeightingPolicy::CenterDistance),
            "person-proximity" => Ok(WeightingPolicy::PersonProximity),
            other => Err(anyhow::anyhow!(
                "unknown weighting policy '{}' (expected center-distance or person-proximity)",
                other
            )),
        }
    }
}

/// Center-distance weight for one detection: 1.0 at the frame center,
/// 0.0 at a frame corner.
pub fn center_distance_weight(bbox: &BoundingBox, frame_width: u32, frame_height: u32) -> f32 {
    let center_x = frame_width as f32 / 2.0;
    let center_y = frame_height as f32 / 2.0;
    let (bx, by) = bbox.center();
    let distance = ((bx - center_x).powi(2) + (by - center_y).powi(2)).sqrt();
    let max_distance = (center_x.powi(2) + center_y.powi(2)).sqrt();
    if max_distance <= f32::EPSILON {
        return 0.0;
    }
    1.0 - distance / max_distance
}

/// Minimum Euclidean distance from a candidate's center to any reference
/// center observed in the same frame. `None` when the frame has no
/// references; reference centers are never carried across frames.
pub fn min_reference_distance(bbox: &BoundingBox, references: &[(f32, f32)]) -> Option<f32> {
    let (bx, by) = bbox.center();
    references
        .iter()
        .map(|(rx, ry)| ((bx - rx).powi(2) + (by - ry).powi(2)).sqrt())
        .min_by(|a, b| a.total_cmp(b))
}
