use std::collections::{BTreeMap, HashSet};

use crate::detect::result::{resolve_label, Detection, RawDetection};

/// Splits one frame's raw detections into countable candidates and
/// reference-category detections, dropping everything else.
///
/// The countable set is the configured category map flattened to plain
/// label membership; category names carry no meaning inside the engine.
/// The reference label (e.g. "person") is never a candidate, even when
/// the category map also lists it.
#[derive(Clone, Debug)]
pub struct ClassFilter {
    countable: HashSet<String>,
    reference: String,
}

/// Disjoint partition of one frame's detections.
#[derive(Debug, Default)]
pub struct FramePartition {
    pub candidates: Vec<Detection>,
    pub references: Vec<Detection>,
}

impl ClassFilter {
    pub fn from_categories(categories: &BTreeMap<String, Vec<String>>, reference: &str) -> Self {
        let countable = categories
            .values()
            .flatten()
            .map(|label| label.to_string())
            .collect();
        Self {
            countable,
            reference: reference.to_string(),
        }
    }

    pub fn countable_len(&self) -> usize {
        self.countable.len()
    }

    /// Partition raw detections, resolving class IDs against `labels`.
    /// Non-countable, non-reference classes are dropped silently.
    pub fn partition(&self, labels: &[String], raw: Vec<RawDetection>) -> FramePartition {
        let mut partition = FramePartition::default();
        for det in raw {
            let class = resolve_label(labels, det.class_id);
            let resolved = Detection {
                class,
                confidence: det.confidence,
                bbox: det.bbox,
            };
            if resolved.class == self.reference {
                partition.references.push(resolved);
            } else if self.countable.contains(&resolved.class) {
                partition.candidates.push(resolved);
            } else {
                log::debug!("dropping non-countable detection '{}'", resolved.class);
            }
        }
        partition
    }
}
