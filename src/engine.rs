//! Pipeline orchestration: one video pass from frames to summary.
//!
//! The engine owns no I/O. The caller constructs a frame source and a
//! detector backend and hands both in; the engine samples frames at the
//! configured stride, filters and weighs detections, classifies crop
//! colors, aggregates, and selects once after the loop. Processing is
//! single-threaded and synchronous; the aggregation state has exactly
//! one writer for the duration of a pass.

use anyhow::Result;

use crate::aggregate::{Aggregation, DetectionSummary, ProximityTable};
use crate::color::{ColorClassifier, ColorName};
use crate::config::EngineConfig;
use crate::detect::{BoundingBox, ClassFilter, Detection, DetectorBackend};
use crate::frame::Frame;
use crate::ingest::{FrameSampler, FrameSource};
use crate::weight::{center_distance_weight, min_reference_distance, WeightingPolicy};

/// Best-scoring crop of the selected main item, kept for downstream
/// image-based search.
#[derive(Clone, Debug)]
pub struct MainItemCrop {
    pub class: String,
    pub bbox: BoundingBox,
    pub region: Frame,
    /// Score of the observation the crop came from: the weight under the
    /// center-distance policy, the negated distance under proximity
    /// (higher is better either way).
    pub score: f32,
}

/// Result of one video pass.
#[derive(Debug)]
pub struct EngineOutput {
    /// `None` when no countable objects were observed (NoDetections is a
    /// terminal state, not an error).
    pub summary: Option<DetectionSummary>,
    pub main_item_crop: Option<MainItemCrop>,
    pub frames_sampled: u64,
}

/// Main-item detection engine.
pub struct Engine {
    config: EngineConfig,
    filter: ClassFilter,
    colors: ColorClassifier,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let filter = ClassFilter::from_categories(&config.classes, &config.reference_label);
        let colors = ColorClassifier::new(config.color_clusters);
        Ok(Self {
            config,
            filter,
            colors,
        })
    }

    /// Run one full pass over a video source.
    ///
    /// Errors only on unrecoverable setup problems; per-frame anomalies
    /// (detector failure, degenerate crops, mid-stream read errors)
    /// degrade to partial results.
    pub fn run(
        &self,
        source: &mut dyn FrameSource,
        detector: &mut dyn DetectorBackend,
    ) -> Result<EngineOutput> {
        detector.warm_up()?;
        log::info!(
            "starting pass: policy={}, stride={}, backend={}",
            self.config.policy.as_str(),
            self.config.frame_stride,
            detector.name()
        );

        match self.config.policy {
            WeightingPolicy::CenterDistance => self.run_center_distance(source, detector),
            WeightingPolicy::PersonProximity => self.run_person_proximity(source, detector),
        }
    }

    fn run_center_distance(
        &self,
        source: &mut dyn FrameSource,
        detector: &mut dyn DetectorBackend,
    ) -> Result<EngineOutput> {
        let mut aggregation = Aggregation::new();
        let mut crops = CropTracker::new();
        let mut sampler = FrameSampler::new(source, self.config.frame_stride)?;
        let mut frames_sampled = 0;

        while let Some((index, frame)) = sampler.next_sample() {
            frames_sampled += 1;
            let Some(partition) = self.detect_partition(detector, index, &frame) else {
                continue;
            };
            for det in partition.candidates {
                let weight = center_distance_weight(&det.bbox, frame.width, frame.height);
                let color = self.crop_color(&frame, &det);
                log::debug!(
                    "frame {}: {} ({}) weight {:.3}",
                    index,
                    det.class,
                    color,
                    weight
                );
                aggregation.observe(&det.class, weight as f64, color);
                crops.offer(&det, &frame, weight);
            }
        }

        let summary = aggregation.into_summary();
        let main_item_crop = crops.resolve(summary.as_ref());
        log_outcome(summary.as_ref(), frames_sampled);
        Ok(EngineOutput {
            summary,
            main_item_crop,
            frames_sampled,
        })
    }

    fn run_person_proximity(
        &self,
        source: &mut dyn FrameSource,
        detector: &mut dyn DetectorBackend,
    ) -> Result<EngineOutput> {
        let mut table = ProximityTable::new(self.config.proximity_normalized);
        let mut crops = CropTracker::new();
        let mut sampler = FrameSampler::new(source, self.config.frame_stride)?;
        let mut frames_sampled = 0;

        while let Some((index, frame)) = sampler.next_sample() {
            frames_sampled += 1;
            let Some(partition) = self.detect_partition(detector, index, &frame) else {
                continue;
            };
            // Reference centers live for this frame only.
            let references: Vec<(f32, f32)> = partition
                .references
                .iter()
                .map(|det| det.bbox.center())
                .collect();
            if references.is_empty() {
                continue;
            }
            let diagonal =
                ((frame.width as f64).powi(2) + (frame.height as f64).powi(2)).sqrt();
            for det in partition.candidates {
                let Some(distance) = min_reference_distance(&det.bbox, &references) else {
                    continue;
                };
                let color = self.crop_color(&frame, &det);
                log::debug!(
                    "frame {}: {} ({}) reference distance {:.1}",
                    index,
                    det.class,
                    color,
                    distance
                );
                table.observe(&det.class, distance as f64, diagonal, color);
                crops.offer(&det, &frame, -distance);
            }
        }

        let summary = table.into_summary();
        let main_item_crop = crops.resolve(summary.as_ref());
        log_outcome(summary.as_ref(), frames_sampled);
        Ok(EngineOutput {
            summary,
            main_item_crop,
            frames_sampled,
        })
    }

    fn detect_partition(
        &self,
        detector: &mut dyn DetectorBackend,
        frame_index: u64,
        frame: &Frame,
    ) -> Option<crate::detect::FramePartition> {
        match detector.detect(frame.pixels(), frame.width, frame.height) {
            Ok(raw) => Some(self.filter.partition(detector.labels(), raw)),
            Err(e) => {
                // One bad frame never discards the pass.
                log::warn!("detector failed on frame {}: {:#}", frame_index, e);
                None
            }
        }
    }

    fn crop_color(&self, frame: &Frame, det: &Detection) -> ColorName {
        match frame.crop(&det.bbox) {
            Some(region) => self.colors.classify(&region),
            None => {
                log::debug!("degenerate crop for '{}', color unknown", det.class);
                ColorName::Unknown
            }
        }
    }
}

/// Tracks the best-scoring observation per class so the main item's crop
/// can be recovered after selection.
struct CropTracker {
    best: std::collections::BTreeMap<String, MainItemCrop>,
}

impl CropTracker {
    fn new() -> Self {
        Self {
            best: std::collections::BTreeMap::new(),
        }
    }

    fn offer(&mut self, det: &Detection, frame: &Frame, score: f32) {
        let keep = match self.best.get(&det.class) {
            Some(existing) => score > existing.score,
            None => true,
        };
        if !keep {
            return;
        }
        let Some(region) = frame.crop(&det.bbox) else {
            return;
        };
        self.best.insert(
            det.class.clone(),
            MainItemCrop {
                class: det.class.clone(),
                bbox: det.bbox,
                region,
                score,
            },
        );
    }

    fn resolve(mut self, summary: Option<&DetectionSummary>) -> Option<MainItemCrop> {
        summary.and_then(|s| self.best.remove(&s.main_item))
    }
}

fn log_outcome(summary: Option<&DetectionSummary>, frames_sampled: u64) {
    match summary {
        Some(summary) => log::info!(
            "pass complete: main item '{}' ({}) after {} sampled frames, {} runner-ups",
            summary.main_item,
            summary.main_color,
            frames_sampled,
            summary.other_items.len()
        ),
        None => log::info!(
            "pass complete: no countable items in {} sampled frames",
            frames_sampled
        ),
    }
}
