//! clipsight — main-item detection for short video clips.
//!
//! Given a clip, the engine decides which single physical object the clip
//! is about and what its dominant color is, so downstream logic can search
//! for visually or commercially similar products. The input is a noisy
//! per-frame stream of object-detector output; the engine turns it into
//! one stable decision plus a ranked summary of secondary items.
//!
//! # Architecture
//!
//! - `ingest`: frame sources (video files, still-image directories,
//!   synthetic stubs) and the stride sampler
//! - `detect`: the detector-backend boundary, label resolution, and the
//!   countable-class filter
//! - `color`: dominant-color classification of cropped regions
//! - `weight`: spatial weighting policies (center-distance,
//!   person-proximity)
//! - `aggregate`: cross-frame aggregation state and final selection
//! - `engine`: the per-video pipeline tying the above together
//!
//! The detector itself is a collaborator behind [`detect::DetectorBackend`];
//! callers construct one explicitly and pass it into [`engine::Engine::run`].
//! Nothing here is global or lazily initialized.
//!
//! # Error model
//!
//! A source that cannot be opened fails the run. Everything that can go
//! wrong per frame — a read error mid-stream, a detector failure on one
//! frame, a degenerate crop — degrades to partial or default values, and
//! "nothing found" is an `Ok` outcome with an absent summary.

pub mod aggregate;
pub mod color;
pub mod config;
pub mod detect;
pub mod engine;
pub mod frame;
pub mod ingest;
pub mod weight;

pub use aggregate::{Aggregation, DetectionSummary, ProximityTable, SecondaryItem};
pub use color::{ColorClassifier, ColorName};
pub use config::EngineConfig;
pub use detect::{BoundingBox, DetectorBackend, RawDetection, ReplayBackend};
pub use engine::{Engine, EngineOutput, MainItemCrop};
pub use frame::Frame;
pub use ingest::{FileSource, FrameSampler, FrameSource, ImageDirSource};
pub use weight::WeightingPolicy;
