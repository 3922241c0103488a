use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::weight::WeightingPolicy;

const DEFAULT_FRAME_STRIDE: u32 = 5;
const DEFAULT_COLOR_CLUSTERS: usize = 3;
const DEFAULT_REFERENCE_LABEL: &str = "person";

#[derive(Debug, Deserialize, Default)]
struct EngineConfigFile {
    frame_stride: Option<u32>,
    color_clusters: Option<usize>,
    policy: Option<String>,
    reference_label: Option<String>,
    proximity_normalized: Option<bool>,
    classes: Option<BTreeMap<String, Vec<String>>>,
}

/// Engine configuration: sampling stride, weighting policy, and the
/// countable-class table (category name -> class labels). Category names
/// are organizational only; the engine flattens them into one set.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub frame_stride: u32,
    pub color_clusters: usize,
    pub policy: WeightingPolicy,
    pub reference_label: String,
    /// Compare proximity distances normalized by the frame diagonal
    /// instead of raw pixels.
    pub proximity_normalized: bool,
    pub classes: BTreeMap<String, Vec<String>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_stride: DEFAULT_FRAME_STRIDE,
            color_clusters: DEFAULT_COLOR_CLUSTERS,
            policy: WeightingPolicy::CenterDistance,
            reference_label: DEFAULT_REFERENCE_LABEL.to_string(),
            proximity_normalized: false,
            classes: default_classes(),
        }
    }
}

impl EngineConfig {
    /// Load configuration: JSON file named by `CLIPSIGHT_CONFIG` (when
    /// set), then env overrides, then validation.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CLIPSIGHT_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default())?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit file path, with env overrides applied.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut cfg = Self::from_file(read_config_file(path)?)?;
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: EngineConfigFile) -> Result<Self> {
        let policy = match file.policy.as_deref() {
            Some(raw) => raw.parse()?,
            None => WeightingPolicy::CenterDistance,
        };
        Ok(Self {
            frame_stride: file.frame_stride.unwrap_or(DEFAULT_FRAME_STRIDE),
            color_clusters: file.color_clusters.unwrap_or(DEFAULT_COLOR_CLUSTERS),
            policy,
            reference_label: file
                .reference_label
                .unwrap_or_else(|| DEFAULT_REFERENCE_LABEL.to_string()),
            proximity_normalized: file.proximity_normalized.unwrap_or(false),
            classes: file.classes.unwrap_or_else(default_classes),
        })
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(stride) = std::env::var("CLIPSIGHT_STRIDE") {
            self.frame_stride = stride
                .parse()
                .map_err(|_| anyhow!("CLIPSIGHT_STRIDE must be a positive integer"))?;
        }
        if let Ok(clusters) = std::env::var("CLIPSIGHT_COLOR_CLUSTERS") {
            self.color_clusters = clusters
                .parse()
                .map_err(|_| anyhow!("CLIPSIGHT_COLOR_CLUSTERS must be a positive integer"))?;
        }
        if let Ok(policy) = std::env::var("CLIPSIGHT_POLICY") {
            if !policy.trim().is_empty() {
                self.policy = policy.parse()?;
            }
        }
        if let Ok(label) = std::env::var("CLIPSIGHT_REFERENCE_LABEL") {
            if !label.trim().is_empty() {
                self.reference_label = label;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_stride == 0 {
            return Err(anyhow!("frame_stride must be >= 1"));
        }
        if self.color_clusters == 0 {
            return Err(anyhow!("color_clusters must be >= 1"));
        }
        if self.classes.values().all(|labels| labels.is_empty()) {
            return Err(anyhow!("class table must list at least one countable label"));
        }
        if self.policy == WeightingPolicy::PersonProximity && self.reference_label.is_empty() {
            return Err(anyhow!(
                "person-proximity policy requires a reference label"
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<EngineConfigFile> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
}

/// Default countable-class table: consumer goods a clip is likely to be
/// showcasing, grouped for readability.
fn default_classes() -> BTreeMap<String, Vec<String>> {
    let mut classes = BTreeMap::new();
    classes.insert(
        "electronics".to_string(),
        to_labels(&["tv", "laptop", "cell phone", "keyboard", "mouse", "remote"]),
    );
    classes.insert(
        "fashion".to_string(),
        to_labels(&["backpack", "handbag", "tie", "suitcase", "umbrella"]),
    );
    classes.insert(
        "furniture".to_string(),
        to_labels(&["chair", "couch", "bed", "dining table", "potted plant"]),
    );
    classes.insert(
        "kitchen".to_string(),
        to_labels(&["bottle", "cup", "wine glass", "bowl", "vase", "fork", "knife", "spoon"]),
    );
    classes.insert(
        "sports".to_string(),
        to_labels(&["bicycle", "skateboard", "surfboard", "tennis racket", "sports ball"]),
    );
    classes
}

fn to_labels(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|label| label.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.frame_stride, 5);
        assert_eq!(cfg.policy, WeightingPolicy::CenterDistance);
        assert_eq!(cfg.reference_label, "person");
    }

    #[test]
    fn zero_stride_fails_validation() {
        let cfg = EngineConfig {
            frame_stride: 0,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_class_table_fails_validation() {
        let mut classes = BTreeMap::new();
        classes.insert("empty".to_string(), Vec::new());
        let cfg = EngineConfig {
            classes,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
