//! Cross-frame aggregation state and final item selection.
//!
//! The aggregator is the only mutable state of a video pass. Observations
//! are commutative and associative, so frame order never changes the
//! outcome. All maps are `BTreeMap`: iteration order is ascending by
//! label, which makes every tie-break deterministic — ties resolve to the
//! lexicographically smallest label.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::ColorName;

/// Final output of a video pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Class label of the single most salient item.
    pub main_item: String,
    /// Dominant color of the main item.
    pub main_color: ColorName,
    /// Runner-up classes with their color histograms, most salient first.
    pub other_items: Vec<SecondaryItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecondaryItem {
    pub class: String,
    pub colors: BTreeMap<ColorName, f64>,
}

/// Weighted tally per class plus a weighted color histogram per class.
///
/// Both maps always hold the same key set; cumulative weights only grow.
#[derive(Clone, Debug, Default)]
pub struct Aggregation {
    class_weight: BTreeMap<String, f64>,
    class_colors: BTreeMap<String, BTreeMap<ColorName, f64>>,
}

impl Aggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one weighted observation. Every detection across every
    /// sampled frame is an independent observation; there is no
    /// deduplication.
    pub fn observe(&mut self, class: &str, weight: f64, color: ColorName) {
        debug_assert!(weight >= 0.0, "observation weights are non-negative");
        *self.class_weight.entry(class.to_string()).or_insert(0.0) += weight;
        *self
            .class_colors
            .entry(class.to_string())
            .or_default()
            .entry(color)
            .or_insert(0.0) += weight;
    }

    pub fn is_empty(&self) -> bool {
        self.class_weight.is_empty()
    }

    pub fn class_weight(&self, class: &str) -> Option<f64> {
        self.class_weight.get(class).copied()
    }

    /// Select the main item and build the summary. `None` when nothing
    /// was observed (an expected terminal state, not an error).
    pub fn into_summary(self) -> Option<DetectionSummary> {
        let main_item = argmax(self.class_weight.iter().map(|(k, v)| (k.as_str(), *v)))?;
        let main_colors = self.class_colors.get(&main_item)?;
        let main_color = argmax_color(main_colors)?;

        let mut other_items: Vec<SecondaryItem> = self
            .class_colors
            .iter()
            .filter(|(class, _)| **class != main_item)
            .map(|(class, colors)| SecondaryItem {
                class: class.clone(),
                colors: colors.clone(),
            })
            .collect();
        // Descending total weight; equal totals fall back to label order,
        // which the BTreeMap iteration already provides.
        other_items.sort_by(|a, b| {
            let ta: f64 = a.colors.values().sum();
            let tb: f64 = b.colors.values().sum();
            tb.total_cmp(&ta)
        });

        Some(DetectionSummary {
            main_item,
            main_color,
            other_items,
        })
    }
}

/// Per-class running minimum distance to a reference detection, plus a
/// unit-weight color histogram. State for the person-proximity policy;
/// the class *closest* to a reference wins.
#[derive(Clone, Debug)]
pub struct ProximityTable {
    normalized: bool,
    min_distance: BTreeMap<String, f64>,
    class_colors: BTreeMap<String, BTreeMap<ColorName, f64>>,
}

impl ProximityTable {
    /// `normalized` divides distances by the frame diagonal before
    /// comparison, making mixed-resolution passes comparable. The default
    /// pipeline behavior is raw distances.
    pub fn new(normalized: bool) -> Self {
        Self {
            normalized,
            min_distance: BTreeMap::new(),
            class_colors: BTreeMap::new(),
        }
    }

    /// Record one candidate observation with its distance to the nearest
    /// reference detection of the same frame.
    pub fn observe(&mut self, class: &str, distance: f64, frame_diagonal: f64, color: ColorName) {
        debug_assert!(distance >= 0.0, "distances are non-negative");
        let keyed = if self.normalized && frame_diagonal > 0.0 {
            distance / frame_diagonal
        } else {
            distance
        };
        self.min_distance
            .entry(class.to_string())
            .and_modify(|d| *d = d.min(keyed))
            .or_insert(keyed);
        *self
            .class_colors
            .entry(class.to_string())
            .or_default()
            .entry(color)
            .or_insert(0.0) += 1.0;
    }

    pub fn is_empty(&self) -> bool {
        self.min_distance.is_empty()
    }

    /// Select the class with the smallest running minimum distance.
    /// Runner-ups are ordered by ascending distance, ties by label.
    pub fn into_summary(self) -> Option<DetectionSummary> {
        let (main_item, _) = self
            .min_distance
            .iter()
            .fold(None::<(&str, f64)>, |best, (class, d)| match best {
                Some((_, bd)) if *d >= bd => best,
                _ => Some((class.as_str(), *d)),
            })?;
        let main_item = main_item.to_string();
        let main_color = argmax_color(self.class_colors.get(&main_item)?)?;

        let mut others: Vec<(f64, SecondaryItem)> = self
            .min_distance
            .iter()
            .filter(|(class, _)| **class != main_item)
            .map(|(class, d)| {
                let colors = self.class_colors.get(class).cloned().unwrap_or_default();
                (
                    *d,
                    SecondaryItem {
                        class: class.clone(),
                        colors,
                    },
                )
            })
            .collect();
        others.sort_by(|a, b| a.0.total_cmp(&b.0));

        Some(DetectionSummary {
            main_item,
            main_color,
            other_items: others.into_iter().map(|(_, item)| item).collect(),
        })
    }
}

/// Argmax with strict-greater comparison: the first key in iteration
/// order wins among equals.
fn argmax<'a>(entries: impl Iterator<Item = (&'a str, f64)>) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for (key, value) in entries {
        match best {
            Some((_, bv)) if value <= bv => {}
            _ => best = Some((key, value)),
        }
    }
    best.map(|(key, _)| key.to_string())
}

fn argmax_color(colors: &BTreeMap<ColorName, f64>) -> Option<ColorName> {
    let mut best: Option<(ColorName, f64)> = None;
    for (color, weight) in colors {
        match best {
            Some((_, bw)) if *weight <= bw => {}
            _ => best = Some((*color, *weight)),
        }
    }
    best.map(|(color, _)| color)
}
