//! Dominant-color classification for cropped detection regions.
//!
//! The classifier downsamples the region to a small working resolution,
//! clusters the pixels with k-means, takes the most populous cluster's
//! centroid, and maps it to the nearest entry in a fixed table of named
//! reference colors. It never fails: a degenerate region classifies as
//! `Unknown` so a single bad crop cannot abort aggregation.

use serde::{Deserialize, Serialize};

use crate::frame::Frame;

/// Named reference colors. The RGB anchors are loose perceptual
/// prototypes, not pure primaries: "white" is anything bright and
/// desaturated, "black" anything dark.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ColorName {
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    White,
    Black,
    Orange,
    Lime,
    Violet,
    Unknown,
}

impl ColorName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Red => "red",
            ColorName::Green => "green",
            ColorName::Blue => "blue",
            ColorName::Yellow => "yellow",
            ColorName::Magenta => "magenta",
            ColorName::Cyan => "cyan",
            ColorName::White => "white",
            ColorName::Black => "black",
            ColorName::Orange => "orange",
            ColorName::Lime => "lime",
            ColorName::Violet => "violet",
            ColorName::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ColorName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const REFERENCE_COLORS: [(ColorName, [f32; 3]); 11] = [
    (ColorName::Red, [200.0, 50.0, 50.0]),
    (ColorName::Green, [50.0, 200.0, 50.0]),
    (ColorName::Blue, [50.0, 50.0, 200.0]),
    (ColorName::Yellow, [200.0, 200.0, 50.0]),
    (ColorName::Magenta, [200.0, 50.0, 200.0]),
    (ColorName::Cyan, [50.0, 200.0, 200.0]),
    (ColorName::White, [150.0, 150.0, 150.0]),
    (ColorName::Black, [100.0, 100.0, 100.0]),
    (ColorName::Orange, [200.0, 100.0, 50.0]),
    (ColorName::Lime, [100.0, 200.0, 50.0]),
    (ColorName::Violet, [150.0, 50.0, 150.0]),
];

/// Working height the region is downsampled to before clustering.
const WORKING_HEIGHT: u32 = 50;
const KMEANS_ITERATIONS: usize = 10;

/// K-means dominant-color classifier.
#[derive(Clone, Debug)]
pub struct ColorClassifier {
    clusters: usize,
}

impl ColorClassifier {
    /// `clusters` is clamped to at least 1.
    pub fn new(clusters: usize) -> Self {
        Self {
            clusters: clusters.max(1),
        }
    }

    /// Classify the dominant color of a region. Never fails; degenerate
    /// input returns `ColorName::Unknown`.
    pub fn classify(&self, region: &Frame) -> ColorName {
        let pixels = downsample(region);
        if pixels.is_empty() {
            return ColorName::Unknown;
        }
        let dominant = dominant_cluster(&pixels, self.clusters);
        nearest_named(dominant)
    }
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self::new(3)
    }
}

/// Downsample to `WORKING_HEIGHT` rows, aspect ratio preserved, by
/// nearest sampling. Regions already smaller are taken as-is.
fn downsample(region: &Frame) -> Vec<[f32; 3]> {
    if region.width == 0 || region.height == 0 {
        return Vec::new();
    }
    let (src_w, src_h) = (region.width, region.height);
    let (out_w, out_h) = if src_h <= WORKING_HEIGHT {
        (src_w, src_h)
    } else {
        let aspect = src_w as f32 / src_h as f32;
        let w = ((aspect * WORKING_HEIGHT as f32) as u32).max(1);
        (w, WORKING_HEIGHT)
    };

    let mut pixels = Vec::with_capacity((out_w as usize) * (out_h as usize));
    for y in 0..out_h {
        let src_y = (y as u64 * src_h as u64 / out_h as u64) as u32;
        for x in 0..out_w {
            let src_x = (x as u64 * src_w as u64 / out_w as u64) as u32;
            let [r, g, b] = region.pixel(src_x, src_y);
            pixels.push([r as f32, g as f32, b as f32]);
        }
    }
    pixels
}

/// K-means over the pixel set; returns the centroid of the most populous
/// cluster. Centroids are seeded deterministically (first pixel, then
/// farthest-point) so results are stable across runs.
fn dominant_cluster(pixels: &[[f32; 3]], k: usize) -> [f32; 3] {
    let k = k.min(pixels.len());
    let mut centroids: Vec<[f32; 3]> = Vec::with_capacity(k);
    centroids.push(pixels[0]);
    while centroids.len() < k {
        let mut best = pixels[0];
        let mut best_dist = -1.0f32;
        for p in pixels {
            let d = centroids
                .iter()
                .map(|c| dist_sq(p, c))
                .fold(f32::INFINITY, f32::min);
            if d > best_dist {
                best_dist = d;
                best = *p;
            }
        }
        centroids.push(best);
    }

    let mut assignment = vec![0usize; pixels.len()];
    for _ in 0..KMEANS_ITERATIONS {
        for (i, p) in pixels.iter().enumerate() {
            assignment[i] = nearest_centroid(p, &centroids);
        }
        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        let mut counts = vec![0usize; centroids.len()];
        for (i, p) in pixels.iter().enumerate() {
            let c = assignment[i];
            sums[c][0] += p[0] as f64;
            sums[c][1] += p[1] as f64;
            sums[c][2] += p[2] as f64;
            counts[c] += 1;
        }
        for (c, centroid) in centroids.iter_mut().enumerate() {
            if counts[c] > 0 {
                centroid[0] = (sums[c][0] / counts[c] as f64) as f32;
                centroid[1] = (sums[c][1] / counts[c] as f64) as f32;
                centroid[2] = (sums[c][2] / counts[c] as f64) as f32;
            }
        }
    }

    let mut counts = vec![0usize; centroids.len()];
    for p in pixels {
        counts[nearest_centroid(p, &centroids)] += 1;
    }
    let most_populous = counts
        .iter()
        .enumerate()
        .max_by_key(|(_, count)| **count)
        .map(|(i, _)| i)
        .unwrap_or(0);
    centroids[most_populous]
}

fn nearest_centroid(p: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, c) in centroids.iter().enumerate() {
        let d = dist_sq(p, c);
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

fn dist_sq(a: &[f32; 3], b: &[f32; 3]) -> f32 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    dr * dr + dg * dg + db * db
}

/// Nearest named color by Euclidean RGB distance.
fn nearest_named(rgb: [f32; 3]) -> ColorName {
    let mut best = ColorName::Unknown;
    let mut best_dist = f32::INFINITY;
    for (name, anchor) in REFERENCE_COLORS.iter() {
        let d = dist_sq(&rgb, anchor);
        if d < best_dist {
            best_dist = d;
            best = *name;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_red_classifies_as_red() {
        let region = Frame::filled(40, 40, [255, 0, 0]);
        assert_eq!(ColorClassifier::default().classify(&region), ColorName::Red);
    }

    #[test]
    fn pure_black_classifies_as_black() {
        let region = Frame::filled(40, 40, [0, 0, 0]);
        assert_eq!(
            ColorClassifier::default().classify(&region),
            ColorName::Black
        );
    }

    #[test]
    fn bright_desaturated_classifies_as_white() {
        let region = Frame::filled(10, 10, [240, 240, 240]);
        assert_eq!(
            ColorClassifier::default().classify(&region),
            ColorName::White
        );
    }

    #[test]
    fn majority_color_wins_over_minority() {
        // 3/4 blue, 1/4 red.
        let mut region = Frame::filled(40, 40, [0, 0, 255]);
        region.paint(
            &crate::detect::BoundingBox::new(0.0, 0.0, 40.0, 10.0),
            [255, 0, 0],
        );
        assert_eq!(
            ColorClassifier::new(2).classify(&region),
            ColorName::Blue
        );
    }

    #[test]
    fn degenerate_region_is_unknown() {
        let region = Frame::new(Vec::new(), 0, 0).unwrap();
        assert_eq!(
            ColorClassifier::default().classify(&region),
            ColorName::Unknown
        );
    }

    #[test]
    fn downsample_preserves_aspect_ratio() {
        let region = Frame::filled(200, 100, [1, 2, 3]);
        let pixels = downsample(&region);
        assert_eq!(pixels.len(), 100 * 50);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&ColorName::Violet).unwrap();
        assert_eq!(json, "\"violet\"");
        let parsed: ColorName = serde_json::from_str("\"white\"").unwrap();
        assert_eq!(parsed, ColorName::White);
    }
}
