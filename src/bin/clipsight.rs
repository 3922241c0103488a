//! clipsight - find the main item (and its color) in a short video clip.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use clipsight::detect::{BoundingBox, RawDetection, ReplayBackend};
use clipsight::ingest::{FileConfig, FileSource, ImageDirSource};
use clipsight::{Engine, EngineConfig, EngineOutput, FrameSource, WeightingPolicy};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Video source: a file path, a directory of extracted frames, or
    /// stub://<name>[:frames] for a synthetic clip.
    source: String,
    /// Replay detections from a JSON dump of a prior detector run.
    #[arg(long)]
    detections: Option<PathBuf>,
    /// Engine config file (JSON). Also honored via CLIPSIGHT_CONFIG.
    #[arg(long, env = "CLIPSIGHT_CONFIG")]
    config: Option<PathBuf>,
    /// Frame sampling stride override.
    #[arg(long)]
    stride: Option<u32>,
    /// Weighting policy override: center-distance | person-proximity.
    #[arg(long)]
    policy: Option<WeightingPolicy>,
    /// Write the main item's best crop to this PNG path.
    #[arg(long)]
    crop_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };
    if let Some(stride) = args.stride {
        config.frame_stride = stride;
    }
    if let Some(policy) = args.policy {
        config.policy = policy;
    }

    let mut source = open_source(&args.source)?;
    let mut detector = match &args.detections {
        Some(path) => ReplayBackend::from_json_file(path)?,
        None if args.source.starts_with("stub://") => demo_backend(),
        None => {
            return Err(anyhow!(
                "--detections is required for real sources (run your detector first \
                 and dump its output to JSON)"
            ))
        }
    };

    let engine = Engine::new(config)?;
    let output = engine.run(source.as_mut(), &mut detector)?;

    if let (Some(path), Some(crop)) = (&args.crop_out, &output.main_item_crop) {
        write_crop(path, crop)?;
        eprintln!("wrote main item crop to {}", path.display());
    }

    report(&output)
}

fn open_source(spec: &str) -> Result<Box<dyn FrameSource>> {
    if spec.starts_with("stub://") {
        return Ok(Box::new(FileSource::new(FileConfig {
            path: spec.to_string(),
        })?));
    }
    let path = Path::new(spec);
    if path.is_dir() {
        Ok(Box::new(ImageDirSource::new(path)?))
    } else {
        Ok(Box::new(FileSource::new(FileConfig {
            path: spec.to_string(),
        })?))
    }
}

/// Scripted detections matching the synthetic stub clip: a cup around the
/// drifting red square, with a person off to the side for the proximity
/// policy. Long enough for any reasonable stride.
fn demo_backend() -> ReplayBackend {
    let labels = vec!["person".to_string(), "cup".to_string()];
    let frames = (0..64)
        .map(|_| {
            vec![
                RawDetection {
                    class_id: 1,
                    confidence: 0.88,
                    bbox: BoundingBox::new(130.0, 90.0, 200.0, 150.0),
                },
                RawDetection {
                    class_id: 0,
                    confidence: 0.95,
                    bbox: BoundingBox::new(10.0, 40.0, 80.0, 220.0),
                },
            ]
        })
        .collect();
    ReplayBackend::from_script(labels, frames)
}

fn write_crop(path: &Path, crop: &clipsight::MainItemCrop) -> Result<()> {
    let region = &crop.region;
    let buffer = image::RgbImage::from_raw(
        region.width,
        region.height,
        region.pixels().to_vec(),
    )
    .ok_or_else(|| anyhow!("main item crop has a malformed buffer"))?;
    buffer
        .save(path)
        .with_context(|| format!("failed to write crop to {}", path.display()))
}

fn report(output: &EngineOutput) -> Result<()> {
    match &output.summary {
        Some(summary) => {
            println!("{}", serde_json::to_string_pretty(summary)?);
            Ok(())
        }
        None => {
            println!(
                "{{\"main_item\": null, \"frames_sampled\": {}}}",
                output.frames_sampled
            );
            eprintln!("no countable items detected");
            Ok(())
        }
    }
}
