use anyhow::{Context, Result};
use clap::Parser;
use fridge_scanner::catalog::class_names::ClassNames;
use fridge_scanner::catalog::recipes::RecipeBook;
use fridge_scanner::image_utils::drawing::draw_detections;
use fridge_scanner::image_utils::image_io::{collect_image_paths, read_image_as_rgb8, write_rgb8};
use fridge_scanner::object_detection::ort_inference_session::OrtInferenceSession;
use fridge_scanner::report::ScanReport;
use fridge_scanner::{Detector, ScanConfig};
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Scans fridge photos for food items and suggests recipes.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ONNX detection model.
    #[arg(long, value_name = "FILE")]
    model: PathBuf,

    /// Image to scan, or a directory that is searched for images.
    #[arg(long, value_name = "SOURCE")]
    input: PathBuf,

    /// Class names, one per line, in model output order.
    #[arg(long, value_name = "FILE")]
    classes: Option<PathBuf>,

    /// Recipe table as JSON. A small built-in table is used otherwise.
    #[arg(long, value_name = "FILE")]
    recipes: Option<PathBuf>,

    /// JSON scan settings. Flags below override it.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Decode confidence threshold (exclusive).
    #[arg(long, value_name = "THRESHOLD")]
    confidence: Option<f32>,

    /// Score floor re-checked during suppression.
    #[arg(long, value_name = "THRESHOLD")]
    score: Option<f32>,

    /// IoU at which overlapping boxes are treated as duplicates.
    #[arg(long, value_name = "THRESHOLD")]
    overlap: Option<f32>,

    /// Only suppress overlapping boxes of the same class.
    #[arg(long)]
    per_class: bool,

    /// Directory to write copies of the inputs with detections drawn on them.
    #[arg(long, value_name = "DIR")]
    annotate: Option<PathBuf>,

    /// Print reports as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::load_from_path(path)?,
            None => ScanConfig::default(),
        };
        if let Some(confidence) = self.confidence {
            config.confidence_threshold = confidence;
        }
        if let Some(score) = self.score {
            config.score_threshold = score;
        }
        if let Some(overlap) = self.overlap {
            config.overlap_threshold = overlap;
        }
        if self.per_class {
            config.per_class_suppression = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.scan_config()?;
    info!(?config, "scan settings");

    let class_names = match &args.classes {
        Some(path) => ClassNames::from_file(path)?,
        None => ClassNames::default(),
    };
    let recipe_book = match &args.recipes {
        Some(path) => RecipeBook::from_json_file(path)?,
        None => RecipeBook::demo(),
    };
    if let Some(dir) = &args.annotate {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create annotation directory {}", dir.display()))?;
    }

    let mut provider = OrtInferenceSession::new(&args.model)
        .with_context(|| format!("cannot load model {}", args.model.display()))?;
    let detector = Detector::new(config);

    let images = collect_image_paths(&args.input);
    if images.is_empty() {
        warn!(input = %args.input.display(), "no images found");
    }
    let mut reports = Vec::with_capacity(images.len());
    for path in &images {
        let image = read_image_as_rgb8(path)?;
        let detections = detector
            .detect(&mut provider, &image)
            .with_context(|| format!("scan of {} failed", path.display()))?;
        if let Some(dir) = &args.annotate {
            let stem = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let out_path = dir.join(format!("{stem}_annotated.png"));
            write_rgb8(&draw_detections(&image, &detections), &out_path)?;
            info!(path = %out_path.display(), "wrote annotated image");
        }
        let report = ScanReport::new(path, &detections, &class_names, &recipe_book);
        if args.json {
            reports.push(report);
        } else {
            println!("{report}");
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}
