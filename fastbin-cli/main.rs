use argh::FromArgs;
use std::path::PathBuf;
use std::time::Instant;

use fastbin_cli::fastbin_core::{DescriptorMatcher, Feature2D};
use fastbin_cli::{load_image, PipelineBuilder, PipelineConfig};

/// FAST_Binary keypoint detection and descriptor matching.
#[derive(FromArgs)]
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Detect(DetectArgs),
    Match(MatchArgs),
}

/// Detect ring-test keypoints in an image and list them.
#[derive(FromArgs)]
#[argh(subcommand, name = "detect")]
struct DetectArgs {
    /// path to the input image
    #[argh(positional)]
    image: PathBuf,

    /// intensity threshold t
    #[argh(option, default = "15")]
    threshold: u8,

    /// minimum contiguous arc length N (1-16)
    #[argh(option, default = "11")]
    arc_length: usize,
}

/// Describe two images and match the first against the second.
#[derive(FromArgs)]
#[argh(subcommand, name = "match")]
struct MatchArgs {
    /// query image
    #[argh(positional)]
    query: PathBuf,

    /// training image
    #[argh(positional)]
    train: PathBuf,

    /// pipeline configuration file (.json or .toml)
    #[argh(option)]
    config: Option<PathBuf>,

    /// matches at or above this Hamming distance are dropped
    #[argh(option)]
    gate: Option<f32>,

    /// sampling pattern seed
    #[argh(option)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    match args.command {
        Command::Detect(args) => detect(args),
        Command::Match(args) => match_images(args),
    }
}

fn detect(args: DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (features, _) = PipelineBuilder::new()
        .threshold(args.threshold)
        .arc_length(args.arc_length)
        .build()?;

    let img = load_image(&args.image)?;

    let start = Instant::now();
    let keypoints = features.detect(&img);
    let elapsed = start.elapsed();

    println!("{} keypoints in {} ({:.2?})", keypoints.len(), args.image.display(), elapsed);
    for kp in &keypoints {
        println!("{} {}", kp.x, kp.y);
    }
    Ok(())
}

fn match_images(args: MatchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::new(),
    };

    let mut builder = config.to_builder();
    if let Some(gate) = args.gate {
        builder = builder.distance_gate(gate);
    }
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    log::info!("{}", builder.summary());
    let (features, mut matcher) = builder.build()?;

    let query_img = load_image(&args.query)?;
    let train_img = load_image(&args.train)?;

    let start = Instant::now();
    let (query_kps, query_desc) = features.detect_and_compute(&query_img)?;
    let (train_kps, train_desc) = features.detect_and_compute(&train_img)?;
    matcher.add(train_desc);
    let matches = matcher.match_descriptors(&query_desc);
    let elapsed = start.elapsed();

    let matched: Vec<_> = matches.iter().flatten().collect();
    let mean = if matched.is_empty() {
        0.0
    } else {
        matched.iter().map(|m| m.distance as f64).sum::<f64>() / matched.len() as f64
    };
    println!(
        "{} query keypoints, {} train keypoints, {} matches, mean distance {:.2} ({:.2?})",
        query_kps.len(),
        train_kps.len(),
        matched.len(),
        mean,
        elapsed
    );
    for m in matched {
        let q = query_kps[m.query_idx];
        let t = train_kps[m.train_idx];
        println!("({}, {}) -> ({}, {}) d={}", q.x, q.y, t.x, t.y, m.distance);
    }
    Ok(())
}
