use std::time::Instant;

use fastbin_cli::fastbin_core::{DescriptorMatcher, Feature2D, Image};
use fastbin_cli::{PipelineBuilder, PipelineConfig};

/// Dark field sprinkled with bright 3x3 blobs
fn synthetic_image(width: usize, height: usize, phase: usize) -> Image {
    let mut data = vec![30u8; width * height];
    for cy in (10..height - 10).step_by(17) {
        for cx in (10 + phase..width - 10).step_by(23) {
            for y in cy - 1..=cy + 1 {
                for x in cx - 1..=cx + 1 {
                    data[y * width + x] = 220;
                }
            }
        }
    }
    Image::gray(width, height, data).expect("buffer matches dimensions")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    println!("FAST_Binary configuration demo");
    println!("==============================\n");

    let configs = [
        PipelineConfig::new().with_metadata("Default", "Entropy-seeded pattern"),
        PipelineConfig::reproducible(42),
        PipelineConfig::strict_matching(),
        PipelineBuilder::new()
            .threshold(30)
            .arc_length(9)
            .seed(7)
            .distance_gate(16.0)
            .to_config()
            .with_metadata("Custom", "Tolerant matching"),
    ];

    for cfg in &configs {
        println!("  {}", cfg.summary());
    }

    println!("\nJSON:\n{}", configs[1].to_json()?);
    println!("\nTOML:\n{}", configs[3].to_toml()?);

    let dir = std::env::temp_dir();
    let json_path = dir.join("fastbin_reproducible.json");
    let toml_path = dir.join("fastbin_custom.toml");
    configs[1].save_json(&json_path)?;
    configs[3].save_toml(&toml_path)?;

    let loaded = [PipelineConfig::load(&json_path)?, PipelineConfig::load(&toml_path)?];
    assert_eq!(loaded[0], configs[1]);
    assert_eq!(loaded[1], configs[3]);
    println!("Round-tripped {} and {}", json_path.display(), toml_path.display());

    let query = synthetic_image(160, 120, 0);
    let train = synthetic_image(160, 120, 4);

    for cfg in &loaded {
        let start = Instant::now();
        let (features, mut matcher) = cfg.build()?;
        let (_, query_desc) = features.detect_and_compute(&query)?;
        let (_, train_desc) = features.detect_and_compute(&train)?;
        matcher.add(train_desc);
        let matches = matcher.match_descriptors(&query_desc);
        println!(
            "  {}: {} queries, {} matches in {:.2?}",
            cfg.name.as_deref().unwrap_or("Unnamed"),
            query_desc.len(),
            matches.iter().flatten().count(),
            start.elapsed()
        );
    }

    Ok(())
}
