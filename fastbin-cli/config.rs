use fastbin_brief::PatternConfig;
use fastbin_fast::DetectorConfig;
use fastbin_match::{HammingMatcher, MatcherConfig};

use crate::{FastBinary, PipelineResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete pipeline configuration, loadable from JSON or TOML
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Optional name for this configuration
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Optional description
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
    pub detector: DetectorConfig,
    pub pattern: PatternConfig,
    pub matcher: MatcherConfig,
}

impl PipelineConfig {
    /// Default parameters: t=15, N=11, S=25, entropy-seeded pattern, gate 1.5
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with a fixed pattern seed, so descriptors are comparable across runs
    pub fn reproducible(seed: u64) -> Self {
        Self {
            pattern: PatternConfig::seeded(seed),
            ..Self::default()
        }
        .with_metadata("Reproducible", "Fixed sampling pattern seed")
    }

    /// Defaults with a gate that only accepts identical descriptors
    pub fn strict_matching() -> Self {
        Self {
            matcher: MatcherConfig { distance_gate: 1.0 },
            ..Self::default()
        }
        .with_metadata("Strict matching", "Exact descriptor matches only")
    }

    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self
    }

    pub fn to_builder(self) -> PipelineBuilder {
        PipelineBuilder::from_config(self)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        self.detector.validate()?;
        self.pattern.validate()?;
        self.matcher.validate()?;
        Ok(())
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        let name = self.name.as_deref().unwrap_or("Unnamed");
        let seed = match self.pattern.seed {
            Some(seed) => seed.to_string(),
            None => "entropy".to_string(),
        };
        format!(
            "{}: {}, S={}, seed={}, gate={}",
            name,
            self.detector.summary(),
            self.pattern.patch_size,
            seed,
            self.matcher.distance_gate
        )
    }

    /// Feature pipeline and an empty matcher for this configuration
    pub fn build(&self) -> PipelineResult<(FastBinary, HammingMatcher)> {
        let features = FastBinary::new(self.detector.clone(), self.pattern.clone())?;
        let matcher = HammingMatcher::new(self.matcher.clone())?;
        Ok((features, matcher))
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> PipelineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates a JSON configuration.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> PipelineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> PipelineResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parses and validates a TOML configuration.
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> PipelineResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> PipelineResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> PipelineResult<()> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> PipelineResult<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }

    /// Loads a `.toml` file as TOML and anything else as JSON.
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> PipelineResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::load_toml(path),
            _ => Self::load_json(path),
        }
    }
}

/// Fluent construction of a [`PipelineConfig`]
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn threshold(mut self, threshold: u8) -> Self {
        self.config.detector.intensity_threshold = threshold;
        self
    }

    pub fn arc_length(mut self, arc_length: usize) -> Self {
        self.config.detector.arc_length = arc_length;
        self
    }

    pub fn patch_size(mut self, patch_size: usize) -> Self {
        self.config.pattern.patch_size = patch_size;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.pattern.seed = Some(seed);
        self
    }

    pub fn distance_gate(mut self, gate: f32) -> Self {
        self.config.matcher.distance_gate = gate;
        self
    }

    pub fn summary(&self) -> String {
        self.config.summary()
    }

    pub fn to_config(self) -> PipelineConfig {
        self.config
    }

    /// Validates the accumulated parameters and builds both halves of the pipeline.
    pub fn build(self) -> PipelineResult<(FastBinary, HammingMatcher)> {
        self.config.validate()?;
        self.config.build()
    }
}
