//! Run configuration: file loading and command-line overrides

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tagnet::{DistanceType, GenerationParameters, LayoutConfig};

/// Everything one CLI run needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub generation: GenerationParameters,
    pub layout: LayoutConfig,
    pub histogram_bins: usize,
    /// Metric shown by `analyze`'s histogram
    pub histogram_distance: DistanceType,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            generation: GenerationParameters::default(),
            layout: LayoutConfig::default(),
            histogram_bins: 10,
            histogram_distance: DistanceType::PathLength,
        }
    }
}

impl ExplorerConfig {
    /// Load a YAML (`.yaml`/`.yml`) or JSON (`.json`) file. Missing fields
    /// keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let config = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
                .with_context(|| format!("invalid YAML in {}", path.display()))?,
            Some("json") => serde_json::from_str(&text)
                .with_context(|| format!("invalid JSON in {}", path.display()))?,
            _ => bail!("unsupported config format: {} (expected .yaml, .yml or .json)", path.display()),
        };
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// Generation parameter overrides
#[derive(Debug, Clone, Default, Args)]
pub struct GenerationArgs {
    /// Number of items to generate
    #[arg(long)]
    pub items: Option<usize>,

    /// Minimum number of tags
    #[arg(long)]
    pub tags: Option<usize>,

    /// Reserve unused tags at the end of the tag table
    #[arg(long)]
    pub force_unused: bool,

    /// Share of items per tag-set cardinality, e.g. 0,0.2,0.4,0.2,0.1,0.1
    #[arg(long, value_delimiter = ',')]
    pub proportions: Option<Vec<f32>>,

    /// Average tag frequency
    #[arg(long)]
    pub avg: Option<f32>,

    /// Maximum tag frequency
    #[arg(long)]
    pub max: Option<f32>,
}

impl GenerationArgs {
    pub fn apply(&self, params: &mut GenerationParameters) {
        if let Some(items) = self.items {
            params.num_items = items;
        }
        if let Some(tags) = self.tags {
            params.num_tags = tags;
        }
        if self.force_unused {
            params.force_unused_tags = true;
        }
        if let Some(proportions) = &self.proportions {
            params.cardinality_proportions = proportions.clone();
        }
        if let Some(avg) = self.avg {
            params.avg_tag_frequency = avg;
        }
        if let Some(max) = self.max {
            params.max_tag_frequency = max;
        }
    }
}

/// Layout overrides
#[derive(Debug, Clone, Default, Args)]
pub struct LayoutArgs {
    #[arg(long)]
    pub aspect_ratio: Option<f64>,

    #[arg(long)]
    pub margin: Option<usize>,

    /// Islands this large get extra columns
    #[arg(long)]
    pub min_split: Option<usize>,

    /// Islands below this size are never split
    #[arg(long)]
    pub max_split: Option<usize>,

    /// Smallest degree a region seed may have
    #[arg(long)]
    pub seed_min_degree: Option<usize>,
}

impl LayoutArgs {
    pub fn apply(&self, config: &mut LayoutConfig) {
        if let Some(aspect_ratio) = self.aspect_ratio {
            config.aspect_ratio = aspect_ratio;
        }
        if let Some(margin) = self.margin {
            config.margin = margin;
        }
        if let Some(min_split) = self.min_split {
            config.min_split_threshold = min_split;
        }
        if let Some(max_split) = self.max_split {
            config.max_split_threshold = max_split;
        }
        if let Some(degree) = self.seed_min_degree {
            config.seed_min_degree = degree;
        }
    }
}
