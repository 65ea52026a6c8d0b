//! Application configuration: an optional TOML file, overridden by flags.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde::Deserialize;
use thiserror::Error;
use tree_mode::{CycleSelector, FocusSelector, RandomSelector};

const MAX_ORNAMENTS: usize = 5000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("ornament count must be between 1 and 5000, got {0}")]
    OrnamentCount(usize),

    #[error("frame interval must be at least 1 ms")]
    FrameInterval,
}

// ════════════════════════════════════════════════════════════════════════════
// SelectorKind
// ════════════════════════════════════════════════════════════════════════════

/// Which focus selection strategy a session uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    /// Uniform random photo.
    #[default]
    Random,
    /// Photos in upload order, wrapping.
    Cycle,
}

impl SelectorKind {
    pub fn build(self, seed: Option<u64>) -> Box<dyn FocusSelector> {
        match self {
            SelectorKind::Random => Box::new(match seed {
                Some(s) => RandomSelector::seeded(s),
                None    => RandomSelector::from_entropy(),
            }),
            SelectorKind::Cycle => Box::new(CycleSelector::new()),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub ornament_count: usize,
    pub selector:       SelectorKind,
    /// Seed for photo selection, photo ids and ornament scatter.
    pub seed:           Option<u64>,
    /// Image files or directories offered for upload.
    pub photos:         Vec<PathBuf>,
    /// Upload every configured photo at start-up instead of one per key.
    pub preload:        bool,
    /// Frame interval of the render loop.
    pub frame_ms:       u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            ornament_count: 300,
            selector:       SelectorKind::Random,
            seed:           None,
            photos:         Vec::new(),
            preload:        false,
            frame_ms:       16,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        AppConfig::from_toml_str(&text)
    }

    /// File (if any), then flags, then validation.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut cfg = match &cli.config {
            Some(path) => AppConfig::load(path)?,
            None       => AppConfig::default(),
        };
        cfg.apply(cli);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Flags given on the command line win over the file.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(n) = cli.ornaments { self.ornament_count = n; }
        if let Some(s) = cli.selector  { self.selector = s; }
        if cli.seed.is_some()          { self.seed = cli.seed; }
        if cli.preload                 { self.preload = true; }
        self.photos.extend(cli.photo.iter().cloned());
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ornament_count == 0 || self.ornament_count > MAX_ORNAMENTS {
            return Err(ConfigError::OrnamentCount(self.ornament_count));
        }
        if self.frame_ms == 0 {
            return Err(ConfigError::FrameInterval);
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Cli
// ════════════════════════════════════════════════════════════════════════════

/// Hand-gesture controlled holiday tree.
#[derive(Debug, Default, Parser)]
#[command(name = "leap_tree", version, about)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image file or directory to offer for upload (repeatable)
    #[arg(short, long)]
    pub photo: Vec<PathBuf>,

    /// Seed for reproducible sessions
    #[arg(long)]
    pub seed: Option<u64>,

    /// Focus selection strategy
    #[arg(long, value_enum)]
    pub selector: Option<SelectorKind>,

    /// Number of ornaments
    #[arg(long)]
    pub ornaments: Option<usize>,

    /// Upload all photos at start-up
    #[arg(long)]
    pub preload: bool,
}
