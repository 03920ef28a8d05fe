//! fontdiff configuration
//!
//! Settings are read from `fontdiff.toml` (or an explicit path) and can be
//! overridden through `FONTDIFF_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the current directory.
pub const DEFAULT_CONFIG_FILE: &str = "fontdiff.toml";

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for fontdiff
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FontDiffConfig {
    /// Page geometry of the report
    pub page: PageConfig,
    /// Style applied to specimen text
    pub text: TextConfig,
    /// Line comparison settings
    pub diff: DiffConfig,
    /// Report output settings
    pub output: OutputConfig,
}

/// Page geometry in pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

/// Paragraph direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Detected from the first strong character
    #[default]
    Auto,
    Ltr,
    Rtl,
}

/// Specimen text style
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    /// Font size in pixels per em
    pub font_size: f32,
    /// Weight used to pick among the loaded faces (100..=900)
    pub weight: u16,
    /// BCP-47 language tag; line breaking is disabled without one
    pub language: Option<String>,
    pub direction: Direction,
    /// OpenType features such as `"liga=0"` or `"ss01"`
    pub features: Vec<String>,
}

/// Line comparison configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiffConfig {
    /// Raster oversampling factor for comparing lines
    pub oversample: u32,
    /// Gaps narrower than this many oversampled columns are merged
    pub merge_threshold: usize,
    /// Edit distance above which a changed stretch is reported as a whole
    pub max_edit_distance: usize,
    /// Highlight color of removed regions, `0xRRGGBB`
    pub removal_color: u32,
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving `page-NNN.png`
    pub dir: PathBuf,
    /// Output pixels per layout pixel
    pub scale: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        // A4 at 72 dpi
        Self {
            width: 595.0,
            height: 842.0,
            margin: 36.0,
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            weight: 400,
            language: Some("en".to_string()),
            direction: Direction::Auto,
            features: Vec::new(),
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            oversample: 8,
            merge_threshold: 2,
            max_edit_distance: 2048,
            removal_color: 0xe5e5e5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("fontdiff-out"),
            scale: 1.0,
        }
    }
}

impl FontDiffConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `fontdiff.toml` in the current directory, or
    /// return the defaults if there is no such file
    pub fn load_or_default() -> Result<Self, ConfigError> {
        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::load_from_file(DEFAULT_CONFIG_FILE)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        self.merge_with_vars(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value
    pub fn merge_with_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("FONTDIFF_FONT_SIZE") {
            if let Ok(size) = val.trim().parse::<f32>() {
                self.text.font_size = size;
            }
        }
        if let Some(val) = lookup("FONTDIFF_LANGUAGE") {
            let val = val.trim();
            // An empty value turns line breaking off.
            self.text.language = (!val.is_empty()).then(|| val.to_string());
        }
        if let Some(dir) = lookup("FONTDIFF_OUT_DIR") {
            self.output.dir = PathBuf::from(dir);
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from `path` if given, else from `fontdiff.toml` (or defaults)
    /// 2. Override with environment variables if present
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_or_default()?,
        };
        config.merge_with_env();
        Ok(config)
    }
}
