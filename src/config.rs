//! topicqr runtime configuration handling

use crate::error::{Error, Result};
use crate::topics::{self, DEFAULT_BASE_URL, TopicEntry};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure loaded from disk or environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicQrConfig {
    /// Logo composited onto every code
    pub logo_path: PathBuf,
    /// Directory receiving `<label>.png` files
    pub output_folder: PathBuf,
    /// URL that every topic key is appended to
    pub base_url: String,
    /// Entries to generate, in order
    pub topics: Vec<TopicEntry>,
    /// Decode each composited image and fail if it no longer scans
    pub verify: bool,
    /// QR rendering parameters
    pub render: RenderOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl Default for TopicQrConfig {
    fn default() -> Self {
        Self {
            logo_path: PathBuf::from("lib/assets/icon/icon.png"),
            output_folder: PathBuf::from("lib/assets/qrcodes"),
            base_url: DEFAULT_BASE_URL.to_string(),
            topics: topics::default_topics(),
            verify: true,
            render: RenderOptions::default(),
            logging: LoggingOptions::default(),
        }
    }
}

impl TopicQrConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(explicit_path, |key| env::var(key).ok())
    }

    /// Like [`TopicQrConfig::load`], reading overrides through `lookup`
    /// instead of the process environment.
    pub fn load_with_env<F>(explicit_path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No topicqr.toml / topicqr.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides(&lookup);
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["topicqr.toml", "topicqr.yaml", "topicqr.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("topicqr");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    ///
    /// Unparseable flag values leave the current setting untouched.
    fn apply_env_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(logo) = lookup("TOPICQR_LOGO") {
            self.logo_path = PathBuf::from(logo);
        }
        if let Some(output) = lookup("TOPICQR_OUTPUT") {
            self.output_folder = PathBuf::from(output);
        }
        if let Some(base_url) = lookup("TOPICQR_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(verify) = lookup("TOPICQR_VERIFY") {
            if let Some(flag) = parse_flag(&verify) {
                self.verify = flag;
            }
        }
        self.logging.apply_env_overrides(lookup);
    }

    /// Check everything that can be checked before touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(Error::Config("base_url must not be empty".to_string()));
        }
        if base.contains(['?', '#']) {
            return Err(Error::Config(format!(
                "base_url '{base}' must not carry a query or fragment"
            )));
        }
        topics::validate_topics(&self.topics)?;
        self.render.validate()
    }
}

/// Error correction tiers, mirrored so they can be named in config files
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EcLevelOption {
    /// ~7% recovery
    L,
    /// ~15% recovery
    M,
    /// ~25% recovery
    Q,
    /// ~30% recovery
    H,
}

impl From<EcLevelOption> for qrcode::EcLevel {
    fn from(level: EcLevelOption) -> Self {
        match level {
            EcLevelOption::L => qrcode::EcLevel::L,
            EcLevelOption::M => qrcode::EcLevel::M,
            EcLevelOption::Q => qrcode::EcLevel::Q,
            EcLevelOption::H => qrcode::EcLevel::H,
        }
    }
}

/// Parameters controlling QR rendering and logo size
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    /// Smallest QR version to try; grown as needed to fit the payload
    pub version: i16,
    /// Error correction level
    pub ec_level: EcLevelOption,
    /// Pixels per module
    pub box_size: u32,
    /// Quiet zone width in modules
    pub border: u32,
    /// Logo side length as a fraction of the QR image width
    pub logo_ratio: f64,
    /// RGB color of dark modules
    pub dark_color: [u8; 3],
    /// RGB color of light modules and border
    pub light_color: [u8; 3],
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            version: 1,
            ec_level: EcLevelOption::H,
            box_size: 10,
            border: 2,
            logo_ratio: 0.25,
            dark_color: [0, 0, 0],
            light_color: [255, 255, 255],
        }
    }
}

impl RenderOptions {
    /// Reject parameters that cannot produce an image.
    pub fn validate(&self) -> Result<()> {
        if !(1..=40).contains(&self.version) {
            return Err(Error::Config(format!(
                "QR version must be between 1 and 40, got {}",
                self.version
            )));
        }
        if self.box_size == 0 {
            return Err(Error::Config("box_size must be at least 1".to_string()));
        }
        if !(self.logo_ratio > 0.0 && self.logo_ratio < 1.0) {
            return Err(Error::Config(format!(
                "logo_ratio must be within (0, 1), got {}",
                self.logo_ratio
            )));
        }
        if self.dark_color == self.light_color {
            return Err(Error::Config(format!(
                "dark_color and light_color must differ, both are {:?}",
                self.dark_color
            )));
        }
        Ok(())
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `TOPICQR_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in terminal logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    pub(crate) fn apply_env_overrides(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("TOPICQR_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("TOPICQR_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = lookup("TOPICQR_LOG_COLOR") {
            if let Some(flag) = parse_flag(&color) {
                self.color = flag;
            }
        }
        if let Some(rotation) = lookup("TOPICQR_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}
