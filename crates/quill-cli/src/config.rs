//! Configuration for the quill CLI

use std::path::PathBuf;

use quill_ink::CaptureConfig;
use quill_types::ArtifactRole;
use serde::{Deserialize, Serialize};

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuillConfig {
    /// Ink surface settings per role
    #[serde(default)]
    pub capture: CaptureSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Signing-request store
    #[serde(default)]
    pub store: StoreConfig,
}

/// Ink surface settings for both roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    #[serde(default = "CaptureConfig::signature")]
    pub signature: CaptureConfig,

    #[serde(default = "CaptureConfig::initials")]
    pub initials: CaptureConfig,
}

impl CaptureSettings {
    pub fn for_role(&self, role: ArtifactRole) -> &CaptureConfig {
        match role {
            ArtifactRole::Signature => &self.signature,
            ArtifactRole::Initials => &self.initials,
        }
    }
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            signature: CaptureConfig::signature(),
            initials: CaptureConfig::initials(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// File-backed store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON file holding requests and accepted submissions
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_store_path() -> PathBuf {
    PathBuf::from("quill-store.json")
}

impl QuillConfig {
    /// Load configuration: defaults, then the optional file, then `QUILL_*`
    /// environment variables (`QUILL_LOGGING__LEVEL=debug`).
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&QuillConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("QUILL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
