//! CLI configuration
//!
//! Configuration is loaded hierarchically; later sources override earlier ones:
//! - Default configuration file
//! - Environment-specific configuration file
//! - Environment variables
//! - Command-line arguments (applied by `main`)

use catalog_identity_core::{
    FingerprintScheme, Fingerprinter, GuidGenerator, HashAlgorithm, IdentityError, RandomGuidGenerator,
    SequentialGuidGenerator,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Identity derivation settings
    #[serde(default)]
    pub identity: IdentityConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Use JSON formatting
    #[serde(default)]
    pub json_format: bool,

    /// Include timestamps
    #[serde(default = "default_true")]
    pub include_timestamps: bool,

    /// Include thread IDs
    #[serde(default)]
    pub include_thread_ids: bool,

    /// Include target module
    #[serde(default = "default_true")]
    pub include_target: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            include_timestamps: true,
            include_thread_ids: false,
            include_target: true,
        }
    }
}

/// Which placeholder GUIDs new assets receive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderMode {
    /// `-<random>`
    Random,
    /// `-1`, `-2`, ... reproducible across runs
    Sequential,
}

impl Default for PlaceholderMode {
    fn default() -> Self {
        PlaceholderMode::Random
    }
}

/// Identity derivation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Layout of fingerprinted fields (`concatenated` or `length_prefixed`)
    #[serde(default = "default_fingerprint_scheme")]
    pub fingerprint_scheme: String,

    /// Hash used for fingerprints
    #[serde(default = "default_hash_algorithm")]
    pub hash_algorithm: String,

    /// Placeholder GUID mode
    #[serde(default)]
    pub placeholder: PlaceholderMode,
}

fn default_fingerprint_scheme() -> String {
    FingerprintScheme::default().to_string()
}

fn default_hash_algorithm() -> String {
    HashAlgorithm::default().to_string()
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            fingerprint_scheme: default_fingerprint_scheme(),
            hash_algorithm: default_hash_algorithm(),
            placeholder: PlaceholderMode::default(),
        }
    }
}

impl IdentityConfig {
    /// Build the fingerprinter described by this configuration.
    ///
    /// An unknown hash algorithm is fatal; there is no fallback.
    pub fn fingerprinter(&self) -> Result<Fingerprinter, IdentityError> {
        let scheme: FingerprintScheme = self.fingerprint_scheme.parse()?;
        let algorithm: HashAlgorithm = self.hash_algorithm.parse()?;
        Ok(Fingerprinter::new(scheme, algorithm))
    }

    /// Build the placeholder GUID source described by this configuration
    pub fn guid_generator(&self) -> Box<dyn GuidGenerator> {
        match self.placeholder {
            PlaceholderMode::Random => Box::new(RandomGuidGenerator::new()),
            PlaceholderMode::Sequential => Box::new(SequentialGuidGenerator::new()),
        }
    }
}

impl CliConfig {
    /// Load configuration from files and environment
    ///
    /// Configuration is loaded in the following order (later sources override earlier):
    /// 1. Default configuration file (config/default.toml)
    /// 2. Environment-specific file (config/{env}.toml)
    /// 3. Environment variables (CATALOG_IDENTITY__*)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed
    pub fn load(config_dir: impl Into<PathBuf>, environment: &str) -> Result<Self, ConfigError> {
        let config_dir = config_dir.into();

        let config = Config::builder()
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join(format!("{}.toml", environment))).required(false))
            // e.g., CATALOG_IDENTITY__IDENTITY__PLACEHOLDER=sequential
            .add_source(
                Environment::with_prefix("CATALOG_IDENTITY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
