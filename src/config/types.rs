//! Configuration types for sbom-convert operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// Constructed from a config file, CLI arguments, or both (with CLI
/// overriding file settings through [`AppConfig::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Conversion behaviour
    pub convert: ConvertOptions,
    /// Output destination and formatting
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }
}

/// Command-line flags that override config file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub validate: bool,
    pub compact: bool,
    pub deterministic: bool,
    pub no_describes_root: bool,
    pub output_file: Option<PathBuf>,
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Validate the produced document before writing it.
    pub const fn validate(mut self, validate: bool) -> Self {
        self.config.convert.validate = validate;
        self
    }

    /// Pretty-print the produced JSON.
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.config.convert.pretty = pretty;
        self
    }

    /// Choose how the serial number is generated.
    pub const fn serial_number(mut self, mode: SerialNumberMode) -> Self {
        self.config.convert.serial_number = mode;
        self
    }

    /// Honour `DESCRIBES` as a root signal.
    pub const fn root_from_describes(mut self, enabled: bool) -> Self {
        self.config.convert.root_from_describes = enabled;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sub-configuration Types
// ============================================================================

/// Options for a single conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConvertOptions {
    /// Re-parse and structurally validate the produced document
    pub validate: bool,
    /// Pretty-print the produced JSON
    pub pretty: bool,
    /// How the document serial number is generated
    pub serial_number: SerialNumberMode,
    /// Use the document's DESCRIBES target as root when no package has a root id
    pub root_from_describes: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            validate: false,
            pretty: true,
            serial_number: SerialNumberMode::Random,
            root_from_describes: true,
        }
    }
}

impl ConvertOptions {
    /// Options that make output byte-identical across runs.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            serial_number: SerialNumberMode::ContentHash,
            ..Self::default()
        }
    }
}

/// Serial number generation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SerialNumberMode {
    /// Fresh random UUID per run
    #[default]
    Random,
    /// UUID derived from a hash of the input bytes
    ContentHash,
}

/// Output-related configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
