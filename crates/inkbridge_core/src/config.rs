//! Run configuration loading and validation.
//!
//! # Responsibility
//! - Deserialize the JSON configuration file driving one import run.
//! - Validate path and extension invariants before any I/O starts.
//!
//! # Invariants
//! - Every path-like field is non-blank after validation.
//! - Extensions are dot-prefixed; the processed suffix never ends with a
//!   valid extension, or marked files would be re-imported forever.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

/// Where the daily-note date for an export comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Timestamp of the import run.
    #[default]
    CurrentTime,
    /// Filesystem modification time of the export file.
    FileModified,
}

/// Command line of the vault's remote-control server process.
#[derive(Debug, Clone, Deserialize)]
pub struct VaultServerConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Full configuration for one import run.
#[derive(Debug, Clone, Deserialize)]
pub struct ImporterConfig {
    pub vault_server: VaultServerConfig,
    /// Vault-relative path of the daily-note template.
    pub template_path: String,
    /// Local folder the capture device exports into.
    pub export_folder: String,
    /// Vault-relative folder holding date-named daily notes.
    pub daily_notes_folder: String,
    /// Heading the transformed content is appended under.
    #[serde(default = "default_section_heading")]
    pub note_section_heading: String,
    /// Dot-prefixed file extensions considered importable.
    #[serde(default = "default_valid_extensions")]
    pub valid_extensions: Vec<String>,
    /// Suffix appended to files once their content reached the vault.
    #[serde(default = "default_processed_suffix")]
    pub processed_suffix: String,
    #[serde(default)]
    pub note_date: DateSource,
}

fn default_section_heading() -> String {
    "Notes".to_string()
}

fn default_valid_extensions() -> Vec<String> {
    vec![".txt".to_string()]
}

fn default_processed_suffix() -> String {
    ".processed".to_string()
}

impl ImporterConfig {
    /// Validates field-level invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vault_server.command.trim().is_empty() {
            return Err(ConfigError::EmptyField("vault_server.command"));
        }
        if self.template_path.trim().is_empty() {
            return Err(ConfigError::EmptyField("template_path"));
        }
        if self.export_folder.trim().is_empty() {
            return Err(ConfigError::EmptyField("export_folder"));
        }
        if self.daily_notes_folder.trim().is_empty() {
            return Err(ConfigError::EmptyField("daily_notes_folder"));
        }
        if self.note_section_heading.trim().is_empty() {
            return Err(ConfigError::EmptyField("note_section_heading"));
        }
        if self.processed_suffix.trim().is_empty() {
            return Err(ConfigError::EmptyField("processed_suffix"));
        }

        if self.valid_extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        for extension in &self.valid_extensions {
            if !extension.starts_with('.') || extension.len() < 2 {
                return Err(ConfigError::InvalidExtension(extension.clone()));
            }
            if self.processed_suffix.ends_with(extension.as_str()) {
                return Err(ConfigError::SuffixShadowsExtension {
                    suffix: self.processed_suffix.clone(),
                    extension: extension.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Loads and validates one configuration file.
pub fn load_config(path: &Path) -> Result<ImporterConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: ImporterConfig = serde_json::from_str(&raw).map_err(ConfigError::Parse)?;
    config.validate()?;
    Ok(config)
}

/// Configuration loading and validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: String,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
    EmptyField(&'static str),
    NoExtensions,
    InvalidExtension(String),
    SuffixShadowsExtension { suffix: String, extension: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{path}`: {source}")
            }
            Self::Parse(err) => write!(f, "config is not valid JSON: {err}"),
            Self::EmptyField(field) => write!(f, "config field must not be blank: {field}"),
            Self::NoExtensions => write!(f, "valid_extensions must not be empty"),
            Self::InvalidExtension(value) => {
                write!(f, "extension must be dot-prefixed and non-empty: `{value}`")
            }
            Self::SuffixShadowsExtension { suffix, extension } => write!(
                f,
                "processed_suffix `{suffix}` ends with valid extension `{extension}`; \
                 marked files would be picked up again"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, DateSource, ImporterConfig};

    fn minimal_json() -> &'static str {
        r#"{
            "vault_server": { "command": "vault-remote-server" },
            "template_path": "Templates/Daily.md",
            "export_folder": "/exports",
            "daily_notes_folder": "Daily Notes"
        }"#
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config: ImporterConfig =
            serde_json::from_str(minimal_json()).expect("minimal config should parse");
        config.validate().expect("minimal config should validate");
        assert_eq!(config.note_section_heading, "Notes");
        assert_eq!(config.valid_extensions, vec![".txt".to_string()]);
        assert_eq!(config.processed_suffix, ".processed");
        assert_eq!(config.note_date, DateSource::CurrentTime);
        assert!(config.vault_server.args.is_empty());
    }

    #[test]
    fn rejects_extension_without_leading_dot() {
        let mut config: ImporterConfig =
            serde_json::from_str(minimal_json()).expect("minimal config should parse");
        config.valid_extensions = vec!["txt".to_string()];
        let err = config.validate().expect_err("bare extension must fail");
        assert!(matches!(err, ConfigError::InvalidExtension(_)));
    }

    #[test]
    fn rejects_suffix_that_shadows_an_extension() {
        let mut config: ImporterConfig =
            serde_json::from_str(minimal_json()).expect("minimal config should parse");
        config.processed_suffix = ".done.txt".to_string();
        let err = config.validate().expect_err("shadowing suffix must fail");
        assert!(matches!(err, ConfigError::SuffixShadowsExtension { .. }));
    }
}
