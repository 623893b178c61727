//! Core library for inkbridge: imports handwriting-capture exports into
//! date-keyed daily notes of an external vault.
//!
//! The transformation pipeline in [`transform`] is the heart of the crate;
//! everything else is orchestration around it.

pub mod config;
pub mod exports;
pub mod logging;
pub mod service;
pub mod transform;
pub mod vault;

pub use config::{load_config, ConfigError, DateSource, ImporterConfig, VaultServerConfig};
pub use exports::{ExportError, ExportFile, ExportResult, ExportScanner};
pub use logging::{default_log_level, init_logging, logging_status};
pub use service::import_service::{ImportError, ImportRunReport, ImportService};
pub use transform::{
    link_proper_nouns, normalize_text, resegment_sentences, LinkRules, TransformPipeline,
};
pub use vault::session::{
    PatchOperation, PatchTargetType, VaultError, VaultResult, VaultSession,
};
pub use vault::stdio::StdioVaultSession;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
