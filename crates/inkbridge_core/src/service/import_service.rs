//! Import run orchestration.
//!
//! # Responsibility
//! - Drive one run: template load, per-file transform and append, marking.
//! - Classify failures: session and template problems are fatal, per-file
//!   problems are logged and skipped.
//!
//! # Invariants
//! - A daily note is created from the template before the first append
//!   targeting a date with no note yet.
//! - An export file is marked processed only after its content reached
//!   the vault.

use crate::config::{DateSource, ImporterConfig};
use crate::exports::{ExportError, ExportFile, ExportScanner};
use crate::transform::TransformPipeline;
use crate::vault::session::{PatchOperation, PatchTargetType, VaultError, VaultSession};
use chrono::{DateTime, Local};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Orchestration failures for one import run.
#[derive(Debug)]
pub enum ImportError {
    /// The daily-note template could not be fetched. Fatal: a run that
    /// cannot create missing notes must not start appending.
    TemplateUnavailable { path: String, source: VaultError },
    /// A note had to be created before `load_template` ran.
    TemplateNotLoaded,
    Vault(VaultError),
    Export(ExportError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateUnavailable { path, source } => {
                write!(f, "daily-note template `{path}` unavailable: {source}")
            }
            Self::TemplateNotLoaded => write!(f, "template not loaded before note creation"),
            Self::Vault(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TemplateUnavailable { source, .. } => Some(source),
            Self::TemplateNotLoaded => None,
            Self::Vault(err) => Some(err),
            Self::Export(err) => Some(err),
        }
    }
}

impl From<VaultError> for ImportError {
    fn from(value: VaultError) -> Self {
        Self::Vault(value)
    }
}

impl From<ExportError> for ImportError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}

/// Counts for one completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportRunReport {
    pub processed: u32,
    pub failed: u32,
}

/// Import orchestrator bound to one vault session.
pub struct ImportService<S: VaultSession> {
    session: S,
    config: ImporterConfig,
    pipeline: TransformPipeline,
    template: Option<String>,
}

impl<S: VaultSession> ImportService<S> {
    /// Creates a service with the standard transformation pipeline.
    pub fn new(session: S, config: ImporterConfig) -> Self {
        Self::with_pipeline(session, config, TransformPipeline::new())
    }

    /// Creates a service with a caller-configured pipeline.
    pub fn with_pipeline(session: S, config: ImporterConfig, pipeline: TransformPipeline) -> Self {
        Self {
            session,
            config,
            pipeline,
            template: None,
        }
    }

    /// Fetches the daily-note template once per run.
    pub fn load_template(&mut self) -> Result<(), ImportError> {
        let path = self.config.template_path.clone();
        let template =
            self.session
                .get_file_contents(&path)
                .map_err(|source| ImportError::TemplateUnavailable {
                    path: path.clone(),
                    source,
                })?;
        self.template = Some(template);
        info!("event=template_loaded module=import status=ok path={path}");
        Ok(())
    }

    /// Processes every pending export, continuing past per-file failures.
    pub fn run(&mut self, scanner: &ExportScanner) -> Result<ImportRunReport, ImportError> {
        let pending = scanner.pending_exports()?;
        info!(
            "event=import_start module=import status=ok pending={}",
            pending.len()
        );

        let mut report = ImportRunReport::default();
        for file in &pending {
            match self.process_export(scanner, file) {
                Ok(()) => report.processed += 1,
                Err(err) => {
                    report.failed += 1;
                    error!(
                        "event=export_failed module=import status=error file={} reason={err}",
                        file.path.display()
                    );
                }
            }
        }

        info!(
            "event=import_done module=import status=ok processed={} failed={}",
            report.processed, report.failed
        );
        Ok(report)
    }

    /// Imports one export file into its daily note and marks it processed.
    pub fn process_export(
        &mut self,
        scanner: &ExportScanner,
        file: &ExportFile,
    ) -> Result<(), ImportError> {
        let raw = scanner.read_text(file)?;
        let content = self.pipeline.apply(&raw);
        let date = self.note_date(file);
        let note_path = self.ensure_daily_note(date)?;
        self.append_to_section(&note_path, &content)?;
        let renamed = scanner.mark_processed(file)?;
        info!(
            "event=export_processed module=import status=ok file={} note={note_path} renamed={}",
            file.path.display(),
            renamed.display()
        );
        Ok(())
    }

    /// Consumes the service, returning the underlying session.
    pub fn into_session(self) -> S {
        self.session
    }

    /// Returns the daily-note path for `date`, creating the note from the
    /// template when the vault does not have it yet.
    fn ensure_daily_note(&mut self, date: DateTime<Local>) -> Result<String, ImportError> {
        let note_path = format!(
            "{}/{}.md",
            self.config.daily_notes_folder,
            date.format("%Y-%m-%d")
        );

        match self.session.get_file_contents(&note_path) {
            Ok(_) => Ok(note_path),
            Err(VaultError::FileNotFound(_)) => {
                let template = self
                    .template
                    .as_deref()
                    .ok_or(ImportError::TemplateNotLoaded)?;
                let rendered = render_template(template, date);
                self.session.append_content(&note_path, &rendered)?;
                info!("event=daily_note_created module=import status=ok note={note_path}");
                Ok(note_path)
            }
            Err(other) => Err(ImportError::Vault(other)),
        }
    }

    fn append_to_section(&mut self, note_path: &str, content: &str) -> Result<(), ImportError> {
        self.session.patch_content(
            note_path,
            PatchTargetType::Heading,
            self.config.note_section_heading.as_str(),
            PatchOperation::Append,
            &format!("\n{content}\n"),
        )?;
        Ok(())
    }

    fn note_date(&self, file: &ExportFile) -> DateTime<Local> {
        match self.config.note_date {
            DateSource::CurrentTime => Local::now(),
            DateSource::FileModified => file
                .modified
                .map(DateTime::<Local>::from)
                .unwrap_or_else(Local::now),
        }
    }
}

/// Renders `{{date}}` and `{{time}}` template variables.
fn render_template(template: &str, date: DateTime<Local>) -> String {
    template
        .replace("{{date}}", &date.format("%Y-%m-%d").to_string())
        .replace("{{time}}", &date.format("%H:%M").to_string())
}
