//! Note-service session contract.
//!
//! # Responsibility
//! - Define the remote-control operations the importer relies on.
//! - Keep wire naming for patch targets and operations in one place.
//!
//! # Invariants
//! - `FileNotFound` is the only error variant orchestration recovers
//!   from; everything else propagates to the caller.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type VaultResult<T> = Result<T, VaultError>;

/// Session-level failures talking to the note application.
#[derive(Debug)]
pub enum VaultError {
    /// The addressed vault file does not exist.
    FileNotFound(String),
    /// The server answered with a protocol-level error.
    Remote { code: i64, message: String },
    /// Transport to the server process failed.
    Transport(std::io::Error),
    /// The server sent something that is not valid protocol traffic.
    Protocol(String),
}

impl Display for VaultError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileNotFound(path) => write!(f, "vault file not found: {path}"),
            Self::Remote { code, message } => {
                write!(f, "vault server error {code}: {message}")
            }
            Self::Transport(err) => write!(f, "vault transport failed: {err}"),
            Self::Protocol(details) => write!(f, "vault protocol violation: {details}"),
        }
    }
}

impl Error for VaultError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VaultError {
    fn from(value: std::io::Error) -> Self {
        Self::Transport(value)
    }
}

/// Patch anchor kind inside a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTargetType {
    Heading,
    Block,
    FrontmatterField,
}

impl PatchTargetType {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::Block => "block",
            Self::FrontmatterField => "frontmatter",
        }
    }
}

/// How patched content relates to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOperation {
    Append,
    Prepend,
    Replace,
}

impl PatchOperation {
    pub fn as_wire(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::Replace => "replace",
        }
    }
}

/// Session with the note application's remote-control server.
pub trait VaultSession {
    /// Returns the full contents of one vault file.
    fn get_file_contents(&mut self, path: &str) -> VaultResult<String>;

    /// Appends raw content to one vault file, creating it when absent.
    fn append_content(&mut self, path: &str, content: &str) -> VaultResult<()>;

    /// Patches one vault file relative to a named target.
    fn patch_content(
        &mut self,
        path: &str,
        target_type: PatchTargetType,
        target: &str,
        operation: PatchOperation,
        content: &str,
    ) -> VaultResult<()>;
}
