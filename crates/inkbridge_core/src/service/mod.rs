//! Orchestration services over the vault session.

pub mod import_service;

pub use import_service::{ImportError, ImportRunReport, ImportService};
