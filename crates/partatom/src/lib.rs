//! Partatom - Core Library
//!
//! Extracts the embedded family metadata payload from vendor container
//! files and persists it as validated JSON records.

pub mod cli;
pub mod drift;
pub mod error;
pub mod extract;
pub mod query;
pub mod repo;
pub mod service;

pub use drift::{DriftEvent, DriftKind, DriftReport, KnownVocabulary};
pub use error::{ExtractError, Result};
pub use extract::FamilyReader;
pub use service::{BatchSummary, ExtractOptions, ExtractionService};
