//! Batch extraction: discovery, backup filtering, per-file isolation,
//! output resolution, and the batch summary.
//!
//! Processing is strictly sequential, one file at a time. The batch loop is
//! a fold over the discovered paths: each step is wrapped in its own error
//! boundary, so a single file's failure lands in its own result slot and
//! never aborts the rest of the batch.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::drift::DriftReport;
use crate::error::Result;
use crate::extract::FamilyReader;
use crate::repo;

/// Container extension the discovery walk keys on.
pub const CONTAINER_EXT: &str = "rfa";

/// Options controlling one batch run.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Walk subdirectories when the input is a directory.
    pub recursive: bool,
    /// Process `<stem>.<NNNN>.<ext>` revision snapshots too.
    pub include_backups: bool,
    /// Replace existing output files.
    pub overwrite: bool,
    /// Run every stage except the final write.
    pub dry_run: bool,
    /// Mirror the input directory structure beneath this root instead of
    /// writing beside each source file.
    pub output_root: Option<PathBuf>,
}

/// Result of the discovery stage.
#[derive(Debug, Clone)]
pub struct Discovered {
    /// Container files to process, sorted for deterministic ordering.
    pub eligible: Vec<PathBuf>,
    /// Backup files filtered out (zero when backups are included).
    pub backups_skipped: usize,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Written,
    DryRun,
    SkippedExisting,
    Failed { kind: &'static str, message: String },
}

/// One drift entry in the batch summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriftEntry {
    pub file: String,
    pub description: String,
}

/// One failure entry in the batch summary.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEntry {
    pub file: String,
    pub kind: String,
    pub message: String,
}

/// Batch totals plus the union of per-file drift, in discovery order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub drift: Vec<DriftEntry>,
    pub failures: Vec<FailureEntry>,
}

/// Orchestrates one batch from input path to summary.
pub struct ExtractionService {
    reader: FamilyReader,
    options: ExtractOptions,
}

impl ExtractionService {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            reader: FamilyReader::new(),
            options,
        }
    }

    pub fn with_reader(reader: FamilyReader, options: ExtractOptions) -> Self {
        Self { reader, options }
    }

    /// Discover eligible container files under `input`.
    pub fn discover(&self, input: &Path) -> Result<Discovered> {
        if !input.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("input path does not exist: {}", input.display()),
            )
            .into());
        }

        let mut eligible = Vec::new();
        let mut backups_skipped = 0;

        if input.is_file() {
            if has_container_ext(input) {
                if is_backup_file(input) && !self.options.include_backups {
                    backups_skipped += 1;
                } else {
                    eligible.push(input.to_path_buf());
                }
            }
        } else {
            let mut walker = WalkDir::new(input);
            if !self.options.recursive {
                walker = walker.max_depth(1);
            }
            for entry in walker.into_iter().filter_map(|e| e.ok()) {
                let path = entry.path();
                if !entry.file_type().is_file() || !has_container_ext(path) {
                    continue;
                }
                if is_backup_file(path) && !self.options.include_backups {
                    backups_skipped += 1;
                    continue;
                }
                eligible.push(path.to_path_buf());
            }
        }

        eligible.sort();
        if backups_skipped > 0 {
            info!(count = backups_skipped, "skipping backup files");
        }
        Ok(Discovered {
            eligible,
            backups_skipped,
        })
    }

    /// Run the full batch: discovery, per-file processing, summary.
    pub fn run(&self, input: &Path) -> Result<BatchSummary> {
        self.run_with(input, |_| {})
    }

    /// As [`run`](Self::run), invoking `on_file` before each file is
    /// processed (progress reporting).
    pub fn run_with(
        &self,
        input: &Path,
        mut on_file: impl FnMut(&Path),
    ) -> Result<BatchSummary> {
        let discovered = self.discover(input)?;
        Ok(self.process(&discovered, input, &mut on_file))
    }

    /// Process an already-discovered batch.
    pub fn process(
        &self,
        discovered: &Discovered,
        input: &Path,
        on_file: &mut dyn FnMut(&Path),
    ) -> BatchSummary {
        info!(
            input = %input.display(),
            files = discovered.eligible.len(),
            dry_run = self.options.dry_run,
            "starting extraction batch"
        );

        let mut summary = BatchSummary {
            skipped: discovered.backups_skipped,
            ..BatchSummary::default()
        };
        let mut seen_ids: HashMap<String, PathBuf> = HashMap::new();

        for file in &discovered.eligible {
            on_file(file);
            let (outcome, drift) = self.process_file(file, input, &mut seen_ids);
            let file_name = file.display().to_string();

            if let Some(drift) = drift {
                for description in drift.descriptions() {
                    summary.drift.push(DriftEntry {
                        file: file_name.clone(),
                        description,
                    });
                }
            }

            match outcome {
                FileOutcome::Written | FileOutcome::DryRun => summary.succeeded += 1,
                FileOutcome::SkippedExisting => {
                    info!(file = %file_name, "output exists, skipping");
                    summary.skipped += 1;
                }
                FileOutcome::Failed { kind, message } => {
                    warn!(file = %file_name, kind, error = %message, "extraction failed");
                    summary.failed += 1;
                    summary.failures.push(FailureEntry {
                        file: file_name,
                        kind: kind.to_string(),
                        message,
                    });
                }
            }
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            drift = summary.drift.len(),
            "extraction batch complete"
        );
        summary
    }

    /// One step of the batch fold. Never returns an error: every failure is
    /// converted into the file's own outcome slot.
    fn process_file(
        &self,
        file: &Path,
        input: &Path,
        seen_ids: &mut HashMap<String, PathBuf>,
    ) -> (FileOutcome, Option<DriftReport>) {
        let output = self.output_path(file, input);
        if output.exists() && !self.options.overwrite {
            return (FileOutcome::SkippedExisting, None);
        }

        let (record, drift) = match self.reader.extract(file) {
            Ok(extracted) => extracted,
            Err(e) => {
                return (
                    FileOutcome::Failed {
                        kind: e.kind(),
                        message: e.to_string(),
                    },
                    None,
                )
            }
        };

        if let Some(previous) = seen_ids.insert(record.id.clone(), file.to_path_buf()) {
            warn!(
                id = %record.id,
                file = %file.display(),
                previous = %previous.display(),
                "duplicate record id within batch"
            );
        }

        let persisted = if self.options.dry_run {
            repo::check(&record, file)
        } else {
            repo::save(&record, &output).and_then(|_| repo::load(&output).map(|_| ()))
        };

        match persisted {
            Ok(()) => {
                let outcome = if self.options.dry_run {
                    FileOutcome::DryRun
                } else {
                    FileOutcome::Written
                };
                (outcome, Some(drift))
            }
            Err(e) => (
                FileOutcome::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                },
                None,
            ),
        }
    }

    /// Resolve where a source file's JSON lands.
    ///
    /// No output root: beside the source. With an output root: mirror the
    /// relative directory structure under the input root beneath it.
    pub fn output_path(&self, file: &Path, input: &Path) -> PathBuf {
        let file_name = match file.file_stem() {
            Some(stem) => {
                let mut name = stem.to_os_string();
                name.push(".json");
                name
            }
            None => "output.json".into(),
        };

        match &self.options.output_root {
            None => file.with_file_name(file_name),
            Some(root) => {
                if input.is_file() {
                    return root.join(file_name);
                }
                let rel = file
                    .parent()
                    .and_then(|p| p.strip_prefix(input).ok())
                    .unwrap_or_else(|| Path::new(""));
                root.join(rel).join(file_name)
            }
        }
    }
}

fn has_container_ext(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(CONTAINER_EXT))
        .unwrap_or(false)
}

/// A filename of the form `<stem>.<4-digit-number>.<ext>` is a revision
/// snapshot of `<stem>.<ext>` left behind by the vendor tool.
pub fn is_backup_file(path: &Path) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(&format!(r"(?i)\.\d{{4}}\.{}$", CONTAINER_EXT)).expect("valid backup pattern")
    });
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| re.is_match(n))
        .unwrap_or(false)
}
