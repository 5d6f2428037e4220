//! Extract command - run the batch pipeline over a file or directory.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::bail;
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::output::{print_table, truncate};
use crate::service::{ExtractOptions, ExtractionService};

/// Arguments for the extract command.
#[derive(Debug)]
pub struct ExtractArgs {
    pub path: PathBuf,
    pub output: Option<PathBuf>,
    pub recursive: bool,
    pub force: bool,
    pub dry_run: bool,
    pub include_backups: bool,
    pub json: bool,
}

/// Execute the extract command.
pub fn run(args: ExtractArgs) -> anyhow::Result<()> {
    if !args.path.exists() {
        bail!("path not found: {}", args.path.display());
    }

    let options = ExtractOptions {
        recursive: args.recursive,
        include_backups: args.include_backups,
        overwrite: args.force,
        dry_run: args.dry_run,
        output_root: args.output.clone(),
    };
    let service = ExtractionService::new(options);

    let discovered = service.discover(&args.path)?;
    if discovered.eligible.is_empty() && discovered.backups_skipped == 0 {
        bail!("no container files found under {}", args.path.display());
    }

    let started = Instant::now();
    let bar = if args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(discovered.eligible.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    };

    let mut on_file = |file: &std::path::Path| {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        bar.set_message(name);
        bar.inc(1);
    };
    let summary = service.process(&discovered, &args.path, &mut on_file);
    bar.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        let duration = started.elapsed();
        print_table(
            &["Result", "Count"],
            vec![
                vec!["Succeeded".to_string(), summary.succeeded.to_string()],
                vec!["Failed".to_string(), summary.failed.to_string()],
                vec!["Skipped".to_string(), summary.skipped.to_string()],
                vec![
                    "Duration".to_string(),
                    format!("{:.1}s", duration.as_secs_f64()),
                ],
            ],
        );

        if !summary.failures.is_empty() {
            println!();
            print_table(
                &["File", "Kind", "Error"],
                summary
                    .failures
                    .iter()
                    .map(|f| {
                        vec![
                            truncate(&f.file, 48),
                            f.kind.clone(),
                            truncate(&f.message, 64),
                        ]
                    })
                    .collect(),
            );
        }

        if !summary.drift.is_empty() {
            println!();
            println!(
                "Vendor vocabulary drift detected ({} entries) - consider updating the known sets:",
                summary.drift.len()
            );
            print_table(
                &["File", "Drift"],
                summary
                    .drift
                    .iter()
                    .map(|d| vec![truncate(&d.file, 48), d.description.clone()])
                    .collect(),
            );
        }
    }

    if summary.failed > 0 {
        bail!("{} file(s) failed", summary.failed);
    }
    Ok(())
}
