//! Validate command - re-check already-emitted JSON records.

use std::path::PathBuf;

use anyhow::bail;
use walkdir::WalkDir;

use crate::cli::output::{print_table, truncate};
use crate::repo;

/// Arguments for the validate command.
#[derive(Debug)]
pub struct ValidateArgs {
    pub directory: PathBuf,
    pub recursive: bool,
}

/// Execute the validate command.
pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    if !args.directory.is_dir() {
        bail!("not a directory: {}", args.directory.display());
    }

    let mut walker = WalkDir::new(&args.directory);
    if !args.recursive {
        walker = walker.max_depth(1);
    }
    let mut json_files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    json_files.sort();

    if json_files.is_empty() {
        bail!("no JSON files found under {}", args.directory.display());
    }

    let mut invalid: Vec<(PathBuf, String)> = Vec::new();
    for path in &json_files {
        if let Err(e) = repo::load(path) {
            invalid.push((path.clone(), e.to_string()));
        }
    }

    let valid = json_files.len() - invalid.len();
    print_table(
        &["Status", "Count"],
        vec![
            vec!["Valid".to_string(), valid.to_string()],
            vec!["Invalid".to_string(), invalid.len().to_string()],
        ],
    );

    if !invalid.is_empty() {
        println!();
        print_table(
            &["File", "Error"],
            invalid
                .iter()
                .map(|(path, error)| {
                    vec![truncate(&path.display().to_string(), 48), truncate(error, 72)]
                })
                .collect(),
        );
        bail!("{} invalid record(s)", invalid.len());
    }
    Ok(())
}
