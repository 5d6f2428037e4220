//! Info command - show one extracted record in detail.

use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::cli::output::print_table;
use crate::repo;

/// Arguments for the info command.
#[derive(Debug)]
pub struct InfoArgs {
    pub file: PathBuf,
}

/// Execute the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    if !args.file.exists() {
        bail!("file not found: {}", args.file.display());
    }

    let record = repo::load(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;

    print_table(
        &["Field", "Value"],
        vec![
            vec!["Title".to_string(), record.title.clone()],
            vec!["Id".to_string(), record.id.clone()],
            vec!["Updated".to_string(), record.updated.to_rfc3339()],
            vec!["Categories".to_string(), record.categories.join(", ")],
            vec!["Taxonomies".to_string(), record.taxonomies.join(", ")],
            vec!["Links".to_string(), record.links.len().to_string()],
        ],
    );

    if !record.features.is_empty() {
        println!();
        print_table(
            &["Feature", "Parameters"],
            record
                .features
                .iter()
                .map(|f| vec![f.name.clone(), f.parameters.len().to_string()])
                .collect(),
        );
    }

    if !record.family.variants.is_empty() {
        println!();
        print_table(
            &["Variant", "Parts", "Parameters"],
            record
                .family
                .variants
                .iter()
                .map(|v| {
                    let params: usize = v.parts.iter().map(|p| p.parameters.len()).sum();
                    vec![
                        v.name.clone(),
                        v.parts.len().to_string(),
                        params.to_string(),
                    ]
                })
                .collect(),
        );
    }
    Ok(())
}
