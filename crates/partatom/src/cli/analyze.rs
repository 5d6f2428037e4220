//! Analyze command - summary statistics and ad-hoc filtering over a
//! directory of extracted records.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::bail;
use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

use partatom_schema::FamilyRecord;

use crate::cli::output::{print_table, truncate};
use crate::query::{Namespace, Query};
use crate::repo;

/// Arguments for the analyze command.
#[derive(Debug)]
pub struct AnalyzeArgs {
    pub directory: PathBuf,
    pub query: Option<String>,
    pub recursive: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeStats {
    records: usize,
    parameters: usize,
    variants: usize,
    categories: Vec<(String, usize)>,
    type_of_parameters: Vec<(String, usize)>,
}

/// Execute the analyze command.
pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    if !args.directory.is_dir() {
        bail!("not a directory: {}", args.directory.display());
    }

    let records = load_records(&args.directory, args.recursive);
    if records.is_empty() {
        bail!("no valid records found under {}", args.directory.display());
    }

    let stats = build_stats(&records);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print_stats(&stats);
    }

    if let Some(raw) = &args.query {
        let query = match Query::parse(raw) {
            Ok(query) => query,
            Err(message) => bail!("invalid query '{}': {}", raw, message),
        };
        run_query(&query, &records);
    }
    Ok(())
}

fn load_records(directory: &PathBuf, recursive: bool) -> Vec<(PathBuf, FamilyRecord)> {
    let mut walker = WalkDir::new(directory);
    if !recursive {
        walker = walker.max_depth(1);
    }
    let mut paths: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        match repo::load(&path) {
            Ok(record) => records.push((path, record)),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unreadable record"),
        }
    }
    records
}

fn build_stats(records: &[(PathBuf, FamilyRecord)]) -> AnalyzeStats {
    let mut categories: HashMap<String, usize> = HashMap::new();
    let mut type_of_parameters: HashMap<String, usize> = HashMap::new();
    let mut parameters = 0;
    let mut variants = 0;

    for (_, record) in records {
        parameters += record.parameter_count();
        variants += record.family.variants.len();
        for category in &record.categories {
            *categories.entry(category.clone()).or_insert(0) += 1;
        }
        let feature_params = record.features.iter().flat_map(|f| f.parameters.iter());
        let part_params = record
            .family
            .variants
            .iter()
            .flat_map(|v| v.parts.iter())
            .flat_map(|p| p.parameters.iter());
        for param in feature_params.chain(part_params) {
            if let Some(tag) = &param.type_of_parameter {
                *type_of_parameters.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }

    AnalyzeStats {
        records: records.len(),
        parameters,
        variants,
        categories: sorted_counts(categories),
        type_of_parameters: sorted_counts(type_of_parameters),
    }
}

fn sorted_counts(map: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = map.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

fn print_stats(stats: &AnalyzeStats) {
    print_table(
        &["Metric", "Count"],
        vec![
            vec!["Records".to_string(), stats.records.to_string()],
            vec!["Parameters".to_string(), stats.parameters.to_string()],
            vec!["Variants".to_string(), stats.variants.to_string()],
        ],
    );

    if !stats.categories.is_empty() {
        println!();
        print_table(
            &["Category", "Families"],
            stats
                .categories
                .iter()
                .map(|(name, count)| vec![name.clone(), count.to_string()])
                .collect(),
        );
    }

    if !stats.type_of_parameters.is_empty() {
        println!();
        print_table(
            &["typeOfParameter", "Occurrences"],
            stats
                .type_of_parameters
                .iter()
                .take(15)
                .map(|(name, count)| vec![name.clone(), count.to_string()])
                .collect(),
        );
    }
}

fn run_query(query: &Query, records: &[(PathBuf, FamilyRecord)]) {
    println!();
    match query.namespace {
        Namespace::Param | Namespace::Group => {
            let mut rows = Vec::new();
            for (_, record) in records {
                for hit in query.find_parameters(record) {
                    rows.push(vec![
                        truncate(&record.title, 32),
                        hit.scope.to_string(),
                        hit.parameter.name.clone(),
                        hit.parameter.kind.to_string(),
                        truncate(&hit.parameter.value, 24),
                    ]);
                }
            }
            println!("{} matching parameter(s)", rows.len());
            if !rows.is_empty() {
                print_table(&["Family", "Scope", "Parameter", "Kind", "Value"], rows);
            }
        }
        Namespace::Cat | Namespace::Family => {
            let rows: Vec<Vec<String>> = records
                .iter()
                .filter(|(_, record)| query.matches(record))
                .map(|(path, record)| {
                    vec![
                        truncate(&record.title, 40),
                        record.categories.join(", "),
                        truncate(&path.display().to_string(), 48),
                    ]
                })
                .collect();
            println!("{} matching famil(ies)", rows.len());
            if !rows.is_empty() {
                print_table(&["Family", "Categories", "File"], rows);
            }
        }
    }
}
