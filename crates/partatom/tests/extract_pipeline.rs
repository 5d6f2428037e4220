//! End-to-end pipeline tests over real container fixtures in temp dirs.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use partatom::extract::PAYLOAD_PATH;
use partatom::repo;
use partatom::service::{ExtractOptions, ExtractionService};

fn entry_xml(title: &str, id: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<entry xmlns="http://www.w3.org/2005/Atom" xmlns:A="urn:schemas-autodesk-com:partatom">
  <title>{title}</title>
  <id>{id}</id>
  <updated>2023-04-01T10:00:00Z</updated>
  <category><term>Doors</term></category>
  <A:features>
    <A:feature>
      <A:title>Family Parameters</A:title>
      <A:group>
        <A:title>Dimensions</A:title>
        <Width type="custom" typeOfParameter="Length" units="mm">900</Width>
      </A:group>
    </A:feature>
  </A:features>
  <A:family type="user">
    <A:part type="user">
      <title>Standard</title>
      <Height type="type" typeOfParameter="Length" units="mm">2100</Height>
    </A:part>
  </A:family>
</entry>"#
    )
}

fn write_container(path: &Path, payload: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    zip.start_file(PAYLOAD_PATH, SimpleFileOptions::default())
        .unwrap();
    zip.write_all(payload.as_bytes()).unwrap();
    zip.finish().unwrap();
}

fn write_corrupt_container(path: &Path) {
    std::fs::write(path, b"definitely not an archive").unwrap();
}

fn service(options: ExtractOptions) -> ExtractionService {
    ExtractionService::new(options)
}

fn list_outputs(dir: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("json"))
        .collect();
    out.sort();
    out
}

#[test]
fn extract_save_load_roundtrips() {
    let temp = TempDir::new().unwrap();
    let container = temp.path().join("Door.rfa");
    write_container(&container, &entry_xml("Steel Door", "urn:uuid:1"));

    let reader = partatom::FamilyReader::new();
    let (record, drift) = reader.extract(&container).unwrap();
    assert!(drift.is_empty());

    let json_path = temp.path().join("Door.json");
    repo::save(&record, &json_path).unwrap();
    let loaded = repo::load(&json_path).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn backups_are_skipped_unless_included() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp.path().join("Window.rfa"), &entry_xml("Window", "urn:2"));
    write_container(&temp.path().join("Door.0001.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp.path().join("Door.0002.rfa"), &entry_xml("Door", "urn:1"));

    // Excluded: succeeded + failed == N - M == 4 - 2.
    let summary = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(summary.succeeded + summary.failed, 2);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.skipped, 2);

    // Included: every container is processed.
    let temp2 = TempDir::new().unwrap();
    write_container(&temp2.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp2.path().join("Door.0001.rfa"), &entry_xml("Door", "urn:1"));
    let summary = service(ExtractOptions {
        include_backups: true,
        ..ExtractOptions::default()
    })
    .run(temp2.path())
    .unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.skipped, 0);
}

#[test]
fn dry_run_writes_nothing_but_counts_match() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp.path().join("Window.rfa"), &entry_xml("Window", "urn:2"));
    write_corrupt_container(&temp.path().join("Broken.rfa"));

    let dry = service(ExtractOptions {
        dry_run: true,
        ..ExtractOptions::default()
    })
    .run(temp.path())
    .unwrap();
    assert!(list_outputs(temp.path()).is_empty(), "dry run must not write");

    let real = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(dry.succeeded, real.succeeded);
    assert_eq!(dry.failed, real.failed);
    assert_eq!(real.succeeded, 2);
    assert_eq!(real.failed, 1);
    assert_eq!(list_outputs(temp.path()).len(), 2);
}

#[test]
fn unknown_type_of_parameter_is_preserved_and_reported_once() {
    let temp = TempDir::new().unwrap();
    let xml = r#"<entry xmlns:A="urn:schemas-autodesk-com:partatom">
  <title>Lamp</title>
  <id>urn:uuid:9</id>
  <updated>2023-04-01T10:00:00Z</updated>
  <A:features><A:feature><A:group>
    <A:title>Photometrics</A:title>
    <Glow type="custom" typeOfParameter="Luminance" units="cd">451</Glow>
  </A:group></A:feature></A:features>
</entry>"#;
    write_container(&temp.path().join("Lamp.rfa"), xml);

    let summary = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.drift.len(), 1);
    assert!(summary.drift[0].description.contains("Luminance"));

    let record = repo::load(&temp.path().join("Lamp.json")).unwrap();
    let param = &record.features[0].parameters[0];
    assert_eq!(param.name, "Glow");
    assert_eq!(param.value, "451");
    assert_eq!(param.unit.as_deref(), Some("cd"));
    assert_eq!(param.type_of_parameter.as_deref(), Some("Luminance"));
}

#[test]
fn rerun_without_overwrite_skips_everything() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp.path().join("Window.rfa"), &entry_xml("Window", "urn:2"));

    let first = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(first.succeeded, 2);

    let second = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(second.succeeded, 0);
    assert_eq!(second.skipped, 2);
    assert_eq!(second.failed, 0);

    let forced = service(ExtractOptions {
        overwrite: true,
        ..ExtractOptions::default()
    })
    .run(temp.path())
    .unwrap();
    assert_eq!(forced.succeeded, 2);
    assert_eq!(forced.skipped, 0);
}

#[test]
fn corrupt_container_does_not_abort_siblings() {
    let temp = TempDir::new().unwrap();
    write_corrupt_container(&temp.path().join("Broken.rfa"));
    write_container(&temp.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp.path().join("Window.rfa"), &entry_xml("Window", "urn:2"));

    let summary = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].kind, "container-format");
    assert!(summary.failures[0].file.contains("Broken.rfa"));
}

#[test]
fn empty_record_is_a_per_file_failure() {
    let temp = TempDir::new().unwrap();
    write_container(
        &temp.path().join("Anon.rfa"),
        "<entry><category><term>Doors</term></category></entry>",
    );
    write_container(&temp.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));

    let summary = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failures[0].kind, "empty-record");
}

#[test]
fn output_root_mirrors_input_structure() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_container(&input.path().join("doors/Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(
        &input.path().join("windows/deep/Window.rfa"),
        &entry_xml("Window", "urn:2"),
    );

    let summary = service(ExtractOptions {
        recursive: true,
        output_root: Some(output.path().to_path_buf()),
        ..ExtractOptions::default()
    })
    .run(input.path())
    .unwrap();
    assert_eq!(summary.succeeded, 2);

    assert!(output.path().join("doors/Door.json").exists());
    assert!(output.path().join("windows/deep/Window.json").exists());
    assert!(list_outputs(input.path()).is_empty(), "input tree stays clean");
}

#[test]
fn non_recursive_walk_ignores_subdirectories() {
    let temp = TempDir::new().unwrap();
    write_container(&temp.path().join("Door.rfa"), &entry_xml("Door", "urn:1"));
    write_container(&temp.path().join("nested/Window.rfa"), &entry_xml("Window", "urn:2"));

    let flat = service(ExtractOptions::default()).run(temp.path()).unwrap();
    assert_eq!(flat.succeeded, 1);

    // Clean up so the recursive pass is not skipped by existing outputs.
    std::fs::remove_file(temp.path().join("Door.json")).unwrap();

    let deep = service(ExtractOptions {
        recursive: true,
        ..ExtractOptions::default()
    })
    .run(temp.path())
    .unwrap();
    assert_eq!(deep.succeeded, 2);
}

#[test]
fn single_file_input_is_processed_directly() {
    let temp = TempDir::new().unwrap();
    let container = temp.path().join("Door.rfa");
    write_container(&container, &entry_xml("Door", "urn:1"));

    let summary = service(ExtractOptions::default()).run(&container).unwrap();
    assert_eq!(summary.succeeded, 1);
    assert!(temp.path().join("Door.json").exists());
}

#[test]
fn drift_order_is_stable_across_runs() {
    let temp = TempDir::new().unwrap();
    let xml = r#"<entry xmlns:A="urn:schemas-autodesk-com:partatom">
  <title>T</title><id>urn:uuid:7</id>
  <futureBlock>x</futureBlock>
  <A:features><A:feature><A:group>
    <A:title>G</A:title>
    <A1 type="shared">1</A1>
    <A2 type="custom" typeOfParameter="Luminance">2</A2>
  </A:group></A:feature></A:features>
</entry>"#;
    write_container(&temp.path().join("A.rfa"), xml);

    let run = |dir: &Path| {
        service(ExtractOptions {
            dry_run: true,
            ..ExtractOptions::default()
        })
        .run(dir)
        .unwrap()
    };
    let first: Vec<String> = run(temp.path())
        .drift
        .into_iter()
        .map(|d| d.description)
        .collect();
    let second: Vec<String> = run(temp.path())
        .drift
        .into_iter()
        .map(|d| d.description)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 3);
    assert!(first[0].contains("futureBlock"));
    assert!(first[1].contains("shared"));
    assert!(first[2].contains("Luminance"));
}
