//! Embedded payload access.
//!
//! A family container is a deflate ZIP archive carrying exactly one
//! metadata payload at a fixed internal path. Anything that prevents
//! reaching that payload is a container-format failure for the file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;

use crate::error::{ExtractError, Result};

/// Internal archive path of the metadata payload.
pub const PAYLOAD_PATH: &str = "PartAtom.xml";

/// Read the embedded XML payload out of a container file.
pub fn read_payload(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|e| ExtractError::container_format(path, format!("cannot open: {}", e)))?;

    let mut archive = ZipArchive::new(file)
        .map_err(|e| ExtractError::container_format(path, format!("not an archive: {}", e)))?;

    let mut entry = archive.by_name(PAYLOAD_PATH).map_err(|e| {
        ExtractError::container_format(path, format!("embedded payload '{}' missing: {}", PAYLOAD_PATH, e))
    })?;

    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut raw)
        .map_err(|e| ExtractError::container_format(path, format!("payload unreadable: {}", e)))?;

    // Vendor exports are not reliably valid UTF-8; replace rather than fail.
    Ok(String::from_utf8_lossy(&raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_container(path: &Path, entry_name: &str, payload: &str) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        zip.start_file(entry_name, SimpleFileOptions::default())
            .unwrap();
        zip.write_all(payload.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn reads_payload_from_archive() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("door.rfa");
        write_container(&path, PAYLOAD_PATH, "<entry><title>T</title></entry>");

        let payload = read_payload(&path).unwrap();
        assert!(payload.contains("<title>T</title>"));
    }

    #[test]
    fn missing_file_is_container_format_error() {
        let temp = TempDir::new().unwrap();
        let err = read_payload(&temp.path().join("absent.rfa")).unwrap_err();
        assert_eq!(err.kind(), "container-format");
    }

    #[test]
    fn non_archive_is_container_format_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("door.rfa");
        std::fs::write(&path, b"plain bytes, no archive here").unwrap();

        let err = read_payload(&path).unwrap_err();
        assert_eq!(err.kind(), "container-format");
    }

    #[test]
    fn archive_without_payload_is_container_format_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("door.rfa");
        write_container(&path, "something_else.txt", "irrelevant");

        let err = read_payload(&path).unwrap_err();
        assert_eq!(err.kind(), "container-format");
        assert!(err.to_string().contains(PAYLOAD_PATH));
    }
}
