//! Container reading and XML-to-model mapping.
//!
//! The policy here is tolerant-by-default, strict-on-identity: the walk
//! over the payload never fails on unknown tags or vocabulary values (those
//! become drift), and the single fatal parse condition is a record without
//! identity fields.

mod container;
pub mod xml;

use std::path::Path;

use tracing::debug;

use partatom_schema::FamilyRecord;

pub use container::PAYLOAD_PATH;

use crate::drift::{self, DriftReport, KnownVocabulary};
use crate::error::{ExtractError, Result};

/// Reads family records out of container files.
pub struct FamilyReader {
    vocabulary: KnownVocabulary,
}

impl FamilyReader {
    pub fn new() -> Self {
        Self {
            vocabulary: KnownVocabulary::default(),
        }
    }

    /// Use a non-default vocabulary (tests, forward-ported known sets).
    pub fn with_vocabulary(vocabulary: KnownVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Extract one record plus its drift report from a container file.
    pub fn extract(&self, path: &Path) -> Result<(FamilyRecord, DriftReport)> {
        let payload = container::read_payload(path)?;
        self.extract_from_payload(&payload, path)
    }

    /// Extract from an already-unpacked payload. `origin` is only used for
    /// error reporting.
    pub fn extract_from_payload(
        &self,
        payload: &str,
        origin: &Path,
    ) -> Result<(FamilyRecord, DriftReport)> {
        let root = xml::parse_tree(payload)
            .map_err(|reason| ExtractError::container_format(origin, reason))?;

        let (record, seen) = xml::map_entry(&root);
        if !record.has_identity() {
            return Err(ExtractError::EmptyRecord {
                path: origin.to_path_buf(),
            });
        }

        let report = drift::detect(&self.vocabulary, &seen);
        debug!(
            file = %origin.display(),
            parameters = record.parameter_count(),
            drift = report.len(),
            "extracted family record"
        );
        Ok((record, report))
    }
}

impl Default for FamilyReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_less_payload_is_empty_record() {
        let reader = FamilyReader::new();
        let payload = "<entry><category><term>Doors</term></category></entry>";
        let err = reader
            .extract_from_payload(payload, Path::new("x.rfa"))
            .unwrap_err();
        assert_eq!(err.kind(), "empty-record");
    }

    #[test]
    fn malformed_payload_is_container_format() {
        let reader = FamilyReader::new();
        let err = reader
            .extract_from_payload("<entry><title>", Path::new("x.rfa"))
            .unwrap_err();
        assert_eq!(err.kind(), "container-format");
    }

    #[test]
    fn drift_never_blocks_extraction() {
        let reader = FamilyReader::new();
        let payload = r#"<entry>
            <title>T</title><id>i</id>
            <seriesInfo>new vendor block</seriesInfo>
            <A:features xmlns:A="urn:x"><A:feature><A:group>
              <A:title>G</A:title>
              <Grade type="shared" typeOfParameter="Luminance">7</Grade>
            </A:group></A:feature></A:features>
        </entry>"#;

        let (record, report) = reader
            .extract_from_payload(payload, Path::new("x.rfa"))
            .unwrap();
        assert_eq!(record.features[0].parameters[0].value, "7");
        let descriptions: Vec<String> = report.descriptions().collect();
        assert_eq!(descriptions.len(), 3);
        assert!(descriptions[0].contains("seriesInfo"));
    }
}
