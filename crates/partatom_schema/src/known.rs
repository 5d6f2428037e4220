//! Append-only known-vocabulary configuration for drift detection.
//!
//! These lists describe what the model currently understands. Encountering a
//! value outside them never fails extraction; it surfaces as drift so an
//! operator can decide when to extend the model. The lists are compile-time
//! constants on purpose: runtime self-extension would defeat the point of
//! drift visibility.

/// Top-level entry tags the reader maps. Anything else is drift.
pub const KNOWN_ENTRY_TAGS: &[&str] = &[
    "title",
    "id",
    "updated",
    "taxonomy",
    "category",
    "link",
    "features",
    "family",
];

/// Parameter binding kinds fixed at model-definition time.
pub const KNOWN_PARAM_KINDS: &[&str] = &["system", "custom", "instance", "type"];

/// `typeOfParameter` tags observed so far. The vendor localizes these, so
/// German and English variants both appear.
pub const KNOWN_TYPE_OF_PARAMETERS: &[&str] = &[
    "Ja/Nein",
    "Yes/No",
    "Länge",
    "Length",
    "Material",
    "Text",
    "Zahl",
    "Number",
    "Winkel",
    "Angle",
    "Volumen",
    "Volume",
    "Fläche",
    "Area",
    "Kraft",
    "Force",
    "Moment",
    "Währung",
    "Currency",
    "Masse",
    "Mass",
    "Massendichte",
    "Mass Density",
    "URL",
    "Bild",
    "Image",
    "Multiline Text",
    "Familie-Typ",
    "Family Type",
    "Integer",
    "Nummer",
    "Slope",
    "Speed",
    "Acceleration",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closed_kind_set_matches_model() {
        assert_eq!(KNOWN_PARAM_KINDS, &["system", "custom", "instance", "type"]);
    }

    #[test]
    fn entry_tags_cover_identity_fields() {
        for tag in ["title", "id", "updated"] {
            assert!(KNOWN_ENTRY_TAGS.contains(&tag));
        }
    }
}
