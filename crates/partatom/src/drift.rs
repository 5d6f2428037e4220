//! Drift detection: what the vendor XML contains that the model does not.
//!
//! The reader records every tag and vocabulary value it walks past as an
//! [`Observation`]; [`detect`] judges those observations against a
//! [`KnownVocabulary`] and returns the ones the model has never seen.
//! Detection is a pure function: the vocabulary is configuration, not
//! state, and encountering new values never mutates it. The caller decides
//! whether to log, warn, or aggregate.

use std::collections::HashSet;
use std::fmt;

use partatom_schema::known::{KNOWN_ENTRY_TAGS, KNOWN_PARAM_KINDS, KNOWN_TYPE_OF_PARAMETERS};

/// One raw fact recorded while walking the XML, before any judgement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Observation {
    /// A top-level child tag of the entry element.
    EntryTag(String),
    /// A parameter binding kind attribute value.
    ParamKind(String),
    /// A `typeOfParameter` attribute value.
    ParamType(String),
}

/// Classification of a drift event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    UnknownElement,
    UnknownParameterKind,
    UnknownParameterType,
}

/// A single vocabulary value the model does not know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftEvent {
    pub kind: DriftKind,
    pub subject: String,
}

impl fmt::Display for DriftEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DriftKind::UnknownElement => write!(f, "unknown top-level element <{}>", self.subject),
            DriftKind::UnknownParameterKind => {
                write!(f, "unknown parameter kind '{}'", self.subject)
            }
            DriftKind::UnknownParameterType => {
                write!(f, "unknown typeOfParameter '{}'", self.subject)
            }
        }
    }
}

/// Drift found in a single file, deduplicated and ordered by first sighting.
#[derive(Debug, Clone, Default)]
pub struct DriftReport {
    pub events: Vec<DriftEvent>,
}

impl DriftReport {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn descriptions(&self) -> impl Iterator<Item = String> + '_ {
        self.events.iter().map(|e| e.to_string())
    }
}

/// The vocabulary drift is judged against.
///
/// Defaults to the known lists in `partatom_schema::known`; tests build
/// narrower ones.
#[derive(Debug, Clone)]
pub struct KnownVocabulary {
    entry_tags: HashSet<String>,
    param_kinds: HashSet<String>,
    param_types: HashSet<String>,
}

impl Default for KnownVocabulary {
    fn default() -> Self {
        Self::new(KNOWN_ENTRY_TAGS, KNOWN_PARAM_KINDS, KNOWN_TYPE_OF_PARAMETERS)
    }
}

impl KnownVocabulary {
    pub fn new(entry_tags: &[&str], param_kinds: &[&str], param_types: &[&str]) -> Self {
        let to_set = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            entry_tags: to_set(entry_tags),
            param_kinds: to_set(param_kinds),
            param_types: to_set(param_types),
        }
    }
}

/// Judge one file's observations against the vocabulary.
///
/// Returns unknown values only, deduplicated, in first-seen order.
pub fn detect(vocab: &KnownVocabulary, seen: &[Observation]) -> DriftReport {
    let mut reviewed: HashSet<&Observation> = HashSet::new();
    let mut events = Vec::new();

    for obs in seen {
        if !reviewed.insert(obs) {
            continue;
        }
        let event = match obs {
            Observation::EntryTag(tag) if !vocab.entry_tags.contains(tag) => Some(DriftEvent {
                kind: DriftKind::UnknownElement,
                subject: tag.clone(),
            }),
            Observation::ParamKind(kind) if !vocab.param_kinds.contains(kind) => Some(DriftEvent {
                kind: DriftKind::UnknownParameterKind,
                subject: kind.clone(),
            }),
            Observation::ParamType(tag) if !vocab.param_types.contains(tag) => Some(DriftEvent {
                kind: DriftKind::UnknownParameterType,
                subject: tag.clone(),
            }),
            _ => None,
        };
        if let Some(event) = event {
            events.push(event);
        }
    }

    DriftReport { events }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> KnownVocabulary {
        KnownVocabulary::new(&["title", "id"], &["custom"], &["Length"])
    }

    #[test]
    fn known_values_produce_no_drift() {
        let seen = vec![
            Observation::EntryTag("title".to_string()),
            Observation::ParamKind("custom".to_string()),
            Observation::ParamType("Length".to_string()),
        ];
        assert!(detect(&vocab(), &seen).is_empty());
    }

    #[test]
    fn unknown_values_are_classified() {
        let seen = vec![
            Observation::EntryTag("author".to_string()),
            Observation::ParamKind("shared".to_string()),
            Observation::ParamType("Luminance".to_string()),
        ];
        let report = detect(&vocab(), &seen);
        assert_eq!(report.len(), 3);
        assert_eq!(report.events[0].kind, DriftKind::UnknownElement);
        assert_eq!(report.events[1].kind, DriftKind::UnknownParameterKind);
        assert_eq!(report.events[2].kind, DriftKind::UnknownParameterType);
    }

    #[test]
    fn repeats_are_deduplicated_in_first_seen_order() {
        let seen = vec![
            Observation::ParamType("Luminance".to_string()),
            Observation::EntryTag("author".to_string()),
            Observation::ParamType("Luminance".to_string()),
            Observation::EntryTag("author".to_string()),
        ];
        let report = detect(&vocab(), &seen);
        assert_eq!(report.len(), 2);
        assert_eq!(report.events[0].subject, "Luminance");
        assert_eq!(report.events[1].subject, "author");
    }

    #[test]
    fn detection_never_mutates_the_vocabulary() {
        let vocab = vocab();
        let seen = vec![Observation::ParamType("Luminance".to_string())];
        assert_eq!(detect(&vocab, &seen).len(), 1);
        // A second pass over the same input reports the same drift.
        assert_eq!(detect(&vocab, &seen).len(), 1);
    }

    #[test]
    fn descriptions_are_human_readable() {
        let seen = vec![Observation::ParamKind("shared".to_string())];
        let report = detect(&vocab(), &seen);
        let descriptions: Vec<String> = report.descriptions().collect();
        assert_eq!(descriptions, vec!["unknown parameter kind 'shared'"]);
    }
}
