//! The family record tree: one record per extracted container file.
//!
//! A record exclusively owns everything below it. There is no sharing and
//! no identity beyond the extraction run that produced it; serialization
//! order matches declaration order so emitted JSON is stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::param::Parameter;

/// One extracted family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyRecord {
    pub title: String,
    pub id: String,
    pub updated: DateTime<Utc>,
    /// Vendor classification strings, e.g. "adsk:revit:family".
    #[serde(default)]
    pub taxonomies: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub family: Family,
}

impl FamilyRecord {
    /// Identity presence is the only fatal condition in an otherwise
    /// tolerant extraction.
    pub fn has_identity(&self) -> bool {
        !self.title.trim().is_empty() && !self.id.trim().is_empty()
    }

    /// Total parameter count across features and variant parts.
    pub fn parameter_count(&self) -> usize {
        let in_features: usize = self.features.iter().map(|f| f.parameters.len()).sum();
        let in_parts: usize = self
            .family
            .variants
            .iter()
            .flat_map(|v| v.parts.iter())
            .map(|p| p.parameters.len())
            .sum();
        in_features + in_parts
    }
}

/// A named parameter group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub name: String,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// Reference to a related design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    #[serde(default)]
    pub rel: String,
    #[serde(default)]
    pub kind: String,
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_file: Option<DesignFile>,
}

/// Detail block some links carry about the file they point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignFile {
    pub name: String,
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub product_version: String,
    pub updated: DateTime<Utc>,
}

/// The variant block of a family.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A named variation of the family, owning its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub name: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// One part of a variant. Parameters have the same shape as a feature's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}
