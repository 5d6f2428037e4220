//! Parameters and the vendor binding-kind vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a parameter is bound to the family, per the vendor schema.
///
/// Four values are defined today. Newer tool versions introduce values
/// without notice; those are carried verbatim in [`ParamKind::Other`] so the
/// parameter is never dropped. Drift reporting makes them visible to the
/// operator; extending the closed set is a deliberate code change.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ParamKind {
    System,
    Custom,
    Instance,
    Type,
    /// Vendor value outside the defined set, preserved verbatim.
    Other(String),
}

impl ParamKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::System => "system",
            Self::Custom => "custom",
            Self::Instance => "instance",
            Self::Type => "type",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this value belongs to the closed, model-defined set.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for ParamKind {
    fn from(raw: &str) -> Self {
        match raw {
            "system" => Self::System,
            "custom" => Self::Custom,
            "instance" => Self::Instance,
            "type" => Self::Type,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ParamKind {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<ParamKind> for String {
    fn from(kind: ParamKind) -> Self {
        kind.as_str().to_string()
    }
}

impl Default for ParamKind {
    // The vendor omits the attribute on user-defined parameters.
    fn default() -> Self {
        Self::Custom
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single vendor parameter with its raw, type-erased value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(default)]
    pub kind: ParamKind,
    /// Value text exactly as it appeared in the source. No coercion.
    #[serde(default)]
    pub value: String,
    /// Unit string, e.g. "mm". Omitted from JSON when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Vendor-defined semantic tag, e.g. "Length", "Material". Open-ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_of_parameter: Option<String>,
}
