//! Flat equality filter over extracted records.
//!
//! Query strings have the shape `Namespace:field=value`, with namespaces
//! `Param`, `Cat`, `Family`, and `Group` (case-insensitive). This is a
//! deliberately small surface for ad-hoc filtering of already-extracted
//! JSON; anything richer belongs in a real query tool downstream.

use partatom_schema::{FamilyRecord, Parameter};

/// Filter namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Param,
    Cat,
    Family,
    Group,
}

/// A parsed `Namespace:field=value` filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub namespace: Namespace,
    pub field: String,
    pub value: String,
}

/// A parameter matched by a query, with the group or variant it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamMatch<'a> {
    pub scope: &'a str,
    pub parameter: &'a Parameter,
}

impl Query {
    /// Parse a query string. The error message spells out the expected
    /// shape, since these come straight from the command line.
    pub fn parse(raw: &str) -> Result<Self, String> {
        const USAGE: &str = "query format is 'Namespace:field=value', e.g. 'Param:name=Width'";

        let (namespace, condition) = raw.split_once(':').ok_or(USAGE)?;
        let (field, value) = condition.split_once('=').ok_or(USAGE)?;

        let namespace = match namespace.to_lowercase().as_str() {
            "param" => Namespace::Param,
            "cat" => Namespace::Cat,
            "family" => Namespace::Family,
            "group" => Namespace::Group,
            other => {
                return Err(format!(
                    "unknown namespace '{}'; supported: Param, Cat, Family, Group",
                    other
                ))
            }
        };

        if field.is_empty() {
            return Err(USAGE.to_string());
        }
        Ok(Self {
            namespace,
            field: field.to_string(),
            value: value.to_string(),
        })
    }

    /// Whether the record as a whole matches (Cat/Family namespaces; for
    /// Param/Group, whether any parameter matches).
    pub fn matches(&self, record: &FamilyRecord) -> bool {
        match self.namespace {
            Namespace::Cat => match self.field.as_str() {
                "name" => record.categories.iter().any(|c| c == &self.value),
                _ => false,
            },
            Namespace::Family => match self.field.as_str() {
                "title" | "name" => record.title == self.value,
                "id" => record.id == self.value,
                "variant" => record
                    .family
                    .variants
                    .iter()
                    .any(|v| v.name == self.value),
                _ => false,
            },
            Namespace::Param | Namespace::Group => !self.find_parameters(record).is_empty(),
        }
    }

    /// Parameters matched by a Param or Group query. Empty for the
    /// record-level namespaces.
    pub fn find_parameters<'a>(&self, record: &'a FamilyRecord) -> Vec<ParamMatch<'a>> {
        let mut hits = Vec::new();

        match self.namespace {
            Namespace::Param => {
                self.for_each_parameter(record, |scope, param| {
                    if self.param_field_matches(param) {
                        hits.push(ParamMatch { scope, parameter: param });
                    }
                });
            }
            Namespace::Group => {
                if self.field == "name" {
                    for feature in &record.features {
                        if feature.name == self.value {
                            for param in &feature.parameters {
                                hits.push(ParamMatch {
                                    scope: &feature.name,
                                    parameter: param,
                                });
                            }
                        }
                    }
                }
            }
            Namespace::Cat | Namespace::Family => {}
        }

        hits
    }

    fn for_each_parameter<'a>(
        &self,
        record: &'a FamilyRecord,
        mut visit: impl FnMut(&'a str, &'a Parameter),
    ) {
        for feature in &record.features {
            for param in &feature.parameters {
                visit(&feature.name, param);
            }
        }
        for variant in &record.family.variants {
            for part in &variant.parts {
                for param in &part.parameters {
                    visit(&variant.name, param);
                }
            }
        }
    }

    fn param_field_matches(&self, param: &Parameter) -> bool {
        match self.field.as_str() {
            "name" => param.name == self.value,
            "kind" => param.kind.as_str() == self.value,
            "value" => param.value == self.value,
            "unit" => param.unit.as_deref() == Some(self.value.as_str()),
            "typeOfParameter" | "type_of_parameter" => {
                param.type_of_parameter.as_deref() == Some(self.value.as_str())
            }
            _ => false,
        }
    }
}
