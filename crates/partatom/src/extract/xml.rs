//! Generic attributed XML tree and the tolerant walk onto the model.
//!
//! The payload is parsed into [`XmlNode`]s with namespace prefixes stripped
//! to local names, then walked twice in spirit: a non-failing structural
//! pass that maps whatever it recognizes and records an [`Observation`] for
//! every tag and vocabulary value it sees, and a separate identity check in
//! the caller that is the only source of fatal parse errors.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use partatom_schema::{
    DesignFile, Family, FamilyRecord, Feature, Link, ParamKind, Parameter, Part, Variant,
};

use crate::drift::Observation;

/// One element of the parsed payload.
#[derive(Debug, Default)]
pub struct XmlNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children.iter().filter(move |c| c.name == name)
    }

    fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.trim())
    }
}

/// Strip a namespace prefix: "A:family" becomes "family".
fn local_name(raw: &str) -> &str {
    raw.rsplit(':').next().unwrap_or(raw)
}

fn node_from_start(start: &BytesStart<'_>) -> Result<XmlNode, String> {
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = XmlNode {
        name: local_name(&raw_name).to_string(),
        ..XmlNode::default()
    };
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| e.to_string())?
            .into_owned();
        node.attrs.push((local_name(&key).to_string(), value));
    }
    Ok(node)
}

/// Parse the payload into a tree rooted at its first element.
pub fn parse_tree(xml: &str) -> Result<XmlNode, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(start) => stack.push(node_from_start(&start)?),
            Event::Empty(start) => {
                let node = node_from_start(&start)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&text.unescape().map_err(|e| e.to_string())?);
                }
            }
            Event::CData(data) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let node = stack.pop().ok_or("unbalanced element close")?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err("unclosed element at end of payload".to_string());
    }
    root.ok_or_else(|| "payload contains no root element".to_string())
}

fn attach(
    stack: &mut [XmlNode],
    root: &mut Option<XmlNode>,
    node: XmlNode,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else if root.is_none() {
        *root = Some(node);
    } else {
        return Err("payload contains multiple root elements".to_string());
    }
    Ok(())
}

/// Map the entry tree onto a record, recording every observation on the way.
///
/// Never fails: unknown tags and vocabulary values become observations, and
/// missing non-identity fields fall back to defaults.
pub fn map_entry(root: &XmlNode) -> (FamilyRecord, Vec<Observation>) {
    let mut seen = Vec::new();
    let mut record = FamilyRecord {
        title: String::new(),
        id: String::new(),
        updated: Utc::now(),
        taxonomies: Vec::new(),
        categories: Vec::new(),
        links: Vec::new(),
        features: Vec::new(),
        family: Family::default(),
    };

    for child in &root.children {
        seen.push(Observation::EntryTag(child.name.clone()));
        match child.name.as_str() {
            "title" => record.title = child.text.trim().to_string(),
            "id" => record.id = child.text.trim().to_string(),
            "updated" => {
                if let Some(updated) = parse_timestamp(child.text.trim()) {
                    record.updated = updated;
                }
            }
            "taxonomy" => {
                if let Some(term) = child.child_text("term") {
                    record.taxonomies.push(term.to_string());
                }
            }
            "category" => {
                if let Some(term) = child.child_text("term") {
                    record.categories.push(term.to_string());
                }
            }
            "link" => record.links.push(map_link(child)),
            "features" => map_features(child, &mut record.features, &mut seen),
            "family" => record.family = map_family(child, &mut seen),
            _ => {}
        }
    }

    (record, seen)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn map_link(elem: &XmlNode) -> Link {
    Link {
        rel: elem.attr("rel").unwrap_or_default().to_string(),
        kind: elem.attr("type").unwrap_or_default().to_string(),
        href: elem.attr("href").unwrap_or_default().to_string(),
        design_file: elem.child("design-file").map(map_design_file),
    }
}

fn map_design_file(elem: &XmlNode) -> DesignFile {
    DesignFile {
        name: elem.child_text("title").unwrap_or_default().to_string(),
        product: elem.child_text("product").unwrap_or_default().to_string(),
        product_version: elem
            .child_text("product-version")
            .unwrap_or_default()
            .to_string(),
        updated: elem
            .child_text("updated")
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now),
    }
}

/// Each titled group becomes one feature; an untitled group inherits the
/// surrounding feature's title.
fn map_features(elem: &XmlNode, features: &mut Vec<Feature>, seen: &mut Vec<Observation>) {
    for feature_elem in elem.children_named("feature") {
        let feature_title = feature_elem.child_text("title").unwrap_or_default();
        for group_elem in feature_elem.children_named("group") {
            let name = group_elem
                .child_text("title")
                .filter(|t| !t.is_empty())
                .unwrap_or(feature_title)
                .to_string();
            features.push(Feature {
                name,
                parameters: map_parameters(group_elem, seen),
            });
        }
    }
}

fn map_family(elem: &XmlNode, seen: &mut Vec<Observation>) -> Family {
    let variants = elem
        .children_named("part")
        .map(|part_elem| Variant {
            name: part_elem.child_text("title").unwrap_or_default().to_string(),
            parts: vec![Part {
                parameters: map_parameters(part_elem, seen),
            }],
        })
        .collect();
    Family { variants }
}

/// Every non-title child of a group or part element is a parameter.
fn map_parameters(elem: &XmlNode, seen: &mut Vec<Observation>) -> Vec<Parameter> {
    elem.children
        .iter()
        .filter(|c| c.name != "title" && c.name != "variationCount")
        .map(|c| map_parameter(c, seen))
        .collect()
}

fn map_parameter(elem: &XmlNode, seen: &mut Vec<Observation>) -> Parameter {
    let raw_kind = elem.attr("type").unwrap_or("custom");
    seen.push(Observation::ParamKind(raw_kind.to_string()));

    let type_of_parameter = elem.attr("typeOfParameter").map(|t| t.to_string());
    if let Some(tag) = &type_of_parameter {
        seen.push(Observation::ParamType(tag.clone()));
    }

    Parameter {
        name: elem.name.clone(),
        kind: ParamKind::from(raw_kind),
        value: elem.text.trim().to_string(),
        unit: elem.attr("units").map(|u| u.to_string()),
        type_of_parameter,
    }
}
