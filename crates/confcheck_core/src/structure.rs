//! Structural metadata extraction for pipeline documents.
//!
//! Pipeline documents name their units of work under a top-level `jobs`
//! mapping and their unconditioned triggers under the boolean `true` key
//! (the YAML 1.1 reading of `on:`).

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::info;

use crate::document::{Key, Node};

/// A named unit of work ("job") and the line markers attributed to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructuralUnit {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
}

impl StructuralUnit {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Run-scoped metadata captured from a pipeline document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub workflow_name: Option<String>,
    pub jobs: Vec<StructuralUnit>,
    pub triggers: BTreeSet<String>,
}

impl RunMetadata {
    /// Extracts the display name, jobs and triggers of a pipeline document.
    pub fn from_document(document: &Node) -> Self {
        Self {
            workflow_name: document.get("name").and_then(Node::as_str).map(String::from),
            jobs: extract_jobs(document),
            triggers: extract_triggers(document),
        }
    }
}

/// Collects the trigger names under the top-level `true` key.
///
/// A missing key yields an empty set. A trigger value that is not a
/// mapping (e.g. `on: push`) cannot be enumerated and also degrades to an
/// empty set.
pub fn extract_triggers(document: &Node) -> BTreeSet<String> {
    let Some(root) = document.as_mapping() else {
        return BTreeSet::new();
    };
    let Some(triggers) = root.get(&Key::Bool(true)) else {
        return BTreeSet::new();
    };

    match triggers.as_mapping() {
        Some(map) => map
            .keys()
            .filter(|k| !k.is_line_marker())
            .map(ToString::to_string)
            .collect(),
        None => {
            info!("Failed to derive triggers, definition is not a mapping: {:?}", triggers);
            BTreeSet::new()
        }
    }
}

/// Collects the named units under the top-level `jobs` key, in document order.
///
/// Line markers are interleaved siblings of the unit keys: a marker is
/// attributed to the most recently started unit. Units never nest at this
/// level, so a single cursor is enough. A marker that precedes every unit
/// key is ignored.
pub fn extract_jobs(document: &Node) -> Vec<StructuralUnit> {
    let Some(jobs) = document.get("jobs").and_then(Node::as_mapping) else {
        return Vec::new();
    };

    let mut units: Vec<StructuralUnit> = Vec::new();
    let mut current: Option<usize> = None;

    for (key, value) in jobs.iter() {
        match key {
            Key::StartLine | Key::EndLine => {
                let Some(unit) = current.and_then(|i| units.get_mut(i)) else {
                    continue;
                };
                let line = value.as_line();
                if *key == Key::StartLine {
                    unit.start_line = line;
                } else {
                    unit.end_line = line;
                }
            }
            _ => {
                let name = key.to_string();
                match units.iter().position(|u| u.name == name) {
                    Some(i) => {
                        units[i] = StructuralUnit::new(name);
                        current = Some(i);
                    }
                    None => {
                        units.push(StructuralUnit::new(name));
                        current = Some(units.len() - 1);
                    }
                }
            }
        }
    }

    units
}
