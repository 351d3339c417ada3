//! Build-session projects and the publish step.
//!
//! Resolution is a two-phase batch: the property table is built completely
//! first, then published once into every project of the session. Nothing is
//! visible to projects while the table is still being accumulated.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::PropertyTable;

/// One project participating in the build session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// The project's property namespace, addressable by dotted keys.
    pub properties: BTreeMap<String, String>,
}

impl Project {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }
}

/// Merge a finished property table into every project's property set.
///
/// Table entries overwrite existing project properties under the same key.
pub fn publish(table: &PropertyTable, projects: &mut [Project]) {
    for project in projects.iter_mut() {
        for (key, value) in table.iter() {
            project.properties.insert(key.to_string(), value.to_string());
        }
    }
}
