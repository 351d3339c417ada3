//! KDL schema for the settings store.
//!
//! # KDL Schema
//!
//! ```kdl
//! server "deploy" {
//!     username "admin"
//!     password "${env.DEPLOY_PASSWORD}"
//!     passphrase "quiet"
//!     private-key "${env.KEY_PATH}"
//!     file-permissions "664"
//!     directory-permissions "775"
//!
//!     // Optional free-form tree; leaves flatten to dotted property keys.
//!     configuration {
//!         proxy {
//!             host "proxy.internal"
//!             port "8080"
//!         }
//!         timeout "30"
//!     }
//! }
//! ```
//!
//! Field nodes use kebab-case; the camelCase wire names (`privateKey`, ...)
//! appear only in property keys. Unknown field nodes are rejected so typos in
//! a credentials file fail loudly.

use kdl::{KdlDocument, KdlNode, KdlValue};

use crate::models::{ConfigNode, NodeKind, ServerRecord};
use crate::{Error, Result};

/// Parse all `server` blocks from a settings document.
///
/// Duplicate server ids are rejected.
pub fn servers_from_kdl(doc: &KdlDocument) -> Result<Vec<ServerRecord>> {
    let mut servers: Vec<ServerRecord> = Vec::new();
    for node in doc.nodes() {
        if node.name().value() != "server" {
            return Err(Error::Settings(format!(
                "unexpected top-level node '{}' (expected 'server')",
                node.name().value()
            )));
        }
        let server = server_from_node(node)?;
        if servers.iter().any(|s| s.id == server.id) {
            return Err(Error::Settings(format!(
                "duplicate server id '{}'",
                server.id
            )));
        }
        servers.push(server);
    }
    Ok(servers)
}

fn server_from_node(node: &KdlNode) -> Result<ServerRecord> {
    let id = node
        .entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| Error::Settings("server node is missing its id argument".to_string()))?;
    if id.is_empty() {
        return Err(Error::Settings("server id must not be empty".to_string()));
    }

    let mut server = ServerRecord::new(id);
    if let Some(children) = node.children() {
        for child in children.nodes() {
            let name = child.name().value();
            match name {
                "username" => server.username = Some(string_arg(child)?),
                "password" => server.password = Some(string_arg(child)?),
                "passphrase" => server.passphrase = Some(string_arg(child)?),
                "private-key" => server.private_key = Some(string_arg(child)?),
                "file-permissions" => server.file_permissions = Some(string_arg(child)?),
                "directory-permissions" => server.directory_permissions = Some(string_arg(child)?),
                "configuration" => {
                    server.configuration = configuration_from_node(child, id)?;
                }
                other => {
                    return Err(Error::Settings(format!(
                        "unknown field '{}' on server '{}'",
                        other, id
                    )));
                }
            }
        }
    }
    Ok(server)
}

/// The `configuration` block's children become the top level of the tree.
fn configuration_from_node(node: &KdlNode, server_id: &str) -> Result<Vec<ConfigNode>> {
    let Some(children) = node.children() else {
        return Ok(Vec::new());
    };
    children
        .nodes()
        .iter()
        .map(|child| config_node_from_kdl(child, server_id))
        .collect()
}

fn config_node_from_kdl(node: &KdlNode, server_id: &str) -> Result<ConfigNode> {
    let name = node.name().value().to_string();
    if let Some(children) = node.children() {
        let children = children
            .nodes()
            .iter()
            .map(|child| config_node_from_kdl(child, server_id))
            .collect::<Result<Vec<_>>>()?;
        return Ok(ConfigNode {
            name,
            kind: NodeKind::Internal { children },
        });
    }
    let value = match node.entries().first() {
        Some(entry) => Some(value_to_string(entry.value()).ok_or_else(|| {
            Error::Settings(format!(
                "configuration node '{}' on server '{}' has a non-scalar value",
                name, server_id
            ))
        })?),
        None => None,
    };
    Ok(ConfigNode {
        name,
        kind: NodeKind::Leaf { value },
    })
}

fn string_arg(node: &KdlNode) -> Result<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::Settings(format!(
                "field '{}' requires a string argument",
                node.name().value()
            ))
        })
}

/// Scalar KDL values are accepted for configuration leaves and stringified;
/// known fields stay strictly strings.
fn value_to_string(value: &KdlValue) -> Option<String> {
    if let Some(s) = value.as_string() {
        return Some(s.to_string());
    }
    if let Some(i) = value.as_integer() {
        return Some(i.to_string());
    }
    if let Some(b) = value.as_bool() {
        return Some(b.to_string());
    }
    None
}
