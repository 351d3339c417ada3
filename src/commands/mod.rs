//! Command implementations for the servex CLI.
//!
//! Each command returns a serializable output struct; `main` decides whether
//! to print it as JSON (default) or human-readable text (`-H`).

use std::path::PathBuf;

use serde::Serialize;

use crate::config;
use crate::eval::SessionEvaluator;
use crate::models::{ConfigNode, NodeKind, Overrides, PropertyTable, ServerField, ServerRecord};
use crate::resolver::ServerPropertyResolver;
use crate::{Error, Result};

/// Command results that can be printed as JSON or formatted for humans.
pub trait Output: Serialize {
    /// Format for human-readable output.
    fn to_human(&self) -> String;

    /// Serialize to JSON string.
    fn to_json(&self) -> String {
        serde_json::to_string_pretty(self)
            .unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
    }
}

/// Mask a secret for display: first and last four characters of long values,
/// a bare prefix for short ones. Counts characters, not bytes; secrets are
/// not guaranteed to be ASCII.
fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    let prefix: String = value.chars().take(4).collect();
    if count <= 12 {
        format!("{}...", prefix)
    } else {
        let suffix: String = value.chars().skip(count - 4).collect();
        format!("{}...{}", prefix, suffix)
    }
}

/// Secret-bearing property keys are recognized by their final segment.
fn is_secret_key(key: &str) -> bool {
    matches!(key.rsplit('.').next(), Some("password") | Some("passphrase"))
}

/// Result of `svx resolve`.
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    /// Settings file the records came from.
    pub settings: PathBuf,
    /// Ids of the servers that were resolved, in settings order.
    pub servers: Vec<String>,
    /// The flat property table.
    pub properties: PropertyTable,
    #[serde(skip)]
    show_secrets: bool,
}

impl Output for ResolveOutput {
    fn to_human(&self) -> String {
        let mut out = format!(
            "Resolved {} properties from {} server(s) ({})\n",
            self.properties.len(),
            self.servers.len(),
            self.settings.display()
        );
        for (key, value) in self.properties.iter() {
            if !self.show_secrets && is_secret_key(key) {
                out.push_str(&format!("  {} = {}\n", key, mask_secret(value)));
            } else {
                out.push_str(&format!("  {} = {}\n", key, value));
            }
        }
        out.trim_end().to_string()
    }
}

/// Load settings, resolve every server, and build the property table.
///
/// The `-D` definitions serve double duty, exactly as user properties do in
/// the original build tool: they override stored fields by dotted key and
/// they seed the `${...}` expansion context.
pub fn resolve(
    settings: Option<PathBuf>,
    defines: &[String],
    show_secrets: bool,
) -> Result<ResolveOutput> {
    let path = config::resolve_settings_path(settings)?;
    let mut servers = config::load_settings(&path)?;

    let overrides = Overrides::from_defines(defines);
    let evaluator = SessionEvaluator::with_properties(overrides.iter());
    let resolver = ServerPropertyResolver::new(&overrides, &evaluator);
    let properties = resolver.resolve(&mut servers)?;

    Ok(ResolveOutput {
        settings: path,
        servers: servers.into_iter().map(|s| s.id).collect(),
        properties,
        show_secrets,
    })
}

/// One row of `svx servers list`.
#[derive(Debug, Serialize)]
pub struct ServerSummary {
    pub id: String,
    /// Known fields that carry a value, in declaration order.
    pub fields: Vec<&'static str>,
    /// Number of custom configuration leaves.
    pub configuration_leaves: usize,
}

/// Result of `svx servers list`.
#[derive(Debug, Serialize)]
pub struct ServersListOutput {
    pub settings: PathBuf,
    pub servers: Vec<ServerSummary>,
}

impl Output for ServersListOutput {
    fn to_human(&self) -> String {
        if self.servers.is_empty() {
            return format!("No servers in {}", self.settings.display());
        }
        let mut out = String::new();
        for server in &self.servers {
            out.push_str(&format!(
                "{}: {} [{} configuration leaves]\n",
                server.id,
                if server.fields.is_empty() {
                    "(no fields)".to_string()
                } else {
                    server.fields.join(", ")
                },
                server.configuration_leaves
            ));
        }
        out.trim_end().to_string()
    }
}

fn count_leaves(nodes: &[ConfigNode]) -> usize {
    nodes
        .iter()
        .map(|node| match &node.kind {
            NodeKind::Leaf { .. } => 1,
            NodeKind::Internal { children } => count_leaves(children),
        })
        .sum()
}

/// List server ids with a presence summary of their known fields.
pub fn servers_list(settings: Option<PathBuf>) -> Result<ServersListOutput> {
    let path = config::resolve_settings_path(settings)?;
    let servers = config::load_settings(&path)?;
    let summaries = servers
        .iter()
        .map(|server| ServerSummary {
            id: server.id.clone(),
            fields: ServerField::ALL
                .iter()
                .filter(|field| field.get(server).is_some())
                .map(|field| field.name())
                .collect(),
            configuration_leaves: count_leaves(&server.configuration),
        })
        .collect();
    Ok(ServersListOutput {
        settings: path,
        servers: summaries,
    })
}

/// Result of `svx servers show`.
#[derive(Debug, Serialize)]
pub struct ServerShowOutput {
    pub server: ServerRecord,
    #[serde(skip)]
    show_secrets: bool,
}

impl Output for ServerShowOutput {
    fn to_human(&self) -> String {
        let mut out = format!("server {}\n", self.server.id);
        for field in ServerField::ALL {
            if let Some(value) = field.get(&self.server) {
                if field.is_secret() && !self.show_secrets {
                    out.push_str(&format!("  {} = {}\n", field.name(), mask_secret(value)));
                } else {
                    out.push_str(&format!("  {} = {}\n", field.name(), value));
                }
            }
        }
        let leaves = count_leaves(&self.server.configuration);
        if leaves > 0 {
            out.push_str(&format!("  configuration: {} leaves\n", leaves));
        }
        out.trim_end().to_string()
    }
}

/// Show a single server record by id.
pub fn servers_show(
    settings: Option<PathBuf>,
    id: &str,
    show_secrets: bool,
) -> Result<ServerShowOutput> {
    let path = config::resolve_settings_path(settings)?;
    let servers = config::load_settings(&path)?;
    let server = servers
        .into_iter()
        .find(|server| server.id == id)
        .ok_or_else(|| Error::ServerNotFound(id.to_string()))?;
    Ok(ServerShowOutput {
        server,
        show_secrets,
    })
}
