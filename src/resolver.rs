//! Precedence resolution for server records.
//!
//! This module is the heart of the crate: once per build session it walks
//! every server record, resolves each field, and accumulates the results into
//! a flat [`PropertyTable`].
//!
//! ## Value precedence (highest to lowest)
//!
//! 1. User-supplied override (by canonical key, then legacy alias)
//! 2. Value stored on the record
//!
//! The winning value is then passed through the expression evaluator exactly
//! once before being written back onto the record and into the table.
//!
//! ## Key layout
//!
//! - Known fields: `settings.servers.<id>.<field>`, plus the legacy alias
//!   `settings.servers.server.<id>.<field>`. Both keys receive the resolved
//!   value.
//! - Custom configuration leaves: `settings.servers.<id>.<path...>` from the
//!   tree position, no alias.

use crate::eval::ExpressionEvaluator;
use crate::models::{ConfigNode, NodeKind, Overrides, PROPERTY_PREFIX, PropertyTable, ServerField, ServerRecord};
use crate::{Error, Result};

/// Resolves server records against session overrides and an expression
/// evaluator.
pub struct ServerPropertyResolver<'a> {
    overrides: &'a Overrides,
    evaluator: &'a dyn ExpressionEvaluator,
}

impl<'a> ServerPropertyResolver<'a> {
    pub fn new(overrides: &'a Overrides, evaluator: &'a dyn ExpressionEvaluator) -> Self {
        Self {
            overrides,
            evaluator,
        }
    }

    /// Resolve every record in place and build the property table.
    ///
    /// Aborts on the first evaluator failure with [`Error::Resolution`].
    /// Resolution is not atomic: records (and fields within the failing
    /// record) processed before the failure remain mutated. Retrying with
    /// unchanged input reproduces the same failure.
    pub fn resolve(&self, servers: &mut [ServerRecord]) -> Result<PropertyTable> {
        let mut table = PropertyTable::new();
        for server in servers.iter_mut() {
            self.resolve_server(server, &mut table)?;
        }
        Ok(table)
    }

    /// Known fields in declaration order, then the configuration tree
    /// depth-first.
    fn resolve_server(&self, server: &mut ServerRecord, table: &mut PropertyTable) -> Result<()> {
        let id = server.id.clone();
        for field in ServerField::ALL {
            let keys = field.keys(&id);
            // First alias found wins, canonical before legacy.
            let effective = keys
                .iter()
                .find_map(|key| self.overrides.get(key))
                .map(str::to_string)
                .or_else(|| field.get(server).map(str::to_string));
            let resolved = self.expand(effective, &keys[0], &id)?;
            field.set(server, resolved.clone());
            if let Some(value) = resolved {
                // Both canonical and legacy lookups see the same value.
                for key in keys {
                    table.insert(key, value.clone());
                }
            }
        }

        let prefix = format!("{}{}.", PROPERTY_PREFIX, id);
        for node in &mut server.configuration {
            self.resolve_node(node, &prefix, &id, table)?;
        }
        Ok(())
    }

    /// Depth-first walk of the custom-configuration tree. Internal nodes only
    /// extend the key prefix; leaves resolve like known fields but without
    /// legacy aliasing.
    fn resolve_node(
        &self,
        node: &mut ConfigNode,
        prefix: &str,
        server_id: &str,
        table: &mut PropertyTable,
    ) -> Result<()> {
        match &mut node.kind {
            NodeKind::Internal { children } => {
                let child_prefix = format!("{}{}.", prefix, node.name);
                for child in children {
                    self.resolve_node(child, &child_prefix, server_id, table)?;
                }
            }
            NodeKind::Leaf { value } => {
                let key = format!("{}{}", prefix, node.name);
                let effective = self
                    .overrides
                    .get(&key)
                    .map(str::to_string)
                    .or_else(|| value.clone());
                let resolved = self.expand(effective, &key, server_id)?;
                *value = resolved.clone();
                if let Some(resolved) = resolved {
                    table.insert(key, resolved);
                }
            }
        }
        Ok(())
    }

    /// One pass through the evaluator; absent values stay absent.
    fn expand(
        &self,
        value: Option<String>,
        key: &str,
        server_id: &str,
    ) -> Result<Option<String>> {
        match value {
            Some(value) => self
                .evaluator
                .evaluate(&value)
                .map(Some)
                .map_err(|e| {
                    Error::Resolution(format!("server '{}', key '{}': {}", server_id, key, e))
                }),
            None => Ok(None),
        }
    }
}
