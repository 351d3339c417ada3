//! Core data models for servex.
//!
//! A [`ServerRecord`] is one named credential/connection entry from the
//! settings store. Its six known fields are described by the static
//! [`ServerField`] table, and its optional custom configuration is a tree of
//! [`ConfigNode`]s that flattens into dotted property keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Prefix of every property key produced by resolution.
pub const PROPERTY_PREFIX: &str = "settings.servers.";

/// Prefix of the legacy alias keys kept for backward compatibility.
pub const LEGACY_PROPERTY_PREFIX: &str = "settings.servers.server.";

/// A named server entry from the settings store.
///
/// All known fields are optional strings; absent fields stay absent through
/// resolution (the evaluator is never consulted for them). The record is
/// mutated in place when resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRecord {
    /// Unique server id, e.g. "deploy" or "nexus-releases".
    pub id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub passphrase: Option<String>,
    pub private_key: Option<String>,
    pub file_permissions: Option<String>,
    pub directory_permissions: Option<String>,
    /// Children of the optional custom-configuration tree.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub configuration: Vec<ConfigNode>,
}

impl ServerRecord {
    /// Create an empty record with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// The six known server fields, in declaration order.
///
/// This table replaces runtime method lookup with direct accessors: each
/// variant knows its property-key name and how to read/write its slot on a
/// [`ServerRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerField {
    Username,
    Password,
    Passphrase,
    PrivateKey,
    FilePermissions,
    DirectoryPermissions,
}

impl ServerField {
    /// All known fields, in the order they are resolved.
    pub const ALL: [ServerField; 6] = [
        ServerField::Username,
        ServerField::Password,
        ServerField::Passphrase,
        ServerField::PrivateKey,
        ServerField::FilePermissions,
        ServerField::DirectoryPermissions,
    ];

    /// Field name as it appears in property keys (camelCase wire form).
    pub fn name(&self) -> &'static str {
        match self {
            ServerField::Username => "username",
            ServerField::Password => "password",
            ServerField::Passphrase => "passphrase",
            ServerField::PrivateKey => "privateKey",
            ServerField::FilePermissions => "filePermissions",
            ServerField::DirectoryPermissions => "directoryPermissions",
        }
    }

    /// Whether this field holds a secret that should be masked in
    /// human-readable output.
    pub fn is_secret(&self) -> bool {
        matches!(self, ServerField::Password | ServerField::Passphrase)
    }

    /// Read the field's current value from a record.
    pub fn get<'a>(&self, server: &'a ServerRecord) -> Option<&'a str> {
        let slot = match self {
            ServerField::Username => &server.username,
            ServerField::Password => &server.password,
            ServerField::Passphrase => &server.passphrase,
            ServerField::PrivateKey => &server.private_key,
            ServerField::FilePermissions => &server.file_permissions,
            ServerField::DirectoryPermissions => &server.directory_permissions,
        };
        slot.as_deref()
    }

    /// Write the field's value back onto a record.
    pub fn set(&self, server: &mut ServerRecord, value: Option<String>) {
        let slot = match self {
            ServerField::Username => &mut server.username,
            ServerField::Password => &mut server.password,
            ServerField::Passphrase => &mut server.passphrase,
            ServerField::PrivateKey => &mut server.private_key,
            ServerField::FilePermissions => &mut server.file_permissions,
            ServerField::DirectoryPermissions => &mut server.directory_permissions,
        };
        *slot = value;
    }

    /// Property keys for this field on the given server, in alias-priority
    /// order: canonical key first, then the legacy alias.
    ///
    /// Legacy aliasing applies only to known fields, never to custom
    /// configuration leaves (intentional asymmetry, kept for backward
    /// compatibility).
    pub fn keys(&self, server_id: &str) -> [String; 2] {
        [
            format!("{}{}.{}", PROPERTY_PREFIX, server_id, self.name()),
            format!("{}{}.{}", LEGACY_PROPERTY_PREFIX, server_id, self.name()),
        ]
    }
}

/// One node of a server's custom-configuration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    /// Node name; contributes one segment to the dotted key path.
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Leaf nodes carry an optional value; internal nodes carry ordered children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Leaf { value: Option<String> },
    Internal { children: Vec<ConfigNode> },
}

impl ConfigNode {
    /// Create a leaf node.
    pub fn leaf(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Leaf {
                value: Some(value.into()),
            },
        }
    }

    /// Create an internal node with the given children.
    pub fn internal(name: impl Into<String>, children: Vec<ConfigNode>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Internal { children },
        }
    }
}

/// Session-scoped user-supplied property overrides, keyed by fully-qualified
/// dotted key. Read-only during resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides(BTreeMap<String, String>);

impl Overrides {
    /// Create an empty override map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an override by exact key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Add an override (builder-style, for programmatic construction).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Parse `-D` style definitions (`key=value`; a bare `key` means "true").
    pub fn from_defines<I, S>(defines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = BTreeMap::new();
        for define in defines {
            let define = define.as_ref();
            match define.split_once('=') {
                Some((key, value)) => map.insert(key.to_string(), value.to_string()),
                None => map.insert(define.to_string(), "true".to_string()),
            };
        }
        Self(map)
    }

    /// Iterate over all overrides.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The flat key/value table built fresh by each resolution pass.
///
/// Keys collide only across servers sharing an id-qualified key, in which
/// case the last writer wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTable(BTreeMap<String, String>);

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved value. Last writer wins on collision.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
