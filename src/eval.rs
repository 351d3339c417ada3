//! Expression evaluation seam.
//!
//! The resolver does not implement the placeholder-expression language
//! itself; it hands every value to an [`ExpressionEvaluator`] exactly once.
//! Two implementations ship with the crate: [`IdentityEvaluator`] for callers
//! that want no expansion, and [`SessionEvaluator`] which expands `${...}`
//! placeholders against session properties and the process environment.

use std::collections::BTreeMap;

/// Error raised by an evaluator implementation.
///
/// The shipped evaluators never fail (unknown placeholders are left intact),
/// but the seam allows richer evaluators to signal problems, which the
/// resolver turns into a batch abort.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct EvalError {
    message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Expands embedded placeholders in a string.
pub trait ExpressionEvaluator {
    /// Expand placeholders in `expr`. Returns the input unchanged when it
    /// contains none.
    fn evaluate(&self, expr: &str) -> Result<String, EvalError>;
}

/// Evaluator that performs no expansion at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityEvaluator;

impl ExpressionEvaluator for IdentityEvaluator {
    fn evaluate(&self, expr: &str) -> Result<String, EvalError> {
        Ok(expr.to_string())
    }
}

/// Evaluator backed by session properties and the process environment.
///
/// `${key}` is looked up in the session property map first; `${env.VAR}`
/// falls through to the process environment when not shadowed by a property.
/// Unknown placeholders (and malformed ones, e.g. an unterminated `${`) are
/// left in place, matching the original build-tool behavior.
#[derive(Debug, Clone, Default)]
pub struct SessionEvaluator {
    properties: BTreeMap<String, String>,
}

impl SessionEvaluator {
    /// Create an evaluator with no session properties (only `env.*` resolves).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator seeded from key/value pairs, typically the
    /// session's user-supplied properties.
    pub fn with_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add a session property (builder-style).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    fn lookup(&self, key: &str) -> Option<String> {
        if let Some(value) = self.properties.get(key) {
            return Some(value.clone());
        }
        if let Some(var) = key.strip_prefix("env.") {
            return std::env::var(var).ok();
        }
        None
    }
}

impl ExpressionEvaluator for SessionEvaluator {
    fn evaluate(&self, expr: &str) -> Result<String, EvalError> {
        // Single left-to-right pass; substituted values are not re-scanned.
        let mut out = String::with_capacity(expr.len());
        let mut rest = expr;
        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            match after.find('}') {
                Some(end) => {
                    let key = &after[..end];
                    match self.lookup(key) {
                        Some(value) => out.push_str(&value),
                        None => {
                            // Unknown placeholder stays as written.
                            out.push_str(&rest[start..start + 2 + end + 1]);
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    // Unterminated placeholder; keep the tail verbatim.
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}
