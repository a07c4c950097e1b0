//! Qualified-name derivation
//!
//! A qualified name is a `/`-delimited natural key describing where an asset
//! sits in the catalog hierarchy: tenant, connector, connection epoch, then
//! each parent container, then the asset itself. Nothing here validates its
//! inputs; malformed names flow through unchanged and are rejected by the
//! catalog on write.

use chrono::Utc;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Separator between qualified-name segments
pub const SEPARATOR: char = '/';

/// Tenant prefix for every connection qualified name
pub const DEFAULT_TENANT: &str = "default";

/// How a child's display name is turned into its qualified-name segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingRule {
    /// Use the name as given
    Verbatim,
    /// Lowercase and collapse non-alphanumeric runs to `-`
    Slug,
}

impl NamingRule {
    /// Normalize a display name according to this rule
    pub fn normalize(&self, name: &str) -> String {
        match self {
            NamingRule::Verbatim => name.to_string(),
            NamingRule::Slug => slugify(name),
        }
    }
}

impl Default for NamingRule {
    fn default() -> Self {
        NamingRule::Verbatim
    }
}

impl fmt::Display for NamingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingRule::Verbatim => write!(f, "verbatim"),
            NamingRule::Slug => write!(f, "slug"),
        }
    }
}

fn slug_separator() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug separator pattern is valid"))
}

/// Slugify a display name: lowercase, with every run of characters outside
/// `[a-z0-9]` replaced by a single `-`, and no leading or trailing `-`.
///
/// Non-ASCII letters are not transliterated; they are dropped like any other
/// separator. `"ÜBER-Kategorie"` becomes `"ber-kategorie"`, so names that
/// differ only in such letters collide.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    slug_separator()
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Derive a child's qualified name from its parent: `parent/child`
pub fn generate_qualified_name(child_name: &str, parent_qualified_name: &str) -> String {
    format!("{}{}{}", parent_qualified_name, SEPARATOR, child_name)
}

/// Derive a child's qualified name using a specific naming rule
pub fn generate_for(rule: NamingRule, child_name: &str, parent_qualified_name: &str) -> String {
    generate_qualified_name(&rule.normalize(child_name), parent_qualified_name)
}

/// Qualified name for a new connection: `default/<connector>/<epoch_seconds>`
pub fn generate_connection_qualified_name(connector: &str, epoch_seconds: i64) -> String {
    format!(
        "{}{sep}{}{sep}{}",
        DEFAULT_TENANT,
        connector,
        epoch_seconds,
        sep = SEPARATOR
    )
}

/// Qualified name for a new connection stamped with the current UTC time
pub fn connection_qualified_name_now(connector: &str) -> String {
    generate_connection_qualified_name(connector, Utc::now().timestamp())
}

/// Extract the connection qualified name (first three segments) from any
/// asset's qualified name
pub fn connection_qualified_name_of(qualified_name: &str) -> Option<String> {
    let segments: Vec<&str> = qualified_name.splitn(4, SEPARATOR).collect();
    if segments.len() < 3 || segments.iter().take(3).any(|s| s.is_empty()) {
        return None;
    }
    Some(segments[..3].join("/"))
}

/// Extract the connector name (second segment) from a qualified name
pub fn connector_of(qualified_name: &str) -> Option<&str> {
    qualified_name
        .split(SEPARATOR)
        .nth(1)
        .filter(|segment| !segment.is_empty())
}

/// Everything before the last separator, if there is one
pub fn parent_qualified_name_of(qualified_name: &str) -> Option<&str> {
    qualified_name
        .rfind(SEPARATOR)
        .map(|idx| &qualified_name[..idx])
}
