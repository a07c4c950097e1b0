//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::IdentityError;

/// How a relationship reference is merged into the target's existing
/// relationship collection when the owning asset is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaveSemantic {
    /// Replace the whole collection with the supplied references
    Replace,
    /// Add the reference, keeping existing ones
    Append,
    /// Remove the reference, keeping the others
    Remove,
}

impl Default for SaveSemantic {
    fn default() -> Self {
        Self::Replace
    }
}

impl fmt::Display for SaveSemantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "REPLACE"),
            Self::Append => write!(f, "APPEND"),
            Self::Remove => write!(f, "REMOVE"),
        }
    }
}

impl FromStr for SaveSemantic {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "REPLACE" => Ok(Self::Replace),
            "APPEND" => Ok(Self::Append),
            "REMOVE" => Ok(Self::Remove),
            _ => Err(IdentityError::InvalidArgument(format!(
                "Invalid save semantic: {}",
                s
            ))),
        }
    }
}

/// Unique attributes sub-structure used by the catalog to key an asset
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniqueAttributes {
    /// Qualified name of the asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
}

impl UniqueAttributes {
    /// Create unique attributes keyed by a qualified name
    pub fn with_qualified_name(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: Some(qualified_name.into()),
        }
    }
}

/// Free-form asset attributes (key-value JSON metadata)
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// Treat empty strings the same as absent values
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
