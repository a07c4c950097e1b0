//! Relationship references (stubs)
//!
//! A reference is the minimal form of an asset used inside another asset's
//! relationship attributes. It carries either a GUID or a qualified name, and
//! a save semantic telling the catalog how to merge it into the existing
//! relationship collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::asset::Asset;
use crate::error::{IdentityError, Result};
use crate::types::{non_empty, SaveSemantic, UniqueAttributes};

/// Type name used when a reference is parsed without an explicit type
pub const DEFAULT_REFERENCE_TYPE: &str = "Referenceable";

/// A reference to an asset, by GUID or by qualified name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reference {
    /// Asset type of the referenced asset
    pub type_name: String,

    /// GUID of the referenced asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,

    /// Qualified name of the referenced asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_attributes: Option<UniqueAttributes>,

    /// How this reference is merged on write; routes the reference into the
    /// right relationship bucket instead of being serialized
    #[serde(skip)]
    pub semantic: SaveSemantic,
}

impl Reference {
    /// Reference an asset by GUID with the default (replace) semantic
    pub fn by_guid(type_name: impl Into<String>, guid: impl Into<String>) -> Result<Self> {
        Self::by_guid_with(type_name, guid, SaveSemantic::default())
    }

    /// Reference an asset by GUID with an explicit semantic
    pub fn by_guid_with(
        type_name: impl Into<String>,
        guid: impl Into<String>,
        semantic: SaveSemantic,
    ) -> Result<Self> {
        let guid = guid.into();
        if guid.is_empty() {
            return Err(IdentityError::InvalidArgument(
                "GUID cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            type_name: type_name.into(),
            guid: Some(guid),
            unique_attributes: None,
            semantic,
        })
    }

    /// Reference an asset by qualified name with the default (replace) semantic
    pub fn by_qualified_name(
        type_name: impl Into<String>,
        qualified_name: impl Into<String>,
    ) -> Result<Self> {
        Self::by_qualified_name_with(type_name, qualified_name, SaveSemantic::default())
    }

    /// Reference an asset by qualified name with an explicit semantic
    pub fn by_qualified_name_with(
        type_name: impl Into<String>,
        qualified_name: impl Into<String>,
        semantic: SaveSemantic,
    ) -> Result<Self> {
        let qualified_name = qualified_name.into();
        if qualified_name.is_empty() {
            return Err(IdentityError::InvalidArgument(
                "Qualified name cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            type_name: type_name.into(),
            guid: None,
            unique_attributes: Some(UniqueAttributes::with_qualified_name(qualified_name)),
            semantic,
        })
    }

    /// Return a copy of this reference with a different save semantic
    pub fn with_semantic(mut self, semantic: SaveSemantic) -> Self {
        self.semantic = semantic;
        self
    }

    /// Get the GUID if it is set and non-empty
    pub fn guid(&self) -> Option<&str> {
        non_empty(self.guid.as_deref())
    }

    /// Get the qualified name if it is set and non-empty
    pub fn qualified_name(&self) -> Option<&str> {
        non_empty(
            self.unique_attributes
                .as_ref()
                .and_then(|u| u.qualified_name.as_deref()),
        )
    }

    /// The string this reference contributes to a content fingerprint:
    /// GUID if known, else qualified name, else nothing.
    pub fn identity_key(&self) -> Option<&str> {
        self.guid().or_else(|| self.qualified_name())
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(guid) = self.guid() {
            write!(f, "{}@guid:{}", self.type_name, guid)
        } else if let Some(qn) = self.qualified_name() {
            write!(f, "{}@qn:{}", self.type_name, qn)
        } else {
            write!(f, "{}@<unidentified>", self.type_name)
        }
    }
}

impl FromStr for Reference {
    type Err = IdentityError;

    /// Parse `[Type@]guid:<guid>` or `[Type@]qn:<qualifiedName>`
    fn from_str(s: &str) -> Result<Self> {
        let (head, value) = s.split_once(':').ok_or_else(|| {
            IdentityError::InvalidArgument(format!(
                "Invalid reference '{}': expected [Type@]guid:<guid> or [Type@]qn:<qualifiedName>",
                s
            ))
        })?;

        let (type_name, kind) = match head.rsplit_once('@') {
            Some((type_name, kind)) if !type_name.is_empty() => (type_name, kind),
            Some((_, kind)) => (DEFAULT_REFERENCE_TYPE, kind),
            None => (DEFAULT_REFERENCE_TYPE, head),
        };

        match kind {
            "guid" => Reference::by_guid(type_name, value),
            "qn" => Reference::by_qualified_name(type_name, value),
            other => Err(IdentityError::InvalidArgument(format!(
                "Invalid reference kind '{}': expected guid or qn",
                other
            ))),
        }
    }
}

/// Reduce an asset to a reference, preferring GUID, then top-level qualified
/// name, then the qualified name nested in its unique attributes.
pub fn trim_to_reference(asset: &Asset) -> Result<Reference> {
    if let Some(guid) = non_empty(asset.guid.as_deref()) {
        return Reference::by_guid(asset.type_name.clone(), guid);
    }

    if let Some(qn) = non_empty(asset.qualified_name.as_deref()) {
        return Reference::by_qualified_name(asset.type_name.clone(), qn);
    }

    let nested = asset
        .unique_attributes
        .as_ref()
        .and_then(|u| non_empty(u.qualified_name.as_deref()));
    if let Some(qn) = nested {
        return Reference::by_qualified_name(asset.type_name.clone(), qn);
    }

    debug!(type_name = %asset.type_name, "asset has no identity to reference");
    Err(IdentityError::missing_relationship_param(&asset.type_name))
}

impl Asset {
    /// Reduce this asset to a relationship reference
    pub fn trim_to_reference(&self) -> Result<Reference> {
        trim_to_reference(self)
    }
}
