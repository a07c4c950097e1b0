//! Routing relationship references by save semantic
//!
//! The catalog takes three relationship maps on write: one whose contents
//! replace the existing collection, one whose contents are appended to it and
//! one whose contents are removed from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::asset::Asset;
use crate::reference::Reference;
use crate::types::SaveSemantic;

type RelationshipMap = BTreeMap<String, Vec<Reference>>;

/// Relationship references grouped the way the catalog expects them on write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipPayload {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationship_attributes: RelationshipMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub append_relationship_attributes: RelationshipMap,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub remove_relationship_attributes: RelationshipMap,
}

impl RelationshipPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect every relationship reference of an asset
    pub fn from_asset(asset: &Asset) -> Self {
        let mut payload = Self::new();
        for (field, references) in &asset.relationship_attributes {
            for reference in references {
                payload.add(field.clone(), reference.clone());
            }
        }
        payload
    }

    /// Route a reference into the bucket matching its save semantic
    pub fn add(&mut self, field: impl Into<String>, reference: Reference) {
        let bucket = match reference.semantic {
            SaveSemantic::Replace => &mut self.relationship_attributes,
            SaveSemantic::Append => &mut self.append_relationship_attributes,
            SaveSemantic::Remove => &mut self.remove_relationship_attributes,
        };
        bucket.entry(field.into()).or_default().push(reference);
    }

    /// References under `field` in the bucket for `semantic`
    pub fn get(&self, semantic: SaveSemantic, field: &str) -> &[Reference] {
        let bucket = match semantic {
            SaveSemantic::Replace => &self.relationship_attributes,
            SaveSemantic::Append => &self.append_relationship_attributes,
            SaveSemantic::Remove => &self.remove_relationship_attributes,
        };
        bucket.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Merge the buckets back into one map, tagging each reference with the
    /// semantic of the bucket it came from
    pub fn into_relationships(self) -> RelationshipMap {
        let mut merged = RelationshipMap::new();
        let buckets = [
            (SaveSemantic::Replace, self.relationship_attributes),
            (SaveSemantic::Append, self.append_relationship_attributes),
            (SaveSemantic::Remove, self.remove_relationship_attributes),
        ];
        for (semantic, bucket) in buckets {
            for (field, references) in bucket {
                merged
                    .entry(field)
                    .or_default()
                    .extend(references.into_iter().map(|r| r.with_semantic(semantic)));
            }
        }
        merged
    }

    pub fn is_empty(&self) -> bool {
        self.relationship_attributes.is_empty()
            && self.append_relationship_attributes.is_empty()
            && self.remove_relationship_attributes.is_empty()
    }
}
