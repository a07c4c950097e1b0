//! Asset types and the minimal asset model
//!
//! Instead of one hand-written type per catalog asset, asset types are rows
//! in a static table describing where the type sits in the hierarchy and how
//! its qualified name is derived. [`Asset`] is the generic object those rows
//! parameterize.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use crate::error::{IdentityError, Result};
use crate::placeholder::GuidGenerator;
use crate::qualified_name::{
    connection_qualified_name_now, connection_qualified_name_of, connector_of, generate_connection_qualified_name,
    generate_for, NamingRule,
};
use crate::reference::Reference;
use crate::relationship::RelationshipPayload;
use crate::types::{non_empty, Attributes, UniqueAttributes};

/// How the qualified name of an asset type is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    /// `default/<connector>/<epoch>`
    Connection,
    /// `parent/normalize(name)`
    Hierarchical,
    /// `connection/<id or content fingerprint>`
    LineageFingerprint,
}

/// One row of the asset type table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetType {
    /// Catalog type name
    pub type_name: &'static str,
    /// Type of the asset this type is placed under
    pub parent_type: Option<&'static str>,
    /// Relationship attribute pointing at the parent, if the catalog expects one
    pub parent_field: Option<&'static str>,
    /// Rule applied to the display name when building the qualified name
    pub naming_rule: NamingRule,
    /// How the qualified name is derived
    pub identity: IdentityKind,
}

const fn hierarchical(
    type_name: &'static str,
    parent_type: &'static str,
    parent_field: Option<&'static str>,
    naming_rule: NamingRule,
) -> AssetType {
    AssetType {
        type_name,
        parent_type: Some(parent_type),
        parent_field,
        naming_rule,
        identity: IdentityKind::Hierarchical,
    }
}

static ASSET_TYPES: &[AssetType] = &[
    AssetType {
        type_name: "Connection",
        parent_type: None,
        parent_field: None,
        naming_rule: NamingRule::Verbatim,
        identity: IdentityKind::Connection,
    },
    // Relational
    hierarchical("Database", "Connection", None, NamingRule::Verbatim),
    hierarchical("Schema", "Database", Some("database"), NamingRule::Verbatim),
    hierarchical("Table", "Schema", Some("schema"), NamingRule::Verbatim),
    hierarchical("View", "Schema", Some("schema"), NamingRule::Verbatim),
    hierarchical("MaterialisedView", "Schema", Some("schema"), NamingRule::Verbatim),
    hierarchical("Column", "Table", Some("table"), NamingRule::Verbatim),
    // Streaming
    hierarchical("KafkaTopic", "Connection", None, NamingRule::Verbatim),
    hierarchical("KafkaConsumerGroup", "Connection", None, NamingRule::Verbatim),
    // Object storage
    hierarchical("S3Bucket", "Connection", None, NamingRule::Verbatim),
    hierarchical("S3Object", "S3Bucket", Some("bucket"), NamingRule::Verbatim),
    // Multi-dimensional datasets follow the source system's slug rules below the cube
    hierarchical("Cube", "Connection", None, NamingRule::Verbatim),
    hierarchical("CubeDimension", "Cube", Some("cube"), NamingRule::Slug),
    hierarchical("CubeHierarchy", "CubeDimension", Some("cubeDimension"), NamingRule::Slug),
    hierarchical("CubeField", "CubeHierarchy", Some("cubeHierarchy"), NamingRule::Slug),
    // BI
    hierarchical("TableauProject", "Connection", None, NamingRule::Verbatim),
    hierarchical("TableauWorkbook", "TableauProject", Some("project"), NamingRule::Verbatim),
    hierarchical("TableauDashboard", "TableauWorkbook", Some("workbook"), NamingRule::Verbatim),
    hierarchical("PowerBIWorkspace", "Connection", None, NamingRule::Verbatim),
    hierarchical("PowerBIDashboard", "PowerBIWorkspace", Some("workspace"), NamingRule::Verbatim),
    // Lineage
    AssetType {
        type_name: "Process",
        parent_type: Some("Connection"),
        parent_field: None,
        naming_rule: NamingRule::Verbatim,
        identity: IdentityKind::LineageFingerprint,
    },
    AssetType {
        type_name: "ColumnProcess",
        parent_type: Some("Process"),
        parent_field: Some("process"),
        naming_rule: NamingRule::Verbatim,
        identity: IdentityKind::LineageFingerprint,
    },
];

impl AssetType {
    /// All known asset types
    pub fn all() -> &'static [AssetType] {
        ASSET_TYPES
    }

    /// Look up an asset type by its catalog type name
    pub fn lookup(type_name: &str) -> Result<&'static AssetType> {
        ASSET_TYPES
            .iter()
            .find(|t| t.type_name == type_name)
            .ok_or_else(|| IdentityError::UnknownAssetType(type_name.to_string()))
    }

    /// The row describing this type's parent
    pub fn parent(&self) -> Option<&'static AssetType> {
        self.parent_type
            .and_then(|name| ASSET_TYPES.iter().find(|t| t.type_name == name))
    }

    /// Derive a qualified name for an asset of this type placed under `parent_qualified_name`
    fn qualified_name_for(&self, name: &str, parent_qualified_name: &str) -> String {
        generate_for(self.naming_rule, name, parent_qualified_name)
    }

    /// Derive `parent/normalize(name)` for a hierarchical type; connection and
    /// lineage types are refused since their names are never derived that way
    pub fn hierarchical_qualified_name(&self, name: &str, parent_qualified_name: &str) -> Result<String> {
        match self.identity {
            IdentityKind::Hierarchical => Ok(self.qualified_name_for(name, parent_qualified_name)),
            IdentityKind::Connection => Err(IdentityError::InvalidArgument(format!(
                "{} qualified names are derived from a connector, use Asset::connection_creator",
                self.type_name
            ))),
            IdentityKind::LineageFingerprint => Err(IdentityError::InvalidArgument(format!(
                "{} qualified names are lineage fingerprints, use Asset::process_creator",
                self.type_name
            ))),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

/// A catalog asset reduced to its identity fields plus free-form attributes
///
/// Single-valued relationships are stored as a one-element list. On the wire
/// an asset uses the catalog's entity layout: identity fields live inside
/// `attributes`, and relationships are split into the replace, append and
/// remove maps according to each reference's save semantic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "CatalogEntity", into = "CatalogEntity")]
pub struct Asset {
    /// Catalog type name
    pub type_name: String,

    /// GUID: placeholder until the catalog assigns one
    pub guid: Option<String>,

    /// Hierarchical natural key
    pub qualified_name: Option<String>,

    /// Display name
    pub name: Option<String>,

    /// Qualified name of the connection the asset lives in
    pub connection_qualified_name: Option<String>,

    /// Connector (source system) name
    pub connector_name: Option<String>,

    /// Unique attributes as returned by the catalog
    pub unique_attributes: Option<UniqueAttributes>,

    /// Other attributes
    pub attributes: Attributes,

    /// Relationship attributes keyed by field name
    pub relationship_attributes: BTreeMap<String, Vec<Reference>>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntity {
    type_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    guid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    unique_attributes: Option<UniqueAttributes>,

    #[serde(default, skip_serializing_if = "EntityAttributes::is_empty")]
    attributes: EntityAttributes,

    #[serde(flatten)]
    relationships: RelationshipPayload,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntityAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    qualified_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    connection_qualified_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    connector_name: Option<String>,

    #[serde(flatten)]
    other: Attributes,
}

impl EntityAttributes {
    fn is_empty(&self) -> bool {
        self.qualified_name.is_none()
            && self.name.is_none()
            && self.connection_qualified_name.is_none()
            && self.connector_name.is_none()
            && self.other.is_empty()
    }
}

impl From<CatalogEntity> for Asset {
    fn from(entity: CatalogEntity) -> Self {
        let attributes = entity.attributes;
        Asset {
            type_name: entity.type_name,
            guid: entity.guid,
            qualified_name: attributes.qualified_name,
            name: attributes.name,
            connection_qualified_name: attributes.connection_qualified_name,
            connector_name: attributes.connector_name,
            unique_attributes: entity.unique_attributes,
            attributes: attributes.other,
            relationship_attributes: entity.relationships.into_relationships(),
        }
    }
}

impl From<Asset> for CatalogEntity {
    fn from(asset: Asset) -> Self {
        let relationships = RelationshipPayload::from_asset(&asset);
        CatalogEntity {
            type_name: asset.type_name,
            guid: asset.guid,
            unique_attributes: asset.unique_attributes,
            attributes: EntityAttributes {
                qualified_name: asset.qualified_name,
                name: asset.name,
                connection_qualified_name: asset.connection_qualified_name,
                connector_name: asset.connector_name,
                other: asset.attributes,
            },
            relationships,
        }
    }
}

impl Asset {
    /// Create a builder for constructing assets
    pub fn builder(type_name: impl Into<String>) -> AssetBuilder {
        AssetBuilder::new(type_name)
    }

    /// Build a new asset placed under `parent_qualified_name`.
    ///
    /// The asset receives a placeholder GUID, a qualified name derived by the
    /// type's naming rule, its connection and connector, and a qualified-name
    /// reference to its parent when the type declares a parent field.
    pub fn creator(
        type_name: &str,
        name: &str,
        parent_qualified_name: &str,
        guids: &dyn GuidGenerator,
    ) -> Result<Asset> {
        let asset_type = AssetType::lookup(type_name)?;
        let qualified_name = asset_type.hierarchical_qualified_name(name, parent_qualified_name)?;
        let connection_qn = if asset_type.parent_type == Some("Connection") {
            Some(parent_qualified_name.to_string())
        } else {
            connection_qualified_name_of(parent_qualified_name)
        };
        let connector = connector_of(parent_qualified_name).map(str::to_string);

        let mut builder = Asset::builder(asset_type.type_name)
            .guid(guids.next_guid())
            .name(name)
            .qualified_name(qualified_name);

        if let Some(connection_qn) = connection_qn {
            builder = builder.connection_qualified_name(connection_qn);
        }
        if let Some(connector) = connector {
            builder = builder.connector_name(connector);
        }
        if let (Some(field), Some(parent_type)) = (asset_type.parent_field, asset_type.parent_type) {
            let parent = Reference::by_qualified_name(parent_type, parent_qualified_name)?;
            builder = builder.relationship(field, parent);
        }

        let asset = builder.build();
        debug!(
            type_name = %asset.type_name,
            qualified_name = asset.qualified_name.as_deref().unwrap_or_default(),
            "derived asset identity"
        );
        Ok(asset)
    }

    /// Build a new connection stamped with the current time
    pub fn connection_creator(name: &str, connector: &str, guids: &dyn GuidGenerator) -> Asset {
        Self::connection_asset(name, connector, connection_qualified_name_now(connector), guids)
    }

    /// Build a new connection with an explicit creation epoch (seconds)
    pub fn connection_creator_at(
        name: &str,
        connector: &str,
        epoch_seconds: i64,
        guids: &dyn GuidGenerator,
    ) -> Asset {
        Self::connection_asset(
            name,
            connector,
            generate_connection_qualified_name(connector, epoch_seconds),
            guids,
        )
    }

    fn connection_asset(
        name: &str,
        connector: &str,
        qualified_name: String,
        guids: &dyn GuidGenerator,
    ) -> Asset {
        Asset::builder("Connection")
            .guid(guids.next_guid())
            .name(name)
            .connector_name(connector)
            .qualified_name(qualified_name)
            .build()
    }

    /// Build the minimal object needed to update an existing asset, keyed by
    /// its qualified name
    pub fn updater(
        type_name: &str,
        qualified_name: &str,
        name: &str,
        guids: &dyn GuidGenerator,
    ) -> Result<Asset> {
        let asset_type = AssetType::lookup(type_name)?;
        if qualified_name.is_empty() || name.is_empty() {
            return Err(IdentityError::InvalidArgument(format!(
                "{} updater requires qualifiedName and name",
                type_name
            )));
        }

        Ok(Asset::builder(asset_type.type_name)
            .guid(guids.next_guid())
            .qualified_name(qualified_name)
            .name(name)
            .build())
    }

    /// Reduce this asset to the fields required for an update
    pub fn trim_to_required(&self, guids: &dyn GuidGenerator) -> Result<Asset> {
        let qualified_name = non_empty(self.qualified_name.as_deref()).unwrap_or_default();
        let name = non_empty(self.name.as_deref()).unwrap_or_default();
        Self::updater(&self.type_name, qualified_name, name, guids)
    }

    /// Get the relationship references stored under `field`
    pub fn relationship(&self, field: &str) -> &[Reference] {
        self.relationship_attributes
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.type_name,
            self.qualified_name
                .as_deref()
                .or(self.guid.as_deref())
                .unwrap_or("?")
        )
    }
}

/// Builder for constructing Asset instances
pub struct AssetBuilder {
    asset: Asset,
}

impl AssetBuilder {
    /// Create a new asset builder
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            asset: Asset {
                type_name: type_name.into(),
                ..Asset::default()
            },
        }
    }

    /// Set the GUID
    pub fn guid(mut self, guid: impl Into<String>) -> Self {
        self.asset.guid = Some(guid.into());
        self
    }

    /// Set the qualified name
    pub fn qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.asset.qualified_name = Some(qualified_name.into());
        self
    }

    /// Set the display name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.asset.name = Some(name.into());
        self
    }

    /// Set the connection qualified name
    pub fn connection_qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.asset.connection_qualified_name = Some(qualified_name.into());
        self
    }

    /// Set the connector name
    pub fn connector_name(mut self, connector: impl Into<String>) -> Self {
        self.asset.connector_name = Some(connector.into());
        self
    }

    /// Set the unique attributes
    pub fn unique_attributes(mut self, unique_attributes: UniqueAttributes) -> Self {
        self.asset.unique_attributes = Some(unique_attributes);
        self
    }

    /// Set a free-form attribute
    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.asset.attributes.insert(key.into(), value.into());
        self
    }

    /// Add a reference under a relationship field
    pub fn relationship(mut self, field: impl Into<String>, reference: Reference) -> Self {
        self.asset
            .relationship_attributes
            .entry(field.into())
            .or_default()
            .push(reference);
        self
    }

    /// Add several references under a relationship field, keeping their order
    pub fn relationships(mut self, field: impl Into<String>, references: Vec<Reference>) -> Self {
        self.asset
            .relationship_attributes
            .entry(field.into())
            .or_default()
            .extend(references);
        self
    }

    /// Build the asset
    pub fn build(self) -> Asset {
        self.asset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder::{is_placeholder_guid, MockGuidGenerator, SequentialGuidGenerator};
    use crate::types::SaveSemantic;

    const SCHEMA_QN: &str = "default/snowflake/1700000000/ANALYTICS/PUBLIC";

    #[test]
    fn test_lookup_known_and_unknown_types() {
        let table = AssetType::lookup("Table").unwrap();
        assert_eq!(table.parent_type, Some("Schema"));
        assert_eq!(table.parent().unwrap().type_name, "Schema");

        let err = AssetType::lookup("Spreadsheet").unwrap_err();
        assert!(matches!(err, IdentityError::UnknownAssetType(_)));
    }

    #[test]
    fn test_every_parent_type_is_in_the_table() {
        for asset_type in AssetType::all() {
            if let Some(parent) = asset_type.parent_type {
                assert!(
                    AssetType::lookup(parent).is_ok(),
                    "{} has unknown parent {}",
                    asset_type,
                    parent
                );
            }
        }
    }

    #[test]
    fn test_table_creator() {
        let guids = SequentialGuidGenerator::new();
        let table = Asset::creator("Table", "ORDERS", SCHEMA_QN, &guids).unwrap();

        assert_eq!(table.guid.as_deref(), Some("-1"));
        assert_eq!(
            table.qualified_name.as_deref(),
            Some("default/snowflake/1700000000/ANALYTICS/PUBLIC/ORDERS")
        );
        assert_eq!(
            table.connection_qualified_name.as_deref(),
            Some("default/snowflake/1700000000")
        );
        assert_eq!(table.connector_name.as_deref(), Some("snowflake"));

        let schema = table.relationship("schema");
        assert_eq!(schema.len(), 1);
        assert_eq!(schema[0].type_name, "Schema");
        assert_eq!(schema[0].qualified_name(), Some(SCHEMA_QN));
    }

    #[test]
    fn test_connection_child_creator() {
        let guids = SequentialGuidGenerator::new();
        let topic = Asset::creator("KafkaTopic", "topic1", "default/kafka/123", &guids).unwrap();
        assert_eq!(topic.qualified_name.as_deref(), Some("default/kafka/123/topic1"));
        assert_eq!(topic.connection_qualified_name.as_deref(), Some("default/kafka/123"));
        assert!(topic.relationship_attributes.is_empty());
    }

    #[test]
    fn test_slug_creator() {
        let guids = SequentialGuidGenerator::new();
        let dimension =
            Asset::creator("CubeDimension", "Sales Region", "default/essbase/1/Finance", &guids).unwrap();
        assert_eq!(
            dimension.qualified_name.as_deref(),
            Some("default/essbase/1/Finance/sales-region")
        );
        assert_eq!(dimension.name.as_deref(), Some("Sales Region"));
    }

    #[test]
    fn test_creator_uses_injected_generator() {
        let mut guids = MockGuidGenerator::new();
        guids
            .expect_next_guid()
            .times(1)
            .returning(|| "-424242".to_string());

        let column = Asset::creator("Column", "ID", "default/snowflake/1/DB/SCH/T", &guids).unwrap();
        assert_eq!(column.guid.as_deref(), Some("-424242"));
    }

    #[test]
    fn test_creator_rejects_non_hierarchical_types() {
        let guids = SequentialGuidGenerator::new();
        assert!(Asset::creator("Connection", "prod", "snowflake", &guids).is_err());
        assert!(Asset::creator("Process", "etl", "default/snowflake/1", &guids).is_err());
    }

    #[test]
    fn test_connection_creator() {
        let guids = SequentialGuidGenerator::new();
        let connection = Asset::connection_creator_at("production", "snowflake", 1700000000, &guids);
        assert_eq!(
            connection.qualified_name.as_deref(),
            Some("default/snowflake/1700000000")
        );
        assert_eq!(connection.connector_name.as_deref(), Some("snowflake"));

        let now = Asset::connection_creator("production", "snowflake", &guids);
        assert!(is_placeholder_guid(now.guid.as_deref().unwrap()));
    }

    #[test]
    fn test_updater_and_trim_to_required() {
        let guids = SequentialGuidGenerator::new();
        let full = Asset::creator("Table", "ORDERS", SCHEMA_QN, &guids).unwrap();
        let trimmed = full.trim_to_required(&guids).unwrap();

        assert_eq!(trimmed.type_name, "Table");
        assert_eq!(trimmed.qualified_name, full.qualified_name);
        assert_eq!(trimmed.name, full.name);
        assert!(trimmed.relationship_attributes.is_empty());
        assert!(trimmed.connection_qualified_name.is_none());

        assert!(Asset::updater("Table", "", "ORDERS", &guids).is_err());
        assert!(Asset::builder("Table").build().trim_to_required(&guids).is_err());
    }

    #[test]
    fn test_hierarchical_qualified_name() {
        let table = AssetType::lookup("Table").unwrap();
        assert_eq!(table.hierarchical_qualified_name("T", SCHEMA_QN).unwrap(), format!("{}/T", SCHEMA_QN));

        for type_name in ["Connection", "Process", "ColumnProcess"] {
            let err = AssetType::lookup(type_name)
                .unwrap()
                .hierarchical_qualified_name("x", "default/snowflake/1")
                .unwrap_err();
            assert!(matches!(err, IdentityError::InvalidArgument(_)), "{}", type_name);
        }
    }

    #[test]
    fn test_asset_serialization() {
        let asset = Asset::builder("Table")
            .guid("-1")
            .qualified_name("conn/db/t")
            .name("t")
            .attribute("description", "orders fact table")
            .relationship("schema", Reference::by_qualified_name("Schema", "conn/db").unwrap())
            .build();

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "typeName": "Table",
                "guid": "-1",
                "attributes": {
                    "qualifiedName": "conn/db/t",
                    "name": "t",
                    "description": "orders fact table"
                },
                "relationshipAttributes": {
                    "schema": [{"typeName": "Schema", "uniqueAttributes": {"qualifiedName": "conn/db"}}]
                }
            })
        );

        let parsed: Asset = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, asset);
    }

    #[test]
    fn test_catalog_entity_identity_fields_come_from_attributes() {
        let asset: Asset = serde_json::from_str(
            r#"{
                "typeName": "Table",
                "attributes": {
                    "qualifiedName": "default/snowflake/1/DB/SCH/T",
                    "name": "T",
                    "connectionQualifiedName": "default/snowflake/1",
                    "rowCount": 42
                }
            }"#,
        )
        .unwrap();

        assert_eq!(asset.qualified_name.as_deref(), Some("default/snowflake/1/DB/SCH/T"));
        assert_eq!(asset.name.as_deref(), Some("T"));
        assert_eq!(asset.connection_qualified_name.as_deref(), Some("default/snowflake/1"));
        assert_eq!(asset.attributes.get("rowCount"), Some(&serde_json::json!(42)));
        assert!(!asset.attributes.contains_key("qualifiedName"));
    }

    #[test]
    fn test_relationships_serialized_once_per_semantic() {
        let asset = Asset::builder("Table")
            .guid("-1")
            .relationship("meanings", Reference::by_guid("GlossaryTerm", "t1").unwrap())
            .relationship(
                "meanings",
                Reference::by_guid_with("GlossaryTerm", "t2", SaveSemantic::Append).unwrap(),
            )
            .relationship(
                "meanings",
                Reference::by_guid_with("GlossaryTerm", "t3", SaveSemantic::Remove).unwrap(),
            )
            .build();

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["relationshipAttributes"]["meanings"].as_array().unwrap().len(), 1);
        assert_eq!(json["appendRelationshipAttributes"]["meanings"][0]["guid"], "t2");
        assert_eq!(json["removeRelationshipAttributes"]["meanings"][0]["guid"], "t3");

        let parsed: Asset = serde_json::from_value(json).unwrap();
        let semantics: Vec<SaveSemantic> = parsed.relationship("meanings").iter().map(|r| r.semantic).collect();
        assert_eq!(
            semantics,
            vec![SaveSemantic::Replace, SaveSemantic::Append, SaveSemantic::Remove]
        );
    }
}
