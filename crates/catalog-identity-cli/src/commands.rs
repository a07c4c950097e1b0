//! Subcommand implementations
//!
//! Each command returns the JSON document printed by `main`.

use anyhow::{Context, Result};
use catalog_identity_core::qualified_name::{
    generate_connection_qualified_name, connection_qualified_name_now,
};
use catalog_identity_core::{Asset, AssetType, Fingerprinter, GuidGenerator, Reference};
use serde_json::{json, Value};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Derive the qualified name for a hierarchical asset type
pub fn qualified_name(type_name: &str, name: &str, parent: &str) -> Result<Value> {
    let asset_type = AssetType::lookup(type_name)?;
    let qualified_name = asset_type.hierarchical_qualified_name(name, parent)?;
    Ok(json!({
        "typeName": asset_type.type_name,
        "namingRule": asset_type.naming_rule.to_string(),
        "qualifiedName": qualified_name,
    }))
}

/// Derive a connection qualified name
pub fn connection(connector: &str, epoch: Option<i64>) -> Value {
    let qualified_name = match epoch {
        Some(epoch) => generate_connection_qualified_name(connector, epoch),
        None => connection_qualified_name_now(connector),
    };
    json!({ "typeName": "Connection", "qualifiedName": qualified_name })
}

/// Inputs to the `process` command
pub struct ProcessArgs<'a> {
    pub name: &'a str,
    pub connection: &'a str,
    pub id: Option<&'a str>,
    pub parent: Option<&'a str>,
    pub inputs: &'a [String],
    pub outputs: &'a [String],
}

/// Build a lineage process and its write payload
pub fn process(
    args: &ProcessArgs<'_>,
    fingerprinter: Fingerprinter,
    guids: &dyn GuidGenerator,
) -> Result<Value> {
    let inputs = parse_references(args.inputs).context("Invalid --input reference")?;
    let outputs = parse_references(args.outputs).context("Invalid --output reference")?;

    let mut creator = Asset::process_creator(args.name, args.connection)?
        .inputs(inputs)
        .outputs(outputs)
        .fingerprinter(fingerprinter);
    if let Some(id) = args.id {
        creator = creator.id(id);
    }
    if let Some(parent) = args.parent {
        let parent: Reference = parent.parse().context("Invalid --parent reference")?;
        creator = creator.parent(parent);
    }

    let process = creator.build(guids)?;
    info!(qualified_name = ?process.qualified_name, "built process");
    asset_document(&process)
}

/// Build a new hierarchical asset and its write payload
pub fn create(type_name: &str, name: &str, parent: &str, guids: &dyn GuidGenerator) -> Result<Value> {
    let asset = Asset::creator(type_name, name, parent, guids)?;
    asset_document(&asset)
}

/// Reduce an asset document, read from `file` or stdin, to a reference
pub fn reference(file: Option<&Path>) -> Result<Value> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read asset from stdin")?;
            buf
        }
    };
    reference_from_json(&raw)
}

/// Reduce a JSON asset document to a reference
pub fn reference_from_json(raw: &str) -> Result<Value> {
    let asset: Asset = serde_json::from_str(raw).context("Failed to parse asset JSON")?;
    let reference = asset.trim_to_reference()?;
    Ok(serde_json::to_value(reference)?)
}

/// Generate placeholder GUIDs
pub fn placeholders(count: usize, guids: &dyn GuidGenerator) -> Value {
    let values: Vec<String> = (0..count).map(|_| guids.next_guid()).collect();
    json!(values)
}

fn parse_references(raw: &[String]) -> Result<Vec<Reference>> {
    raw.iter()
        .map(|r| r.parse::<Reference>().with_context(|| format!("'{}'", r)))
        .collect()
}

/// Wrap an asset the way the catalog accepts a single entity on write.
/// Relationships appear once, in the bucket for their save semantic.
fn asset_document(asset: &Asset) -> Result<Value> {
    Ok(json!({ "entity": serde_json::to_value(asset)? }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_identity_core::{SaveSemantic, SequentialGuidGenerator};

    #[test]
    fn test_qualified_name_command() {
        let out = qualified_name("KafkaTopic", "topic1", "conn/db").unwrap();
        assert_eq!(out["qualifiedName"], "conn/db/topic1");
        assert_eq!(out["namingRule"], "verbatim");
        assert!(qualified_name("Nope", "a", "b").is_err());
    }

    #[test]
    fn test_qualified_name_command_rejects_non_hierarchical_types() {
        for type_name in ["Process", "ColumnProcess", "Connection"] {
            let err = qualified_name(type_name, "p", "c").unwrap_err();
            assert!(err.to_string().contains(type_name), "{}", err);
        }
    }

    #[test]
    fn test_connection_command() {
        let out = connection("snowflake", Some(1700000000));
        assert_eq!(out["qualifiedName"], "default/snowflake/1700000000");
    }

    #[test]
    fn test_process_command_golden_value() {
        let guids = SequentialGuidGenerator::new();
        let args = ProcessArgs {
            name: "p",
            connection: "c",
            id: None,
            parent: None,
            inputs: &[],
            outputs: &[],
        };
        let out = process(&args, Fingerprinter::default(), &guids).unwrap();
        assert_eq!(out["entity"]["attributes"]["qualifiedName"], "c/bc54f4d60f1cec0f9a6cb70e13f2127a");
        assert_eq!(out["entity"]["guid"], "-1");
    }

    #[test]
    fn test_process_command_with_references() {
        let guids = SequentialGuidGenerator::new();
        let inputs = vec!["Table@qn:default/snowflake/1/DB/SCH/RAW".to_string()];
        let outputs = vec!["Table@guid:out-guid".to_string()];
        let args = ProcessArgs {
            name: "etl",
            connection: "default/snowflake/1",
            id: Some("job-42"),
            parent: None,
            inputs: &inputs,
            outputs: &outputs,
        };
        let out = process(&args, Fingerprinter::default(), &guids).unwrap();
        assert_eq!(out["entity"]["attributes"]["qualifiedName"], "default/snowflake/1/job-42");
        assert_eq!(
            out["entity"]["relationshipAttributes"]["outputs"][0]["guid"],
            "out-guid"
        );
    }

    #[test]
    fn test_process_command_rejects_bad_reference() {
        let guids = SequentialGuidGenerator::new();
        let inputs = vec!["not-a-reference".to_string()];
        let args = ProcessArgs {
            name: "etl",
            connection: "c",
            id: None,
            parent: None,
            inputs: &inputs,
            outputs: &[],
        };
        assert!(process(&args, Fingerprinter::default(), &guids).is_err());
    }

    #[test]
    fn test_create_command() {
        let guids = SequentialGuidGenerator::new();
        let out = create("Schema", "PUBLIC", "default/snowflake/1/DB", &guids).unwrap();
        assert_eq!(out["entity"]["attributes"]["qualifiedName"], "default/snowflake/1/DB/PUBLIC");
        assert_eq!(
            out["entity"]["relationshipAttributes"]["database"][0]["uniqueAttributes"]["qualifiedName"],
            "default/snowflake/1/DB"
        );
    }

    #[test]
    fn test_reference_command() {
        let out = reference_from_json(
            r#"{"typeName": "Table", "guid": "g1", "attributes": {"qualifiedName": "q1"}}"#,
        )
        .unwrap();
        assert_eq!(out, json!({"typeName": "Table", "guid": "g1"}));

        let out = reference_from_json(
            r#"{"typeName": "Table", "attributes": {"qualifiedName": "default/snowflake/1/DB/SCH/T", "name": "T"}}"#,
        )
        .unwrap();
        assert_eq!(
            out,
            json!({"typeName": "Table", "uniqueAttributes": {"qualifiedName": "default/snowflake/1/DB/SCH/T"}})
        );

        let err = reference_from_json(r#"{"typeName": "Table"}"#).unwrap_err();
        assert!(err.to_string().contains("Missing required relationship parameter"));
    }

    #[test]
    fn test_reference_command_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.json");
        std::fs::write(
            &path,
            r#"{"typeName": "Table", "uniqueAttributes": {"qualifiedName": "conn/db/t"}}"#,
        )
        .unwrap();
        let out = reference(Some(&path)).unwrap();
        assert_eq!(out["uniqueAttributes"]["qualifiedName"], "conn/db/t");
    }

    #[test]
    fn test_asset_document_lists_each_relationship_once() {
        let asset = Asset::builder("Table")
            .guid("-1")
            .qualified_name("conn/db/t")
            .relationship(
                "meanings",
                Reference::by_guid_with("GlossaryTerm", "term-1", SaveSemantic::Append).unwrap(),
            )
            .build();

        let out = asset_document(&asset).unwrap();
        assert!(out["entity"].get("relationshipAttributes").is_none());
        assert_eq!(out["entity"]["appendRelationshipAttributes"]["meanings"][0]["guid"], "term-1");
        assert!(out.get("relationships").is_none());
    }

    #[test]
    fn test_placeholders_command() {
        let guids = SequentialGuidGenerator::new();
        assert_eq!(placeholders(3, &guids), json!(["-1", "-2", "-3"]));
    }
}
