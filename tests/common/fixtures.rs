//! Test fixtures
//!
//! This module provides a small warehouse hierarchy for integration tests.

use catalog_identity_core::{Asset, GuidGenerator};

pub const CONNECTOR: &str = "snowflake";
pub const CONNECTION_EPOCH: i64 = 1700000000;

/// Connection, database, schema and two tables built top-down
pub struct Warehouse {
    pub connection: Asset,
    pub database: Asset,
    pub schema: Asset,
    pub raw_orders: Asset,
    pub clean_orders: Asset,
}

impl Warehouse {
    pub fn build(guids: &dyn GuidGenerator) -> Self {
        let connection = Asset::connection_creator_at("production", CONNECTOR, CONNECTION_EPOCH, guids);
        let connection_qn = connection.qualified_name.clone().unwrap_or_default();

        let database = Asset::creator("Database", "ANALYTICS", &connection_qn, guids)
            .expect("database creator");
        let database_qn = database.qualified_name.clone().unwrap_or_default();

        let schema = Asset::creator("Schema", "PUBLIC", &database_qn, guids).expect("schema creator");
        let schema_qn = schema.qualified_name.clone().unwrap_or_default();

        let raw_orders = Asset::creator("Table", "RAW_ORDERS", &schema_qn, guids).expect("table creator");
        let clean_orders =
            Asset::creator("Table", "CLEAN_ORDERS", &schema_qn, guids).expect("table creator");

        Self {
            connection,
            database,
            schema,
            raw_orders,
            clean_orders,
        }
    }

    pub fn connection_qualified_name(&self) -> &str {
        self.connection.qualified_name.as_deref().unwrap_or_default()
    }
}

/// Display names that stress the slug rule
pub fn awkward_names() -> Vec<&'static str> {
    vec![
        "Sales Region",
        "  leading and trailing  ",
        "Fiscal Year (2024)",
        "ÜBER-Kategorie",
        "a__b--c",
    ]
}
