//! Common test utilities and helpers
//!
//! This module provides shared fixtures and assertions for the workspace
//! integration tests.

#![allow(dead_code)]

use catalog_identity_core::{Asset, Reference};

pub mod fixtures;

/// Assert that a qualified name is `<connection>/<32 lowercase hex digits>`
pub fn assert_fingerprint_shape(qualified_name: &str, connection_qualified_name: &str) {
    let prefix = format!("{}/", connection_qualified_name);
    let digest = qualified_name
        .strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("{} does not start with {}", qualified_name, prefix));
    assert_eq!(digest.len(), 32, "unexpected digest {}", digest);
    assert!(
        digest.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)),
        "digest is not lowercase hex: {}",
        digest
    );
}

/// Qualified name of an asset, panicking when absent
pub fn qualified_name(asset: &Asset) -> &str {
    asset
        .qualified_name
        .as_deref()
        .expect("asset has no qualified name")
}

/// Turn a built asset into a reference usable by its children
pub fn reference_to(asset: &Asset) -> Reference {
    asset.trim_to_reference().expect("asset has an identity")
}
