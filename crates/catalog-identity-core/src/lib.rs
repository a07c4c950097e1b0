//! Identity derivation for metadata catalog assets
//!
//! This crate computes, on the client and before any network call, the
//! identities the catalog uses as natural keys: hierarchical qualified names,
//! content-addressed lineage process fingerprints, and the minimal references
//! used to express relationships between assets.
//!
//! Every operation is a pure function of its inputs, safe to call from any
//! number of threads without coordination.

pub mod asset;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod lineage;
pub mod placeholder;
pub mod qualified_name;
pub mod reference;
pub mod relationship;
pub mod types;

// Re-exports for convenience
pub use asset::{Asset, AssetBuilder, AssetType, IdentityKind};
pub use digest::{Digest, HashAlgorithm};
pub use error::{IdentityError, Result};
pub use fingerprint::{generate_process_qualified_name, FingerprintScheme, Fingerprinter, ProcessIdentity};
pub use lineage::ProcessCreator;
pub use placeholder::{is_placeholder_guid, GuidGenerator, RandomGuidGenerator, SequentialGuidGenerator};
pub use qualified_name::{generate_qualified_name, slugify, NamingRule};
pub use reference::{trim_to_reference, Reference};
pub use relationship::RelationshipPayload;
pub use types::{SaveSemantic, UniqueAttributes};
