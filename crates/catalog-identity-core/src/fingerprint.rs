//! Lineage process fingerprints
//!
//! A lineage process is identified by `<connectionQualifiedName>/<id>`. When
//! the caller supplies an id it is used verbatim. Otherwise the id is a hash
//! over the process's name, connection, parent, inputs and outputs, so that
//! repeated registrations of the same logical process collapse onto one node.
//!
//! Known caveats, preserved for compatibility with existing catalog data:
//!
//! - inputs and outputs are hashed in list order, so reordering them yields a
//!   different fingerprint;
//! - a reference contributes its GUID when set, otherwise its qualified name,
//!   so describing the same asset once by GUID and once by qualified name
//!   produces two different processes;
//! - a reference with neither contributes nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::digest::HashAlgorithm;
use crate::error::IdentityError;
use crate::qualified_name::generate_qualified_name;
use crate::reference::Reference;
use crate::types::non_empty;

/// How the hashed fields are laid out before hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerprintScheme {
    /// Plain concatenation; the layout the catalog expects
    Concatenated,
    /// Every field written as `<byte length>:<bytes>;` and every reference
    /// list prefixed with its length. Produces different fingerprints from
    /// `Concatenated`, so switching an existing deployment is a breaking change.
    LengthPrefixed,
}

impl Default for FingerprintScheme {
    fn default() -> Self {
        FingerprintScheme::Concatenated
    }
}

impl fmt::Display for FingerprintScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FingerprintScheme::Concatenated => write!(f, "concatenated"),
            FingerprintScheme::LengthPrefixed => write!(f, "length_prefixed"),
        }
    }
}

impl FromStr for FingerprintScheme {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "concatenated" => Ok(FingerprintScheme::Concatenated),
            "length_prefixed" => Ok(FingerprintScheme::LengthPrefixed),
            _ => Err(IdentityError::Configuration(format!(
                "Invalid fingerprint scheme: {}",
                s
            ))),
        }
    }
}

/// Everything that identifies a lineage process
#[derive(Debug, Clone, Copy)]
pub struct ProcessIdentity<'a> {
    pub name: &'a str,
    pub connection_qualified_name: &'a str,
    pub explicit_id: Option<&'a str>,
    pub parent: Option<&'a Reference>,
    pub inputs: &'a [Reference],
    pub outputs: &'a [Reference],
}

/// Computes process qualified names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fingerprinter {
    scheme: FingerprintScheme,
    algorithm: HashAlgorithm,
}

impl Fingerprinter {
    /// Create a fingerprinter; `Fingerprinter::default()` matches the catalog
    pub fn new(scheme: FingerprintScheme, algorithm: HashAlgorithm) -> Self {
        Self { scheme, algorithm }
    }

    pub fn scheme(&self) -> FingerprintScheme {
        self.scheme
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Derive the qualified name for a process
    pub fn generate(&self, identity: &ProcessIdentity<'_>) -> String {
        if let Some(id) = non_empty(identity.explicit_id) {
            return generate_qualified_name(id, identity.connection_qualified_name);
        }

        let payload = self.encode(identity);
        let digest = self.algorithm.hex_digest(payload.as_bytes());
        debug!(
            process = identity.name,
            inputs = identity.inputs.len(),
            outputs = identity.outputs.len(),
            scheme = %self.scheme,
            %digest,
            "computed process fingerprint"
        );
        generate_qualified_name(&digest, identity.connection_qualified_name)
    }

    fn encode(&self, identity: &ProcessIdentity<'_>) -> String {
        let parent: Vec<&Reference> = identity.parent.into_iter().collect();
        let inputs: Vec<&Reference> = identity.inputs.iter().collect();
        let outputs: Vec<&Reference> = identity.outputs.iter().collect();

        let mut out = String::new();
        match self.scheme {
            FingerprintScheme::Concatenated => {
                out.push_str(identity.name);
                out.push_str(identity.connection_qualified_name);
                for reference in parent.iter().chain(&inputs).chain(&outputs) {
                    out.push_str(key_of(reference));
                }
            }
            FingerprintScheme::LengthPrefixed => {
                push_field(&mut out, identity.name);
                push_field(&mut out, identity.connection_qualified_name);
                for section in [&parent, &inputs, &outputs] {
                    out.push_str(&format!("[{}]", section.len()));
                    for reference in section.iter() {
                        push_field(&mut out, key_of(reference));
                    }
                }
            }
        }
        out
    }
}

fn key_of(reference: &Reference) -> &str {
    match reference.identity_key() {
        Some(key) => key,
        None => {
            warn!(
                type_name = %reference.type_name,
                "reference has neither GUID nor qualified name, it does not contribute to the fingerprint"
            );
            ""
        }
    }
}

fn push_field(out: &mut String, value: &str) {
    out.push_str(&format!("{}:{};", value.len(), value));
}

/// Derive a process qualified name with the catalog-compatible defaults
pub fn generate_process_qualified_name(
    name: &str,
    connection_qualified_name: &str,
    explicit_id: Option<&str>,
    parent: Option<&Reference>,
    inputs: &[Reference],
    outputs: &[Reference],
) -> String {
    Fingerprinter::default().generate(&ProcessIdentity {
        name,
        connection_qualified_name,
        explicit_id,
        parent,
        inputs,
        outputs,
    })
}
