//! Error types for catalog identity derivation

use thiserror::Error;

/// Result type alias for identity operations
pub type Result<T> = std::result::Result<T, IdentityError>;

/// Main error type for identity operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No GUID or qualified name was available to build a relationship reference
    #[error("Missing required relationship parameter for {type_name}: one of [{fields}] must be provided")]
    MissingRequiredRelationshipParam { type_name: String, fields: String },

    /// Invalid argument supplied by the caller
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Asset type is not present in the asset type table
    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    /// Requested hashing primitive is not available in this build
    #[error("Hash algorithm unavailable: {0}")]
    HashUnavailable(String),

    /// Malformed digest value
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// Serialization/Deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl IdentityError {
    /// Build the error raised when an asset carries no usable identity
    pub fn missing_relationship_param(type_name: impl Into<String>) -> Self {
        IdentityError::MissingRequiredRelationshipParam {
            type_name: type_name.into(),
            fields: "guid, qualifiedName".to_string(),
        }
    }

    /// Whether the caller can fix the problem by changing its input and retrying.
    ///
    /// A missing hash primitive or a broken configuration cannot be repaired by
    /// retrying the same call.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            IdentityError::HashUnavailable(_) | IdentityError::Configuration(_)
        )
    }
}

impl From<serde_json::Error> for IdentityError {
    fn from(err: serde_json::Error) -> Self {
        IdentityError::Serialization(err.to_string())
    }
}
