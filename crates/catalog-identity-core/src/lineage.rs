//! Lineage process creators

use tracing::debug;

use crate::asset::{Asset, AssetType};
use crate::error::{IdentityError, Result};
use crate::fingerprint::{Fingerprinter, ProcessIdentity};
use crate::placeholder::GuidGenerator;
use crate::qualified_name::connector_of;
use crate::reference::Reference;

/// Relationship field holding a process's inputs
pub const INPUTS_FIELD: &str = "inputs";
/// Relationship field holding a process's outputs
pub const OUTPUTS_FIELD: &str = "outputs";

/// Builder for `Process` and `ColumnProcess` assets
///
/// The qualified name is derived once, in [`ProcessCreator::build`], from the
/// explicit id when one is set and from the process fingerprint otherwise.
#[derive(Debug, Clone)]
pub struct ProcessCreator {
    asset_type: &'static AssetType,
    name: String,
    connection_qualified_name: String,
    explicit_id: Option<String>,
    parent: Option<Reference>,
    inputs: Vec<Reference>,
    outputs: Vec<Reference>,
    fingerprinter: Fingerprinter,
}

impl ProcessCreator {
    fn new(type_name: &str, name: impl Into<String>, connection_qualified_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            asset_type: AssetType::lookup(type_name)?,
            name: name.into(),
            connection_qualified_name: connection_qualified_name.into(),
            explicit_id: None,
            parent: None,
            inputs: Vec::new(),
            outputs: Vec::new(),
            fingerprinter: Fingerprinter::default(),
        })
    }

    /// Use a caller-controlled id instead of a content fingerprint
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.explicit_id = Some(id.into());
        self
    }

    /// Set the parent process
    pub fn parent(mut self, parent: Reference) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add an input
    pub fn input(mut self, input: Reference) -> Self {
        self.inputs.push(input);
        self
    }

    /// Add inputs, keeping their order
    pub fn inputs(mut self, inputs: impl IntoIterator<Item = Reference>) -> Self {
        self.inputs.extend(inputs);
        self
    }

    /// Add an output
    pub fn output(mut self, output: Reference) -> Self {
        self.outputs.push(output);
        self
    }

    /// Add outputs, keeping their order
    pub fn outputs(mut self, outputs: impl IntoIterator<Item = Reference>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    /// Override the fingerprint layout and hash
    pub fn fingerprinter(mut self, fingerprinter: Fingerprinter) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    /// The qualified name the process will receive
    pub fn qualified_name(&self) -> String {
        self.fingerprinter.generate(&ProcessIdentity {
            name: &self.name,
            connection_qualified_name: &self.connection_qualified_name,
            explicit_id: self.explicit_id.as_deref(),
            parent: self.parent.as_ref(),
            inputs: &self.inputs,
            outputs: &self.outputs,
        })
    }

    /// Build the process asset.
    ///
    /// The parent always participates in the fingerprint; it is stored as a
    /// relationship only for types that declare a parent field.
    pub fn build(self, guids: &dyn GuidGenerator) -> Result<Asset> {
        if self.asset_type.parent_field.is_some() && self.parent.is_none() {
            return Err(IdentityError::InvalidArgument(format!(
                "{} requires a parent process",
                self.asset_type.type_name
            )));
        }

        let qualified_name = self.qualified_name();
        debug!(
            type_name = self.asset_type.type_name,
            %qualified_name,
            explicit_id = self.explicit_id.is_some(),
            "derived process identity"
        );

        let mut builder = Asset::builder(self.asset_type.type_name)
            .guid(guids.next_guid())
            .name(self.name)
            .qualified_name(qualified_name)
            .relationships(INPUTS_FIELD, self.inputs)
            .relationships(OUTPUTS_FIELD, self.outputs);

        if let Some(connector) = connector_of(&self.connection_qualified_name) {
            builder = builder.connector_name(connector);
        }
        builder = builder.connection_qualified_name(self.connection_qualified_name);

        if let (Some(field), Some(parent)) = (self.asset_type.parent_field, self.parent) {
            builder = builder.relationship(field, parent);
        }

        Ok(builder.build())
    }
}

impl Asset {
    /// Start building a `Process`
    pub fn process_creator(
        name: impl Into<String>,
        connection_qualified_name: impl Into<String>,
    ) -> Result<ProcessCreator> {
        ProcessCreator::new("Process", name, connection_qualified_name)
    }

    /// Start building a `ColumnProcess` under `parent`
    pub fn column_process_creator(
        name: impl Into<String>,
        connection_qualified_name: impl Into<String>,
        parent: Reference,
    ) -> Result<ProcessCreator> {
        Ok(ProcessCreator::new("ColumnProcess", name, connection_qualified_name)?.parent(parent))
    }
}
