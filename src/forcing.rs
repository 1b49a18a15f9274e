//! Typed model of the forcing-description file shipped with each experiment.

use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::types::FieldName;

/// Top-level `forcing.json` document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ForcingConfig {
    /// Free-form description of the forcing product.
    #[serde(default)]
    pub description: String,
    /// Forcing inputs supplied to the model, in coupling order.
    pub inputs: Vec<ForcingInput>,
}

/// One forcing input entry.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ForcingInput {
    /// Data file pattern the field is read from.
    pub filename: String,
    /// Variable name within the data file.
    pub fieldname: String,
    /// Coupling name the model exchanges the field under.
    pub cname: FieldName,
}

impl ForcingConfig {
    /// Read and parse the forcing description at `path`.
    pub fn read(path: &Path) -> Result<Self, HarnessError> {
        let text = fs::read_to_string(path)
            .map_err(|err| HarnessError::Config(format!("cannot read '{}': {err}", path.display())))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Number of configured forcing inputs.
    pub fn field_count(&self) -> usize {
        self.inputs.len()
    }

    /// Coupling names in configuration order, without duplicates.
    pub fn coupling_names(&self) -> IndexSet<FieldName> {
        self.inputs
            .iter()
            .map(|input| input.cname.clone())
            .collect()
    }
}
