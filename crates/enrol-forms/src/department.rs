//! Departments offered in the select field.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{FormError, Result};

/// A selectable department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Key of the record in the source document; submitted as the field value.
    pub id: String,
    /// Display name.
    pub name: String,
}

impl Department {
    /// Creates a department.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Converts a `{ id: { name, .. }, .. }` document into an ordered list.
///
/// Order follows the keys as they appear in the document. A `null` document
/// means no departments. Records without a string `name` are skipped.
pub fn departments_from_json(document: &Value) -> Result<Vec<Department>> {
    let records = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Object(records) => records,
        other => {
            return Err(FormError::MalformedDepartments(format!(
                "expected an object keyed by id, got {}",
                json_kind(other)
            )))
        }
    };

    let departments = records
        .iter()
        .filter_map(|(id, record)| match record.get("name").and_then(Value::as_str) {
            Some(name) => Some(Department::new(id, name)),
            None => {
                warn!(id = %id, "skipping department without a name");
                None
            }
        })
        .collect();

    Ok(departments)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load status of the department list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DepartmentsState {
    /// The list has not arrived yet.
    #[default]
    Loading,
    /// The list arrived.
    Loaded(Vec<Department>),
    /// Loading failed; holds a description for logs.
    Failed(String),
}

impl DepartmentsState {
    /// Returns the loaded departments, or an empty slice.
    pub fn departments(&self) -> &[Department] {
        match self {
            Self::Loaded(departments) => departments,
            Self::Loading | Self::Failed(_) => &[],
        }
    }

    /// Whether loading failed.
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
