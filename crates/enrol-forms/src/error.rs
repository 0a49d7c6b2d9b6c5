//! Error types for forms.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::field::FieldName;

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// Validation failed with errors.
    #[error("validation errors: {0}")]
    Validation(ValidationErrors),

    /// A field name that is not part of the registration form.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// A locale code with no message catalogue.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// The department document had an unexpected shape.
    #[error("malformed department list: {0}")]
    MalformedDepartments(String),
}

/// Collection of validation errors by field.
///
/// Iteration follows the order of the fields on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    /// Errors keyed by field.
    pub errors: BTreeMap<FieldName, Vec<String>>,
}

impl ValidationErrors {
    /// Creates a new empty ValidationErrors.
    pub fn new() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: FieldName, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    pub fn get(&self, field: FieldName) -> Option<&Vec<String>> {
        self.errors.get(&field)
    }

    /// Returns the failing fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.errors.keys().copied()
    }

    /// Returns all errors as a flat list.
    pub fn all_errors(&self) -> Vec<(FieldName, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |msg| (*field, msg.as_str())))
            .collect()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, message) in self.all_errors() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<ValidationErrors> for FormError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
