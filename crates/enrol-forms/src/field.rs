//! Field identities, raw values and per-field state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// The fields of the registration form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    /// First and last name.
    FullName,
    /// Birth date as `DD/MM/YYYY`.
    BirthDate,
    /// Email address.
    Email,
    /// Selected department id.
    Department,
    /// Terms-of-use acceptance checkbox.
    TermsOfUse,
}

impl FieldName {
    /// All fields in display order.
    pub const ALL: [Self; 5] = [
        Self::FullName,
        Self::BirthDate,
        Self::Email,
        Self::Department,
        Self::TermsOfUse,
    ];

    /// Returns the wire name used in HTML `name` attributes and JSON payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::BirthDate => "birthDate",
            Self::Email => "email",
            Self::Department => "department",
            Self::TermsOfUse => "termsOfUse",
        }
    }

    /// Returns the DOM id of the input element.
    pub const fn dom_id(self) -> &'static str {
        match self {
            Self::FullName => "user-name",
            Self::BirthDate => "user-birth-date",
            Self::Email => "user-email",
            Self::Department => "user-department",
            Self::TermsOfUse => "form-terms",
        }
    }

    /// Whether the field holds a boolean rather than text.
    pub const fn is_boolean(self) -> bool {
        matches!(self, Self::TermsOfUse)
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw value as produced by an input element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Bool(bool),
    /// Text input or select value.
    Text(String),
}

impl FieldValue {
    /// Returns the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Bool(_) => None,
        }
    }

    /// Returns the flag, if this is a boolean value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            Self::Text(_) => None,
        }
    }

    /// Interprets the value as a text input would see it.
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Bool(flag) => flag.to_string(),
        }
    }

    /// Interprets the value as a checkbox would see it.
    ///
    /// Posted checkbox values arrive as text; `true`, `on` and `1` mean checked.
    pub fn into_checked(self) -> bool {
        match self {
            Self::Bool(flag) => flag,
            Self::Text(text) => matches!(text.as_str(), "true" | "on" | "1"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Interaction and validation state of a single field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState<T> {
    /// Current value.
    pub value: T,
    /// Whether the user has left the field at least once.
    pub touched: bool,
    /// Error computed from the current value.
    pub error: Option<String>,
}

impl<T> FieldState<T> {
    /// Creates an untouched field holding `value`.
    pub const fn new(value: T) -> Self {
        Self {
            value,
            touched: false,
            error: None,
        }
    }

    /// Returns the error only once the field has been touched.
    pub fn visible_error(&self) -> Option<&str> {
        if self.touched {
            self.error.as_deref()
        } else {
            None
        }
    }
}

/// State of a text or select field.
pub type TextFieldState = FieldState<String>;

/// State of a checkbox field.
pub type BooleanFieldState = FieldState<bool>;
