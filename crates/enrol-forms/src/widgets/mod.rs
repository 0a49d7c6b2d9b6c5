//! HTML controls for the registration fields.

mod bootstrap;

pub use bootstrap::{DepartmentSelect, TermsCheckbox, TextInput};

use crate::field::{FieldName, FieldValue};

/// Per-render attributes shared by every control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputAttrs {
    /// DOM id of the control.
    pub id: String,
    /// Whether the field currently shows an error.
    pub invalid: bool,
    /// Id of the element holding the field's error text.
    pub described_by: Option<String>,
}

impl InputAttrs {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            invalid: false,
            described_by: None,
        }
    }

    /// Marks the control invalid.
    #[must_use]
    pub const fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    /// Links the control to its feedback element.
    #[must_use]
    pub fn described_by(mut self, id: impl Into<String>) -> Self {
        self.described_by = Some(id.into());
        self
    }

    /// `base` plus Bootstrap's `is-invalid` when the field shows an error.
    fn class(&self, base: &str) -> String {
        if self.invalid {
            format!("{base} is-invalid")
        } else {
            base.to_string()
        }
    }

    /// The `id` attribute and, if set, `aria-describedby`.
    fn common(&self) -> String {
        let mut out = format!(r#" id="{}""#, escape_attr(&self.id));
        if let Some(feedback) = &self.described_by {
            out.push_str(&format!(r#" aria-describedby="{}""#, escape_attr(feedback)));
        }
        if self.invalid {
            out.push_str(r#" aria-invalid="true""#);
        }
        out
    }
}

/// A control that renders one registration field.
pub trait Widget {
    /// Renders the control for `field` holding `value`.
    fn render(&self, field: FieldName, value: &FieldValue, attrs: &InputAttrs) -> String;
}

/// Escapes text for use inside a double-quoted attribute or element body.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
