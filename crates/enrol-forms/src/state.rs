//! Form state and its transitions.
//!
//! [`FormState`] holds one [`FieldState`] per field and is only mutated
//! through [`FormState::on_change`], [`FormState::on_blur`] and the
//! submission helpers. Errors are recomputed from the value on every change;
//! whether an error is shown depends on `touched`, which only ever goes from
//! `false` to `true` until [`FormState::reset`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationErrors;
use crate::field::{BooleanFieldState, FieldName, FieldValue, TextFieldState};
use crate::validation::FieldValidator;

/// The flattened submission body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub full_name: String,
    pub birth_date: String,
    pub email: String,
    pub department: String,
    pub terms_of_use: bool,
}

/// State of the whole registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub full_name: TextFieldState,
    pub birth_date: TextFieldState,
    pub email: TextFieldState,
    pub department: TextFieldState,
    pub terms_of_use: BooleanFieldState,
}

impl FormState {
    /// Creates an empty, untouched form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new value for `field` and recomputes its error.
    ///
    /// `touched` is left as it is.
    pub fn on_change(&mut self, validator: &FieldValidator, field: FieldName, value: FieldValue) {
        if let Some(state) = self.text_field_mut(field) {
            state.value = value.into_text();
            state.error = validator.validate(field, &FieldValue::Text(state.value.clone()));
        } else {
            let checked = value.into_checked();
            self.terms_of_use.value = checked;
            self.terms_of_use.error = validator.validate(field, &FieldValue::Bool(checked));
        }
    }

    /// Marks `field` as touched.
    pub fn on_blur(&mut self, field: FieldName) {
        match self.text_field_mut(field) {
            Some(state) => state.touched = true,
            None => self.terms_of_use.touched = true,
        }
    }

    /// Marks every field as touched so all current errors become visible.
    pub fn touch_all(&mut self) {
        for field in FieldName::ALL {
            self.on_blur(field);
        }
    }

    /// Returns the form to its initial empty, untouched state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the current value of a field.
    pub fn value(&self, field: FieldName) -> FieldValue {
        match self.text_field(field) {
            Some(state) => FieldValue::Text(state.value.clone()),
            None => FieldValue::Bool(self.terms_of_use.value),
        }
    }

    /// Returns the text value of a text field, or `None` for the checkbox.
    pub fn text(&self, field: FieldName) -> Option<&str> {
        self.text_field(field).map(|state| state.value.as_str())
    }

    /// Returns the stored error of a field, regardless of `touched`.
    pub fn error(&self, field: FieldName) -> Option<&str> {
        match self.text_field(field) {
            Some(state) => state.error.as_deref(),
            None => self.terms_of_use.error.as_deref(),
        }
    }

    /// Whether the field has been touched.
    pub fn is_touched(&self, field: FieldName) -> bool {
        match self.text_field(field) {
            Some(state) => state.touched,
            None => self.terms_of_use.touched,
        }
    }

    /// Returns the error that should be shown for a field.
    pub fn visible_error(&self, field: FieldName) -> Option<&str> {
        match self.text_field(field) {
            Some(state) => state.visible_error(),
            None => self.terms_of_use.visible_error(),
        }
    }

    /// Revalidates every field against its current value.
    ///
    /// Stored errors are not consulted, so a field that was never changed is
    /// still checked.
    pub fn validate_all(&self, validator: &FieldValidator) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in FieldName::ALL {
            if let Some(message) = validator.validate(field, &self.value(field)) {
                errors.add(field, message);
            }
        }
        errors
    }

    /// Revalidates every field and, if all pass, flattens the values.
    ///
    /// Fields that fail get their stored error refreshed so the form can show
    /// them once touched.
    pub fn prepare_submission(
        &mut self,
        validator: &FieldValidator,
    ) -> Result<RegistrationPayload, ValidationErrors> {
        let errors = self.validate_all(validator);
        if !errors.is_empty() {
            for field in FieldName::ALL {
                let message = errors.get(field).and_then(|m| m.first()).cloned();
                match self.text_field_mut(field) {
                    Some(state) => state.error = message,
                    None => self.terms_of_use.error = message,
                }
            }
            return Err(errors);
        }

        Ok(RegistrationPayload {
            full_name: self.full_name.value.clone(),
            birth_date: self.birth_date.value.clone(),
            email: self.email.value.clone(),
            department: self.department.value.clone(),
            terms_of_use: self.terms_of_use.value,
        })
    }

    const fn text_field(&self, field: FieldName) -> Option<&TextFieldState> {
        match field {
            FieldName::FullName => Some(&self.full_name),
            FieldName::BirthDate => Some(&self.birth_date),
            FieldName::Email => Some(&self.email),
            FieldName::Department => Some(&self.department),
            FieldName::TermsOfUse => None,
        }
    }

    fn text_field_mut(&mut self, field: FieldName) -> Option<&mut TextFieldState> {
        match field {
            FieldName::FullName => Some(&mut self.full_name),
            FieldName::BirthDate => Some(&mut self.birth_date),
            FieldName::Email => Some(&mut self.email),
            FieldName::Department => Some(&mut self.department),
            FieldName::TermsOfUse => None,
        }
    }
}
