//! # enrol-forms
//!
//! Registration form state, field validation and Bootstrap 5 rendering.
//!
//! This crate provides:
//! - Field validators for name, birth date, email, department and terms
//! - The per-field state model (value, touched, error) and its transitions
//! - Department list conversion from the remote JSON document
//! - English and Polish message catalogues
//! - Bootstrap 5 widgets and page rendering
//!
//! ## Validation
//!
//! ```rust
//! use enrol_forms::{validate_field, FieldValue};
//!
//! assert!(validate_field("fullName", &FieldValue::from("Jan Kowalski")).is_none());
//! assert!(validate_field("email", &FieldValue::from("a@b")).is_some());
//! assert!(validate_field("termsOfUse", &FieldValue::Bool(true)).is_none());
//! ```
//!
//! ## Form state
//!
//! ```rust
//! use enrol_forms::{FieldName, FieldValidator, FormState};
//!
//! let validator = FieldValidator::default();
//! let mut form = FormState::new();
//!
//! form.on_change(&validator, FieldName::Email, "jan".into());
//! // Errors stay hidden until the field loses focus.
//! assert!(form.visible_error(FieldName::Email).is_none());
//!
//! form.on_blur(FieldName::Email);
//! assert!(form.visible_error(FieldName::Email).is_some());
//!
//! // Submission revalidates everything, touched or not.
//! assert!(form.prepare_submission(&validator).is_err());
//! ```

pub mod department;
mod error;
pub mod field;
pub mod messages;
pub mod render;
pub mod state;
pub mod validation;
pub mod widgets;

pub use department::{departments_from_json, Department, DepartmentsState};
pub use error::{FormError, Result, ValidationErrors};
pub use field::{BooleanFieldState, FieldName, FieldState, FieldValue, TextFieldState};
pub use messages::{Locale, Messages};
pub use render::{render_page, render_registration_form, Notice, PageContext};
pub use state::{FormState, RegistrationPayload};
pub use validation::{parse_date, validate_date, validate_field, DateError, FieldValidator};
