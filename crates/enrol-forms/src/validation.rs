//! Form field validators.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use crate::field::{FieldName, FieldValue};
use crate::messages::{Messages, ENGLISH};

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern compiles"));

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").expect("date pattern compiles")
});

static DEFAULT_VALIDATOR: LazyLock<FieldValidator> =
    LazyLock::new(|| FieldValidator::new(&ENGLISH));

/// Trait for field validators.
pub trait Validator: Send + Sync {
    /// Validates a value and returns an error message if invalid.
    fn validate(&self, value: &str) -> Result<(), String>;

    /// Returns the error message for this validator.
    fn message(&self) -> &str;
}

/// Validator that requires a non-blank value.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a new RequiredValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "This field is required.".to_string(),
        }
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for RequiredValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for RequiredValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator that requires a minimum number of whitespace-separated words.
#[derive(Debug, Clone)]
pub struct MinWordsValidator {
    min_words: usize,
    message: String,
}

impl MinWordsValidator {
    /// Creates a new MinWordsValidator.
    pub fn new(min_words: usize) -> Self {
        Self {
            min_words,
            message: format!("Enter at least {min_words} words."),
        }
    }

    /// Creates a new MinWordsValidator with custom message.
    pub fn with_message(min_words: usize, message: impl Into<String>) -> Self {
        Self {
            min_words,
            message: message.into(),
        }
    }
}

impl Validator for MinWordsValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if value.split_whitespace().count() < self.min_words {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Validator for email addresses.
///
/// Deliberately loose: something, `@`, something, `.`, something, with no
/// whitespace inside each part.
#[derive(Debug, Clone)]
pub struct EmailValidator {
    message: String,
}

impl EmailValidator {
    /// Creates a new EmailValidator with default message.
    pub fn new() -> Self {
        Self {
            message: "Enter a valid email address.".to_string(),
        }
    }

    /// Creates a new EmailValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for EmailValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for EmailValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        if EMAIL_PATTERN.is_match(value.trim()) {
            Ok(())
        } else {
            Err(self.message.clone())
        }
    }

    fn message(&self) -> &str {
        &self.message
    }
}

/// Why a birth date was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateError {
    /// Text is not exactly `DD/MM/YYYY`.
    #[error("date must be in DD/MM/YYYY format")]
    Format,

    /// Year outside 1000..=3000 or month outside 1..=12.
    #[error("year or month out of range")]
    OutOfRange,

    /// Day does not exist in the given month.
    #[error("not a calendar date")]
    NotACalendarDate,
}

/// Parses a strict `DD/MM/YYYY` date.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateError> {
    let caps = DATE_PATTERN.captures(text).ok_or(DateError::Format)?;

    let day: u32 = caps[1].parse().map_err(|_| DateError::Format)?;
    let month: u32 = caps[2].parse().map_err(|_| DateError::Format)?;
    let year: i32 = caps[3].parse().map_err(|_| DateError::Format)?;

    if !(1000..=3000).contains(&year) || !(1..=12).contains(&month) {
        return Err(DateError::OutOfRange);
    }

    NaiveDate::from_ymd_opt(year, month, day).ok_or(DateError::NotACalendarDate)
}

/// Validator for `DD/MM/YYYY` dates.
#[derive(Debug, Clone)]
pub struct DateValidator {
    format_message: String,
    invalid_message: String,
}

impl DateValidator {
    /// Creates a new DateValidator with default messages.
    pub fn new() -> Self {
        Self::with_messages(ENGLISH.birth_date_format, ENGLISH.birth_date_invalid)
    }

    /// Creates a new DateValidator with custom messages for malformed
    /// text and for impossible dates.
    pub fn with_messages(
        format_message: impl Into<String>,
        invalid_message: impl Into<String>,
    ) -> Self {
        Self {
            format_message: format_message.into(),
            invalid_message: invalid_message.into(),
        }
    }
}

impl Default for DateValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator for DateValidator {
    fn validate(&self, value: &str) -> Result<(), String> {
        match parse_date(value) {
            Ok(_) => Ok(()),
            Err(DateError::Format) => Err(self.format_message.clone()),
            Err(DateError::OutOfRange | DateError::NotACalendarDate) => {
                Err(self.invalid_message.clone())
            }
        }
    }

    fn message(&self) -> &str {
        &self.format_message
    }
}

/// The validation rules of the registration form.
///
/// Text fields run their validators in order and report the first failure.
/// The terms checkbox is valid only when it holds `true`.
pub struct FieldValidator {
    messages: Messages,
    text_rules: BTreeMap<FieldName, Vec<Box<dyn Validator>>>,
}

impl std::fmt::Debug for FieldValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldValidator")
            .field("messages", &self.messages)
            .finish_non_exhaustive()
    }
}

impl FieldValidator {
    /// Builds the rules using the given message catalogue.
    pub fn new(messages: &Messages) -> Self {
        let mut text_rules: BTreeMap<FieldName, Vec<Box<dyn Validator>>> = BTreeMap::new();

        text_rules.insert(
            FieldName::FullName,
            vec![
                Box::new(RequiredValidator::with_message(messages.full_name_required)),
                Box::new(MinWordsValidator::with_message(
                    2,
                    messages.full_name_two_words,
                )),
            ],
        );
        text_rules.insert(
            FieldName::BirthDate,
            vec![
                Box::new(RequiredValidator::with_message(messages.birth_date_required)),
                Box::new(DateValidator::with_messages(
                    messages.birth_date_format,
                    messages.birth_date_invalid,
                )),
            ],
        );
        text_rules.insert(
            FieldName::Email,
            vec![
                Box::new(RequiredValidator::with_message(messages.email_required)),
                Box::new(EmailValidator::with_message(messages.email_invalid)),
            ],
        );
        text_rules.insert(
            FieldName::Department,
            vec![Box::new(RequiredValidator::with_message(
                messages.department_required,
            ))],
        );

        Self {
            messages: *messages,
            text_rules,
        }
    }

    /// Returns the catalogue the rules were built from.
    pub const fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Validates a value for a field, returning the error message if invalid.
    pub fn validate(&self, field: FieldName, value: &FieldValue) -> Option<String> {
        if field.is_boolean() {
            return (value.as_bool() != Some(true))
                .then(|| self.messages.terms_required.to_string());
        }

        let rules = self.text_rules.get(&field)?;
        let Some(text) = value.as_text() else {
            // A non-text value for a text field counts as missing.
            return rules.first().map(|rule| rule.message().to_string());
        };

        rules.iter().find_map(|rule| rule.validate(text).err())
    }

    /// Validates by wire name; names outside the form always pass.
    pub fn validate_named(&self, name: &str, value: &FieldValue) -> Option<String> {
        name.parse::<FieldName>()
            .ok()
            .and_then(|field| self.validate(field, value))
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new(&ENGLISH)
    }
}

/// Validates a field by wire name with the English catalogue.
pub fn validate_field(name: &str, value: &FieldValue) -> Option<String> {
    DEFAULT_VALIDATOR.validate_named(name, value)
}

/// Validates a `DD/MM/YYYY` date with the English catalogue.
pub fn validate_date(text: &str) -> Option<String> {
    DateValidator::new().validate(text).err()
}
