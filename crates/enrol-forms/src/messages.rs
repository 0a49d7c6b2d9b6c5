//! Message catalogues for validation errors and form labels.

use std::str::FromStr;

use crate::error::FormError;
use crate::field::FieldName;

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Polish.
    Pl,
}

impl Locale {
    /// Returns the language code used in the `lang` attribute.
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pl => "pl",
        }
    }

    /// Returns the message catalogue for this locale.
    pub const fn messages(self) -> &'static Messages {
        match self {
            Self::En => &ENGLISH,
            Self::Pl => &POLISH,
        }
    }
}

impl FromStr for Locale {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "pl" => Ok(Self::Pl),
            _ => Err(FormError::UnknownLocale(s.to_string())),
        }
    }
}

/// All user-visible text of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub full_name_required: &'static str,
    pub full_name_two_words: &'static str,
    pub birth_date_required: &'static str,
    pub birth_date_format: &'static str,
    pub birth_date_invalid: &'static str,
    pub email_required: &'static str,
    pub email_invalid: &'static str,
    pub department_required: &'static str,
    pub terms_required: &'static str,

    pub page_title: &'static str,
    pub full_name_label: &'static str,
    pub birth_date_label: &'static str,
    pub email_label: &'static str,
    pub department_label: &'static str,
    pub terms_label: &'static str,
    pub full_name_placeholder: &'static str,
    pub birth_date_placeholder: &'static str,
    pub email_placeholder: &'static str,
    pub department_placeholder: &'static str,
    pub submit_label: &'static str,

    pub submit_success: &'static str,
    pub submit_invalid: &'static str,
    pub submit_failed: &'static str,
    pub submit_in_progress: &'static str,
    pub departments_unavailable: &'static str,
}

impl Messages {
    /// Returns the label shown next to a field.
    pub const fn label(&self, field: FieldName) -> &'static str {
        match field {
            FieldName::FullName => self.full_name_label,
            FieldName::BirthDate => self.birth_date_label,
            FieldName::Email => self.email_label,
            FieldName::Department => self.department_label,
            FieldName::TermsOfUse => self.terms_label,
        }
    }

    /// Returns the placeholder of a text input, if it has one.
    pub const fn placeholder(&self, field: FieldName) -> Option<&'static str> {
        match field {
            FieldName::FullName => Some(self.full_name_placeholder),
            FieldName::BirthDate => Some(self.birth_date_placeholder),
            FieldName::Email => Some(self.email_placeholder),
            FieldName::Department | FieldName::TermsOfUse => None,
        }
    }
}

impl Default for Messages {
    fn default() -> Self {
        ENGLISH
    }
}

/// English catalogue.
pub const ENGLISH: Messages = Messages {
    full_name_required: "Full name is required.",
    full_name_two_words: "Please provide first and last name.",
    birth_date_required: "Birth date is required.",
    birth_date_format: "Date must be in DD/MM/YYYY format.",
    birth_date_invalid: "Invalid date. Please enter a valid date in DD/MM/YYYY format.",
    email_required: "Email address is required.",
    email_invalid: "Please provide a valid email address.",
    department_required: "Department is required.",
    terms_required: "You must accept the terms of use.",

    page_title: "Registration",
    full_name_label: "Full name",
    birth_date_label: "Birth date",
    email_label: "Email",
    department_label: "Department",
    terms_label: "I accept the terms of use",
    full_name_placeholder: "Full name",
    birth_date_placeholder: "DD/MM/YYYY",
    email_placeholder: "user@example.com",
    department_placeholder: "Choose a department",
    submit_label: "Save",

    submit_success: "Your details have been saved.",
    submit_invalid: "Could not save. Please correct the errors in the form.",
    submit_failed: "Could not save your details. Please try again.",
    submit_in_progress: "Your details are already being saved.",
    departments_unavailable: "Departments could not be loaded. Reload the page to try again.",
};

/// Polish catalogue.
pub const POLISH: Messages = Messages {
    full_name_required: "Imię i nazwisko jest wymagane.",
    full_name_two_words: "Proszę podać imię i nazwisko.",
    birth_date_required: "Data urodzenia jest wymagana.",
    birth_date_format: "Data musi mieć DD/MM/RRRR format.",
    birth_date_invalid: "Nieprawidłowa data. Podaj poprawną datę w formacie DD/MM/RRRR.",
    email_required: "Adres email jest wymagany.",
    email_invalid: "Proszę podać poprawny adres email.",
    department_required: "Podanie wydziału jest wymagane.",
    terms_required: "Zaakceptowanie regulaminu jest wymagane.",

    page_title: "Rejestracja",
    full_name_label: "Imię i nazwisko",
    birth_date_label: "Data urodzenia",
    email_label: "Email",
    department_label: "Wydział",
    terms_label: "Akceptuję regulamin",
    full_name_placeholder: "Imię i nazwisko",
    birth_date_placeholder: "DD/MM/YYYY",
    email_placeholder: "user@example.com",
    department_placeholder: "Wybierz oddział",
    submit_label: "Zapisz",

    submit_success: "Dane zostały poprawnie zapisane.",
    submit_invalid: "Nie udało się zapisać. Popraw błędy w formularzu.",
    submit_failed: "Nie udało się zapisać danych. Spróbuj ponownie.",
    submit_in_progress: "Dane są już zapisywane.",
    departments_unavailable: "Nie udało się pobrać listy wydziałów. Odśwież stronę.",
};
