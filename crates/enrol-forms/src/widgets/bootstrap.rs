//! Bootstrap 5 controls.

use crate::department::Department;
use crate::field::{FieldName, FieldValue};

use super::{escape_attr, InputAttrs, Widget};

/// `<input>` for the free-text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextInput {
    kind: &'static str,
    placeholder: Option<&'static str>,
}

impl TextInput {
    pub const fn text(placeholder: Option<&'static str>) -> Self {
        Self {
            kind: "text",
            placeholder,
        }
    }

    pub const fn email(placeholder: Option<&'static str>) -> Self {
        Self {
            kind: "email",
            placeholder,
        }
    }
}

impl Widget for TextInput {
    fn render(&self, field: FieldName, value: &FieldValue, attrs: &InputAttrs) -> String {
        let text = value.as_text().unwrap_or_default();
        let placeholder = self
            .placeholder
            .map(|p| format!(r#" placeholder="{}""#, escape_attr(p)))
            .unwrap_or_default();

        format!(
            r#"<input type="{}" class="{}" name="{}" value="{}"{}{placeholder}>"#,
            self.kind,
            attrs.class("form-control"),
            field.as_str(),
            escape_attr(text),
            attrs.common(),
        )
    }
}

/// `<select>` over the loaded departments.
///
/// The placeholder option is disabled and hidden, so it only shows while
/// nothing has been chosen. Option values are department ids.
#[derive(Debug, Clone, Copy)]
pub struct DepartmentSelect<'a> {
    departments: &'a [Department],
    placeholder: &'static str,
}

impl<'a> DepartmentSelect<'a> {
    pub const fn new(departments: &'a [Department], placeholder: &'static str) -> Self {
        Self {
            departments,
            placeholder,
        }
    }
}

impl Widget for DepartmentSelect<'_> {
    fn render(&self, field: FieldName, value: &FieldValue, attrs: &InputAttrs) -> String {
        let chosen = value.as_text().unwrap_or_default();
        let selected = |yes: bool| if yes { " selected" } else { "" };

        let mut html = format!(
            r#"<select class="{}" name="{}"{}><option value="" disabled hidden{}>{}</option>"#,
            attrs.class("form-select"),
            field.as_str(),
            attrs.common(),
            selected(chosen.is_empty()),
            escape_attr(self.placeholder),
        );
        for department in self.departments {
            html.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_attr(&department.id),
                selected(department.id == chosen),
                escape_attr(&department.name),
            ));
        }
        html.push_str("</select>");
        html
    }
}

/// The terms-of-use checkbox. Posts `true` when checked.
///
/// Only the input is rendered; the `form-check` wrapper and label belong to
/// the page layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermsCheckbox;

impl Widget for TermsCheckbox {
    fn render(&self, field: FieldName, value: &FieldValue, attrs: &InputAttrs) -> String {
        let checked = if value.clone().into_checked() {
            " checked"
        } else {
            ""
        };

        format!(
            r#"<input type="checkbox" class="{}" name="{}" value="true"{}{checked}>"#,
            attrs.class("form-check-input"),
            field.as_str(),
            attrs.common(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input() {
        let html = TextInput::text(Some("DD/MM/YYYY")).render(
            FieldName::BirthDate,
            &FieldValue::from("01/02/2000"),
            &InputAttrs::new("user-birth-date"),
        );
        assert_eq!(
            html,
            r#"<input type="text" class="form-control" name="birthDate" value="01/02/2000" id="user-birth-date" placeholder="DD/MM/YYYY">"#
        );
    }

    #[test]
    fn test_email_input_escapes_value() {
        let html = TextInput::email(None).render(
            FieldName::Email,
            &FieldValue::from(r#""><script>"#),
            &InputAttrs::new("user-email").invalid(true),
        );
        assert!(html.starts_with(r#"<input type="email" class="form-control is-invalid""#));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_department_select() {
        let departments = [Department::new("d1", "Sales"), Department::new("d2", "R&D")];
        let select = DepartmentSelect::new(&departments, "Choose");

        let html = select.render(
            FieldName::Department,
            &FieldValue::from(""),
            &InputAttrs::new("user-department"),
        );
        assert!(html.contains(r#"<option value="" disabled hidden selected>Choose</option>"#));
        assert!(html.contains(r#"<option value="d2">R&amp;D</option>"#));

        let html = select.render(
            FieldName::Department,
            &FieldValue::from("d2"),
            &InputAttrs::new("user-department"),
        );
        assert!(html.contains(r#"<option value="" disabled hidden>Choose</option>"#));
        assert!(html.contains(r#"<option value="d2" selected>"#));
        assert!(html.find("d1").unwrap() < html.find("d2").unwrap());
    }

    #[test]
    fn test_terms_checkbox() {
        let attrs = InputAttrs::new("form-terms");
        let html = TermsCheckbox.render(FieldName::TermsOfUse, &FieldValue::Bool(true), &attrs);
        assert!(html.contains(r#"class="form-check-input""#));
        assert!(html.ends_with(" checked>"));

        let html = TermsCheckbox.render(FieldName::TermsOfUse, &FieldValue::Bool(false), &attrs);
        assert!(!html.contains("checked"));
    }
}
