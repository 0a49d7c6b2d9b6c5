//! Bootstrap 5 rendering of the registration form.

use ironhtml::html;
use ironhtml::typed::{Document, Element};
use ironhtml_elements::{Body, Div, Head, Html, Li, Link, Meta, Script, Title, Ul};

use crate::department::{Department, DepartmentsState};
use crate::field::FieldName;
use crate::messages::{Locale, Messages};
use crate::state::FormState;
use crate::widgets::{DepartmentSelect, InputAttrs, TermsCheckbox, TextInput, Widget};

/// DOM id of the `<form>` element.
pub const FORM_ID: &str = "registration-form";

const BOOTSTRAP_CSS: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css";

const BANNER_STYLE: &str = "position: fixed; top: 20px; right: 20px; z-index: 1050";

// Forwards input and blur events to /events one at a time, in order, and
// mirrors each answer in the field's feedback element; removes the success
// banner after its delay.
const JS: &str = "\
const form=document.getElementById('registration-form');\
let queue=Promise.resolve();\
function send(kind,el){\
const value=el.type==='checkbox'?el.checked:el.value;\
queue=queue.then(()=>fetch('/events',{method:'POST',\
headers:{'Content-Type':'application/json'},\
body:JSON.stringify({kind:kind,field:el.name,value:value})}))\
.then(r=>r.ok?r.json():null).then(s=>{if(!s){return;}\
const fb=document.getElementById(el.id+'-feedback');\
el.classList.toggle('is-invalid',s.visible);\
if(fb){fb.textContent=s.visible?s.error:'';}}).catch(()=>{});}\
if(form){form.querySelectorAll('input,select').forEach(el=>{\
const live=el.type==='checkbox'||el.tagName==='SELECT'?'change':'input';\
el.addEventListener(live,()=>send('change',el));\
el.addEventListener('blur',()=>send('blur',el));});}\
document.querySelectorAll('[data-dismiss-ms]').forEach(el=>{\
setTimeout(()=>el.remove(),parseInt(el.dataset.dismissMs,10));});";

/// A form-level message shown above the fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Submission was blocked; lists the failing fields.
    ValidationFailed(Vec<FieldName>),
    /// The remote endpoint rejected the submission or could not be reached.
    SubmissionFailed,
    /// A submission for this form is still in flight.
    SubmissionInProgress,
}

/// Everything needed to render the registration page.
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    /// Current form state.
    pub state: &'a FormState,
    /// Department list or its load status.
    pub departments: &'a DepartmentsState,
    /// Interface language.
    pub locale: Locale,
    /// Text of the success banner, if it is showing.
    pub banner: Option<&'a str>,
    /// Milliseconds left before the banner hides itself.
    pub banner_remaining_ms: u64,
    /// Form-level notice.
    pub notice: Option<&'a Notice>,
    /// Form `action` URL.
    pub action: &'a str,
}

impl PageContext<'_> {
    const fn messages(&self) -> &'static Messages {
        self.locale.messages()
    }
}

/// Renders one field: label, widget and its feedback element.
///
/// The feedback element is always present so client-side updates have a
/// target; it only carries text when the error is visible.
pub fn render_field(
    field: FieldName,
    state: &FormState,
    departments: &[Department],
    messages: &Messages,
) -> String {
    let id = field.dom_id().to_string();
    let feedback_id = format!("{id}-feedback");
    let error = state.visible_error(field);

    let attrs = InputAttrs::new(id.as_str())
        .described_by(feedback_id.as_str())
        .invalid(error.is_some());

    let label_text = messages.label(field).to_string();
    let error_text = error.unwrap_or("");
    let value = state.value(field);

    if field.is_boolean() {
        let widget_html = TermsCheckbox.render(field, &value, &attrs);
        let label_el = html! {
            label.class("form-check-label").for_(#id) { #label_text }
        };
        return html! { div.class("form-check mb-3") }
            .raw(&widget_html)
            .raw(label_el.render())
            .child::<Div, _>(|d| {
                d.class("invalid-feedback")
                    .attr("id", feedback_id.as_str())
                    .text(error_text)
            })
            .render();
    }

    let widget_html = match field {
        FieldName::Department => DepartmentSelect::new(departments, messages.department_placeholder)
            .render(field, &value, &attrs),
        FieldName::Email => {
            TextInput::email(messages.placeholder(field)).render(field, &value, &attrs)
        }
        _ => TextInput::text(messages.placeholder(field)).render(field, &value, &attrs),
    };
    let label_el = html! {
        label.for_(#id).class("form-label") { #label_text }
    };

    html! { div.class("mb-3") }
        .raw(label_el.render())
        .raw(&widget_html)
        .child::<Div, _>(|d| {
            d.class("invalid-feedback")
                .attr("id", feedback_id.as_str())
                .text(error_text)
        })
        .render()
}

fn render_notice(wrapper: Element<Div>, notice: &Notice, messages: &Messages) -> Element<Div> {
    match notice {
        Notice::ValidationFailed(fields) => {
            let labels: Vec<&str> = fields.iter().map(|f| messages.label(*f)).collect();
            wrapper
                .class("alert alert-danger")
                .attr("role", "alert")
                .text(messages.submit_invalid)
                .child::<Ul, _>(|ul| {
                    ul.class("mb-0")
                        .children(labels.iter(), |label, li: Element<Li>| li.text(*label))
                })
        }
        Notice::SubmissionFailed => wrapper
            .class("alert alert-danger")
            .attr("role", "alert")
            .text(messages.submit_failed),
        Notice::SubmissionInProgress => wrapper
            .class("alert alert-info")
            .attr("role", "status")
            .text(messages.submit_in_progress),
    }
}

/// Renders the `<form>` element with all five fields.
pub fn render_registration_form(ctx: &PageContext<'_>) -> String {
    let messages = ctx.messages();
    let action = ctx.action;
    let method = "post";

    let mut form = html! {
        form.action(#action).method(#method)
    }
    .attr("id", FORM_ID)
    .attr("novalidate", "novalidate")
    .class("mt-5");

    if let Some(notice) = ctx.notice {
        form = form.child::<Div, _>(|d| render_notice(d, notice, messages));
    }

    if ctx.departments.is_failed() {
        form = form.child::<Div, _>(|d| {
            d.class("alert alert-warning")
                .attr("role", "alert")
                .text(messages.departments_unavailable)
        });
    }

    let departments = ctx.departments.departments();
    for field in FieldName::ALL {
        let field_html = render_field(field, ctx.state, departments, messages);
        form = form.raw(&field_html);
    }

    let submit_label = messages.submit_label.to_string();
    form = form.child::<Div, _>(|d| {
        let btn = html! {
            button.type_("submit").class("btn btn-primary") {
                #submit_label
            }
        };
        d.class("d-grid gap-2 d-md-flex justify-content-md-end")
            .raw(btn.render())
    });

    form.render()
}

/// Renders the success banner, if one is showing.
pub fn render_banner(ctx: &PageContext<'_>) -> String {
    let Some(message) = ctx.banner else {
        return String::new();
    };

    let remaining = ctx.banner_remaining_ms.to_string();
    html! { div.class("alert alert-success") }
        .attr("role", "status")
        .attr("style", BANNER_STYLE)
        .data("dismiss-ms", remaining.as_str())
        .text(message)
        .render()
}

/// Renders the complete HTML document.
pub fn render_page(ctx: &PageContext<'_>) -> String {
    let messages = ctx.messages();
    let title = messages.page_title;
    let banner_html = render_banner(ctx);
    let form_html = render_registration_form(ctx);

    Document::new()
        .doctype()
        .root::<Html, _>(|html_el| {
            html_el
                .attr("lang", ctx.locale.code())
                .child::<Head, _>(|head| {
                    head.child::<Meta, _>(|m| m.attr("charset", "UTF-8"))
                        .child::<Meta, _>(|m| {
                            m.attr("name", "viewport")
                                .attr("content", "width=device-width, initial-scale=1.0")
                        })
                        .child::<Title, _>(|t| t.text(title))
                        .child::<Link, _>(|l| l.attr("href", BOOTSTRAP_CSS).attr("rel", "stylesheet"))
                })
                .child::<Body, _>(|body| {
                    body.child::<Div, _>(|d| {
                        d.class("container")
                            .raw(&banner_html)
                            .raw(&form_html)
                    })
                    .child::<Script, _>(|s| s.raw(JS))
                })
        })
        .build()
}
