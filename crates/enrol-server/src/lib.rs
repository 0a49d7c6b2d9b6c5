//! # enrol-server
//!
//! Serves the registration form over HTTP and forwards valid submissions
//! to the user endpoint.
//!
//! | Route          | Purpose                                           |
//! |----------------|---------------------------------------------------|
//! | `GET /`        | Render the form, loading departments if needed    |
//! | `POST /`       | Submit the form, then redirect back to `GET /`    |
//! | `POST /events` | Apply a change or blur event, answer field status |
//! | `GET /banner`  | Current success banner text                       |
//! | `GET /health`  | Liveness probe                                    |
//!
//! Each browser is tracked by the `enrol_session` cookie.

pub mod app;
pub mod config;
mod error;
pub mod notifier;
pub mod request;
pub mod response;
pub mod server;
pub mod session;

pub use app::{App, SESSION_COOKIE};
pub use config::Config;
pub use error::{Result, ServerError};
pub use notifier::SuccessNotifier;
pub use server::{run, serve};
pub use session::{
    EventKind, FieldEvent, FieldStatus, RegistrationSession, SessionStore, SharedSession,
    SubmitOutcome,
};
