//! # enrol-client
//!
//! The two remote collaborators of the registration form:
//! - `GET departments`: a JSON object keyed by department id
//! - `POST users`: the flattened registration payload
//!
//! [`RegistrationApi`] is the seam the server talks to; [`HttpRegistrationApi`]
//! implements it with `reqwest`.
//!
//! ```ignore
//! use std::time::Duration;
//! use enrol_client::{Endpoints, HttpRegistrationApi, RegistrationApi};
//!
//! let api = HttpRegistrationApi::new(Endpoints::default(), Duration::from_secs(10))?;
//! let departments = api.fetch_departments().await?;
//! ```

mod api;
mod error;

pub use api::{
    Endpoints, HttpRegistrationApi, RegistrationApi, DEFAULT_DEPARTMENTS_URL, DEFAULT_USERS_URL,
};
pub use error::{ClientError, Result};
