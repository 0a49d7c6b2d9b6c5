//! The department and user endpoints.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use enrol_forms::{departments_from_json, Department, RegistrationPayload};

use crate::error::{ClientError, Result};

/// Default department list document.
pub const DEFAULT_DEPARTMENTS_URL: &str =
    "https://ddh-front-default-rtdb.europe-west1.firebasedatabase.app/departments.json";

/// Default user collection; submissions are POSTed here.
pub const DEFAULT_USERS_URL: &str =
    "https://ddh-front-default-rtdb.europe-west1.firebasedatabase.app/users.json";

/// The remote side of the registration form.
///
/// Neither call is retried; a failed submission needs a new submit.
pub trait RegistrationApi: Send + Sync {
    /// Fetches the department list in document order.
    fn fetch_departments(&self) -> BoxFuture<'_, Result<Vec<Department>>>;

    /// Submits a validated form. Returns the response body.
    fn submit<'a>(&'a self, payload: &'a RegistrationPayload) -> BoxFuture<'a, Result<Value>>;
}

/// URLs of the two endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// GET target returning `{ id: { name } }`.
    pub departments_url: String,
    /// POST target for registration payloads.
    pub users_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            departments_url: DEFAULT_DEPARTMENTS_URL.to_string(),
            users_url: DEFAULT_USERS_URL.to_string(),
        }
    }
}

/// [`RegistrationApi`] over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpRegistrationApi {
    client: Client,
    endpoints: Endpoints,
}

impl HttpRegistrationApi {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be initialized.
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()?;

        Ok(Self { client, endpoints })
    }

    /// Returns the configured endpoints.
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn load_departments(&self) -> Result<Vec<Department>> {
        let url = &self.endpoints.departments_url;
        debug!(%url, "fetching departments");

        let response = self.client.get(url).send().await?;
        let document = read_json(url, response).await?;
        let departments = departments_from_json(&document)?;

        info!(count = departments.len(), "departments loaded");
        Ok(departments)
    }

    async fn post_user(&self, payload: &RegistrationPayload) -> Result<Value> {
        let url = &self.endpoints.users_url;
        debug!(%url, "submitting registration");

        let response = self.client.post(url).json(payload).send().await?;
        let body = read_json(url, response).await?;

        debug!(response = %body, "registration stored");
        Ok(body)
    }
}

impl RegistrationApi for HttpRegistrationApi {
    fn fetch_departments(&self) -> BoxFuture<'_, Result<Vec<Department>>> {
        Box::pin(self.load_departments())
    }

    fn submit<'a>(&'a self, payload: &'a RegistrationPayload) -> BoxFuture<'a, Result<Value>> {
        Box::pin(self.post_user(payload))
    }
}

/// Checks the status and decodes the body as JSON.
async fn read_json(url: &str, response: Response) -> Result<Value> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        warn!(%url, status = status.as_u16(), "request rejected");
        return Err(ClientError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: text,
        });
    }

    serde_json::from_str(&text).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}
