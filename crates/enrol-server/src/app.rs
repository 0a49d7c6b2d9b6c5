//! Routing and request handlers.

use std::error::Error as StdError;
use std::sync::Arc;

use hyper::body::Body;
use hyper::{Method, Request, StatusCode};
use serde_json::json;
use tracing::{debug, info, warn};

use enrol_client::RegistrationApi;
use enrol_forms::FieldValidator;

use crate::config::Config;
use crate::error::ServerError;
use crate::request::{cookie, parse_form_body, read_body};
use crate::response::{self, HttpResponse};
use crate::session::{
    self, FieldEvent, RegistrationSession, SessionStore, SharedSession, SubmitOutcome,
};

/// Name of the cookie carrying the session key.
pub const SESSION_COOKIE: &str = "enrol_session";

/// Shared application state.
pub struct App {
    config: Config,
    validator: Arc<FieldValidator>,
    api: Arc<dyn RegistrationApi>,
    sessions: SessionStore,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("sessions", &self.sessions)
            .finish_non_exhaustive()
    }
}

/// A session resolved for a request; `new_key` is set when the browser
/// needs a cookie.
struct Resolved {
    session: SharedSession,
    new_key: Option<String>,
}

impl Resolved {
    fn respond(&self, response: HttpResponse) -> HttpResponse {
        match &self.new_key {
            Some(key) => response::with_session_cookie(response, SESSION_COOKIE, key),
            None => response,
        }
    }
}

impl App {
    /// Builds the app around `api`; the session store starts empty.
    pub fn new(config: Config, api: Arc<dyn RegistrationApi>) -> Self {
        let validator = Arc::new(FieldValidator::new(config.locale.messages()));
        let sessions = SessionStore::new(config.session_idle_timeout, config.max_sessions);
        Self {
            config,
            validator,
            api,
            sessions,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Live sessions.
    pub const fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Dispatches one request.
    pub async fn handle<B>(&self, req: Request<B>) -> HttpResponse
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let key = cookie(req.headers(), SESSION_COOKIE).map(str::to_string);
        debug!(%method, %path, "request");

        match (method, path.as_str()) {
            (Method::GET, "/") => self.show_form(key).await,
            (Method::POST, "/") => self.submit_form(key, req.into_body()).await,
            (Method::POST, "/events") => self.field_event(key, req.into_body()).await,
            (Method::GET, "/banner") => self.banner(key).await,
            (Method::GET, "/health") => response::text(StatusCode::OK, "ok"),
            (_, "/" | "/events" | "/banner" | "/health") => response::method_not_allowed(),
            _ => response::not_found(),
        }
    }

    /// The session named by the cookie, if it is still live.
    async fn existing(&self, key: Option<&str>) -> Option<SharedSession> {
        let session = self.sessions.get(key?).await?;
        session.lock().await.mark_seen();
        Some(session)
    }

    /// Like [`Self::existing`], but starts a session when there is none.
    /// Only the form routes call this.
    async fn resolve(&self, key: Option<String>) -> Resolved {
        if let Some(session) = self.existing(key.as_deref()).await {
            return Resolved {
                session,
                new_key: None,
            };
        }

        let fresh = RegistrationSession::new(
            Arc::clone(&self.validator),
            self.config.locale,
            self.config.banner_duration,
        );
        let (key, session) = self.sessions.insert(fresh).await;
        debug!("new session");
        Resolved {
            session,
            new_key: Some(key),
        }
    }

    async fn show_form(&self, key: Option<String>) -> HttpResponse {
        let resolved = self.resolve(key).await;
        // Loads on first render, and retries after a failed load.
        session::load_departments(&resolved.session, self.api.as_ref()).await;

        let html = {
            let mut session = resolved.session.lock().await;
            let notice = session.take_notice();
            session.render(notice.as_ref(), "/")
        };
        resolved.respond(response::html(html))
    }

    async fn submit_form<B>(&self, key: Option<String>, body: B) -> HttpResponse
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let body = match read_body(body, self.config.max_body_bytes).await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "unreadable form body");
                return body_error(&err);
            }
        };
        let resolved = self.resolve(key).await;

        let fields = parse_form_body(&body);
        resolved.session.lock().await.apply_posted(&fields);

        match session::submit(&resolved.session, self.api.as_ref()).await {
            SubmitOutcome::Submitted => info!("registration accepted"),
            SubmitOutcome::Invalid(errors) => debug!(%errors, "registration invalid"),
            SubmitOutcome::AlreadySubmitting => debug!("duplicate submit"),
            SubmitOutcome::Failed => warn!("registration not stored"),
        }
        resolved.respond(response::see_other("/"))
    }

    async fn field_event<B>(&self, key: Option<String>, body: B) -> HttpResponse
    where
        B: Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let Some(session) = self.existing(key.as_deref()).await else {
            debug!("field event without a session");
            return response::bad_request("no session; reload the form");
        };
        let event = match read_body(body, self.config.max_body_bytes)
            .await
            .and_then(|body| serde_json::from_slice::<FieldEvent>(&body).map_err(Into::into))
        {
            Ok(event) => event,
            Err(err) => {
                debug!(error = %err, "rejected field event");
                return body_error(&err);
            }
        };

        let status = session.lock().await.apply_event(event);
        response::json(StatusCode::OK, &status)
    }

    async fn banner(&self, key: Option<String>) -> HttpResponse {
        let message = match self.existing(key.as_deref()).await {
            Some(session) => session.lock().await.banner(),
            None => None,
        };
        response::json(StatusCode::OK, &json!({ "message": message }))
    }
}

fn body_error(err: &ServerError) -> HttpResponse {
    match err {
        ServerError::BodyTooLarge { .. } => response::payload_too_large(&err.to_string()),
        _ => response::bad_request(&err.to_string()),
    }
}
