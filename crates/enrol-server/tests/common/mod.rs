#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::BoxFuture;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use hyper::{Request, StatusCode};
use serde_json::{json, Value};
use tokio::sync::Notify;

use enrol_client::{ClientError, RegistrationApi, Result};
use enrol_forms::{Department, Locale, RegistrationPayload};
use enrol_server::response::HttpResponse;
use enrol_server::{App, Config, SESSION_COOKIE};

/// In-memory stand-in for the remote endpoints.
#[derive(Default)]
pub struct FakeApi {
    pub department_calls: AtomicUsize,
    pub fail_departments: AtomicBool,
    pub fail_submit: AtomicBool,
    pub submitted: Mutex<Vec<RegistrationPayload>>,
    /// When set, each submit waits for a permit before completing.
    pub gate: Option<Arc<Notify>>,
}

impl FakeApi {
    pub fn gated() -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let api = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (api, gate)
    }

    pub fn submitted(&self) -> Vec<RegistrationPayload> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.department_calls.load(Ordering::SeqCst)
    }
}

fn unavailable(url: &str) -> ClientError {
    ClientError::Status {
        url: url.to_string(),
        status: 503,
        body: "unavailable".to_string(),
    }
}

impl RegistrationApi for FakeApi {
    fn fetch_departments(&self) -> BoxFuture<'_, Result<Vec<Department>>> {
        Box::pin(async move {
            self.department_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_departments.load(Ordering::SeqCst) {
                return Err(unavailable("departments.json"));
            }
            Ok(vec![
                Department::new("-Nsales", "Sales"),
                Department::new("-Nlegal", "Legal"),
            ])
        })
    }

    fn submit<'a>(&'a self, payload: &'a RegistrationPayload) -> BoxFuture<'a, Result<Value>> {
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.submitted.lock().unwrap().push(payload.clone());
            if self.fail_submit.load(Ordering::SeqCst) {
                return Err(unavailable("users.json"));
            }
            Ok(json!({ "name": "-Nuser1" }))
        })
    }
}

pub fn config() -> Config {
    Config {
        locale: Locale::En,
        banner_duration: Duration::from_secs(3),
        ..Config::default()
    }
}

pub fn app(api: &Arc<FakeApi>) -> App {
    App::new(config(), Arc::clone(api) as Arc<dyn RegistrationApi>)
}

pub const VALID_FORM: &str = "fullName=Anna+Nowak&birthDate=12%2F03%2F1991\
&email=anna%40example.pl&department=-Nsales&termsOfUse=true";

fn request(method: &str, path: &str, session: Option<&str>) -> hyper::http::request::Builder {
    let builder = Request::builder().method(method).uri(path);
    match session {
        Some(key) => builder.header(COOKIE, format!("{SESSION_COOKIE}={key}")),
        None => builder,
    }
}

pub async fn get(app: &App, path: &str, session: Option<&str>) -> HttpResponse {
    let req = request("GET", path, session)
        .body(Full::new(Bytes::new()))
        .unwrap();
    app.handle(req).await
}

pub async fn post_form(app: &App, body: &str, session: Option<&str>) -> HttpResponse {
    let req = request("POST", "/", session)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap();
    app.handle(req).await
}

pub async fn post_event(app: &App, event: &Value, session: Option<&str>) -> HttpResponse {
    let req = request("POST", "/events", session)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(event.to_string())))
        .unwrap();
    app.handle(req).await
}

pub fn session_key(response: &HttpResponse) -> Option<String> {
    let cookie = response.headers().get(SET_COOKIE)?.to_str().ok()?;
    let pair = cookie.split(';').next()?;
    let (name, value) = pair.split_once('=')?;
    (name == SESSION_COOKIE).then(|| value.to_string())
}

pub async fn body_text(response: HttpResponse) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: HttpResponse) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Opens a session and returns its key.
pub async fn open_session(app: &App) -> String {
    let response = get(app, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    session_key(&response).expect("first visit sets the session cookie")
}
