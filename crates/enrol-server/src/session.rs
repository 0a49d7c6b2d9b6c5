//! Per-browser registration sessions.
//!
//! Each browser gets its own form state, department list and success
//! banner. The session lock is never held across a remote call, so a
//! second submit arriving while the first is in flight sees the
//! `submitting` flag and is turned away.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use enrol_client::RegistrationApi;
use enrol_forms::{
    render_page, Department, DepartmentsState, FieldName, FieldValidator, FieldValue, FormState,
    Locale, Notice, PageContext, RegistrationPayload, ValidationErrors,
};

use crate::notifier::SuccessNotifier;

/// A session shared between concurrent requests.
pub type SharedSession = Arc<Mutex<RegistrationSession>>;

/// What happened to a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The payload was accepted; the form has been reset.
    Submitted,
    /// Validation failed; nothing was sent.
    Invalid(ValidationErrors),
    /// Another submission from this session is still in flight.
    AlreadySubmitting,
    /// The remote call failed; the form keeps its values.
    Failed,
}

/// The browser event a [`FieldEvent`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// The value changed (keystroke, selection, checkbox toggle).
    Change,
    /// The field lost focus.
    Blur,
}

/// A change or blur forwarded from the browser.
///
/// Both kinds may carry the value the input holds when the event fired; a
/// blur with a value also stores it, so the field ends up matching the input
/// box even if an earlier change arrived late.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEvent {
    pub kind: EventKind,
    pub field: FieldName,
    #[serde(default)]
    pub value: Option<FieldValue>,
}

/// A field's error after an event, and whether the user should see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStatus {
    pub field: FieldName,
    pub error: Option<String>,
    pub visible: bool,
}

/// The state behind one rendered registration form.
#[derive(Debug)]
pub struct RegistrationSession {
    form: FormState,
    validator: Arc<FieldValidator>,
    locale: Locale,
    departments: DepartmentsState,
    loading_departments: bool,
    notifier: SuccessNotifier,
    notice: Option<Notice>,
    submitting: bool,
    last_seen: Instant,
}

impl RegistrationSession {
    /// Creates an empty session; departments start out `Loading`.
    pub fn new(validator: Arc<FieldValidator>, locale: Locale, banner_duration: Duration) -> Self {
        Self {
            form: FormState::new(),
            validator,
            locale,
            departments: DepartmentsState::Loading,
            loading_departments: false,
            notifier: SuccessNotifier::new(banner_duration),
            notice: None,
            submitting: false,
            last_seen: Instant::now(),
        }
    }

    /// The form being filled in.
    pub const fn form(&self) -> &FormState {
        &self.form
    }

    /// Department list or its load status.
    pub const fn departments(&self) -> &DepartmentsState {
        &self.departments
    }

    /// Language the page and messages are rendered in.
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Whether a submission is in flight.
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// The success banner text, while it is showing.
    pub fn banner(&self) -> Option<String> {
        self.notifier.current()
    }

    /// Hides the success banner and cancels its timer.
    pub fn dismiss_banner(&mut self) {
        self.notifier.dismiss();
    }

    /// Records a request against this session, for idle expiry.
    pub fn mark_seen(&mut self) {
        self.last_seen = Instant::now();
    }

    /// How long since the session was last used.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    /// Applies a browser event and reports the field's resulting error.
    ///
    /// Events arriving while a submission is in flight are ignored.
    pub fn apply_event(&mut self, event: FieldEvent) -> FieldStatus {
        if self.submitting {
            debug!(field = %event.field, "event ignored during submit");
            return self.status(event.field);
        }

        match event.kind {
            EventKind::Change => {
                let value = event
                    .value
                    .unwrap_or_else(|| empty_value(event.field));
                self.form.on_change(&self.validator, event.field, value);
            }
            EventKind::Blur => {
                if let Some(value) = event.value {
                    self.form.on_change(&self.validator, event.field, value);
                }
                self.form.on_blur(event.field);
            }
        }
        self.status(event.field)
    }

    /// Current error status of `field`.
    pub fn status(&self, field: FieldName) -> FieldStatus {
        FieldStatus {
            field,
            error: self.form.error(field).map(str::to_string),
            visible: self.form.visible_error(field).is_some(),
        }
    }

    /// Copies a posted form into the state.
    ///
    /// Browsers omit unchecked checkboxes, so a missing key means an empty
    /// text or an unchecked box. Ignored while a submission is in flight.
    pub fn apply_posted(&mut self, fields: &HashMap<String, String>) {
        if self.submitting {
            return;
        }
        for field in FieldName::ALL {
            let value = fields
                .get(field.as_str())
                .map_or_else(|| empty_value(field), |text| FieldValue::from(text.as_str()));
            self.form.on_change(&self.validator, field, value);
        }
    }

    /// Validates the form and, if it passes, marks a submission in flight.
    ///
    /// On failure every field is touched so all errors show, and the
    /// returned outcome is final.
    pub fn begin_submit(&mut self) -> Result<RegistrationPayload, SubmitOutcome> {
        if self.submitting {
            debug!("submit ignored, another one is in flight");
            self.notice = Some(Notice::SubmissionInProgress);
            return Err(SubmitOutcome::AlreadySubmitting);
        }

        match self.form.prepare_submission(&self.validator) {
            Ok(payload) => {
                self.submitting = true;
                self.notice = None;
                Ok(payload)
            }
            Err(errors) => {
                self.form.touch_all();
                debug!(failing = errors.len(), "submit blocked by validation");
                self.notice = Some(Notice::ValidationFailed(errors.fields().collect()));
                Err(SubmitOutcome::Invalid(errors))
            }
        }
    }

    /// Records the result of the remote call started by [`Self::begin_submit`].
    pub fn finish_submit(&mut self, result: enrol_client::Result<Value>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(body) => {
                debug!(response = %body, "registration submitted");
                self.form.reset();
                self.notice = None;
                self.notifier.show(self.locale.messages().submit_success);
                SubmitOutcome::Submitted
            }
            Err(err) => {
                error!(error = %err, "registration submit failed");
                self.notice = Some(Notice::SubmissionFailed);
                SubmitOutcome::Failed
            }
        }
    }

    /// Claims the department load. Returns `false` when the list is already
    /// loaded or a load is in flight.
    pub fn start_department_load(&mut self) -> bool {
        if self.loading_departments || matches!(self.departments, DepartmentsState::Loaded(_)) {
            return false;
        }
        self.loading_departments = true;
        self.departments = DepartmentsState::Loading;
        true
    }

    /// Stores the outcome of the load claimed by [`Self::start_department_load`].
    pub fn finish_department_load(&mut self, result: enrol_client::Result<Vec<Department>>) {
        self.loading_departments = false;
        self.departments = match result {
            Ok(departments) => {
                info!(count = departments.len(), "departments loaded");
                DepartmentsState::Loaded(departments)
            }
            Err(err) => {
                warn!(error = %err, "failed to load departments");
                DepartmentsState::Failed(err.to_string())
            }
        };
    }

    /// Takes the pending form-level notice; it is shown once.
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Renders the full page for this session.
    pub fn render(&self, notice: Option<&Notice>, action: &str) -> String {
        let banner = self.notifier.current();
        let remaining = self
            .notifier
            .remaining()
            .map_or(0, |left| u64::try_from(left.as_millis()).unwrap_or(u64::MAX));

        render_page(&PageContext {
            state: &self.form,
            departments: &self.departments,
            locale: self.locale,
            banner: banner.as_deref(),
            banner_remaining_ms: remaining,
            notice,
            action,
        })
    }
}

fn empty_value(field: FieldName) -> FieldValue {
    if field.is_boolean() {
        FieldValue::Bool(false)
    } else {
        FieldValue::Text(String::new())
    }
}

/// Submits the session's form through `api`.
///
/// At most one remote request is made, and only when every field is valid.
pub async fn submit(session: &SharedSession, api: &dyn RegistrationApi) -> SubmitOutcome {
    let payload = match session.lock().await.begin_submit() {
        Ok(payload) => payload,
        Err(outcome) => return outcome,
    };

    let result = api.submit(&payload).await;
    session.lock().await.finish_submit(result)
}

/// Loads the department list unless it is loaded or already loading.
pub async fn load_departments(session: &SharedSession, api: &dyn RegistrationApi) {
    if !session.lock().await.start_department_load() {
        return;
    }

    let result = api.fetch_departments().await;
    session.lock().await.finish_department_load(result);
}

/// Sessions keyed by their cookie value.
///
/// Sessions idle longer than the timeout are dropped by [`Self::sweep`] and
/// before every insert. When the store is full, the longest-idle session
/// makes room for the new one.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
    idle_timeout: Duration,
    max_sessions: usize,
}

impl SessionStore {
    /// Creates an empty store holding at most `max_sessions` sessions.
    pub fn new(idle_timeout: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Looks up a session by cookie value.
    pub async fn get(&self, key: &str) -> Option<SharedSession> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Stores `session` under a fresh random key.
    pub async fn insert(&self, session: RegistrationSession) -> (String, SharedSession) {
        let key = generate_session_key();
        let shared = Arc::new(Mutex::new(session));

        let mut sessions = self.sessions.write().await;
        self.expire(&mut sessions);
        while sessions.len() >= self.max_sessions {
            let Some(oldest) = longest_idle(&sessions) else {
                break;
            };
            debug!("session store full, evicting longest idle session");
            sessions.remove(&oldest);
        }
        sessions.insert(key.clone(), Arc::clone(&shared));

        (key, shared)
    }

    /// Drops idle sessions. Returns how many were removed.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        self.expire(&mut sessions)
    }

    fn expire(&self, sessions: &mut HashMap<String, SharedSession>) -> usize {
        let before = sessions.len();
        sessions.retain(|_, existing| {
            // A session that is locked right now is in use.
            existing
                .try_lock()
                .map_or(true, |s| s.idle_for() < self.idle_timeout)
        });
        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, "expired idle sessions");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether no session is stored.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Key of the unlocked session idle the longest, if any.
fn longest_idle(sessions: &HashMap<String, SharedSession>) -> Option<String> {
    sessions
        .iter()
        .filter_map(|(key, session)| session.try_lock().ok().map(|s| (key, s.idle_for())))
        .max_by_key(|(_, idle)| *idle)
        .map(|(key, _)| key.clone())
}

/// Generates a random 64 character hex session key.
fn generate_session_key() -> String {
    use rand::RngExt;
    let mut rng = rand::rng();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrol_client::ClientError;
    use enrol_forms::Messages;

    fn session() -> RegistrationSession {
        RegistrationSession::new(
            Arc::new(FieldValidator::default()),
            Locale::En,
            Duration::from_secs(3),
        )
    }

    fn valid_post() -> HashMap<String, String> {
        [
            ("fullName", "Anna Nowak"),
            ("birthDate", "12/03/1991"),
            ("email", "anna@example.pl"),
            ("department", "-Nsales"),
            ("termsOfUse", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_session_key_format() {
        let key = generate_session_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, generate_session_key());
    }

    #[test]
    fn test_event_deserialization() {
        let event: FieldEvent =
            serde_json::from_str(r#"{"kind":"change","field":"termsOfUse","value":true}"#)
                .unwrap();
        assert_eq!(event.kind, EventKind::Change);
        assert_eq!(event.field, FieldName::TermsOfUse);
        assert_eq!(event.value, Some(FieldValue::Bool(true)));

        let blur: FieldEvent = serde_json::from_str(r#"{"kind":"blur","field":"email"}"#).unwrap();
        assert_eq!(blur.value, None);

        assert!(serde_json::from_str::<FieldEvent>(r#"{"kind":"blur","field":"age"}"#).is_err());
    }

    #[tokio::test]
    async fn test_error_hidden_until_blur() {
        let mut s = session();
        let status = s.apply_event(FieldEvent {
            kind: EventKind::Change,
            field: FieldName::FullName,
            value: Some(FieldValue::from("Anna")),
        });
        assert_eq!(status.error.as_deref(), Some(Messages::default().full_name_two_words));
        assert!(!status.visible);

        let status = s.apply_event(FieldEvent {
            kind: EventKind::Blur,
            field: FieldName::FullName,
            value: None,
        });
        assert!(status.visible);
    }

    #[tokio::test]
    async fn test_invalid_submit_touches_everything() {
        let mut s = session();
        let outcome = s.begin_submit().unwrap_err();
        match outcome {
            SubmitOutcome::Invalid(errors) => assert_eq!(errors.len(), 5),
            other => panic!("expected invalid, got {other:?}"),
        }
        for field in FieldName::ALL {
            assert!(s.form().visible_error(field).is_some(), "{field} hidden");
        }
        assert!(matches!(s.take_notice(), Some(Notice::ValidationFailed(f)) if f.len() == 5));
        assert!(!s.is_submitting());
    }

    #[tokio::test]
    async fn test_second_begin_is_rejected() {
        let mut s = session();
        s.apply_posted(&valid_post());
        let payload = s.begin_submit().unwrap();
        assert!(payload.terms_of_use);
        assert!(s.is_submitting());

        assert_eq!(s.begin_submit().unwrap_err(), SubmitOutcome::AlreadySubmitting);
        assert_eq!(s.take_notice(), Some(Notice::SubmissionInProgress));
    }

    #[tokio::test]
    async fn test_success_resets_and_shows_banner() {
        let mut s = session();
        s.apply_posted(&valid_post());
        s.begin_submit().unwrap();

        let outcome = s.finish_submit(Ok(serde_json::json!({ "name": "-N1" })));
        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert!(!s.is_submitting());
        assert_eq!(s.form().text(FieldName::FullName), Some(""));
        assert_eq!(s.banner().as_deref(), Some(Messages::default().submit_success));
    }

    #[tokio::test]
    async fn test_failure_keeps_values() {
        let mut s = session();
        s.apply_posted(&valid_post());
        s.begin_submit().unwrap();

        let err = ClientError::Status {
            url: "http://localhost/users.json".to_string(),
            status: 503,
            body: String::new(),
        };
        assert_eq!(s.finish_submit(Err(err)), SubmitOutcome::Failed);
        assert_eq!(s.form().text(FieldName::FullName), Some("Anna Nowak"));
        assert_eq!(s.banner(), None);
        assert_eq!(s.take_notice(), Some(Notice::SubmissionFailed));
    }

    #[test]
    fn test_missing_checkbox_means_unchecked() {
        let mut s = session();
        let mut posted = valid_post();
        posted.remove("termsOfUse");
        s.apply_posted(&posted);
        assert_eq!(s.form().value(FieldName::TermsOfUse), FieldValue::Bool(false));
        assert!(s.form().error(FieldName::TermsOfUse).is_some());
    }

    #[test]
    fn test_department_load_claimed_once() {
        let mut s = session();
        assert!(s.start_department_load());
        assert!(!s.start_department_load());

        s.finish_department_load(Err(ClientError::Status {
            url: "x".to_string(),
            status: 500,
            body: String::new(),
        }));
        assert!(s.departments().is_failed());
        assert!(s.start_department_load());

        s.finish_department_load(Ok(vec![Department::new("-N1", "Sales")]));
        assert_eq!(s.departments().departments().len(), 1);
        assert!(!s.start_department_load());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_expires_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(60), 100);
        let (first, _) = store.insert(session()).await;
        tokio::time::sleep(Duration::from_secs(61)).await;

        let (second, _) = store.insert(session()).await;
        assert!(store.get(&first).await.is_none());
        assert!(store.get(&second).await.is_some());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_evicts_longest_idle() {
        let store = SessionStore::new(Duration::from_secs(600), 2);
        let (first, _) = store.insert(session()).await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        let (second, _) = store.insert(session()).await;
        tokio::time::sleep(Duration::from_secs(10)).await;

        let (third, _) = store.insert(session()).await;
        assert_eq!(store.len().await, 2);
        assert!(store.get(&first).await.is_none());
        assert!(store.get(&second).await.is_some());
        assert!(store.get(&third).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_drops_idle_sessions() {
        let store = SessionStore::new(Duration::from_secs(60), 100);
        store.insert(session()).await;
        store.insert(session()).await;
        assert_eq!(store.sweep().await, 0);

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(store.sweep().await, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_blur_value_overrides_late_change() {
        let mut s = session();
        let change = |text: &str| FieldEvent {
            kind: EventKind::Change,
            field: FieldName::Email,
            value: Some(FieldValue::from(text)),
        };
        s.apply_event(change("a@b.co"));
        // An earlier keystroke delivered after the final one.
        s.apply_event(change("a@b"));
        assert!(s.form().error(FieldName::Email).is_some());

        let status = s.apply_event(FieldEvent {
            kind: EventKind::Blur,
            field: FieldName::Email,
            value: Some(FieldValue::from("a@b.co")),
        });
        assert_eq!(status.error, None);
        assert!(!status.visible);
        assert_eq!(s.form().text(FieldName::Email), Some("a@b.co"));
    }

    #[tokio::test]
    async fn test_edits_ignored_while_submitting() {
        let mut s = session();
        s.apply_posted(&valid_post());
        s.begin_submit().unwrap();

        let status = s.apply_event(FieldEvent {
            kind: EventKind::Change,
            field: FieldName::FullName,
            value: Some(FieldValue::from("Ewa Kowalska")),
        });
        assert_eq!(status.error, None);
        let mut posted = valid_post();
        posted.insert("email".to_string(), "changed@example.pl".to_string());
        s.apply_posted(&posted);

        assert_eq!(s.form().text(FieldName::FullName), Some("Anna Nowak"));
        assert_eq!(s.form().text(FieldName::Email), Some("anna@example.pl"));

        s.finish_submit(Err(ClientError::Status {
            url: "x".to_string(),
            status: 500,
            body: String::new(),
        }));
        s.apply_event(FieldEvent {
            kind: EventKind::Change,
            field: FieldName::FullName,
            value: Some(FieldValue::from("Ewa Kowalska")),
        });
        assert_eq!(s.form().text(FieldName::FullName), Some("Ewa Kowalska"));
    }
}
