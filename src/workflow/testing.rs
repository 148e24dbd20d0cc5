//! In-memory fakes shared by the workflow unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::camera::{Camera, CameraPermission};
use crate::api::AlertService;
use crate::entities::{Alert, Classification, CorrectiveAction, HistoryEvent, JustificationSubmission, PhotoAttachment, Session};
use crate::error::{CaptureError, FetchError, SubmitError};
use crate::session::SessionContext;
use crate::store::MemoryTokenStore;

pub(crate) fn alert(id: &str, status: &str) -> Alert {
    Alert {
        id: id.to_string(),
        classification: None,
        classification_id: None,
        prefix: Some("SE-01".to_string()),
        description: None,
        occurred_at: Some("2025-07-16T10:00:00".to_string()),
        status: status.to_string(),
        icon: None,
    }
}

pub(crate) fn event(status: &str, description: &str) -> HistoryEvent {
    HistoryEvent {
        occurred_at: "2025-07-16T10:00:00".to_string(),
        status: status.to_string(),
        description: description.to_string(),
    }
}

pub(crate) fn photo(name: &str) -> PhotoAttachment {
    PhotoAttachment::new(name, vec![0xff, 0xd8, 0xff, 0xe0])
}

pub(crate) async fn logged_in_session() -> SessionContext {
    let ctx = SessionContext::new(Arc::new(MemoryTokenStore::new()));
    ctx.login(Session {
        id: "1".into(),
        name: "Ana".into(),
        role: "Operador".into(),
        access_token: "token-123".into(),
    })
    .await
    .unwrap();
    ctx
}

pub(crate) fn anonymous_session() -> SessionContext {
    SessionContext::new(Arc::new(MemoryTokenStore::new()))
}

fn unavailable(path: &str) -> FetchError {
    FetchError::Status {
        path: path.to_string(),
        status: 503,
        body: "Service Unavailable".to_string(),
    }
}

#[derive(Default)]
pub(crate) struct FakeService {
    alerts: Mutex<Vec<Alert>>,
    history: Mutex<HashMap<String, Vec<HistoryEvent>>>,
    classifications: Mutex<Vec<Classification>>,
    actions: Mutex<HashMap<String, Vec<CorrectiveAction>>>,
    submissions: Mutex<Vec<JustificationSubmission>>,
    history_requests: Mutex<Vec<String>>,
    alert_calls: AtomicUsize,
    action_calls: AtomicUsize,
    submit_calls: AtomicUsize,
    fail_alerts: AtomicBool,
    fail_history: AtomicBool,
    fail_classifications: AtomicBool,
    fail_actions: AtomicBool,
    reject_submit: AtomicBool,
}

impl FakeService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_alerts(&self, alerts: Vec<Alert>) {
        *self.alerts.lock().unwrap() = alerts;
    }

    pub(crate) fn set_history(&self, alert_id: &str, events: Vec<HistoryEvent>) {
        self.history
            .lock()
            .unwrap()
            .insert(alert_id.to_string(), events);
    }

    pub(crate) fn set_actions(&self, classification_id: &str, actions: Vec<CorrectiveAction>) {
        self.actions
            .lock()
            .unwrap()
            .insert(classification_id.to_string(), actions);
    }

    pub(crate) fn fail_alerts(&self) {
        self.fail_alerts.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_history(&self) {
        self.fail_history.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_classifications(&self) {
        self.fail_classifications.store(true, Ordering::SeqCst);
    }

    pub(crate) fn fail_actions(&self) {
        self.fail_actions.store(true, Ordering::SeqCst);
    }

    pub(crate) fn reject_submissions(&self, reject: bool) {
        self.reject_submit.store(reject, Ordering::SeqCst);
    }

    pub(crate) fn alert_calls(&self) -> usize {
        self.alert_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn action_calls(&self) -> usize {
        self.action_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn history_requests(&self) -> Vec<String> {
        self.history_requests.lock().unwrap().clone()
    }

    pub(crate) fn submissions(&self) -> Vec<JustificationSubmission> {
        self.submissions.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertService for FakeService {
    async fn list_alerts(&self) -> Result<Vec<Alert>, FetchError> {
        self.alert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_alerts.load(Ordering::SeqCst) {
            return Err(unavailable("/alertas/table-alerta"));
        }
        Ok(self.alerts.lock().unwrap().clone())
    }

    async fn alert_history(&self, alert_id: &str) -> Result<Vec<HistoryEvent>, FetchError> {
        self.history_requests
            .lock()
            .unwrap()
            .push(alert_id.to_string());
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(unavailable("/alertas/historico-alerta"));
        }
        Ok(self
            .history
            .lock()
            .unwrap()
            .get(alert_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn classifications(&self) -> Result<Vec<Classification>, FetchError> {
        if self.fail_classifications.load(Ordering::SeqCst) {
            return Err(unavailable("/classificacoes"));
        }
        Ok(self.classifications.lock().unwrap().clone())
    }

    async fn corrective_actions(&self, classification_id: &str) -> Result<Vec<CorrectiveAction>, FetchError> {
        self.action_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_actions.load(Ordering::SeqCst) {
            return Err(unavailable("/acoes-corretivas"));
        }
        Ok(self
            .actions
            .lock()
            .unwrap()
            .get(classification_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_justification(&self, submission: &JustificationSubmission) -> Result<(), SubmitError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_submit.load(Ordering::SeqCst) {
            return Err(SubmitError::Rejected {
                status: 500,
                detail: "Erro interno".to_string(),
            });
        }
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

/// Camera that hands out numbered photos.
pub(crate) struct FakeCamera {
    permission: Mutex<CameraPermission>,
    grant_on_request: bool,
    captures: AtomicUsize,
}

impl FakeCamera {
    pub(crate) fn granted() -> Self {
        Self {
            permission: Mutex::new(CameraPermission::Granted),
            grant_on_request: true,
            captures: AtomicUsize::new(0),
        }
    }

    pub(crate) fn denied() -> Self {
        Self {
            permission: Mutex::new(CameraPermission::Denied),
            grant_on_request: false,
            captures: AtomicUsize::new(0),
        }
    }

    pub(crate) fn undetermined() -> Self {
        Self {
            permission: Mutex::new(CameraPermission::Undetermined),
            grant_on_request: true,
            captures: AtomicUsize::new(0),
        }
    }

    pub(crate) fn captures(&self) -> usize {
        self.captures.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn permission(&self) -> CameraPermission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> CameraPermission {
        let mut permission = self.permission.lock().unwrap();
        if self.grant_on_request {
            *permission = CameraPermission::Granted;
        }
        *permission
    }

    async fn capture(&self) -> Result<Option<PhotoAttachment>, CaptureError> {
        let n = self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(Some(photo(&format!("captura-{n}.jpg"))))
    }
}
