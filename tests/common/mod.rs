//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mipi_alerts::api::AlertService;
use mipi_alerts::entities::{
    Alert, Classification, CorrectiveAction, HistoryEvent, JustificationSubmission, PhotoAttachment, Session,
};
use mipi_alerts::session::SessionContext;
use mipi_alerts::store::MemoryTokenStore;
use mipi_alerts::workflow::{Camera, CameraPermission};
use mipi_alerts::{CaptureError, FetchError, SubmitError};

pub fn alert(id: &str, status: &str) -> Alert {
    Alert {
        id: id.to_string(),
        classification: None,
        classification_id: None,
        prefix: Some("UTD-SLZ".to_string()),
        description: Some("Leitura fora da faixa".to_string()),
        occurred_at: Some("2025-07-16T08:30:00".to_string()),
        status: status.to_string(),
        icon: None,
    }
}

pub fn event(status: &str, description: &str) -> HistoryEvent {
    HistoryEvent {
        occurred_at: "16/07/2025 08:30".to_string(),
        status: status.to_string(),
        description: description.to_string(),
    }
}

pub fn session() -> Session {
    Session {
        id: "17".to_string(),
        name: "Maria Souza".to_string(),
        role: "Operador".to_string(),
        access_token: "tok-e2e".to_string(),
    }
}

pub async fn logged_in() -> SessionContext {
    let ctx = SessionContext::new(Arc::new(MemoryTokenStore::new()));
    ctx.login(session()).await.unwrap();
    ctx
}

/// Backend double that records every call it receives.
#[derive(Default)]
pub struct Backend {
    pub alerts: Mutex<Vec<Alert>>,
    pub history: Mutex<HashMap<String, Vec<HistoryEvent>>>,
    pub classifications: Mutex<Vec<Classification>>,
    pub actions: Mutex<HashMap<String, Vec<CorrectiveAction>>>,
    pub reject: AtomicBool,
    pub history_calls: Mutex<Vec<String>>,
    pub submit_calls: AtomicUsize,
    pub submissions: Mutex<Vec<JustificationSubmission>>,
}

impl Backend {
    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn history_count(&self, alert_id: &str) -> usize {
        self.history_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|id| id.as_str() == alert_id)
            .count()
    }
}

#[async_trait]
impl AlertService for Backend {
    async fn list_alerts(&self) -> Result<Vec<Alert>, FetchError> {
        Ok(self.alerts.lock().unwrap().clone())
    }

    async fn alert_history(&self, alert_id: &str) -> Result<Vec<HistoryEvent>, FetchError> {
        self.history_calls.lock().unwrap().push(alert_id.to_string());
        Ok(self
            .history
            .lock()
            .unwrap()
            .get(alert_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn classifications(&self) -> Result<Vec<Classification>, FetchError> {
        Ok(self.classifications.lock().unwrap().clone())
    }

    async fn corrective_actions(&self, classification_id: &str) -> Result<Vec<CorrectiveAction>, FetchError> {
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
        if self.reject.load(Ordering::SeqCst) {
            return Err(SubmitError::Rejected {
                status: 422,
                detail: "Alerta já justificado".to_string(),
            });
        }
        self.submissions.lock().unwrap().push(submission.clone());
        Ok(())
    }
}

/// Camera that always has permission and returns one small JPEG per capture.
pub struct StubCamera;

#[async_trait]
impl Camera for StubCamera {
    async fn permission(&self) -> CameraPermission {
        CameraPermission::Granted
    }

    async fn request_permission(&self) -> CameraPermission {
        CameraPermission::Granted
    }

    async fn capture(&self) -> Result<Option<PhotoAttachment>, CaptureError> {
        Ok(Some(PhotoAttachment::new("evidencia.jpg", vec![0xff, 0xd8, 0xff, 0xd9])))
    }
}
