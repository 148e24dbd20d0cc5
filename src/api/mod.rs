//! HTTP access to the MIPI backend.

pub mod auth;
pub mod client;
pub mod codec;

pub use client::ApiClient;
pub use codec::{codec_for, SubmissionCodec, SubmissionContract};

use async_trait::async_trait;

use crate::entities::{Alert, Classification, CorrectiveAction, HistoryEvent, JustificationSubmission};
use crate::error::{FetchError, SubmitError};

pub const ALERTS_PATH: &str = "/alertas/table-alerta";
pub const HISTORY_PATH: &str = "/alertas/historico-alerta";
pub const CLASSIFICATIONS_PATH: &str = "/classificacoes";
pub const CORRECTIVE_ACTIONS_PATH: &str = "/acoes-corretivas";
pub const LOGIN_PATH: &str = "/entrar";

/// Remote alert service as seen by the workflows. Implemented over HTTP by
/// [`ApiClient`]; tests substitute in-memory fakes.
#[async_trait]
pub trait AlertService: Send + Sync {
    async fn list_alerts(&self) -> Result<Vec<Alert>, FetchError>;

    async fn alert_history(&self, alert_id: &str) -> Result<Vec<HistoryEvent>, FetchError>;

    async fn classifications(&self) -> Result<Vec<Classification>, FetchError>;

    async fn corrective_actions(&self, classification_id: &str) -> Result<Vec<CorrectiveAction>, FetchError>;

    async fn submit_justification(&self, submission: &JustificationSubmission) -> Result<(), SubmitError>;
}
