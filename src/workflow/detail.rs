//! Detail view for one alert: history timeline plus the justification form.
//!
//! ```text
//! Closed ──open──▶ LoadingHistory ──ok/err──▶ HistoryShown ◀──cancel── FormOpen
//!                                               │                      ▲   │
//!                                               └──────open_form───────┘   │ submit
//!                  HistoryShown ◀──refetch── Submitting ◀──────────────────┘
//!                                              └──failure──▶ FormOpen
//! ```
//!
//! `close` returns to `Closed` from any state and drops all transient data.

use std::sync::Arc;

use tracing::{error, info, warn};

use super::camera::{ensure_permission, Camera};
use super::classification::{resolve_corrective_actions, ClassificationTable};
use super::draft::{JustificationDraft, MAX_PHOTOS};
use crate::api::AlertService;
use crate::entities::{Alert, CorrectiveAction, HistoryEvent, PhotoAttachment};
use crate::error::{CaptureError, SubmitError};
use crate::session::SessionContext;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailState {
    Closed,
    LoadingHistory,
    HistoryShown,
    FormOpen,
    Submitting,
}

impl DetailState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetailState::Closed => "closed",
            DetailState::LoadingHistory => "loading_history",
            DetailState::HistoryShown => "history_shown",
            DetailState::FormOpen => "form_open",
            DetailState::Submitting => "submitting",
        }
    }
}

pub struct AlertDetail {
    service: Arc<dyn AlertService>,
    session: SessionContext,
    classifications: Arc<ClassificationTable>,
    state: DetailState,
    alert: Option<Alert>,
    history: Vec<HistoryEvent>,
    actions: Vec<CorrectiveAction>,
    draft: JustificationDraft,
    error: Option<String>,
}

impl AlertDetail {
    pub fn new(
        service: Arc<dyn AlertService>,
        session: SessionContext,
        classifications: Arc<ClassificationTable>,
    ) -> Self {
        Self {
            service,
            session,
            classifications,
            state: DetailState::Closed,
            alert: None,
            history: Vec::new(),
            actions: Vec::new(),
            draft: JustificationDraft::default(),
            error: None,
        }
    }

    pub fn state(&self) -> DetailState {
        self.state
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn history(&self) -> &[HistoryEvent] {
        &self.history
    }

    pub fn corrective_actions(&self) -> &[CorrectiveAction] {
        &self.actions
    }

    pub fn draft(&self) -> &JustificationDraft {
        &self.draft
    }

    /// Last user-facing error, cleared by the next successful step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        self.state == DetailState::FormOpen
    }

    /// Opens the view for `alert`, loading history and resolving corrective
    /// actions concurrently. A history failure still lands in `HistoryShown`,
    /// with an empty timeline and the error surfaced.
    pub async fn open(&mut self, alert: Alert) {
        self.reset();
        self.state = DetailState::LoadingHistory;
        info!(alert_id = %alert.id, status = %alert.status, "opening alert detail");

        let service = self.service.as_ref();
        let (history, actions) = futures::join!(
            service.alert_history(&alert.id),
            resolve_corrective_actions(service, &self.classifications, &alert),
        );

        self.actions = actions;
        self.alert = Some(alert);
        self.apply_history(history);
    }

    /// Re-fetches the timeline for the open alert.
    pub async fn reload_history(&mut self) {
        let Some(alert_id) = self.alert.as_ref().map(|a| a.id.clone()) else {
            return;
        };
        let returning_to = self.state;
        self.state = DetailState::LoadingHistory;
        let result = self.service.alert_history(&alert_id).await;
        self.apply_history(result);
        if returning_to == DetailState::FormOpen {
            self.state = DetailState::FormOpen;
        }
    }

    fn apply_history(&mut self, result: Result<Vec<HistoryEvent>, crate::error::FetchError>) {
        match result {
            Ok(history) => {
                self.history = history;
                self.error = None;
            }
            Err(e) => {
                error!(error = %e, "failed to load alert history");
                crate::metrics::increment_fetch_failures("history");
                self.history.clear();
                self.error = Some(e.user_message());
            }
        }
        self.state = DetailState::HistoryShown;
    }

    pub fn open_form(&mut self) -> bool {
        if self.state != DetailState::HistoryShown {
            return false;
        }
        self.state = DetailState::FormOpen;
        true
    }

    /// Back to the timeline. The draft is kept until the view closes.
    pub fn cancel_form(&mut self) -> bool {
        if self.state != DetailState::FormOpen {
            return false;
        }
        self.state = DetailState::HistoryShown;
        true
    }

    /// Selects a corrective action from the resolved list by id or text.
    pub fn select_action(&mut self, needle: &str) -> Option<&CorrectiveAction> {
        if self.state != DetailState::FormOpen {
            return None;
        }
        let action = self.actions.iter().find(|a| a.matches(needle))?.clone();
        self.draft.set_corrective_action(Some(action));
        self.draft.corrective_action()
    }

    pub fn set_justification(&mut self, text: impl Into<String>) -> bool {
        if self.state != DetailState::FormOpen {
            return false;
        }
        self.draft.set_justification(text);
        true
    }

    /// Takes one photo. The limit is checked before the camera is touched.
    /// Returns `false` when the user backed out of the capture.
    pub async fn capture_photo(&mut self, camera: &dyn Camera) -> Result<bool, CaptureError> {
        let result = self.try_capture(camera).await;
        if let Err(e) = &result {
            warn!(error = %e, "photo capture failed");
            self.error = Some(e.user_message());
        }
        result
    }

    async fn try_capture(&mut self, camera: &dyn Camera) -> Result<bool, CaptureError> {
        if self.state != DetailState::FormOpen {
            return Err(CaptureError::FormClosed);
        }
        if !self.draft.can_add_photo() {
            return Err(CaptureError::LimitReached { max: MAX_PHOTOS });
        }
        ensure_permission(camera).await?;
        match camera.capture().await? {
            Some(photo) => {
                self.draft.add_photo(photo)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<PhotoAttachment> {
        if self.state != DetailState::FormOpen {
            return None;
        }
        self.draft.remove_photo(index)
    }

    /// Validates and sends the draft. No network call happens unless the
    /// draft is complete and a token is stored. On success the draft is
    /// cleared and the history re-fetched once; on failure the form stays
    /// open with the draft untouched.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        let result = self.try_submit().await;
        match &result {
            Ok(()) => crate::metrics::increment_justifications_submitted(),
            Err(e) => {
                warn!(error = %e, reason = e.reason(), "justification not sent");
                crate::metrics::increment_justifications_failed(e.reason());
                self.error = Some(e.user_message());
            }
        }
        result
    }

    async fn try_submit(&mut self) -> Result<(), SubmitError> {
        if self.state != DetailState::FormOpen {
            return Err(SubmitError::NotReady(self.state.as_str()));
        }
        let Some(alert_id) = self.alert.as_ref().map(|a| a.id.clone()) else {
            return Err(SubmitError::NotReady(self.state.as_str()));
        };

        self.draft.validate()?;
        if self.session.bearer_token().await?.is_none() {
            return Err(SubmitError::AuthTokenMissing);
        }
        let submission = self.draft.to_submission(&alert_id)?;

        self.state = DetailState::Submitting;
        if let Err(e) = self.service.submit_justification(&submission).await {
            self.state = DetailState::FormOpen;
            return Err(e);
        }

        info!(alert_id = %alert_id, "justification submitted");
        self.draft.clear();
        self.error = None;
        let history = self.service.alert_history(&alert_id).await;
        self.apply_history(history);
        Ok(())
    }

    /// Closes the view from any state, discarding form and attachment data.
    pub fn close(&mut self) {
        self.reset();
        self.state = DetailState::Closed;
    }

    fn reset(&mut self) {
        self.alert = None;
        self.history.clear();
        self.actions.clear();
        self.draft.clear();
        self.error = None;
    }
}
