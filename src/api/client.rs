use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, info, warn};

use super::codec::{codec_for, EncodedSubmission, MultipartField, SubmissionCodec, SubmissionContract};
use super::{AlertService, ALERTS_PATH, CLASSIFICATIONS_PATH, CORRECTIVE_ACTIONS_PATH, HISTORY_PATH};
use crate::config::ClientConfig;
use crate::entities::{Alert, Classification, CorrectiveAction, HistoryEvent, JustificationSubmission};
use crate::error::{ConfigError, FetchError, SubmitError};
use crate::session::SessionContext;

// Keeps logged error bodies readable when the server returns an HTML page.
const MAX_ERROR_BODY: usize = 512;

/// Keys tried, in order, when pulling a human message out of a JSON error body.
const ERROR_DETAIL_FIELDS: &[&str] = &["message", "mensagem", "detail", "title", "error", "erro"];

pub struct ApiClient {
    pub(crate) http: Client,
    pub(crate) base_url: String,
    submit_path: String,
    pub(crate) session: SessionContext,
    codec: Box<dyn SubmissionCodec>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            submit_path: config.submit_path.clone(),
            session,
            codec: codec_for(config.submission_contract),
        })
    }

    pub fn contract(&self) -> SubmissionContract {
        self.codec.contract()
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn url(&self, path: &str) -> Result<Url, FetchError> {
        Url::parse(&self.endpoint(path)).map_err(|e| FetchError::InvalidUrl {
            path: path.to_string(),
            detail: e.to_string(),
        })
    }

    /// Attaches the bearer token as it is in the store right now. A store
    /// failure is logged and the request goes out unauthenticated.
    pub(crate) async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token().await {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, "could not read token for request");
                request
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, path: &str) -> Result<T, FetchError> {
        let request = self.authorize(self.http.get(url)).await;
        let res = request.send().await.map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Transport {
            path: path.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Decode {
            path: path.to_string(),
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl AlertService for ApiClient {
    async fn list_alerts(&self) -> Result<Vec<Alert>, FetchError> {
        let url = self.url(ALERTS_PATH)?;
        self.get_json(url, ALERTS_PATH).await
    }

    async fn alert_history(&self, alert_id: &str) -> Result<Vec<HistoryEvent>, FetchError> {
        let mut url = self.url(HISTORY_PATH)?;
        url.query_pairs_mut().append_pair("AlertaId", alert_id);
        self.get_json(url, HISTORY_PATH).await
    }

    async fn classifications(&self) -> Result<Vec<Classification>, FetchError> {
        let url = self.url(CLASSIFICATIONS_PATH)?;
        self.get_json(url, CLASSIFICATIONS_PATH).await
    }

    async fn corrective_actions(&self, classification_id: &str) -> Result<Vec<CorrectiveAction>, FetchError> {
        let mut url = self.url(CORRECTIVE_ACTIONS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                path: CORRECTIVE_ACTIONS_PATH.to_string(),
                detail: "base url cannot take path segments".to_string(),
            })?
            .push(classification_id);

        let records: Vec<Value> = self.get_json(url, CORRECTIVE_ACTIONS_PATH).await?;
        let total = records.len();
        let actions: Vec<CorrectiveAction> = records
            .iter()
            .filter_map(CorrectiveAction::from_record)
            .collect();
        if actions.len() < total {
            warn!(
                classification_id,
                dropped = total - actions.len(),
                "corrective action records without a label"
            );
        }
        Ok(actions)
    }

    async fn submit_justification(&self, submission: &JustificationSubmission) -> Result<(), SubmitError> {
        let token = self
            .session
            .bearer_token()
            .await?
            .ok_or(SubmitError::AuthTokenMissing)?;

        let request = self
            .http
            .post(self.endpoint(&self.submit_path))
            .bearer_auth(token);
        let request = match self.codec.encode(submission)? {
            EncodedSubmission::Json(body) => request.json(&body),
            EncodedSubmission::Multipart(fields) => request.multipart(build_form(fields)?),
        };

        let started = Instant::now();
        let res = request.send().await.map_err(SubmitError::Transport)?;
        crate::metrics::record_submit_duration(started.elapsed().as_secs_f64());

        let status = res.status();
        if status.is_success() {
            info!(
                alert_id = %submission.alert_id,
                photos = submission.photos.len(),
                contract = %self.codec.contract(),
                "justification accepted"
            );
            return Ok(());
        }

        let body = res.text().await.unwrap_or_default();
        error!(alert_id = %submission.alert_id, status = %status, body = %truncate(&body), "justification rejected");
        let detail = error_detail(&body)
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| status.to_string());
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

fn build_form(fields: Vec<MultipartField>) -> Result<Form, SubmitError> {
    let mut form = Form::new();
    for field in fields {
        form = match field {
            MultipartField::Text { name, value } => form.text(name, value),
            MultipartField::File {
                name,
                file_name,
                mime_type,
                bytes,
            } => {
                let part = Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(&mime_type)
                    .map_err(|e| SubmitError::Encoding {
                        file_name,
                        detail: e.to_string(),
                    })?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

/// Server message from a JSON error body, or the raw body when it is not JSON.
fn error_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let found = ERROR_DETAIL_FIELDS
            .iter()
            .find_map(|field| value.get(field).and_then(Value::as_str))
            .filter(|s| !s.trim().is_empty());
        if let Some(message) = found {
            return Some(message.to_string());
        }
    }
    Some(truncate(body))
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}
