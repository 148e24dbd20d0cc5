//! Error taxonomy for the alert client.
//!
//! Every failure is caught at the operation boundary and turned into a
//! user-facing prompt through `user_message()`. The `Display` form carries
//! the technical detail and is what gets logged.

use thiserror::Error;

/// Deep link that opens the OS settings page for this app.
pub const SETTINGS_DEEP_LINK: &str = "app-settings:";

/// Failure while loading a list (alerts, history, classifications, actions).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{path} answered {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },
    #[error("could not decode response from {path}: {detail}")]
    Decode { path: String, detail: String },
    #[error("invalid request url for {path}: {detail}")]
    InvalidUrl { path: String, detail: String },
    #[error("could not read session token: {0}")]
    Store(#[from] StoreError),
}

impl FetchError {
    pub fn user_message(&self) -> String {
        "Não foi possível carregar os dados. Puxe para atualizar ou tente novamente.".to_string()
    }
}

/// A required justification field is missing. Blocks the network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("corrective action not selected")]
    MissingCorrectiveAction,
    #[error("justification text is empty")]
    MissingJustification,
    #[error("at least one photo attachment is required")]
    AttachmentRequired,
}

impl ValidationError {
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCorrectiveAction | Self::MissingJustification => {
                "Preencha todos os campos obrigatórios.".to_string()
            }
            Self::AttachmentRequired => "Anexe ao menos uma foto como evidência.".to_string(),
        }
    }
}

/// Failure of a justification submit attempt.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no bearer token in the session store")]
    AuthTokenMissing,
    #[error("justification form is not open (state: {0})")]
    NotReady(&'static str),
    #[error("could not encode attachment {file_name}: {detail}")]
    Encoding { file_name: String, detail: String },
    #[error("justification rejected with {status}: {detail}")]
    Rejected { status: u16, detail: String },
    #[error("justification request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("could not read session token: {0}")]
    Store(#[from] StoreError),
}

impl SubmitError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.user_message(),
            Self::AuthTokenMissing => {
                "Sessão expirada ou inválida. Entre novamente para enviar a justificativa."
                    .to_string()
            }
            Self::NotReady(_) => "Aguarde o envio em andamento.".to_string(),
            Self::Encoding { file_name, .. } => {
                format!("Não foi possível processar a foto {file_name}.")
            }
            Self::Rejected { status, detail } => {
                format!("Erro ao enviar justificativa ({status}): {detail}")
            }
            Self::Transport(e) => format!("Erro ao enviar justificativa: {e}"),
            Self::Store(_) => "Não foi possível ler a sessão salva.".to_string(),
        }
    }

    /// Short label used for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::AuthTokenMissing => "auth_token_missing",
            Self::NotReady(_) => "not_ready",
            Self::Encoding { .. } => "encoding",
            Self::Rejected { .. } => "rejected",
            Self::Transport(_) => "transport",
            Self::Store(_) => "store",
        }
    }
}

/// Failure while acquiring a photo.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("camera permission denied")]
    PermissionDenied { settings_url: &'static str },
    #[error("photo limit of {max} reached")]
    LimitReached { max: usize },
    #[error("justification form is not open")]
    FormClosed,
    #[error("camera failure: {0}")]
    Device(String),
}

impl CaptureError {
    pub fn permission_denied() -> Self {
        Self::PermissionDenied {
            settings_url: SETTINGS_DEEP_LINK,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied { settings_url } => format!(
                "Permissão de câmera negada. Libere o acesso nas configurações ({settings_url})."
            ),
            Self::LimitReached { max } => format!("Limite de {max} fotos atingido."),
            Self::FormClosed => "Abra o formulário de justificativa primeiro.".to_string(),
            Self::Device(_) => "Não foi possível capturar a foto.".to_string(),
        }
    }
}

/// Failure of the secure key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store i/o on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("stored record under {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid store key {0:?}")]
    InvalidKey(String),
}

/// Failure of the login flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("login rejected with {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("login request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("unexpected login response: {0}")]
    Decode(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => "Informe usuário e senha.".to_string(),
            Self::Rejected { status, .. } if *status == 401 || *status == 400 => {
                "Usuário ou senha inválidos.".to_string()
            }
            Self::Rejected { .. } | Self::Transport(_) | Self::Decode(_) => {
                "Não foi possível entrar. Tente novamente.".to_string()
            }
            Self::Store(_) => "Não foi possível salvar a sessão.".to_string(),
        }
    }
}

/// Invalid configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
