use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{ApiClient, LOGIN_PATH};
use crate::entities::Session;
use crate::error::{AuthError, StoreError};

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "userToken")]
    user_token: UserToken,
}

#[derive(Deserialize)]
struct UserToken {
    #[serde(deserialize_with = "crate::entities::string_or_number")]
    id: String,
    nome: String,
    #[serde(rename = "tipoUsuario", deserialize_with = "crate::entities::string_or_number")]
    tipo_usuario: String,
}

impl ApiClient {
    /// `POST /entrar`. On success the new session is persisted through the
    /// shared [`crate::session::SessionContext`].
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        // Any stored token rides along, as on every other request.
        let request = self.http.post(self.endpoint(LOGIN_PATH)).json(&LoginRequest {
            username: username.trim(),
            password,
        });
        let res = self
            .authorize(request)
            .await
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            warn!(status = %status, "login rejected");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: LoginResponse = res
            .json()
            .await
            .map_err(|e| AuthError::Decode(e.to_string()))?;
        if payload.access_token.is_empty() {
            return Err(AuthError::Decode("empty accessToken".to_string()));
        }

        let session = Session {
            id: payload.user_token.id,
            name: payload.user_token.nome,
            role: payload.user_token.tipo_usuario,
            access_token: payload.access_token,
        };
        self.session.login(session.clone()).await?;
        info!(user_id = %session.id, "login succeeded");
        Ok(session)
    }

    pub async fn logout(&self) -> Result<(), StoreError> {
        self.session.logout().await
    }
}
