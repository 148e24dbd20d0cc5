use serde::{Deserialize, Serialize};

use super::string_or_number;

/// The authenticated identity. Serialized as-is under the session storage key.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "tipoUsuario")]
    pub role: String,
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("role", &self.role)
            .field("access_token", &"<redacted>")
            .finish()
    }
}
