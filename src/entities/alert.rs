use serde::{Deserialize, Serialize};

use super::{null_as_default, opt_string_or_number, string_or_number};
use crate::theme::{theme_for, CardTheme};

/// One reported anomaly. Created and mutated only by the backend.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Alert {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Classification label. Some backend versions put the id here instead.
    #[serde(rename = "classificacao", default, deserialize_with = "opt_string_or_number")]
    pub classification: Option<String>,
    #[serde(rename = "classificacaoId", default, deserialize_with = "opt_string_or_number")]
    pub classification_id: Option<String>,
    #[serde(rename = "prefixo", default)]
    pub prefix: Option<String>,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "dataOcorrencia", alias = "data", default)]
    pub occurred_at: Option<String>,
    /// Open, server-defined vocabulary.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "icone", default)]
    pub icon: Option<String>,
}

impl Alert {
    /// Classification references to try, id first.
    pub fn classification_refs(&self) -> impl Iterator<Item = &str> {
        self.classification_id
            .as_deref()
            .into_iter()
            .chain(self.classification.as_deref())
    }

    pub fn theme(&self) -> CardTheme {
        theme_for(&self.status)
    }

    /// Icon hint from the record, or one derived from the status.
    pub fn icon_name(&self) -> &str {
        match self.icon.as_deref() {
            Some(icon) if !icon.is_empty() => icon,
            _ => match self.status.as_str() {
                "Recusado" => "error-outline",
                "Não Respondido" => "warning",
                "Aguardando Resposta" => "sync-problem",
                _ => "info-outline",
            },
        }
    }
}
