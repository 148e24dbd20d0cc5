use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::theme::color_for;

/// One entry of an alert's audit trail. Server order is authoritative.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct HistoryEvent {
    #[serde(rename = "dataOcorrencia", default, deserialize_with = "null_as_default")]
    pub occurred_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "descricaoAlerta", default, deserialize_with = "null_as_default")]
    pub description: String,
}

impl HistoryEvent {
    pub fn dot_color(&self) -> &'static str {
        color_for(&self.status)
    }
}
