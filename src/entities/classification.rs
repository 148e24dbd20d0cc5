use serde::{Deserialize, Serialize};

use super::{null_as_default, string_or_number};

/// `{key, value}` pair from `GET /classificacoes`: id and display label.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classification {
    #[serde(deserialize_with = "string_or_number")]
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}
