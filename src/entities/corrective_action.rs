use serde::Serialize;
use serde_json::Value;

/// Field names tried, in order, for a corrective action's display label.
/// The backend is not consistent about which one it fills in.
pub const ACTION_LABEL_FIELDS: &[&str] = &[
    "descricao",
    "descricaoAcao",
    "acaoCorretiva",
    "nome",
    "texto",
    "label",
    "value",
];

/// Field names tried, in order, for a corrective action's id.
pub const ACTION_ID_FIELDS: &[&str] = &["id", "acaoCorretivaId", "key"];

/// Generic actions offered when no classification-scoped list is available.
pub const FALLBACK_ACTIONS: [&str; 5] = [
    "Equipe em treinamento",
    "Problema técnico resolvido",
    "Manutenção preventiva",
    "Falso positivo",
    "Outro",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ActionSource {
    Classification,
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CorrectiveAction {
    /// Server id. `None` for generic actions and for records that carry none.
    pub id: Option<String>,
    pub text: String,
    pub source: ActionSource,
}

impl CorrectiveAction {
    /// Builds an action from a loosely-shaped server record. Records without
    /// a usable label are dropped.
    pub fn from_record(record: &Value) -> Option<Self> {
        let text = first_non_empty(record, ACTION_LABEL_FIELDS)?;
        Some(Self {
            id: first_non_empty(record, ACTION_ID_FIELDS),
            text,
            source: ActionSource::Classification,
        })
    }

    pub fn fallback_list() -> Vec<Self> {
        FALLBACK_ACTIONS
            .iter()
            .map(|text| Self {
                id: None,
                text: text.to_string(),
                source: ActionSource::Fallback,
            })
            .collect()
    }

    /// Matches either the id or the display text, case-insensitively on the text.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim();
        self.id.as_deref() == Some(needle) || self.text.to_lowercase() == needle.to_lowercase()
    }
}

fn first_non_empty(record: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| match record.get(field)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
