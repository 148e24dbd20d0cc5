//! Wire encodings for a justification submission.
//!
//! The backend has shipped two incompatible contracts. Exactly one is chosen
//! per client through [`SubmissionContract`]; nothing here guesses.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

use crate::entities::{ActionSource, JustificationSubmission, PhotoAttachment};
use crate::error::SubmitError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionContract {
    /// JSON body with each photo embedded as a base64 string.
    Base64Json,
    /// `multipart/form-data` with one binary part per photo.
    Multipart,
}

impl fmt::Display for SubmissionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionContract::Base64Json => f.write_str("json"),
            SubmissionContract::Multipart => f.write_str("multipart"),
        }
    }
}

impl FromStr for SubmissionContract {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" | "base64" | "base64-json" => Ok(SubmissionContract::Base64Json),
            "multipart" | "form" => Ok(SubmissionContract::Multipart),
            other => Err(format!("unknown submission contract: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum MultipartField {
    Text {
        name: &'static str,
        value: String,
    },
    File {
        name: &'static str,
        file_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum EncodedSubmission {
    Json(Value),
    Multipart(Vec<MultipartField>),
}

pub trait SubmissionCodec: Send + Sync {
    fn contract(&self) -> SubmissionContract;
    fn encode(&self, submission: &JustificationSubmission) -> Result<EncodedSubmission, SubmitError>;
}

pub fn codec_for(contract: SubmissionContract) -> Box<dyn SubmissionCodec> {
    match contract {
        SubmissionContract::Base64Json => Box::new(Base64JsonCodec),
        SubmissionContract::Multipart => Box::new(MultipartCodec),
    }
}

// Only actions the backend listed with an id are sent by id; the text is always sent.
fn action_id(submission: &JustificationSubmission) -> Option<&str> {
    let action = &submission.corrective_action;
    match action.source {
        ActionSource::Classification => action.id.as_deref(),
        ActionSource::Fallback => None,
    }
}

fn check_photo(photo: &PhotoAttachment) -> Result<(), SubmitError> {
    if photo.bytes.is_empty() {
        return Err(SubmitError::Encoding {
            file_name: photo.file_name.clone(),
            detail: "image is empty".to_string(),
        });
    }
    Ok(())
}

/// Payload shape:
///
/// ```json
/// {
///   "alertaId": "42",
///   "acaoCorretivaId": "3",
///   "acaoCorretiva": "Falso positivo",
///   "justificativa": "...",
///   "fotos": [{ "nomeArquivo": "a.jpg", "tipo": "image/jpeg", "base64": "..." }]
/// }
/// ```
pub struct Base64JsonCodec;

impl SubmissionCodec for Base64JsonCodec {
    fn contract(&self) -> SubmissionContract {
        SubmissionContract::Base64Json
    }

    fn encode(&self, submission: &JustificationSubmission) -> Result<EncodedSubmission, SubmitError> {
        let photos = submission
            .photos
            .iter()
            .map(|photo| {
                check_photo(photo)?;
                Ok(json!({
                    "nomeArquivo": photo.file_name,
                    "tipo": photo.mime_type,
                    "base64": STANDARD.encode(&photo.bytes),
                }))
            })
            .collect::<Result<Vec<_>, SubmitError>>()?;

        Ok(EncodedSubmission::Json(json!({
            "alertaId": submission.alert_id,
            "acaoCorretivaId": action_id(submission),
            "acaoCorretiva": submission.corrective_action.text,
            "justificativa": submission.justification,
            "fotos": photos,
        })))
    }
}

/// Same field names as [`Base64JsonCodec`], photos as repeated `fotos` file parts.
pub struct MultipartCodec;

impl SubmissionCodec for MultipartCodec {
    fn contract(&self) -> SubmissionContract {
        SubmissionContract::Multipart
    }

    fn encode(&self, submission: &JustificationSubmission) -> Result<EncodedSubmission, SubmitError> {
        let mut fields = vec![MultipartField::Text {
            name: "alertaId",
            value: submission.alert_id.clone(),
        }];
        if let Some(id) = action_id(submission) {
            fields.push(MultipartField::Text {
                name: "acaoCorretivaId",
                value: id.to_string(),
            });
        }
        fields.push(MultipartField::Text {
            name: "acaoCorretiva",
            value: submission.corrective_action.text.clone(),
        });
        fields.push(MultipartField::Text {
            name: "justificativa",
            value: submission.justification.clone(),
        });
        for photo in &submission.photos {
            check_photo(photo)?;
            fields.push(MultipartField::File {
                name: "fotos",
                file_name: photo.file_name.clone(),
                mime_type: photo.mime_type.clone(),
                bytes: photo.bytes.clone(),
            });
        }
        Ok(EncodedSubmission::Multipart(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CorrectiveAction;

    fn submission(action: CorrectiveAction) -> JustificationSubmission {
        JustificationSubmission {
            alert_id: "42".into(),
            corrective_action: action,
            justification: "Teste".into(),
            photos: vec![PhotoAttachment::new("evidencia.jpg", vec![0xff, 0xd8, 0xff])],
        }
    }

    fn server_action() -> CorrectiveAction {
        CorrectiveAction {
            id: Some("3".into()),
            text: "Troca de medidor".into(),
            source: ActionSource::Classification,
        }
    }

    #[test]
    fn json_embeds_base64_photos() {
        let encoded = Base64JsonCodec.encode(&submission(server_action())).unwrap();
        let EncodedSubmission::Json(body) = encoded else {
            panic!("expected json");
        };
        assert_eq!(body["alertaId"], "42");
        assert_eq!(body["acaoCorretivaId"], "3");
        assert_eq!(body["justificativa"], "Teste");
        assert_eq!(body["fotos"][0]["base64"], "/9j/");
        assert_eq!(body["fotos"][0]["tipo"], "image/jpeg");
    }

    #[test]
    fn fallback_action_is_sent_by_text_only() {
        let fallback = CorrectiveAction::fallback_list().remove(3);
        let EncodedSubmission::Json(body) = Base64JsonCodec.encode(&submission(fallback)).unwrap()
        else {
            panic!("expected json");
        };
        assert!(body["acaoCorretivaId"].is_null());
        assert_eq!(body["acaoCorretiva"], "Falso positivo");

        let fallback = CorrectiveAction::fallback_list().remove(3);
        let EncodedSubmission::Multipart(fields) = MultipartCodec.encode(&submission(fallback)).unwrap()
        else {
            panic!("expected multipart");
        };
        assert!(!fields
            .iter()
            .any(|f| matches!(f, MultipartField::Text { name: "acaoCorretivaId", .. })));
    }

    #[test]
    fn server_action_without_id_sends_null() {
        let mut action = server_action();
        action.id = None;
        let EncodedSubmission::Json(body) = Base64JsonCodec.encode(&submission(action)).unwrap() else {
            panic!("expected json");
        };
        assert!(body["acaoCorretivaId"].is_null());
        assert_eq!(body["acaoCorretiva"], "Troca de medidor");
    }

    #[test]
    fn multipart_has_one_part_per_photo() {
        let mut s = submission(server_action());
        s.photos.push(PhotoAttachment::new("b.png", vec![1, 2, 3]));
        let EncodedSubmission::Multipart(fields) = MultipartCodec.encode(&s).unwrap() else {
            panic!("expected multipart");
        };
        let files = fields
            .iter()
            .filter(|f| matches!(f, MultipartField::File { name: "fotos", .. }))
            .count();
        assert_eq!(files, 2);
    }

    #[test]
    fn empty_image_is_an_encoding_error() {
        let mut s = submission(server_action());
        s.photos[0].bytes.clear();
        assert!(matches!(
            Base64JsonCodec.encode(&s),
            Err(SubmitError::Encoding { .. })
        ));
    }

    #[test]
    fn codec_for_honours_the_contract() {
        assert_eq!(codec_for(SubmissionContract::Multipart).contract(), SubmissionContract::Multipart);
        assert_eq!("json".parse::<SubmissionContract>(), Ok(SubmissionContract::Base64Json));
    }
}
