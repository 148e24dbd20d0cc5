use crate::entities::{CorrectiveAction, JustificationSubmission, PhotoAttachment};
use crate::error::{CaptureError, ValidationError};

/// Upper bound on photos attached to one justification.
pub const MAX_PHOTOS: usize = 5;

/// Form state for one justification. All of it is discarded when the detail
/// view closes or a submission succeeds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct JustificationDraft {
    corrective_action: Option<CorrectiveAction>,
    justification: String,
    photos: Vec<PhotoAttachment>,
    attachment_required: bool,
}

impl JustificationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn corrective_action(&self) -> Option<&CorrectiveAction> {
        self.corrective_action.as_ref()
    }

    pub fn set_corrective_action(&mut self, action: Option<CorrectiveAction>) {
        self.corrective_action = action;
    }

    pub fn justification(&self) -> &str {
        &self.justification
    }

    pub fn set_justification(&mut self, text: impl Into<String>) {
        self.justification = text.into();
    }

    pub fn photos(&self) -> &[PhotoAttachment] {
        &self.photos
    }

    /// Sticky flag raised by a submit without photos or by removing the last
    /// photo; cleared by the next successful add.
    pub fn attachment_required(&self) -> bool {
        self.attachment_required
    }

    pub fn can_add_photo(&self) -> bool {
        self.photos.len() < MAX_PHOTOS
    }

    pub fn add_photo(&mut self, photo: PhotoAttachment) -> Result<(), CaptureError> {
        if !self.can_add_photo() {
            return Err(CaptureError::LimitReached { max: MAX_PHOTOS });
        }
        self.photos.push(photo);
        self.attachment_required = false;
        Ok(())
    }

    pub fn remove_photo(&mut self, index: usize) -> Option<PhotoAttachment> {
        if index >= self.photos.len() {
            return None;
        }
        let removed = self.photos.remove(index);
        if self.photos.is_empty() {
            self.attachment_required = true;
        }
        Some(removed)
    }

    /// Checks, in order: corrective action, justification text, photos.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.corrective_action.is_none() {
            return Err(ValidationError::MissingCorrectiveAction);
        }
        if self.justification.trim().is_empty() {
            return Err(ValidationError::MissingJustification);
        }
        if self.photos.is_empty() {
            self.attachment_required = true;
            return Err(ValidationError::AttachmentRequired);
        }
        Ok(())
    }

    pub fn to_submission(&self, alert_id: &str) -> Result<JustificationSubmission, ValidationError> {
        let action = self
            .corrective_action
            .clone()
            .ok_or(ValidationError::MissingCorrectiveAction)?;
        Ok(JustificationSubmission {
            alert_id: alert_id.to_string(),
            corrective_action: action,
            justification: self.justification.trim().to_string(),
            photos: self.photos.clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(n: usize) -> PhotoAttachment {
        PhotoAttachment::new(format!("foto-{n}.jpg"), vec![n as u8 + 1])
    }

    fn complete() -> JustificationDraft {
        let mut draft = JustificationDraft::new();
        draft.set_corrective_action(CorrectiveAction::fallback_list().pop());
        draft.set_justification("Teste");
        draft.add_photo(photo(0)).unwrap();
        draft
    }

    #[test]
    fn validation_order() {
        let mut draft = JustificationDraft::new();
        draft.set_justification("texto");
        draft.add_photo(photo(0)).unwrap();
        assert_eq!(draft.validate(), Err(ValidationError::MissingCorrectiveAction));

        draft.set_corrective_action(CorrectiveAction::fallback_list().pop());
        draft.set_justification("   ");
        assert_eq!(draft.validate(), Err(ValidationError::MissingJustification));

        draft.set_justification("ok");
        draft.remove_photo(0);
        assert_eq!(draft.validate(), Err(ValidationError::AttachmentRequired));
        assert!(draft.attachment_required());
    }

    #[test]
    fn sticky_attachment_flag() {
        let mut draft = complete();
        assert!(!draft.attachment_required());

        draft.remove_photo(0);
        assert!(draft.attachment_required());

        draft.add_photo(photo(1)).unwrap();
        assert!(!draft.attachment_required());
    }

    #[test]
    fn removing_one_of_many_keeps_flag_down() {
        let mut draft = complete();
        draft.add_photo(photo(1)).unwrap();
        assert_eq!(draft.remove_photo(0).unwrap().file_name, "foto-0.jpg");
        assert!(!draft.attachment_required());
        assert!(draft.remove_photo(5).is_none());
    }

    #[test]
    fn photo_limit() {
        let mut draft = JustificationDraft::new();
        for n in 0..MAX_PHOTOS {
            draft.add_photo(photo(n)).unwrap();
        }
        assert!(!draft.can_add_photo());
        assert!(matches!(
            draft.add_photo(photo(9)),
            Err(CaptureError::LimitReached { max: MAX_PHOTOS })
        ));
        assert_eq!(draft.photos().len(), MAX_PHOTOS);
    }

    #[test]
    fn submission_carries_trimmed_text_and_photos() {
        let mut draft = complete();
        draft.set_justification("  Teste  ");
        let submission = draft.to_submission("42").unwrap();
        assert_eq!(submission.alert_id, "42");
        assert_eq!(submission.justification, "Teste");
        assert_eq!(submission.photos.len(), 1);

        draft.clear();
        assert_eq!(draft, JustificationDraft::default());
    }
}
