use super::{CorrectiveAction, PhotoAttachment};

/// The unit of work sent to close out an alert.
#[derive(Clone, Debug, PartialEq)]
pub struct JustificationSubmission {
    pub alert_id: String,
    pub corrective_action: CorrectiveAction,
    pub justification: String,
    pub photos: Vec<PhotoAttachment>,
}
