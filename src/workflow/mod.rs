//! UI-agnostic alert workflows: list, detail, justification form.

pub mod camera;
pub mod classification;
pub mod detail;
pub mod draft;
pub mod list;

pub use camera::{Camera, CameraPermission, FileCamera};
pub use classification::{resolve_corrective_actions, ClassificationTable};
pub use detail::{AlertDetail, DetailState};
pub use draft::{JustificationDraft, MAX_PHOTOS};
pub use list::AlertList;

#[cfg(test)]
pub(crate) mod testing;
