use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::entities::PhotoAttachment;
use crate::error::CaptureError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPermission {
    Granted,
    Denied,
    Undetermined,
}

/// Device camera. Implementations wrap the platform capture API.
#[async_trait]
pub trait Camera: Send + Sync {
    async fn permission(&self) -> CameraPermission;

    /// Prompts the user when the OS still allows it.
    async fn request_permission(&self) -> CameraPermission;

    /// `Ok(None)` when the user backs out without taking a picture.
    async fn capture(&self) -> Result<Option<PhotoAttachment>, CaptureError>;
}

/// Asks for permission if needed. A denial carries the settings deep link.
pub async fn ensure_permission(camera: &dyn Camera) -> Result<(), CaptureError> {
    let status = match camera.permission().await {
        CameraPermission::Granted => return Ok(()),
        CameraPermission::Denied | CameraPermission::Undetermined => camera.request_permission().await,
    };
    if status == CameraPermission::Granted {
        Ok(())
    } else {
        warn!("camera permission denied");
        Err(CaptureError::permission_denied())
    }
}

/// Camera backed by image files, one file per capture. Used by the terminal
/// front end where there is no device camera.
pub struct FileCamera {
    pending: Mutex<VecDeque<PathBuf>>,
}

impl FileCamera {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            pending: Mutex::new(paths.into_iter().collect()),
        }
    }

    pub async fn remaining(&self) -> usize {
        self.pending.lock().await.len()
    }
}

#[async_trait]
impl Camera for FileCamera {
    async fn permission(&self) -> CameraPermission {
        CameraPermission::Granted
    }

    async fn request_permission(&self) -> CameraPermission {
        CameraPermission::Granted
    }

    async fn capture(&self) -> Result<Option<PhotoAttachment>, CaptureError> {
        let Some(path) = self.pending.lock().await.pop_front() else {
            return Ok(None);
        };
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => CaptureError::permission_denied(),
            _ => CaptureError::Device(format!("{}: {e}", path.display())),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "foto.jpg".to_string());
        debug!(file_name = %file_name, size = bytes.len(), "photo captured from file");
        Ok(Some(PhotoAttachment::new(file_name, bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::testing::FakeCamera;

    #[tokio::test]
    async fn undetermined_permission_is_requested() {
        let camera = FakeCamera::undetermined();
        ensure_permission(&camera).await.unwrap();
        assert_eq!(camera.permission().await, CameraPermission::Granted);
    }

    #[tokio::test]
    async fn denied_permission_offers_settings() {
        let camera = FakeCamera::denied();
        match ensure_permission(&camera).await {
            Err(CaptureError::PermissionDenied { settings_url }) => {
                assert_eq!(settings_url, crate::error::SETTINGS_DEEP_LINK)
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn file_camera_reads_each_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poste.png");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let camera = FileCamera::new(vec![path, dir.path().join("missing.jpg")]);
        let photo = camera.capture().await.unwrap().unwrap();
        assert_eq!(photo.file_name, "poste.png");
        assert_eq!(photo.mime_type, "image/png");
        assert_eq!(photo.bytes, vec![1, 2, 3]);

        assert!(matches!(camera.capture().await, Err(CaptureError::Device(_))));
        assert!(camera.capture().await.unwrap().is_none());
        assert_eq!(camera.remaining().await, 0);
    }
}
