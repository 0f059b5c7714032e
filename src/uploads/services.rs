use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::storage::{StorageClient, StorageError};

pub const UPLOAD_URL_TTL: Duration = Duration::from_secs(15 * 60);

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub upload_url: String,
    pub file_url: String,
    pub object_key: String,
    pub expires_in: u64,
}

/// Lower-cased extension including the dot, if it is an allowed image type.
fn image_extension(filename: &str) -> Option<String> {
    let dot = filename.rfind('.')?;
    let ext = filename[dot..].to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// `photos/YYYY/MM/<uuid><ext>`
fn object_key(ext: &str, now: OffsetDateTime) -> String {
    format!(
        "photos/{:04}/{:02}/{}{}",
        now.year(),
        u8::from(now.month()),
        Uuid::new_v4(),
        ext
    )
}

pub async fn presign_upload(
    storage: &dyn StorageClient,
    filename: &str,
    content_type: Option<&str>,
) -> Result<PresignedUpload, StorageError> {
    let ext = image_extension(filename).ok_or(StorageError::InvalidFileExtension)?;
    let key = object_key(&ext, OffsetDateTime::now_utc());
    let upload_url = storage
        .presign_put(&key, content_type, UPLOAD_URL_TTL)
        .await?;
    debug!(object_key = %key, "upload url presigned");
    Ok(PresignedUpload {
        upload_url,
        file_url: storage.public_url(&key),
        object_key: key,
        expires_in: UPLOAD_URL_TTL.as_secs(),
    })
}

#[cfg(test)]
mod upload_tests {
    use super::*;
    use crate::state::AppState;
    use time::macros::datetime;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("a.jpg").as_deref(), Some(".jpg"));
        assert_eq!(image_extension("a.JPEG").as_deref(), Some(".jpeg"));
        assert_eq!(image_extension("dir.v2/pic.png").as_deref(), Some(".png"));
        assert_eq!(image_extension("x.gif").as_deref(), Some(".gif"));
        assert_eq!(image_extension("x.webp").as_deref(), Some(".webp"));
        assert_eq!(image_extension("x.bmp").as_deref(), Some(".bmp"));
        assert_eq!(image_extension("x.svg"), None);
        assert_eq!(image_extension("noext"), None);
        assert_eq!(image_extension("archive.jpg.exe"), None);
    }

    #[test]
    fn test_object_key_layout() {
        let key = object_key(".png", datetime!(2024-03-09 12:00 UTC));
        assert!(key.starts_with("photos/2024/03/"));
        assert!(key.ends_with(".png"));
        let id = &key["photos/2024/03/".len()..key.len() - 4];
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_presign_upload() {
        let state = AppState::fake();
        let storage = state.storage.expect("fake storage");

        let out = presign_upload(storage.as_ref(), "holiday.JPG", Some("image/jpeg"))
            .await
            .unwrap();
        assert!(out.object_key.starts_with("photos/"));
        assert!(out.object_key.ends_with(".jpg"));
        assert!(out.upload_url.contains(&out.object_key));
        assert!(out.file_url.ends_with(&out.object_key));
        assert_eq!(out.expires_in, 900);

        let err = presign_upload(storage.as_ref(), "script.sh", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidFileExtension));
    }
}
