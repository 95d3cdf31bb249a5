/// Post form parsing
///
/// Reads the `multipart/form-data` body of the post form: a `status` text
/// field and at most one `image` file. The image is streamed to a temporary
/// file in the upload directory and handed on by path and declared MIME
/// type. The file is removed when the attachment is dropped, including when
/// the request future is cancelled mid-flight.
use actix_multipart::{Field, Multipart};
use futures_util::StreamExt;
use std::path::Path;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};

const STATUS_FIELD: &str = "status";
const IMAGE_FIELD: &str = "image";
const MAX_STATUS_BYTES: usize = 64 * 1024;
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
const UPLOAD_PREFIX: &str = "upload-";

/// An uploaded image held on local disk for the duration of a request.
#[derive(Debug)]
pub struct ImageAttachment {
    /// Deleted on drop
    pub path: TempPath,
    /// MIME type declared by the browser; not sniffed
    pub mime_type: String,
}

impl ImageAttachment {
    pub fn new(path: TempPath, mime_type: impl Into<String>) -> Self {
        Self {
            path,
            mime_type: mime_type.into(),
        }
    }
}

/// The submitted post form.
#[derive(Debug, Default)]
pub struct PostSubmission {
    pub status: String,
    pub image: Option<ImageAttachment>,
}

impl PostSubmission {
    pub fn new(status: impl Into<String>, image: Option<ImageAttachment>) -> Self {
        Self {
            status: status.into(),
            image,
        }
    }
}

/// Parse the post form, storing the image under `upload_dir`.
pub async fn read_post_form(
    mut payload: Multipart,
    upload_dir: &Path,
    max_image_bytes: usize,
) -> Result<PostSubmission> {
    let mut submission = PostSubmission::default();

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let name = field.name().unwrap_or_default().to_string();
        let has_file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .is_some();

        match (name.as_str(), has_file_name) {
            (IMAGE_FIELD, true) => {
                if submission.image.is_some() {
                    return Err(AppError::BadRequest(
                        "Only one image may be attached".into(),
                    ));
                }
                submission.image = store_image(&mut field, upload_dir, max_image_bytes).await?;
            }
            (_, true) => {
                return Err(AppError::BadRequest(format!(
                    "Unexpected file field: {}",
                    name
                )));
            }
            (STATUS_FIELD, false) => {
                submission.status = read_text(&mut field).await?;
            }
            _ => drain(&mut field).await?,
        }
    }

    Ok(submission)
}

async fn read_text(field: &mut Field) -> Result<String> {
    let mut buf = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > MAX_STATUS_BYTES {
            return Err(AppError::PayloadTooLarge("Status text is too long".into()));
        }
        buf.extend_from_slice(&chunk);
    }

    String::from_utf8(buf).map_err(|_| AppError::BadRequest("Status must be UTF-8 text".into()))
}

async fn drain(field: &mut Field) -> Result<()> {
    while let Some(chunk) = field.next().await {
        chunk?;
    }
    Ok(())
}

/// Stream a file field to disk. Returns `None` for an empty part, which is
/// what browsers send when no file was chosen.
async fn store_image(
    field: &mut Field,
    upload_dir: &Path,
    max_bytes: usize,
) -> Result<Option<ImageAttachment>> {
    let mime_type = field
        .content_type()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

    tokio::fs::create_dir_all(upload_dir).await?;
    let (file, path) = tempfile::Builder::new()
        .prefix(UPLOAD_PREFIX)
        .tempfile_in(upload_dir)?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut size = 0usize;
    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        size += chunk.len();
        if size > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds {} bytes",
                max_bytes
            )));
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    if size == 0 {
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), size, %mime_type, "image stored");
    Ok(Some(ImageAttachment::new(path, mime_type)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropping_attachment_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = tempfile::Builder::new()
            .prefix(UPLOAD_PREFIX)
            .tempfile_in(dir.path())
            .unwrap()
            .into_temp_path();
        let on_disk = path.to_path_buf();
        let submission =
            PostSubmission::new("hi", Some(ImageAttachment::new(path, "image/png")));
        assert!(on_disk.exists());

        drop(submission);

        assert!(!on_disk.exists());
    }
}
