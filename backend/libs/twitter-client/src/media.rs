//! Chunked media upload (INIT / APPEND / FINALIZE / STATUS).

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info};

use crate::client::{ensure_success, TwitterClient};
use crate::error::{TwitterError, TwitterResult};
use crate::types::Credentials;

const DEFAULT_CHECK_AFTER_SECS: u64 = 1;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MediaUploadResponse {
    pub media_id_string: String,
    #[serde(default)]
    pub processing_info: Option<ProcessingInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ProcessingInfo {
    pub state: ProcessingState,
    #[serde(default)]
    pub check_after_secs: Option<u64>,
    #[serde(default)]
    pub error: Option<ProcessingError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum ProcessingState {
    Pending,
    InProgress,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct ProcessingError {
    #[serde(default)]
    pub message: Option<String>,
}

/// Upload category Twitter expects for a given MIME type.
pub fn media_category(mime_type: &str) -> &'static str {
    if mime_type.eq_ignore_ascii_case("image/gif") {
        "tweet_gif"
    } else if mime_type.to_ascii_lowercase().starts_with("video/") {
        "tweet_video"
    } else {
        "tweet_image"
    }
}

impl TwitterClient {
    fn upload_endpoint(&self) -> String {
        format!("{}/1.1/media/upload.json", self.config.upload_url)
    }

    pub(crate) async fn chunked_upload(
        &self,
        credentials: &Credentials,
        path: &Path,
        mime_type: &str,
    ) -> TwitterResult<String> {
        let bytes = tokio::fs::read(path).await?;
        let url = self.upload_endpoint();
        let total_bytes = bytes.len().to_string();

        let init_params = [
            ("command", "INIT"),
            ("total_bytes", total_bytes.as_str()),
            ("media_type", mime_type),
            ("media_category", media_category(mime_type)),
        ];
        let auth = self
            .signer
            .sign("POST", &url, &init_params, Some(credentials))?;
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .form(&init_params)
            .send()
            .await?;
        let init: MediaUploadResponse = Self::json(response).await?;
        let media_id = init.media_id_string;
        debug!(%media_id, total_bytes = bytes.len(), "media upload initialized");

        for (segment_index, chunk) in bytes.chunks(self.config.media_chunk_size.max(1)).enumerate() {
            // Multipart bodies are excluded from the signature.
            let auth = self.signer.sign("POST", &url, &[], Some(credentials))?;
            let form = Form::new()
                .text("command", "APPEND")
                .text("media_id", media_id.clone())
                .text("segment_index", segment_index.to_string())
                .part("media", Part::bytes(chunk.to_vec()));

            let response = self
                .http
                .post(&url)
                .header(reqwest::header::AUTHORIZATION, auth)
                .multipart(form)
                .send()
                .await?;
            ensure_success(response).await?;
            debug!(%media_id, segment_index, "media segment appended");
        }

        let finalize_params = [("command", "FINALIZE"), ("media_id", media_id.as_str())];
        let auth = self
            .signer
            .sign("POST", &url, &finalize_params, Some(credentials))?;
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, auth)
            .form(&finalize_params)
            .send()
            .await?;
        let finalized: MediaUploadResponse = Self::json(response).await?;

        self.await_processing(credentials, &media_id, finalized.processing_info)
            .await?;

        info!(%media_id, mime_type, "media upload finished");
        Ok(media_id)
    }

    async fn await_processing(
        &self,
        credentials: &Credentials,
        media_id: &str,
        mut processing: Option<ProcessingInfo>,
    ) -> TwitterResult<()> {
        let mut polls = 0;

        while let Some(info) = processing {
            match info.state {
                ProcessingState::Succeeded => return Ok(()),
                ProcessingState::Failed => {
                    let message = info
                        .error
                        .and_then(|e| e.message)
                        .unwrap_or_else(|| "provider reported failure".to_string());
                    return Err(TwitterError::MediaProcessing(message));
                }
                ProcessingState::Pending | ProcessingState::InProgress => {
                    if polls >= self.config.media_poll_limit {
                        return Err(TwitterError::MediaProcessing(format!(
                            "media {media_id} still processing after {polls} status checks"
                        )));
                    }
                    polls += 1;

                    let wait = info.check_after_secs.unwrap_or(DEFAULT_CHECK_AFTER_SECS);
                    tokio::time::sleep(Duration::from_secs(wait)).await;

                    let url = format!(
                        "{}?command=STATUS&media_id={}",
                        self.upload_endpoint(),
                        media_id
                    );
                    let auth = self.signer.sign("GET", &url, &[], Some(credentials))?;
                    let response = self
                        .http
                        .get(&url)
                        .header(reqwest::header::AUTHORIZATION, auth)
                        .send()
                        .await?;
                    let status: MediaUploadResponse = Self::json(response).await?;
                    processing = status.processing_info;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_category() {
        assert_eq!(media_category("image/png"), "tweet_image");
        assert_eq!(media_category("image/jpeg"), "tweet_image");
        assert_eq!(media_category("IMAGE/GIF"), "tweet_gif");
        assert_eq!(media_category("video/mp4"), "tweet_video");
        assert_eq!(media_category("application/octet-stream"), "tweet_image");
    }

    #[test]
    fn test_finalize_without_processing_info() {
        let body = r#"{"media_id":710511363345354753,"media_id_string":"710511363345354753","size":11065,"expires_after_secs":86400}"#;
        let parsed: MediaUploadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.media_id_string, "710511363345354753");
        assert!(parsed.processing_info.is_none());
    }

    #[test]
    fn test_finalize_with_pending_processing() {
        let body = r#"{"media_id_string":"710511363345354753","processing_info":{"state":"pending","check_after_secs":5}}"#;
        let parsed: MediaUploadResponse = serde_json::from_str(body).unwrap();
        let info = parsed.processing_info.unwrap();
        assert_eq!(info.state, ProcessingState::Pending);
        assert_eq!(info.check_after_secs, Some(5));
    }

    #[test]
    fn test_failed_processing_carries_message() {
        let body = r#"{"media_id_string":"1","processing_info":{"state":"failed","error":{"code":1,"name":"InvalidMedia","message":"Unsupported video format"}}}"#;
        let parsed: MediaUploadResponse = serde_json::from_str(body).unwrap();
        let info = parsed.processing_info.unwrap();
        assert_eq!(info.state, ProcessingState::Failed);
        assert_eq!(
            info.error.and_then(|e| e.message).as_deref(),
            Some("Unsupported video format")
        );
    }

    #[tokio::test]
    async fn test_succeeded_processing_needs_no_polling() {
        let client = TwitterClient::new(crate::TwitterConfig::new("k", "s")).unwrap();
        let creds = Credentials::new("t", "s");
        let info = ProcessingInfo {
            state: ProcessingState::Succeeded,
            check_after_secs: None,
            error: None,
        };
        client
            .await_processing(&creds, "1", Some(info))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_media_file_is_io_error() {
        let client = TwitterClient::new(crate::TwitterConfig::new("k", "s")).unwrap();
        let creds = Credentials::new("t", "s");
        let err = client
            .chunked_upload(&creds, Path::new("/nonexistent/upload.png"), "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, TwitterError::Io(_)));
    }
}
