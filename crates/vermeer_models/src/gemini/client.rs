//! REST client for generation and the Files API.

use super::dto::{
    ApiErrorBody, GenerateContentResponse, UploadFileMetadata, UploadResponse,
    UploadStartRequest,
};
use super::{GeminiConfig, from_generate_response, to_generate_request};
use crate::retry_with_backoff;
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use vermeer_core::{
    GenerateOptions, GenerationResponse, Part, RemoteAssetStore, RemoteGenerator, UploadedFile,
};
use vermeer_error::{RemoteError, RemoteErrorKind};

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Client for the Gemini Generative Language API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    max_retries: usize,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Create a client with an explicit API key.
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, config: &GeminiConfig) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*config.timeout_secs()))
            .build()
            .map_err(|e| RemoteError::new(RemoteErrorKind::ClientCreation(e.to_string())))?;

        debug!(base_url = %config.base_url(), "Created Gemini client");

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url().trim_end_matches('/').to_string(),
            max_retries: *config.max_retries(),
        })
    }

    /// Create a client reading the API key from `config.api_key_env()`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when the variable is unset or empty.
    pub fn from_env(config: &GeminiConfig) -> Result<Self, RemoteError> {
        let var = config.api_key_env();
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| RemoteError::new(RemoteErrorKind::MissingApiKey(var.clone())))?;
        Self::new(api_key, config)
    }

    fn generate_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/{}/models/{}:generateContent",
            self.base_url, API_VERSION, model
        )
    }

    fn upload_url(&self) -> String {
        format!("{}/upload/{}/files", self.base_url, API_VERSION)
    }

    fn file_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_VERSION, name)
    }

    async fn start_upload(
        &self,
        size: usize,
        mime_type: &str,
        display_name: &str,
    ) -> Result<String, RemoteError> {
        let response = self
            .client
            .post(self.upload_url())
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", size.to_string())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&UploadStartRequest {
                file: UploadFileMetadata { display_name },
            })
            .send()
            .await
            .map_err(request_failed)?;
        let response = check_status(response).await?;

        response
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                RemoteError::new(RemoteErrorKind::InvalidResponse(
                    "upload session URL missing".to_string(),
                ))
            })
    }

    async fn finish_upload(&self, session_url: &str, data: &[u8]) -> Result<UploadedFile, RemoteError> {
        let response = self
            .client
            .post(session_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(data.to_vec())
            .send()
            .await
            .map_err(request_failed)?;
        let response = check_status(response).await?;

        let body: UploadResponse = response.json().await.map_err(|e| {
            RemoteError::new(RemoteErrorKind::InvalidResponse(format!(
                "Failed to parse upload response: {}",
                e
            )))
        })?;
        Ok(UploadedFile {
            uri: body.file.uri,
            name: body.file.name,
        })
    }
}

#[async_trait]
impl RemoteGenerator for GeminiClient {
    #[instrument(skip(self, parts, options), fields(part_count = parts.len()))]
    async fn generate(
        &self,
        model: &str,
        parts: &[Part],
        options: &GenerateOptions,
    ) -> Result<GenerationResponse, RemoteError> {
        let url = self.generate_url(model);
        let body = to_generate_request(parts, options);

        let wire: GenerateContentResponse = retry_with_backoff(self.max_retries, || async {
            let response = self
                .client
                .post(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(request_failed)?;
            let response = check_status(response).await?;
            response.json::<GenerateContentResponse>().await.map_err(|e| {
                error!(error = %e, "Failed to parse generation response");
                RemoteError::new(RemoteErrorKind::InvalidResponse(format!(
                    "Failed to parse JSON: {}",
                    e
                )))
            })
        })
        .await?;

        debug!(candidates = wire.candidates.len(), "Received generation response");
        from_generate_response(wire)
    }
}

#[async_trait]
impl RemoteAssetStore for GeminiClient {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn upload(
        &self,
        data: &[u8],
        mime_type: &str,
        display_name: &str,
    ) -> Result<UploadedFile, RemoteError> {
        let session_url = retry_with_backoff(self.max_retries, || {
            self.start_upload(data.len(), mime_type, display_name)
        })
        .await?;
        // Finalize commits the file, so it runs once.
        let file = self.finish_upload(&session_url, data).await?;

        info!(name = %file.name, uri = %file.uri, "Uploaded file");
        Ok(file)
    }

    #[instrument(skip(self))]
    async fn delete(&self, name: &str) -> Result<(), RemoteError> {
        let url = self.file_url(name);
        retry_with_backoff(self.max_retries, || async {
            let response = self
                .client
                .delete(&url)
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(request_failed)?;
            check_status(response).await.map(|_| ())
        })
        .await?;

        info!(name, "Deleted file");
        Ok(())
    }
}

#[track_caller]
fn request_failed(e: reqwest::Error) -> RemoteError {
    error!(error = %e, "HTTP request failed");
    RemoteError::new(RemoteErrorKind::ApiRequest(e.to_string()))
}

/// Pass successful responses through; turn anything else into `HttpError`.
async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|parsed| match parsed.error.status {
            Some(code) => format!("{} ({})", parsed.error.message, code),
            None => parsed.error.message,
        })
        .unwrap_or(body);

    error!(status = status.as_u16(), error = %message, "API error");
    Err(RemoteError::new(RemoteErrorKind::HttpError {
        status_code: status.as_u16(),
        message,
    }))
}
