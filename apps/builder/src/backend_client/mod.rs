/// Backend client: the only place that talks to the resume backend.
///
/// The session depends on the `ResumeBackend` trait; `HttpBackend` is the
/// reqwest implementation used by the binary and the integration tests.
use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::errors::BackendError;
use crate::models::options::ResumeOptions;
use crate::models::profile::BasicProfile;
use crate::models::resume::{AtsScore, ResumeResult};

pub mod wire;

use wire::{
    GenerateRequest, OptimizeRequest, ParseUploadResponse, ScoredResumeResponse,
    GENERATE_FROM_BASIC_PATH, OPTIMIZE_PATH, PARSE_UPLOAD_PATH, UPLOAD_FIELD,
};

/// A document picked for upload, already read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadDocument {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadDocument {
    /// Reads `path` from disk. The MIME type follows the extension; content
    /// is never inspected here.
    pub async fn read(path: &Path) -> Result<Self, BackendError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| BackendError::File {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self {
            mime_type: mime_for(path),
            file_name,
            bytes,
        })
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// A resume together with the score the backend computed for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredResume {
    pub resume: ResumeResult,
    pub ats_score: AtsScore,
}

impl TryFrom<ScoredResumeResponse> for ScoredResume {
    type Error = BackendError;

    fn try_from(response: ScoredResumeResponse) -> Result<Self, Self::Error> {
        let ats_score = AtsScore::from_server(response.ats_score)
            .ok_or(BackendError::InvalidScore(response.ats_score))?;
        Ok(Self {
            resume: response.resume,
            ats_score,
        })
    }
}

#[async_trait]
pub trait ResumeBackend: Send + Sync {
    /// POST /api/parse-upload
    async fn parse_upload(&self, document: UploadDocument) -> Result<ResumeResult, BackendError>;

    /// POST /api/generate-from-basic
    async fn generate_from_basic(
        &self,
        basic: &BasicProfile,
        options: &ResumeOptions,
    ) -> Result<ScoredResume, BackendError>;

    /// POST /api/optimize
    async fn optimize(
        &self,
        resume: &ResumeResult,
        options: &ResumeOptions,
    ) -> Result<ScoredResume, BackendError>;
}

/// reqwest-backed client. One request per call: no retries, no timeout
/// override, no auth headers.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a prepared request and decodes the JSON body. Non-2xx responses
    /// and bodies that do not match `T` are both failures.
    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BackendError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, endpoint = path, "Sending backend request");

        let response = request.send().await.map_err(|e| {
            error!(%request_id, endpoint = path, "Backend request failed: {e}");
            BackendError::Http(e)
        })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(%request_id, endpoint = path, %status, "Backend returned an error status");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%request_id, bytes = body.len(), "Backend response received");
        serde_json::from_str(&body).map_err(|e| {
            error!(%request_id, endpoint = path, "Backend response did not decode: {e}");
            BackendError::Decode(e)
        })
    }
}

#[async_trait]
impl ResumeBackend for HttpBackend {
    async fn parse_upload(&self, document: UploadDocument) -> Result<ResumeResult, BackendError> {
        let part = Part::bytes(document.bytes)
            .file_name(document.file_name)
            .mime_str(document.mime_type)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let request = self.client.post(self.endpoint(PARSE_UPLOAD_PATH)).multipart(form);
        let response: ParseUploadResponse = self.send(PARSE_UPLOAD_PATH, request).await?;
        Ok(response.extracted)
    }

    async fn generate_from_basic(
        &self,
        basic: &BasicProfile,
        options: &ResumeOptions,
    ) -> Result<ScoredResume, BackendError> {
        let request = self
            .client
            .post(self.endpoint(GENERATE_FROM_BASIC_PATH))
            .json(&GenerateRequest { basic, options });
        let response: ScoredResumeResponse = self.send(GENERATE_FROM_BASIC_PATH, request).await?;
        response.try_into()
    }

    async fn optimize(
        &self,
        resume: &ResumeResult,
        options: &ResumeOptions,
    ) -> Result<ScoredResume, BackendError> {
        let request = self
            .client
            .post(self.endpoint(OPTIMIZE_PATH))
            .json(&OptimizeRequest { resume, options });
        let response: ScoredResumeResponse = self.send(OPTIMIZE_PATH, request).await?;
        response.try_into()
    }
}
