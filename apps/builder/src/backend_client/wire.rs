//! Request and response bodies for the three backend endpoints.

use serde::{Deserialize, Serialize};

use crate::models::options::ResumeOptions;
use crate::models::profile::BasicProfile;
use crate::models::resume::ResumeResult;

pub const PARSE_UPLOAD_PATH: &str = "/api/parse-upload";
pub const GENERATE_FROM_BASIC_PATH: &str = "/api/generate-from-basic";
pub const OPTIMIZE_PATH: &str = "/api/optimize";

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub basic: &'a BasicProfile,
    pub options: &'a ResumeOptions,
}

#[derive(Debug, Serialize)]
pub struct OptimizeRequest<'a> {
    pub resume: &'a ResumeResult,
    pub options: &'a ResumeOptions,
}

#[derive(Debug, Deserialize)]
pub struct ParseUploadResponse {
    pub extracted: ResumeResult,
}

/// Shared by generate-from-basic and optimize.
#[derive(Debug, Deserialize)]
pub struct ScoredResumeResponse {
    pub resume: ResumeResult,
    pub ats_score: f64,
}
