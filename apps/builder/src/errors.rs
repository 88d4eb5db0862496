use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::session::Flow;

/// Messages shown to the person at the keyboard. Diagnostics go to the log;
/// these stay short and generic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    FileRequired,
    UnsupportedFile,
    IdentityRequired,
    UploadFailed,
    GenerationFailed,
    OptimizationFailed,
}

impl Notice {
    pub fn for_failed(flow: Flow) -> Self {
        match flow {
            Flow::Upload => Notice::UploadFailed,
            Flow::Generate => Notice::GenerationFailed,
            Flow::Optimize => Notice::OptimizationFailed,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Notice::FileRequired => "Please select a file (PDF/DOCX/TXT)",
            Notice::UnsupportedFile => "Supported: PDF, DOCX, TXT",
            Notice::IdentityRequired => "Please enter at least name and email",
            Notice::UploadFailed => "Upload failed",
            Notice::GenerationFailed => "Generation failed",
            Notice::OptimizationFailed => "Optimization failed",
        })
    }
}

/// Anything that can go wrong between sending a request and holding a
/// decoded response. Every variant is treated the same by the session: the
/// flow failed and prior state stays as it was.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("ATS score out of range: {0}")]
    InvalidScore(f64),

    #[error("could not read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a session operation that did not go through.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A client-side check failed before any I/O.
    #[error("{0}")]
    Precondition(Notice),

    /// The request was sent and failed in transport or decoding.
    #[error("{flow} failed: {source}")]
    Flow {
        flow: Flow,
        #[source]
        source: BackendError,
    },

    /// Another request is still outstanding.
    #[error("{pending} request already in progress")]
    Busy { pending: Flow },
}

impl SessionError {
    /// The notice to put on screen, if this error has one.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            SessionError::Precondition(notice) => Some(*notice),
            SessionError::Flow { flow, .. } => Some(Notice::for_failed(*flow)),
            SessionError::Busy { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_failures_map_to_flow_notices() {
        let err = SessionError::Flow {
            flow: Flow::Generate,
            source: BackendError::InvalidScore(140.0),
        };
        assert_eq!(err.notice(), Some(Notice::GenerationFailed));
        assert_eq!(err.notice().unwrap().to_string(), "Generation failed");
    }

    #[test]
    fn test_precondition_carries_its_notice() {
        let err = SessionError::Precondition(Notice::IdentityRequired);
        assert_eq!(err.to_string(), "Please enter at least name and email");
    }

    #[test]
    fn test_busy_has_no_notice() {
        let err = SessionError::Busy {
            pending: Flow::Upload,
        };
        assert_eq!(err.notice(), None);
        assert_eq!(err.to_string(), "upload request already in progress");
    }
}
