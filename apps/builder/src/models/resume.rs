use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;
use super::profile::{EducationEntry, ExperienceEntry};

/// Score shown after an upload. The parse endpoint does not return one.
pub const UPLOAD_PLACEHOLDER_SCORE: f64 = 72.0;

/// The structured resume returned by the backend. It is also the artifact
/// sent back for optimization, so fields this client does not model are kept
/// in `extra` and echoed unchanged.
///
/// Sections may be absent or empty; both mean "nothing to show".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub experience: Option<Vec<ExperienceEntry>>,
    #[serde(default)]
    pub education: Option<Vec<EducationEntry>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    /// Computed by the backend for this resume.
    Server,
    /// Fixed stand-in set after an upload; not a computed score.
    UploadPlaceholder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtsScore {
    value: f64,
    source: ScoreSource,
}

impl AtsScore {
    /// Accepts a backend score. Anything outside 0..=100 (or NaN) is rejected.
    pub fn from_server(value: f64) -> Option<Self> {
        (value.is_finite() && (0.0..=100.0).contains(&value)).then_some(Self {
            value,
            source: ScoreSource::Server,
        })
    }

    pub fn upload_placeholder() -> Self {
        Self {
            value: UPLOAD_PLACEHOLDER_SCORE,
            source: ScoreSource::UploadPlaceholder,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> ScoreSource {
        self.source
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == ScoreSource::UploadPlaceholder
    }
}

impl fmt::Display for AtsScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.fract() == 0.0 {
            write!(f, "{}", self.value as u32)?;
        } else {
            write!(f, "{:.1}", self.value)?;
        }
        if self.is_placeholder() {
            f.write_str(" (unscored)")?;
        }
        Ok(())
    }
}
