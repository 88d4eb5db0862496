use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// A single role. Shared by the manually entered profile and the structured
/// resume returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    /// `None` means the role is ongoing.
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
    /// Keys this client does not model, echoed back unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The manually entered profile used by the generate-from-basics path.
///
/// `education` and `experience` are part of the wire shape but nothing in the
/// builder collects them yet, so they are always sent empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasicProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub target_role: String,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
    pub skills: Vec<String>,
    pub certifications: Vec<String>,
    pub achievements: Vec<String>,
}

impl BasicProfile {
    /// Name and email are the only fields a generation request requires.
    pub fn has_identity(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}
