//! The in-progress profile and the generation options. Every input on the
//! builder screen writes through one of these setters.

use std::str::FromStr;

use thiserror::Error;

use crate::models::options::{Region, ResumeOptions, ResumeType, Tone};
use crate::models::profile::BasicProfile;

/// Scalar profile fields that can be typed in directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Phone,
    Location,
    Summary,
    TargetRole,
}

impl ProfileField {
    pub const ALL: &'static [ProfileField] = &[
        ProfileField::Name,
        ProfileField::Email,
        ProfileField::Phone,
        ProfileField::Location,
        ProfileField::Summary,
        ProfileField::TargetRole,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ProfileField::Name => "name",
            ProfileField::Email => "email",
            ProfileField::Phone => "phone",
            ProfileField::Location => "location",
            ProfileField::Summary => "summary",
            ProfileField::TargetRole => "target_role",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown profile field: '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for ProfileField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        ProfileField::ALL
            .iter()
            .copied()
            .find(|f| f.key() == key || (key == "role" && *f == ProfileField::TargetRole))
            .ok_or_else(|| UnknownField(s.trim().to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormStore {
    profile: BasicProfile,
    skill_input: String,
    options: ResumeOptions,
}

impl FormStore {
    pub fn profile(&self) -> &BasicProfile {
        &self.profile
    }

    pub fn options(&self) -> &ResumeOptions {
        &self.options
    }

    pub fn skill_input(&self) -> &str {
        &self.skill_input
    }

    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            ProfileField::Name => &mut self.profile.name,
            ProfileField::Email => &mut self.profile.email,
            ProfileField::Phone => &mut self.profile.phone,
            ProfileField::Location => &mut self.profile.location,
            ProfileField::Summary => &mut self.profile.summary,
            ProfileField::TargetRole => &mut self.profile.target_role,
        };
        *slot = value;
    }

    /// Replaces the pending skill text without committing it.
    pub fn set_skill_input(&mut self, value: impl Into<String>) {
        self.skill_input = value.into();
    }

    /// Commits the pending skill text. Blank input is ignored and left in
    /// place; otherwise the trimmed value is appended and the input cleared.
    /// Returns whether a skill was added.
    pub fn add_skill(&mut self) -> bool {
        let skill = self.skill_input.trim();
        if skill.is_empty() {
            return false;
        }
        self.profile.skills.push(skill.to_string());
        self.skill_input.clear();
        true
    }

    pub fn set_region(&mut self, region: Region) {
        self.options.region = region;
    }

    pub fn set_resume_type(&mut self, resume_type: ResumeType) {
        self.options.resume_type = resume_type;
    }

    pub fn set_tone(&mut self, tone: Tone) {
        self.options.tone = tone;
    }
}
