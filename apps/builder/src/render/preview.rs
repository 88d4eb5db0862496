//! Live preview: a read-only projection of the current resume.
//!
//! The projection only drops empty values and composes display lines; it
//! never sorts or merges entries.

use std::fmt;

use crate::models::profile::{EducationEntry, ExperienceEntry};
use crate::models::resume::ResumeResult;

pub const SEPARATOR: &str = " • ";
pub const PLACEHOLDER: &str = "Upload a resume or generate from basics to preview.";
pub const ONGOING: &str = "Present";

#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    Placeholder,
    Resume(ResumeView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResumeView {
    pub name: String,
    pub contact_line: Option<String>,
    pub summary: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceView>,
    pub education: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExperienceView {
    pub headline: String,
    pub subtitle: Option<String>,
    pub bullets: Vec<String>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Joins the non-empty parts with `separator`; `None` if nothing is left.
fn join_present<'a>(parts: impl IntoIterator<Item = Option<&'a str>>, separator: &str) -> Option<String> {
    let parts: Vec<&str> = parts.into_iter().flatten().filter(|p| !p.is_empty()).collect();
    (!parts.is_empty()).then(|| parts.join(separator))
}

pub fn project(result: Option<&ResumeResult>) -> Preview {
    let Some(resume) = result else {
        return Preview::Placeholder;
    };

    Preview::Resume(ResumeView {
        name: resume.name.clone(),
        contact_line: contact_line(resume),
        summary: non_empty(resume.summary.as_deref()).map(str::to_string),
        skills: resume.skills.clone().unwrap_or_default(),
        experience: resume
            .experience
            .iter()
            .flatten()
            .map(|e| ExperienceView {
                headline: join_present([Some(e.title.as_str()), Some(e.company.as_str())], SEPARATOR)
                    .unwrap_or_default(),
                subtitle: experience_subtitle(e),
                bullets: e.bullets.clone(),
            })
            .collect(),
        education: resume.education.iter().flatten().map(education_headline).collect(),
    })
}

/// Email, phone and location, skipping blanks.
pub fn contact_line(resume: &ResumeResult) -> Option<String> {
    join_present(
        [
            Some(resume.email.as_str()),
            Some(resume.phone.as_str()),
            Some(resume.location.as_str()),
        ],
        SEPARATOR,
    )
}

/// `start - end`, with a missing end shown as ongoing. No start, no range.
pub fn date_range(start: &str, end: Option<&str>) -> Option<String> {
    if start.is_empty() {
        return None;
    }
    Some(format!("{start} - {}", non_empty(end).unwrap_or(ONGOING)))
}

pub fn experience_subtitle(entry: &ExperienceEntry) -> Option<String> {
    let range = date_range(&entry.start_date, entry.end_date.as_deref());
    join_present([Some(entry.location.as_str()), range.as_deref()], SEPARATOR)
}

/// "{degree} in {field} — {school} ({end})", dropping whatever is missing.
pub fn education_headline(entry: &EducationEntry) -> String {
    let field = non_empty(entry.field.as_deref()).map(|f| format!("in {f}"));
    let credential = join_present([entry.degree.as_deref(), field.as_deref()], " ");
    let mut headline =
        join_present([credential.as_deref(), Some(entry.school.as_str())], " — ").unwrap_or_default();
    if let Some(end) = non_empty(entry.end_date.as_deref()) {
        if !headline.is_empty() {
            headline.push(' ');
        }
        headline.push_str(&format!("({end})"));
    }
    headline
}

impl fmt::Display for Preview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preview::Placeholder => writeln!(f, "{PLACEHOLDER}"),
            Preview::Resume(view) => fmt::Display::fmt(view, f),
        }
    }
}

impl fmt::Display for ResumeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        if let Some(contact) = &self.contact_line {
            writeln!(f, "{contact}")?;
        }
        if let Some(summary) = &self.summary {
            writeln!(f)?;
            writeln!(f, "{summary}")?;
        }
        if !self.skills.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skills")?;
            for skill in &self.skills {
                writeln!(f, "  • {skill}")?;
            }
        }
        if !self.experience.is_empty() {
            writeln!(f)?;
            writeln!(f, "Experience")?;
            for entry in &self.experience {
                writeln!(f, "  {}", entry.headline)?;
                if let Some(subtitle) = &entry.subtitle {
                    writeln!(f, "    {subtitle}")?;
                }
                for bullet in &entry.bullets {
                    writeln!(f, "    - {bullet}")?;
                }
            }
        }
        if !self.education.is_empty() {
            writeln!(f)?;
            writeln!(f, "Education")?;
            for line in &self.education {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
