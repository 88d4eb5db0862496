//! Terminal layout for the landing and builder screens.

use std::fmt::Write;

use crate::models::options::ResumeOptions;
use crate::session::form::FormStore;
use crate::session::view::{Screen, SubMode};
use crate::session::{Flow, SessionState};

use super::preview::{project, SEPARATOR};

pub const TITLE: &str = "AI Resume Builder";
pub const HEADLINE: &str = "Build or Transform Your Resume with AI";
pub const TAGLINE: &str = "Upload an existing resume or start with basic details. Get ATS-friendly, region-specific, beautifully formatted results in minutes.";
pub const FOOTER: &str = "ATS-friendly • Region-aware • LLM-ready";

/// Label for a trigger button: its busy text while its own request is out,
/// and a disabled marker while any request is out.
fn button(label: &str, busy_label: &str, flow: Flow, pending: Option<Flow>) -> String {
    match pending {
        Some(p) if p == flow => format!("[{busy_label}]"),
        Some(_) => format!("[{label}] (disabled)"),
        None => format!("[{label}]"),
    }
}

fn header(out: &mut String, options: &ResumeOptions) {
    let _ = writeln!(
        out,
        "{TITLE}  |  Region: {}  |  Type: {}  |  Tone: {}",
        options.region, options.resume_type, options.tone
    );
    let _ = writeln!(out, "{}", "─".repeat(72));
}

fn landing(out: &mut String) {
    let _ = writeln!(out, "{HEADLINE}");
    let _ = writeln!(out, "{TAGLINE}");
    let _ = writeln!(out);
    let _ = writeln!(out, "  upload   → Upload Resume");
    let _ = writeln!(out, "  scratch  → Start from Scratch");
}

fn tabs(out: &mut String, sub_mode: SubMode) {
    let mark = |m: SubMode| if m == sub_mode { "(*)" } else { "( )" };
    let _ = writeln!(
        out,
        "{} Upload Resume   {} Start from Scratch",
        mark(SubMode::Upload),
        mark(SubMode::Basic)
    );
    let _ = writeln!(out);
}

fn upload_panel(out: &mut String, state: &SessionState, pending: Option<Flow>) {
    let file = state
        .selected_file()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(none selected)".to_string());
    let _ = writeln!(out, "File: {file}");
    let _ = writeln!(
        out,
        "{}",
        button("Extract & Rebuild", "Processing…", Flow::Upload, pending)
    );
    let _ = writeln!(out, "Supported: PDF, DOCX, TXT");
}

fn basic_panel(out: &mut String, form: &FormStore, pending: Option<Flow>) {
    let profile = form.profile();
    let shown = |v: &str| if v.is_empty() { "-".to_string() } else { v.to_string() };
    let _ = writeln!(out, "Name:        {}", shown(&profile.name));
    let _ = writeln!(out, "Email:       {}", shown(&profile.email));
    let _ = writeln!(out, "Phone:       {}", shown(&profile.phone));
    let _ = writeln!(out, "Location:    {}", shown(&profile.location));
    let _ = writeln!(out, "Target role: {}", shown(&profile.target_role));
    let _ = writeln!(out, "Summary:     {}", shown(&profile.summary));
    let _ = writeln!(out, "Skill input: {}", shown(form.skill_input()));
    if !profile.skills.is_empty() {
        let chips: Vec<String> = profile.skills.iter().map(|s| format!("[{s}]")).collect();
        let _ = writeln!(out, "Skills:      {}", chips.join(" "));
    }
    let _ = writeln!(
        out,
        "{}",
        button("Generate Resume", "Generating…", Flow::Generate, pending)
    );
}

fn score_line(out: &mut String, state: &SessionState, pending: Option<Flow>) {
    if state.result().is_none() {
        return;
    }
    let score = state
        .ats_score()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "—".to_string());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "ATS Score: {score}{SEPARATOR}{}",
        button("Optimize", "Optimizing…", Flow::Optimize, pending)
    );
}

/// Renders the whole screen for the given state.
pub fn render(state: &SessionState) -> String {
    let mut out = String::new();
    let form = state.form();
    header(&mut out, form.options());

    match state.view().screen() {
        Screen::Landing => landing(&mut out),
        Screen::Builder => {
            let pending = state.loading().pending();
            let sub_mode = state.view().sub_mode();
            tabs(&mut out, sub_mode);
            match sub_mode {
                SubMode::Upload => upload_panel(&mut out, state, pending),
                SubMode::Basic => basic_panel(&mut out, form, pending),
            }
            score_line(&mut out, state, pending);

            let _ = writeln!(out);
            let _ = writeln!(out, "Live Preview");
            let _ = writeln!(out, "{}", "─".repeat(12));
            let _ = write!(out, "{}", project(state.result()));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{FOOTER}");
    out
}
