//! Parses one line of input into a builder command.

use std::str::FromStr;

use thiserror::Error;

use crate::models::options::{Region, ResumeType, Tone, UnknownOption};
use crate::session::form::{ProfileField, UnknownField};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    /// "Upload Resume": the landing call to action, or the builder tab.
    UploadTab,
    /// "Start from Scratch": the landing call to action, or the builder tab.
    BasicTab,
    SelectFile(String),
    Extract,
    Set(ProfileField, String),
    AddSkill(String),
    Region(Region),
    ResumeType(ResumeType),
    Tone(Tone),
    ListOptions,
    Generate,
    Optimize,
    Show,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error(transparent)]
    Field(#[from] UnknownField),

    #[error(transparent)]
    Option(#[from] UnknownOption),

    #[error("{kind} index must be between 1 and {max}")]
    OutOfRange { kind: &'static str, max: usize },
}

pub const HELP: &str = "\
Commands:
  upload | scratch            open the builder on Upload Resume / Start from Scratch
  file <path>                 pick a PDF, DOCX or TXT document
  extract                     send the picked document for extraction
  set <field> <value>         name, email, phone, location, summary, target_role
  skill <text>                add a skill
  region|type|tone <value>    choose by name or by number from 'options'
  options                     list every region, type and tone
  generate                    build a resume from the basic details
  optimize                    improve the current resume
  show                        redraw the screen
  quit                        leave";

/// Picks an option by its 1-based position or by its label.
fn pick<T: Copy + FromStr<Err = UnknownOption>>(
    all: &[T],
    kind: &'static str,
    raw: &str,
) -> Result<T, CommandError> {
    if let Ok(index) = raw.trim().parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|i| all.get(i).copied())
            .ok_or(CommandError::OutOfRange {
                kind,
                max: all.len(),
            });
    }
    Ok(raw.parse::<T>()?)
}

pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(v, r)| (v, r.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "upload" => Command::UploadTab,
        "scratch" | "basic" => Command::BasicTab,
        "file" if rest.is_empty() => return Err(CommandError::Usage("file <path>")),
        "file" => Command::SelectFile(rest.to_string()),
        "extract" => Command::Extract,
        "set" => {
            let (field, value) = rest
                .split_once(char::is_whitespace)
                .map(|(f, v)| (f, v.trim()))
                .unwrap_or((rest, ""));
            if field.is_empty() {
                return Err(CommandError::Usage("set <field> <value>"));
            }
            Command::Set(field.parse()?, value.to_string())
        }
        "skill" => Command::AddSkill(rest.to_string()),
        "region" if rest.is_empty() => return Err(CommandError::Usage("region <name|number>")),
        "region" => Command::Region(pick(Region::ALL, "region", rest)?),
        "type" if rest.is_empty() => return Err(CommandError::Usage("type <name|number>")),
        "type" => Command::ResumeType(pick(ResumeType::ALL, "resume type", rest)?),
        "tone" if rest.is_empty() => return Err(CommandError::Usage("tone <name|number>")),
        "tone" => Command::Tone(pick(Tone::ALL, "tone", rest)?),
        "options" => Command::ListOptions,
        "generate" => Command::Generate,
        "optimize" => Command::Optimize,
        "show" | "preview" => Command::Show,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// Numbered listing of every option value.
pub fn option_listing() -> String {
    fn section<T: std::fmt::Display>(out: &mut String, title: &str, all: &[T]) {
        out.push_str(title);
        out.push('\n');
        for (i, value) in all.iter().enumerate() {
            out.push_str(&format!("  {:>2}. {value}\n", i + 1));
        }
    }

    let mut out = String::new();
    section(&mut out, "Region", Region::ALL);
    section(&mut out, "Type", ResumeType::ALL);
    section(&mut out, "Tone", Tone::ALL);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_is_nothing() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_set_keeps_spaces_in_value() {
        assert_eq!(
            parse("set summary  Ships  reliable systems "),
            Ok(Some(Command::Set(
                ProfileField::Summary,
                "Ships  reliable systems".to_string()
            )))
        );
    }

    #[test]
    fn test_set_without_value_clears_field() {
        assert_eq!(
            parse("set phone"),
            Ok(Some(Command::Set(ProfileField::Phone, String::new())))
        );
    }

    #[test]
    fn test_options_by_index_and_name() {
        assert_eq!(parse("region 5"), Ok(Some(Command::Region(Region::Dubai))));
        assert_eq!(
            parse("type mini-resume"),
            Ok(Some(Command::ResumeType(ResumeType::MiniResume)))
        );
        assert_eq!(parse("TONE executive"), Ok(Some(Command::Tone(Tone::Executive))));
    }

    #[test]
    fn test_option_index_bounds() {
        assert_eq!(
            parse("tone 0"),
            Err(CommandError::OutOfRange { kind: "tone", max: 4 })
        );
        assert_eq!(
            parse("region 10"),
            Err(CommandError::OutOfRange {
                kind: "region",
                max: 9
            })
        );
    }

    #[test]
    fn test_unknown_inputs() {
        assert_eq!(
            parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
        assert!(matches!(parse("set hobby chess"), Err(CommandError::Field(_))));
        assert!(matches!(parse("tone Casual"), Err(CommandError::Option(_))));
        assert_eq!(parse("file"), Err(CommandError::Usage("file <path>")));
    }

    #[test]
    fn test_skill_argument_is_trimmed() {
        assert_eq!(parse("skill"), Ok(Some(Command::AddSkill(String::new()))));
        assert_eq!(
            parse("skill  Go "),
            Ok(Some(Command::AddSkill("Go".to_string())))
        );
    }

    #[test]
    fn test_option_listing_numbers_from_one() {
        let listing = option_listing();
        assert!(listing.contains("   1. United States\n"));
        assert!(listing.contains("   9. Europe (EU Standard CV)\n"));
        assert!(listing.contains("   8. Mini-Resume\n"));
    }
}
