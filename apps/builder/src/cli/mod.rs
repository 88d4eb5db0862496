//! Interactive terminal loop. Reads commands from stdin, runs requests on
//! spawned tasks, and redraws the screen when they complete.

pub mod commands;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::errors::SessionError;
use crate::render::screen;
use crate::session::view::{Entry, Screen, SubMode};
use crate::session::{Flow, FlowOutcome, Session};

use commands::{option_listing, parse, Command, HELP};

/// What the loop should do after a command has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Redraw,
    Quiet,
    Message(String),
    Start(Flow),
    Quit,
}

/// The result of a request, sent back from its task.
#[derive(Debug)]
pub struct FlowReport {
    pub flow: Flow,
    pub result: Result<FlowOutcome, SessionError>,
}

/// Applies a command to the session. Requests are not run here; they come
/// back as `Reply::Start` for the loop to spawn.
pub fn apply(session: &Session, command: Command) -> Reply {
    match command {
        Command::Help => Reply::Message(HELP.to_string()),
        Command::UploadTab => {
            open(session, Entry::UploadResume, SubMode::Upload);
            Reply::Redraw
        }
        Command::BasicTab => {
            open(session, Entry::StartFromScratch, SubMode::Basic);
            Reply::Redraw
        }
        Command::SelectFile(path) => match session.select_file(path) {
            Ok(()) => Reply::Redraw,
            Err(e) => Reply::Message(e.to_string()),
        },
        Command::Extract => Reply::Start(Flow::Upload),
        Command::Set(field, value) => {
            session.set_field(field, value);
            Reply::Redraw
        }
        Command::AddSkill(text) => {
            session.set_skill_input(text);
            session.add_skill();
            Reply::Redraw
        }
        Command::Region(region) => {
            session.set_region(region);
            Reply::Redraw
        }
        Command::ResumeType(resume_type) => {
            session.set_resume_type(resume_type);
            Reply::Redraw
        }
        Command::Tone(tone) => {
            session.set_tone(tone);
            Reply::Redraw
        }
        Command::ListOptions => Reply::Message(option_listing()),
        Command::Generate => Reply::Start(Flow::Generate),
        Command::Optimize => Reply::Start(Flow::Optimize),
        Command::Show => Reply::Redraw,
        Command::Quit => Reply::Quit,
    }
}

/// On the landing screen the tab names double as the calls to action.
fn open(session: &Session, entry: Entry, sub_mode: SubMode) {
    match session.snapshot().view().screen() {
        Screen::Landing => session.start(entry),
        Screen::Builder => session.select_sub_mode(sub_mode),
    }
}

/// How a finished request is shown.
pub fn describe(report: &FlowReport) -> Reply {
    match &report.result {
        Ok(FlowOutcome::Applied) => Reply::Redraw,
        Ok(FlowOutcome::Skipped) | Ok(FlowOutcome::Discarded) => Reply::Quiet,
        Err(SessionError::Busy { pending }) => {
            Reply::Message(format!("Please wait: {pending} request still in progress"))
        }
        Err(e) => e
            .notice()
            .map(|n| Reply::Message(format!("! {n}")))
            .unwrap_or(Reply::Quiet),
    }
}

fn spawn_flow(session: &Session, flow: Flow, reports: mpsc::UnboundedSender<FlowReport>) {
    let handle = session.handle();
    tokio::spawn(async move {
        let result = match flow {
            Flow::Upload => handle.upload().await,
            Flow::Generate => handle.generate().await,
            Flow::Optimize => handle.optimize().await,
        };
        // The loop may already be gone; nothing left to tell.
        let _ = reports.send(FlowReport { flow, result });
    });
}

fn draw(session: &Session) {
    println!("\n{}", screen::render(&session.snapshot()));
}

pub async fn run(session: Session) -> Result<()> {
    let (reports_tx, mut reports_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    draw(&session);
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{e}");
                        continue;
                    }
                };
                match apply(&session, command) {
                    Reply::Redraw => draw(&session),
                    Reply::Quiet => {}
                    Reply::Message(text) => println!("{text}"),
                    Reply::Start(flow) => {
                        debug!(%flow, "Starting request");
                        spawn_flow(&session, flow, reports_tx.clone());
                    }
                    Reply::Quit => break,
                }
            }
            Some(report) = reports_rx.recv() => {
                debug!(flow = %report.flow, "Request finished");
                match describe(&report) {
                    Reply::Redraw => draw(&session),
                    Reply::Message(text) => println!("{text}"),
                    _ => {}
                }
            }
        }
    }

    session.close();
    Ok(())
}
