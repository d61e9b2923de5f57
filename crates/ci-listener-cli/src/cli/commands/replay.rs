use crate::cli::args::ReplayArgs;
use crate::exit_codes::{CONFIG_ERROR, EVENT_FAILED, SUCCESS};
use anyhow::{Context, Result};
use ci_listener::{
    CiListener, EventListener, IssueFilePattern, IssueRecorder, ListenerConfig, ListenerError,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use super::events::EventLine;

/// Where a replay stopped, if it did not run to the end.
#[derive(Debug)]
pub enum ReplayOutcome {
    Completed { events: usize },
    Failed { line: usize, error: ListenerError },
}

pub fn run(args: ReplayArgs) -> Result<i32> {
    let recorder = match build_recorder(&args) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Config error: {e:#}");
            return Ok(CONFIG_ERROR);
        }
    };

    let reader: Box<dyn BufRead> = match args.events.as_deref() {
        None => Box::new(BufReader::new(io::stdin())),
        Some(p) if p == Path::new("-") => Box::new(BufReader::new(io::stdin())),
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("failed to open event log: {}", p.display()))?;
            Box::new(BufReader::new(file))
        }
    };

    let listener = CiListener::stdout(recorder);
    let outcome = replay(reader, &listener);
    // terminate the marker line before any diagnostics
    println!();
    io::stdout().flush()?;

    match outcome? {
        ReplayOutcome::Completed { events } => {
            tracing::info!(events, "replay finished");
            Ok(SUCCESS)
        }
        ReplayOutcome::Failed { line, error } => {
            eprintln!("line {line}: {error}");
            Ok(EVENT_FAILED)
        }
    }
}

fn build_recorder(args: &ReplayArgs) -> Result<IssueRecorder> {
    let config = match &args.config {
        Some(path) => ListenerConfig::from_file(path)?,
        None => ListenerConfig::default(),
    };
    let mut recorder = IssueRecorder::from_config(&config)?;
    if let Some(raw) = &args.issue_file_pattern {
        recorder = recorder.with_pattern(IssueFilePattern::parse_optional(raw)?);
    }
    Ok(recorder)
}

/// Feed every event in `reader` to `listener`, stopping at the first handler error.
///
/// Blank lines and lines starting with `#` are skipped. A line that does not
/// parse is an input error, not a handler failure.
pub fn replay<R: BufRead>(reader: R, listener: &dyn EventListener) -> Result<ReplayOutcome> {
    let mut events = 0;
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read event log at line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = EventLine::parse(trimmed)
            .with_context(|| format!("invalid event at line {line_no}"))?;
        if let Err(error) = event.dispatch(listener) {
            return Ok(ReplayOutcome::Failed {
                line: line_no,
                error,
            });
        }
        events += 1;
    }
    Ok(ReplayOutcome::Completed { events })
}
