//! Live marker stream.
//!
//! Every event is rendered as a one or two character marker appended to an
//! unbuffered writer and flushed immediately. No separators, no newlines.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

use crate::error::{ListenerError, ListenerResult};
use crate::job::JobKind;

pub const OPEN: char = '(';
pub const TICK: char = '.';
pub const CLOSE: char = ')';
pub const NEW_ISSUE: char = '+';
pub const INVALID_ISSUE: char = '-';
pub const UPDATED_ISSUE: char = 'o';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Job started; rendered as `(` followed by the kind code.
    Open(JobKind),
    Tick,
    Close,
    NewIssue,
    InvalidIssue,
    UpdatedIssue,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::Open(kind) => write!(f, "{}{}", OPEN, kind.code()),
            Marker::Tick => write!(f, "{}", TICK),
            Marker::Close => write!(f, "{}", CLOSE),
            Marker::NewIssue => write!(f, "{}", NEW_ISSUE),
            Marker::InvalidIssue => write!(f, "{}", INVALID_ISSUE),
            Marker::UpdatedIssue => write!(f, "{}", UPDATED_ISSUE),
        }
    }
}

/// Serialized writer for markers. Safe to share across threads.
pub struct ProgressSink<W: Write> {
    out: Mutex<W>,
}

impl ProgressSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Append `marker` and flush before releasing the lock.
    pub fn emit(&self, marker: Marker) -> ListenerResult<()> {
        let rendered = marker.to_string();
        let mut out = self.out.lock().map_err(|_| ListenerError::LockPoisoned)?;
        out.write_all(rendered.as_bytes())
            .map_err(ListenerError::Progress)?;
        out.flush().map_err(ListenerError::Progress)
    }

    pub fn into_inner(self) -> ListenerResult<W> {
        self.out.into_inner().map_err(|_| ListenerError::LockPoisoned)
    }
}
