//! Event listener for fuzzing campaigns running in CI.
//!
//! The orchestrator reports job and issue events synchronously; the
//! [`CiListener`] turns them into a dense live trace on stdout and, when an
//! issue file pattern is configured, saves every new or updated issue to its
//! own file.
//!
//! # Marker stream
//!
//! | Event | Marker |
//! |-------|--------|
//! | job activated | `(` + kind code (`f` fuzz, `r` reduce, `u` update, `v` validate) |
//! | job progress | `.` |
//! | job removed | `)` |
//! | new issue | `+` |
//! | invalid issue | `-` |
//! | updated issue | `o` |
//!
//! # Quick Start
//!
//! ```no_run
//! use ci_listener::{CiListener, EventListener, ListenerConfig};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ListenerConfig::from_yaml("issue_file_pattern: \"issues/{id}.json\"")?;
//! let listener = CiListener::from_config(&config)?;
//!
//! let job = "job-1".into();
//! listener.new_fuzz_job(&job, "grammarinator", "jerry", 1, 100)?;
//! listener.activate_job(&job)?;
//! listener.remove_job(&job)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod formatter;
pub mod issue;
pub mod job;
pub mod listener;
pub mod pattern;
pub mod progress;
pub mod recorder;
pub mod sanitize;
mod template;
pub mod tracker;

pub use config::{FormatterSpec, ListenerConfig, SutConfig};
pub use error::{ListenerError, ListenerResult};
pub use formatter::{FormatMode, Formatter, FormatterRegistry, JsonFormatter, TemplateFormatter};
pub use issue::Issue;
pub use job::{JobId, JobKind, NewJob};
pub use listener::{CiListener, EventListener, ListenerSet};
pub use pattern::IssueFilePattern;
pub use progress::{Marker, ProgressSink};
pub use recorder::IssueRecorder;
pub use sanitize::sanitize_id;
pub use tracker::JobTracker;
