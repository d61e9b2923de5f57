//! Inbound event API and the CI progress listener.

use std::io::{self, Write};
use std::path::PathBuf;

use serde_json::Value;

use crate::config::ListenerConfig;
use crate::error::ListenerResult;
use crate::issue::Issue;
use crate::job::{JobId, NewJob};
use crate::pattern::IssueFilePattern;
use crate::progress::{Marker, ProgressSink};
use crate::recorder::IssueRecorder;
use crate::tracker::JobTracker;

/// Campaign events, as delivered by the orchestrator.
///
/// Every method defaults to a no-op so listeners implement only what they
/// observe. Calls are synchronous and may come from several threads.
pub trait EventListener: Send + Sync {
    fn new_job(&self, _id: &JobId, _job: &NewJob) -> ListenerResult<()> {
        Ok(())
    }

    fn new_fuzz_job(
        &self,
        id: &JobId,
        fuzzer: &str,
        sut: &str,
        cost: u64,
        batch: u64,
    ) -> ListenerResult<()> {
        self.new_job(
            id,
            &NewJob::Fuzz {
                fuzzer: fuzzer.to_string(),
                sut: sut.to_string(),
                cost,
                batch,
            },
        )
    }

    fn new_reduce_job(
        &self,
        id: &JobId,
        sut: &str,
        cost: u64,
        issue_id: &str,
        size: u64,
    ) -> ListenerResult<()> {
        self.new_job(
            id,
            &NewJob::Reduce {
                sut: sut.to_string(),
                cost,
                issue_id: issue_id.to_string(),
                size,
            },
        )
    }

    fn new_update_job(&self, id: &JobId, sut: &str) -> ListenerResult<()> {
        self.new_job(
            id,
            &NewJob::Update {
                sut: sut.to_string(),
            },
        )
    }

    fn new_validate_job(&self, id: &JobId, sut: &str, issue_id: &str) -> ListenerResult<()> {
        self.new_job(
            id,
            &NewJob::Validate {
                sut: sut.to_string(),
                issue_id: issue_id.to_string(),
            },
        )
    }

    fn activate_job(&self, _id: &JobId) -> ListenerResult<()> {
        Ok(())
    }

    fn job_progress(&self, _id: &JobId, _progress: &Value) -> ListenerResult<()> {
        Ok(())
    }

    fn remove_job(&self, _id: &JobId) -> ListenerResult<()> {
        Ok(())
    }

    fn new_issue(&self, _issue: &Issue) -> ListenerResult<()> {
        Ok(())
    }

    fn invalid_issue(&self, _issue: &Issue) -> ListenerResult<()> {
        Ok(())
    }

    fn update_issue(&self, _issue: &Issue) -> ListenerResult<()> {
        Ok(())
    }
}

/// Prints a compact marker trace of job and issue activity and saves new or
/// updated issues through an [`IssueRecorder`].
pub struct CiListener<W: Write = io::Stdout> {
    jobs: JobTracker,
    sink: ProgressSink<W>,
    recorder: IssueRecorder,
}

impl CiListener<io::Stdout> {
    /// Listener writing markers to stdout.
    pub fn stdout(recorder: IssueRecorder) -> Self {
        Self::new(ProgressSink::stdout(), recorder)
    }

    pub fn from_config(config: &ListenerConfig) -> ListenerResult<Self> {
        Ok(Self::stdout(IssueRecorder::from_config(config)?))
    }
}

impl<W: Write> CiListener<W> {
    pub fn new(sink: ProgressSink<W>, recorder: IssueRecorder) -> Self {
        Self {
            jobs: JobTracker::new(),
            sink,
            recorder,
        }
    }

    /// Listener with only an issue file pattern and default formatting.
    pub fn with_pattern(out: W, pattern: Option<IssueFilePattern>) -> Self {
        Self::new(
            ProgressSink::new(out),
            IssueRecorder::default().with_pattern(pattern),
        )
    }

    pub fn jobs(&self) -> &JobTracker {
        &self.jobs
    }

    pub fn recorder(&self) -> &IssueRecorder {
        &self.recorder
    }

    /// Save an issue without emitting a marker.
    pub fn save(&self, issue: &Issue) -> ListenerResult<Option<PathBuf>> {
        self.recorder.save(issue)
    }

    /// Consume the listener and hand back the marker writer.
    pub fn into_writer(self) -> ListenerResult<W> {
        self.sink.into_inner()
    }
}

impl<W: Write + Send> EventListener for CiListener<W> {
    fn new_job(&self, id: &JobId, job: &NewJob) -> ListenerResult<()> {
        self.jobs.register(id.clone(), job.kind())
    }

    fn activate_job(&self, id: &JobId) -> ListenerResult<()> {
        self.jobs.activate(id, &self.sink)
    }

    fn job_progress(&self, id: &JobId, _progress: &Value) -> ListenerResult<()> {
        self.jobs.tick(id, &self.sink)
    }

    fn remove_job(&self, id: &JobId) -> ListenerResult<()> {
        self.jobs.remove(id, &self.sink)
    }

    fn new_issue(&self, issue: &Issue) -> ListenerResult<()> {
        self.sink.emit(Marker::NewIssue)?;
        self.save(issue).map(|_| ())
    }

    fn invalid_issue(&self, _issue: &Issue) -> ListenerResult<()> {
        self.sink.emit(Marker::InvalidIssue)
    }

    fn update_issue(&self, issue: &Issue) -> ListenerResult<()> {
        self.sink.emit(Marker::UpdatedIssue)?;
        self.save(issue).map(|_| ())
    }
}

/// Forwards every event to each listener in registration order.
///
/// Stops at the first listener that fails and returns its error.
#[derive(Default)]
pub struct ListenerSet {
    listeners: Vec<Box<dyn EventListener>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, listener: Box<dyn EventListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn each(&self, f: impl Fn(&dyn EventListener) -> ListenerResult<()>) -> ListenerResult<()> {
        self.listeners.iter().try_for_each(|l| f(l.as_ref()))
    }
}

impl EventListener for ListenerSet {
    fn new_job(&self, id: &JobId, job: &NewJob) -> ListenerResult<()> {
        self.each(|l| l.new_job(id, job))
    }

    fn activate_job(&self, id: &JobId) -> ListenerResult<()> {
        self.each(|l| l.activate_job(id))
    }

    fn job_progress(&self, id: &JobId, progress: &Value) -> ListenerResult<()> {
        self.each(|l| l.job_progress(id, progress))
    }

    fn remove_job(&self, id: &JobId) -> ListenerResult<()> {
        self.each(|l| l.remove_job(id))
    }

    fn new_issue(&self, issue: &Issue) -> ListenerResult<()> {
        self.each(|l| l.new_issue(issue))
    }

    fn invalid_issue(&self, issue: &Issue) -> ListenerResult<()> {
        self.each(|l| l.invalid_issue(issue))
    }

    fn update_issue(&self, issue: &Issue) -> ListenerResult<()> {
        self.each(|l| l.update_issue(issue))
    }
}
