//! JSON Lines event log format.

use ci_listener::{EventListener, Issue, JobId, ListenerResult, NewJob};
use serde::Deserialize;
use serde_json::Value;

/// One orchestrator event, tagged by `event`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventLine {
    NewFuzzJob {
        id: JobId,
        fuzzer: String,
        sut: String,
        #[serde(default)]
        cost: u64,
        #[serde(default)]
        batch: u64,
    },
    NewReduceJob {
        id: JobId,
        sut: String,
        #[serde(default)]
        cost: u64,
        issue_id: String,
        #[serde(default)]
        size: u64,
    },
    NewUpdateJob {
        id: JobId,
        sut: String,
    },
    NewValidateJob {
        id: JobId,
        sut: String,
        issue_id: String,
    },
    ActivateJob {
        id: JobId,
    },
    JobProgress {
        id: JobId,
        #[serde(default)]
        progress: Value,
    },
    RemoveJob {
        id: JobId,
    },
    NewIssue {
        issue: Issue,
    },
    InvalidIssue {
        issue: Issue,
    },
    UpdateIssue {
        issue: Issue,
    },
}

impl EventLine {
    pub fn parse(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn dispatch(self, listener: &dyn EventListener) -> ListenerResult<()> {
        match self {
            EventLine::NewFuzzJob {
                id,
                fuzzer,
                sut,
                cost,
                batch,
            } => listener.new_job(
                &id,
                &NewJob::Fuzz {
                    fuzzer,
                    sut,
                    cost,
                    batch,
                },
            ),
            EventLine::NewReduceJob {
                id,
                sut,
                cost,
                issue_id,
                size,
            } => listener.new_job(
                &id,
                &NewJob::Reduce {
                    sut,
                    cost,
                    issue_id,
                    size,
                },
            ),
            EventLine::NewUpdateJob { id, sut } => listener.new_job(&id, &NewJob::Update { sut }),
            EventLine::NewValidateJob { id, sut, issue_id } => {
                listener.new_job(&id, &NewJob::Validate { sut, issue_id })
            }
            EventLine::ActivateJob { id } => listener.activate_job(&id),
            EventLine::JobProgress { id, progress } => listener.job_progress(&id, &progress),
            EventLine::RemoveJob { id } => listener.remove_job(&id),
            EventLine::NewIssue { issue } => listener.new_issue(&issue),
            EventLine::InvalidIssue { issue } => listener.invalid_issue(&issue),
            EventLine::UpdateIssue { issue } => listener.update_issue(&issue),
        }
    }
}
