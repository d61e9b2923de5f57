//! Job identity and kinds as reported by the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque job identifier, unique while the job is live.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Fuzz,
    Reduce,
    Update,
    Validate,
}

impl JobKind {
    /// Single-character code shown after the opening marker.
    pub fn code(self) -> char {
        match self {
            JobKind::Fuzz => 'f',
            JobKind::Reduce => 'r',
            JobKind::Update => 'u',
            JobKind::Validate => 'v',
        }
    }
}

/// Creation event payload. Only the kind is retained by the listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NewJob {
    Fuzz {
        fuzzer: String,
        sut: String,
        #[serde(default)]
        cost: u64,
        #[serde(default)]
        batch: u64,
    },
    Reduce {
        sut: String,
        #[serde(default)]
        cost: u64,
        issue_id: String,
        #[serde(default)]
        size: u64,
    },
    Update {
        sut: String,
    },
    Validate {
        sut: String,
        issue_id: String,
    },
}

impl NewJob {
    pub fn kind(&self) -> JobKind {
        match self {
            NewJob::Fuzz { .. } => JobKind::Fuzz,
            NewJob::Reduce { .. } => JobKind::Reduce,
            NewJob::Update { .. } => JobKind::Update,
            NewJob::Validate { .. } => JobKind::Validate,
        }
    }

    pub fn sut(&self) -> &str {
        match self {
            NewJob::Fuzz { sut, .. }
            | NewJob::Reduce { sut, .. }
            | NewJob::Update { sut }
            | NewJob::Validate { sut, .. } => sut,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_are_distinct() {
        let codes: std::collections::HashSet<char> = [
            JobKind::Fuzz,
            JobKind::Reduce,
            JobKind::Update,
            JobKind::Validate,
        ]
        .iter()
        .map(|k| k.code())
        .collect();
        assert_eq!(codes.len(), 4);
    }

    #[test]
    fn new_job_maps_to_kind() {
        let job = NewJob::Reduce {
            sut: "jerry".into(),
            cost: 1,
            issue_id: "abc".into(),
            size: 120,
        };
        assert_eq!(job.kind(), JobKind::Reduce);
        assert_eq!(job.sut(), "jerry");
    }

    #[test]
    fn new_job_deserializes_with_defaults() {
        let job: NewJob =
            serde_json::from_str(r#"{"kind":"fuzz","fuzzer":"grammarinator","sut":"jerry"}"#)
                .unwrap();
        assert_eq!(
            job,
            NewJob::Fuzz {
                fuzzer: "grammarinator".into(),
                sut: "jerry".into(),
                cost: 0,
                batch: 0,
            }
        );
    }
}
