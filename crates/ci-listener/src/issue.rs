use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ListenerError, ListenerResult};

/// Issue record as supplied by the orchestrator.
///
/// The listener only reads it; fields other than `sut` are opaque.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issue(Map<String, Value>);

impl Issue {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build an issue from a JSON value; non-objects are rejected.
    pub fn from_value(value: Value) -> ListenerResult<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(ListenerError::InvalidIssue {
                reason: format!("expected a JSON object, got {}", other),
            }),
        }
    }

    /// Name of the subject under test this issue was found against.
    pub fn sut(&self) -> ListenerResult<&str> {
        self.0
            .get("sut")
            .and_then(Value::as_str)
            .ok_or(ListenerError::MissingSut)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}
