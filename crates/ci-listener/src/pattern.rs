use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{ListenerError, ListenerResult};
use crate::template::Template;

const ID_PLACEHOLDER: &str = "id";

/// Issue file name template with a single named placeholder, `{id}`.
///
/// `{{` and `}}` stand for literal braces. Any other placeholder is rejected
/// when the pattern is parsed, so resolving never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFilePattern {
    raw: String,
    template: Template,
}

impl IssueFilePattern {
    pub fn parse(pattern: &str) -> ListenerResult<Self> {
        let err = |reason: String| ListenerError::Pattern {
            pattern: pattern.to_string(),
            reason,
        };

        let template = Template::parse(pattern).map_err(err)?;
        if let Some(name) = template.fields().find(|f| *f != ID_PLACEHOLDER) {
            return Err(err(format!(
                "unknown placeholder '{{{}}}', only '{{id}}' is supported",
                name
            )));
        }

        Ok(Self {
            raw: pattern.to_string(),
            template,
        })
    }

    /// Like [`parse`](Self::parse), but an empty string means no pattern.
    pub fn parse_optional(pattern: &str) -> ListenerResult<Option<Self>> {
        if pattern.is_empty() {
            return Ok(None);
        }
        Self::parse(pattern).map(Some)
    }

    /// Substitute an already sanitized id into the template.
    pub fn resolve(&self, id: &str) -> PathBuf {
        let rendered = self
            .template
            .render(|_| Ok::<_, std::convert::Infallible>(id.to_string()));
        match rendered {
            Ok(path) => PathBuf::from(path),
            Err(never) => match never {},
        }
    }

    pub fn has_id(&self) -> bool {
        self.template.fields().next().is_some()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for IssueFilePattern {
    type Err = ListenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
