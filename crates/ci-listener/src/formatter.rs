//! Issue formatters and the named registry SUT sections point into.
//!
//! A formatter renders an issue twice: a short, lossy form used to derive the
//! issue file name, and a long form written as the file content.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ListenerError, ListenerResult};
use crate::issue::Issue;
use crate::template::Template;

/// Name under which [`JsonFormatter`] is always registered.
pub const JSON_FORMATTER: &str = "json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatMode {
    Short,
    #[default]
    Long,
}

pub trait Formatter: Send + Sync {
    fn format(&self, issue: &Issue, mode: FormatMode) -> ListenerResult<String>;
}

impl<F> Formatter for F
where
    F: Fn(&Issue, FormatMode) -> ListenerResult<String> + Send + Sync,
{
    fn format(&self, issue: &Issue, mode: FormatMode) -> ListenerResult<String> {
        self(issue, mode)
    }
}

/// Default formatter: the issue's `id` as short form, pretty JSON as long form.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format(&self, issue: &Issue, mode: FormatMode) -> ListenerResult<String> {
        match mode {
            FormatMode::Short => match issue.get("id").and_then(Value::as_str) {
                Some(id) => Ok(id.to_string()),
                None => Ok(serde_json::to_string(issue)?),
            },
            FormatMode::Long => {
                let sorted: BTreeMap<&String, &Value> = issue.fields().iter().collect();
                Ok(serde_json::to_string_pretty(&sorted)?)
            }
        }
    }
}

/// Formatter built from `{field}` templates over the issue's top-level fields.
#[derive(Debug, Clone)]
pub struct TemplateFormatter {
    short: Template,
    long: Template,
}

impl TemplateFormatter {
    /// A missing `short` template reuses `long`.
    pub fn new(short: Option<&str>, long: &str) -> ListenerResult<Self> {
        let parse = |raw: &str| {
            Template::parse(raw).map_err(|reason| ListenerError::Template {
                template: raw.to_string(),
                reason,
            })
        };
        let long = parse(long)?;
        let short = match short {
            Some(raw) => parse(raw)?,
            None => long.clone(),
        };
        Ok(Self { short, long })
    }
}

impl Formatter for TemplateFormatter {
    fn format(&self, issue: &Issue, mode: FormatMode) -> ListenerResult<String> {
        let template = match mode {
            FormatMode::Short => &self.short,
            FormatMode::Long => &self.long,
        };
        template.render(|field| match issue.get(field) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(ListenerError::Render {
                reason: format!("issue has no field '{}'", field),
            }),
        })
    }
}

/// Named formatters. Always holds [`JsonFormatter`] as `json`.
#[derive(Clone)]
pub struct FormatterRegistry {
    formatters: HashMap<String, Arc<dyn Formatter>>,
}

impl Default for FormatterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormatterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.formatters.keys().collect();
        names.sort();
        f.debug_struct("FormatterRegistry")
            .field("formatters", &names)
            .finish()
    }
}

impl FormatterRegistry {
    pub fn new() -> Self {
        let mut formatters: HashMap<String, Arc<dyn Formatter>> = HashMap::new();
        formatters.insert(JSON_FORMATTER.to_string(), Arc::new(JsonFormatter));
        Self { formatters }
    }

    /// Register (or replace) a formatter under `name`.
    pub fn register(&mut self, name: impl Into<String>, formatter: Arc<dyn Formatter>) {
        self.formatters.insert(name.into(), formatter);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Formatter>> {
        self.formatters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    /// Resolve the formatter for `sut` from its configured reference.
    ///
    /// No reference falls back to JSON; a dangling reference is an error.
    pub fn resolve(&self, sut: &str, reference: Option<&str>) -> ListenerResult<Arc<dyn Formatter>> {
        match reference {
            None => Ok(Arc::new(JsonFormatter)),
            Some(name) => self
                .get(name)
                .ok_or_else(|| ListenerError::UnknownFormatter {
                    sut: sut.to_string(),
                    name: name.to_string(),
                }),
        }
    }
}
