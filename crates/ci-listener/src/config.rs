//! Listener configuration.
//!
//! Loaded from YAML. SUT sections reference formatters by name; the first of
//! `ci_formatter`, `formatter` that is set wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::ListenerResult;
use crate::formatter::{FormatterRegistry, TemplateFormatter};
use crate::pattern::IssueFilePattern;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListenerConfig {
    /// Issue file name template with an `{id}` placeholder. Unset or empty
    /// disables persistence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_file_pattern: Option<String>,

    /// Named formatters, in addition to the built-in `json`.
    #[serde(default)]
    pub formatters: BTreeMap<String, FormatterSpec>,

    /// Per-SUT settings keyed by SUT name.
    #[serde(default)]
    pub suts: BTreeMap<String, SutConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormatterSpec {
    Template {
        #[serde(default)]
        short: Option<String>,
        long: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SutConfig {
    #[serde(default)]
    pub ci_formatter: Option<String>,

    #[serde(default)]
    pub formatter: Option<String>,
}

impl SutConfig {
    /// Formatter reference in priority order: `ci_formatter`, then `formatter`.
    pub fn formatter_ref(&self) -> Option<&str> {
        self.ci_formatter
            .as_deref()
            .or(self.formatter.as_deref())
    }
}

impl ListenerConfig {
    /// Load listener config from YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read listener config: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("invalid listener config: {}", path.display()))
    }

    /// Parse listener config from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("failed to parse listener config YAML")
    }

    pub fn issue_file_pattern(&self) -> ListenerResult<Option<IssueFilePattern>> {
        match self.issue_file_pattern.as_deref() {
            Some(raw) => IssueFilePattern::parse_optional(raw),
            None => Ok(None),
        }
    }

    /// Registry with the built-in formatters plus every configured one.
    pub fn build_registry(&self) -> ListenerResult<FormatterRegistry> {
        let mut registry = FormatterRegistry::new();
        for (name, spec) in &self.formatters {
            match spec {
                FormatterSpec::Template { short, long } => {
                    let formatter = TemplateFormatter::new(short.as_deref(), long)?;
                    registry.register(name.clone(), Arc::new(formatter));
                }
            }
        }
        Ok(registry)
    }
}
