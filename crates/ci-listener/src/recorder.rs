use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ListenerConfig, SutConfig};
use crate::error::{ListenerError, ListenerResult};
use crate::formatter::{FormatMode, FormatterRegistry};
use crate::issue::Issue;
use crate::pattern::IssueFilePattern;
use crate::sanitize::sanitize_id;

/// Writes new and updated issues to files named by an issue file pattern.
#[derive(Debug, Clone, Default)]
pub struct IssueRecorder {
    pattern: Option<IssueFilePattern>,
    registry: FormatterRegistry,
    suts: BTreeMap<String, SutConfig>,
}

impl IssueRecorder {
    pub fn new(
        pattern: Option<IssueFilePattern>,
        registry: FormatterRegistry,
        suts: BTreeMap<String, SutConfig>,
    ) -> Self {
        Self {
            pattern,
            registry,
            suts,
        }
    }

    pub fn from_config(config: &ListenerConfig) -> ListenerResult<Self> {
        Ok(Self::new(
            config.issue_file_pattern()?,
            config.build_registry()?,
            config.suts.clone(),
        ))
    }

    pub fn with_pattern(mut self, pattern: Option<IssueFilePattern>) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn registry_mut(&mut self) -> &mut FormatterRegistry {
        &mut self.registry
    }

    pub fn pattern(&self) -> Option<&IssueFilePattern> {
        self.pattern.as_ref()
    }

    /// Formatter reference configured for `sut`, if any.
    pub fn formatter_ref(&self, sut: &str) -> Option<&str> {
        self.suts.get(sut).and_then(SutConfig::formatter_ref)
    }

    /// Render `issue` and write its long form to the patterned file.
    ///
    /// Returns the written path, or `None` when no pattern is configured.
    /// Lookup, render and write failures are returned as-is.
    pub fn save(&self, issue: &Issue) -> ListenerResult<Option<PathBuf>> {
        let Some(pattern) = &self.pattern else {
            return Ok(None);
        };

        let sut = issue.sut()?;
        let formatter = self.registry.resolve(sut, self.formatter_ref(sut))?;

        let short = formatter.format(issue, FormatMode::Short)?;
        let long = formatter.format(issue, FormatMode::Long)?;

        let path = pattern.resolve(&sanitize_id(&short));
        write_issue_file(&path, &long)?;
        info!(path = %path.display(), sut, "issue saved");
        Ok(Some(path))
    }
}

/// Create or truncate `path` and write `content` in one call.
///
/// The handle is scoped to this function and closed on every return path.
fn write_issue_file(path: &Path, content: &str) -> ListenerResult<()> {
    let io_err = |source| ListenerError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(io_err)?;
    file.write_all(content.as_bytes()).map_err(io_err)?;
    Ok(())
}
