//! Issue persistence through the listener: naming, content, and no-op paths.

use ci_listener::{
    CiListener, EventListener, FormatMode, Formatter, FormatterRegistry, Issue, IssueFilePattern,
    IssueRecorder, ListenerConfig, ListenerError, ListenerResult, ProgressSink, SutConfig,
};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

/// Fixed short/long renderings; counts how often it is called.
#[derive(Default)]
struct Fixed {
    calls: AtomicUsize,
}

impl Formatter for Fixed {
    fn format(&self, _issue: &Issue, mode: FormatMode) -> ListenerResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match mode {
            FormatMode::Short => "SIGSEGV @ main.c:42".to_string(),
            FormatMode::Long => "Program received SIGSEGV\n  at main.c:42\n".to_string(),
        })
    }
}

fn jerry_issue() -> Issue {
    Issue::from_value(json!({"sut": "jerry", "id": "ignored by Fixed"})).unwrap()
}

fn listener_with_fixed(pattern: Option<IssueFilePattern>) -> (CiListener<Vec<u8>>, Arc<Fixed>) {
    let fixed = Arc::new(Fixed::default());
    let mut registry = FormatterRegistry::new();
    registry.register("fixed", fixed.clone());
    let mut suts = BTreeMap::new();
    suts.insert(
        "jerry".to_string(),
        SutConfig {
            ci_formatter: Some("fixed".into()),
            formatter: Some("json".into()),
        },
    );
    let recorder = IssueRecorder::new(pattern, registry, suts);
    (
        CiListener::new(ProgressSink::new(Vec::new()), recorder),
        fixed,
    )
}

fn pattern_in(dir: &TempDir, tail: &str) -> IssueFilePattern {
    IssueFilePattern::parse(&format!("{}/{}", dir.path().display(), tail)).unwrap()
}

fn trace(listener: CiListener<Vec<u8>>) -> String {
    String::from_utf8(listener.into_writer().unwrap()).unwrap()
}

#[test]
fn short_form_names_file_and_long_form_fills_it() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    let (l, fixed) = listener_with_fixed(Some(pattern_in(&dir, "out/{id}.txt")));

    l.new_issue(&jerry_issue()).unwrap();

    let path = dir.path().join("out/SIGSEGV_main_c_42.txt");
    assert_eq!(
        fs::read_to_string(path).unwrap(),
        "Program received SIGSEGV\n  at main.c:42\n"
    );
    assert_eq!(fixed.calls.load(Ordering::SeqCst), 2);
    assert_eq!(trace(l), "+");
}

#[test]
fn update_rewrites_same_file() {
    let dir = TempDir::new().unwrap();
    let (l, _) = listener_with_fixed(Some(pattern_in(&dir, "{id}.txt")));
    let path = dir.path().join("SIGSEGV_main_c_42.txt");
    fs::write(&path, "old").unwrap();

    l.update_issue(&jerry_issue()).unwrap();

    assert!(fs::read_to_string(&path).unwrap().starts_with("Program received"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    assert_eq!(trace(l), "o");
}

#[test]
fn without_pattern_nothing_is_formatted_or_written() {
    let dir = TempDir::new().unwrap();
    let (l, fixed) = listener_with_fixed(None);

    l.new_issue(&jerry_issue()).unwrap();
    l.update_issue(&jerry_issue()).unwrap();

    assert_eq!(fixed.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(trace(l), "+o");
}

#[test]
fn empty_config_pattern_behaves_like_no_pattern() {
    let config = ListenerConfig::from_yaml("issue_file_pattern: \"\"").unwrap();
    let l = CiListener::new(
        ProgressSink::new(Vec::new()),
        IssueRecorder::from_config(&config).unwrap(),
    );

    l.new_issue(&jerry_issue()).unwrap();
    l.update_issue(&jerry_issue()).unwrap();

    assert!(l.recorder().pattern().is_none());
    assert_eq!(trace(l), "+o");
}

#[test]
fn invalid_issue_never_formats_or_writes() {
    let dir = TempDir::new().unwrap();
    let (l, fixed) = listener_with_fixed(Some(pattern_in(&dir, "{id}.txt")));

    l.invalid_issue(&jerry_issue()).unwrap();

    assert_eq!(fixed.calls.load(Ordering::SeqCst), 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    assert_eq!(trace(l), "-");
}

#[test]
fn write_failure_propagates_after_marker() {
    let dir = TempDir::new().unwrap();
    let (l, _) = listener_with_fixed(Some(pattern_in(&dir, "no-such-dir/{id}.txt")));

    let err = l.new_issue(&jerry_issue()).unwrap_err();

    assert!(matches!(err, ListenerError::Io { .. }));
    assert_eq!(trace(l), "+");
}

#[test]
fn config_driven_template_and_json_fallback() {
    let dir = TempDir::new().unwrap();
    let yaml = format!(
        r#"
issue_file_pattern: "{}/{{id}}.log"
formatters:
  crash:
    type: template
    short: "{{signal}} in {{function}}"
    long: "{{signal}}\n{{stack}}"
suts:
  jerry:
    ci_formatter: crash
"#,
        dir.path().display()
    );
    let config = ListenerConfig::from_yaml(&yaml).unwrap();
    let recorder = IssueRecorder::from_config(&config).unwrap();
    let l = CiListener::new(ProgressSink::new(Vec::new()), recorder);

    let crash = Issue::from_value(json!({
        "sut": "jerry",
        "signal": "SIGABRT",
        "function": "ecma_gc_run",
        "stack": "#0 abort\n#1 ecma_gc_run"
    }))
    .unwrap();
    l.new_issue(&crash).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("SIGABRT_in_ecma_gc_run.log")).unwrap(),
        "SIGABRT\n#0 abort\n#1 ecma_gc_run"
    );

    // no sut section: default JSON formatter, short form is the issue id
    let other = Issue::from_value(json!({"sut": "other", "id": "heap-use-after-free#1"})).unwrap();
    l.new_issue(&other).unwrap();
    let json_path = dir.path().join("heap_use_after_free_1.log");
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(written, json!({"sut": "other", "id": "heap-use-after-free#1"}));

    assert_eq!(trace(l), "++");
}

#[test]
fn dangling_ci_formatter_is_not_silently_replaced() {
    let dir = TempDir::new().unwrap();
    let yaml = format!(
        "issue_file_pattern: \"{}/{{id}}\"\nsuts:\n  jerry:\n    ci_formatter: missing\n    formatter: json\n",
        dir.path().display()
    );
    let config = ListenerConfig::from_yaml(&yaml).unwrap();
    let l = CiListener::new(
        ProgressSink::new(Vec::new()),
        IssueRecorder::from_config(&config).unwrap(),
    );

    let err = l.new_issue(&jerry_issue()).unwrap_err();
    assert!(matches!(err, ListenerError::UnknownFormatter { ref name, .. } if name == "missing"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
