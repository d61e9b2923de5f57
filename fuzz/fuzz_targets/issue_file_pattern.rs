//! Fuzz harness for `IssueFilePattern::parse` and `sanitize_id`.
//!
//! Any accepted pattern must resolve a sanitized id without panicking, and
//! the sanitized id must be stable under a second pass.

#![no_main]
use ci_listener::{sanitize_id, IssueFilePattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let id = sanitize_id(s);
    assert_eq!(sanitize_id(&id), id);
    assert!(id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_'));

    if let Ok(pattern) = IssueFilePattern::parse(s) {
        let path = pattern.resolve(&id);
        if !pattern.has_id() {
            assert_eq!(path, pattern.resolve("other"));
        }
    }
});
