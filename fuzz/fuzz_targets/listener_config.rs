//! Fuzz harness for listener config parsing and registry construction.

#![no_main]
use ci_listener::{IssueRecorder, ListenerConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(cfg) = ListenerConfig::from_yaml(s) {
        let _ = cfg.issue_file_pattern();
        let _ = cfg.build_registry();
        if let Ok(recorder) = IssueRecorder::from_config(&cfg) {
            for sut in cfg.suts.keys() {
                let _ = recorder.formatter_ref(sut);
            }
        }
    }
});
