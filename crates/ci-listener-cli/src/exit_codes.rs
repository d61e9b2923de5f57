//! Exit codes for the `ci-listener` binary.

pub const SUCCESS: i32 = 0;
pub const EVENT_FAILED: i32 = 1; // An event handler returned an error
pub const CONFIG_ERROR: i32 = 2; // Bad config, pattern, or event input
