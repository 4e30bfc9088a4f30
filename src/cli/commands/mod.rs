//! CLI command implementations

pub mod run;
pub mod status;
pub mod validate;

/// Exit code of a successful command
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code of a run that ended in a failure outcome
pub const EXIT_RUN_FAILED: i32 = 1;
/// Exit code of an invalid configuration or settings bag
pub const EXIT_CONFIG_ERROR: i32 = 2;
/// Exit code of an error outside the run itself
pub const EXIT_FATAL: i32 = 5;
