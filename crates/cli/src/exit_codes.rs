//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! | Range   | Domain     | Description                              |
//! |---------|------------|------------------------------------------|
//! | 0       | Universal  | Success                                  |
//! | 1       | Universal  | General error (unspecified)              |
//! | 2       | Universal  | CLI usage error (bad args, missing file) |
//! | 60-69   | merge      | Dedup config and run failures            |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Config file failed to parse or validate.
pub const EXIT_MERGE_INVALID_CONFIG: u8 = 60;

/// Runtime failure: unreadable source file, malformed records, write error.
pub const EXIT_MERGE_RUNTIME: u8 = 61;
