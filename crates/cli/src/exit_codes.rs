//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts rely on them, like `diff(1)`: 0 means identical, 1 means different.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | No differences                                     |
//! | 1    | Differences found                                  |
//! | 2    | Usage error (bad arguments, missing file or dir)   |
//! | 3    | Config error (config file, columns, policy values) |
//! | 4    | Input error (a workbook could not be read)         |
//! | 5    | Output error (report could not be written)         |

/// Success, and the compared files have no differences.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one row is not `unchanged`.
pub const EXIT_DIFFERENCES: u8 = 1;

/// Bad arguments. clap uses the same code for its own parse errors.
pub const EXIT_USAGE: u8 = 2;

/// Invalid config file, column letter, policy value or worksheet pattern.
pub const EXIT_CONFIG: u8 = 3;

/// A workbook or directory could not be read.
pub const EXIT_INPUT: u8 = 4;

/// The report could not be serialized or written.
pub const EXIT_OUTPUT: u8 = 5;
