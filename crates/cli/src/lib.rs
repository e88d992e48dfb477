//! Library half of the `paradiff` binary: run configuration and report
//! rendering, kept here so they can be tested without spawning the binary.

pub mod config;
pub mod output;
