//! Library side of the `prodtrace` command-line tool.

#![deny(unsafe_code)]

pub mod config;
pub mod logging;
pub mod workflow;
