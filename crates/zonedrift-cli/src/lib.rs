//! # zonedrift-cli
//!
//! Command-line front end for the zonedrift scanner.
//!
//! One invocation is one stateless scan: enumerate the configured hosted
//! zone, verify every delegation and managed-platform alias against live
//! DNS, reconcile issue-tracker tickets, publish an alert when something
//! is wrong, and print the structured report.

pub mod cli;
pub mod config;
mod run;

pub use run::run;
