//! Core types and errors for the zonedrift delegation checker.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - **Types**: zone record snapshots, classified delegations and managed
//!   aliases, and the structured violations the verifiers emit
//! - **Errors**: shared error handling with [`DriftError`]
//!
//! # Example
//!
//! ```rust
//! use zonedrift_core::{Violation, ViolationKind, ViolationReport};
//!
//! let mut report = ViolationReport::new();
//! report.push(Violation::new(
//!     "example.com.",
//!     ViolationKind::UnreachableNameserver {
//!         source: "ns1.example.net.".into(),
//!     },
//! ));
//! assert!(!report.is_empty());
//! ```

mod error;
pub mod types;

pub use error::{DriftError, Result};
pub use types::*;
