//! Paginated hosted-zone enumeration.
//!
//! The delegation checker needs the complete record set of a zone before
//! it can classify anything, so enumeration always materializes the whole
//! listing: it follows the provider's `(next name, next type)` cursor
//! page by page, retrying transient page fetches with backoff, until the
//! provider stops handing back a cursor.
//!
//! The listing provider itself sits behind [`ZoneSource`];
//! [`HttpZoneSource`] is the reqwest-backed implementation used in
//! production.

mod config;
mod http;
mod source;

pub use config::RetryConfig;
pub use http::{HttpZoneSource, HttpZoneSourceBuilder};
pub use source::{enumerate, ZoneSource};
