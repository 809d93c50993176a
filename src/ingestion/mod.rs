//! Loading entrypoints and implementations.
//!
//! Most callers should use [`load`] (from [`loader`]) which:
//!
//! - reads a delimited text file in its declared [`TextEncoding`]
//! - infers column types (integer, float, string) and preserves column order
//! - optionally reports success/failure/alerts to a [`LoadObserver`]
//!
//! The CSV parsing itself lives in [`csv`].

pub mod csv;
pub mod encoding;
pub mod loader;
pub mod observability;

pub use encoding::TextEncoding;
pub use loader::{LoadOptions, load, load_from_reader, load_from_str};
pub use observability::{
    CompositeObserver, FileObserver, LoadContext, LoadObserver, LoadSeverity, LoadStats, TracingObserver,
};
