//! Site building: file system access and the per-family batch loop

pub mod batch;
pub mod io;

pub use batch::{build_family, is_safe_slug, load_partials, BatchReport, BuiltPage, RecordFailure};
pub use io::{FsSiteIo, SiteIo};
