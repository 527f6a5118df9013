#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod runner;
pub mod version;

pub use runner::TestRunner;
pub use version::{
    latest_release_tag, normalize_local, DerivedVersion, VersionError, FALLBACK_VERSION,
};
