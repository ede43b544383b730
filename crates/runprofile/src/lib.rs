//! runprofile: the non-GUI core of running Robot Framework tests from an
//! editor.
//!
//! Run profiles turn saved settings into a runner command line, validate
//! free-text runner arguments, and classify failed runs. The spec resolver
//! locates library keyword specifications through an ordered chain of
//! discovery backends.

#![forbid(unsafe_code)]
// Library documentation is in progress. Public API types have docs;
// internal types will be documented in future releases.
#![allow(missing_docs)]

pub mod arguments;
pub mod error;
pub mod library;
pub mod model;
pub mod profile;
pub mod settings;
pub mod spec;

pub use crate::error::{ProfileError, ProfileResult};
pub use crate::model::*;
pub use crate::profile::{all_profiles, normalize_tags, RunProfile};
pub use crate::spec::SpecResolver;
