#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Header staging for vendored upstream trees.
//!
//! Copies module-local configuration headers into an `upstream` source tree,
//! skipping any destination that already matches its source byte-for-byte.
//!
//! # Design
//! - Pure library surface (`run`, `stage`, `plan`) over explicit paths; no ambient state.
//! - Status is returned as a [`StageReport`] and emitted as `tracing` events; callers format.

pub mod error;
pub mod layout;
pub mod model;
pub mod service;

pub use error::{StageError, StageResult};
pub use layout::{StageLayout, base_dir_from_module};
pub use model::{CopyTask, StageAction, StageRecord, StageReport};
pub use service::{files_identical, plan, run, stage, stage_task};
