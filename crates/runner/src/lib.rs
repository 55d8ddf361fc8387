#![forbid(unsafe_code)]
//! Minimal build-runner host: spawns a job's process and pumps its console
//! output through the writer chain produced by the wrapper registry.
//!
//! This crate is the host side of the wrapper contract. It owns the build's
//! base log writer, asks the registry to decorate it once at setup time, and
//! serializes all output writes per build; wrappers never see concurrent
//! writes for the same build.

mod error;
mod job;

pub use error::RunnerError;
pub use job::{run_job, JobOutcome, JobSpec};
