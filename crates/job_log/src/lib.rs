#![forbid(unsafe_code)]
//! Build wrapper that tees a build's console output into the host's
//! `tracing` subscriber, one record per write, prefixed with the build id.
//!
//! The sink deliberately does **not** reassemble lines across write
//! boundaries: process output arrives as arbitrary chunks, and the mirror is
//! best-effort, not a faithful transcript.

mod sink;
mod tee;
mod wrapper;

pub use sink::{LineLoggingSink, RecordSink, TracingRecordSink, LOG_TARGET};
pub use tee::TeeWriter;
pub use wrapper::{register, JobLogSettings, JobLogWrapper, JobLogWrapperFactory, DESCRIPTOR};
