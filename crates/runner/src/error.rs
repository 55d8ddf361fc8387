use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use wrapper_api::WrapperError;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("build setup failed: {0}")]
    Setup(#[from] WrapperError),
    #[error("failed to spawn job process (program={program:?}): {source}")]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },
    #[error("job timed out after {timeout:?}")]
    Timeout { timeout: Duration },
    #[error("failed waiting for job process: {0}")]
    Wait(std::io::Error),
    #[error("failed reading job stdout: {0}")]
    StdoutRead(std::io::Error),
    #[error("failed reading job stderr: {0}")]
    StderrRead(std::io::Error),
    #[error("failed writing job output to the build log: {0}")]
    OutputWrite(std::io::Error),
    #[error("internal error: missing stdout pipe")]
    MissingStdout,
    #[error("internal error: missing stderr pipe")]
    MissingStderr,
    #[error("internal error: join failure: {0}")]
    Join(String),
}
