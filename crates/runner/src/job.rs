use std::{
    collections::BTreeMap,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::Command,
    task, time,
};
use tracing::{debug, warn};
use wrapper_api::{BoxWriter, BuildContext, WrapperRegistry, WrapperSettings};

use crate::RunnerError;

/// Description of the process a build runs.
#[derive(Debug, Clone)]
pub struct JobSpec {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    timeout: Option<Duration>,
}

impl JobSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[derive(Debug)]
pub struct JobOutcome {
    pub status: ExitStatus,
    pub stdout_bytes: u64,
    pub stderr_bytes: u64,
}

#[derive(Clone, Copy)]
enum OutputChannel {
    Stdout,
    Stderr,
}

impl OutputChannel {
    fn read_error(self, source: io::Error) -> RunnerError {
        match self {
            Self::Stdout => RunnerError::StdoutRead(source),
            Self::Stderr => RunnerError::StderrRead(source),
        }
    }
}

type SharedWriter = Arc<Mutex<BoxWriter>>;

fn locked<T>(
    writer: &Mutex<BoxWriter>,
    op: impl FnOnce(&mut BoxWriter) -> io::Result<T>,
) -> io::Result<T> {
    let mut guard = writer
        .lock()
        .map_err(|_| io::Error::other("build log writer poisoned"))?;
    op(&mut guard)
}

async fn pump_stream<R>(
    mut reader: R,
    channel: OutputChannel,
    writer: SharedWriter,
) -> Result<u64, RunnerError>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = [0u8; 4096];
    let mut total = 0u64;
    loop {
        let n = reader
            .read(&mut chunk)
            .await
            .map_err(|e| channel.read_error(e))?;
        if n == 0 {
            break;
        }
        total += n as u64;
        task::block_in_place(|| locked(&writer, |w| w.write_all(&chunk[..n])))
            .map_err(RunnerError::OutputWrite)?;
    }
    Ok(total)
}

const SPAWN_ATTEMPTS: u32 = 5;
const SPAWN_BACKOFF_START: Duration = Duration::from_millis(2);
const SPAWN_BACKOFF_CAP: Duration = Duration::from_millis(50);

// ETXTBSY: the program file was just written and is still open for writing
// somewhere else. Transient, so worth a short retry loop.
fn text_file_busy(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::ExecutableFileBusy) || err.raw_os_error() == Some(26)
}

fn spawn_with_retry(
    command: &mut Command,
    program: &Path,
) -> Result<tokio::process::Child, RunnerError> {
    let mut backoff = SPAWN_BACKOFF_START;
    let mut last_busy = None;
    for _ in 0..SPAWN_ATTEMPTS {
        match command.spawn() {
            Ok(child) => return Ok(child),
            Err(source) if text_file_busy(&source) => {
                std::thread::sleep(backoff);
                backoff = std::cmp::min(backoff * 2, SPAWN_BACKOFF_CAP);
                last_busy = Some(source);
            }
            Err(source) => {
                return Err(RunnerError::Spawn {
                    program: program.to_path_buf(),
                    source,
                })
            }
        }
    }

    Err(RunnerError::Spawn {
        program: program.to_path_buf(),
        source: last_busy.unwrap_or_else(|| io::Error::other("spawn retries exhausted")),
    })
}

/// Run one build's job process, mirroring its console output through the
/// registry-decorated writer chain.
///
/// The base writer is decorated exactly once, before the process spawns; all
/// stdout/stderr chunks are serialized through it and it is flushed after
/// the process exits. Must run on a multi-thread tokio runtime because
/// writer calls are bridged with `block_in_place`.
pub async fn run_job(
    spec: &JobSpec,
    registry: &WrapperRegistry,
    settings: &WrapperSettings,
    build: &BuildContext,
    base_writer: BoxWriter,
) -> Result<JobOutcome, RunnerError> {
    let decorated = registry.decorate_all(build, base_writer, settings)?;
    let writer: SharedWriter = Arc::new(Mutex::new(decorated));

    let mut command = Command::new(&spec.program);
    command.args(&spec.args);
    for (key, value) in &spec.env {
        command.env(key, value);
    }
    command.stdin(Stdio::null());
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    command.kill_on_drop(true);

    let mut child = spawn_with_retry(&mut command, &spec.program)?;
    let stdout = child.stdout.take().ok_or(RunnerError::MissingStdout)?;
    let stderr = child.stderr.take().ok_or(RunnerError::MissingStderr)?;

    debug!(build = %build, program = ?spec.program, "job spawned");

    let stdout_task = tokio::spawn(pump_stream(
        stdout,
        OutputChannel::Stdout,
        Arc::clone(&writer),
    ));
    let stderr_task = tokio::spawn(pump_stream(
        stderr,
        OutputChannel::Stderr,
        Arc::clone(&writer),
    ));

    let status = if let Some(dur) = spec.timeout {
        let waited = time::timeout(dur, child.wait()).await;
        match waited {
            Ok(result) => result.map_err(RunnerError::Wait)?,
            Err(_) => {
                if let Err(err) = child.start_kill() {
                    warn!(build = %build, error = %err, "failed to kill timed-out job");
                }
                // Reap the child so it does not linger as a zombie.
                let _ = child.wait().await;
                return Err(RunnerError::Timeout { timeout: dur });
            }
        }
    } else {
        child.wait().await.map_err(RunnerError::Wait)?
    };

    let stdout_bytes = stdout_task
        .await
        .map_err(|e| RunnerError::Join(e.to_string()))??;
    let stderr_bytes = stderr_task
        .await
        .map_err(|e| RunnerError::Join(e.to_string()))??;

    task::block_in_place(|| locked(&writer, |w| w.flush())).map_err(RunnerError::OutputWrite)?;

    debug!(build = %build, code = ?status.code(), "job finished");

    Ok(JobOutcome {
        status,
        stdout_bytes,
        stderr_bytes,
    })
}
