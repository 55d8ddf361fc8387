//! Runs a shell job with the job-log tee wrapper installed.
//!
//! The job's console output goes to stdout as usual, while the tee mirrors
//! each chunk into the tracing subscriber (stderr) prefixed with `demo#1:`.
//!
//! ```sh
//! cargo run -p runner --example tee_job
//! ```

use runner::{run_job, JobSpec};
use tracing_subscriber::EnvFilter;
use wrapper_api::{BuildContext, WrapperRegistry, WrapperSettings};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", job_log::LOG_TARGET))),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut registry = WrapperRegistry::new();
    job_log::register(&mut registry)?;

    let build = BuildContext::new("demo", 1);
    let spec = JobSpec::new("/bin/sh")
        .arg("-c")
        .arg("echo compiling; echo '   '; echo done");

    let outcome = run_job(
        &spec,
        &registry,
        &WrapperSettings::new(),
        &build,
        Box::new(std::io::stdout()),
    )
    .await?;

    println!("exit: {}", outcome.status);
    Ok(())
}
