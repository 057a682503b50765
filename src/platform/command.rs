// External helper programs run with a hard deadline

use std::ffi::OsStr;
use std::io;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;

/// Run `program` with `args` and collect its output, giving up after `timeout`.
///
/// The child is killed when the deadline passes. An expired deadline is
/// reported as `io::ErrorKind::TimedOut`.
pub async fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> io::Result<Output> {
    run_with_env(program, args, &[], timeout).await
}

/// [`run_with_timeout`] with extra environment variables for the child.
pub async fn run_with_env(
    program: &str,
    args: &[&str],
    envs: &[(&str, &OsStr)],
    timeout: Duration,
) -> io::Result<Output> {
    let child = Command::new(program)
        .args(args)
        .envs(envs.iter().copied())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(output) => output,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            format!("{} did not finish within {:?}", program, timeout),
        )),
    }
}

/// Like [`run_with_timeout`], but a non-zero exit status is an error and
/// stdout is returned as text.
pub async fn run_for_stdout(program: &str, args: &[&str], timeout: Duration) -> io::Result<String> {
    let output = run_with_timeout(program, args, timeout).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(io::Error::other(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
