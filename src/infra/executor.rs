//! Child process execution with full output capture
//!
//! Commands are spawned with both output streams piped. Each stream is
//! drained by its own task while the child runs, so a child that fills
//! one pipe can never deadlock against a reader blocked on the other.
//! Both drains run to end-of-stream before the exit status is collected,
//! which guarantees that output written just before exit is captured.
//!
//! A non-zero exit is a normal result here. Only failures of the
//! machinery itself, such as spawn or pipe errors, surface as `Err`.

use std::ffi::OsStr;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::task::JoinHandle;

use crate::error::ExecutorError;

const READ_CHUNK: usize = 16 * 1024;

/// Captured outcome of one finished child process
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Normalized exit code, `128 + signal` for signal deaths
    pub exit_code: i32,
    /// Complete standard output, one trailing newline per line
    pub stdout: String,
    /// Complete standard error, one trailing newline per line
    pub stderr: String,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `program` with `args` and capture everything it prints.
///
/// With `echo_live` set, raw output chunks are additionally mirrored to
/// this process's console as they arrive. Echo failures stop the
/// mirroring but never the capture.
// TODO: wire a per-command timeout through RunContext; yum can hang
// indefinitely on a dead mirror.
pub async fn execute<S: AsRef<OsStr>>(
    program: &str,
    args: &[S],
    echo_live: bool,
) -> Result<ExecutionResult, ExecutorError> {
    tracing::info!(command = %render_command(program, args), "executing");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|error| ExecutorError::Spawn {
            program: program.to_string(),
            error: error.to_string(),
        })?;

    let stdout_pipe = child.stdout.take().ok_or(ExecutorError::Pipe {
        program: program.to_string(),
        stream: "stdout",
    })?;
    let stderr_pipe = child.stderr.take().ok_or(ExecutorError::Pipe {
        program: program.to_string(),
        stream: "stderr",
    })?;

    let stdout_task = pump(stdout_pipe, echo_live.then(tokio::io::stdout), "stdout");
    let stderr_task = pump(stderr_pipe, echo_live.then(tokio::io::stderr), "stderr");

    let stdout = stdout_task.await.map_err(|error| ExecutorError::StreamTask {
        stream: "stdout",
        error: error.to_string(),
    })??;
    let stderr = stderr_task.await.map_err(|error| ExecutorError::StreamTask {
        stream: "stderr",
        error: error.to_string(),
    })??;

    let status = child.wait().await.map_err(|error| ExecutorError::Wait {
        program: program.to_string(),
        error: error.to_string(),
    })?;

    Ok(ExecutionResult {
        exit_code: normalize_exit(status),
        stdout,
        stderr,
    })
}

/// Drain one stream to end-of-file on its own task.
///
/// Lines are split on `\n`, decoded lossily, stripped of a trailing `\r`
/// and stored with a single `\n` terminator. A final line without a
/// newline is flushed with one added.
fn pump<R, W>(
    mut reader: R,
    mut echo: Option<W>,
    stream: &'static str,
) -> JoinHandle<Result<String, ExecutorError>>
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut captured = String::new();
        let mut pending: Vec<u8> = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            let n = reader
                .read(&mut chunk)
                .await
                .map_err(|error| ExecutorError::StreamIo {
                    stream,
                    error: error.to_string(),
                })?;
            if n == 0 {
                break;
            }
            let bytes = &chunk[..n];

            if let Some(mut writer) = echo.take() {
                let mirrored = async {
                    writer.write_all(bytes).await?;
                    writer.flush().await
                }
                .await;
                match mirrored {
                    Ok(()) => echo = Some(writer),
                    Err(error) => {
                        tracing::debug!(stream, %error, "console echo stopped, capture continues");
                    }
                }
            }

            pending.extend_from_slice(bytes);
            while let Some(pos) = pending.iter().position(|&b| b == b'\n') {
                let mut line: Vec<u8> = pending.drain(..=pos).collect();
                line.pop();
                push_line(&mut captured, &mut line);
            }
        }

        if !pending.is_empty() {
            push_line(&mut captured, &mut pending);
        }

        Ok(captured)
    })
}

fn push_line(captured: &mut String, line: &mut Vec<u8>) {
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    captured.push_str(&String::from_utf8_lossy(line));
    captured.push('\n');
}

fn render_command<S: AsRef<OsStr>>(program: &str, args: &[S]) -> String {
    let mut rendered = String::from(program);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&arg.as_ref().to_string_lossy());
    }
    rendered
}

#[cfg(unix)]
fn normalize_exit(status: std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|signal| 128 + signal))
        .unwrap_or(1)
}

#[cfg(not(unix))]
fn normalize_exit(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}
