//! Elevated writes to root-owned backing files
//!
//! The tray never runs as root. Writes go through `pkexec tee <path>`, which
//! shows the desktop's polkit authentication prompt when needed.
use crate::error::WriteFailure;
use crossbeam::channel;
use std::io::{Read, Write};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const POLL_STEP: Duration = Duration::from_millis(20);
/// How long to wait for stderr after the child exited
const STDERR_GRACE: Duration = Duration::from_millis(500);

/// Capability to write a string to a path with elevated privileges
pub trait ElevatedWriter: Send + Sync {
    /// Write `content` exactly to `path`, giving up after `timeout`
    fn elevated_write(&self, path: &Path, content: &str, timeout: Duration) -> Result<(), WriteFailure>;
}

/// Runs `<program> <args..> <path>` with `content` on stdin
pub struct PkexecWriter {
    program: String,
    args: Vec<String>,
}

impl Default for PkexecWriter {
    fn default() -> Self {
        Self {
            program: "pkexec".to_string(),
            args: vec!["tee".to_string()],
        }
    }
}

impl PkexecWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the helper command. The target path is appended as the last argument.
    pub fn with_program(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn spawn(&self, path: &Path) -> std::io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
    }
}

impl ElevatedWriter for PkexecWriter {
    fn elevated_write(&self, path: &Path, content: &str, timeout: Duration) -> Result<(), WriteFailure> {
        let invocation = |e: std::io::Error| WriteFailure::Invocation {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        tracing::debug!("Running {} {:?} {:?}", self.program, self.args, path);
        let mut child = self.spawn(path).map_err(invocation)?;

        // stdin is dropped at the end of this block so tee sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(content.as_bytes()) {
                Ok(()) => {}
                // Helper exited before reading; its exit status says why
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("Helper closed stdin early: {}", e);
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(invocation(e));
                }
            }
        }

        let (stderr_tx, stderr_rx) = channel::bounded::<String>(1);
        if let Some(mut stderr) = child.stderr.take() {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = stderr.read_to_string(&mut text);
                let _ = stderr_tx.send(text);
            });
        }

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    tracing::warn!("Elevated write to {:?} timed out, killing helper", path);
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WriteFailure::Timeout {
                        path: path.to_path_buf(),
                        after: timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_STEP),
                Err(e) => {
                    let _ = child.kill();
                    return Err(invocation(e));
                }
            }
        };

        if status.success() {
            return Ok(());
        }

        let stderr = stderr_rx
            .recv_timeout(STDERR_GRACE)
            .unwrap_or_default()
            .trim()
            .to_string();
        Err(WriteFailure::NonZeroExit {
            path: path.to_path_buf(),
            code: status.code(),
            stderr,
        })
    }
}
