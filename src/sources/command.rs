//! [`MetricSource`] backed by a short-lived child process.
//!
//! The program is run with a fixed argument vector, stdin closed and stdout
//! captured.  Every run has a deadline; a child that overstays it is killed
//! and reaped so a hung tool can never wedge the event loop.

use super::extract::Parser;
use crate::metric::{MetricError, MetricValue};
use crate::traits::MetricSource;
use log::debug;
use std::io::{ErrorKind, Read};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Default deadline for one invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(1000);

/// How often the child is polled while waiting for it to exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Runs `program args…` and parses its stdout.
#[derive(Debug, Clone)]
pub struct CommandMetric {
    program: String,
    args: Vec<String>,
    parser: Parser,
    timeout: Duration,
}

impl CommandMetric {
    pub fn new(program: impl Into<String>, args: Vec<String>, parser: Parser) -> Self {
        Self {
            program: program.into(),
            args,
            parser,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl MetricSource for CommandMetric {
    fn read(&mut self) -> Result<MetricValue, MetricError> {
        let stdout = run_with_timeout(&self.program, &self.args, self.timeout)?;
        self.parser.parse(&stdout)
    }

    fn describe(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Run a program to completion (or until `timeout`) and return its stdout.
pub fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<String, MetricError> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => MetricError::CommandNotFound {
                program: program.to_string(),
            },
            _ => MetricError::Io {
                target: program.to_string(),
                source: e,
            },
        })?;

    // Drain the pipes on helper threads so a chatty child cannot block on
    // a full pipe while we wait for it.
    let deadline = Instant::now() + timeout;
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match wait_deadline(&mut child, deadline) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            debug!("killed {} after {:?}", program, timeout);
            return Err(MetricError::Timeout {
                program: program.to_string(),
                timeout,
            });
        }
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(MetricError::Io {
                target: program.to_string(),
                source: e,
            });
        }
    };

    // A background grandchild may still hold the pipes open after the
    // direct child exits; the deadline covers reading them too.
    let stdout = collect(stdout, deadline, program, timeout)?;
    if !status.success() {
        let stderr = collect(stderr, deadline, program, timeout).unwrap_or_default();
        return Err(MetricError::CommandFailed {
            program: program.to_string(),
            status: status.to_string(),
            stderr: stderr.trim().to_string(),
        });
    }
    Ok(stdout)
}

/// Poll `child` until it exits or `deadline` passes (`Ok(None)`).
fn wait_deadline(
    child: &mut Child,
    deadline: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

type Drain = Option<mpsc::Receiver<std::io::Result<String>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Drain {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let text = pipe
                .read_to_end(&mut buf)
                .map(|_| String::from_utf8_lossy(&buf).into_owned());
            let _ = tx.send(text);
        });
        rx
    })
}

/// Wait for a drained pipe until `deadline`.
fn collect(
    drain: Drain,
    deadline: Instant,
    program: &str,
    timeout: Duration,
) -> Result<String, MetricError> {
    let Some(rx) = drain else {
        return Ok(String::new());
    };
    let left = deadline.saturating_duration_since(Instant::now());
    match rx.recv_timeout(left) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(MetricError::Io {
            target: program.to_string(),
            source: e,
        }),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            debug!("{} left its output open past {:?}", program, timeout);
            Err(MetricError::Timeout {
                program: program.to_string(),
                timeout,
            })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(MetricError::Io {
            target: program.to_string(),
            source: std::io::Error::new(ErrorKind::Other, "pipe reader panicked"),
        }),
    }
}
