//! The external lifecycle contract: every object type knows how to build an
//! argv command to set itself up (and, reserved for future use, to tear
//! itself down), and an [`Executor`] knows how to run that command while
//! capturing its output.

use std::fmt;
use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::SystemTime;

#[cfg(test)]
mod lifecycle_tests;

/// How many trailing stderr lines a failed run keeps for error reporting.
const STDERR_TAIL: usize = 20;

/// A single line of captured output, stamped with the time it was read.
#[derive(Clone, Debug)]
pub struct CapturedLine {
    pub timestamp: SystemTime,
    pub line: String,
}

/// The full output of one executor run.
#[derive(Clone, Debug, Default)]
pub struct ExecutorOutput {
    pub stdout: Vec<CapturedLine>,
    pub stderr: Vec<CapturedLine>,
}

/// Anything that can produce setup and teardown commands for itself.
///
/// `teardown` is part of the contract (mirroring the original object types)
/// but is never invoked by the scheduler; it is reserved for a future
/// extension.
pub trait Lifecycle {
    fn setup(&self) -> Executor;
    fn teardown(&self) -> Executor;
}

#[derive(Debug)]
pub enum ExecutorError {
    /// The command could not even be spawned (missing binary, permissions).
    Spawn(String),
    /// An I/O error occurred while reading one of the output streams.
    Io(String),
    /// The process ran and exited with a non-zero (or signal-terminated)
    /// status; `stderr_tail` holds its last few captured stderr lines.
    Exit {
        code: Option<i32>,
        stderr_tail: Vec<String>,
    },
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorError::Spawn(msg) => write!(f, "failed to start command: {msg}"),
            ExecutorError::Io(msg) => write!(f, "failed to read command output: {msg}"),
            ExecutorError::Exit { code, stderr_tail } => {
                match code {
                    Some(code) => write!(f, "command exited with status {code}")?,
                    None => write!(f, "command was terminated by a signal")?,
                }
                if !stderr_tail.is_empty() {
                    write!(f, ": {}", stderr_tail.join(" | "))?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ExecutorError {}

/// Runs one argv command, capturing stdout and stderr concurrently.
pub struct Executor {
    argv: Vec<String>,
}

impl Executor {
    pub fn new(argv: Vec<String>) -> Executor {
        Executor { argv }
    }

    /// Runs the command to completion. Spawns one reader thread per output
    /// stream so that neither stream's pipe buffer can back up and stall the
    /// child while the other is being drained.
    ///
    /// The combined error is the process's own exit error, if it failed;
    /// otherwise the first reader's I/O error, if any, in stdout-before-
    /// stderr order.
    pub fn run(&self) -> Result<ExecutorOutput, ExecutorError> {
        let mut command = Command::new(&self.argv[0]);
        command.args(&self.argv[1..]);
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        let mut child: Child = command
            .spawn()
            .map_err(|e| ExecutorError::Spawn(e.to_string()))?;
        log::debug!("spawned {:?} as pid {}", self.argv, child.id());

        let stdout = child.stdout.take().expect("stdout was piped");
        let stderr = child.stderr.take().expect("stderr was piped");

        let stdout_handle = thread::spawn(move || capture_lines(stdout));
        let stderr_handle = thread::spawn(move || capture_lines(stderr));

        let stdout_result = stdout_handle
            .join()
            .unwrap_or_else(|_| Err(ExecutorError::Io("stdout reader panicked".to_string())));
        let stderr_result = stderr_handle
            .join()
            .unwrap_or_else(|_| Err(ExecutorError::Io("stderr reader panicked".to_string())));

        let status = child
            .wait()
            .map_err(|e| ExecutorError::Io(e.to_string()))?;

        if !status.success() {
            let stderr_tail = stderr_result
                .as_ref()
                .map(|lines| {
                    lines
                        .iter()
                        .rev()
                        .take(STDERR_TAIL)
                        .rev()
                        .map(|l| l.line.clone())
                        .collect()
                })
                .unwrap_or_default();
            return Err(ExecutorError::Exit {
                code: status.code(),
                stderr_tail,
            });
        }

        let stdout = stdout_result?;
        let stderr = stderr_result?;
        Ok(ExecutorOutput { stdout, stderr })
    }
}

fn capture_lines<R: std::io::Read>(reader: R) -> Result<Vec<CapturedLine>, ExecutorError> {
    let mut lines = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line.map_err(|e| ExecutorError::Io(e.to_string()))?;
        lines.push(CapturedLine {
            timestamp: SystemTime::now(),
            line,
        });
    }
    Ok(lines)
}
