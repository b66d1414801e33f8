//! Monitor process line source.
//!
//! Bench setups usually reach the DUT through a helper command that prints
//! the serial log (`idf.py monitor`, `picocom`, `cat /dev/ttyUSB0`).
//! [`MonitorProcess`] spawns such a command and exposes its stdout, and
//! optionally stderr, as a [`LineSource`].

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::config::MonitorConfig;
use crate::error::{LineError, Result};
use crate::reader::{LineReader, pump};
use crate::traits::{LineSource, ReadOutcome};

/// A spawned monitor command whose output is read line by line.
///
/// The child is killed when this value is dropped.
///
/// The monitor counts as alive while the child runs, or while lines it
/// printed before exiting are still queued. A grandchild that inherited
/// stdout does not keep an exited monitor alive.
#[derive(Debug)]
pub struct MonitorProcess {
    child: Child,
    reader: LineReader,
    program: String,
    exit_status: Option<ExitStatus>,
}

impl MonitorProcess {
    /// Spawn the monitor described by `config`.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`LineError::Spawn`] if the program cannot be started.
    pub fn spawn(config: &MonitorConfig) -> Result<Self> {
        let program = config.display_program();

        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .envs(&config.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(if config.merge_stderr {
                Stdio::piped()
            } else {
                Stdio::inherit()
            })
            .kill_on_drop(true);
        if let Some(dir) = &config.working_directory {
            command.current_dir(dir);
        }

        let mut child = command
            .spawn()
            .map_err(|source| LineError::spawn(program.clone(), source))?;

        let stdout = child.stdout.take().ok_or(LineError::MissingPipe("stdout"))?;
        let (tx, rx) = mpsc::channel(config.reader.channel_capacity.max(1));

        let mut tasks = Vec::with_capacity(2);
        if config.merge_stderr {
            let stderr = child.stderr.take().ok_or(LineError::MissingPipe("stderr"))?;
            tasks.push(tokio::spawn(pump(
                stderr,
                config.reader.clone(),
                tx.clone(),
                "stderr",
            )));
        }
        tasks.push(tokio::spawn(pump(stdout, config.reader.clone(), tx, "stdout")));

        tracing::info!(program = %program, pid = ?child.id(), "spawned monitor process");

        Ok(Self {
            child,
            reader: LineReader::from_parts(rx, tasks),
            program,
            exit_status: None,
        })
    }

    /// OS process id, if the child has not been reaped yet.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// The program name this monitor was started from.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Exit status of the child, once it has been observed to exit.
    #[must_use]
    pub const fn exit_status(&self) -> Option<ExitStatus> {
        self.exit_status
    }

    /// Record the child's exit without blocking.
    fn poll_exit(&mut self) {
        if self.exit_status.is_some() {
            return;
        }
        match self.child.try_wait() {
            Ok(Some(status)) => {
                tracing::debug!(program = %self.program, %status, "monitor process exited");
                self.exit_status = Some(status);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(
                    program = %self.program,
                    error = %err,
                    "failed to poll monitor process"
                );
            }
        }
    }

    /// Kill the monitor and stop reading its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the kill signal cannot be delivered.
    pub async fn kill(&mut self) -> Result<()> {
        self.reader.close();
        match self.child.kill().await {
            Ok(()) => {
                tracing::debug!(program = %self.program, "monitor process killed");
                Ok(())
            }
            // Already exited.
            Err(err) if err.kind() == std::io::ErrorKind::InvalidInput => Ok(()),
            Err(err) => Err(LineError::Io(err)),
        }
    }

    /// Wait for the monitor to exit.
    ///
    /// # Errors
    ///
    /// Returns an error if waiting on the child fails.
    pub async fn wait(&mut self) -> Result<ExitStatus> {
        let status = self.child.wait().await?;
        self.exit_status = Some(status);
        Ok(status)
    }
}

impl LineSource for MonitorProcess {
    async fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome> {
        let outcome = self.reader.read_line(timeout).await;
        self.poll_exit();
        outcome
    }

    fn is_alive(&self) -> bool {
        self.reader.is_alive() && (self.exit_status.is_none() || self.reader.has_queued())
    }
}
