//! Background line reader over any async byte stream.
//!
//! A [`LineReader`] owns one producer task that reads the stream, splits it
//! into lines and hands them to the consumer through a bounded channel. The
//! consumer side implements [`LineSource`], so a matcher can wait on it with
//! a deadline while the task keeps draining the device.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ReaderConfig;
use crate::error::{LineError, Result};
use crate::splitter::LineSplitter;
use crate::traits::{LineSource, ReadOutcome};

/// Item passed from the producer task to the consumer.
pub(crate) type LineItem = io::Result<String>;

/// A [`LineSource`] fed by background reader tasks.
#[derive(Debug)]
pub struct LineReader {
    rx: mpsc::Receiver<LineItem>,
    tasks: Vec<JoinHandle<()>>,
    /// Set once end-of-stream or a read error has been handed out.
    finished: bool,
    lines_read: u64,
}

impl LineReader {
    /// Spawn a reader task over `reader`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<R>(reader: R, config: ReaderConfig) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let (tx, rx) = mpsc::channel(config.channel_capacity.max(1));
        let task = tokio::spawn(pump(reader, config, tx, "stream"));
        Self::from_parts(rx, vec![task])
    }

    /// Spawn a reader task with the default configuration.
    pub fn spawn_default<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self::spawn(reader, ReaderConfig::default())
    }

    pub(crate) const fn from_parts(
        rx: mpsc::Receiver<LineItem>,
        tasks: Vec<JoinHandle<()>>,
    ) -> Self {
        Self {
            rx,
            tasks,
            finished: false,
            lines_read: 0,
        }
    }

    /// Number of lines handed to the consumer so far.
    #[must_use]
    pub const fn lines_read(&self) -> u64 {
        self.lines_read
    }

    /// Whether lines are queued and not yet read.
    pub(crate) fn has_queued(&self) -> bool {
        !self.finished && !self.rx.is_empty()
    }

    /// Stop the producer tasks. Lines already queued are discarded.
    pub fn close(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
        self.rx.close();
        self.finished = true;
    }

    async fn next(&mut self, timeout: Duration) -> Result<ReadOutcome> {
        if self.finished {
            return Ok(ReadOutcome::EndOfStream);
        }

        match tokio::time::timeout(timeout, self.rx.recv()).await {
            Err(_) => Ok(ReadOutcome::TimedOut),
            Ok(None) => {
                self.finished = true;
                Ok(ReadOutcome::EndOfStream)
            }
            Ok(Some(Ok(line))) => {
                self.lines_read += 1;
                tracing::trace!(line = %line, "line received");
                Ok(ReadOutcome::Line(line))
            }
            Ok(Some(Err(err))) => {
                self.finished = true;
                Err(LineError::Io(err))
            }
        }
    }
}

impl LineSource for LineReader {
    async fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome> {
        self.next(timeout).await
    }

    fn is_alive(&self) -> bool {
        !self.finished && !(self.rx.is_closed() && self.rx.is_empty())
    }
}

impl Drop for LineReader {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Read `reader` to completion, sending each complete line to `tx`.
///
/// A trailing unterminated line is flushed at end of input. A read error is
/// forwarded and ends the task. The task also ends when the consumer is gone.
pub(crate) async fn pump<R>(
    mut reader: R,
    config: ReaderConfig,
    tx: mpsc::Sender<LineItem>,
    label: &'static str,
)
where
    R: AsyncRead + Unpin,
{
    let mut splitter = LineSplitter::new(&config);
    let mut buf = vec![0u8; config.read_chunk.max(1)];

    loop {
        match reader.read(&mut buf).await {
            Ok(0) => {
                if let Some(line) = splitter.finish() {
                    let _ = tx.send(Ok(line)).await;
                }
                tracing::debug!(source = label, "DUT output reached end of stream");
                return;
            }
            Ok(n) => {
                for line in splitter.push(&buf[..n]) {
                    if tx.send(Ok(line)).await.is_err() {
                        tracing::trace!(source = label, "line consumer dropped");
                        return;
                    }
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => {
                tracing::warn!(source = label, error = %err, "reading DUT output failed");
                let _ = tx.send(Err(err)).await;
                return;
            }
        }
    }
}
