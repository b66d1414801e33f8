//! Configuration types for line readers and monitor processes.
//!
//! This module provides [`ReaderConfig`] for tuning how raw DUT output is
//! split into lines and [`MonitorConfig`] for spawning an external monitor
//! command whose stdout carries the device log.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// Default number of lines buffered between the reader task and the consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Default size of a single read from the underlying stream (4 KiB).
pub const DEFAULT_READ_CHUNK: usize = 4 * 1024;

/// Default maximum line length in bytes (64 KiB).
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Configuration for turning a byte stream into lines.
///
/// # Example
///
/// ```
/// use dut_lines::ReaderConfig;
///
/// let config = ReaderConfig::builder()
///     .channel_capacity(256)
///     .strip_ansi(false)
///     .build();
///
/// assert_eq!(config.channel_capacity, 256);
/// assert!(!config.strip_ansi);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Number of complete lines the background task may queue ahead of the consumer.
    pub channel_capacity: usize,

    /// Size of each read from the underlying stream.
    pub read_chunk: usize,

    /// Lines longer than this many bytes are emitted in chunks of this size.
    pub max_line_len: usize,

    /// Whether ANSI escape sequences are removed from each line.
    pub strip_ansi: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            read_chunk: DEFAULT_READ_CHUNK,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            strip_ansi: true,
        }
    }
}

impl ReaderConfig {
    /// Create a new builder for `ReaderConfig`.
    #[must_use]
    pub fn builder() -> ReaderConfigBuilder {
        ReaderConfigBuilder::new()
    }

    /// Create a new `ReaderConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builder for [`ReaderConfig`].
#[derive(Debug, Clone, Default)]
pub struct ReaderConfigBuilder {
    config: ReaderConfig,
}

impl ReaderConfigBuilder {
    /// Create a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line channel capacity. Zero is raised to one.
    #[must_use]
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.config.channel_capacity = capacity.max(1);
        self
    }

    /// Set the read chunk size. Zero is raised to one.
    #[must_use]
    pub fn read_chunk(mut self, size: usize) -> Self {
        self.config.read_chunk = size.max(1);
        self
    }

    /// Set the maximum line length in bytes. Zero is raised to one.
    #[must_use]
    pub fn max_line_len(mut self, len: usize) -> Self {
        self.config.max_line_len = len.max(1);
        self
    }

    /// Set whether ANSI escape sequences are stripped.
    #[must_use]
    pub const fn strip_ansi(mut self, value: bool) -> Self {
        self.config.strip_ansi = value;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> ReaderConfig {
        self.config
    }
}

/// Configuration for spawning a monitor process.
///
/// The monitor is whatever command prints the device log on its stdout,
/// for example `idf.py -p /dev/ttyUSB0 monitor` or `cat /dev/ttyACM0`.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Program to execute.
    pub program: OsString,

    /// Arguments passed to the program.
    pub args: Vec<OsString>,

    /// Working directory for the process.
    pub working_directory: Option<PathBuf>,

    /// Additional environment variables (merged with the inherited environment).
    pub env: HashMap<OsString, OsString>,

    /// Whether stderr lines are merged into the same line stream.
    pub merge_stderr: bool,

    /// How the process output is split into lines.
    pub reader: ReaderConfig,
}

impl MonitorConfig {
    /// Create a configuration for the given program.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_directory: None,
            env: HashMap::new(),
            merge_stderr: false,
            reader: ReaderConfig::default(),
        }
    }

    /// Create a builder for the given program.
    #[must_use]
    pub fn builder(program: impl Into<OsString>) -> MonitorConfigBuilder {
        MonitorConfigBuilder {
            config: Self::new(program),
        }
    }

    /// The program name as displayed in logs and errors.
    #[must_use]
    pub fn display_program(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Builder for [`MonitorConfig`].
#[derive(Debug, Clone)]
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
}

impl MonitorConfigBuilder {
    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.config.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.config.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory for the process.
    #[must_use]
    pub fn working_directory(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.working_directory = Some(path.into());
        self
    }

    /// Add an environment variable.
    #[must_use]
    pub fn env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.config.env.insert(key.into(), value.into());
        self
    }

    /// Merge stderr into the line stream.
    #[must_use]
    pub const fn merge_stderr(mut self, value: bool) -> Self {
        self.config.merge_stderr = value;
        self
    }

    /// Set the reader configuration.
    #[must_use]
    pub fn reader(mut self, reader: ReaderConfig) -> Self {
        self.config.reader = reader;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> MonitorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_config_defaults() {
        let config = ReaderConfig::default();
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert_eq!(config.max_line_len, DEFAULT_MAX_LINE_LEN);
        assert!(config.strip_ansi);
    }

    #[test]
    fn reader_builder_clamps_zero() {
        let config = ReaderConfig::builder()
            .channel_capacity(0)
            .read_chunk(0)
            .max_line_len(0)
            .build();
        assert_eq!(config.channel_capacity, 1);
        assert_eq!(config.read_chunk, 1);
        assert_eq!(config.max_line_len, 1);
    }

    #[test]
    fn monitor_builder() {
        let config = MonitorConfig::builder("idf.py")
            .args(["-p", "/dev/ttyUSB0"])
            .arg("monitor")
            .working_directory("/tmp")
            .env("IDF_PATH", "/opt/esp-idf")
            .merge_stderr(true)
            .build();

        assert_eq!(config.display_program(), "idf.py");
        assert_eq!(config.args.len(), 3);
        assert_eq!(config.working_directory, Some(PathBuf::from("/tmp")));
        assert!(config.env.contains_key(&OsString::from("IDF_PATH")));
        assert!(config.merge_stderr);
    }
}
