//! dut-lines: Async line capture for device-under-test output
//!
//! This crate turns the raw text stream of an embedded device (a serial
//! port, a monitor command, any `AsyncRead`) into a sequence of lines that
//! can be awaited with a timeout.
//!
//! # Sources
//!
//! - [`LineReader`]: background task over any `tokio::io::AsyncRead`
//! - [`MonitorProcess`]: a spawned command such as `idf.py monitor`
//!
//! Both implement [`LineSource`], the single capability the matcher in
//! `dut-expect` relies on.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use dut_lines::{LineSource, MonitorConfig, MonitorProcess, ReadOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MonitorConfig::builder("idf.py")
//!         .args(["-p", "/dev/ttyUSB0", "monitor"])
//!         .build();
//!     let mut monitor = MonitorProcess::spawn(&config)?;
//!
//!     while let ReadOutcome::Line(line) = monitor.read_line(Duration::from_secs(5)).await? {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod ansi;
pub mod config;
pub mod error;
pub mod process;
pub mod reader;
pub mod splitter;
pub mod traits;

// Re-export primary types
pub use ansi::strip_ansi;
pub use config::{MonitorConfig, MonitorConfigBuilder, ReaderConfig, ReaderConfigBuilder};
pub use error::{LineError, Result};
pub use process::MonitorProcess;
pub use reader::LineReader;
pub use splitter::LineSplitter;
pub use traits::{LineSource, ReadOutcome};
