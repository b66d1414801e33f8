//! Blocking wrapper for the async matcher.
//!
//! Test harnesses that are not async can use [`SyncMatcher`], which owns
//! a current-thread tokio runtime and blocks on each call.
//!
//! ```
//! use dut_expect::{Expectation, SyncMatcher};
//! use dut_expect::mock::MockBuilder;
//!
//! # fn main() -> dut_expect::Result<()> {
//! let matcher = SyncMatcher::new()?;
//! let mut dut = MockBuilder::new().line("I (330) IR_main: install IR NEC encoder").eof().build();
//! let results = matcher.expect_all(&mut dut, &[Expectation::literal("install IR NEC encoder")])?;
//! assert!(results[0].is_matched());
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use dut_lines::{LineReader, LineSource, MonitorConfig, MonitorProcess, ReaderConfig};
use tokio::io::AsyncRead;
use tokio::runtime::{Builder, Runtime};

use crate::config::MatcherConfig;
use crate::error::{ExpectError, Result};
use crate::expect::{Expectation, SequentialMatcher};
use crate::scenario::{Scenario, ScenarioReport, ScenarioRunner};
use crate::types::MatchResult;

fn runtime() -> Result<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ExpectError::io_context("creating tokio runtime", e))
}

/// A matcher that blocks the calling thread.
pub struct SyncMatcher {
    runtime: Runtime,
    matcher: SequentialMatcher,
}

impl SyncMatcher {
    /// Create a blocking matcher with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(MatcherConfig::default())
    }

    /// Create a blocking matcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created.
    pub fn with_config(config: MatcherConfig) -> Result<Self> {
        Ok(Self {
            runtime: runtime()?,
            matcher: SequentialMatcher::with_config(config),
        })
    }

    /// The matcher configuration.
    #[must_use]
    pub const fn config(&self) -> &MatcherConfig {
        self.matcher.config()
    }

    /// Match every expectation in order, blocking until done.
    ///
    /// # Errors
    ///
    /// See [`SequentialMatcher::expect_all`].
    pub fn expect_all<S: LineSource>(
        &self,
        stream: &mut S,
        expectations: &[Expectation],
    ) -> Result<Vec<MatchResult>> {
        self.runtime.block_on(self.matcher.expect_all(stream, expectations))
    }

    /// Match a single expectation, blocking until done.
    ///
    /// # Errors
    ///
    /// See [`SequentialMatcher::expect_one`].
    pub fn expect_one<S: LineSource>(
        &self,
        stream: &mut S,
        expectation: &Expectation,
    ) -> Result<MatchResult> {
        self.runtime.block_on(self.matcher.expect_one(stream, expectation))
    }

    /// Run a scenario, blocking until done.
    ///
    /// # Errors
    ///
    /// See [`ScenarioRunner::run`].
    pub fn run_scenario<S: LineSource>(
        &self,
        scenario: &Scenario,
        stream: &mut S,
    ) -> Result<ScenarioReport> {
        let runner = ScenarioRunner::with_config(*self.matcher.config());
        self.runtime.block_on(runner.run(scenario, stream))
    }

    /// Split `io` into lines on this matcher's runtime.
    ///
    /// The reader task only makes progress while this matcher is blocking.
    pub fn reader<R>(&self, io: R, config: ReaderConfig) -> LineReader
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let _guard = self.runtime.enter();
        LineReader::spawn(io, config)
    }

    /// Spawn a monitor process on this matcher's runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    pub fn monitor(&self, config: &MonitorConfig) -> Result<MonitorProcess> {
        let _guard = self.runtime.enter();
        Ok(MonitorProcess::spawn(config)?)
    }

    /// Run an async operation on this matcher's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

impl std::fmt::Debug for SyncMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncMatcher")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

/// Run a single future to completion on a fresh current-thread runtime.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn block_on<F: Future>(future: F) -> Result<F::Output> {
    Ok(runtime()?.block_on(future))
}
