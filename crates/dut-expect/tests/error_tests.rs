//! Tests for error types and failure messages.

use std::io;
use std::time::Duration;

use dut_expect::dut_lines::LineError;
use dut_expect::mock::MockDut;
use dut_expect::{
    ExpectError, Expectation, ExpectationTimeout, MatchResult, TimeoutCause, expect_all,
};

fn failure(observed: usize) -> ExpectationTimeout {
    ExpectationTimeout {
        index: 6,
        pattern: "NEC frame start---".into(),
        name: Some("frame".into()),
        timeout: Duration::from_secs(30),
        elapsed: Duration::from_secs(30),
        cause: TimeoutCause::Deadline,
        dut_alive: true,
        observed: (0..observed).map(|i| format!("{{0:560}},{{1:{i}}}")).collect(),
    }
}

#[test]
fn message_names_expectation_and_cause() {
    let msg = failure(2).to_string();
    assert!(msg.contains("expectation #6 frame ('NEC frame start---') not matched"));
    assert!(msg.contains("deadline elapsed"));
    assert!(msg.contains("observed (2 lines)"));
    assert!(msg.contains("{0:560},{1:1}"));
    assert!(msg.contains("Tip: The DUT is still running"));
}

#[test]
fn long_diagnostics_are_truncated_in_message_only() {
    let err = failure(40);
    let msg = err.to_string();
    assert!(msg.contains("observed (40 lines)"));
    assert!(msg.contains("(28 lines hidden)"));
    assert!(msg.contains("{0:560},{1:39}"));
    assert!(!msg.contains("{0:560},{1:0}\n"));
    assert_eq!(err.observed.len(), 40);
}

#[test]
fn empty_diagnostics_say_so() {
    assert!(failure(0).to_string().contains("(no lines observed)"));
}

#[test]
fn boxed_timeout_round_trips() {
    let err: ExpectError = failure(1).into();
    assert!(err.is_timeout());
    assert_eq!(err.observed().map(<[String]>::len), Some(1));
    assert_eq!(err.into_timeout().unwrap(), failure(1));
}

#[test]
fn timed_out_result() {
    let result = failure(0).to_match_result();
    assert_eq!(
        result,
        MatchResult::TimedOut {
            index: 6,
            pattern: "NEC frame start---".into(),
            elapsed: Duration::from_secs(30),
        }
    );
    assert!(!result.is_matched());
}

#[test]
fn other_errors_are_not_timeouts() {
    let err = ExpectError::from(LineError::Io(io::Error::other("unplugged")));
    assert!(err.is_stream());
    assert!(err.as_timeout().is_none());
    assert!(err.to_string().starts_with("DUT stream error"));

    let source = io::Error::from(io::ErrorKind::NotFound);
    let err = ExpectError::io_context("opening log file boot.log", source);
    assert!(err.to_string().contains("opening log file boot.log"));
    assert!(ExpectError::NoExpectations.into_timeout().is_err());
}

#[tokio::test]
async fn end_of_stream_message() {
    let mut dut = MockDut::from_lines(["I (400) main_task: Returned from app_main()"]);
    let err = expect_all(&mut dut, &[Expectation::literal("NEC frame start---")])
        .await
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("DUT output ended"));
    assert!(msg.contains("Returned from app_main()"));
    assert!(msg.contains("did not reset or crash"));
}
