//! Integration tests for the mock DUT.

use std::time::Duration;

use dut_expect::mock::{
    EventTimeline, MockBuilder, MockDut, MockEvent, ir_nec_mock, nec_symbol_lines,
};
use dut_expect::{LineSource, ReadOutcome};
use tokio::time::Instant;

const WAIT: Duration = Duration::from_secs(1);

async fn drain(dut: &mut MockDut) -> Vec<String> {
    let mut lines = Vec::new();
    while let ReadOutcome::Line(line) = dut.read_line(WAIT).await.unwrap() {
        lines.push(line);
    }
    lines
}

#[tokio::test]
async fn builder_replays_in_order() {
    let mut dut = MockBuilder::new()
        .line("ESP-ROM:esp32s3-20210327")
        .lines(["rst:0x1 (POWERON)", "entry 0x403c9908"])
        .eof()
        .build();

    assert_eq!(
        drain(&mut dut).await,
        vec!["ESP-ROM:esp32s3-20210327", "rst:0x1 (POWERON)", "entry 0x403c9908"]
    );
    assert!(!dut.is_alive());
}

#[tokio::test(start_paused = true)]
async fn delays_advance_the_clock() {
    let mut dut = MockBuilder::new()
        .delay_ms(300)
        .line("late")
        .eof()
        .build();

    let start = Instant::now();
    assert_eq!(dut.read_line(WAIT).await.unwrap(), ReadOutcome::Line("late".into()));
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn short_reads_time_out_and_resume() {
    let mut dut = MockBuilder::new().delay_ms(500).line("frame").build();

    assert_eq!(dut.read_line(Duration::from_millis(200)).await.unwrap(), ReadOutcome::TimedOut);
    assert_eq!(dut.read_line(Duration::from_millis(200)).await.unwrap(), ReadOutcome::TimedOut);
    assert_eq!(
        dut.read_line(Duration::from_millis(200)).await.unwrap(),
        ReadOutcome::Line("frame".into())
    );
}

#[tokio::test]
async fn end_of_stream_is_sticky() {
    let mut dut = MockDut::from_lines(Vec::<String>::new());
    assert_eq!(dut.read_line(WAIT).await.unwrap(), ReadOutcome::EndOfStream);
    assert_eq!(dut.read_line(WAIT).await.unwrap(), ReadOutcome::EndOfStream);
}

#[tokio::test]
async fn timeline_can_be_built_incrementally() {
    let mut timeline = EventTimeline::new();
    timeline.push(MockEvent::line("I (289) main_task: Calling app_main()"));
    timeline.push(MockEvent::eof());

    let mut dut = MockDut::from(timeline);
    assert_eq!(drain(&mut dut).await.len(), 1);
    assert_eq!(dut.lines_delivered(), 1);
}

#[tokio::test]
async fn boot_log_carries_the_frame_dump() {
    let lines = drain(&mut ir_nec_mock()).await;
    let start = lines.iter().position(|l| l == "NEC frame start---").unwrap();
    let end = lines.iter().position(|l| l.starts_with("---NEC frame end")).unwrap();

    assert_eq!(&lines[start + 1..end], nec_symbol_lines(0xFE01, 0x748B).as_slice());
    assert_eq!(lines[end], "---NEC frame end: Address=FE01, Command=748B");
}
