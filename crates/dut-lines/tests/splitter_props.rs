//! Property tests for line splitting.

use dut_lines::{LineSplitter, ReaderConfig};
use proptest::prelude::*;

fn split_whole(data: &[u8]) -> Vec<String> {
    let mut splitter = LineSplitter::new(&ReaderConfig::default());
    let mut lines = splitter.push(data);
    lines.extend(splitter.finish());
    lines
}

proptest! {
    #[test]
    fn chunking_does_not_change_lines(
        lines in prop::collection::vec("[ -~]{0,40}", 0..12),
        cut in 1usize..16,
    ) {
        let text = lines.join("\r\n");
        let data = text.as_bytes();

        let mut splitter = LineSplitter::new(&ReaderConfig::default());
        let mut chunked = Vec::new();
        for chunk in data.chunks(cut) {
            chunked.extend(splitter.push(chunk));
        }
        chunked.extend(splitter.finish());

        prop_assert_eq!(chunked, split_whole(data));
    }

    #[test]
    fn every_terminated_line_is_emitted(lines in prop::collection::vec("[ -~]{0,40}", 1..12)) {
        let mut text = lines.join("\n");
        text.push('\n');

        let mut splitter = LineSplitter::new(&ReaderConfig::default());
        let out = splitter.push(text.as_bytes());

        prop_assert_eq!(out, lines);
        prop_assert_eq!(splitter.pending_len(), 0);
    }
}

proptest! {
    #[test]
    fn overlong_unicode_lines_stay_valid(
        lines in prop::collection::vec("[a-z é€😀]{0,24}", 1..8),
        cut in 1usize..16,
    ) {
        let config = ReaderConfig::builder().max_line_len(8).build();
        let mut text = lines.join("\r\n");
        text.push_str("\r\n");
        let data = text.as_bytes();

        let mut whole = LineSplitter::new(&config);
        let mut expected = whole.push(data);
        expected.extend(whole.finish());

        let mut splitter = LineSplitter::new(&config);
        let mut chunked = Vec::new();
        for chunk in data.chunks(cut) {
            chunked.extend(splitter.push(chunk));
        }
        chunked.extend(splitter.finish());

        prop_assert_eq!(&chunked, &expected);
        prop_assert!(chunked.iter().all(|l| l.len() <= 8 && !l.contains('\u{fffd}')), "line exceeds max length or contains U+FFFD");
        prop_assert_eq!(chunked.concat(), lines.concat());
    }
}
