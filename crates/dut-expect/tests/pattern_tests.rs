//! Tests for pattern construction and matching.

use dut_expect::{Pattern, PatternKind};

#[test]
fn literal_is_substring() {
    let pattern = Pattern::literal("IR_main: install IR NEC encoder");
    assert!(pattern.is_match("I (336) IR_main: install IR NEC encoder"));
    assert!(!pattern.is_match("I (336) IR_main: install IR RC5 encoder"));
}

#[test]
fn literal_treats_regex_chars_as_text() {
    let pattern = Pattern::literal("{0:9000},{1:4500}");
    assert!(pattern.is_match("{0:9000},{1:4500}"));
    assert!(Pattern::literal("NEC frame start---").is_match("NEC frame start---"));
}

#[test]
fn regex_captures() {
    let pattern = Pattern::regex(r"Address=([0-9A-F]{4}), Command=([0-9A-F]{4})").unwrap();
    let m = pattern.matches("---NEC frame end: Address=FE01, Command=748B").unwrap();
    assert_eq!(m.captures, vec![Some("FE01".to_string()), Some("748B".to_string())]);
}

#[test]
fn optional_group_does_not_shift_later_groups() {
    let pattern = Pattern::regex(r"(E \(\d+\) )?IR_main: (.+)").unwrap();
    let m = pattern.matches("I (312) IR_main: create RMT RX channel").unwrap();
    assert_eq!(m.capture(0), None);
    assert_eq!(m.capture(1), Some("create RMT RX channel"));
}

#[test]
fn regex_rejects_bad_syntax() {
    assert!(Pattern::regex("(unclosed").is_err());
}

#[test]
fn glob_wildcards() {
    let pattern = Pattern::glob("I (*) IR_main: create RMT ?X channel").unwrap();
    assert!(pattern.is_match("I (312) IR_main: create RMT RX channel"));
    assert!(pattern.is_match("I (325) IR_main: create RMT TX channel"));
    assert!(!pattern.is_match("I (325) IR_main: create RMT channel"));
    // Regex metacharacters in a glob are literal.
    let dot = Pattern::glob("Command=748B.").unwrap();
    assert!(dot.is_match("Command=748B."));
    assert!(!dot.is_match("Command=748BX"));
}

#[test]
fn from_kind_dispatches() {
    for kind in [PatternKind::Literal, PatternKind::Regex, PatternKind::Glob] {
        assert_eq!(Pattern::from_kind(kind, "a*b").unwrap().kind(), kind);
    }
    assert!(Pattern::from_kind(PatternKind::Regex, "[").is_err());
}

#[test]
fn equality_uses_kind_and_text() {
    assert_eq!(Pattern::from("NEC"), Pattern::literal("NEC"));
    assert_ne!(Pattern::literal("NEC"), Pattern::glob("NEC").unwrap());
    assert_eq!(Pattern::regex("a+").unwrap(), Pattern::regex("a+").unwrap());
}

#[test]
fn display_is_source_text() {
    assert_eq!(Pattern::glob("I (*)").unwrap().to_string(), "I (*)");
    assert_eq!(PatternKind::Regex.to_string(), "regex");
}
