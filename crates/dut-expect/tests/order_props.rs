//! Property tests for ordered matching.

use dut_expect::mock::MockDut;
use dut_expect::{Expectation, expect_all};
use proptest::prelude::*;

fn run<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

/// Distinct milestone lines plus noise that never contains a milestone.
fn stream_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    (1usize..8).prop_flat_map(|n| {
        let milestones: Vec<String> = (0..n).map(|i| format!("IR_main: step {i} done")).collect();
        let noise = prop::collection::vec(prop::collection::vec("[a-z ]{0,16}", 0..4), n + 1);
        (Just(milestones), noise)
    })
}

fn literals(milestones: &[String]) -> Vec<Expectation> {
    milestones.iter().map(|m| Expectation::literal(m.as_str())).collect()
}

fn interleave(milestones: &[String], noise: &[Vec<String>]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, gap) in noise.iter().enumerate() {
        lines.extend(gap.iter().cloned());
        if let Some(m) = milestones.get(i) {
            lines.push(format!("I ({}) {m}", i * 10));
        }
    }
    lines
}

proptest! {
    #[test]
    fn milestones_in_order_always_match((milestones, noise) in stream_strategy()) {
        let lines = interleave(&milestones, &noise);
        let expectations = literals(&milestones);

        let results = run(expect_all(&mut MockDut::from_lines(lines), &expectations)).unwrap();
        prop_assert_eq!(results.len(), milestones.len());
        for (i, r) in results.iter().enumerate() {
            prop_assert_eq!(r.index(), i);
            prop_assert!(r.line().unwrap().ends_with(&milestones[i]));
        }
    }

    #[test]
    fn missing_milestone_fails_at_its_index(
        (milestones, noise) in stream_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let missing = pick.index(milestones.len());
        let mut present = milestones.clone();
        present[missing] = "IR_main: something else".to_string();
        let lines = interleave(&present, &noise);
        let expectations = literals(&milestones);

        let mut dut = MockDut::from_lines(lines.clone());
        let err = run(expect_all(&mut dut, &expectations)).unwrap_err();
        let timeout = err.as_timeout().unwrap();
        prop_assert_eq!(timeout.index, missing);

        // Same input, same failure.
        let again = run(expect_all(&mut MockDut::from_lines(lines), &expectations)).unwrap_err();
        prop_assert_eq!(again.as_timeout().map(|t| &t.observed), Some(&timeout.observed));
    }

    #[test]
    fn reversed_pair_fails_at_second(noise in prop::collection::vec("[a-z ]{0,16}", 0..6)) {
        let mut lines = noise;
        lines.push("A appears".to_string());
        lines.push("B appears".to_string());

        let err = run(expect_all(
            &mut MockDut::from_lines(lines),
            &[Expectation::literal("B appears"), Expectation::literal("A appears")],
        ))
        .unwrap_err();
        prop_assert_eq!(err.as_timeout().unwrap().index, 1);
    }
}
