// tests/metrics_props.rs

use proptest::prelude::*;
use qcoherence::Counts;
use qcoherence::therapy::{POETRY, RecommendedAction, StateInterpretation, analyze, interpret_state};

fn counts_strategy() -> impl Strategy<Value = Counts> {
    prop::collection::vec((any::<u8>(), 1usize..500), 1..40)
        .prop_map(|entries| entries.into_iter().map(|(outcome, n)| (format!("{:08b}", outcome), n)).collect())
}

proptest! {
    #[test]
    fn ratios_partition_the_shots(counts in counts_strategy()) {
        let m = analyze(&counts).unwrap();
        prop_assert!((m.groundedness + m.transcendence + m.dynamic_balance - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&m.groundedness));
        prop_assert!((0.0..=1.0).contains(&m.transcendence));
        prop_assert!(m.dynamic_balance > -1e-12 && m.dynamic_balance <= 1.0 + 1e-12);
    }

    #[test]
    fn coherence_never_exceeds_half(counts in counts_strategy()) {
        let m = analyze(&counts).unwrap();
        prop_assert!(m.coherence_score >= -1e-12);
        prop_assert!(m.coherence_score <= 0.5 + 1e-12);
        // The top poem needs coherence above 0.7, which is unreachable.
        prop_assert_ne!(m.therapeutic_poem.as_str(), POETRY[0]);
    }

    #[test]
    fn classification_is_deterministic(counts in counts_strategy()) {
        let first = analyze(&counts).unwrap();
        let second = analyze(&counts).unwrap();
        prop_assert_eq!(&first, &second);

        let (_, best) = counts.most_frequent().unwrap();
        prop_assert!(counts.iter().all(|(_, n)| n <= best));
        prop_assert_eq!(counts.get(&first.most_frequent), best);

        let expected_action = if first.transcendence > 0.3 {
            RecommendedAction::ContinueTrajectory
        } else if first.dynamic_balance > 0.6 {
            RecommendedAction::GoldenPhaseCorrection
        } else {
            RecommendedAction::EmergencyProtocol
        };
        prop_assert_eq!(first.recommended_action, expected_action);
    }

    #[test]
    fn matching_groups_read_as_integrated(group in 0u8..8, pair in 0u8..4) {
        let bits = format!("{:03b}{:03b}{:02b}", group, group, pair);
        prop_assert_eq!(interpret_state(&bits).unwrap(), StateInterpretation::IntegratedSelf);
    }
}
