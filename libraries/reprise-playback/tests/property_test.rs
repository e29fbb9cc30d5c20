//! Property-based tests for relative seek clamping

use proptest::prelude::*;
use reprise_playback::clamp_seek_target;

proptest! {
    /// Property: the target always lies within the track
    #[test]
    fn target_is_within_bounds(
        current in -1_000_000i64..10_000_000,
        delta in -10_000_000i64..10_000_000,
        duration in 0i64..10_000_000,
    ) {
        let target = clamp_seek_target(current, delta, duration);
        prop_assert!(target >= 0);
        prop_assert!(target <= duration);
    }

    /// Property: in-range moves are exact
    #[test]
    fn in_range_moves_are_exact(
        duration in 1i64..10_000_000,
        current_pct in 0u8..=100,
        target_pct in 0u8..=100,
    ) {
        let current = duration * i64::from(current_pct) / 100;
        let wanted = duration * i64::from(target_pct) / 100;
        prop_assert_eq!(clamp_seek_target(current, wanted - current, duration), wanted);
    }

    /// Property: a negative duration clamps everything to zero
    #[test]
    fn negative_duration_pins_to_start(
        current in any::<i64>(),
        delta in any::<i64>(),
        duration in i64::MIN..0,
    ) {
        prop_assert_eq!(clamp_seek_target(current, delta, duration), 0);
    }

    /// Property: larger deltas never move the target backwards
    #[test]
    fn clamping_is_monotonic(
        current in 0i64..1_000_000,
        delta in -1_000_000i64..1_000_000,
        extra in 0i64..1_000_000,
        duration in 0i64..1_000_000,
    ) {
        prop_assert!(
            clamp_seek_target(current, delta + extra, duration)
                >= clamp_seek_target(current, delta, duration)
        );
    }
}
