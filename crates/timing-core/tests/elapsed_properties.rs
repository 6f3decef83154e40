use proptest::prelude::*;

use runtimer_common::clock::FrameClock;
use runtimer_run_model::segment::LoadSegment;
use runtimer_run_model::snapshot::RunRange;
use runtimer_run_model::style::TimeFormat;
use runtimer_timing_core::elapsed::{compute_elapsed, TimeCalculator};
use runtimer_timing_core::format::format_time;

fn fps_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(23.976),
        Just(24.0),
        Just(29.97),
        Just(30.0),
        Just(59.94),
        Just(60.0),
        1.0f64..240.0,
    ]
}

fn range_strategy() -> impl Strategy<Value = RunRange> {
    (0u64..50_000, 0u64..50_000).prop_map(|(a, b)| RunRange::new(a.min(b), a.max(b)))
}

fn segments_strategy() -> impl Strategy<Value = Vec<LoadSegment>> {
    prop::collection::vec(
        (0u64..60_000, 0u64..60_000).prop_map(|(a, b)| LoadSegment::new(a, b)),
        0..8,
    )
}

proptest! {
    #[test]
    fn without_segments_rta_and_lrt_agree(
        fps in fps_strategy(),
        range in range_strategy(),
        offset in 0u64..50_000,
    ) {
        let clock = FrameClock::new(fps);
        let frame = range.start_frame + offset.min(range.len_frames());
        let elapsed = compute_elapsed(clock, frame, range, &[]);
        let expected = (frame - range.start_frame) as f64 / fps;
        prop_assert_eq!(elapsed.rta_secs, expected);
        prop_assert_eq!(elapsed.lrt_secs, expected);
    }

    #[test]
    fn frames_before_start_read_zero(
        fps in fps_strategy(),
        range in range_strategy(),
        segments in segments_strategy(),
        back in 1u64..1_000,
    ) {
        let clock = FrameClock::new(fps);
        let frame = range.start_frame.saturating_sub(back);
        let elapsed = compute_elapsed(clock, frame, range, &segments);
        prop_assert_eq!(elapsed.rta_secs, 0.0);
        prop_assert_eq!(elapsed.load_frames, 0);
    }

    #[test]
    fn frames_after_end_freeze(
        fps in fps_strategy(),
        range in range_strategy(),
        segments in segments_strategy(),
        beyond in 1u64..100_000,
    ) {
        let clock = FrameClock::new(fps);
        let at_end = compute_elapsed(clock, range.end_frame, range, &segments);
        let after = compute_elapsed(clock, range.end_frame + beyond, range, &segments);
        prop_assert_eq!(at_end, after);
    }

    #[test]
    fn repeated_evaluation_is_identical(
        fps in fps_strategy(),
        range in range_strategy(),
        segments in segments_strategy(),
        frame in 0u64..60_000,
    ) {
        let clock = FrameClock::new(fps);
        let calc = TimeCalculator::new(clock, 60_000, range, &segments);
        let first = calc.compute(frame);
        let second = calc.compute(frame);
        prop_assert_eq!(first.rta_secs.to_bits(), second.rta_secs.to_bits());
        prop_assert_eq!(first.lrt_secs.to_bits(), second.lrt_secs.to_bits());
        prop_assert_eq!(
            format_time(first.lrt_secs, TimeFormat::HoursMillis),
            format_time(second.lrt_secs, TimeFormat::HoursMillis)
        );
    }

    #[test]
    fn single_segment_lrt_never_decreases(
        range in range_strategy(),
        a in 0u64..60_000,
        b in 0u64..60_000,
        frame in 0u64..59_999,
    ) {
        let clock = FrameClock::new(30.0);
        let segments = [LoadSegment::new(a, b)];
        let now = compute_elapsed(clock, frame, range, &segments);
        let next = compute_elapsed(clock, frame + 1, range, &segments);
        prop_assert!(next.lrt_frames >= now.lrt_frames);
        prop_assert!(now.lrt_frames >= 0);
    }

    #[test]
    fn load_never_exceeds_rta_per_segment(
        range in range_strategy(),
        segments in segments_strategy(),
        frame in 0u64..60_000,
    ) {
        let clock = FrameClock::new(60.0);
        let elapsed = compute_elapsed(clock, frame, range, &segments);
        prop_assert!(elapsed.load_frames <= elapsed.rta_frames * segments.len() as u64);
    }
}

#[test]
fn documented_example_single_segment() {
    let clock = FrameClock::new(30.0);
    let segments = [LoadSegment::new(60, 120)];
    let elapsed = compute_elapsed(clock, 150, RunRange::new(0, 300), &segments);
    assert_eq!(elapsed.rta_secs, 5.0);
    assert_eq!(elapsed.load_frames, 60);
    assert_eq!(elapsed.lrt_secs, 3.0);
}

#[test]
fn documented_example_overlapping_segments() {
    let clock = FrameClock::new(30.0);
    let segments = [LoadSegment::new(60, 120), LoadSegment::new(90, 150)];
    let elapsed = compute_elapsed(clock, 200, RunRange::new(0, 300), &segments);
    assert_eq!(elapsed.load_frames, 120);
    assert_eq!(elapsed.lrt_frames, 80);
}
