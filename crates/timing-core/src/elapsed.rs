//! RTA / LRT elapsed time for a frame.
//!
//! The evaluation frame is clamped to the run range first: frames before the
//! start read zero, frames after the end freeze at the end value. Load time
//! is the per-segment overlap with `[start, effective]`, summed with no
//! deduplication, so two overlapping marks count their shared frames twice.

use runtimer_common::clock::FrameClock;
use runtimer_run_model::segment::LoadSegment;
use runtimer_run_model::snapshot::{RunRange, SessionSnapshot};

/// Elapsed time at one frame.
///
/// `lrt_frames` keeps its true sign: over-marked load makes it negative.
/// Clamping to zero happens only when the value is formatted for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elapsed {
    /// The frame actually evaluated after clamping into the run range.
    pub effective_frame: u64,
    pub rta_frames: u64,
    pub load_frames: u64,
    pub lrt_frames: i64,
    pub rta_secs: f64,
    pub lrt_secs: f64,
}

impl Elapsed {
    pub const ZERO: Elapsed = Elapsed {
        effective_frame: 0,
        rta_frames: 0,
        load_frames: 0,
        lrt_frames: 0,
        rta_secs: 0.0,
        lrt_secs: 0.0,
    };
}

/// Frames of `segment` that fall inside `[range_start, effective_frame]`.
pub fn overlap_frames(range_start: u64, effective_frame: u64, segment: &LoadSegment) -> u64 {
    let hi = effective_frame.min(segment.end_frame) as i64;
    let lo = range_start.max(segment.start_frame) as i64;
    (hi - lo).max(0) as u64
}

/// Elapsed RTA and LRT at `frame` for the given range and segments.
///
/// A reversed range (start after end) yields [`Elapsed::ZERO`] instead of an
/// error so the UI stays responsive while a new video is loading.
pub fn compute_elapsed(
    clock: FrameClock,
    frame: u64,
    range: RunRange,
    segments: &[LoadSegment],
) -> Elapsed {
    evaluate(clock, frame, range, segments.iter().copied())
}

fn evaluate(
    clock: FrameClock,
    frame: u64,
    range: RunRange,
    segments: impl Iterator<Item = LoadSegment>,
) -> Elapsed {
    if range.start_frame > range.end_frame {
        return Elapsed {
            effective_frame: range.start_frame,
            ..Elapsed::ZERO
        };
    }

    let effective_frame = frame.clamp(range.start_frame, range.end_frame);
    let rta_frames = effective_frame - range.start_frame;
    let load_frames: u64 = segments
        .map(|segment| overlap_frames(range.start_frame, effective_frame, &segment))
        .sum();
    let lrt_frames = rta_frames as i64 - load_frames as i64;

    Elapsed {
        effective_frame,
        rta_frames,
        load_frames,
        lrt_frames,
        rta_secs: clock.frame_to_secs(rta_frames),
        lrt_secs: clock.frames_to_secs_signed(lrt_frames),
    }
}

/// Elapsed-time evaluation bound to one consistent set of inputs.
///
/// Built from a snapshot (or explicit parts) and then queried for any number
/// of frames. Range and segment endpoints are clamped into the video length
/// on every query, since segments marked against a previous video may be
/// stale.
#[derive(Debug, Clone, Copy)]
pub struct TimeCalculator<'a> {
    clock: FrameClock,
    total_frames: u64,
    range: RunRange,
    segments: &'a [LoadSegment],
}

impl<'a> TimeCalculator<'a> {
    pub fn new(
        clock: FrameClock,
        total_frames: u64,
        range: RunRange,
        segments: &'a [LoadSegment],
    ) -> Self {
        Self {
            clock,
            total_frames,
            range,
            segments,
        }
    }

    /// Calculator for a snapshot, or `None` when no video is loaded.
    pub fn from_snapshot(snapshot: &'a SessionSnapshot) -> Option<Self> {
        let video = snapshot.video?;
        Some(Self::new(
            video.clock(),
            video.total_frames(),
            snapshot.range,
            &snapshot.segments,
        ))
    }

    pub fn clock(&self) -> FrameClock {
        self.clock
    }

    /// The run range clamped into the video.
    pub fn clamped_range(&self) -> RunRange {
        RunRange::new(
            FrameClock::clamp_frame(self.range.start_frame as i64, self.total_frames),
            FrameClock::clamp_frame(self.range.end_frame as i64, self.total_frames),
        )
    }

    /// Whether every frame will evaluate to zero.
    pub fn is_degenerate(&self) -> bool {
        self.clamped_range().is_degenerate(self.total_frames)
    }

    /// Elapsed time at `frame`.
    pub fn compute(&self, frame: u64) -> Elapsed {
        if self.is_degenerate() {
            return Elapsed::ZERO;
        }
        let total = self.total_frames;
        evaluate(
            self.clock,
            frame,
            self.clamped_range(),
            self.segments.iter().map(|s| s.clamped(total)),
        )
    }

    /// Elapsed time at an export presentation timestamp.
    pub fn compute_at_secs(&self, presentation_secs: f64) -> Elapsed {
        self.compute(self.clock.secs_to_frame(presentation_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FrameClock {
        FrameClock::new(30.0)
    }

    #[test]
    fn test_no_segments_rta_equals_lrt() {
        let elapsed = compute_elapsed(clock(), 90, RunRange::new(30, 300), &[]);
        assert_eq!(elapsed.rta_frames, 60);
        assert_eq!(elapsed.lrt_frames, 60);
        assert!((elapsed.rta_secs - 2.0).abs() < 1e-12);
        assert_eq!(elapsed.rta_secs, elapsed.lrt_secs);
    }

    #[test]
    fn test_before_start_is_zero() {
        let elapsed = compute_elapsed(clock(), 10, RunRange::new(30, 300), &[]);
        assert_eq!(elapsed.effective_frame, 30);
        assert_eq!(elapsed.rta_secs, 0.0);
        assert_eq!(elapsed.lrt_secs, 0.0);
    }

    #[test]
    fn test_after_end_freezes() {
        let range = RunRange::new(0, 300);
        let at_end = compute_elapsed(clock(), 300, range, &[]);
        let past_end = compute_elapsed(clock(), 9_000, range, &[]);
        assert_eq!(at_end, past_end);
        assert!((past_end.rta_secs - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_segment_overlap() {
        let segments = [LoadSegment::new(60, 120)];
        let elapsed = compute_elapsed(clock(), 150, RunRange::new(0, 300), &segments);
        assert!((elapsed.rta_secs - 5.0).abs() < 1e-12);
        assert_eq!(elapsed.load_frames, 60);
        assert!((elapsed.lrt_secs - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap_while_inside_segment() {
        let segments = [LoadSegment::new(60, 120)];
        let elapsed = compute_elapsed(clock(), 90, RunRange::new(0, 300), &segments);
        assert_eq!(elapsed.load_frames, 30);
        assert_eq!(elapsed.lrt_frames, 60);
    }

    #[test]
    fn test_overlapping_segments_double_count() {
        let segments = [LoadSegment::new(60, 120), LoadSegment::new(90, 150)];
        let elapsed = compute_elapsed(clock(), 200, RunRange::new(0, 300), &segments);
        assert_eq!(elapsed.load_frames, 120);
        assert_eq!(elapsed.lrt_frames, 80);
    }

    #[test]
    fn test_segment_before_start_is_ignored() {
        let segments = [LoadSegment::new(0, 50), LoadSegment::new(80, 120)];
        let elapsed = compute_elapsed(clock(), 200, RunRange::new(100, 300), &segments);
        assert_eq!(elapsed.load_frames, 20);
    }

    #[test]
    fn test_over_marked_load_keeps_negative_lrt() {
        let segments = [LoadSegment::new(0, 100), LoadSegment::new(0, 100)];
        let elapsed = compute_elapsed(clock(), 100, RunRange::new(0, 300), &segments);
        assert_eq!(elapsed.lrt_frames, -100);
        assert!(elapsed.lrt_secs < 0.0);
    }

    #[test]
    fn test_reversed_range_is_zero() {
        let elapsed = compute_elapsed(clock(), 150, RunRange::new(200, 100), &[]);
        assert_eq!(elapsed.rta_frames, 0);
        assert_eq!(elapsed.lrt_secs, 0.0);
    }

    #[test]
    fn test_calculator_clamps_stale_state() {
        // Range and segment marked against a longer video.
        let segments = [LoadSegment::new(250, 900)];
        let calc = TimeCalculator::new(clock(), 300, RunRange::new(0, 1_000), &segments);
        assert_eq!(calc.clamped_range(), RunRange::new(0, 299));

        let elapsed = calc.compute(5_000);
        assert_eq!(elapsed.effective_frame, 299);
        assert_eq!(elapsed.rta_frames, 299);
        assert_eq!(elapsed.load_frames, 49);
    }

    #[test]
    fn test_calculator_empty_video_is_degenerate() {
        let calc = TimeCalculator::new(clock(), 0, RunRange::new(0, 0), &[]);
        assert!(calc.is_degenerate());
        assert_eq!(calc.compute(10), Elapsed::ZERO);
    }

    #[test]
    fn test_compute_at_secs_rounds_to_nearest_frame() {
        let calc = TimeCalculator::new(clock(), 600, RunRange::new(0, 599), &[]);
        assert_eq!(calc.compute_at_secs(1.0).rta_frames, 30);
        assert_eq!(calc.compute_at_secs(1.0 + 0.4 / 30.0).rta_frames, 30);
        assert_eq!(calc.compute_at_secs(1.0 + 0.6 / 30.0).rta_frames, 31);
    }

    #[test]
    fn test_from_snapshot_requires_video() {
        let snapshot = SessionSnapshot::default();
        assert!(TimeCalculator::from_snapshot(&snapshot).is_none());
    }
}
