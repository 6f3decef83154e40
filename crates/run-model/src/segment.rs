//! Load segments: user-marked loading screens excluded from LRT.
//!
//! Segments are stored in creation order and never merged, deduplicated or
//! reordered. Overlaps between segments (or with the run range) are legal
//! and are resolved by the time calculator, not here.

use runtimer_common::clock::FrameClock;
use serde::{Deserialize, Serialize};

/// A closed frame interval marking a loading screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoadSegment {
    pub start_frame: u64,
    pub end_frame: u64,
}

impl LoadSegment {
    /// Build a segment from two endpoints in either order.
    pub fn new(a: u64, b: u64) -> Self {
        Self {
            start_frame: a.min(b),
            end_frame: a.max(b),
        }
    }

    /// Number of frames between the endpoints.
    pub fn len_frames(&self) -> u64 {
        self.end_frame - self.start_frame
    }

    /// Clamp both endpoints into `[0, total_frames)`.
    pub fn clamped(&self, total_frames: u64) -> Self {
        Self::new(
            FrameClock::clamp_frame(self.start_frame as i64, total_frames),
            FrameClock::clamp_frame(self.end_frame as i64, total_frames),
        )
    }
}

/// Whether a load segment is currently being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMarkingState {
    #[default]
    Idle,
    /// A mark was started at `start_frame` and awaits its other endpoint.
    Pending { start_frame: u64 },
}

impl LoadMarkingState {
    pub fn pending_start(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Pending { start_frame } => Some(*start_frame),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Result of [`LoadSegmentRegistry::toggle_mark`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// A new mark was opened at this frame.
    Started { frame: u64 },
    /// The pending mark was closed and this segment appended.
    Committed(LoadSegment),
}

/// Append-ordered collection of load segments plus the marking workflow.
///
/// Created together with the video properties on load and discarded with
/// them on the next load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSegmentRegistry {
    total_frames: u64,
    segments: Vec<LoadSegment>,
    marking: LoadMarkingState,
}

impl LoadSegmentRegistry {
    /// Empty registry for a video with `total_frames` frames.
    pub fn new(total_frames: u64) -> Self {
        Self {
            total_frames,
            segments: Vec::new(),
            marking: LoadMarkingState::Idle,
        }
    }

    /// Open a mark at `current_frame`, or close the pending one there.
    ///
    /// Closing reorders the endpoints so the stored segment always has
    /// `start_frame <= end_frame`.
    pub fn toggle_mark(&mut self, current_frame: u64) -> MarkOutcome {
        let frame = FrameClock::clamp_frame(current_frame as i64, self.total_frames);
        match self.marking {
            LoadMarkingState::Idle => {
                self.marking = LoadMarkingState::Pending { start_frame: frame };
                tracing::debug!(frame, "Load mark started");
                MarkOutcome::Started { frame }
            }
            LoadMarkingState::Pending { start_frame } => {
                let segment = LoadSegment::new(start_frame, frame);
                self.segments.push(segment);
                self.marking = LoadMarkingState::Idle;
                tracing::debug!(
                    start = segment.start_frame,
                    end = segment.end_frame,
                    count = self.segments.len(),
                    "Load segment committed"
                );
                MarkOutcome::Committed(segment)
            }
        }
    }

    /// Remove the most recently appended segment, if any.
    pub fn undo_last(&mut self) -> Option<LoadSegment> {
        self.segments.pop()
    }

    /// Abandon a pending mark without creating a segment.
    pub fn cancel_pending(&mut self) -> Option<u64> {
        let pending = self.marking.pending_start();
        self.marking = LoadMarkingState::Idle;
        pending
    }

    /// Restartable iterator over the segments in creation order.
    pub fn segments(&self) -> impl Iterator<Item = LoadSegment> + Clone + '_ {
        self.segments.iter().copied()
    }

    pub fn as_slice(&self) -> &[LoadSegment] {
        &self.segments
    }

    pub fn marking(&self) -> LoadMarkingState {
        self.marking
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_reorders_endpoints() {
        let mut registry = LoadSegmentRegistry::new(1000);
        assert_eq!(
            registry.toggle_mark(50),
            MarkOutcome::Started { frame: 50 }
        );
        assert_eq!(
            registry.marking(),
            LoadMarkingState::Pending { start_frame: 50 }
        );

        let outcome = registry.toggle_mark(30);
        assert_eq!(outcome, MarkOutcome::Committed(LoadSegment::new(30, 50)));
        assert_eq!(
            registry.as_slice(),
            &[LoadSegment {
                start_frame: 30,
                end_frame: 50
            }]
        );
        assert!(!registry.marking().is_pending());
    }

    #[test]
    fn test_toggle_clamps_to_video_length() {
        let mut registry = LoadSegmentRegistry::new(100);
        registry.toggle_mark(90);
        registry.toggle_mark(5000);
        assert_eq!(registry.as_slice(), &[LoadSegment::new(90, 99)]);
    }

    #[test]
    fn test_undo_removes_most_recent_only() {
        let mut registry = LoadSegmentRegistry::new(1000);
        for (a, b) in [(10, 20), (30, 40), (35, 45)] {
            registry.toggle_mark(a);
            registry.toggle_mark(b);
        }
        assert_eq!(registry.undo_last(), Some(LoadSegment::new(35, 45)));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.undo_last(), Some(LoadSegment::new(30, 40)));
        assert_eq!(registry.undo_last(), Some(LoadSegment::new(10, 20)));
        assert_eq!(registry.undo_last(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_overlapping_and_duplicate_segments_are_kept() {
        let mut registry = LoadSegmentRegistry::new(1000);
        for (a, b) in [(60, 120), (90, 150), (60, 120)] {
            registry.toggle_mark(a);
            registry.toggle_mark(b);
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_segments_iterator_is_restartable() {
        let mut registry = LoadSegmentRegistry::new(1000);
        registry.toggle_mark(1);
        registry.toggle_mark(2);
        registry.toggle_mark(3);
        registry.toggle_mark(7);

        let iter = registry.segments();
        let first: u64 = iter.clone().map(|s| s.len_frames()).sum();
        let second: u64 = iter.map(|s| s.len_frames()).sum();
        assert_eq!(first, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cancel_pending() {
        let mut registry = LoadSegmentRegistry::new(1000);
        registry.toggle_mark(12);
        assert_eq!(registry.cancel_pending(), Some(12));
        assert_eq!(registry.cancel_pending(), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clamped_segment() {
        let stale = LoadSegment::new(80, 400);
        assert_eq!(stale.clamped(100), LoadSegment::new(80, 99));
        assert_eq!(stale.clamped(0), LoadSegment::new(0, 0));
    }
}
