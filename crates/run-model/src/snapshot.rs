//! Immutable point-in-time copies of editor state.
//!
//! The editor session mutates its own state and publishes a fresh
//! [`SessionSnapshot`] after every change. Preview and export always render
//! from a captured snapshot, so a mutation landing mid-render can never tear
//! the style, range and segments apart.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::segment::{LoadMarkingState, LoadSegment};
use crate::style::TimerStyle;
use crate::video::VideoProperties;

/// The timed part of the video, as two frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunRange {
    pub start_frame: u64,
    pub end_frame: u64,
}

impl RunRange {
    pub fn new(start_frame: u64, end_frame: u64) -> Self {
        Self {
            start_frame,
            end_frame,
        }
    }

    /// True when the range cannot produce any elapsed time: start after end
    /// or no frames in the video.
    pub fn is_degenerate(&self, total_frames: u64) -> bool {
        total_frames == 0 || self.start_frame > self.end_frame
    }

    /// Frame count between start and end (0 for a reversed range).
    pub fn len_frames(&self) -> u64 {
        self.end_frame.saturating_sub(self.start_frame)
    }
}

/// Consistent copy of everything a render needs, plus UI status.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Incremented on every published change.
    pub revision: u64,

    /// `None` until a video has been loaded successfully.
    pub video: Option<VideoProperties>,

    pub current_frame: u64,
    pub range: RunRange,
    pub segments: Arc<[LoadSegment]>,
    pub marking: LoadMarkingState,
    pub style: Arc<TimerStyle>,

    /// Human-readable status line.
    pub status: String,

    /// Last export progress report, 0-100. Display only.
    pub export_progress: u8,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            video: None,
            current_frame: 0,
            range: RunRange::default(),
            segments: Arc::from(Vec::new()),
            marking: LoadMarkingState::Idle,
            style: Arc::new(TimerStyle::default()),
            status: "Select a video to begin.".to_string(),
            export_progress: 0,
        }
    }
}

impl SessionSnapshot {
    /// Total frames of the loaded video, 0 when none is loaded.
    pub fn total_frames(&self) -> u64 {
        self.video.map(|v| v.total_frames()).unwrap_or(0)
    }

    pub fn has_video(&self) -> bool {
        self.video.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_ranges() {
        assert!(RunRange::new(10, 5).is_degenerate(100));
        assert!(RunRange::new(0, 5).is_degenerate(0));
        assert!(!RunRange::new(5, 5).is_degenerate(100));
        assert_eq!(RunRange::new(10, 5).len_frames(), 0);
        assert_eq!(RunRange::new(5, 25).len_frames(), 20);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = SessionSnapshot::default();
        assert!(!snapshot.has_video());
        assert_eq!(snapshot.total_frames(), 0);
        assert!(snapshot.segments.is_empty());
    }
}
