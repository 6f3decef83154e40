//! Frame clock: the single time coordinate of the editor.
//!
//! Frame indices are primary; seconds are always derived from them through
//! the frame rate of the currently loaded video. Every component that needs
//! to move between the two goes through [`FrameClock`] so preview and export
//! agree on the same rounding.

/// Pure conversions between frame indices and seconds at a fixed frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Create a clock for the given frame rate.
    ///
    /// # Panics
    ///
    /// Panics if `fps` is not a finite positive number. Untrusted metadata
    /// must be validated before it reaches the clock.
    pub fn new(fps: f64) -> Self {
        assert!(
            fps.is_finite() && fps > 0.0,
            "frame rate must be finite and positive, got {fps}"
        );
        Self { fps }
    }

    /// Frames per second.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// `frame / fps`.
    pub fn frame_to_secs(&self, frame: u64) -> f64 {
        frame as f64 / self.fps
    }

    /// Signed frame counts (LRT may go negative) to seconds.
    pub fn frames_to_secs_signed(&self, frames: i64) -> f64 {
        frames as f64 / self.fps
    }

    /// `round(secs * fps)`, saturating at zero for negative times.
    pub fn secs_to_frame(&self, secs: f64) -> u64 {
        let frame = (secs * self.fps).round();
        if frame.is_nan() || frame <= 0.0 {
            0
        } else {
            frame as u64
        }
    }

    /// `floor(duration * fps)`.
    pub fn total_frames(&self, duration_secs: f64) -> u64 {
        let frames = (duration_secs * self.fps).floor();
        if frames.is_nan() || frames <= 0.0 {
            0
        } else {
            frames as u64
        }
    }

    /// Clamp a (possibly out of range) frame into `[0, total_frames)`.
    ///
    /// Returns 0 when there are no frames at all.
    pub fn clamp_frame(frame: i64, total_frames: u64) -> u64 {
        if total_frames == 0 || frame <= 0 {
            return 0;
        }
        (frame as u64).min(total_frames - 1)
    }
}
