//! Properties of the loaded video.

use runtimer_common::clock::FrameClock;

use crate::error::ModelError;

/// Frame rate assumed when the container reports neither a frame rate nor a
/// frame count.
pub const FALLBACK_FPS: f64 = 30.0;

/// Immutable description of the loaded video.
///
/// Created once per successful load and replaced wholesale on the next one.
/// Construction validates everything the frame clock relies on, so a
/// `VideoProperties` value always yields a usable [`FrameClock`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoProperties {
    width: u32,
    height: u32,
    fps: f64,
    duration_secs: f64,
}

impl VideoProperties {
    /// Validate and build video properties.
    pub fn new(width: u32, height: u32, fps: f64, duration_secs: f64) -> Result<Self, ModelError> {
        if width == 0 || height == 0 {
            return Err(ModelError::invalid_video(format!(
                "frame size must be non-zero, got {width}x{height}"
            )));
        }
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ModelError::invalid_video(format!(
                "frame rate could not be resolved (got {fps})"
            )));
        }
        if !duration_secs.is_finite() || duration_secs < 0.0 {
            return Err(ModelError::invalid_video(format!(
                "duration could not be resolved (got {duration_secs})"
            )));
        }
        Ok(Self {
            width,
            height,
            fps,
            duration_secs,
        })
    }

    /// Build properties from raw container metadata.
    ///
    /// The frame rate comes from the track when present, otherwise from
    /// `frame_count / duration`, otherwise [`FALLBACK_FPS`].
    pub fn resolve(
        width: u32,
        height: u32,
        duration_secs: f64,
        frame_rate: Option<f64>,
        frame_count: Option<u64>,
    ) -> Result<Self, ModelError> {
        let fps = match (frame_rate, frame_count) {
            (Some(rate), _) => rate,
            (None, Some(count)) if duration_secs > 0.0 => count as f64 / duration_secs,
            _ => FALLBACK_FPS,
        };
        Self::new(width, height, fps, duration_secs)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Frame clock at this video's frame rate.
    pub fn clock(&self) -> FrameClock {
        FrameClock::new(self.fps)
    }

    /// `floor(duration * fps)`.
    pub fn total_frames(&self) -> u64 {
        self.clock().total_frames(self.duration_secs)
    }

    /// Last addressable frame, or 0 for an empty video.
    pub fn last_frame(&self) -> u64 {
        self.total_frames().saturating_sub(1)
    }

    /// Clamp a signed frame index into `[0, total_frames)`.
    pub fn clamp_frame(&self, frame: i64) -> u64 {
        FrameClock::clamp_frame(frame, self.total_frames())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_frames() {
        let props = VideoProperties::new(1920, 1080, 30.0, 20.5).unwrap();
        assert_eq!(props.total_frames(), 615);
        assert_eq!(props.last_frame(), 614);
        assert_eq!(props.clamp_frame(10_000), 614);
        assert_eq!(props.clamp_frame(-1), 0);
    }

    #[test]
    fn test_rejects_unresolvable_metadata() {
        assert!(matches!(
            VideoProperties::new(1920, 1080, 0.0, 10.0),
            Err(ModelError::InvalidVideo { .. })
        ));
        assert!(VideoProperties::new(0, 1080, 30.0, 10.0).is_err());
        assert!(VideoProperties::new(1920, 1080, 30.0, f64::NAN).is_err());
        assert!(VideoProperties::new(1920, 1080, f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn test_resolve_prefers_track_frame_rate() {
        let props = VideoProperties::resolve(640, 480, 10.0, Some(60.0), Some(100)).unwrap();
        assert_eq!(props.fps(), 60.0);
    }

    #[test]
    fn test_resolve_derives_fps_from_frame_count() {
        let props = VideoProperties::resolve(640, 480, 10.0, None, Some(250)).unwrap();
        assert!((props.fps() - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_resolve_falls_back_to_default_fps() {
        let props = VideoProperties::resolve(640, 480, 0.0, None, Some(250)).unwrap();
        assert_eq!(props.fps(), FALLBACK_FPS);
        assert_eq!(props.total_frames(), 0);
        assert_eq!(props.last_frame(), 0);
    }
}
