//! Timer composition for a single frame.
//!
//! Preview and export both go through [`render_timer_layer`]: the timer is
//! always drawn onto a transparent layer first, and preview then composites
//! that layer onto the decoded video frame. A frame therefore gets the same
//! overlay pixels regardless of which pipeline asked for it.

use image::imageops::{self, FilterType};
use image::RgbaImage;
use runtimer_run_model::snapshot::SessionSnapshot;
use runtimer_run_model::style::{TimeFormat, TimerMode};
use runtimer_timing_core::elapsed::{Elapsed, TimeCalculator};
use runtimer_timing_core::format::format_time;

use crate::overlay::{render_overlay, OverlayLine};

/// Everything needed to draw the timer at one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerComposition {
    /// Requested frame index.
    pub frame: u64,
    pub elapsed: Elapsed,
    pub lines: Vec<OverlayLine>,
}

/// Text lines for a timer mode.
///
/// Single modes draw one unlabeled line; [`TimerMode::Both`] draws RTA then
/// LRT, each with its label.
pub fn timer_lines(mode: TimerMode, format: TimeFormat, elapsed: &Elapsed) -> Vec<OverlayLine> {
    let rta = format_time(elapsed.rta_secs, format);
    let lrt = format_time(elapsed.lrt_secs, format);
    match mode {
        TimerMode::Rta => vec![OverlayLine::plain(rta)],
        TimerMode::Lrt => vec![OverlayLine::plain(lrt)],
        TimerMode::Both => vec![
            OverlayLine::labeled("RTA: ", rta),
            OverlayLine::labeled("LRT: ", lrt),
        ],
    }
}

/// Compose the timer for `frame`, or `None` when the snapshot has no video.
pub fn compose_timer(snapshot: &SessionSnapshot, frame: u64) -> Option<TimerComposition> {
    let calculator = TimeCalculator::from_snapshot(snapshot)?;
    let elapsed = calculator.compute(frame);
    let style = &snapshot.style;
    Some(TimerComposition {
        frame,
        elapsed,
        lines: timer_lines(style.mode, style.format, &elapsed),
    })
}

/// Draw the timer for `frame` onto `surface`. Returns the composition drawn,
/// or `None` (leaving the surface untouched) when no video is loaded.
pub fn draw_timer(
    surface: &mut RgbaImage,
    snapshot: &SessionSnapshot,
    frame: u64,
) -> Option<TimerComposition> {
    let composition = compose_timer(snapshot, frame)?;
    render_overlay(surface, &snapshot.style, &composition.lines);
    Some(composition)
}

/// A fresh transparent `width` x `height` layer holding only the timer.
pub fn render_timer_layer(
    snapshot: &SessionSnapshot,
    frame: u64,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut layer = RgbaImage::new(width, height);
    draw_timer(&mut layer, snapshot, frame);
    layer
}

/// Composite the timer for `frame` over a decoded video frame in place.
///
/// The timer is laid out on the video's own dimensions, as export does. A
/// decoded frame of any other size is first scaled to those dimensions, the
/// way the encoder would scale it. Without a video the frame is untouched.
pub fn composite_timer(frame_image: &mut RgbaImage, snapshot: &SessionSnapshot, frame: u64) {
    let Some(video) = snapshot.video else {
        return;
    };
    let (width, height) = (video.width(), video.height());
    if frame_image.dimensions() != (width, height) {
        tracing::debug!(
            frame,
            decoded = ?frame_image.dimensions(),
            video = ?(width, height),
            "Scaling decoded frame to video size"
        );
        *frame_image = imageops::resize(&*frame_image, width, height, FilterType::Triangle);
    }
    let layer = render_timer_layer(snapshot, frame, width, height);
    imageops::overlay(frame_image, &layer, 0, 0);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::Rgba;
    use runtimer_run_model::segment::LoadSegment;
    use runtimer_run_model::snapshot::RunRange;
    use runtimer_run_model::style::TimerStyle;
    use runtimer_run_model::video::VideoProperties;

    use super::*;

    fn snapshot(mode: TimerMode) -> SessionSnapshot {
        SessionSnapshot {
            video: Some(VideoProperties::new(320, 180, 30.0, 20.0).unwrap()),
            range: RunRange::new(0, 599),
            segments: Arc::from(vec![LoadSegment::new(60, 120)]),
            style: Arc::new(TimerStyle {
                mode,
                point_size: 32.0,
                position_x: 0.5,
                position_y: 0.5,
                ..TimerStyle::default()
            }),
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn test_single_mode_lines_are_unlabeled() {
        let snap = snapshot(TimerMode::Lrt);
        let composition = compose_timer(&snap, 150).unwrap();
        assert_eq!(composition.lines, vec![OverlayLine::plain("0:03.000")]);

        let snap = snapshot(TimerMode::Rta);
        let composition = compose_timer(&snap, 150).unwrap();
        assert_eq!(composition.lines, vec![OverlayLine::plain("0:05.000")]);
    }

    #[test]
    fn test_both_mode_draws_rta_then_lrt() {
        let snap = snapshot(TimerMode::Both);
        let composition = compose_timer(&snap, 150).unwrap();
        let texts: Vec<String> = composition
            .lines
            .iter()
            .map(OverlayLine::display_text)
            .collect();
        assert_eq!(texts, vec!["RTA: 0:05.000", "LRT: 0:03.000"]);
    }

    #[test]
    fn test_negative_lrt_displays_as_zero() {
        let elapsed = Elapsed {
            lrt_frames: -30,
            lrt_secs: -1.0,
            ..Elapsed::ZERO
        };
        let lines = timer_lines(TimerMode::Lrt, TimeFormat::Minutes, &elapsed);
        assert_eq!(lines[0].text, "0:00");
    }

    #[test]
    fn test_no_video_draws_nothing() {
        let snap = SessionSnapshot::default();
        assert!(compose_timer(&snap, 10).is_none());
        let layer = render_timer_layer(&snap, 10, 64, 64);
        assert!(layer.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_composite_matches_layer_over_frame() {
        let snap = snapshot(TimerMode::Both);
        let background = RgbaImage::from_pixel(320, 180, Rgba([30, 60, 90, 255]));

        let mut preview = background.clone();
        composite_timer(&mut preview, &snap, 200);

        let mut expected = background;
        let layer = render_timer_layer(&snap, 200, 320, 180);
        imageops::overlay(&mut expected, &layer, 0, 0);

        assert_eq!(preview, expected);
        assert!(preview.pixels().any(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_composite_uses_video_size_for_mismatched_frame() {
        let snap = snapshot(TimerMode::Rta);
        let decoded = RgbaImage::from_pixel(640, 360, Rgba([30, 60, 90, 255]));

        let mut preview = decoded.clone();
        composite_timer(&mut preview, &snap, 150);

        let mut expected = imageops::resize(&decoded, 320, 180, FilterType::Triangle);
        imageops::overlay(&mut expected, &render_timer_layer(&snap, 150, 320, 180), 0, 0);

        assert_eq!(preview.dimensions(), (320, 180));
        assert_eq!(preview, expected);
    }

    #[test]
    fn test_composite_without_video_leaves_frame() {
        let decoded = RgbaImage::from_pixel(40, 20, Rgba([1, 2, 3, 255]));
        let mut frame = decoded.clone();
        composite_timer(&mut frame, &SessionSnapshot::default(), 0);
        assert_eq!(frame, decoded);
    }

    #[test]
    fn test_style_is_read_per_call() {
        let mut snap = snapshot(TimerMode::Rta);
        let white = render_timer_layer(&snap, 100, 320, 180);

        let mut style = (*snap.style).clone();
        style.fill_color = runtimer_run_model::style::Color::rgb(0, 255, 0);
        snap.style = Arc::new(style);
        let green = render_timer_layer(&snap, 100, 320, 180);

        assert_ne!(white, green);
        assert!(green.pixels().any(|p| p.0 == [0, 255, 0, 255]));
    }
}
