//! Export overlay hook and progress reporting.
//!
//! The transcoding pipeline itself lives outside this crate. It pulls one
//! overlay surface per output frame through [`OverlaySource::overlay_at`] and
//! composites it into the encoded stream.

use std::fmt::Display;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use image::RgbaImage;
use runtimer_common::clock::FrameClock;
use runtimer_common::error::{RuntimerError, RuntimerResult};
use runtimer_run_model::snapshot::SessionSnapshot;
use runtimer_run_model::video::VideoProperties;

use crate::compositor::render_timer_layer;

/// Per-frame overlay provider consumed by an export pipeline.
///
/// Implementations must be callable from any thread, any number of times,
/// and must never mutate editor state.
pub trait OverlaySource: Send + Sync {
    /// A freshly allocated overlay surface for the output frame presented at
    /// `presentation_secs`.
    fn overlay_at(&self, presentation_secs: f64) -> RgbaImage;
}

impl<F> OverlaySource for F
where
    F: Fn(f64) -> RgbaImage + Send + Sync,
{
    fn overlay_at(&self, presentation_secs: f64) -> RgbaImage {
        self(presentation_secs)
    }
}

/// Timer overlay bound to the session state captured when the export began.
///
/// Edits made in the editor while an export runs do not reach the export.
#[derive(Debug, Clone)]
pub struct ExportOverlayAdapter {
    snapshot: Arc<SessionSnapshot>,
    video: VideoProperties,
}

impl ExportOverlayAdapter {
    /// Bind to `snapshot`. Fails if no video is loaded.
    pub fn new(snapshot: Arc<SessionSnapshot>) -> RuntimerResult<Self> {
        let video = snapshot
            .video
            .ok_or_else(|| RuntimerError::invalid_video("no video loaded"))?;
        Ok(Self { snapshot, video })
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn video(&self) -> VideoProperties {
        self.video
    }

    /// Source frame index shown at `presentation_secs` (nearest frame).
    pub fn frame_at(&self, presentation_secs: f64) -> u64 {
        self.video.clock().secs_to_frame(presentation_secs)
    }
}

impl OverlaySource for ExportOverlayAdapter {
    fn overlay_at(&self, presentation_secs: f64) -> RgbaImage {
        render_timer_layer(
            &self.snapshot,
            self.frame_at(presentation_secs),
            self.video.width(),
            self.video.height(),
        )
    }
}

/// Progress callback for export rendering.
pub type ProgressCallback = Box<dyn Fn(ExportProgress) + Send + Sync>;

/// Export progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// Completion in `[0, 100]`.
    pub percent: u8,
    pub stage: ExportStage,
}

/// Stages of the export process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Preparing,
    Rendering,
    Finalizing,
    Complete,
    Failed,
}

impl ExportProgress {
    pub fn new(percent: u8, stage: ExportStage) -> Self {
        Self {
            percent: percent.min(100),
            stage,
        }
    }

    /// Status line shown to the user.
    pub fn status_text(&self) -> String {
        match self.stage {
            ExportStage::Preparing => "Preparing render...".to_string(),
            ExportStage::Rendering => format!("Rendering... {}%", self.percent),
            ExportStage::Finalizing => "Saving render...".to_string(),
            ExportStage::Complete => "Render Complete!".to_string(),
            ExportStage::Failed => "Render failed.".to_string(),
        }
    }
}

/// Pull overlays for every output frame of a `duration_secs` long export at
/// `frame_rate` and hand each to `sink` with its output index and
/// presentation time.
///
/// Returns the number of frames produced. Progress is reported once per
/// whole percent.
pub fn render_overlay_sequence<S, F>(
    source: &S,
    frame_rate: f64,
    duration_secs: f64,
    mut sink: F,
    progress: Option<&ProgressCallback>,
) -> RuntimerResult<u64>
where
    S: OverlaySource + ?Sized,
    F: FnMut(u64, f64, RgbaImage) -> RuntimerResult<()>,
{
    if !frame_rate.is_finite() || frame_rate <= 0.0 {
        return Err(RuntimerError::render(format!(
            "output frame rate must be positive, got {frame_rate}"
        )));
    }
    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(RuntimerError::render(format!(
            "output duration must be non-negative, got {duration_secs}"
        )));
    }

    let report = |percent: u8, stage: ExportStage| {
        if let Some(cb) = progress {
            cb(ExportProgress::new(percent, stage));
        }
    };

    let clock = FrameClock::new(frame_rate);
    let total = clock.total_frames(duration_secs);
    tracing::info!(frame_rate, duration_secs, total, "Starting overlay export");
    report(0, ExportStage::Preparing);

    let mut last_percent = None;
    for index in 0..total {
        let presentation_secs = clock.frame_to_secs(index);
        let overlay = source.overlay_at(presentation_secs);
        if let Err(e) = sink(index, presentation_secs, overlay) {
            tracing::warn!(index, error = %e, "Overlay export failed");
            report(last_percent.unwrap_or(0), ExportStage::Failed);
            return Err(e);
        }

        let percent = ((index + 1) * 100 / total) as u8;
        if last_percent != Some(percent) {
            last_percent = Some(percent);
            report(percent, ExportStage::Rendering);
        }
    }

    report(100, ExportStage::Finalizing);
    report(100, ExportStage::Complete);
    tracing::info!(frames = total, "Overlay export complete");
    Ok(total)
}

/// Timestamped output name, e.g. `render_20240309_140507.mp4`.
pub fn default_output_name<Tz>(at: &DateTime<Tz>, extension: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("render_{}.{extension}", at.format("%Y%m%d_%H%M%S"))
}
