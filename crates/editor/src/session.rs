//! The editing session: sole owner of mutable editor state.
//!
//! Every mutator finishes by publishing a fresh [`SessionSnapshot`]. Readers
//! (preview workers, export adapters, the UI) hold `Arc`s to snapshots and
//! never see the live fields, so no render can observe a half-applied edit.

use std::path::Path;
use std::sync::Arc;

use runtimer_common::config::AppConfig;
use runtimer_common::error::{RuntimerError, RuntimerResult};
use runtimer_render_engine::export::{ExportOverlayAdapter, ExportProgress};
use runtimer_run_model::segment::{LoadSegment, LoadSegmentRegistry, MarkOutcome};
use runtimer_run_model::snapshot::{RunRange, SessionSnapshot};
use runtimer_run_model::style::{
    clamp_outline_width, clamp_point_size, clamp_position, Color, TimeFormat, TimerMode,
    TimerStyle,
};
use runtimer_run_model::typeface::Typeface;
use runtimer_run_model::video::VideoProperties;
use runtimer_timing_core::elapsed::{Elapsed, TimeCalculator};
use tokio::sync::watch;

use crate::source::FrameSource;

/// Mutable editor state plus its snapshot publisher.
pub struct EditorSession {
    source: Option<Arc<dyn FrameSource>>,
    video: Option<VideoProperties>,
    registry: LoadSegmentRegistry,
    current_frame: u64,
    range: RunRange,
    style: TimerStyle,
    status: String,
    export_progress: u8,
    revision: u64,
    publisher: watch::Sender<Arc<SessionSnapshot>>,
}

impl EditorSession {
    /// Empty session (no video) drawing with `style`.
    pub fn new(style: TimerStyle) -> Self {
        let initial = SessionSnapshot {
            style: Arc::new(style.clone()),
            ..SessionSnapshot::default()
        };
        let status = initial.status.clone();
        let (publisher, _) = watch::channel(Arc::new(initial));
        Self {
            source: None,
            video: None,
            registry: LoadSegmentRegistry::default(),
            current_frame: 0,
            range: RunRange::default(),
            style,
            status,
            export_progress: 0,
            revision: 0,
            publisher,
        }
    }

    /// Empty session using the configured overlay defaults.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(TimerStyle::from_defaults(&config.overlay))
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.publisher.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.publisher.subscribe()
    }

    pub fn source(&self) -> Option<Arc<dyn FrameSource>> {
        self.source.clone()
    }

    pub fn video(&self) -> Option<VideoProperties> {
        self.video
    }

    pub fn current_frame(&self) -> u64 {
        self.current_frame
    }

    pub fn range(&self) -> RunRange {
        self.range
    }

    pub fn style(&self) -> &TimerStyle {
        &self.style
    }

    pub fn segments(&self) -> &LoadSegmentRegistry {
        &self.registry
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn publish(&mut self) {
        self.revision += 1;
        let snapshot = SessionSnapshot {
            revision: self.revision,
            video: self.video,
            current_frame: self.current_frame,
            range: self.range,
            segments: Arc::from(self.registry.as_slice()),
            marking: self.registry.marking(),
            style: Arc::new(self.style.clone()),
            status: self.status.clone(),
            export_progress: self.export_progress,
        };
        self.publisher.send_replace(Arc::new(snapshot));
    }

    // Video lifecycle

    /// Load a new video.
    ///
    /// On success the video properties and a fresh load segment registry
    /// replace the previous ones together, the range spans the whole video
    /// and the playhead returns to frame 0. The style is kept. On failure
    /// nothing but the status line changes.
    pub fn load_video(&mut self, source: Arc<dyn FrameSource>) -> RuntimerResult<VideoProperties> {
        let props = match source.properties() {
            Ok(props) => props,
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "Failed to load video");
                self.status = format!("Error loading: {e}");
                self.publish();
                return Err(e);
            }
        };

        let total = props.total_frames();
        if total == 0 {
            let err = RuntimerError::invalid_video("video has no frames");
            self.status = format!("Error loading: {err}");
            self.publish();
            return Err(err);
        }

        tracing::info!(
            source = source.name(),
            width = props.width(),
            height = props.height(),
            fps = props.fps(),
            total_frames = total,
            "Video loaded"
        );

        self.source = Some(source);
        self.video = Some(props);
        self.registry = LoadSegmentRegistry::new(total);
        self.current_frame = 0;
        self.range = RunRange::new(0, props.last_frame());
        self.export_progress = 0;
        self.status = format!("Video loaded: {}x{}", props.width(), props.height());
        self.publish();
        Ok(props)
    }

    // Navigation

    /// Move the playhead to `frame`, clamped into the video. Returns the
    /// frame actually selected. No-op without a video.
    pub fn navigate_to(&mut self, frame: i64) -> u64 {
        let Some(video) = self.video else {
            return self.current_frame;
        };
        self.current_frame = video.clamp_frame(frame);
        self.publish();
        self.current_frame
    }

    pub fn navigate_frames(&mut self, delta: i64) -> u64 {
        self.navigate_to((self.current_frame as i64).saturating_add(delta))
    }

    /// Move by whole seconds (`delta * fps` frames, truncated).
    pub fn navigate_seconds(&mut self, delta: i64) -> u64 {
        let fps = self.video.map(|v| v.fps()).unwrap_or(0.0);
        self.navigate_frames((delta as f64 * fps) as i64)
    }

    /// Move by whole minutes (`delta * 60 * fps` frames, truncated).
    pub fn navigate_minutes(&mut self, delta: i64) -> u64 {
        let fps = self.video.map(|v| v.fps()).unwrap_or(0.0);
        self.navigate_frames((delta as f64 * 60.0 * fps) as i64)
    }

    pub fn go_to_start(&mut self) -> u64 {
        self.navigate_to(self.range.start_frame as i64)
    }

    pub fn go_to_end(&mut self) -> u64 {
        self.navigate_to(self.range.end_frame as i64)
    }

    // Run range

    /// Start the run at the current frame. Never moves past the end frame.
    pub fn set_start_frame(&mut self) -> RunRange {
        if self.video.is_some() {
            self.range.start_frame = self.current_frame.min(self.range.end_frame);
            self.publish();
        }
        self.range
    }

    /// End the run at the current frame. Never moves before the start frame.
    pub fn set_end_frame(&mut self) -> RunRange {
        if self.video.is_some() {
            self.range.end_frame = self.current_frame.max(self.range.start_frame);
            self.publish();
        }
        self.range
    }

    // Load segments

    /// Start or finish a load mark at the current frame.
    pub fn toggle_load_mark(&mut self) -> Option<MarkOutcome> {
        self.video?;
        let outcome = self.registry.toggle_mark(self.current_frame);
        self.publish();
        Some(outcome)
    }

    /// Remove the most recent load segment.
    pub fn undo_last_load(&mut self) -> Option<LoadSegment> {
        let removed = self.registry.undo_last()?;
        tracing::debug!(
            start = removed.start_frame,
            end = removed.end_frame,
            "Load segment removed"
        );
        self.publish();
        Some(removed)
    }

    /// Abandon a pending load mark.
    pub fn cancel_load_mark(&mut self) -> Option<u64> {
        let pending = self.registry.cancel_pending()?;
        self.publish();
        Some(pending)
    }

    /// Elapsed time at the playhead.
    pub fn current_elapsed(&self) -> Elapsed {
        let snapshot = self.snapshot();
        TimeCalculator::from_snapshot(&snapshot)
            .map(|calc| calc.compute(self.current_frame))
            .unwrap_or(Elapsed::ZERO)
    }

    // Style

    /// Apply an arbitrary style edit. Numeric fields are clamped back into
    /// range afterwards.
    pub fn update_style(&mut self, edit: impl FnOnce(&mut TimerStyle)) {
        edit(&mut self.style);
        self.style.position_x = clamp_position(self.style.position_x);
        self.style.position_y = clamp_position(self.style.position_y);
        self.style.point_size = clamp_point_size(self.style.point_size);
        self.style.outline_width = clamp_outline_width(self.style.outline_width);
        self.publish();
    }

    pub fn set_mode(&mut self, mode: TimerMode) {
        self.update_style(|s| s.mode = mode);
    }

    pub fn set_format(&mut self, format: TimeFormat) {
        self.update_style(|s| s.format = format);
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.update_style(|s| {
            s.position_x = x;
            s.position_y = y;
        });
    }

    pub fn set_point_size(&mut self, size: f32) {
        self.update_style(|s| s.point_size = size);
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.update_style(|s| s.fill_color = color);
    }

    pub fn set_outline_enabled(&mut self, enabled: bool) {
        self.update_style(|s| s.outline_enabled = enabled);
    }

    pub fn set_outline_width(&mut self, width: f32) {
        self.update_style(|s| s.outline_width = width);
    }

    pub fn set_outline_color(&mut self, color: Color) {
        self.update_style(|s| s.outline_color = color);
    }

    pub fn set_typeface(&mut self, typeface: Typeface) {
        self.update_style(|s| s.typeface = typeface);
    }

    /// Load a TrueType/OpenType file and draw the timer with it.
    pub fn load_custom_font(&mut self, path: impl AsRef<Path>) -> RuntimerResult<()> {
        let path = path.as_ref();
        match Typeface::from_file(path) {
            Ok(typeface) => {
                tracing::info!(
                    name = typeface.name(),
                    path = %path.display(),
                    "Custom font loaded"
                );
                self.status = format!("Font '{}' loaded.", typeface.name());
                self.set_typeface(typeface);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to import font");
                self.status = "Error importing font.".to_string();
                self.publish();
                Err(e.into())
            }
        }
    }

    // Status and export

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.publish();
    }

    /// Record an export progress report as status text.
    pub fn report_export_progress(&mut self, progress: ExportProgress) {
        self.export_progress = progress.percent;
        self.status = progress.status_text();
        self.publish();
    }

    /// Overlay adapter for an export starting now. Later edits do not
    /// affect it.
    pub fn export_overlay(&self) -> RuntimerResult<ExportOverlayAdapter> {
        let adapter = ExportOverlayAdapter::new(self.snapshot())?;
        tracing::info!(
            revision = adapter.snapshot().revision,
            segments = adapter.snapshot().segments.len(),
            "Export overlay captured"
        );
        Ok(adapter)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(TimerStyle::default())
    }
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("video", &self.video)
            .field("current_frame", &self.current_frame)
            .field("range", &self.range)
            .field("segments", &self.registry.len())
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
