//! Single-flight asynchronous preview.
//!
//! A request decodes one frame on the blocking pool and composites the timer
//! over it. While a fetch is running further requests are dropped, not
//! queued: only the latest scrub position matters and the caller re-requests
//! it once the running fetch reports back.
//!
//! ```text
//!   request_frame ──CAS false→true──► spawn_blocking
//!        │ (fails: dropped)                │ raw_frame(frame)
//!        ▼                                 │ borrow latest snapshot
//!      false                               │ composite_timer
//!                                          ▼
//!                        flag = false, then send PreviewEvent
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use runtimer_common::error::{RuntimerError, RuntimerResult};
use runtimer_render_engine::compositor::composite_timer;
use runtimer_run_model::snapshot::SessionSnapshot;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::session::EditorSession;
use crate::source::FrameSource;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Fetching,
}

/// Outcome of one preview fetch.
#[derive(Debug, Clone)]
pub enum PreviewEvent {
    Ready {
        frame: u64,
        /// Revision of the snapshot the timer was drawn from.
        revision: u64,
        image: Arc<RgbaImage>,
    },
    Failed {
        frame: u64,
        error: String,
    },
}

impl PreviewEvent {
    pub fn frame(&self) -> u64 {
        match self {
            Self::Ready { frame, .. } | Self::Failed { frame, .. } => *frame,
        }
    }
}

/// Clears the in-flight flag when the worker finishes, including by panic.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Decodes and composes preview frames, at most one at a time.
#[derive(Debug)]
pub struct PreviewScheduler {
    runtime: Handle,
    in_flight: Arc<AtomicBool>,
    snapshots: watch::Receiver<Arc<SessionSnapshot>>,
    events: mpsc::UnboundedSender<PreviewEvent>,
}

impl PreviewScheduler {
    /// Create a scheduler on the current Tokio runtime. Completed fetches
    /// arrive on the returned receiver.
    pub fn new(
        snapshots: watch::Receiver<Arc<SessionSnapshot>>,
    ) -> RuntimerResult<(Self, mpsc::UnboundedReceiver<PreviewEvent>)> {
        let runtime = Handle::try_current().map_err(|e| RuntimerError::Other(e.into()))?;
        Ok(Self::with_runtime(runtime, snapshots))
    }

    pub fn with_runtime(
        runtime: Handle,
        snapshots: watch::Receiver<Arc<SessionSnapshot>>,
    ) -> (Self, mpsc::UnboundedReceiver<PreviewEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            runtime,
            in_flight: Arc::new(AtomicBool::new(false)),
            snapshots,
            events,
        };
        (scheduler, rx)
    }

    pub fn state(&self) -> PreviewState {
        if self.in_flight.load(Ordering::Acquire) {
            PreviewState::Fetching
        } else {
            PreviewState::Idle
        }
    }

    /// Fetch `frame` from `source`. Returns `false` if a fetch is already
    /// running and this request was dropped.
    pub fn request_frame(&self, source: Arc<dyn FrameSource>, frame: u64) -> bool {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(frame, "Preview fetch in flight, request dropped");
            return false;
        }

        let guard = InFlight(self.in_flight.clone());
        let snapshots = self.snapshots.clone();
        let events = self.events.clone();
        self.runtime.spawn_blocking(move || {
            let event = fetch_and_compose(source.as_ref(), &snapshots, frame);
            drop(guard);
            // The receiver is gone only when nobody displays previews anymore.
            let _ = events.send(event);
        });
        true
    }

    /// Request the session's current frame. Returns `false` without a video
    /// or when the request was dropped.
    pub fn refresh(&self, session: &EditorSession) -> bool {
        match session.source() {
            Some(source) if session.video().is_some() => {
                self.request_frame(source, session.current_frame())
            }
            _ => false,
        }
    }
}

fn fetch_and_compose(
    source: &dyn FrameSource,
    snapshots: &watch::Receiver<Arc<SessionSnapshot>>,
    frame: u64,
) -> PreviewEvent {
    match source.raw_frame(frame) {
        Ok(mut image) => {
            // Style and segments as of now, not as of the request.
            let snapshot = snapshots.borrow().clone();
            composite_timer(&mut image, &snapshot, frame);
            PreviewEvent::Ready {
                frame,
                revision: snapshot.revision,
                image: Arc::new(image),
            }
        }
        Err(e) => {
            tracing::warn!(frame, error = %e, "Preview decode failed");
            PreviewEvent::Failed {
                frame,
                error: e.to_string(),
            }
        }
    }
}

/// What [`PreviewDisplay::apply`] did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewUpdate {
    /// The new bitmap replaced the old one.
    Shown { frame: u64 },
    /// The event was for a frame the user already navigated away from.
    Stale { frame: u64, wanted: u64 },
    /// Decoding failed; the old bitmap stays on screen.
    Failed { frame: u64, status: String },
}

/// The bitmap currently on screen.
#[derive(Debug, Default, Clone)]
pub struct PreviewDisplay {
    image: Option<Arc<RgbaImage>>,
    frame: Option<u64>,
}

impl PreviewDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        self.image.as_ref()
    }

    pub fn frame(&self) -> Option<u64> {
        self.frame
    }

    /// Apply a finished fetch while the playhead is at `wanted_frame`.
    ///
    /// The old bitmap is only released once a new one is ready, so the
    /// display never goes blank.
    pub fn apply(&mut self, event: PreviewEvent, wanted_frame: u64) -> PreviewUpdate {
        match event {
            PreviewEvent::Ready { frame, .. } if frame != wanted_frame => {
                tracing::debug!(frame, wanted = wanted_frame, "Discarding stale preview");
                PreviewUpdate::Stale {
                    frame,
                    wanted: wanted_frame,
                }
            }
            PreviewEvent::Ready { frame, image, .. } => {
                self.image = Some(image);
                self.frame = Some(frame);
                PreviewUpdate::Shown { frame }
            }
            PreviewEvent::Failed { frame, error } => PreviewUpdate::Failed {
                frame,
                status: format!("Preview error: {error}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn ready(frame: u64, shade: u8) -> PreviewEvent {
        PreviewEvent::Ready {
            frame,
            revision: 1,
            image: Arc::new(RgbaImage::from_pixel(2, 2, Rgba([shade, 0, 0, 255]))),
        }
    }

    #[test]
    fn test_display_shows_matching_frame() {
        let mut display = PreviewDisplay::new();
        assert_eq!(display.apply(ready(5, 10), 5), PreviewUpdate::Shown { frame: 5 });
        assert_eq!(display.frame(), Some(5));
        assert_eq!(display.image().unwrap().get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn test_display_discards_stale_result() {
        let mut display = PreviewDisplay::new();
        display.apply(ready(5, 10), 5);
        assert_eq!(
            display.apply(ready(6, 20), 9),
            PreviewUpdate::Stale { frame: 6, wanted: 9 }
        );
        assert_eq!(display.frame(), Some(5));
        assert_eq!(display.image().unwrap().get_pixel(0, 0)[0], 10);
    }

    #[test]
    fn test_display_keeps_bitmap_on_failure() {
        let mut display = PreviewDisplay::new();
        display.apply(ready(5, 10), 5);
        let update = display.apply(
            PreviewEvent::Failed {
                frame: 6,
                error: "corrupt packet".to_string(),
            },
            6,
        );
        assert!(matches!(
            update,
            PreviewUpdate::Failed { frame: 6, ref status } if status.contains("corrupt packet")
        ));
        assert_eq!(display.frame(), Some(5));
        assert!(display.image().is_some());
    }

    #[test]
    fn test_new_outside_runtime_fails() {
        let (_tx, rx) = watch::channel(Arc::new(SessionSnapshot::default()));
        assert!(PreviewScheduler::new(rx).is_err());
    }
}
