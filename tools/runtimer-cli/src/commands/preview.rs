//! Preview one frame of an image sequence through the editor pipeline.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use runtimer_editor::{
    EditorSession, ImageSequenceSource, PreviewDisplay, PreviewScheduler, PreviewUpdate,
};
use runtimer_run_model::segment::LoadSegment;
use runtimer_run_model::style::TimerStyle;

const PREVIEW_TIMEOUT: Duration = Duration::from_secs(30);

#[allow(clippy::too_many_arguments)]
pub async fn run(
    frames: PathBuf,
    fps: f64,
    frame: u64,
    start: Option<u64>,
    end: Option<u64>,
    loads: Vec<LoadSegment>,
    style: TimerStyle,
    output: PathBuf,
) -> anyhow::Result<()> {
    let source = Arc::new(ImageSequenceSource::from_dir(&frames, fps)?);
    let mut session = EditorSession::new(style);
    let video = session.load_video(source)?;
    println!("{}", session.status());

    // Replay the run setup the way a user would enter it.
    if let Some(end) = end {
        session.navigate_to(end as i64);
        session.set_end_frame();
    }
    if let Some(start) = start {
        session.navigate_to(start as i64);
        session.set_start_frame();
    }
    for segment in &loads {
        session.navigate_to(segment.start_frame as i64);
        session.toggle_load_mark();
        session.navigate_to(segment.end_frame as i64);
        session.toggle_load_mark();
    }
    let shown = session.navigate_to(frame as i64);

    let (scheduler, mut events) = PreviewScheduler::new(session.subscribe())?;
    let mut display = PreviewDisplay::new();
    if !scheduler.refresh(&session) {
        anyhow::bail!("Preview scheduler is busy");
    }

    let event = tokio::time::timeout(PREVIEW_TIMEOUT, events.recv())
        .await
        .context("Timed out waiting for preview")?
        .context("Preview worker stopped")?;

    match display.apply(event, session.current_frame()) {
        PreviewUpdate::Shown { .. } => {}
        PreviewUpdate::Stale { frame, wanted } => {
            anyhow::bail!("Preview returned frame {frame}, expected {wanted}")
        }
        PreviewUpdate::Failed { status, .. } => {
            session.set_status(status.clone());
            anyhow::bail!(status)
        }
    }

    let image = display.image().context("Preview produced no image")?;
    image
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let elapsed = session.current_elapsed();
    println!(
        "Frame {shown}/{} -> {} (RTA {:.3}s, LRT {:.3}s)",
        video.last_frame(),
        output.display(),
        elapsed.rta_secs,
        elapsed.lrt_secs
    );
    Ok(())
}
