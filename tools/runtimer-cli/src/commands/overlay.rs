//! Render timer overlays to PNG.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use runtimer_common::error::RuntimerError;
use runtimer_render_engine::compositor::{composite_timer, render_timer_layer};
use runtimer_render_engine::export::{
    default_output_name, render_overlay_sequence, ExportOverlayAdapter, ExportProgress,
    ProgressCallback,
};
use runtimer_run_model::style::TimerStyle;

use super::TimingArgs;

#[allow(clippy::too_many_arguments)]
pub fn run(
    timing: TimingArgs,
    style: TimerStyle,
    width: u32,
    height: u32,
    frame: Option<u64>,
    at: Option<f64>,
    background: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let background = background
        .map(|path| {
            image::open(&path)
                .map(|img| img.to_rgba8())
                .with_context(|| format!("Failed to open background {}", path.display()))
        })
        .transpose()?;
    let (width, height) = background
        .as_ref()
        .map(|img| img.dimensions())
        .unwrap_or((width, height));

    let video = timing.video(width, height)?;
    let snapshot = timing.snapshot(video, style);
    let frame = match (frame, at) {
        (_, Some(secs)) => video.clock().secs_to_frame(secs),
        (Some(frame), None) => frame,
        (None, None) => snapshot.range.end_frame,
    };

    let image = match background {
        Some(mut image) => {
            composite_timer(&mut image, &snapshot, frame);
            image
        }
        None => render_timer_layer(&snapshot, frame, width, height),
    };

    let output = output
        .unwrap_or_else(|| PathBuf::from(default_output_name(&chrono::Local::now(), "png")));
    image
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Overlay for frame {frame} written to {}", output.display());
    Ok(())
}

pub fn run_sequence(
    timing: TimingArgs,
    style: TimerStyle,
    width: u32,
    height: u32,
    dir: PathBuf,
    out_fps: Option<f64>,
) -> anyhow::Result<()> {
    let video = timing.video(width, height)?;
    let adapter = ExportOverlayAdapter::new(Arc::new(timing.snapshot(video, style)))?;
    let out_fps = out_fps.unwrap_or(video.fps());

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    println!("Rendering overlays into: {}", dir.display());
    println!("  Resolution: {width}x{height} @ {out_fps}fps");

    let progress_cb: ProgressCallback = Box::new(|p: ExportProgress| {
        print!("\r  {}  ", p.status_text());
    });

    let frames = render_overlay_sequence(
        &adapter,
        out_fps,
        video.duration_secs(),
        |index, _secs, overlay| {
            let path = dir.join(format!("overlay_{index:06}.png"));
            overlay
                .save(&path)
                .map_err(|e| RuntimerError::render(format!("{}: {e}", path.display())))
        },
        Some(&progress_cb),
    )?;

    println!("\n{frames} overlay frames written");
    Ok(())
}
