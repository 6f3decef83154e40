//! Compute RTA and LRT at one frame.

use runtimer_common::config::AppConfig;
use runtimer_run_model::style::{TimeFormat, TimerStyle};
use runtimer_timing_core::elapsed::TimeCalculator;
use runtimer_timing_core::format::format_time;

use super::TimingArgs;

pub fn run(
    config: &AppConfig,
    timing: TimingArgs,
    frame: Option<u64>,
    at: Option<f64>,
    format: Option<TimeFormat>,
    json: bool,
) -> anyhow::Result<()> {
    // Frame size does not matter for timing.
    let video = timing.video(1, 1)?;
    let range = timing.range(&video);
    let calculator = TimeCalculator::new(video.clock(), video.total_frames(), range, &timing.loads);
    let format = format.unwrap_or_else(|| TimerStyle::from_defaults(&config.overlay).format);

    let elapsed = match (frame, at) {
        (_, Some(secs)) => calculator.compute_at_secs(secs),
        (Some(frame), None) => calculator.compute(frame),
        (None, None) => calculator.compute(range.end_frame),
    };

    if json {
        let value = serde_json::json!({
            "effective_frame": elapsed.effective_frame,
            "rta_frames": elapsed.rta_frames,
            "load_frames": elapsed.load_frames,
            "lrt_frames": elapsed.lrt_frames,
            "rta_secs": elapsed.rta_secs,
            "lrt_secs": elapsed.lrt_secs,
            "rta": format_time(elapsed.rta_secs, format),
            "lrt": format_time(elapsed.lrt_secs, format),
            "degenerate_range": calculator.is_degenerate(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let clamped = calculator.clamped_range();
    println!(
        "Video: {} frames @ {}fps, run {}..={}",
        video.total_frames(),
        video.fps(),
        clamped.start_frame,
        clamped.end_frame
    );
    if calculator.is_degenerate() {
        println!("  (run range is empty; timer reads zero)");
    }
    println!("Frame: {}", elapsed.effective_frame);
    println!(
        "  RTA: {} ({} frames)",
        format_time(elapsed.rta_secs, format),
        elapsed.rta_frames
    );
    println!(
        "  LRT: {} ({} frames, {} load frames over {} segments)",
        format_time(elapsed.lrt_secs, format),
        elapsed.lrt_frames,
        elapsed.load_frames,
        timing.loads.len()
    );
    Ok(())
}
