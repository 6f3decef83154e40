//! Subcommand implementations and the arguments they share.

pub mod config;
pub mod elapsed;
pub mod format;
pub mod overlay;
pub mod preview;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use runtimer_common::config::OverlayDefaults;
use runtimer_run_model::segment::LoadSegment;
use runtimer_run_model::snapshot::{RunRange, SessionSnapshot};
use runtimer_run_model::style::{
    clamp_outline_width, clamp_point_size, clamp_position, Color, TimeFormat, TimerMode,
    TimerStyle,
};
use runtimer_run_model::typeface::Typeface;
use runtimer_run_model::video::VideoProperties;

/// Video timing and run state given on the command line.
#[derive(Args, Debug, Clone)]
pub struct TimingArgs {
    /// Video frame rate
    #[arg(long, default_value = "30")]
    pub fps: f64,

    /// Video duration in seconds
    #[arg(long)]
    pub duration: f64,

    /// Run start frame (default: first frame)
    #[arg(long)]
    pub start: Option<u64>,

    /// Run end frame (default: last frame)
    #[arg(long)]
    pub end: Option<u64>,

    /// Load segment as START-END frames (repeatable)
    #[arg(long = "load", value_parser = parse_segment)]
    pub loads: Vec<LoadSegment>,
}

impl TimingArgs {
    pub fn video(&self, width: u32, height: u32) -> anyhow::Result<VideoProperties> {
        VideoProperties::new(width, height, self.fps, self.duration)
            .context("Invalid video timing")
    }

    pub fn range(&self, video: &VideoProperties) -> RunRange {
        RunRange::new(
            self.start.unwrap_or(0),
            self.end.unwrap_or_else(|| video.last_frame()),
        )
    }

    /// Snapshot equivalent to an editor session holding these values.
    pub fn snapshot(&self, video: VideoProperties, style: TimerStyle) -> SessionSnapshot {
        SessionSnapshot {
            video: Some(video),
            range: self.range(&video),
            segments: Arc::from(self.loads.as_slice()),
            style: Arc::new(style),
            ..SessionSnapshot::default()
        }
    }
}

/// Timer style overrides on top of the configured defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Timer mode: rta, lrt or both
    #[arg(long)]
    pub mode: Option<TimerMode>,

    /// Time layout key
    #[arg(long = "time-format")]
    pub time_format: Option<TimeFormat>,

    /// Horizontal center as a fraction of the width
    #[arg(long)]
    pub pos_x: Option<f32>,

    /// Vertical center as a fraction of the height
    #[arg(long)]
    pub pos_y: Option<f32>,

    /// Font size in pixels
    #[arg(long)]
    pub size: Option<f32>,

    /// Fill color (#RRGGBB or #RRGGBBAA)
    #[arg(long)]
    pub color: Option<Color>,

    /// Outline width in pixels
    #[arg(long)]
    pub outline_width: Option<f32>,

    /// Outline color (#RRGGBB or #RRGGBBAA)
    #[arg(long)]
    pub outline_color: Option<Color>,

    /// Disable the outline
    #[arg(long)]
    pub no_outline: bool,

    /// TrueType/OpenType font file
    #[arg(long)]
    pub font: Option<PathBuf>,
}

impl StyleArgs {
    pub fn build(&self, defaults: &OverlayDefaults) -> anyhow::Result<TimerStyle> {
        let mut style = TimerStyle::from_defaults(defaults);
        if let Some(mode) = self.mode {
            style.mode = mode;
        }
        if let Some(format) = self.time_format {
            style.format = format;
        }
        if let Some(x) = self.pos_x {
            style.position_x = clamp_position(x);
        }
        if let Some(y) = self.pos_y {
            style.position_y = clamp_position(y);
        }
        if let Some(size) = self.size {
            style.point_size = clamp_point_size(size);
        }
        if let Some(color) = self.color {
            style.fill_color = color;
        }
        if let Some(width) = self.outline_width {
            style.outline_width = clamp_outline_width(width);
        }
        if let Some(color) = self.outline_color {
            style.outline_color = color;
        }
        if self.no_outline {
            style.outline_enabled = false;
        }
        if let Some(path) = &self.font {
            style.typeface = Typeface::from_file(path)
                .with_context(|| format!("Failed to load font {}", path.display()))?;
        }
        Ok(style)
    }
}

/// Parse `START-END` into a load segment (endpoints in either order).
pub fn parse_segment(raw: &str) -> Result<LoadSegment, String> {
    let (a, b) = raw
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got {raw:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<u64>()
            .map_err(|e| format!("invalid frame {s:?}: {e}"))
    };
    Ok(LoadSegment::new(parse(a)?, parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_segment() {
        assert_eq!(parse_segment("60-120").unwrap(), LoadSegment::new(60, 120));
        assert_eq!(parse_segment("50-30").unwrap(), LoadSegment::new(30, 50));
        assert!(parse_segment("60").is_err());
        assert!(parse_segment("a-5").is_err());
    }

    #[test]
    fn test_style_overrides_defaults() {
        let args = StyleArgs {
            mode: Some(TimerMode::Both),
            pos_x: Some(2.0),
            no_outline: true,
            ..StyleArgs::default()
        };
        let style = args.build(&OverlayDefaults::default()).unwrap();
        assert_eq!(style.mode, TimerMode::Both);
        assert_eq!(style.position_x, 1.0);
        assert!(!style.outline_enabled);
        assert_eq!(style.format, TimeFormat::MinutesMillis);
    }

    #[test]
    fn test_range_defaults_to_whole_video() {
        let timing = TimingArgs {
            fps: 30.0,
            duration: 10.0,
            start: None,
            end: None,
            loads: Vec::new(),
        };
        let video = timing.video(4, 4).unwrap();
        assert_eq!(timing.range(&video), RunRange::new(0, 299));
    }
}
