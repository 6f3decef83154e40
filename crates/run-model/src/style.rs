//! Timer style: what the overlay looks like.
//!
//! The style is owned by the editor session and survives video reloads.
//! Renderers only ever read it.

use std::fmt;
use std::str::FromStr;

use runtimer_common::config::OverlayDefaults;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::typeface::Typeface;

/// Which elapsed time(s) the overlay shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Real-time attempt only.
    #[default]
    Rta,
    /// Load-removed time only.
    Lrt,
    /// Both, RTA first, each line labeled.
    Both,
}

impl TimerMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rta => "rta",
            Self::Lrt => "lrt",
            Self::Both => "both",
        }
    }
}

impl FromStr for TimerMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rta" => Ok(Self::Rta),
            "lrt" => Ok(Self::Lrt),
            "both" => Ok(Self::Both),
            _ => Err(ModelError::parse("timer mode", s)),
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed textual layouts for an elapsed time.
///
/// H is unpadded hours, M/S are zero-padded minutes/seconds, `mmm` is
/// milliseconds and `cc` centiseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    /// `H:MM:SS.mmm`
    #[serde(rename = "HHMMSSmmm")]
    HoursMillis,
    /// `H:MM:SS`
    #[serde(rename = "HHMMSS")]
    Hours,
    /// `M:SS.mmm`
    #[default]
    #[serde(rename = "MMSSmmm")]
    MinutesMillis,
    /// `M:SS`
    #[serde(rename = "MMSS")]
    Minutes,
    /// `M:SS.cc`
    #[serde(rename = "MMSScc")]
    MinutesCentis,
    /// `MM:SS.cc`
    #[serde(rename = "MMSScc_pad")]
    PaddedMinutesCentis,
    /// `S.mmm` in total seconds
    #[serde(rename = "SSmmm")]
    SecondsMillis,
}

impl TimeFormat {
    pub const ALL: [TimeFormat; 7] = [
        Self::HoursMillis,
        Self::Hours,
        Self::MinutesMillis,
        Self::Minutes,
        Self::MinutesCentis,
        Self::PaddedMinutesCentis,
        Self::SecondsMillis,
    ];

    /// The format key as shown to users and stored in config.
    pub fn key(self) -> &'static str {
        match self {
            Self::HoursMillis => "HHMMSSmmm",
            Self::Hours => "HHMMSS",
            Self::MinutesMillis => "MMSSmmm",
            Self::Minutes => "MMSS",
            Self::MinutesCentis => "MMSScc",
            Self::PaddedMinutesCentis => "MMSScc_pad",
            Self::SecondsMillis => "SSmmm",
        }
    }
}

impl FromStr for TimeFormat {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.key() == key)
            .ok_or_else(|| ModelError::parse("time format", s))
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Straight (non-premultiplied) RGBA color, written as `#RRGGBB` or
/// `#RRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Color {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ModelError::parse("color", s));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| ModelError::parse("color", s))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl TryFrom<String> for Color {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Smallest font size the editor accepts.
pub const MIN_POINT_SIZE: f32 = 1.0;

/// Largest font size the editor accepts. Big enough for 4K frames.
pub const MAX_POINT_SIZE: f32 = 1000.0;

/// Largest outline width, in pixels.
pub const MAX_OUTLINE_WIDTH: f32 = 64.0;

/// Complete description of how the timer is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerStyle {
    pub mode: TimerMode,

    /// Horizontal center in `[0, 1]` of the frame width.
    pub position_x: f32,

    /// Vertical center in `[0, 1]` of the frame height.
    pub position_y: f32,

    /// Font size in pixels.
    pub point_size: f32,

    pub fill_color: Color,
    pub format: TimeFormat,
    pub typeface: Typeface,

    pub outline_enabled: bool,

    /// Outline width in pixels; the stroke extends this far outside the
    /// glyph contour.
    pub outline_width: f32,

    pub outline_color: Color,
}

impl Default for TimerStyle {
    fn default() -> Self {
        Self::from_defaults(&OverlayDefaults::default())
    }
}

impl TimerStyle {
    /// Build a style from configured defaults.
    ///
    /// Fields that fail to parse keep the built-in value and log a warning.
    pub fn from_defaults(defaults: &OverlayDefaults) -> Self {
        fn parse_or<T: FromStr>(field: &str, raw: &str, fallback: T) -> T {
            raw.parse().unwrap_or_else(|_| {
                tracing::warn!(field, value = raw, "Ignoring invalid overlay default");
                fallback
            })
        }

        Self {
            mode: parse_or("mode", &defaults.mode, TimerMode::Rta),
            position_x: clamp_position(defaults.position_x),
            position_y: clamp_position(defaults.position_y),
            point_size: clamp_point_size(defaults.point_size),
            fill_color: parse_or("fill_color", &defaults.fill_color, Color::WHITE),
            format: parse_or("format", &defaults.format, TimeFormat::MinutesMillis),
            typeface: Typeface::default_bold(),
            outline_enabled: defaults.outline_enabled,
            outline_width: clamp_outline_width(defaults.outline_width),
            outline_color: parse_or("outline_color", &defaults.outline_color, Color::BLACK),
        }
    }

    /// Whether an outline pass will actually be drawn.
    pub fn draws_outline(&self) -> bool {
        self.outline_enabled && self.outline_width > 0.0
    }
}

/// Clamp a fractional canvas coordinate into `[0, 1]`.
pub fn clamp_position(value: f32) -> f32 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp the font size into `[MIN_POINT_SIZE, MAX_POINT_SIZE]`.
pub fn clamp_point_size(value: f32) -> f32 {
    if value.is_nan() {
        MIN_POINT_SIZE
    } else {
        value.clamp(MIN_POINT_SIZE, MAX_POINT_SIZE)
    }
}

/// Clamp the outline width into `[0, MAX_OUTLINE_WIDTH]`.
pub fn clamp_outline_width(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, MAX_OUTLINE_WIDTH)
    }
}
