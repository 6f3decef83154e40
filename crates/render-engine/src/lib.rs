//! Runtimer Render Engine
//!
//! Draws the speedrun timer onto raster surfaces. Preview and export share
//! one code path so a given frame looks identical in both.
//!
//! # Pipeline Architecture
//!
//! ```text
//! SessionSnapshot ──┐
//!                   ├── TimeCalculator (RTA / LRT at frame)
//! frame index ──────┘         │
//!                             ├── format_time (per line)
//!                             │         │
//!                             │         ▼
//!                             └──► overlay layer (transparent RGBA)
//!                                       │
//!                  ┌────────────────────┴────────────────────┐
//!                  ▼                                         ▼
//!       preview: composite onto                 export: returned from
//!       the decoded source frame                overlay_at(presentation time)
//! ```

pub mod compositor;
pub mod export;
pub mod overlay;

pub use compositor::*;
pub use export::*;
pub use overlay::*;
