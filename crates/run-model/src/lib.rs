//! Runtimer Run Model
//!
//! Defines the data contracts of an editing session:
//! - **Video:** Immutable properties of the loaded video (size, fps, duration)
//! - **Segments:** User-marked loading intervals and the marking workflow
//! - **Style:** How the timer is drawn (mode, format, position, colors, font)
//! - **Snapshot:** A consistent point-in-time copy of all of the above
//!
//! Frame indices are the only time coordinate stored here; seconds are
//! derived through `runtimer_common::FrameClock`.

pub mod error;
pub mod segment;
pub mod snapshot;
pub mod style;
pub mod typeface;
pub mod video;

pub use error::*;
pub use segment::*;
pub use snapshot::*;
pub use style::*;
pub use typeface::*;
pub use video::*;
