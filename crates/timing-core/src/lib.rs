//! Runtimer Timing Core
//!
//! Pure, deterministic timing for the overlay:
//! - **Elapsed:** RTA and LRT for a frame given the run range and the
//!   marked load segments
//! - **Format:** Rendering an elapsed duration into one of the fixed
//!   timer layouts
//!
//! Nothing here holds state between calls; identical inputs always give
//! bit-identical outputs, which is what keeps preview and export in sync.

pub mod elapsed;
pub mod format;

pub use elapsed::*;
pub use format::*;
