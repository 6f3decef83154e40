//! Runtimer Editor
//!
//! Owns the mutable editing session and drives the interactive preview.
//!
//! - [`session::EditorSession`] is the single writer. Every mutation
//!   publishes a new immutable snapshot on a `tokio::sync::watch` channel.
//! - [`preview::PreviewScheduler`] decodes frames through a
//!   [`source::FrameSource`] on the blocking pool, at most one at a time, and
//!   composes them with whatever snapshot is current when decoding finishes.
//! - Export reads a snapshot captured once at export start, so it never
//!   contends with the editor.

pub mod preview;
pub mod session;
pub mod source;

pub use preview::{PreviewDisplay, PreviewEvent, PreviewScheduler, PreviewState, PreviewUpdate};
pub use session::EditorSession;
pub use source::{FrameSource, ImageSequenceSource, SolidColorSource};
