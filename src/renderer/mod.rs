//! Backend-agnostic rendering
//!
//! Builds a flat draw list from a read-only round; the host backend replays it.

pub mod shapes;

pub use shapes::{DrawCmd, Frame, build_frame};
