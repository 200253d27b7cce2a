//! Platform abstraction layer
//!
//! Host-facing adapters that sit between a window/event loop and the
//! simulator:
//! - Input events to edge-triggered tick input
//! - Frame time to fixed simulation ticks

pub mod input;
pub mod time;

pub use input::{InputLatch, Key};
pub use time::FixedStep;
