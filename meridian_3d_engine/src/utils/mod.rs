//! Utilities
//!
//! `FrameClock`: the once-per-frame tick that drives `update` then `render`.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
