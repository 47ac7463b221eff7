//! Time subsystem.
//!
//! One `FrameClock` lives with the viewer window; the runtime calls `tick()`
//! once per redraw and hands the resulting `FrameTime` to the app.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};