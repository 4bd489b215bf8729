//! btop-rs - the drawing core of a terminal system monitor
//!
//! Samples from a collector go in, a cursor addressed ANSI stream comes
//! out. `ui::ScreenManager` is the entry point.

pub mod core;
pub mod ui;
