//! View rendering
//!
//! [`ClockView`] draws screens into a [`FrameBuffer`] and remembers, per
//! screen region, the data it last drew there. A draw call only touches the
//! regions whose data changed and reports whether any pixel did, so the
//! dispatcher can skip the slow panel refresh entirely.

pub mod framebuffer;
pub mod renderer;

pub use framebuffer::{FrameBuffer, BUFFER_LEN, HEIGHT, WIDTH};
pub use renderer::{ClockView, EditFrame, Highlight};
