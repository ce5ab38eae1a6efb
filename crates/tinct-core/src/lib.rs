#![forbid(unsafe_code)]

//! Core: viewport geometry, canonical input events, and the logging facade
//! shared by the tinct crates.

pub mod event;
pub mod geometry;
pub mod logging;

pub use geometry::{Axis, Point, Rect, Side};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
