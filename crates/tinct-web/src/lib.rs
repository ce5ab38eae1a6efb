#![forbid(unsafe_code)]

//! DOM host for tinct popovers.
//!
//! On `wasm32` this crate exports `TinctPopover` through `wasm-bindgen`: a
//! popover bound to real DOM elements, with listeners, an intersection
//! observer and inline style writes backed by `web-sys`.
//!
//! The pieces that do not touch the DOM (option parsing, containing-block
//! detection, the focusable selector, host errors) live in plain modules so
//! they build and test natively.

pub mod error;
pub mod options;
pub mod style;

#[cfg(target_arch = "wasm32")]
mod wasm;

pub use error::HostError;
pub use options::{config_from_json, config_from_value};

#[cfg(target_arch = "wasm32")]
pub use wasm::{JsController, TinctPopover, WebHost};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct TinctPopover;

#[cfg(not(target_arch = "wasm32"))]
impl TinctPopover {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
