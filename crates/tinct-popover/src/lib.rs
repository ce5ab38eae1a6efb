#![forbid(unsafe_code)]

//! Anchored popover positioning.
//!
//! Given an anchor element, a floating element and a preferred
//! [`Placement`], this crate keeps the floating element next to the anchor
//! and inside the viewport:
//!
//! - [`position`] - the side/alignment fallback search and viewport clamping
//! - [`overflow`] - which ancestors can clip or scroll the anchor
//! - [`visibility`] - whether the anchor is on screen
//! - [`popover`] - the state machine reacting to scroll, resize, visibility,
//!   pointer and key events
//! - [`shared`] - reference-counted ownership for popovers shared by widgets
//!
//! The document and the owning widget are reached through the [`Host`] and
//! [`Controller`] traits, so everything here runs (and is tested) without a
//! browser.
//!
//! # Example
//!
//! ```ignore
//! use tinct_popover::{Popover, PopoverConfig};
//!
//! let config = PopoverConfig::default().position("top-end").margin(6.0);
//! let mut popover = Popover::new(host, anchor, floating, controller, &config);
//! popover.attach();
//! // Forward host events:
//! popover.handle_event(PopoverEvent::Scroll);
//! ```

pub mod config;
pub mod dismiss;
pub mod host;
pub mod listeners;
pub mod overflow;
pub mod placement;
pub mod popover;
pub mod position;
pub mod shared;
pub mod visibility;

pub use config::{Margin, PopoverConfig, ResolvedConfig};
pub use host::{Controller, Host, Target};
pub use placement::{Alignment, Placement, Side};
pub use popover::{Popover, PopoverEvent, PopoverState, ViewportChange};
pub use position::{OVERFLOW_GAP, Position, PositionRequest, compute_position};
pub use shared::{SharedPopover, WeakPopover};
pub use tinct_core::geometry::{Axis, Point, Rect};
