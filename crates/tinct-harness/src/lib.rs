#![forbid(unsafe_code)]

//! Test harness for tinct popovers.
//!
//! - [`FakeDom`] - an in-memory document implementing [`Host`](tinct_popover::Host)
//! - [`RecordingController`] - a widget stand-in that logs open/close requests
//! - [`Scene`] - the common anchor + floating element setup
//!
//! # Quick Start
//!
//! ```ignore
//! use tinct_harness::Scene;
//!
//! let scene = Scene::new(1000.0, 800.0);
//! let mut popover = scene.popover(&PopoverConfig::default());
//! popover.attach();
//! assert_eq!(scene.transform().as_deref(), Some("translate(10px, 38px)"));
//! ```

pub mod controller;
pub mod dom;

pub use controller::{RecordingController, ToggleCall};
pub use dom::{FakeDom, NodeId};

use tinct_core::geometry::Rect;
use tinct_popover::{Popover, PopoverConfig};

/// Anchor and floating element in a fresh document.
///
/// The anchor sits at `(10, 10, 20, 20)` and the floating element measures
/// `100 × 50`, both directly under `<body>`.
#[derive(Debug, Clone)]
pub struct Scene {
    pub dom: FakeDom,
    pub anchor: NodeId,
    pub floating: NodeId,
    pub controller: RecordingController,
}

impl Scene {
    /// Build a scene in a `width × height` viewport.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_dom(FakeDom::new(width, height))
    }

    /// Build a scene in an existing document.
    #[must_use]
    pub fn with_dom(dom: FakeDom) -> Self {
        let anchor = dom.element(dom.body(), Rect::new(10.0, 10.0, 20.0, 20.0));
        let floating = dom.element(dom.body(), Rect::new(0.0, 0.0, 100.0, 50.0));
        Self {
            dom,
            anchor,
            floating,
            controller: RecordingController::new(),
        }
    }

    /// A detached popover over this scene, sharing the scene's controller.
    #[must_use]
    pub fn popover(&self, config: &PopoverConfig) -> Popover<FakeDom, RecordingController> {
        Popover::new(
            self.dom.clone(),
            self.anchor,
            self.floating,
            self.controller.clone(),
            config,
        )
    }

    /// Inline transform currently on the floating element.
    #[must_use]
    pub fn transform(&self) -> Option<String> {
        self.dom.inline_style(self.floating, "transform")
    }

    /// Inline height currently on the floating element.
    #[must_use]
    pub fn forced_height(&self) -> Option<String> {
        self.dom.inline_style(self.floating, "height")
    }
}
