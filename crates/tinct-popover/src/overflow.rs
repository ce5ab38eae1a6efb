#![forbid(unsafe_code)]

//! Overflow-ancestor discovery.
//!
//! Only ancestors that clip or scroll can move the anchor out of view, so
//! only they need scroll listeners.

use crate::host::{Host, Target};

const CLIPPING_OVERFLOW: [&str; 4] = ["auto", "scroll", "clip", "hidden"];

/// True when a computed `overflow` value clips on either axis.
///
/// Shorthand values carry one token per axis (`"hidden auto"`).
#[must_use]
pub fn clips_overflow(overflow: &str) -> bool {
    overflow
        .split_whitespace()
        .any(|token| CLIPPING_OVERFLOW.contains(&token))
}

/// True for `display` values that never establish a clipping box.
#[must_use]
pub fn is_boxless_display(display: &str) -> bool {
    matches!(display.trim(), "inline" | "contents")
}

/// Whether `node` is a scroll-tracking target.
pub fn is_overflow_container<H: Host>(host: &H, node: &H::Node) -> bool {
    let display = host.computed_style(node, "display");
    if is_boxless_display(&display) {
        return false;
    }
    ["overflow", "overflow-x", "overflow-y"]
        .iter()
        .any(|property| clips_overflow(&host.computed_style(node, property)))
}

/// Clipping ancestors of `element`, nearest first, ending with
/// [`Target::Document`] for the root viewport.
///
/// The walk stops below `<body>` or at the root, whichever comes first.
pub fn overflow_ancestors<H: Host>(host: &H, element: &H::Node) -> Vec<Target<H::Node>> {
    let mut ancestors = Vec::new();
    let mut current = host.parent(element);
    while let Some(node) = current {
        if host.is_body(&node) {
            break;
        }
        if is_overflow_container(host, &node) {
            ancestors.push(Target::Element(node.clone()));
        }
        current = host.parent(&node);
    }
    ancestors.push(Target::Document);
    ancestors
}
