#![forbid(unsafe_code)]

//! Popover configuration and normalization.
//!
//! [`PopoverConfig`] is what the embedding widget hands over, possibly
//! straight from a user-supplied options object. [`PopoverConfig::resolve`]
//! turns it into a [`ResolvedConfig`] with every value checked:
//!
//! - a margin that is not a finite, non-negative number becomes `0`
//! - an unknown side becomes `bottom`, an unknown alignment `center`
//!
//! Invalid configuration therefore degrades placement instead of erroring.

#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::placement::Placement;
use crate::position::PositionRequest;

/// Default gap between anchor and floating element, in pixels.
pub const DEFAULT_MARGIN: f64 = 8.0;

/// Default placement string.
pub const DEFAULT_POSITION: &str = "bottom-start";

/// A margin as supplied by the host: a number or a CSS-ish string (`"8px"`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(untagged))]
pub enum Margin {
    Number(f64),
    Text(String),
}

impl Default for Margin {
    fn default() -> Self {
        Self::Number(DEFAULT_MARGIN)
    }
}

impl From<f64> for Margin {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Margin {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl Margin {
    /// The margin in pixels, or `0` when it is not a usable number.
    #[must_use]
    pub fn to_pixels(&self) -> f64 {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(text) => parse_leading_number(text).unwrap_or(0.0),
        };
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

/// Parse the numeric prefix of `text` (`"12.5px"` → `12.5`).
fn parse_leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in text.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    text[..end].parse().ok()
}

/// Popover options as declared by the embedding widget.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct PopoverConfig {
    /// Gap between anchor and floating element.
    pub margin: Margin,
    /// Preferred placement, e.g. `"bottom-start"`.
    pub position: String,
    /// When `false` the popover is "always open": outside clicks and Escape
    /// do not close it, and it reopens when the anchor scrolls back into view.
    pub toggle: bool,
    /// Close the popover after any tracked scroll.
    pub close_on_scroll: bool,
    /// Ignore user-initiated open/close requests.
    pub disabled: bool,
}

impl Default for PopoverConfig {
    fn default() -> Self {
        Self {
            margin: Margin::default(),
            position: DEFAULT_POSITION.to_owned(),
            toggle: true,
            close_on_scroll: false,
            disabled: false,
        }
    }
}

impl PopoverConfig {
    /// Set the margin.
    #[must_use]
    pub fn margin(mut self, margin: impl Into<Margin>) -> Self {
        self.margin = margin.into();
        self
    }

    /// Set the placement string.
    #[must_use]
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Set toggle mode (`false` = always open).
    #[must_use]
    pub fn toggle(mut self, toggle: bool) -> Self {
        self.toggle = toggle;
        self
    }

    /// Set close-on-scroll behavior.
    #[must_use]
    pub fn close_on_scroll(mut self, close: bool) -> Self {
        self.close_on_scroll = close;
        self
    }

    /// Set the disabled flag.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Validate every field, substituting safe defaults.
    #[must_use]
    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            request: PositionRequest {
                placement: Placement::parse_lenient(&self.position),
                margin: self.margin.to_pixels(),
            },
            toggle: self.toggle,
            close_on_scroll: self.close_on_scroll,
            disabled: self.disabled,
        }
    }
}

/// Configuration after normalization. Parsed once per attach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedConfig {
    pub request: PositionRequest,
    pub toggle: bool,
    pub close_on_scroll: bool,
    pub disabled: bool,
}

impl ResolvedConfig {
    /// True when the popover should stay open regardless of user dismissal.
    #[must_use]
    pub const fn always_open(&self) -> bool {
        !self.toggle
    }
}
