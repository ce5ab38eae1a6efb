#![forbid(unsafe_code)]

//! Side and alignment preferences.
//!
//! Placement strings such as `"bottom-start"` are parsed once, when the
//! configuration is normalized. Layout passes only ever see the typed
//! [`Placement`].

use std::fmt;
use std::str::FromStr;

pub use tinct_core::geometry::Side;

/// How the floating element lines up with the anchor on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Alignment {
    /// Share the anchor's start edge (left or top).
    Start,
    /// Center on the anchor.
    #[default]
    Center,
    /// Share the anchor's end edge (right or bottom).
    End,
}

impl Alignment {
    /// Alignments to try, in order, when this one was requested.
    #[must_use]
    pub const fn fallback_order(self) -> [Alignment; 3] {
        match self {
            Self::Start => [Self::Start, Self::Center, Self::End],
            Self::Center => [Self::Center, Self::Start, Self::End],
            Self::End => [Self::End, Self::Center, Self::Start],
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

/// A side paired with an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Placement {
    pub side: Side,
    pub alignment: Alignment,
}

impl Placement {
    #[must_use]
    pub const fn new(side: Side, alignment: Alignment) -> Self {
        Self { side, alignment }
    }

    /// Parse a `side[-alignment]` string, degrading instead of failing.
    ///
    /// Matching is case-insensitive. An unknown side becomes
    /// [`Side::Bottom`]; a missing or unknown alignment becomes
    /// [`Alignment::Center`].
    #[must_use]
    pub fn parse_lenient(input: &str) -> Self {
        let lowered = input.trim().to_ascii_lowercase();
        let mut parts = lowered.splitn(2, '-');
        let side = match parts.next() {
            Some("top") => Side::Top,
            Some("right") => Side::Right,
            Some("left") => Side::Left,
            _ => Side::Bottom,
        };
        let alignment = match parts.next() {
            Some("start") => Alignment::Start,
            Some("end") => Alignment::End,
            _ => Alignment::Center,
        };
        Self { side, alignment }
    }
}

impl FromStr for Placement {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.side.as_str(), self.alignment.as_str())
    }
}
