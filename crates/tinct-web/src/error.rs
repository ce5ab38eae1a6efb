#![forbid(unsafe_code)]

//! Host-side failures.

/// Errors raised while setting up a DOM host.
///
/// Once a popover is running, DOM failures degrade (zero rects, skipped
/// style writes) and are logged instead of surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No global `window` (not running in a browser main thread).
    NoWindow,
    /// `window.document` is missing.
    NoDocument,
    /// The options value could not be read as JSON.
    InvalidOptions(String),
    /// A DOM call threw.
    Js(String),
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoWindow => write!(f, "no global window"),
            Self::NoDocument => write!(f, "window has no document"),
            Self::InvalidOptions(msg) => write!(f, "invalid popover options: {msg}"),
            Self::Js(msg) => write!(f, "DOM call failed: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}
