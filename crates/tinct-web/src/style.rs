#![forbid(unsafe_code)]

//! Computed-style rules the DOM host needs.

/// Elements the focus trap considers tabbable.
pub const FOCUSABLE_SELECTOR: &str = concat!(
    "a[href], area[href], button:not([disabled]), input:not([disabled]), ",
    "select:not([disabled]), textarea:not([disabled]), iframe, ",
    "[contenteditable=\"true\"], [tabindex]:not([tabindex=\"-1\"])"
);

fn is_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != "none"
}

/// Whether an ancestor with these computed styles becomes the containing
/// block of a `position: fixed` descendant.
///
/// `style` looks up a computed property value; missing properties come
/// back empty.
pub fn creates_containing_block(style: impl Fn(&str) -> String) -> bool {
    if ["transform", "perspective", "filter", "backdrop-filter"]
        .iter()
        .any(|property| is_set(&style(property)))
    {
        return true;
    }
    let contain = style("contain");
    if contain
        .split_whitespace()
        .any(|token| matches!(token, "paint" | "layout" | "strict" | "content"))
    {
        return true;
    }
    style("will-change")
        .split(',')
        .map(str::trim)
        .any(|token| matches!(token, "transform" | "perspective" | "filter"))
}

/// Whether a computed `position` value leaves the element in normal flow.
#[must_use]
pub fn is_static(position: &str) -> bool {
    matches!(position.trim(), "" | "static")
}
