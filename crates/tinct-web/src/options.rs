#![forbid(unsafe_code)]

//! Reading popover options handed over from JavaScript.
//!
//! The JS side passes a plain object (`{ margin, position, toggle,
//! closeOnScroll, disabled }`), serialized with `JSON.stringify`. A
//! well-typed object deserializes directly into [`PopoverConfig`]. A
//! mistyped one is read field by field: each usable field is kept, the
//! rest fall back to defaults, and a non-numeric margin becomes `0`.

use serde::Deserialize;
use serde_json::Value;
use tinct_popover::config::{Margin, PopoverConfig};

use crate::error::HostError;

/// Parse options from JSON text. Empty text, `null` and `undefined` give
/// the defaults.
pub fn config_from_json(json: &str) -> Result<PopoverConfig, HostError> {
    let json = json.trim();
    if json.is_empty() || json == "undefined" {
        return Ok(PopoverConfig::default());
    }
    let value: Value =
        serde_json::from_str(json).map_err(|err| HostError::InvalidOptions(err.to_string()))?;
    Ok(config_from_value(&value))
}

/// Build a configuration from an already-parsed options value.
#[must_use]
pub fn config_from_value(value: &Value) -> PopoverConfig {
    if value.is_null() {
        return PopoverConfig::default();
    }
    match PopoverConfig::deserialize(value) {
        Ok(config) => config,
        Err(_err) => {
            tinct_core::warn!(error = %_err, "mistyped popover options, reading leniently");
            lenient(value)
        }
    }
}

fn lenient(value: &Value) -> PopoverConfig {
    let defaults = PopoverConfig::default();
    let Some(object) = value.as_object() else {
        return defaults;
    };
    let flag = |key: &str, default: bool| object.get(key).and_then(Value::as_bool).unwrap_or(default);

    let margin = match object.get("margin") {
        None | Some(Value::Null) => defaults.margin.clone(),
        Some(Value::Number(n)) => Margin::Number(n.as_f64().unwrap_or(0.0)),
        Some(Value::String(s)) => Margin::Text(s.clone()),
        Some(_) => Margin::Number(0.0),
    };
    let position = object
        .get("position")
        .and_then(Value::as_str)
        .map_or_else(|| defaults.position.clone(), str::to_owned);

    PopoverConfig {
        margin,
        position,
        toggle: flag("toggle", defaults.toggle),
        close_on_scroll: flag("closeOnScroll", defaults.close_on_scroll),
        disabled: flag("disabled", defaults.disabled),
    }
}
