use chrono::{DateTime, Utc};
use console_error_panic_hook::set_once as set_panic_hook;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod apis;
pub mod calculators;
pub mod color;
pub mod cron;
pub mod encoding;
pub mod error;
pub mod generators;
pub mod images;
pub mod logging;
pub mod network;
pub mod random;
pub mod regex_tool;
pub mod text;
pub mod units;

use error::ToolError;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    set_panic_hook();
    logging::init_logging();
}

/// Serialises a tool result for JS. Maps become plain objects rather than
/// `Map` instances so pages can read fields directly.
pub(crate) fn to_js<T: Serialize>(value: &T) -> error::Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| ToolError::Decode(err.to_string()))
}

/// Common tail of every structured export: log failures, then hand the
/// value or the error message to the page.
pub(crate) fn respond<T: Serialize>(tool: &str, result: error::Result<T>) -> Result<JsValue, JsValue> {
    match result.and_then(|value| to_js(&value)) {
        Ok(value) => Ok(value),
        Err(err) => {
            logging::report_failure(tool, &err);
            Err(err.into())
        }
    }
}

pub(crate) fn respond_text(tool: &str, result: error::Result<String>) -> Result<String, JsValue> {
    result.map_err(|err| {
        logging::report_failure(tool, &err);
        err.into()
    })
}

/// Reads an optional options object; `null`/`undefined` give the defaults.
pub(crate) fn options_from_js<T: DeserializeOwned + Default>(value: JsValue) -> error::Result<T> {
    if value.is_null() || value.is_undefined() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value)
        .map_err(|err| ToolError::invalid(format!("invalid options: {err}")))
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn current_utc() -> DateTime<Utc> {
    let millis = js_sys::Date::now() as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn current_utc() -> DateTime<Utc> {
    Utc::now()
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
