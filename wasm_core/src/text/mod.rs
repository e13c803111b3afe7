pub mod case;
pub mod lines;
pub mod lorem;
pub mod stats;

use wasm_bindgen::prelude::*;

use crate::{options_from_js, respond, respond_text};

use self::case::CaseMode;
use self::lines::{LineOp, LineOptions};
use self::lorem::LoremUnit;

#[wasm_bindgen]
pub fn text_statistics(text: &str) -> Result<JsValue, JsValue> {
    respond("word counter", Ok(stats::text_statistics(text)))
}

#[wasm_bindgen]
pub fn readability(text: &str) -> Result<JsValue, JsValue> {
    respond("readability checker", stats::readability(text))
}

#[wasm_bindgen]
pub fn convert_case(text: &str, mode: &str) -> Result<String, JsValue> {
    let result = CaseMode::parse(mode).map(|mode| case::convert_case(text, mode));
    respond_text("case converter", result)
}

#[wasm_bindgen]
pub fn slugify(text: &str, separator: &str) -> String {
    case::slugify(text, separator)
}

/// `options` is an optional `{ caseInsensitive, natural }` object.
#[wasm_bindgen]
pub fn process_lines(text: &str, operation: &str, options: JsValue) -> Result<String, JsValue> {
    let result = LineOp::parse(operation).and_then(|op| {
        let options = options_from_js::<LineOptions>(options)?;
        lines::process_lines(text, op, options)
    });
    respond_text("line tools", result)
}

#[wasm_bindgen]
pub fn reverse_text(text: &str) -> String {
    lines::reverse_text(text)
}

#[wasm_bindgen]
pub fn lorem_ipsum(unit: &str, count: usize, start_with_lorem: bool) -> Result<String, JsValue> {
    let result = LoremUnit::parse(unit)
        .and_then(|unit| lorem::lorem_ipsum(unit, count, start_with_lorem));
    respond_text("lorem ipsum", result)
}
