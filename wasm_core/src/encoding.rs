//! Text encoders: base64, URL, HTML entities, JSON formatting and digests.

use std::collections::BTreeMap;

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use md5::Md5;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::{respond, respond_text};

pub fn base64_encode_internal(text: &str, url_safe: bool, pad: bool) -> String {
    let data = text.as_bytes();
    match (url_safe, pad) {
        (false, true) => STANDARD.encode(data),
        (false, false) => STANDARD_NO_PAD.encode(data),
        (true, true) => URL_SAFE.encode(data),
        (true, false) => URL_SAFE_NO_PAD.encode(data),
    }
}

/// Decodes either alphabet, with or without padding, ignoring whitespace.
pub fn base64_decode_bytes(input: &str) -> Result<Vec<u8>> {
    let mut normalized: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let trimmed_len = normalized.trim_end_matches('=').len();
    normalized.truncate(trimmed_len);
    STANDARD_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|err| ToolError::Decode(format!("invalid base64: {err}")))
}

pub fn base64_decode_internal(input: &str) -> Result<String> {
    let bytes = base64_decode_bytes(input)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn url_encode_internal(input: &str) -> String {
    urlencoding::encode(input).replace("%20", "+")
}

pub fn url_decode_internal(input: &str) -> Result<String> {
    let normalized = input.replace('+', " ");
    urlencoding::decode(&normalized)
        .map(|cow| cow.into_owned())
        .map_err(|_| ToolError::Decode("invalid URL encoding".into()))
}

pub fn html_escape_internal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '©',
        "reg" => '®',
        "trade" => '™',
        "hellip" => '…',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "euro" => '€',
        _ => return None,
    })
}

fn decode_entity(body: &str) -> Option<char> {
    if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec.parse().ok().and_then(char::from_u32);
    }
    named_entity(body)
}

/// Unknown or malformed entities are left untouched.
pub fn html_unescape_internal(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let decoded = tail
            .find(';')
            .filter(|&end| end <= 12)
            .and_then(|end| decode_entity(&tail[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn json_format_internal(input: &str, indent: usize) -> Result<String> {
    if !matches!(indent, 2 | 4) {
        return Err(ToolError::invalid("indent must be 2 or 4"));
    }
    let value: Value = serde_json::from_str(input)?;
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|err| ToolError::Decode(err.to_string()))
}

pub fn json_minify_internal(input: &str) -> Result<String> {
    let value: Value = serde_json::from_str(input)?;
    Ok(serde_json::to_string(&value)?)
}

#[derive(Debug, Serialize, PartialEq)]
pub struct JsonValidation {
    pub valid: bool,
    pub error: Option<String>,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

pub fn json_validate_internal(input: &str) -> JsonValidation {
    match serde_json::from_str::<Value>(input) {
        Ok(_) => JsonValidation {
            valid: true,
            error: None,
            line: None,
            column: None,
        },
        Err(err) => JsonValidation {
            valid: false,
            line: Some(err.line()),
            column: Some(err.column()),
            error: Some(err.to_string()),
        },
    }
}

pub fn hash_digest(algorithm: &str, data: &[u8]) -> Result<String> {
    Ok(match algorithm.trim().to_ascii_lowercase().replace('-', "").as_str() {
        "md5" => hex::encode(Md5::digest(data)),
        "sha1" => hex::encode(Sha1::digest(data)),
        "sha256" => hex::encode(Sha256::digest(data)),
        "sha384" => hex::encode(Sha384::digest(data)),
        "sha512" => hex::encode(Sha512::digest(data)),
        "crc32" => format!("{:08x}", crc32fast::hash(data)),
        other => return Err(ToolError::unsupported(format!("hash algorithm: {other}"))),
    })
}

pub fn hash_all(data: &[u8]) -> BTreeMap<&'static str, String> {
    let mut map = BTreeMap::new();
    map.insert("md5", hex::encode(Md5::digest(data)));
    map.insert("sha1", hex::encode(Sha1::digest(data)));
    map.insert("sha256", hex::encode(Sha256::digest(data)));
    map.insert("sha384", hex::encode(Sha384::digest(data)));
    map.insert("sha512", hex::encode(Sha512::digest(data)));
    map.insert("crc32", format!("{:08x}", crc32fast::hash(data)));
    map
}

#[wasm_bindgen]
pub fn base64_encode(text: &str, url_safe: bool, pad: bool) -> String {
    base64_encode_internal(text, url_safe, pad)
}

#[wasm_bindgen]
pub fn base64_decode(input: &str) -> Result<String, JsValue> {
    respond_text("base64 decoder", base64_decode_internal(input))
}

#[wasm_bindgen]
pub fn url_encode(input: &str) -> String {
    url_encode_internal(input)
}

#[wasm_bindgen]
pub fn url_decode(input: &str) -> Result<String, JsValue> {
    respond_text("URL decoder", url_decode_internal(input))
}

#[wasm_bindgen]
pub fn html_escape(input: &str) -> String {
    html_escape_internal(input)
}

#[wasm_bindgen]
pub fn html_unescape(input: &str) -> String {
    html_unescape_internal(input)
}

#[wasm_bindgen]
pub fn json_format(input: &str, indent: usize) -> Result<String, JsValue> {
    respond_text("JSON formatter", json_format_internal(input, indent))
}

#[wasm_bindgen]
pub fn json_minify(input: &str) -> Result<String, JsValue> {
    respond_text("JSON minifier", json_minify_internal(input))
}

#[wasm_bindgen]
pub fn json_validate(input: &str) -> Result<JsValue, JsValue> {
    respond("JSON validator", Ok(json_validate_internal(input)))
}

#[wasm_bindgen]
pub fn hash_text(algorithm: &str, text: &str) -> Result<String, JsValue> {
    respond_text("hash generator", hash_digest(algorithm, text.as_bytes()))
}

#[wasm_bindgen]
pub fn hash_text_all(text: &str) -> Result<JsValue, JsValue> {
    respond("hash generator", Ok(hash_all(text.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_variants() {
        assert_eq!(base64_encode_internal("hi?>", false, true), "aGk/Pg==");
        assert_eq!(base64_encode_internal("hi?>", true, false), "aGk_Pg");
        assert_eq!(base64_decode_internal("aGk/Pg==").unwrap(), "hi?>");
        assert_eq!(base64_decode_internal("aGk_Pg").unwrap(), "hi?>");
        assert_eq!(base64_decode_internal(" aGVs\nbG8= ").unwrap(), "hello");
        assert!(base64_decode_internal("a").is_err());
    }

    #[test]
    fn url_encoding_uses_plus_for_spaces() {
        assert_eq!(url_encode_internal("a b&c=d"), "a+b%26c%3Dd");
        assert_eq!(url_decode_internal("a+b%26c%3Dd").unwrap(), "a b&c=d");
        assert!(url_decode_internal("%FF").is_err());
    }

    #[test]
    fn html_entities() {
        assert_eq!(
            html_escape_internal(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(
            html_unescape_internal("&lt;p&gt; &#65;&#x42; &copy; &bogus; & done"),
            "<p> AB © &bogus; & done"
        );
    }

    #[test]
    fn json_format_and_minify_keep_key_order() {
        let input = r#"{"b":1,"a":[true,null]}"#;
        assert_eq!(
            json_format_internal(input, 2).unwrap(),
            "{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}"
        );
        assert!(json_format_internal(input, 4).unwrap().contains("\n    \"b\": 1"));
        assert!(json_format_internal(input, 3).is_err());
        assert_eq!(json_minify_internal("{ \"b\" : 1 ,\n \"a\": 2 }").unwrap(), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn json_validation_reports_position() {
        assert!(json_validate_internal("[1, 2]").valid);
        let report = json_validate_internal("{\n  \"a\": 1,\n}");
        assert!(!report.valid);
        assert_eq!(report.line, Some(3));
        assert_eq!(report.column, Some(1));
    }

    #[test]
    fn digests_of_abc() {
        let digests = hash_all(b"abc");
        assert_eq!(digests["md5"], "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(digests["sha1"], "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(
            digests["sha256"],
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digests["crc32"], "352441c2");
        assert_eq!(hash_digest("SHA-256", b"abc").unwrap(), digests["sha256"]);
        assert!(hash_digest("whirlpool", b"abc").is_err());
    }
}
