//! Regex tester: lists matches with capture groups and performs replacements.
//!
//! Offsets are reported in UTF-16 code units so the page can highlight
//! matches with `String.prototype.slice` directly.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::{respond, respond_text};

const MAX_MATCHES: usize = 1000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Flags {
    global: bool,
    case_insensitive: bool,
    multi_line: bool,
    dot_all: bool,
    extended: bool,
    ungreedy: bool,
}

impl Flags {
    fn parse(input: &str) -> Result<Self> {
        let mut flags = Self::default();
        for ch in input.chars().filter(|ch| !ch.is_whitespace()) {
            match ch {
                'g' => flags.global = true,
                'i' => flags.case_insensitive = true,
                'm' => flags.multi_line = true,
                's' => flags.dot_all = true,
                'x' => flags.extended = true,
                'U' => flags.ungreedy = true,
                // Accepted for parity with JavaScript; the engine is always Unicode-aware.
                'u' => {}
                other => return Err(ToolError::invalid(format!("unknown regex flag '{other}'"))),
            }
        }
        Ok(flags)
    }
}

fn build_regex(pattern: &str, flags: Flags) -> Result<Regex> {
    if pattern.is_empty() {
        return Err(ToolError::invalid("pattern is empty"));
    }
    RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .multi_line(flags.multi_line)
        .dot_matches_new_line(flags.dot_all)
        .ignore_whitespace(flags.extended)
        .swap_greed(flags.ungreedy)
        .build()
        .map_err(|err| ToolError::invalid(format!("invalid pattern: {err}")))
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MatchInfo {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub groups: Vec<Option<String>>,
    pub named: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegexReport {
    pub count: usize,
    pub truncated: bool,
    pub group_names: Vec<String>,
    pub matches: Vec<MatchInfo>,
}

fn utf16_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].encode_utf16().count()
}

pub fn test_regex_internal(pattern: &str, flags: &str, text: &str) -> Result<RegexReport> {
    let flags = Flags::parse(flags)?;
    let re = build_regex(pattern, flags)?;
    let group_names: Vec<String> = re
        .capture_names()
        .flatten()
        .map(str::to_string)
        .collect();
    let limit = if flags.global { MAX_MATCHES } else { 1 };
    let mut matches = Vec::new();
    let mut truncated = false;
    for caps in re.captures_iter(text) {
        if matches.len() == limit {
            truncated = flags.global;
            break;
        }
        let Some(whole) = caps.get(0) else {
            continue;
        };
        let groups = caps
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()))
            .collect();
        let named = group_names
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    caps.name(name).map(|m| m.as_str().to_string()),
                )
            })
            .collect();
        matches.push(MatchInfo {
            start: utf16_offset(text, whole.start()),
            end: utf16_offset(text, whole.end()),
            text: whole.as_str().to_string(),
            groups,
            named,
        });
    }
    Ok(RegexReport {
        count: matches.len(),
        truncated,
        group_names,
        matches,
    })
}

pub fn replace_regex_internal(
    pattern: &str,
    flags: &str,
    text: &str,
    replacement: &str,
) -> Result<String> {
    let flags = Flags::parse(flags)?;
    let re = build_regex(pattern, flags)?;
    let replaced = if flags.global {
        re.replace_all(text, replacement)
    } else {
        re.replace(text, replacement)
    };
    Ok(replaced.into_owned())
}

#[wasm_bindgen]
pub fn test_regex(pattern: &str, flags: &str, text: &str) -> Result<JsValue, JsValue> {
    respond("regex tester", test_regex_internal(pattern, flags, text))
}

#[wasm_bindgen]
pub fn replace_regex(
    pattern: &str,
    flags: &str,
    text: &str,
    replacement: &str,
) -> Result<String, JsValue> {
    respond_text(
        "regex replace",
        replace_regex_internal(pattern, flags, text, replacement),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flag_returns_every_match() {
        let report = test_regex_internal(r"\d+", "g", "a1 b22 c333").unwrap();
        assert_eq!(report.count, 3);
        let texts: Vec<&str> = report.matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["1", "22", "333"]);
        assert_eq!((report.matches[1].start, report.matches[1].end), (4, 6));
    }

    #[test]
    fn without_global_only_first_match() {
        let report = test_regex_internal(r"\d+", "", "a1 b22").unwrap();
        assert_eq!(report.count, 1);
        assert!(!report.truncated);
    }

    #[test]
    fn captures_numbered_and_named_groups() {
        let report =
            test_regex_internal(r"(?P<user>\w+)@(\w+)?\.com", "g", "ann@.com bob@site.com").unwrap();
        assert_eq!(report.group_names, vec!["user".to_string()]);
        assert_eq!(report.matches[0].groups, vec![Some("ann".into()), None]);
        assert_eq!(
            report.matches[1].named.get("user"),
            Some(&Some("bob".to_string()))
        );
    }

    #[test]
    fn offsets_use_utf16_units() {
        let report = test_regex_internal("b", "g", "😀b").unwrap();
        assert_eq!((report.matches[0].start, report.matches[0].end), (2, 3));
    }

    #[test]
    fn case_insensitive_flag_applies() {
        let report = test_regex_internal("hello", "gi", "Hello HELLO").unwrap();
        assert_eq!(report.count, 2);
    }

    #[test]
    fn replace_respects_global_flag() {
        assert_eq!(
            replace_regex_internal(r"(\w+)@(\w+)", "", "a@b c@d", "$2@$1").unwrap(),
            "b@a c@d"
        );
        assert_eq!(
            replace_regex_internal(r"(?P<n>\d)", "g", "1-2", "<${n}>").unwrap(),
            "<1>-<2>"
        );
    }

    #[test]
    fn invalid_pattern_and_flags_are_reported() {
        let err = test_regex_internal("(", "g", "x").unwrap_err();
        assert!(err.to_string().contains("invalid pattern"));
        assert!(test_regex_internal("a", "q", "a").is_err());
    }
}
