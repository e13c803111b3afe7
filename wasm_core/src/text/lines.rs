//! Line-oriented text utilities: sort, dedupe, reverse, trim, shuffle.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Deserialize;

use crate::error::{Result, ToolError};
use crate::random;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOp {
    SortAsc,
    SortDesc,
    Dedupe,
    Reverse,
    RemoveEmpty,
    Trim,
    Shuffle,
}

impl LineOp {
    pub fn parse(input: &str) -> Result<Self> {
        Ok(match input.trim().to_ascii_lowercase().as_str() {
            "sort" | "sort_asc" | "asc" => Self::SortAsc,
            "sort_desc" | "desc" => Self::SortDesc,
            "dedupe" | "unique" => Self::Dedupe,
            "reverse" => Self::Reverse,
            "remove_empty" => Self::RemoveEmpty,
            "trim" => Self::Trim,
            "shuffle" => Self::Shuffle,
            other => return Err(ToolError::unsupported(format!("line operation: {other}"))),
        })
    }
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LineOptions {
    pub case_insensitive: bool,
    /// Compare embedded digit runs numerically ("item2" < "item10").
    pub natural: bool,
}

pub fn process_lines(text: &str, op: LineOp, options: LineOptions) -> Result<String> {
    let mut lines: Vec<&str> = text.lines().collect();
    match op {
        LineOp::SortAsc | LineOp::SortDesc => {
            lines.sort_by(|a, b| compare_lines(a, b, options));
            if op == LineOp::SortDesc {
                lines.reverse();
            }
        }
        LineOp::Dedupe => {
            let mut seen = HashSet::new();
            lines.retain(|line| {
                let key = if options.case_insensitive {
                    line.to_lowercase()
                } else {
                    line.to_string()
                };
                seen.insert(key)
            });
        }
        LineOp::Reverse => lines.reverse(),
        LineOp::RemoveEmpty => lines.retain(|line| !line.trim().is_empty()),
        LineOp::Trim => return Ok(lines.iter().map(|l| l.trim()).collect::<Vec<_>>().join("\n")),
        LineOp::Shuffle => random::shuffle(&mut lines)?,
    }
    Ok(lines.join("\n"))
}

fn compare_lines(a: &str, b: &str, options: LineOptions) -> Ordering {
    let (a, b) = if options.case_insensitive {
        (a.to_lowercase(), b.to_lowercase())
    } else {
        (a.to_string(), b.to_string())
    };
    if options.natural {
        natural_cmp(&a, &b)
    } else {
        a.cmp(&b)
    }
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();
    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let take_number = |iter: &mut std::iter::Peekable<std::str::Chars>| {
                    let mut digits = String::new();
                    while let Some(ch) = iter.peek().copied().filter(char::is_ascii_digit) {
                        digits.push(ch);
                        iter.next();
                    }
                    digits
                };
                let na = take_number(&mut left);
                let nb = take_number(&mut right);
                let na = na.trim_start_matches('0');
                let nb = nb.trim_start_matches('0');
                let ordering = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(&y);
                }
                left.next();
                right.next();
            }
        }
    }
}

/// Reverses by Unicode scalar value.
pub fn reverse_text(text: &str) -> String {
    text.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_naturally_when_requested() {
        let text = "item10\nitem2\nitem1";
        let plain = process_lines(text, LineOp::SortAsc, LineOptions::default()).unwrap();
        assert_eq!(plain, "item1\nitem10\nitem2");
        let natural = process_lines(
            text,
            LineOp::SortAsc,
            LineOptions {
                natural: true,
                ..LineOptions::default()
            },
        )
        .unwrap();
        assert_eq!(natural, "item1\nitem2\nitem10");
    }

    #[test]
    fn sort_desc_reverses_order() {
        let out = process_lines("b\na\nc", LineOp::SortDesc, LineOptions::default()).unwrap();
        assert_eq!(out, "c\nb\na");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let options = LineOptions {
            case_insensitive: true,
            ..LineOptions::default()
        };
        let out = process_lines("Apple\nbanana\napple\nBanana\ncherry", LineOp::Dedupe, options)
            .unwrap();
        assert_eq!(out, "Apple\nbanana\ncherry");
    }

    #[test]
    fn remove_empty_and_trim() {
        let text = "  a  \n\n   \nb";
        assert_eq!(
            process_lines(text, LineOp::RemoveEmpty, LineOptions::default()).unwrap(),
            "  a  \nb"
        );
        assert_eq!(
            process_lines(text, LineOp::Trim, LineOptions::default()).unwrap(),
            "a\n\n\nb"
        );
    }

    #[test]
    fn shuffle_preserves_lines() {
        let out = process_lines("1\n2\n3\n4", LineOp::Shuffle, LineOptions::default()).unwrap();
        let mut lines: Vec<&str> = out.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn reverse_text_handles_multibyte() {
        assert_eq!(reverse_text("héllo"), "olléh");
    }
}
