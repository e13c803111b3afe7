//! Case converter and slug generator.

use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Upper,
    Lower,
    Title,
    Sentence,
    Camel,
    Pascal,
    Snake,
    Kebab,
    Constant,
    Dot,
    Alternating,
    Inverse,
}

impl CaseMode {
    pub fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().to_ascii_lowercase().replace(['-', '_', ' '], "");
        Ok(match normalized.as_str() {
            "upper" | "uppercase" => Self::Upper,
            "lower" | "lowercase" => Self::Lower,
            "title" | "titlecase" => Self::Title,
            "sentence" | "sentencecase" => Self::Sentence,
            "camel" | "camelcase" => Self::Camel,
            "pascal" | "pascalcase" => Self::Pascal,
            "snake" | "snakecase" => Self::Snake,
            "kebab" | "kebabcase" => Self::Kebab,
            "constant" | "screamingsnake" => Self::Constant,
            "dot" | "dotcase" => Self::Dot,
            "alternating" => Self::Alternating,
            "inverse" | "toggle" => Self::Inverse,
            _ => return Err(ToolError::unsupported(format!("case mode: {input}"))),
        })
    }
}

pub fn convert_case(text: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::Upper => text.to_uppercase(),
        CaseMode::Lower => text.to_lowercase(),
        CaseMode::Title => map_words_preserving_spacing(text, capitalize),
        CaseMode::Sentence => sentence_case(text),
        CaseMode::Camel => {
            let words = identifier_words(text);
            let mut out = String::new();
            for (idx, word) in words.iter().enumerate() {
                if idx == 0 {
                    out.push_str(&word.to_lowercase());
                } else {
                    out.push_str(&capitalize(word));
                }
            }
            out
        }
        CaseMode::Pascal => identifier_words(text)
            .iter()
            .map(|word| capitalize(word))
            .collect(),
        CaseMode::Snake => join_lower(text, "_"),
        CaseMode::Kebab => join_lower(text, "-"),
        CaseMode::Dot => join_lower(text, "."),
        CaseMode::Constant => join_lower(text, "_").to_uppercase(),
        CaseMode::Alternating => {
            let mut upper = false;
            text.chars()
                .map(|ch| {
                    if !ch.is_alphabetic() {
                        return ch.to_string();
                    }
                    upper = !upper;
                    if upper {
                        ch.to_lowercase().to_string()
                    } else {
                        ch.to_uppercase().to_string()
                    }
                })
                .collect()
        }
        CaseMode::Inverse => text
            .chars()
            .map(|ch| {
                if ch.is_uppercase() {
                    ch.to_lowercase().to_string()
                } else {
                    ch.to_uppercase().to_string()
                }
            })
            .collect(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn map_words_preserving_spacing(text: &str, f: fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !word.is_empty() {
                out.push_str(&f(&word));
                word.clear();
            }
            out.push(ch);
        } else {
            word.push(ch);
        }
    }
    if !word.is_empty() {
        out.push_str(&f(&word));
    }
    out
}

fn sentence_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start_of_sentence = true;
    for ch in text.to_lowercase().chars() {
        if start_of_sentence && ch.is_alphabetic() {
            out.extend(ch.to_uppercase());
            start_of_sentence = false;
        } else {
            out.push(ch);
        }
        if matches!(ch, '.' | '!' | '?') {
            start_of_sentence = true;
        }
    }
    out
}

fn join_lower(text: &str, separator: &str) -> String {
    identifier_words(text)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Words of an identifier-ish string: splits on any non-alphanumeric
/// character and then on case/digit boundaries.
pub fn identifier_words(text: &str) -> Vec<String> {
    text.split(|ch: char| !ch.is_alphanumeric())
        .flat_map(split_words)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Splits a token into word-like segments using case changes and digit runs,
/// keeping acronyms together (`HTTPServer` → `HTTP`, `Server`).
pub fn split_words(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut chars = s.chars().peekable();
    let Some(first) = chars.next() else {
        return parts;
    };
    let mut current = String::from(first);
    while let Some(ch) = chars.next() {
        let prev = current.chars().last().unwrap_or(ch);
        let next_lower = chars.peek().is_some_and(|c| c.is_lowercase());
        let boundary = if ch.is_uppercase() {
            prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
        } else if ch.is_ascii_digit() {
            !prev.is_ascii_digit() && !prev.is_uppercase()
        } else {
            prev.is_ascii_digit()
        };
        if boundary {
            parts.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn fold_accent(ch: char) -> Option<&'static str> {
    Some(match ch {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ł' => "l",
        'ñ' | 'ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'œ' => "oe",
        'ß' => "ss",
        'ś' | 'š' => "s",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    })
}

pub fn slugify(text: &str, separator: &str) -> String {
    let separator = if separator.is_empty() { "-" } else { separator };
    let mut slug = String::new();
    let mut pending_separator = false;
    for ch in text.to_lowercase().chars() {
        let piece = if ch.is_ascii_alphanumeric() {
            Some(ch.to_string())
        } else {
            fold_accent(ch).map(str::to_string)
        };
        match piece {
            Some(piece) => {
                if pending_separator && !slug.is_empty() {
                    slug.push_str(separator);
                }
                pending_separator = false;
                slug.push_str(&piece);
            }
            None => pending_separator = true,
        }
    }
    slug
}
