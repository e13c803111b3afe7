//! Lorem ipsum placeholder text.

use crate::error::{Result, ToolError};
use crate::random;

const OPENING: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit";

const WORDS: &[&str] = &[
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipiscing", "elit", "sed", "do",
    "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna", "aliqua", "enim",
    "ad", "minim", "veniam", "quis", "nostrud", "exercitation", "ullamco", "laboris", "nisi",
    "aliquip", "ex", "ea", "commodo", "consequat", "duis", "aute", "irure", "in",
    "reprehenderit", "voluptate", "velit", "esse", "cillum", "eu", "fugiat", "nulla",
    "pariatur", "excepteur", "sint", "occaecat", "cupidatat", "non", "proident", "sunt",
    "culpa", "qui", "officia", "deserunt", "mollit", "anim", "id", "est", "laborum",
];

const MAX_COUNT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoremUnit {
    Words,
    Sentences,
    Paragraphs,
}

impl LoremUnit {
    pub fn parse(input: &str) -> Result<Self> {
        Ok(match input.trim().to_ascii_lowercase().as_str() {
            "word" | "words" => Self::Words,
            "sentence" | "sentences" => Self::Sentences,
            "paragraph" | "paragraphs" => Self::Paragraphs,
            other => return Err(ToolError::unsupported(format!("lorem unit: {other}"))),
        })
    }
}

fn random_words(count: usize) -> Result<Vec<&'static str>> {
    (0..count).map(|_| random::choose(WORDS)).collect()
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn sentence() -> Result<String> {
    let length = 6 + random::random_below(10)? as usize;
    let mut words: Vec<String> = random_words(length)?.into_iter().map(str::to_string).collect();
    // Longer sentences get one comma somewhere in the middle.
    if length > 8 {
        let at = 3 + random::random_below((length - 6) as u64)? as usize;
        words[at].push(',');
    }
    Ok(format!("{}.", capitalize_first(&words.join(" "))))
}

fn sentences(count: usize) -> Result<Vec<String>> {
    (0..count).map(|_| sentence()).collect()
}

fn paragraph() -> Result<String> {
    let count = 3 + random::random_below(4)? as usize;
    Ok(sentences(count)?.join(" "))
}

pub fn lorem_ipsum(unit: LoremUnit, count: usize, start_with_lorem: bool) -> Result<String> {
    if !(1..=MAX_COUNT).contains(&count) {
        return Err(ToolError::invalid(format!(
            "count must be between 1 and {MAX_COUNT}"
        )));
    }
    let mut text = match unit {
        LoremUnit::Words => {
            let mut words = random_words(count)?;
            if start_with_lorem {
                for (slot, word) in words.iter_mut().zip(["lorem", "ipsum", "dolor", "sit", "amet"]) {
                    *slot = word;
                }
            }
            return Ok(capitalize_first(&words.join(" ")));
        }
        LoremUnit::Sentences => sentences(count)?.join(" "),
        LoremUnit::Paragraphs => (0..count)
            .map(|_| paragraph())
            .collect::<Result<Vec<_>>>()?
            .join("\n\n"),
    };
    if start_with_lorem {
        text = format!("{OPENING}. {text}");
        // Keep the requested sentence count exact.
        if unit == LoremUnit::Sentences {
            if let Some(cut) = text.rfind(". ") {
                if count == 1 {
                    text = format!("{OPENING}.");
                } else {
                    text.truncate(cut + 1);
                }
            }
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_are_exact_and_start_with_lorem() {
        let text = lorem_ipsum(LoremUnit::Words, 12, true).unwrap();
        assert_eq!(text.split_whitespace().count(), 12);
        assert!(text.starts_with("Lorem ipsum dolor sit amet"));
    }

    #[test]
    fn short_word_request_keeps_prefix_of_opening() {
        assert_eq!(lorem_ipsum(LoremUnit::Words, 2, true).unwrap(), "Lorem ipsum");
    }

    #[test]
    fn sentence_count_is_exact() {
        for start in [false, true] {
            let text = lorem_ipsum(LoremUnit::Sentences, 4, start).unwrap();
            assert_eq!(text.matches('.').count(), 4, "{text}");
            assert!(text.ends_with('.'));
        }
        assert_eq!(
            lorem_ipsum(LoremUnit::Sentences, 1, true).unwrap(),
            format!("{OPENING}.")
        );
    }

    #[test]
    fn paragraphs_are_blank_line_separated() {
        let text = lorem_ipsum(LoremUnit::Paragraphs, 3, false).unwrap();
        assert_eq!(text.split("\n\n").count(), 3);
    }

    #[test]
    fn count_is_bounded() {
        assert!(lorem_ipsum(LoremUnit::Words, 0, false).is_err());
        assert!(lorem_ipsum(LoremUnit::Words, 101, false).is_err());
        assert!(LoremUnit::parse("chapters").is_err());
    }
}
