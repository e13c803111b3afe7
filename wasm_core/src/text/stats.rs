//! Word counter and readability scoring.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{Result, ToolError};

const READING_WPM: f64 = 200.0;
const SPEAKING_WPM: f64 = 130.0;
const TOP_WORDS: usize = 10;

#[derive(Debug, Serialize, PartialEq)]
pub struct WordFrequency {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TextStatistics {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
    pub lines: usize,
    pub average_word_length: f64,
    pub reading_seconds: u64,
    pub speaking_seconds: u64,
    pub top_words: Vec<WordFrequency>,
}

fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|ch: char| !ch.is_alphanumeric()))
        .filter(|token| !token.is_empty())
        .collect()
}

fn count_sentences(text: &str) -> usize {
    let mut count = 0;
    let mut in_sentence = false;
    for ch in text.chars() {
        if matches!(ch, '.' | '!' | '?') {
            if in_sentence {
                count += 1;
            }
            in_sentence = false;
        } else if ch.is_alphanumeric() {
            in_sentence = true;
        }
    }
    // Trailing text without terminal punctuation still counts.
    if in_sentence {
        count += 1;
    }
    count
}

fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            count += 1;
            in_paragraph = true;
        }
    }
    count
}

fn minutes_to_seconds(words: usize, wpm: f64) -> u64 {
    (words as f64 / wpm * 60.0).ceil() as u64
}

pub fn text_statistics(text: &str) -> TextStatistics {
    let tokens = words(text);
    let letters: usize = tokens.iter().map(|word| word.chars().count()).sum();
    let mut frequencies: HashMap<String, usize> = HashMap::new();
    for word in &tokens {
        *frequencies.entry(word.to_lowercase()).or_default() += 1;
    }
    let mut top: Vec<WordFrequency> = frequencies
        .into_iter()
        .map(|(word, count)| WordFrequency { word, count })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));
    top.truncate(TOP_WORDS);
    let average_word_length = if tokens.is_empty() {
        0.0
    } else {
        (letters as f64 / tokens.len() as f64 * 100.0).round() / 100.0
    };
    TextStatistics {
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|ch| !ch.is_whitespace()).count(),
        words: tokens.len(),
        sentences: count_sentences(text),
        paragraphs: count_paragraphs(text),
        lines: if text.is_empty() { 0 } else { text.lines().count() },
        average_word_length,
        reading_seconds: minutes_to_seconds(tokens.len(), READING_WPM),
        speaking_seconds: minutes_to_seconds(tokens.len(), SPEAKING_WPM),
        top_words: top,
    }
}

/// Heuristic English syllable count: vowel groups, minus a silent final `e`
/// (but not `-le`), at least one per word.
pub fn count_syllables(word: &str) -> usize {
    let lower: Vec<char> = word
        .to_lowercase()
        .chars()
        .filter(|ch| ch.is_ascii_alphabetic())
        .collect();
    if lower.is_empty() {
        return 0;
    }
    if lower.len() <= 3 {
        return 1;
    }
    let is_vowel = |ch: char| matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let mut count = 0;
    let mut prev_vowel = false;
    for &ch in &lower {
        let vowel = is_vowel(ch);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    let n = lower.len();
    if lower[n - 1] == 'e' && !(lower[n - 2] == 'l' && !is_vowel(lower[n - 3])) {
        count -= usize::from(count > 1);
    }
    if n > 2 && lower[n - 2..] == ['e', 'd'] && !matches!(lower[n - 3], 't' | 'd') {
        count -= usize::from(count > 1);
    }
    count.max(1)
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReadabilityReport {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub label: String,
}

fn ease_label(score: f64) -> &'static str {
    match score {
        s if s >= 90.0 => "Very easy",
        s if s >= 80.0 => "Easy",
        s if s >= 70.0 => "Fairly easy",
        s if s >= 60.0 => "Standard",
        s if s >= 50.0 => "Fairly difficult",
        s if s >= 30.0 => "Difficult",
        _ => "Very confusing",
    }
}

pub fn readability(text: &str) -> Result<ReadabilityReport> {
    let tokens = words(text);
    if tokens.is_empty() {
        return Err(ToolError::invalid("text contains no words"));
    }
    let sentences = count_sentences(text).max(1);
    let syllables: usize = tokens.iter().map(|word| count_syllables(word)).sum();
    let w = tokens.len() as f64;
    let words_per_sentence = w / sentences as f64;
    let syllables_per_word = syllables as f64 / w;
    let ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;
    let grade = 0.39 * words_per_sentence + 11.8 * syllables_per_word - 15.59;
    let ease = (ease * 10.0).round() / 10.0;
    Ok(ReadabilityReport {
        words: tokens.len(),
        sentences,
        syllables,
        flesch_reading_ease: ease,
        flesch_kincaid_grade: (grade * 10.0).round() / 10.0,
        label: ease_label(ease).into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_count_basic_units() {
        let text = "Hello world. This is a test!\n\nSecond paragraph here";
        let stats = text_statistics(text);
        assert_eq!(stats.words, 9);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.lines, 3);
        assert_eq!(stats.reading_seconds, 3);
    }

    #[test]
    fn statistics_rank_frequent_words() {
        let stats = text_statistics("the cat and the hat and THE bat");
        assert_eq!(stats.top_words[0], WordFrequency { word: "the".into(), count: 3 });
        assert_eq!(stats.top_words[1], WordFrequency { word: "and".into(), count: 2 });
    }

    #[test]
    fn empty_text_has_zero_counts() {
        let stats = text_statistics("");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.lines, 0);
        assert_eq!(stats.average_word_length, 0.0);
    }

    #[test]
    fn syllable_heuristic() {
        assert_eq!(count_syllables("cat"), 1);
        assert_eq!(count_syllables("table"), 2);
        assert_eq!(count_syllables("make"), 1);
        assert_eq!(count_syllables("beautiful"), 3);
        assert_eq!(count_syllables("jumped"), 1);
        assert_eq!(count_syllables("wanted"), 2);
    }

    #[test]
    fn readability_of_simple_text_is_easy() {
        let report = readability("The cat sat on the mat. The dog ran.").unwrap();
        assert_eq!(report.words, 9);
        assert_eq!(report.sentences, 2);
        assert_eq!(report.syllables, 9);
        // 206.835 - 1.015 * 4.5 - 84.6 * 1.0
        assert_eq!(report.flesch_reading_ease, 117.7);
        assert_eq!(report.flesch_kincaid_grade, -2.0);
        assert_eq!(report.label, "Very easy");
    }

    #[test]
    fn readability_requires_words() {
        assert!(readability("  ...  ").is_err());
    }
}
