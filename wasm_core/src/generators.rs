//! Random generators: test card numbers, passwords, UUIDs and numbers.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Builder;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::{options_from_js, random, respond};

const MAX_CARDS: usize = 100;
const MAX_PASSWORDS: usize = 50;
const MAX_UUIDS: usize = 500;
const MAX_NUMBERS: usize = 1000;
const AMBIGUOUS: &str = "O0Il1|";

/// True when the digit string carries a valid Luhn checksum.
pub fn luhn_checksum_valid(number: &str) -> bool {
    let digits: Vec<u32> = number.chars().filter_map(|ch| ch.to_digit(10)).collect();
    if digits.len() < 2 || digits.len() != number.chars().count() {
        return false;
    }
    luhn_sum(&digits, false) % 10 == 0
}

/// The digit that makes `partial` pass the Luhn check when appended.
pub fn luhn_check_digit(partial: &str) -> Result<u32> {
    let digits: Vec<u32> = partial
        .chars()
        .map(|ch| {
            ch.to_digit(10)
                .ok_or_else(|| ToolError::invalid(format!("not a digit: {ch}")))
        })
        .collect::<Result<_>>()?;
    if digits.is_empty() {
        return Err(ToolError::invalid("number is empty"));
    }
    Ok((10 - luhn_sum(&digits, true) % 10) % 10)
}

/// Sums digits right to left, doubling every second one. `double_first`
/// doubles the rightmost digit, which is the case when the check digit is
/// still missing.
fn luhn_sum(digits: &[u32], double_first: bool) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, &digit)| {
            if (idx % 2 == 0) == double_first {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Jcb,
    Diners,
}

impl CardBrand {
    pub fn parse(input: &str) -> Result<Self> {
        Ok(match input.trim().to_ascii_lowercase().replace([' ', '_'], "").as_str() {
            "visa" => Self::Visa,
            "mastercard" | "mc" => Self::Mastercard,
            "amex" | "americanexpress" => Self::Amex,
            "discover" => Self::Discover,
            "jcb" => Self::Jcb,
            "diners" | "dinersclub" => Self::Diners,
            _ => return Err(ToolError::unsupported(format!("card brand: {input}"))),
        })
    }

    fn length(self) -> usize {
        match self {
            Self::Amex => 15,
            Self::Diners => 14,
            _ => 16,
        }
    }

    fn prefix(self) -> Result<String> {
        let prefix = match self {
            Self::Visa => 4,
            Self::Mastercard => {
                if random::random_below(2)? == 0 {
                    random::random_in_range(51, 55)?
                } else {
                    random::random_in_range(2221, 2720)?
                }
            }
            Self::Amex => random::choose(&[34, 37])?,
            Self::Discover => random::choose(&[6011, 65])?,
            Self::Jcb => random::random_in_range(3528, 3589)?,
            Self::Diners => 36,
        };
        Ok(prefix.to_string())
    }

    pub fn detect(digits: &str) -> Option<Self> {
        let prefix = |len: usize| digits.get(..len).and_then(|p| p.parse::<u32>().ok());
        match (prefix(1), prefix(2), prefix(4)) {
            (Some(4), _, _) => Some(Self::Visa),
            (_, Some(34 | 37), _) => Some(Self::Amex),
            (_, Some(51..=55), _) | (_, _, Some(2221..=2720)) => Some(Self::Mastercard),
            (_, Some(65), _) | (_, _, Some(6011)) => Some(Self::Discover),
            (_, _, Some(3528..=3589)) => Some(Self::Jcb),
            (_, Some(36 | 38), _) | (_, _, Some(3000..=3059)) => Some(Self::Diners),
            _ => None,
        }
    }
}

pub fn generate_card_number(brand: CardBrand) -> Result<String> {
    let mut number = brand.prefix()?;
    while number.len() < brand.length() - 1 {
        number.push(char::from(b'0' + random::random_below(10)? as u8));
    }
    let check = luhn_check_digit(&number)?;
    number.push(char::from(b'0' + check as u8));
    Ok(number)
}

pub fn generate_cards_internal(brand: &str, count: usize) -> Result<Vec<String>> {
    let brand = CardBrand::parse(brand)?;
    if !(1..=MAX_CARDS).contains(&count) {
        return Err(ToolError::invalid(format!(
            "count must be between 1 and {MAX_CARDS}"
        )));
    }
    (0..count).map(|_| generate_card_number(brand)).collect()
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardValidation {
    pub number: String,
    pub valid: bool,
    pub brand: Option<CardBrand>,
    pub formatted: String,
    pub length: usize,
}

fn group_digits(digits: &str, brand: Option<CardBrand>) -> String {
    let groups: &[usize] = match brand {
        Some(CardBrand::Amex) => &[4, 6, 5],
        Some(CardBrand::Diners) if digits.len() == 14 => &[4, 6, 4],
        _ => &[4, 4, 4, 4, 4],
    };
    let mut out = Vec::new();
    let mut rest = digits;
    for &size in groups {
        if rest.is_empty() {
            break;
        }
        let (head, tail) = rest.split_at(size.min(rest.len()));
        out.push(head);
        rest = tail;
    }
    if !rest.is_empty() {
        out.push(rest);
    }
    out.join(" ")
}

pub fn validate_card_internal(input: &str) -> Result<CardValidation> {
    let digits: String = input
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '-'))
        .collect();
    if digits.is_empty() {
        return Err(ToolError::invalid("card number is empty"));
    }
    if !digits.chars().all(|ch| ch.is_ascii_digit()) {
        return Err(ToolError::invalid("card number may only contain digits"));
    }
    let brand = CardBrand::detect(&digits);
    Ok(CardValidation {
        valid: luhn_checksum_valid(&digits),
        formatted: group_digits(&digits, brand),
        length: digits.len(),
        brand,
        number: digits,
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordOptions {
    pub length: usize,
    pub count: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub digits: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for PasswordOptions {
    fn default() -> Self {
        Self {
            length: 16,
            count: 1,
            uppercase: true,
            lowercase: true,
            digits: true,
            symbols: true,
            exclude_ambiguous: false,
        }
    }
}

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{};:,.<>/?|~";

fn character_classes(options: &PasswordOptions) -> Vec<Vec<char>> {
    [
        (options.uppercase, UPPER),
        (options.lowercase, LOWER),
        (options.digits, DIGITS),
        (options.symbols, SYMBOLS),
    ]
    .into_iter()
    .filter(|(enabled, _)| *enabled)
    .map(|(_, set)| {
        set.chars()
            .filter(|ch| !(options.exclude_ambiguous && AMBIGUOUS.contains(*ch)))
            .collect()
    })
    .collect()
}

fn generate_password(classes: &[Vec<char>], length: usize) -> Result<String> {
    let pool: Vec<char> = classes.iter().flatten().copied().collect();
    // One from each enabled class first, then fill from the full pool.
    let mut chars = classes
        .iter()
        .map(|class| random::choose(class))
        .collect::<Result<Vec<char>>>()?;
    while chars.len() < length {
        chars.push(random::choose(&pool)?);
    }
    random::shuffle(&mut chars)?;
    Ok(chars.into_iter().collect())
}

pub fn generate_passwords_internal(options: &PasswordOptions) -> Result<Vec<String>> {
    if !(4..=128).contains(&options.length) {
        return Err(ToolError::invalid("length must be between 4 and 128"));
    }
    if !(1..=MAX_PASSWORDS).contains(&options.count) {
        return Err(ToolError::invalid(format!(
            "count must be between 1 and {MAX_PASSWORDS}"
        )));
    }
    let classes = character_classes(options);
    if classes.is_empty() {
        return Err(ToolError::invalid("select at least one character set"));
    }
    (0..options.count)
        .map(|_| generate_password(&classes, options.length))
        .collect()
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    pub length: usize,
    pub pool_size: usize,
    pub entropy_bits: f64,
    pub score: u8,
    pub label: String,
    pub feedback: Vec<String>,
}

pub fn password_strength_internal(password: &str) -> PasswordStrength {
    let length = password.chars().count();
    let has = |pred: fn(&char) -> bool| password.chars().any(|ch| pred(&ch));
    let has_upper = has(char::is_ascii_uppercase);
    let has_lower = has(char::is_ascii_lowercase);
    let has_digit = has(char::is_ascii_digit);
    let has_symbol = has(|ch| ch.is_ascii_punctuation() || *ch == ' ');
    let has_other = has(|ch| !ch.is_ascii());
    let pool_size = [
        (has_upper, 26usize),
        (has_lower, 26),
        (has_digit, 10),
        (has_symbol, 33),
        (has_other, 100),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, size)| size)
    .sum::<usize>();
    let entropy_bits = if pool_size == 0 {
        0.0
    } else {
        ((length as f64 * (pool_size as f64).log2()) * 10.0).round() / 10.0
    };
    let score = match entropy_bits {
        e if e < 28.0 => 0,
        e if e < 36.0 => 1,
        e if e < 60.0 => 2,
        e if e < 128.0 => 3,
        _ => 4,
    };
    let label = ["Very weak", "Weak", "Fair", "Strong", "Very strong"][score as usize];
    let mut feedback = Vec::new();
    if length < 12 {
        feedback.push("Use at least 12 characters".to_string());
    }
    if !has_upper {
        feedback.push("Add uppercase letters".to_string());
    }
    if !has_lower {
        feedback.push("Add lowercase letters".to_string());
    }
    if !has_digit {
        feedback.push("Add numbers".to_string());
    }
    if !has_symbol {
        feedback.push("Add symbols".to_string());
    }
    PasswordStrength {
        length,
        pool_size,
        entropy_bits,
        score,
        label: label.into(),
        feedback,
    }
}

pub fn generate_uuids_internal(count: usize, uppercase: bool) -> Result<Vec<String>> {
    if !(1..=MAX_UUIDS).contains(&count) {
        return Err(ToolError::invalid(format!(
            "count must be between 1 and {MAX_UUIDS}"
        )));
    }
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 16];
            random::fill_random(&mut bytes)?;
            // Sets the version 4 and RFC 4122 variant bits.
            let id = Builder::from_random_bytes(bytes).into_uuid().to_string();
            Ok(if uppercase { id.to_uppercase() } else { id })
        })
        .collect()
}

pub fn random_numbers_internal(min: i64, max: i64, count: usize, unique: bool) -> Result<Vec<i64>> {
    if min > max {
        return Err(ToolError::invalid("minimum must not exceed maximum"));
    }
    if !(1..=MAX_NUMBERS).contains(&count) {
        return Err(ToolError::invalid(format!(
            "count must be between 1 and {MAX_NUMBERS}"
        )));
    }
    if !unique {
        return (0..count).map(|_| random::random_in_range(min, max)).collect();
    }
    let span = (max as i128 - min as i128 + 1) as u128;
    if (count as u128) > span {
        return Err(ToolError::invalid(format!(
            "cannot draw {count} unique numbers from a range of {span}"
        )));
    }
    let mut seen = HashSet::with_capacity(count);
    let mut out = Vec::with_capacity(count);
    while out.len() < count {
        let value = random::random_in_range(min, max)?;
        if seen.insert(value) {
            out.push(value);
        }
    }
    Ok(out)
}

#[wasm_bindgen]
pub fn luhn_check(number: &str) -> bool {
    let digits: String = number.chars().filter(|ch| !matches!(ch, ' ' | '-')).collect();
    luhn_checksum_valid(&digits)
}

#[wasm_bindgen]
pub fn generate_cards(brand: &str, count: usize) -> Result<JsValue, JsValue> {
    respond("card generator", generate_cards_internal(brand, count))
}

#[wasm_bindgen]
pub fn validate_card(number: &str) -> Result<JsValue, JsValue> {
    respond("card validator", validate_card_internal(number))
}

#[wasm_bindgen]
pub fn generate_passwords(options: JsValue) -> Result<JsValue, JsValue> {
    let result = options_from_js::<PasswordOptions>(options)
        .and_then(|opts| generate_passwords_internal(&opts));
    respond("password generator", result)
}

#[wasm_bindgen]
pub fn password_strength(password: &str) -> Result<JsValue, JsValue> {
    respond("password strength", Ok(password_strength_internal(password)))
}

#[wasm_bindgen]
pub fn generate_uuids(count: usize, uppercase: bool) -> Result<JsValue, JsValue> {
    respond("uuid generator", generate_uuids_internal(count, uppercase))
}

#[wasm_bindgen]
pub fn random_numbers(min: f64, max: f64, count: usize, unique: bool) -> Result<JsValue, JsValue> {
    let result = if min.fract() != 0.0 || max.fract() != 0.0 {
        Err(ToolError::invalid("bounds must be whole numbers"))
    } else {
        random_numbers_internal(min as i64, max as i64, count, unique)
    };
    respond("random numbers", result)
}
