//! Cron expression parsing, plain-English explanation and next-run preview.
//!
//! Standard five-field syntax (minute hour day-of-month month day-of-week)
//! with lists, ranges, steps, month/weekday names and the common `@` macros.
//! When both day fields are restricted a day matches if either one does,
//! like Vixie cron.

use std::collections::BTreeSet;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::{current_utc, respond};

const MAX_RUNS: usize = 50;
const HORIZON_DAYS: i64 = 366 * 5;

const MONTH_NAMES: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];
const DAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];
const MONTH_LABELS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];
const DAY_LABELS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl FieldKind {
    fn label(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::DayOfMonth => "day-of-month",
            Self::Month => "month",
            Self::DayOfWeek => "day-of-week",
        }
    }

    fn bounds(self) -> (u32, u32) {
        match self {
            Self::Minute => (0, 59),
            Self::Hour => (0, 23),
            Self::DayOfMonth => (1, 31),
            Self::Month => (1, 12),
            // 7 is accepted as an alias for Sunday.
            Self::DayOfWeek => (0, 7),
        }
    }

    fn names(self) -> Option<(&'static [&'static str], u32)> {
        match self {
            Self::Month => Some((MONTH_NAMES.as_slice(), 1)),
            Self::DayOfWeek => Some((DAY_NAMES.as_slice(), 0)),
            _ => None,
        }
    }

    fn value_label(self, value: u32) -> String {
        match self {
            Self::Month => MONTH_LABELS[(value - 1) as usize].to_string(),
            Self::DayOfWeek => DAY_LABELS[(value % 7) as usize].to_string(),
            _ => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Any,
    Value(u32),
    Range(u32, u32),
    Step {
        start: u32,
        end: u32,
        step: u32,
        from_any: bool,
    },
}

#[derive(Debug, Clone)]
struct Field {
    kind: FieldKind,
    parts: Vec<Part>,
    values: BTreeSet<u32>,
    /// False for `*`-prefixed or `?` fields; drives the day-of-month/day-of-week OR rule.
    restricted: bool,
}

impl Field {
    fn parse(raw: &str, kind: FieldKind) -> Result<Self> {
        if raw.is_empty() {
            return Err(ToolError::invalid(format!("{} field is empty", kind.label())));
        }
        let (min, max) = kind.bounds();
        let mut parts = Vec::new();
        let mut values = BTreeSet::new();
        for token in raw.split(',') {
            let part = parse_part(token, kind)?;
            let (start, end, step) = match part {
                Part::Any => (min, max, 1),
                Part::Value(v) => (v, v, 1),
                Part::Range(a, b) => (a, b, 1),
                Part::Step {
                    start, end, step, ..
                } => (start, end, step),
            };
            let mut value = start;
            while value <= end {
                values.insert(if kind == FieldKind::DayOfWeek { value % 7 } else { value });
                match value.checked_add(step) {
                    Some(next) => value = next,
                    None => break,
                }
            }
            parts.push(part);
        }
        let restricted = !(raw.starts_with('*') || raw == "?");
        Ok(Self {
            kind,
            parts,
            values,
            restricted,
        })
    }

    fn single(&self) -> Option<u32> {
        match self.parts.as_slice() {
            [Part::Value(v)] => Some(*v),
            _ => None,
        }
    }

    fn is_any(&self) -> bool {
        matches!(self.parts.as_slice(), [Part::Any])
    }

    fn every_step(&self) -> Option<u32> {
        match self.parts.as_slice() {
            [Part::Step {
                step,
                from_any: true,
                ..
            }] => Some(*step),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        let pieces: Vec<String> = self.parts.iter().map(|part| self.describe_part(part)).collect();
        join_english(&pieces)
    }

    fn describe_part(&self, part: &Part) -> String {
        let unit = match self.kind {
            FieldKind::DayOfMonth | FieldKind::DayOfWeek => "day",
            other => other.label(),
        };
        match *part {
            Part::Any => format!("every {unit}"),
            Part::Value(v) => self.kind.value_label(v),
            Part::Range(a, b) => format!(
                "{} through {}",
                self.kind.value_label(a),
                self.kind.value_label(b)
            ),
            Part::Step {
                start,
                end,
                step,
                from_any,
            } => {
                if from_any {
                    format!("every {step} {unit}s")
                } else {
                    format!(
                        "every {step} {unit}s from {} through {}",
                        self.kind.value_label(start),
                        self.kind.value_label(end)
                    )
                }
            }
        }
    }
}

fn parse_part(token: &str, kind: FieldKind) -> Result<Part> {
    let (min, max) = kind.bounds();
    let (base, step) = match token.split_once('/') {
        Some((base, step)) => {
            let step: u32 = step
                .parse()
                .map_err(|_| ToolError::invalid(format!("invalid step in {}: {token}", kind.label())))?;
            if step == 0 {
                return Err(ToolError::invalid(format!(
                    "step must be positive in {} field",
                    kind.label()
                )));
            }
            if step > max - min {
                return Err(ToolError::invalid(format!(
                    "step {step} exceeds the {} range {min}-{max}",
                    kind.label()
                )));
            }
            (base, Some(step))
        }
        None => (token, None),
    };
    let any = base == "*" || (base == "?" && matches!(kind, FieldKind::DayOfMonth | FieldKind::DayOfWeek));
    let (start, end) = if any {
        (min, max)
    } else if let Some((a, b)) = base.split_once('-') {
        let a = parse_value(a, kind)?;
        let b = parse_value(b, kind)?;
        if a > b {
            return Err(ToolError::invalid(format!(
                "range {token} is reversed in {} field",
                kind.label()
            )));
        }
        (a, b)
    } else {
        let v = parse_value(base, kind)?;
        // "a/n" means from a to the end of the field.
        (v, if step.is_some() { max } else { v })
    };
    let end = if kind == FieldKind::DayOfWeek && any { 6 } else { end };
    Ok(match step {
        Some(step) => Part::Step {
            start,
            end,
            step,
            from_any: any,
        },
        None if any => Part::Any,
        None if start == end => Part::Value(start),
        None => Part::Range(start, end),
    })
}

fn parse_value(raw: &str, kind: FieldKind) -> Result<u32> {
    let (min, max) = kind.bounds();
    let upper = raw.trim().to_ascii_uppercase();
    let value = match kind.names() {
        Some((names, offset)) if upper.chars().all(|ch| ch.is_ascii_alphabetic()) => names
            .iter()
            .position(|name| *name == upper)
            .map(|idx| idx as u32 + offset)
            .ok_or_else(|| ToolError::invalid(format!("unknown {} name: {raw}", kind.label())))?,
        _ => upper
            .parse::<u32>()
            .map_err(|_| ToolError::invalid(format!("invalid {} value: {raw}", kind.label())))?,
    };
    if value < min || value > max {
        return Err(ToolError::invalid(format!(
            "{} value {value} out of range {min}-{max}",
            kind.label()
        )));
    }
    Ok(value)
}

fn join_english(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [rest @ .., last] => format!("{} and {last}", rest.join(", ")),
    }
}

/// A parsed cron schedule.
#[derive(Debug, Clone)]
pub struct CronSchedule {
    minute: Field,
    hour: Field,
    day_of_month: Field,
    month: Field,
    day_of_week: Field,
}

impl CronSchedule {
    pub fn parse(expr: &str) -> Result<Self> {
        let trimmed = expr.trim();
        if trimmed.is_empty() {
            return Err(ToolError::invalid("cron expression is empty"));
        }
        let expanded = expand_macro(trimmed)?;
        let fields: Vec<&str> = expanded.split_whitespace().collect();
        if fields.len() != 5 {
            return Err(ToolError::invalid(format!(
                "expected 5 fields (minute hour day month weekday), found {}",
                fields.len()
            )));
        }
        Ok(Self {
            minute: Field::parse(fields[0], FieldKind::Minute)?,
            hour: Field::parse(fields[1], FieldKind::Hour)?,
            day_of_month: Field::parse(fields[2], FieldKind::DayOfMonth)?,
            month: Field::parse(fields[3], FieldKind::Month)?,
            day_of_week: Field::parse(fields[4], FieldKind::DayOfWeek)?,
        })
    }

    fn matches_day(&self, date: NaiveDate) -> bool {
        if !self.month.values.contains(&date.month()) {
            return false;
        }
        let dom = self.day_of_month.values.contains(&date.day());
        let dow = self
            .day_of_week
            .values
            .contains(&date.weekday().num_days_from_sunday());
        match (self.day_of_month.restricted, self.day_of_week.restricted) {
            (true, true) => dom || dow,
            (true, false) => dom,
            (false, true) => dow,
            (false, false) => true,
        }
    }

    /// Fire times strictly after `from`, at minute resolution.
    pub fn next_runs(&self, from: NaiveDateTime, count: usize) -> Result<Vec<NaiveDateTime>> {
        if count == 0 || count > MAX_RUNS {
            return Err(ToolError::invalid(format!(
                "count must be between 1 and {MAX_RUNS}"
            )));
        }
        let mut runs = Vec::with_capacity(count);
        let start_date = from.date();
        for offset in 0..HORIZON_DAYS {
            // Searching past chrono's last representable date just ends the scan.
            let Some(date) = start_date.checked_add_signed(Duration::days(offset)) else {
                break;
            };
            if !self.matches_day(date) {
                continue;
            }
            for &hour in &self.hour.values {
                for &minute in &self.minute.values {
                    let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
                        continue;
                    };
                    let candidate = date.and_time(time);
                    if candidate <= from {
                        continue;
                    }
                    runs.push(candidate);
                    if runs.len() == count {
                        return Ok(runs);
                    }
                }
            }
        }
        if runs.is_empty() {
            return Err(ToolError::invalid("schedule never fires"));
        }
        Ok(runs)
    }

    pub fn explain(&self) -> String {
        let mut sentence = self.describe_time();
        let dom = (!self.day_of_month.is_any()).then(|| {
            if self.day_of_month.every_step().is_some() {
                self.day_of_month.describe()
            } else {
                format!("on day {} of the month", self.day_of_month.describe())
            }
        });
        let dow = (!self.day_of_week.is_any()).then(|| {
            if self.day_of_week.every_step().is_some() {
                format!("{} of the week", self.day_of_week.describe())
            } else {
                format!("on {}", self.day_of_week.describe())
            }
        });
        match (dom, dow) {
            (Some(dom), Some(dow)) => sentence.push_str(&format!(", {dom} or {dow}")),
            (Some(day), None) | (None, Some(day)) => sentence.push_str(&format!(", {day}")),
            (None, None) => {}
        }
        if !self.month.is_any() {
            if self.month.every_step().is_some() {
                sentence.push_str(&format!(", {}", self.month.describe()));
            } else {
                sentence.push_str(&format!(", in {}", self.month.describe()));
            }
        }
        sentence
    }

    fn describe_time(&self) -> String {
        if let Some(minute) = self.minute.single() {
            let hours: Option<Vec<u32>> = self
                .hour
                .parts
                .iter()
                .map(|part| match part {
                    Part::Value(h) => Some(*h),
                    _ => None,
                })
                .collect();
            if let Some(hours) = hours {
                let times: Vec<String> = hours
                    .iter()
                    .map(|h| format!("{h:02}:{minute:02}"))
                    .collect();
                return format!("At {}", join_english(&times));
            }
        }
        let minute = if self.minute.is_any() {
            "Every minute".to_string()
        } else if let Some(step) = self.minute.every_step() {
            format!("Every {step} minutes")
        } else if let Some(value) = self.minute.single() {
            format!("At minute {value}")
        } else {
            format!("At minutes {}", self.minute.describe())
        };
        let hour = if self.hour.is_any() {
            String::new()
        } else if let Some(step) = self.hour.every_step() {
            format!(", every {step} hours")
        } else {
            match self.hour.parts.as_slice() {
                [Part::Value(h)] => format!(", between {h:02}:00 and {h:02}:59"),
                [Part::Range(a, b)] => format!(", between {a:02}:00 and {b:02}:59"),
                _ => format!(", during hours {}", self.hour.describe()),
            }
        };
        format!("{minute}{hour}")
    }
}

fn expand_macro(expr: &str) -> Result<String> {
    if !expr.starts_with('@') {
        return Ok(expr.to_string());
    }
    let expanded = match expr.to_ascii_lowercase().as_str() {
        "@yearly" | "@annually" => "0 0 1 1 *",
        "@monthly" => "0 0 1 * *",
        "@weekly" => "0 0 * * 0",
        "@daily" | "@midnight" => "0 0 * * *",
        "@hourly" => "0 * * * *",
        other => return Err(ToolError::unsupported(format!("cron macro: {other}"))),
    };
    Ok(expanded.to_string())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CronReport {
    pub expression: String,
    pub description: String,
    pub next_runs: Vec<String>,
}

fn parse_start(from: &str) -> Result<NaiveDateTime> {
    let trimmed = from.trim();
    if trimmed.is_empty() {
        return Ok(current_utc().naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|_| ToolError::invalid(format!("invalid start time: {trimmed}")))
}

pub fn explain_cron_internal(expr: &str, from: &str, count: usize) -> Result<CronReport> {
    let schedule = CronSchedule::parse(expr)?;
    let start = parse_start(from)?;
    let runs = schedule.next_runs(start, count)?;
    Ok(CronReport {
        expression: expr.trim().to_string(),
        description: schedule.explain(),
        next_runs: runs
            .iter()
            .map(|run| run.format("%Y-%m-%d %H:%M (%a)").to_string())
            .collect(),
    })
}

#[wasm_bindgen]
pub fn explain_cron(expr: &str, from: &str, count: usize) -> Result<JsValue, JsValue> {
    respond("cron explainer", explain_cron_internal(expr, from, count))
}
