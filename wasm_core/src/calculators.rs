//! Everyday calculators: BMI, loans, compound interest, tips, percentages
//! and calendar arithmetic (age, date difference).

use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::{current_utc, options_from_js, respond};

const MAX_YEARS: f64 = 100.0;

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn require_positive(value: f64, label: &str) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ToolError::invalid(format!("{label} must be greater than zero")));
    }
    Ok(())
}

fn require_non_negative(value: f64, label: &str) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ToolError::invalid(format!("{label} must not be negative")));
    }
    Ok(())
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BmiResult {
    pub bmi: f64,
    pub category: String,
}

pub fn bmi_internal(weight: f64, height: f64, system: &str) -> Result<BmiResult> {
    require_positive(weight, "weight")?;
    require_positive(height, "height")?;
    let raw = match system.trim().to_ascii_lowercase().as_str() {
        "metric" | "" => {
            let meters = height / 100.0;
            weight / (meters * meters)
        }
        "imperial" => 703.0 * weight / (height * height),
        other => return Err(ToolError::unsupported(format!("unit system: {other}"))),
    };
    let bmi = round_to(raw, 1);
    let category = if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    };
    Ok(BmiResult {
        bmi,
        category: category.into(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct AmortizationRow {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub balance: f64,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    pub schedule: Vec<AmortizationRow>,
}

pub fn loan_internal(
    principal: f64,
    annual_rate_pct: f64,
    months: u32,
    with_schedule: bool,
) -> Result<LoanResult> {
    require_positive(principal, "loan amount")?;
    require_non_negative(annual_rate_pct, "interest rate")?;
    if months == 0 || months > 1200 {
        return Err(ToolError::invalid("term must be between 1 and 1200 months"));
    }
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    let n = f64::from(months);
    let payment = if monthly_rate == 0.0 {
        principal / n
    } else {
        let growth = (1.0 + monthly_rate).powf(n);
        principal * monthly_rate * growth / (growth - 1.0)
    };
    let mut schedule = Vec::new();
    if with_schedule {
        let mut balance = principal;
        for month in 1..=months {
            let interest = balance * monthly_rate;
            let principal_part = (payment - interest).min(balance);
            balance = (balance - principal_part).max(0.0);
            schedule.push(AmortizationRow {
                month,
                payment: round_to(principal_part + interest, 2),
                principal: round_to(principal_part, 2),
                interest: round_to(interest, 2),
                balance: round_to(balance, 2),
            });
        }
    }
    let total = payment * n;
    Ok(LoanResult {
        monthly_payment: round_to(payment, 2),
        total_payment: round_to(total, 2),
        total_interest: round_to(total - principal, 2),
        schedule,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompoundOptions {
    pub principal: f64,
    pub rate_pct: f64,
    pub years: f64,
    pub periods_per_year: u32,
    pub monthly_contribution: f64,
}

impl Default for CompoundOptions {
    fn default() -> Self {
        Self {
            principal: 0.0,
            rate_pct: 0.0,
            years: 1.0,
            periods_per_year: 12,
            monthly_contribution: 0.0,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompoundResult {
    pub final_amount: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
}

pub fn compound_interest_internal(options: &CompoundOptions) -> Result<CompoundResult> {
    require_non_negative(options.principal, "principal")?;
    require_non_negative(options.rate_pct, "interest rate")?;
    require_positive(options.years, "years")?;
    if options.years > MAX_YEARS {
        return Err(ToolError::invalid(format!("years must be at most {MAX_YEARS}")));
    }
    require_non_negative(options.monthly_contribution, "monthly contribution")?;
    if options.periods_per_year == 0 {
        return Err(ToolError::invalid("compounding periods must be at least 1"));
    }
    let rate = options.rate_pct / 100.0;
    let periods = f64::from(options.periods_per_year);
    let growth = |t: f64| (1.0 + rate / periods).powf(periods * t);
    let mut amount = options.principal * growth(options.years);
    // Contributions at the end of each month, compounded for the time remaining.
    let months = (options.years * 12.0).round() as u32;
    for month in 1..=months {
        let remaining = options.years - f64::from(month) / 12.0;
        amount += options.monthly_contribution * growth(remaining.max(0.0));
    }
    let contributions = options.principal + options.monthly_contribution * f64::from(months);
    if !amount.is_finite() || !contributions.is_finite() {
        return Err(ToolError::invalid("result is too large to represent"));
    }
    Ok(CompoundResult {
        final_amount: round_to(amount, 2),
        total_contributions: round_to(contributions, 2),
        total_interest: round_to(amount - contributions, 2),
    })
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TipResult {
    pub tip: f64,
    pub total: f64,
    pub per_person: f64,
    pub tip_per_person: f64,
}

pub fn tip_internal(bill: f64, tip_pct: f64, people: u32) -> Result<TipResult> {
    require_positive(bill, "bill amount")?;
    require_non_negative(tip_pct, "tip percentage")?;
    if people == 0 {
        return Err(ToolError::invalid("number of people must be at least 1"));
    }
    let tip = bill * tip_pct / 100.0;
    let total = bill + tip;
    let people = f64::from(people);
    Ok(TipResult {
        tip: round_to(tip, 2),
        total: round_to(total, 2),
        per_person: round_to(total / people, 2),
        tip_per_person: round_to(tip / people, 2),
    })
}

/// `of`: a% of b; `ratio`: a is what % of b; `change`: % change from a to b.
pub fn percentage_internal(mode: &str, a: f64, b: f64) -> Result<f64> {
    if !a.is_finite() || !b.is_finite() {
        return Err(ToolError::invalid("values must be finite numbers"));
    }
    let value = match mode.trim().to_ascii_lowercase().as_str() {
        "of" => a / 100.0 * b,
        "ratio" => {
            if b == 0.0 {
                return Err(ToolError::invalid("cannot divide by zero"));
            }
            a / b * 100.0
        }
        "change" => {
            if a == 0.0 {
                return Err(ToolError::invalid("percent change from zero is undefined"));
            }
            (b - a) / a.abs() * 100.0
        }
        other => return Err(ToolError::unsupported(format!("percentage mode: {other}"))),
    };
    Ok(round_to(value, 4))
}

fn parse_date(input: &str, label: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(current_utc().date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| ToolError::invalid(format!("invalid {label}: {trimmed} (expected YYYY-MM-DD)")))
}

/// Calendar difference as (years, months, days), `from <= to`. Month steps
/// clamp to the end of shorter months, so Jan 31 + 1 month is Feb 28/29.
fn calendar_diff(from: NaiveDate, to: NaiveDate) -> (i32, u32, u32) {
    let shift = |months: i32| from.checked_add_months(Months::new(months as u32));
    let mut total_months =
        (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    while total_months > 0 && shift(total_months).map_or(true, |date| date > to) {
        total_months -= 1;
    }
    let total_months = total_months.max(0);
    let anchor = shift(total_months).unwrap_or(from);
    let days = (to - anchor).num_days().max(0) as u32;
    (total_months / 12, (total_months % 12) as u32, days)
}

/// `None` once `year` is past the last representable date.
fn birthday_in(year: i32, birth: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day())
        // Feb 29 birthdays fall back to Feb 28 in common years.
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgeResult {
    pub years: i32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
    pub total_weeks: i64,
    pub days_until_birthday: i64,
}

pub fn age_internal(birth: &str, on: &str) -> Result<AgeResult> {
    let birth = parse_date(birth, "birth date")?;
    let on = parse_date(on, "reference date")?;
    if birth > on {
        return Err(ToolError::invalid("birth date is in the future"));
    }
    let (years, months, days) = calendar_diff(birth, on);
    let total_days = (on - birth).num_days();
    let next = birthday_in(on.year(), birth)
        .filter(|date| *date >= on)
        .or_else(|| birthday_in(on.year() + 1, birth))
        .ok_or_else(|| ToolError::invalid("next birthday is out of range"))?;
    Ok(AgeResult {
        years,
        months,
        days,
        total_days,
        total_weeks: total_days / 7,
        days_until_birthday: (next - on).num_days(),
    })
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateDiffResult {
    pub days: i64,
    pub weeks: i64,
    pub remaining_days: i64,
    pub years: i32,
    pub months: u32,
    pub month_days: u32,
    pub business_days: i64,
}

pub fn date_diff_internal(a: &str, b: &str) -> Result<DateDiffResult> {
    let start = parse_date(a, "start date")?;
    let end = parse_date(b, "end date")?;
    let days = (end - start).num_days();
    let (from, to) = if start <= end { (start, end) } else { (end, start) };
    let (years, months, month_days) = calendar_diff(from, to);
    let business = from
        .iter_days()
        .take_while(|day| *day < to)
        .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        .count() as i64;
    let sign = if days < 0 { -1 } else { 1 };
    Ok(DateDiffResult {
        days,
        weeks: days / 7,
        remaining_days: days % 7,
        years,
        months,
        month_days,
        business_days: business * sign,
    })
}

#[wasm_bindgen]
pub fn calculate_bmi(weight: f64, height: f64, system: &str) -> Result<JsValue, JsValue> {
    respond("BMI calculator", bmi_internal(weight, height, system))
}

#[wasm_bindgen]
pub fn calculate_loan(
    principal: f64,
    annual_rate_pct: f64,
    months: u32,
    with_schedule: bool,
) -> Result<JsValue, JsValue> {
    respond(
        "loan calculator",
        loan_internal(principal, annual_rate_pct, months, with_schedule),
    )
}

#[wasm_bindgen]
pub fn calculate_compound_interest(options: JsValue) -> Result<JsValue, JsValue> {
    let result = options_from_js::<CompoundOptions>(options)
        .and_then(|opts| compound_interest_internal(&opts));
    respond("compound interest", result)
}

#[wasm_bindgen]
pub fn calculate_tip(bill: f64, tip_pct: f64, people: u32) -> Result<JsValue, JsValue> {
    respond("tip calculator", tip_internal(bill, tip_pct, people))
}

#[wasm_bindgen]
pub fn calculate_percentage(mode: &str, a: f64, b: f64) -> Result<JsValue, JsValue> {
    respond("percentage calculator", percentage_internal(mode, a, b))
}

#[wasm_bindgen]
pub fn calculate_age(birth: &str, on: &str) -> Result<JsValue, JsValue> {
    respond("age calculator", age_internal(birth, on))
}

#[wasm_bindgen]
pub fn date_difference(start: &str, end: &str) -> Result<JsValue, JsValue> {
    respond("date difference", date_diff_internal(start, end))
}
