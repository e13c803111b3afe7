//! Public holidays from Nager.Date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use super::client::fetch_json;
use super::{endpoint, ApiConfig};
use crate::error::{Result, ToolError};
use crate::{current_utc, options_from_js, respond};

const YEARS: std::ops::RangeInclusive<i32> = 1975..=2100;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub date: NaiveDate,
    pub local_name: String,
    pub name: String,
    pub country_code: String,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub counties: Option<Vec<String>>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HolidayReport {
    pub year: i32,
    pub country: String,
    pub count: usize,
    pub holidays: Vec<Holiday>,
    pub next: Option<Holiday>,
    pub days_until_next: Option<i64>,
}

pub fn country_code(input: &str) -> Result<String> {
    let code = input.trim().to_ascii_uppercase();
    if code.len() != 2 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ToolError::invalid(format!(
            "country code must be 2 letters: {}",
            input.trim()
        )));
    }
    Ok(code)
}

pub fn holidays_url(config: &ApiConfig, year: i32, country: &str) -> Result<String> {
    if !YEARS.contains(&year) {
        return Err(ToolError::invalid(format!(
            "year must be between {} and {}",
            YEARS.start(),
            YEARS.end()
        )));
    }
    Ok(endpoint(
        &config.nager_date,
        &format!("api/v3/PublicHolidays/{year}/{}", country_code(country)?),
    ))
}

/// First holiday on or after `after`, assuming `holidays` is sorted.
pub fn next_holiday(holidays: &[Holiday], after: NaiveDate) -> Option<&Holiday> {
    holidays.iter().find(|holiday| holiday.date >= after)
}

pub fn holiday_report(year: i32, country: &str, mut holidays: Vec<Holiday>, today: NaiveDate) -> HolidayReport {
    holidays.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
    let next = next_holiday(&holidays, today).cloned();
    HolidayReport {
        year,
        country: country.to_string(),
        count: holidays.len(),
        days_until_next: next.as_ref().map(|holiday| (holiday.date - today).num_days()),
        next,
        holidays,
    }
}

#[wasm_bindgen]
pub async fn public_holidays(year: i32, country: String, config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        let url = holidays_url(&config, year, &country)?;
        let holidays: Vec<Holiday> = fetch_json(&url).await?;
        log::debug!("{} holidays for {country} in {year}", holidays.len());
        let today = current_utc().date_naive();
        Ok::<_, ToolError>(holiday_report(year, &country_code(&country)?, holidays, today))
    }
    .await;
    respond("public holidays", result)
}
