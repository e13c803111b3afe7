//! Exchange rates from exchangerate.host.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

use super::client::fetch_json;
use super::{endpoint, ApiConfig};
use crate::error::{Result, ToolError};
use crate::{options_from_js, respond};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RateTable {
    pub base: String,
    #[serde(default)]
    pub date: Option<String>,
    pub rates: BTreeMap<String, f64>,
}

/// Envelope as served; failures arrive as `success: false` with an error object.
#[derive(Debug, Deserialize)]
struct RatesEnvelope {
    success: Option<bool>,
    error: Option<Value>,
    base: Option<String>,
    date: Option<String>,
    rates: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyConversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub rate: f64,
    pub result: f64,
    pub date: Option<String>,
}

pub fn currency_code(input: &str) -> Result<String> {
    let code = input.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ToolError::invalid(format!(
            "currency code must be 3 letters: {}",
            input.trim()
        )));
    }
    Ok(code)
}

pub fn latest_url(config: &ApiConfig, base: &str) -> Result<String> {
    Ok(endpoint(
        &config.exchange_rates,
        &format!("latest?base={}", currency_code(base)?),
    ))
}

pub fn parse_rates(payload: Value) -> Result<RateTable> {
    let envelope: RatesEnvelope = serde_json::from_value(payload)?;
    if envelope.success == Some(false) {
        let reason = envelope
            .error
            .as_ref()
            .and_then(|err| err.get("info").or_else(|| err.get("type")).or(Some(err)))
            .map(|reason| match reason {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            })
            .unwrap_or_else(|| "request was not successful".into());
        return Err(ToolError::Network(reason));
    }
    match (envelope.base, envelope.rates) {
        (Some(base), Some(rates)) => Ok(RateTable {
            base: base.to_ascii_uppercase(),
            date: envelope.date,
            rates,
        }),
        _ => Err(ToolError::Decode("response is missing base or rates".into())),
    }
}

fn rate_against_base(table: &RateTable, code: &str) -> Option<f64> {
    if code == table.base {
        Some(1.0)
    } else {
        table.rates.get(code).copied()
    }
}

/// Converts using the table, computing a cross rate when the table's base
/// differs from `from`.
pub fn convert_with_rates(
    table: &RateTable,
    amount: f64,
    from: &str,
    to: &str,
) -> Result<CurrencyConversion> {
    if !amount.is_finite() {
        return Err(ToolError::invalid("amount must be a number"));
    }
    let from = currency_code(from)?;
    let to = currency_code(to)?;
    let missing = |code: &str| ToolError::invalid(format!("no exchange rate for {code}"));
    let from_rate = rate_against_base(table, &from).ok_or_else(|| missing(&from))?;
    let to_rate = rate_against_base(table, &to).ok_or_else(|| missing(&to))?;
    if from_rate == 0.0 {
        return Err(missing(&from));
    }
    let rate = to_rate / from_rate;
    Ok(CurrencyConversion {
        amount,
        result: (amount * rate * 10_000.0).round() / 10_000.0,
        rate,
        from,
        to,
        date: table.date.clone(),
    })
}

#[wasm_bindgen]
pub async fn exchange_rates(base: String, config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        parse_rates(fetch_json(&latest_url(&config, &base)?).await?)
    }
    .await;
    respond("exchange rates", result)
}

#[wasm_bindgen]
pub async fn convert_currency(
    amount: f64,
    from: String,
    to: String,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        let table = parse_rates(fetch_json(&latest_url(&config, &from)?).await?)?;
        convert_with_rates(&table, amount, &from, &to)
    }
    .await;
    respond("currency converter", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eur_table() -> RateTable {
        parse_rates(json!({
            "success": true,
            "base": "EUR",
            "date": "2024-05-01",
            "rates": {"EUR": 1.0, "USD": 1.25, "GBP": 0.85}
        }))
        .unwrap()
    }

    #[test]
    fn builds_latest_url() {
        assert_eq!(
            latest_url(&ApiConfig::default(), " usd ").unwrap(),
            "https://api.exchangerate.host/latest?base=USD"
        );
        assert!(latest_url(&ApiConfig::default(), "US").is_err());
        assert!(latest_url(&ApiConfig::default(), "U5D").is_err());
    }

    #[test]
    fn converts_from_base() {
        let conversion = convert_with_rates(&eur_table(), 10.0, "eur", "usd").unwrap();
        assert_eq!(conversion.rate, 1.25);
        assert_eq!(conversion.result, 12.5);
        assert_eq!(conversion.date.as_deref(), Some("2024-05-01"));
    }

    #[test]
    fn cross_rate_when_base_differs() {
        let conversion = convert_with_rates(&eur_table(), 100.0, "USD", "GBP").unwrap();
        assert_eq!(conversion.result, 68.0);
        assert!(convert_with_rates(&eur_table(), 1.0, "USD", "JPY").is_err());
    }

    #[test]
    fn error_payloads_surface_reason() {
        let err = parse_rates(json!({
            "success": false,
            "error": {"code": 101, "type": "missing_access_key", "info": "You have not supplied an API Access Key."}
        }))
        .unwrap_err();
        assert!(matches!(err, ToolError::Network(ref msg) if msg.contains("Access Key")));
        assert!(matches!(parse_rates(json!({"base": "EUR"})), Err(ToolError::Decode(_))));
    }
}
