//! CoinGecko spot prices.

use std::collections::BTreeMap;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::client::fetch_json;
use super::{endpoint, ApiConfig};
use crate::error::{Result, ToolError};
use crate::{options_from_js, respond};

/// `{"bitcoin": {"usd": 64000.0, "usd_24h_change": -1.2}}`
pub type PriceTable = BTreeMap<String, BTreeMap<String, f64>>;

const CHANGE_SUFFIX: &str = "_24h_change";

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CryptoQuote {
    pub coin: String,
    pub currency: String,
    pub price: f64,
    pub change_24h: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CryptoConversion {
    pub amount: f64,
    pub coin: String,
    pub currency: String,
    pub price: f64,
    pub value: f64,
}

fn split_list(input: &str, what: &str) -> Result<Vec<String>> {
    let items: Vec<String> = input
        .split(',')
        .map(|item| item.trim().to_ascii_lowercase())
        .filter(|item| !item.is_empty())
        .collect();
    if items.is_empty() {
        return Err(ToolError::invalid(format!("at least one {what} is required")));
    }
    if let Some(bad) = items
        .iter()
        .find(|item| !item.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-'))
    {
        return Err(ToolError::invalid(format!("invalid {what}: {bad}")));
    }
    Ok(items)
}

pub fn price_url(config: &ApiConfig, ids: &str, currencies: &str) -> Result<String> {
    let ids = split_list(ids, "coin id")?;
    let currencies = split_list(currencies, "currency")?;
    Ok(endpoint(
        &config.coingecko,
        &format!(
            "simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
            ids.join(","),
            currencies.join(",")
        ),
    ))
}

pub fn supported_currencies_url(config: &ApiConfig) -> String {
    endpoint(&config.coingecko, "simple/supported_vs_currencies")
}

/// Flattens the nested price table into quotes sorted by coin then currency.
pub fn crypto_quotes(table: &PriceTable) -> Vec<CryptoQuote> {
    table
        .iter()
        .flat_map(|(coin, prices)| {
            prices
                .iter()
                .filter(|(key, _)| !key.ends_with(CHANGE_SUFFIX))
                .map(move |(currency, &price)| CryptoQuote {
                    coin: coin.clone(),
                    currency: currency.clone(),
                    price,
                    change_24h: prices.get(&format!("{currency}{CHANGE_SUFFIX}")).copied(),
                })
        })
        .collect()
}

pub fn convert_with_prices(
    table: &PriceTable,
    amount: f64,
    coin: &str,
    currency: &str,
) -> Result<CryptoConversion> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ToolError::invalid("amount must be a non-negative number"));
    }
    let coin = coin.trim().to_ascii_lowercase();
    let currency = currency.trim().to_ascii_lowercase();
    let price = table
        .get(&coin)
        .and_then(|prices| prices.get(&currency))
        .copied()
        .ok_or_else(|| ToolError::invalid(format!("no {currency} price for {coin}")))?;
    Ok(CryptoConversion {
        amount,
        value: amount * price,
        coin,
        currency,
        price,
    })
}

#[wasm_bindgen]
pub async fn crypto_prices(ids: String, currencies: String, config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        let table: PriceTable = fetch_json(&price_url(&config, &ids, &currencies)?).await?;
        Ok::<_, ToolError>(crypto_quotes(&table))
    }
    .await;
    respond("crypto prices", result)
}

#[wasm_bindgen]
pub async fn crypto_currencies(config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        let mut currencies: Vec<String> = fetch_json(&supported_currencies_url(&config)).await?;
        currencies.sort();
        Ok::<_, ToolError>(currencies)
    }
    .await;
    respond("crypto currencies", result)
}

#[wasm_bindgen]
pub async fn convert_crypto(
    amount: f64,
    coin: String,
    currency: String,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        let table: PriceTable = fetch_json(&price_url(&config, &coin, &currency)?).await?;
        convert_with_prices(&table, amount, &coin, &currency)
    }
    .await;
    respond("crypto converter", result)
}
