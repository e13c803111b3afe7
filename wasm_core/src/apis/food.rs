//! Product lookup by barcode on Open Food Facts.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use super::client::fetch_json;
use super::{endpoint, ApiConfig};
use crate::error::{Result, ToolError};
use crate::{options_from_js, respond};

const BARCODE_LENGTHS: [usize; 4] = [8, 12, 13, 14];

#[derive(Debug, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Nutriments {
    pub energy_kcal: Option<f64>,
    pub fat: Option<f64>,
    pub saturated_fat: Option<f64>,
    pub carbohydrates: Option<f64>,
    pub sugars: Option<f64>,
    pub fiber: Option<f64>,
    pub proteins: Option<f64>,
    pub salt: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub barcode: String,
    pub name: Option<String>,
    pub brands: Option<String>,
    pub quantity: Option<String>,
    pub categories: Option<String>,
    pub ingredients: Option<String>,
    pub nutri_score: Option<String>,
    pub image_url: Option<String>,
    /// Values per 100 g.
    pub nutriments: Nutriments,
}

/// GTIN check digit: weights 3 and 1 alternate from the right, excluding
/// the check digit itself.
pub fn gtin_check_digit(body: &str) -> Option<u32> {
    let mut sum = 0;
    for (idx, ch) in body.chars().rev().enumerate() {
        let digit = ch.to_digit(10)?;
        sum += if idx % 2 == 0 { digit * 3 } else { digit };
    }
    Some((10 - sum % 10) % 10)
}

pub fn validate_barcode(input: &str) -> Result<String> {
    let barcode: String = input.chars().filter(|ch| !ch.is_whitespace()).collect();
    if !barcode.chars().all(|ch| ch.is_ascii_digit()) || !BARCODE_LENGTHS.contains(&barcode.len()) {
        return Err(ToolError::invalid(
            "barcode must be 8, 12, 13 or 14 digits",
        ));
    }
    let (body, check) = barcode.split_at(barcode.len() - 1);
    if gtin_check_digit(body) != check.parse().ok() {
        return Err(ToolError::invalid(format!(
            "invalid check digit in barcode {barcode}"
        )));
    }
    Ok(barcode)
}

pub fn product_url(config: &ApiConfig, barcode: &str) -> Result<String> {
    let barcode = validate_barcode(barcode)?;
    Ok(endpoint(
        &config.open_food_facts,
        &format!("api/v0/product/{barcode}.json"),
    ))
}

fn text(product: &Value, key: &str) -> Option<String> {
    product
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Nutriment values come as numbers or numeric strings depending on the product.
fn number(nutriments: Option<&Value>, key: &str) -> Option<f64> {
    match nutriments?.get(key)? {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

pub fn parse_product(barcode: &str, payload: &Value) -> Result<ProductSummary> {
    let status = payload.get("status").and_then(Value::as_i64).unwrap_or(0);
    let product = payload.get("product").filter(|_| status != 0).ok_or_else(|| {
        ToolError::invalid(format!("product {barcode} not found"))
    })?;
    let nutriments = product.get("nutriments");
    Ok(ProductSummary {
        barcode: barcode.to_string(),
        name: text(product, "product_name"),
        brands: text(product, "brands"),
        quantity: text(product, "quantity"),
        categories: text(product, "categories"),
        ingredients: text(product, "ingredients_text"),
        nutri_score: text(product, "nutriscore_grade")
            .or_else(|| text(product, "nutrition_grades"))
            .map(|grade| grade.to_ascii_uppercase()),
        image_url: text(product, "image_front_url").or_else(|| text(product, "image_url")),
        nutriments: Nutriments {
            energy_kcal: number(nutriments, "energy-kcal_100g"),
            fat: number(nutriments, "fat_100g"),
            saturated_fat: number(nutriments, "saturated-fat_100g"),
            carbohydrates: number(nutriments, "carbohydrates_100g"),
            sugars: number(nutriments, "sugars_100g"),
            fiber: number(nutriments, "fiber_100g"),
            proteins: number(nutriments, "proteins_100g"),
            salt: number(nutriments, "salt_100g"),
        },
    })
}

#[wasm_bindgen]
pub async fn food_product(barcode: String, config: JsValue) -> Result<JsValue, JsValue> {
    let result = async {
        let config = options_from_js::<ApiConfig>(config)?;
        let barcode = validate_barcode(&barcode)?;
        let payload: Value = fetch_json(&product_url(&config, &barcode)?).await?;
        parse_product(&barcode, &payload)
    }
    .await;
    respond("food lookup", result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validates_gtin_check_digits() {
        assert_eq!(validate_barcode("3017620422003").unwrap(), "3017620422003");
        assert_eq!(validate_barcode("0 36000 29145 2").unwrap(), "036000291452");
        assert_eq!(validate_barcode("96385074").unwrap(), "96385074");
        assert!(validate_barcode("3017620422004").is_err());
        assert!(validate_barcode("12345").is_err());
        assert!(validate_barcode("30176204220a3").is_err());
    }

    #[test]
    fn builds_product_url() {
        assert_eq!(
            product_url(&ApiConfig::default(), "3017620422003").unwrap(),
            "https://world.openfoodfacts.org/api/v0/product/3017620422003.json"
        );
    }

    #[test]
    fn summarises_product() {
        let payload = json!({
            "code": "3017620422003",
            "status": 1,
            "status_verbose": "product found",
            "product": {
                "product_name": "Nutella",
                "brands": "Ferrero",
                "quantity": "400 g",
                "categories": "Spreads",
                "ingredients_text": "Sugar, palm oil, hazelnuts",
                "nutriscore_grade": "e",
                "image_front_url": "https://images.example/nutella.jpg",
                "nutriments": {
                    "energy-kcal_100g": 539,
                    "fat_100g": 30.9,
                    "sugars_100g": "56.3",
                    "salt_100g": 0.107
                }
            }
        });
        let summary = parse_product("3017620422003", &payload).unwrap();
        assert_eq!(summary.name.as_deref(), Some("Nutella"));
        assert_eq!(summary.nutri_score.as_deref(), Some("E"));
        assert_eq!(summary.nutriments.energy_kcal, Some(539.0));
        assert_eq!(summary.nutriments.sugars, Some(56.3));
        assert_eq!(summary.nutriments.fiber, None);
    }

    #[test]
    fn status_zero_is_not_found() {
        let payload = json!({"code": "96385074", "status": 0, "status_verbose": "product not found"});
        let err = parse_product("96385074", &payload).unwrap_err();
        assert_eq!(err.to_string(), "product 96385074 not found");
    }
}
