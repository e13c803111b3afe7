//! Unit converter (length, mass, temperature, data, ...) and the arbitrary
//! precision number base converter.

use std::collections::BTreeMap;

use num_bigint::BigInt;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::respond;

/// (unit id, factor to the category's base unit)
type UnitTable = &'static [(&'static str, f64)];

const LENGTH: UnitTable = &[
    ("millimeter", 0.001),
    ("centimeter", 0.01),
    ("meter", 1.0),
    ("kilometer", 1000.0),
    ("inch", 0.0254),
    ("foot", 0.3048),
    ("yard", 0.9144),
    ("mile", 1609.344),
    ("nautical_mile", 1852.0),
];

const MASS: UnitTable = &[
    ("milligram", 0.001),
    ("gram", 1.0),
    ("kilogram", 1000.0),
    ("tonne", 1_000_000.0),
    ("ounce", 28.349_523_125),
    ("pound", 453.592_37),
    ("stone", 6350.293_18),
];

const VOLUME: UnitTable = &[
    ("milliliter", 0.001),
    ("liter", 1.0),
    ("cubic_meter", 1000.0),
    ("teaspoon", 0.004_928_921_593_75),
    ("tablespoon", 0.014_786_764_781_25),
    ("fluid_ounce", 0.029_573_529_562_5),
    ("cup", 0.236_588_236_5),
    ("pint", 0.473_176_473),
    ("quart", 0.946_352_946),
    ("gallon", 3.785_411_784),
];

const AREA: UnitTable = &[
    ("square_meter", 1.0),
    ("square_kilometer", 1_000_000.0),
    ("square_foot", 0.092_903_04),
    ("square_yard", 0.836_127_36),
    ("acre", 4046.856_422_4),
    ("hectare", 10_000.0),
    ("square_mile", 2_589_988.110_336),
];

const SPEED: UnitTable = &[
    ("meter_per_second", 1.0),
    ("kilometer_per_hour", 1.0 / 3.6),
    ("mile_per_hour", 0.447_04),
    ("knot", 1852.0 / 3600.0),
    ("foot_per_second", 0.3048),
];

const TIME: UnitTable = &[
    ("millisecond", 0.001),
    ("second", 1.0),
    ("minute", 60.0),
    ("hour", 3600.0),
    ("day", 86_400.0),
    ("week", 604_800.0),
    ("year", 31_557_600.0),
];

const DATA: UnitTable = &[
    ("bit", 0.125),
    ("byte", 1.0),
    ("kilobit", 125.0),
    ("kilobyte", 1000.0),
    ("kibibyte", 1024.0),
    ("megabit", 125_000.0),
    ("megabyte", 1_000_000.0),
    ("mebibyte", 1_048_576.0),
    ("gigabyte", 1e9),
    ("gibibyte", 1_073_741_824.0),
    ("terabyte", 1e12),
    ("tebibyte", 1_099_511_627_776.0),
];

const PRESSURE: UnitTable = &[
    ("pascal", 1.0),
    ("kilopascal", 1000.0),
    ("bar", 100_000.0),
    ("atmosphere", 101_325.0),
    ("psi", 6894.757_293_168),
    ("mmhg", 133.322_387_415),
];

const ENERGY: UnitTable = &[
    ("joule", 1.0),
    ("kilojoule", 1000.0),
    ("calorie", 4.184),
    ("kilocalorie", 4184.0),
    ("watt_hour", 3600.0),
    ("kilowatt_hour", 3_600_000.0),
    ("btu", 1055.055_852_62),
];

const TEMPERATURE_UNITS: &[&str] = &["celsius", "fahrenheit", "kelvin", "rankine"];

#[derive(Debug, Clone, Copy)]
enum Category {
    Linear(UnitTable),
    Temperature,
}

fn category(name: &str) -> Result<Category> {
    let table = match name.trim().to_ascii_lowercase().as_str() {
        "length" => LENGTH,
        "mass" | "weight" => MASS,
        "volume" => VOLUME,
        "area" => AREA,
        "speed" => SPEED,
        "time" => TIME,
        "data" | "storage" => DATA,
        "pressure" => PRESSURE,
        "energy" => ENERGY,
        "temperature" => return Ok(Category::Temperature),
        other => return Err(ToolError::unsupported(format!("unit category: {other}"))),
    };
    Ok(Category::Linear(table))
}

pub fn list_units_internal(name: &str) -> Result<Vec<String>> {
    Ok(match category(name)? {
        Category::Linear(table) => table.iter().map(|(unit, _)| unit.to_string()).collect(),
        Category::Temperature => TEMPERATURE_UNITS.iter().map(|u| u.to_string()).collect(),
    })
}

fn parse_quantity(value: &str) -> Result<f64> {
    let cleaned = value.trim().replace([',', '_'], "");
    if cleaned.is_empty() {
        return Err(ToolError::invalid("value is empty"));
    }
    let parsed: f64 = cleaned
        .parse()
        .map_err(|_| ToolError::invalid(format!("invalid number: {}", value.trim())))?;
    if !parsed.is_finite() {
        return Err(ToolError::invalid("value must be finite"));
    }
    Ok(parsed)
}

fn to_kelvin(unit: &str, value: f64) -> Result<f64> {
    let kelvin = match unit {
        "celsius" => value + 273.15,
        "fahrenheit" => (value - 32.0) * 5.0 / 9.0 + 273.15,
        "kelvin" => value,
        "rankine" => value * 5.0 / 9.0,
        other => return Err(ToolError::unsupported(format!("unit: {other}"))),
    };
    // Tolerate float noise right at absolute zero.
    if kelvin < -1e-9 {
        return Err(ToolError::invalid("temperature is below absolute zero"));
    }
    Ok(kelvin.max(0.0))
}

fn from_kelvin(unit: &str, kelvin: f64) -> f64 {
    match unit {
        "celsius" => kelvin - 273.15,
        "fahrenheit" => (kelvin - 273.15) * 9.0 / 5.0 + 32.0,
        "rankine" => kelvin * 9.0 / 5.0,
        _ => kelvin,
    }
}

/// Formats with up to 10 decimals and no trailing zeros.
pub fn format_quantity(value: f64) -> String {
    if value != 0.0 && (value.abs() >= 1e15 || value.abs() < 1e-9) {
        return format!("{value:e}");
    }
    let fixed = format!("{value:.10}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

fn finite_quantity(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(ToolError::invalid("result is out of range"));
    }
    Ok(format_quantity(value))
}

pub fn convert_units_internal(
    category_name: &str,
    unit: &str,
    value: &str,
) -> Result<BTreeMap<String, String>> {
    let amount = parse_quantity(value)?;
    let unit = unit.trim().to_ascii_lowercase();
    let mut map = BTreeMap::new();
    match category(category_name)? {
        Category::Linear(table) => {
            let factor = table
                .iter()
                .find(|(name, _)| *name == unit)
                .map(|(_, factor)| *factor)
                .ok_or_else(|| ToolError::unsupported(format!("unit: {unit}")))?;
            let base = amount * factor;
            for (name, target) in table {
                map.insert(name.to_string(), finite_quantity(base / target)?);
            }
        }
        Category::Temperature => {
            let kelvin = to_kelvin(&unit, amount)?;
            for name in TEMPERATURE_UNITS {
                map.insert(name.to_string(), finite_quantity(from_kelvin(name, kelvin))?);
            }
        }
    }
    Ok(map)
}

#[derive(Serialize, Default, Debug)]
pub struct NumberBases {
    pub binary: String,
    pub octal: String,
    pub decimal: String,
    pub hex: String,
}

pub fn convert_number_base_internal(base: &str, value: &str) -> Result<NumberBases> {
    let num = parse_number_by_base(base, value)?;
    Ok(NumberBases {
        binary: num.to_str_radix(2),
        octal: num.to_str_radix(8),
        decimal: num.to_str_radix(10),
        hex: num.to_str_radix(16).to_uppercase(),
    })
}

fn parse_number_by_base(base: &str, value: &str) -> Result<BigInt> {
    let cleaned = value.trim().replace(['_', ' '], "");
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };
    let (radix, prefixes): (u32, &[&str]) = match base.trim().to_ascii_lowercase().as_str() {
        "binary" | "2" => (2, &["0b", "0B"]),
        "octal" | "8" => (8, &["0o", "0O"]),
        "decimal" | "10" => (10, &[]),
        "hex" | "16" => (16, &["0x", "0X"]),
        other => return Err(ToolError::unsupported(format!("base {other}"))),
    };
    let digits = prefixes
        .iter()
        .find_map(|prefix| digits.strip_prefix(prefix))
        .unwrap_or(digits);
    if digits.is_empty() {
        return Err(ToolError::invalid("value is empty"));
    }
    // BigInt parses its own sign, so a second one would flip the first.
    if digits.starts_with(['-', '+']) {
        return Err(ToolError::invalid(format!("invalid base-{radix} value: {value}")));
    }
    let num = BigInt::parse_bytes(digits.as_bytes(), radix)
        .ok_or_else(|| ToolError::invalid(format!("invalid base-{radix} value: {value}")))?;
    Ok(if negative { -num } else { num })
}

#[wasm_bindgen]
pub fn convert_units(category: &str, unit: &str, value: &str) -> Result<JsValue, JsValue> {
    respond("unit converter", convert_units_internal(category, unit, value))
}

#[wasm_bindgen]
pub fn list_units(category: &str) -> Result<JsValue, JsValue> {
    respond("unit list", list_units_internal(category))
}

#[wasm_bindgen]
pub fn convert_number_base(base: &str, value: &str) -> Result<JsValue, JsValue> {
    respond("number base converter", convert_number_base_internal(base, value))
}
