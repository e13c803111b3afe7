//! Color conversion, WCAG contrast checking and palette/gradient helpers.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::{Result, ToolError};
use crate::{random, respond, respond_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue in degrees [0, 360), saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ColorFormats {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
    pub cmyk: String,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContrastReport {
    pub foreground: String,
    pub background: String,
    pub ratio: f64,
    pub aa_normal: bool,
    pub aa_large: bool,
    pub aaa_normal: bool,
    pub aaa_large: bool,
}

pub fn hex_to_rgb(input: &str) -> Result<Rgb> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(ToolError::invalid(format!("invalid hex color: {trimmed}")));
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect(),
        6 => digits.to_string(),
        _ => {
            return Err(ToolError::invalid(format!(
                "hex color must have 3 or 6 digits: {trimmed}"
            )));
        }
    };
    let bytes = hex::decode(&expanded).map_err(|err| ToolError::invalid(err.to_string()))?;
    Ok(Rgb::new(bytes[0], bytes[1], bytes[2]))
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;
    if delta == 0.0 {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: l * 100.0,
        };
    }
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    Hsl {
        h: h * 60.0,
        s: s * 100.0,
        l: l * 100.0,
    }
}

pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = hsl.h.rem_euclid(360.0) / 360.0;
    let s = (hsl.s / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l / 100.0).clamp(0.0, 1.0);
    if s == 0.0 {
        let v = channel(l);
        return Rgb::new(v, v, v);
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    Rgb::new(
        channel(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        channel(hue_to_rgb(p, q, h)),
        channel(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// CMYK percentages, rounded.
pub fn rgb_to_cmyk(rgb: Rgb) -> [u8; 4] {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;
    let k = 1.0 - r.max(g).max(b);
    if k >= 1.0 {
        return [0, 0, 0, 100];
    }
    let pct = |v: f64| ((1.0 - v - k) / (1.0 - k) * 100.0).round() as u8;
    [pct(r), pct(g), pct(b), (k * 100.0).round() as u8]
}

/// Parses any of the notations the color tools accept.
pub fn parse_color(input: &str) -> Result<Rgb> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ToolError::invalid("color is empty"));
    }
    let lower = trimmed.to_ascii_lowercase();
    if let Some(body) = functional_body(&lower, "rgb") {
        let parts = split_components(body, 3)?;
        let mut out = [0u8; 3];
        for (slot, part) in out.iter_mut().zip(parts.iter()) {
            let value: f64 = part
                .parse()
                .map_err(|_| ToolError::invalid(format!("invalid rgb component: {part}")))?;
            if !(0.0..=255.0).contains(&value) {
                return Err(ToolError::invalid(format!(
                    "rgb component out of range: {part}"
                )));
            }
            *slot = value.round() as u8;
        }
        return Ok(Rgb::new(out[0], out[1], out[2]));
    }
    if let Some(body) = functional_body(&lower, "hsl") {
        let parts = split_components(body, 3)?;
        let h: f64 = parts[0]
            .trim_end_matches("deg")
            .parse()
            .map_err(|_| ToolError::invalid(format!("invalid hue: {}", parts[0])))?;
        let s = parse_percent(&parts[1])?;
        let l = parse_percent(&parts[2])?;
        return Ok(hsl_to_rgb(Hsl { h, s, l }));
    }
    hex_to_rgb(trimmed)
}

fn functional_body<'a>(input: &'a str, name: &str) -> Option<&'a str> {
    let rest = input.strip_prefix(name)?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    rest.trim()
        .strip_prefix('(')
        .and_then(|body| body.strip_suffix(')'))
}

fn split_components(body: &str, expected: usize) -> Result<Vec<String>> {
    let parts: Vec<String> = body
        .split(|ch: char| ch == ',' || ch.is_whitespace() || ch == '/')
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();
    // Alpha is accepted but ignored.
    if parts.len() < expected || parts.len() > expected + 1 {
        return Err(ToolError::invalid(format!(
            "expected {expected} color components"
        )));
    }
    Ok(parts)
}

fn parse_percent(part: &str) -> Result<f64> {
    let value: f64 = part
        .trim_end_matches('%')
        .parse()
        .map_err(|_| ToolError::invalid(format!("invalid percentage: {part}")))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(ToolError::invalid(format!("percentage out of range: {part}")));
    }
    Ok(value)
}

pub fn convert_color_internal(input: &str) -> Result<ColorFormats> {
    let rgb = parse_color(input)?;
    Ok(formats_for(rgb))
}

fn formats_for(rgb: Rgb) -> ColorFormats {
    let hsl = rgb_to_hsl(rgb);
    let (h, s, l) = (
        hsl.h.round() as u16 % 360,
        hsl.s.round() as u8,
        hsl.l.round() as u8,
    );
    let [c, m, y, k] = rgb_to_cmyk(rgb);
    ColorFormats {
        hex: rgb_to_hex(rgb),
        rgb: format!("rgb({}, {}, {})", rgb.r, rgb.g, rgb.b),
        hsl: format!("hsl({h}, {s}%, {l}%)"),
        cmyk: format!("cmyk({c}%, {m}%, {y}%, {k}%)"),
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
        h,
        s,
        l,
    }
}

/// WCAG 2.x relative luminance.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    let linear = |v: u8| {
        let c = f64::from(v) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(rgb.r) + 0.7152 * linear(rgb.g) + 0.0722 * linear(rgb.b)
}

pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

pub fn contrast_report(foreground: &str, background: &str) -> Result<ContrastReport> {
    let fg = parse_color(foreground)?;
    let bg = parse_color(background)?;
    let ratio = (contrast_ratio(fg, bg) * 100.0).round() / 100.0;
    Ok(ContrastReport {
        foreground: rgb_to_hex(fg),
        background: rgb_to_hex(bg),
        ratio,
        aa_normal: ratio >= 4.5,
        aa_large: ratio >= 3.0,
        aaa_normal: ratio >= 7.0,
        aaa_large: ratio >= 4.5,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Complementary,
    Analogous,
    Triadic,
    Tetradic,
    SplitComplementary,
    Monochromatic,
}

impl Scheme {
    fn parse(input: &str) -> Result<Self> {
        match input.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "complementary" => Ok(Self::Complementary),
            "analogous" => Ok(Self::Analogous),
            "triadic" => Ok(Self::Triadic),
            "tetradic" | "square" => Ok(Self::Tetradic),
            "splitcomplementary" => Ok(Self::SplitComplementary),
            "monochromatic" | "shades" => Ok(Self::Monochromatic),
            other => Err(ToolError::unsupported(format!("palette scheme: {other}"))),
        }
    }
}

pub fn palette_internal(base: &str, scheme: &str) -> Result<Vec<String>> {
    let rgb = parse_color(base)?;
    let scheme = Scheme::parse(scheme)?;
    let hsl = rgb_to_hsl(rgb);
    let rotate = |deg: f64| rgb_to_hex(hsl_to_rgb(Hsl { h: hsl.h + deg, ..hsl }));
    let colors = match scheme {
        Scheme::Complementary => vec![rgb_to_hex(rgb), rotate(180.0)],
        Scheme::Analogous => vec![rotate(-30.0), rgb_to_hex(rgb), rotate(30.0)],
        Scheme::Triadic => vec![rgb_to_hex(rgb), rotate(120.0), rotate(240.0)],
        Scheme::Tetradic => vec![rgb_to_hex(rgb), rotate(90.0), rotate(180.0), rotate(270.0)],
        Scheme::SplitComplementary => vec![rgb_to_hex(rgb), rotate(150.0), rotate(210.0)],
        Scheme::Monochromatic => [15.0, 30.0, 50.0, 70.0, 85.0]
            .iter()
            .map(|&l| rgb_to_hex(hsl_to_rgb(Hsl { l, ..hsl })))
            .collect(),
    };
    Ok(colors)
}

pub fn gradient_css_internal(kind: &str, angle: f64, stops: &[String]) -> Result<String> {
    if stops.len() < 2 {
        return Err(ToolError::invalid("a gradient needs at least two colors"));
    }
    let last = (stops.len() - 1) as f64;
    let mut rendered = Vec::with_capacity(stops.len());
    for (idx, stop) in stops.iter().enumerate() {
        // "color position%" keeps the explicit position; otherwise spread evenly.
        let mut parts = stop.split_whitespace();
        let color = parts
            .next()
            .ok_or_else(|| ToolError::invalid("gradient stop is empty"))?;
        let hex = rgb_to_hex(parse_color(color)?);
        let position = match parts.next() {
            Some(pos) => parse_percent(pos)?,
            None => (idx as f64 / last * 100.0).round(),
        };
        rendered.push(format!("{hex} {position}%"));
    }
    match kind.trim().to_ascii_lowercase().as_str() {
        "linear" | "" => Ok(format!(
            "linear-gradient({}deg, {})",
            angle.rem_euclid(360.0),
            rendered.join(", ")
        )),
        "radial" => Ok(format!("radial-gradient(circle, {})", rendered.join(", "))),
        other => Err(ToolError::unsupported(format!("gradient type: {other}"))),
    }
}

pub fn random_color_internal() -> Result<ColorFormats> {
    let mut bytes = [0u8; 3];
    random::fill_random(&mut bytes)?;
    Ok(formats_for(Rgb::new(bytes[0], bytes[1], bytes[2])))
}

#[wasm_bindgen]
pub fn convert_color(input: &str) -> Result<JsValue, JsValue> {
    respond("color converter", convert_color_internal(input))
}

#[wasm_bindgen]
pub fn check_contrast(foreground: &str, background: &str) -> Result<JsValue, JsValue> {
    respond("contrast checker", contrast_report(foreground, background))
}

#[wasm_bindgen]
pub fn color_palette(base: &str, scheme: &str) -> Result<JsValue, JsValue> {
    respond("palette generator", palette_internal(base, scheme))
}

#[wasm_bindgen]
pub fn gradient_css(kind: &str, angle: f64, stops: Vec<String>) -> Result<String, JsValue> {
    respond_text("gradient generator", gradient_css_internal(kind, angle, &stops))
}

#[wasm_bindgen]
pub fn random_color() -> Result<JsValue, JsValue> {
    respond("random color", random_color_internal())
}
