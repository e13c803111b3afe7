//! Image tools: format conversion, resizing, cropping, filters, watermarks,
//! compression, favicon sets and palette extraction.
//!
//! Every operation decodes the user's bytes (honouring magic bytes before
//! the format hint), works on a `DynamicImage` and re-encodes into an
//! [`ImageResult`] the page can offer as a download. Alpha is kept whenever
//! the target container supports it.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{
    DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, ImageFormat, ImageReader,
    RgbaImage,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::color::{rgb_to_hex, Rgb};
use crate::error::{Result, ToolError};
use crate::{options_from_js, respond};

const MAX_DIMENSION: u32 = 10_000;
const FAVICON_SIZES: [u32; 7] = [16, 32, 48, 64, 180, 192, 512];
const ICO_SIZES: [u32; 3] = [16, 32, 48];
const PALETTE_SAMPLE_EDGE: u32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PictureFormat {
    Png,
    Jpeg,
    Webp,
    Gif,
    Bmp,
    Ico,
}

impl PictureFormat {
    fn parse(input: &str) -> Result<Self> {
        let normalized = input.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            "gif" => Ok(Self::Gif),
            "bmp" => Ok(Self::Bmp),
            "ico" => Ok(Self::Ico),
            other => Err(ToolError::unsupported(format!("image format: {other}"))),
        }
    }

    fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::WebP => Some(Self::Webp),
            ImageFormat::Gif => Some(Self::Gif),
            ImageFormat::Bmp => Some(Self::Bmp),
            ImageFormat::Ico => Some(Self::Ico),
            _ => None,
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Ico => "ico",
        }
    }

    fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Ico => "image/x-icon",
        }
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Webp => ImageFormat::WebP,
            Self::Gif => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
            Self::Ico => ImageFormat::Ico,
        }
    }

    /// Output format for edits that keep the source container. Icons are
    /// size-limited so edits of them come back as PNG.
    fn for_output(self) -> Self {
        match self {
            Self::Ico => Self::Png,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageResult {
    pub format: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub data_base64: String,
    pub data_url: String,
    pub download_name: String,
}

#[derive(Debug, Default, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ImageOptions {
    /// 1-100 quality for JPEG, and for WebP where it drives RGB quantisation.
    pub quality: Option<u8>,
    /// PNG compression level 0-9 (0 = none, 9 = max).
    pub compression: Option<u8>,
    pub lossless: Option<bool>,
}

struct Decoded {
    image: DynamicImage,
    format: PictureFormat,
}

fn decode_image(bytes: &[u8], hint: Option<PictureFormat>) -> Result<Decoded> {
    if bytes.is_empty() {
        return Err(ToolError::invalid("input image is empty"));
    }
    // Magic bytes win so mismatched extensions still decode.
    if let Ok(reader) = ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        let guessed = reader.format().and_then(PictureFormat::from_image_format);
        if let Some(format) = guessed {
            if let Ok(image) = reader.decode() {
                return Ok(Decoded { image, format });
            }
        }
    }
    let fallback = hint.ok_or_else(|| ToolError::Image("unrecognised image data".into()))?;
    let image = image::load_from_memory_with_format(bytes, fallback.image_format()).map_err(
        |err| ToolError::Image(format!("failed to decode {}: {err}", fallback.extension())),
    )?;
    Ok(Decoded {
        image,
        format: fallback,
    })
}

fn ensure_within_limit(width: f64, height: f64) -> Result<()> {
    let limit = f64::from(MAX_DIMENSION);
    if width > limit || height > limit {
        return Err(ToolError::invalid(format!(
            "dimensions are limited to {MAX_DIMENSION}px"
        )));
    }
    Ok(())
}

impl ImageOptions {
    fn jpeg_quality(&self) -> u8 {
        self.quality.unwrap_or(85).clamp(1, 100)
    }

    fn png_compression(&self) -> CompressionType {
        match self.compression.unwrap_or(6).min(9) {
            0 => CompressionType::Uncompressed,
            level => CompressionType::Level(level),
        }
    }

    /// Levels kept per colour channel before the WebP pass, or `None` to
    /// keep every value. The bundled WebP encoder is lossless only, so
    /// quality is traded for size by posterizing first.
    fn webp_levels(&self) -> Option<u16> {
        let quality = self.quality.unwrap_or(100).clamp(1, 100);
        if quality == 100 || self.lossless == Some(true) {
            return None;
        }
        Some(levels_for_quality(quality))
    }
}

/// Quadratic curve so the top of the slider stays close to the source.
fn levels_for_quality(quality: u8) -> u16 {
    (u16::from(quality).pow(2) / 39).clamp(2, 256)
}

/// Snaps each colour channel to `levels` evenly spaced values. Alpha is left
/// alone so soft edges keep their transparency.
fn posterize(rgba: &mut RgbaImage, levels: u16) {
    let top = u32::from(levels.max(2) - 1);
    let table: Vec<u8> = (0..=255u32)
        .map(|value| {
            let bucket = (value * top + 127) / 255;
            ((bucket * 255 + top / 2) / top) as u8
        })
        .collect();
    for pixel in rgba.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = table[usize::from(*channel)];
        }
    }
}

fn write_rgba<E: ImageEncoder>(encoder: E, rgba: &RgbaImage) -> Result<()> {
    let (width, height) = rgba.dimensions();
    encoder.write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)?;
    Ok(())
}

fn encode_to(image: &DynamicImage, target: PictureFormat, options: ImageOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match target {
        PictureFormat::Jpeg => {
            // JPEG has no alpha channel.
            let rgb = image.to_rgb8();
            let (width, height) = rgb.dimensions();
            JpegEncoder::new_with_quality(&mut out, options.jpeg_quality()).write_image(
                rgb.as_raw(),
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        PictureFormat::Png => write_rgba(
            PngEncoder::new_with_quality(&mut out, options.png_compression(), PngFilter::Adaptive),
            &image.to_rgba8(),
        )?,
        PictureFormat::Webp => {
            let mut rgba = image.to_rgba8();
            if let Some(levels) = options.webp_levels() {
                posterize(&mut rgba, levels);
            }
            write_rgba(WebPEncoder::new_lossless(&mut out), &rgba)?;
        }
        PictureFormat::Gif | PictureFormat::Bmp => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut Cursor::new(&mut out), target.image_format())?;
        }
        PictureFormat::Ico => {
            let (width, height) = image.dimensions();
            if width > 256 || height > 256 {
                return Err(ToolError::invalid("icons are limited to 256x256 pixels"));
            }
            IcoEncoder::new(&mut out).encode_images(&[ico_frame(image)?])?;
        }
    }
    Ok(out)
}

fn ico_frame(image: &DynamicImage) -> Result<IcoFrame<'static>> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(IcoFrame::as_png(
        rgba.as_raw(),
        width,
        height,
        ExtendedColorType::Rgba8,
    )?)
}

fn finish(
    image: &DynamicImage,
    target: PictureFormat,
    options: ImageOptions,
    stem: &str,
) -> Result<ImageResult> {
    let encoded = encode_to(image, target, options)?;
    let (width, height) = image.dimensions();
    let data_base64 = STANDARD.encode(&encoded);
    let data_url = format!("data:{};base64,{}", target.mime(), data_base64);
    Ok(ImageResult {
        format: target.extension().into(),
        mime: target.mime().into(),
        width,
        height,
        size_bytes: encoded.len(),
        data_base64,
        data_url,
        download_name: format!("{stem}.{}", target.extension()),
    })
}

fn target_or_source(format: Option<&str>, source: PictureFormat) -> Result<PictureFormat> {
    match format.map(str::trim).filter(|f| !f.is_empty()) {
        Some(name) => PictureFormat::parse(name),
        None => Ok(source.for_output()),
    }
}

/// Converts image bytes between PNG, JPEG, WebP, GIF, BMP and ICO.
pub fn convert_image_bytes(
    from: &str,
    to: &str,
    bytes: &[u8],
    options: ImageOptions,
) -> Result<ImageResult> {
    let hint = PictureFormat::parse(from).ok();
    let target = PictureFormat::parse(to)?;
    let decoded = decode_image(bytes, hint)?;
    finish(&decoded.image, target, options, "converted")
}

fn parse_filter(name: &str) -> Result<FilterType> {
    Ok(match name.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
        "nearest" => FilterType::Nearest,
        "triangle" | "bilinear" => FilterType::Triangle,
        "catmullrom" | "bicubic" => FilterType::CatmullRom,
        "gaussian" => FilterType::Gaussian,
        "" | "lanczos3" | "lanczos" => FilterType::Lanczos3,
        other => return Err(ToolError::unsupported(format!("resize filter: {other}"))),
    })
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Scale both sides by this percentage; overrides width/height.
    pub percent: Option<f64>,
    pub keep_aspect: bool,
    pub filter: String,
    pub format: Option<String>,
    pub quality: Option<u8>,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            percent: None,
            keep_aspect: true,
            filter: "lanczos3".into(),
            format: None,
            quality: None,
        }
    }
}

fn scaled(value: u32, factor: f64) -> u32 {
    ((value as f64 * factor).round() as u32).max(1)
}

/// Target dimensions for a resize; with `keep_aspect` the result fits inside
/// the requested box.
fn resize_dimensions(width: u32, height: u32, options: &ResizeOptions) -> Result<(u32, u32)> {
    let (new_width, new_height) = if let Some(percent) = options.percent {
        if !(percent > 0.0) {
            return Err(ToolError::invalid("percentage must be positive"));
        }
        (scaled(width, percent / 100.0), scaled(height, percent / 100.0))
    } else {
        match (options.width, options.height) {
            (None, None) => return Err(ToolError::invalid("width or height is required")),
            (Some(0), _) | (_, Some(0)) => {
                return Err(ToolError::invalid("dimensions must be positive"))
            }
            (Some(w), None) => (w, scaled(height, w as f64 / width as f64)),
            (None, Some(h)) => (scaled(width, h as f64 / height as f64), h),
            (Some(w), Some(h)) if options.keep_aspect => {
                let factor = (w as f64 / width as f64).min(h as f64 / height as f64);
                (scaled(width, factor).min(w), scaled(height, factor).min(h))
            }
            (Some(w), Some(h)) => (w, h),
        }
    };
    ensure_within_limit(f64::from(new_width), f64::from(new_height))?;
    Ok((new_width, new_height))
}

pub fn resize_image_bytes(bytes: &[u8], options: &ResizeOptions) -> Result<ImageResult> {
    let decoded = decode_image(bytes, None)?;
    let filter = parse_filter(&options.filter)?;
    let (width, height) = decoded.image.dimensions();
    let (new_width, new_height) = resize_dimensions(width, height, options)?;
    let resized = decoded.image.resize_exact(new_width, new_height, filter);
    let target = target_or_source(options.format.as_deref(), decoded.format)?;
    let encode = ImageOptions {
        quality: options.quality,
        ..ImageOptions::default()
    };
    finish(&resized, target, encode, "resized")
}

pub fn crop_image_bytes(bytes: &[u8], x: u32, y: u32, width: u32, height: u32) -> Result<ImageResult> {
    let decoded = decode_image(bytes, None)?;
    let (image_width, image_height) = decoded.image.dimensions();
    if width == 0 || height == 0 {
        return Err(ToolError::invalid("crop area must not be empty"));
    }
    let fits = x.checked_add(width).is_some_and(|right| right <= image_width)
        && y.checked_add(height).is_some_and(|bottom| bottom <= image_height);
    if !fits {
        return Err(ToolError::invalid(format!(
            "crop area must lie within the {image_width}x{image_height} image"
        )));
    }
    let cropped = decoded.image.crop_imm(x, y, width, height);
    finish(&cropped, decoded.format.for_output(), ImageOptions::default(), "cropped")
}

pub fn transform_image_bytes(
    bytes: &[u8],
    rotate: u32,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> Result<ImageResult> {
    let decoded = decode_image(bytes, None)?;
    let mut image = match rotate % 360 {
        0 => decoded.image,
        90 => decoded.image.rotate90(),
        180 => decoded.image.rotate180(),
        270 => decoded.image.rotate270(),
        other => {
            return Err(ToolError::invalid(format!(
                "rotation must be 0, 90, 180 or 270 degrees, got {other}"
            )))
        }
    };
    if flip_horizontal {
        image = image.fliph();
    }
    if flip_vertical {
        image = image.flipv();
    }
    finish(&image, decoded.format.for_output(), ImageOptions::default(), "transformed")
}

fn sepia(image: &DynamicImage, amount: f32) -> DynamicImage {
    let amount = amount.clamp(0.0, 1.0);
    let mut rgba = image.to_rgba8();
    for pixel in rgba.pixels_mut() {
        let [r, g, b, a] = pixel.0.map(f32::from);
        let tone = [
            0.393 * r + 0.769 * g + 0.189 * b,
            0.349 * r + 0.686 * g + 0.168 * b,
            0.272 * r + 0.534 * g + 0.131 * b,
        ];
        let mix = |orig: f32, toned: f32| (orig + (toned - orig) * amount).clamp(0.0, 255.0) as u8;
        pixel.0 = [mix(r, tone[0]), mix(g, tone[1]), mix(b, tone[2]), a as u8];
    }
    DynamicImage::ImageRgba8(rgba)
}

/// `amount` is filter specific: blur sigma, brightness offset, contrast
/// percentage, sepia strength (0-1) or sharpen sigma.
pub fn filter_image_bytes(bytes: &[u8], kind: &str, amount: f32) -> Result<ImageResult> {
    let decoded = decode_image(bytes, None)?;
    let image = decoded.image;
    let filtered = match kind.trim().to_ascii_lowercase().as_str() {
        "grayscale" | "greyscale" => {
            // Keep alpha by converting to LumaA before going back to RGBA.
            DynamicImage::ImageLumaA8(image.to_luma_alpha8())
        }
        "invert" => {
            let mut inverted = image;
            inverted.invert();
            inverted
        }
        "blur" => image.blur(if amount > 0.0 { amount } else { 2.0 }),
        "brighten" => image.brighten(amount.round() as i32),
        "contrast" => image.adjust_contrast(amount),
        "sepia" => sepia(&image, if amount > 0.0 { amount } else { 1.0 }),
        "sharpen" => image.unsharpen(if amount > 0.0 { amount } else { 1.0 }, 1),
        other => return Err(ToolError::unsupported(format!("filter: {other}"))),
    };
    finish(&filtered, decoded.format.for_output(), ImageOptions::default(), "filtered")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Center,
    End,
}

fn parse_position(position: &str) -> Result<Option<(Anchor, Anchor)>> {
    let normalized = position.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    if normalized == "tile" {
        return Ok(None);
    }
    let (vertical, horizontal) = match normalized.as_str() {
        "center" | "middle" => ("center", "center"),
        "top" | "bottom" => (normalized.as_str(), "center"),
        "left" | "right" => ("center", normalized.as_str()),
        other => other
            .split_once('-')
            .ok_or_else(|| ToolError::unsupported(format!("watermark position: {position}")))?,
    };
    let vertical = match vertical {
        "top" => Anchor::Start,
        "center" | "middle" => Anchor::Center,
        "bottom" => Anchor::End,
        _ => return Err(ToolError::unsupported(format!("watermark position: {position}"))),
    };
    let horizontal = match horizontal {
        "left" => Anchor::Start,
        "center" | "middle" => Anchor::Center,
        "right" => Anchor::End,
        _ => return Err(ToolError::unsupported(format!("watermark position: {position}"))),
    };
    Ok(Some((vertical, horizontal)))
}

fn anchor_offset(anchor: Anchor, outer: u32, inner: u32, margin: u32) -> i64 {
    match anchor {
        Anchor::Start => margin as i64,
        Anchor::Center => (outer as i64 - inner as i64) / 2,
        Anchor::End => outer as i64 - inner as i64 - margin as i64,
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkOptions {
    /// `top-left` .. `bottom-right`, `center`, or `tile`.
    pub position: String,
    pub opacity: f32,
    /// Overlay width relative to the base image width.
    pub scale: f32,
    pub margin: u32,
    pub format: Option<String>,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            position: "bottom-right".into(),
            opacity: 0.5,
            scale: 0.25,
            margin: 16,
            format: None,
        }
    }
}

fn prepare_overlay(overlay: &DynamicImage, base_width: u32, options: &WatermarkOptions) -> Result<RgbaImage> {
    if !(0.0..=1.0).contains(&options.opacity) {
        return Err(ToolError::invalid("opacity must be between 0 and 1"));
    }
    if !(options.scale > 0.0 && options.scale <= 1.0) {
        return Err(ToolError::invalid("scale must be in (0, 1]"));
    }
    let (width, height) = overlay.dimensions();
    let target_width = (f64::from(base_width) * f64::from(options.scale)).round().max(1.0);
    let target_height = (f64::from(height) * target_width / f64::from(width)).round().max(1.0);
    ensure_within_limit(target_width, target_height)?;
    let (target_width, target_height) = (target_width as u32, target_height as u32);
    let mut rgba = overlay
        .resize_exact(target_width, target_height, FilterType::Lanczos3)
        .to_rgba8();
    for pixel in rgba.pixels_mut() {
        pixel.0[3] = (pixel.0[3] as f32 * options.opacity).round() as u8;
    }
    Ok(rgba)
}

pub fn watermark_image_bytes(
    base: &[u8],
    overlay: &[u8],
    options: &WatermarkOptions,
) -> Result<ImageResult> {
    let decoded = decode_image(base, None)?;
    let mark = decode_image(overlay, None)?;
    let mut canvas = decoded.image.to_rgba8();
    let (width, height) = canvas.dimensions();
    let stamp = prepare_overlay(&mark.image, width, options)?;
    let (stamp_width, stamp_height) = stamp.dimensions();
    match parse_position(&options.position)? {
        Some((vertical, horizontal)) => {
            let x = anchor_offset(horizontal, width, stamp_width, options.margin);
            let y = anchor_offset(vertical, height, stamp_height, options.margin);
            image::imageops::overlay(&mut canvas, &stamp, x, y);
        }
        None => {
            let step_x = stamp_width.saturating_add(options.margin) as usize;
            let step_y = stamp_height.saturating_add(options.margin) as usize;
            for y in (0..height).step_by(step_y) {
                for x in (0..width).step_by(step_x) {
                    image::imageops::overlay(&mut canvas, &stamp, x as i64, y as i64);
                }
            }
        }
    }
    let target = target_or_source(options.format.as_deref(), decoded.format)?;
    finish(
        &DynamicImage::ImageRgba8(canvas),
        target,
        ImageOptions::default(),
        "watermarked",
    )
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompressionReport {
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    /// Negative when re-encoding grew the file.
    pub saving_percent: f64,
    pub result: ImageResult,
}

/// Re-encodes at the requested quality. Without a format JPEG and WebP
/// sources keep their container and everything else becomes JPEG.
pub fn compress_image_bytes(bytes: &[u8], quality: u8, format: &str) -> Result<CompressionReport> {
    if !(1..=100).contains(&quality) {
        return Err(ToolError::invalid("quality must be between 1 and 100"));
    }
    let decoded = decode_image(bytes, None)?;
    let target = if format.trim().is_empty() {
        match decoded.format {
            PictureFormat::Webp => PictureFormat::Webp,
            _ => PictureFormat::Jpeg,
        }
    } else {
        PictureFormat::parse(format)?
    };
    let options = ImageOptions {
        quality: Some(quality),
        compression: Some(9),
        lossless: None,
    };
    let result = finish(&decoded.image, target, options, "compressed")?;
    let saving = (1.0 - result.size_bytes as f64 / bytes.len() as f64) * 100.0;
    Ok(CompressionReport {
        original_bytes: bytes.len(),
        compressed_bytes: result.size_bytes,
        saving_percent: (saving * 10.0).round() / 10.0,
        result,
    })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FaviconSet {
    pub icons: Vec<ImageResult>,
    pub ico: ImageResult,
}

fn square_center(image: &DynamicImage) -> DynamicImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    image.crop_imm((width - side) / 2, (height - side) / 2, side, side)
}

pub fn favicons_from_bytes(bytes: &[u8]) -> Result<FaviconSet> {
    let decoded = decode_image(bytes, None)?;
    let square = square_center(&decoded.image);
    let icons = FAVICON_SIZES
        .iter()
        .map(|&size| {
            let icon = square.resize_exact(size, size, FilterType::Lanczos3);
            let mut result = finish(&icon, PictureFormat::Png, ImageOptions::default(), "favicon")?;
            result.download_name = match size {
                180 => "apple-touch-icon.png".into(),
                _ => format!("favicon-{size}x{size}.png"),
            };
            Ok(result)
        })
        .collect::<Result<Vec<_>>>()?;
    let frames = ICO_SIZES
        .iter()
        .map(|&size| ico_frame(&square.resize_exact(size, size, FilterType::Lanczos3)))
        .collect::<Result<Vec<_>>>()?;
    let mut buffer = Vec::new();
    IcoEncoder::new(Cursor::new(&mut buffer)).encode_images(&frames)?;
    let data_base64 = STANDARD.encode(&buffer);
    let ico = ImageResult {
        format: "ico".into(),
        mime: PictureFormat::Ico.mime().into(),
        width: 48,
        height: 48,
        size_bytes: buffer.len(),
        data_url: format!("data:{};base64,{}", PictureFormat::Ico.mime(), data_base64),
        data_base64,
        download_name: "favicon.ico".into(),
    };
    Ok(FaviconSet { icons, ico })
}

#[derive(Debug, Serialize, PartialEq)]
pub struct PaletteColor {
    pub hex: String,
    pub percentage: f64,
}

#[derive(Default)]
struct Bucket {
    count: u64,
    sums: [u64; 3],
}

/// Dominant colours from a 5-bit-per-channel histogram. Mostly transparent
/// pixels are skipped.
pub fn extract_palette(bytes: &[u8], count: usize) -> Result<Vec<PaletteColor>> {
    if !(1..=16).contains(&count) {
        return Err(ToolError::invalid("palette size must be between 1 and 16"));
    }
    let decoded = decode_image(bytes, None)?;
    let (width, height) = decoded.image.dimensions();
    let sample = if width > PALETTE_SAMPLE_EDGE || height > PALETTE_SAMPLE_EDGE {
        decoded.image.thumbnail(PALETTE_SAMPLE_EDGE, PALETTE_SAMPLE_EDGE)
    } else {
        decoded.image
    };
    let mut buckets: HashMap<(u8, u8, u8), Bucket> = HashMap::new();
    let mut total = 0u64;
    for pixel in sample.to_rgba8().pixels() {
        let [r, g, b, a] = pixel.0;
        if a < 128 {
            continue;
        }
        let bucket = buckets.entry((r >> 3, g >> 3, b >> 3)).or_default();
        bucket.count += 1;
        bucket.sums[0] += r as u64;
        bucket.sums[1] += g as u64;
        bucket.sums[2] += b as u64;
        total += 1;
    }
    if total == 0 {
        return Err(ToolError::invalid("image has no opaque pixels"));
    }
    let mut ranked: Vec<((u8, u8, u8), Bucket)> = buckets.into_iter().collect();
    ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count).then_with(|| a.0.cmp(&b.0)));
    Ok(ranked
        .into_iter()
        .take(count)
        .map(|(_, bucket)| {
            let average = |idx: usize| (bucket.sums[idx] as f64 / bucket.count as f64).round() as u8;
            let percentage = bucket.count as f64 / total as f64 * 100.0;
            PaletteColor {
                hex: rgb_to_hex(Rgb::new(average(0), average(1), average(2))),
                percentage: (percentage * 10.0).round() / 10.0,
            }
        })
        .collect())
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub format: String,
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub color_type: String,
    pub has_alpha: bool,
}

pub fn image_info_bytes(bytes: &[u8]) -> Result<ImageInfo> {
    let decoded = decode_image(bytes, None)?;
    let (width, height) = decoded.image.dimensions();
    let color = decoded.image.color();
    Ok(ImageInfo {
        format: decoded.format.extension().into(),
        mime: decoded.format.mime().into(),
        width,
        height,
        size_bytes: bytes.len(),
        color_type: format!("{color:?}"),
        has_alpha: color.has_alpha(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBatchInput {
    /// Source format hint (file extension) used when magic bytes are ambiguous.
    #[serde(default)]
    pub from: String,
    pub to: String,
    pub bytes: Vec<u8>,
    /// Original file name so downloads keep the stem.
    pub file_name: Option<String>,
    #[serde(default)]
    pub options: ImageOptions,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageBatchResult {
    pub file_name: String,
    pub result: Option<ImageResult>,
    pub error: Option<String>,
}

/// Converts each entry on its own; one bad file does not fail the batch.
pub fn convert_image_batch(entries: Vec<ImageBatchInput>) -> Vec<ImageBatchResult> {
    entries
        .into_iter()
        .map(|entry| {
            let name = entry
                .file_name
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "converted".to_string());
            match convert_image_bytes(&entry.from, &entry.to, &entry.bytes, entry.options) {
                Ok(mut res) => {
                    res.download_name = derive_download_name(&name, &res.format);
                    ImageBatchResult {
                        file_name: name,
                        result: Some(res),
                        error: None,
                    }
                }
                Err(err) => {
                    log::debug!("batch entry {name} failed: {err}");
                    ImageBatchResult {
                        file_name: name,
                        result: None,
                        error: Some(err.to_string()),
                    }
                }
            }
        })
        .collect()
}

fn derive_download_name(original: &str, target_ext: &str) -> String {
    let stem = Path::new(original)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("converted");
    let safe_stem: String = stem
        .chars()
        .map(|ch| if ch == '/' || ch == '\\' { '_' } else { ch })
        .collect();
    format!("{safe_stem}.{target_ext}")
}

#[wasm_bindgen]
pub fn convert_image(from: &str, to: &str, bytes: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    let result = options_from_js::<ImageOptions>(options)
        .and_then(|opts| convert_image_bytes(from, to, bytes, opts));
    respond("image converter", result)
}

#[wasm_bindgen]
pub fn convert_images(entries: JsValue) -> Result<JsValue, JsValue> {
    let result = serde_wasm_bindgen::from_value::<Vec<ImageBatchInput>>(entries)
        .map(convert_image_batch)
        .map_err(|err| ToolError::invalid(err.to_string()));
    respond("batch image converter", result)
}

#[wasm_bindgen]
pub fn resize_image(bytes: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    let result = options_from_js::<ResizeOptions>(options)
        .and_then(|opts| resize_image_bytes(bytes, &opts));
    respond("image resizer", result)
}

#[wasm_bindgen]
pub fn crop_image(bytes: &[u8], x: u32, y: u32, width: u32, height: u32) -> Result<JsValue, JsValue> {
    respond("image cropper", crop_image_bytes(bytes, x, y, width, height))
}

#[wasm_bindgen]
pub fn transform_image(
    bytes: &[u8],
    rotate: u32,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> Result<JsValue, JsValue> {
    let result = transform_image_bytes(bytes, rotate, flip_horizontal, flip_vertical);
    respond("image rotate/flip", result)
}

#[wasm_bindgen]
pub fn filter_image(bytes: &[u8], kind: &str, amount: f32) -> Result<JsValue, JsValue> {
    respond("image filters", filter_image_bytes(bytes, kind, amount))
}

#[wasm_bindgen]
pub fn watermark_image(base: &[u8], overlay: &[u8], options: JsValue) -> Result<JsValue, JsValue> {
    let result = options_from_js::<WatermarkOptions>(options)
        .and_then(|opts| watermark_image_bytes(base, overlay, &opts));
    respond("watermark", result)
}

#[wasm_bindgen]
pub fn compress_image(bytes: &[u8], quality: u8, format: &str) -> Result<JsValue, JsValue> {
    respond("image compressor", compress_image_bytes(bytes, quality, format))
}

#[wasm_bindgen]
pub fn generate_favicons(bytes: &[u8]) -> Result<JsValue, JsValue> {
    respond("favicon generator", favicons_from_bytes(bytes))
}

#[wasm_bindgen]
pub fn image_palette(bytes: &[u8], count: usize) -> Result<JsValue, JsValue> {
    respond("palette extractor", extract_palette(bytes, count))
}

#[wasm_bindgen]
pub fn image_info(bytes: &[u8]) -> Result<JsValue, JsValue> {
    respond("image info", image_info_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgba};

    fn sample_rgba() -> DynamicImage {
        // 2x2 with a transparent pixel so alpha handling is observable.
        let buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(2, 2, |x, y| match (x, y) {
            (0, 0) => Rgba([255, 0, 0, 255]),
            (1, 0) => Rgba([0, 255, 0, 255]),
            (0, 1) => Rgba([0, 0, 255, 128]),
            _ => Rgba([255, 255, 255, 0]),
        });
        DynamicImage::ImageRgba8(buf)
    }

    fn solid(width: u32, height: u32, color: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(ImageBuffer::from_pixel(width, height, Rgba(color)))
    }

    fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
        let buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
            let r = ((x * 5 + y * 3) % 256) as u8;
            let g = ((x * 7 + y * 11) % 256) as u8;
            let b = ((x * 13 + y * 17) % 256) as u8;
            Rgba([r, g, b, 255])
        });
        DynamicImage::ImageRgba8(buf)
    }

    fn noisy_rgba(width: u32, height: u32) -> DynamicImage {
        let mut seed: u32 = 0x4d59_5df4;
        let buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |_x, _y| {
            seed = seed
                .wrapping_mul(1_664_525)
                .wrapping_add(1_013_904_223)
                .rotate_left(5);
            Rgba([
                (seed & 0xff) as u8,
                ((seed >> 8) & 0xff) as u8,
                ((seed >> 16) & 0xff) as u8,
                255,
            ])
        });
        DynamicImage::ImageRgba8(buf)
    }

    fn encode_as(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("encode fixture");
        bytes
    }

    fn png(image: &DynamicImage) -> Vec<u8> {
        encode_as(image, ImageFormat::Png)
    }

    fn decode_result(result: &ImageResult) -> DynamicImage {
        let bytes = STANDARD.decode(&result.data_base64).expect("base64");
        image::load_from_memory(&bytes).expect("decode result")
    }

    #[test]
    fn png_to_webp_preserves_alpha_channel() {
        let result =
            convert_image_bytes("png", "webp", &png(&sample_rgba()), ImageOptions::default())
                .unwrap();
        assert_eq!(result.mime, "image/webp");
        assert_eq!(result.format, "webp");
        assert_eq!(result.size_bytes, STANDARD.decode(&result.data_base64).unwrap().len());
        let decoded = decode_result(&result).to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0[3], 0);
    }

    #[test]
    fn magic_bytes_override_wrong_hint() {
        let jpeg = encode_as(&DynamicImage::ImageRgb8(gradient_rgba(4, 4).to_rgb8()), ImageFormat::Jpeg);
        let result = convert_image_bytes("png", "bmp", &jpeg, ImageOptions::default()).unwrap();
        assert_eq!(result.format, "bmp");
        assert!(result.data_url.starts_with("data:image/bmp;base64,"));
        assert_eq!((result.width, result.height), (4, 4));
    }

    #[test]
    fn webp_quality_100_stays_lossless() {
        let fixture = gradient_rgba(8, 8);
        let options = ImageOptions {
            quality: Some(100),
            ..ImageOptions::default()
        };
        let result = convert_image_bytes("png", "webp", &png(&fixture), options).unwrap();
        assert_eq!(decode_result(&result).to_rgba8(), fixture.to_rgba8());
    }

    #[test]
    fn webp_quality_controls_size() {
        let bytes = png(&noisy_rgba(64, 64));
        let lossless = convert_image_bytes("png", "webp", &bytes, ImageOptions::default()).unwrap();
        let lossy = convert_image_bytes(
            "png",
            "webp",
            &bytes,
            ImageOptions {
                quality: Some(35),
                lossless: Some(false),
                ..ImageOptions::default()
            },
        )
        .unwrap();
        assert!(lossy.size_bytes < lossless.size_bytes);
    }

    #[test]
    fn rejects_empty_and_garbage_input() {
        let err = convert_image_bytes("png", "jpg", &[], ImageOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "input image is empty");
        assert!(convert_image_bytes("png", "jpg", b"not an image", ImageOptions::default()).is_err());
        assert!(convert_image_bytes("png", "tiff", &png(&sample_rgba()), ImageOptions::default()).is_err());
    }

    #[test]
    fn resize_keeps_aspect_inside_box() {
        let bytes = png(&gradient_rgba(200, 100));
        let options = ResizeOptions {
            width: Some(50),
            height: Some(50),
            ..ResizeOptions::default()
        };
        let result = resize_image_bytes(&bytes, &options).unwrap();
        assert_eq!((result.width, result.height), (50, 25));
        assert_eq!(result.format, "png");

        let stretched = ResizeOptions {
            width: Some(50),
            height: Some(50),
            keep_aspect: false,
            filter: "nearest".into(),
            ..ResizeOptions::default()
        };
        let result = resize_image_bytes(&bytes, &stretched).unwrap();
        assert_eq!((result.width, result.height), (50, 50));
    }

    #[test]
    fn resize_by_percentage_and_single_side() {
        let bytes = png(&gradient_rgba(200, 100));
        let half = ResizeOptions {
            percent: Some(50.0),
            ..ResizeOptions::default()
        };
        let result = resize_image_bytes(&bytes, &half).unwrap();
        assert_eq!((result.width, result.height), (100, 50));
        let by_height = ResizeOptions {
            height: Some(10),
            format: Some("jpg".into()),
            ..ResizeOptions::default()
        };
        let result = resize_image_bytes(&bytes, &by_height).unwrap();
        assert_eq!((result.width, result.height), (20, 10));
        assert_eq!(result.mime, "image/jpeg");
    }

    #[test]
    fn resize_validates_options() {
        let bytes = png(&gradient_rgba(10, 10));
        assert!(resize_image_bytes(&bytes, &ResizeOptions::default()).is_err());
        let huge = ResizeOptions {
            width: Some(20_000),
            ..ResizeOptions::default()
        };
        assert!(resize_image_bytes(&bytes, &huge).is_err());
        let bad_filter = ResizeOptions {
            width: Some(5),
            filter: "sinc".into(),
            ..ResizeOptions::default()
        };
        assert!(resize_image_bytes(&bytes, &bad_filter).is_err());
    }

    #[test]
    fn crop_must_fit() {
        let bytes = png(&gradient_rgba(10, 8));
        let result = crop_image_bytes(&bytes, 2, 2, 5, 6).unwrap();
        assert_eq!((result.width, result.height), (5, 6));
        assert_eq!(
            decode_result(&result).to_rgba8().get_pixel(0, 0),
            gradient_rgba(10, 8).to_rgba8().get_pixel(2, 2)
        );
        assert!(crop_image_bytes(&bytes, 6, 0, 5, 1).is_err());
        assert!(crop_image_bytes(&bytes, 0, 0, 0, 1).is_err());
        assert!(crop_image_bytes(&bytes, u32::MAX, 0, 2, 1).is_err());
    }

    #[test]
    fn rotate_and_flip() {
        let bytes = png(&sample_rgba());
        let rotated = transform_image_bytes(&png(&gradient_rgba(4, 2)), 90, false, false).unwrap();
        assert_eq!((rotated.width, rotated.height), (2, 4));
        let flipped = decode_result(&transform_image_bytes(&bytes, 0, true, false).unwrap()).to_rgba8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert!(transform_image_bytes(&bytes, 45, false, false).is_err());
    }

    #[test]
    fn filters_change_pixels() {
        let bytes = png(&solid(4, 4, [200, 100, 50, 255]));
        let inverted = decode_result(&filter_image_bytes(&bytes, "invert", 0.0).unwrap()).to_rgba8();
        assert_eq!(inverted.get_pixel(0, 0).0, [55, 155, 205, 255]);
        let gray = decode_result(&filter_image_bytes(&bytes, "grayscale", 0.0).unwrap()).to_rgba8();
        let [r, g, b, _] = gray.get_pixel(0, 0).0;
        assert!(r == g && g == b);
        let brighter = decode_result(&filter_image_bytes(&bytes, "brighten", 20.0).unwrap()).to_rgba8();
        assert_eq!(brighter.get_pixel(0, 0).0, [220, 120, 70, 255]);
        for kind in ["blur", "contrast", "sepia", "sharpen"] {
            assert!(filter_image_bytes(&bytes, kind, 0.5).is_ok(), "{kind}");
        }
        assert!(filter_image_bytes(&bytes, "oilpaint", 1.0).is_err());
    }

    #[test]
    fn watermark_lands_in_requested_corner() {
        let base = png(&solid(100, 100, [255, 255, 255, 255]));
        let mark = png(&solid(10, 10, [0, 0, 0, 255]));
        let options = WatermarkOptions {
            position: "top-left".into(),
            opacity: 1.0,
            scale: 0.1,
            margin: 5,
            format: None,
        };
        let result = watermark_image_bytes(&base, &mark, &options).unwrap();
        let out = decode_result(&result).to_rgba8();
        assert_eq!(out.get_pixel(5, 5).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(4, 4).0, [255, 255, 255, 255]);
        assert_eq!(out.get_pixel(95, 95).0, [255, 255, 255, 255]);
    }

    #[test]
    fn watermark_tiles_and_validates() {
        let base = png(&solid(40, 40, [255, 255, 255, 255]));
        let mark = png(&solid(4, 4, [0, 0, 0, 255]));
        let tiled = WatermarkOptions {
            position: "tile".into(),
            opacity: 1.0,
            scale: 0.25,
            margin: 10,
            format: None,
        };
        let out = decode_result(&watermark_image_bytes(&base, &mark, &tiled).unwrap()).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(20, 20).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(15, 15).0, [255, 255, 255, 255]);
        let bad = WatermarkOptions {
            opacity: 1.5,
            ..WatermarkOptions::default()
        };
        assert!(watermark_image_bytes(&base, &mark, &bad).is_err());
        let nowhere = WatermarkOptions {
            position: "upper-east".into(),
            ..WatermarkOptions::default()
        };
        assert!(watermark_image_bytes(&base, &mark, &nowhere).is_err());
    }

    #[test]
    fn watermark_rejects_overlay_taller_than_limit() {
        let base = png(&solid(100, 100, [255, 255, 255, 255]));
        // A 1x2000 strip scaled to 100px wide would be 200000px tall.
        let strip = png(&solid(1, 2000, [0, 0, 0, 255]));
        let options = WatermarkOptions {
            scale: 1.0,
            ..WatermarkOptions::default()
        };
        let err = watermark_image_bytes(&base, &strip, &options).unwrap_err();
        assert!(err.to_string().contains("limited"), "{err}");
    }

    #[test]
    fn tiling_with_huge_margin_places_one_stamp() {
        let base = png(&solid(40, 40, [255, 255, 255, 255]));
        let mark = png(&solid(4, 4, [0, 0, 0, 255]));
        let options = WatermarkOptions {
            position: "tile".into(),
            opacity: 1.0,
            scale: 0.25,
            margin: u32::MAX,
            format: None,
        };
        let out = decode_result(&watermark_image_bytes(&base, &mark, &options).unwrap()).to_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(out.get_pixel(20, 20).0, [255, 255, 255, 255]);
    }

    #[test]
    fn posterize_snaps_colour_but_keeps_alpha() {
        let mut rgba = RgbaImage::from_fn(16, 1, |x, _| Rgba([(x * 17) as u8, 200, 0, (x * 16) as u8]));
        let alpha: Vec<u8> = rgba.pixels().map(|pixel| pixel.0[3]).collect();
        posterize(&mut rgba, 2);
        for pixel in rgba.pixels() {
            assert!(pixel.0[..3].iter().all(|&c| c == 0 || c == 255), "{:?}", pixel.0);
        }
        assert_eq!(rgba.pixels().map(|pixel| pixel.0[3]).collect::<Vec<_>>(), alpha);

        let mut untouched = RgbaImage::from_fn(16, 16, |x, y| Rgba([(x * 16) as u8, (y * 16) as u8, 7, 255]));
        let before = untouched.clone();
        posterize(&mut untouched, 256);
        assert_eq!(untouched, before);
    }

    #[test]
    fn webp_levels_follow_quality_and_lossless_flag() {
        let with = |quality: Option<u8>, lossless: Option<bool>| ImageOptions {
            quality,
            lossless,
            compression: None,
        };
        assert_eq!(with(None, None).webp_levels(), None);
        assert_eq!(with(Some(100), Some(false)).webp_levels(), None);
        assert_eq!(with(Some(50), Some(true)).webp_levels(), None);
        assert_eq!(with(Some(1), None).webp_levels(), Some(2));
        let low = with(Some(35), None).webp_levels().unwrap();
        let high = with(Some(90), None).webp_levels().unwrap();
        assert!(low < high && high <= 256);
    }

    #[test]
    fn compress_reports_savings() {
        let bytes = png(&noisy_rgba(64, 64));
        let report = compress_image_bytes(&bytes, 40, "").unwrap();
        assert_eq!(report.result.format, "jpg");
        assert_eq!(report.original_bytes, bytes.len());
        assert!(report.compressed_bytes < report.original_bytes);
        assert!(report.saving_percent > 0.0);
        assert!(compress_image_bytes(&bytes, 0, "").is_err());
    }

    #[test]
    fn favicon_set_covers_all_sizes() {
        let set = favicons_from_bytes(&png(&gradient_rgba(300, 200))).unwrap();
        let sizes: Vec<u32> = set.icons.iter().map(|icon| icon.width).collect();
        assert_eq!(sizes, FAVICON_SIZES.to_vec());
        assert!(set.icons.iter().all(|icon| icon.width == icon.height));
        assert_eq!(set.icons[4].download_name, "apple-touch-icon.png");
        assert_eq!(set.ico.mime, "image/x-icon");
        let ico_bytes = STANDARD.decode(&set.ico.data_base64).unwrap();
        let ico = image::load_from_memory_with_format(&ico_bytes, ImageFormat::Ico).unwrap();
        assert_eq!(ico.dimensions(), (48, 48));
    }

    #[test]
    fn palette_ranks_dominant_colors() {
        let buf: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_fn(10, 10, |x, y| {
            if y < 7 {
                Rgba([255, 0, 0, 255])
            } else if x < 5 {
                Rgba([0, 0, 255, 255])
            } else {
                Rgba([0, 255, 0, 0])
            }
        });
        let palette = extract_palette(&png(&DynamicImage::ImageRgba8(buf)), 5).unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette[0].hex, "#FF0000");
        assert_eq!(palette[0].percentage, 82.4);
        assert_eq!(palette[1].hex, "#0000FF");
        assert!(extract_palette(&png(&sample_rgba()), 0).is_err());
    }

    #[test]
    fn info_reports_format_and_color_type() {
        let bytes = png(&sample_rgba());
        let info = image_info_bytes(&bytes).unwrap();
        assert_eq!(info.format, "png");
        assert_eq!((info.width, info.height), (2, 2));
        assert_eq!(info.size_bytes, bytes.len());
        assert_eq!(info.color_type, "Rgba8");
        assert!(info.has_alpha);
    }

    #[test]
    fn batch_preserves_names_and_isolates_failures() {
        let batch = vec![
            ImageBatchInput {
                from: "png".into(),
                to: "webp".into(),
                bytes: png(&sample_rgba()),
                file_name: Some("first.png".into()),
                options: ImageOptions::default(),
            },
            ImageBatchInput {
                from: "png".into(),
                to: "jpg".into(),
                bytes: Vec::new(),
                file_name: Some("blank.png".into()),
                options: ImageOptions::default(),
            },
            ImageBatchInput {
                from: "png".into(),
                to: "gif".into(),
                bytes: png(&sample_rgba()),
                file_name: Some("second photo.png".into()),
                options: ImageOptions::default(),
            },
        ];
        let results = convert_image_batch(batch);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].result.as_ref().unwrap().download_name, "first.webp");
        assert!(results[1].result.is_none());
        assert_eq!(results[1].error.as_deref(), Some("input image is empty"));
        assert_eq!(results[2].file_name, "second photo.png");
        assert_eq!(results[2].result.as_ref().unwrap().download_name, "second photo.gif");
    }
}
