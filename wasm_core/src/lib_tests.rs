use super::*;

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as B64_STD;
use base64::Engine;
use chrono::Datelike;
use image::{ImageFormat, Rgba, RgbaImage};

fn png_fixture(width: u32, height: u32) -> Vec<u8> {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 255]));
    for x in 0..width / 2 {
        for y in 0..height {
            image.put_pixel(x, y, Rgba([240, 240, 240, 255]));
        }
    }
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .expect("encode png fixture");
    out.into_inner()
}

#[test]
fn current_utc_tracks_wall_clock() {
    let now = current_utc();
    assert!(now.year() >= 2024);
    let delta = (Utc::now() - now).num_seconds().abs();
    assert!(delta < 5, "clock skew {delta}s");
}

#[test]
fn tool_errors_keep_user_facing_messages() {
    let cases = [
        (ToolError::invalid("value is empty"), "value is empty"),
        (ToolError::unsupported("format: tiff"), "unsupported format: tiff"),
        (ToolError::Image("truncated".into()), "image error: truncated"),
        (ToolError::Network("HTTP 503".into()), "network error: HTTP 503"),
        (ToolError::Decode("bad base64".into()), "decode error: bad base64"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn generated_cards_pass_validation() {
    for brand in ["visa", "mastercard", "amex", "discover"] {
        let cards = generators::generate_cards_internal(brand, 5).expect("generate cards");
        for card in cards {
            let report = generators::validate_card_internal(&card).expect("validate card");
            assert!(report.valid, "{brand} card {card} failed Luhn");
            assert!(report.brand.is_some(), "{brand} card {card} brand not detected");
        }
    }
}

#[test]
fn palette_hex_values_parse_as_colors() {
    let palette = images::extract_palette(&png_fixture(16, 16), 4).expect("palette");
    assert!(!palette.is_empty());
    for entry in &palette {
        let formats = color::convert_color_internal(&entry.hex).expect("palette hex parses");
        assert_eq!(formats.hex, entry.hex);
    }
    let total: f64 = palette.iter().map(|entry| entry.percentage).sum();
    assert!((total - 100.0).abs() < 0.5, "percentages sum to {total}");
}

#[test]
fn image_payloads_decode_back_to_images() {
    let result = images::convert_image_bytes(
        "png",
        "webp",
        &png_fixture(10, 6),
        images::ImageOptions::default(),
    )
    .expect("convert to webp");
    let bytes = encoding::base64_decode_bytes(&result.data_base64).expect("base64 payload");
    assert_eq!(bytes, B64_STD.decode(&result.data_base64).expect("std base64"));
    let info = images::image_info_bytes(&bytes).expect("decode webp");
    assert_eq!((info.width, info.height), (10, 6));
    assert_eq!(info.format, "webp");
}

#[test]
fn favicon_set_covers_standard_sizes() {
    let set = images::favicons_from_bytes(&png_fixture(64, 40)).expect("favicons");
    for icon in &set.icons {
        assert_eq!(icon.width, icon.height);
        assert_eq!(icon.mime, "image/png");
    }
    assert!(set.icons.iter().any(|icon| icon.width == 16));
    assert!(set.icons.iter().any(|icon| icon.width == 512));
    assert_eq!(set.ico.mime, "image/x-icon");
}

#[test]
fn subnet_split_children_reassemble_parent_range() {
    let split = network::split_subnet_internal("10.1.0.0/22", 24).expect("split");
    assert_eq!(split.subnets.len(), 4);
    let first = network::subnet_info_internal(&split.subnets[0]).expect("first child");
    let last = network::subnet_info_internal(&split.subnets[3]).expect("last child");
    let blocks = network::range_to_cidrs_internal(&first.network, &last.broadcast).expect("collapse");
    assert_eq!(blocks, vec!["10.1.0.0/22".to_string()]);
}

#[test]
fn hashes_agree_between_single_and_bulk_digest() {
    let data = b"toolbelt";
    let all = encoding::hash_all(data);
    for (algorithm, digest) in &all {
        assert_eq!(&encoding::hash_digest(algorithm, data).expect("digest"), digest);
    }
}

#[test]
fn logging_survives_repeated_failures() {
    logging::init_logging();
    for tool in ["color converter", "subnet calculator"] {
        logging::report_failure(tool, &ToolError::invalid("bad input"));
    }
}
