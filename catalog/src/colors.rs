//! Dominant color extraction for chain logos
//!
//! Pixels whose channel sum falls outside `[dark_cutoff, light_cutoff]` are
//! ignored. Among the remaining pixels we report the rounded mean color and the
//! most frequent exact color, the latter never being pure black or pure white.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{CatalogError, Result};

/// Returned for both outputs when nothing survives filtering
pub const FALLBACK_COLOR: &str = "#000000";

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// Channel-sum thresholds for "boring" pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorCutoffs {
    /// Pixels with `r + g + b` strictly below this are too dark
    pub dark_cutoff: u32,
    /// Pixels with `r + g + b` strictly above this are too light
    pub light_cutoff: u32,
}

impl Default for ColorCutoffs {
    fn default() -> Self {
        Self {
            dark_cutoff: 20,
            light_cutoff: 920,
        }
    }
}

impl ColorCutoffs {
    pub fn excludes(&self, rgb: [u8; 3]) -> bool {
        let sum = rgb.iter().map(|&c| c as u32).sum::<u32>();
        sum < self.dark_cutoff || sum > self.light_cutoff
    }
}

/// Result of a color extraction, as `#rrggbb` strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageColors {
    pub average_color: String,
    pub most_common_color: String,
}

impl ImageColors {
    fn fallback() -> Self {
        Self {
            average_color: FALLBACK_COLOR.to_string(),
            most_common_color: FALLBACK_COLOR.to_string(),
        }
    }
}

/// Decode an encoded image (PNG, JPEG, WebP, GIF) and extract its colors
pub fn colors_from_image_bytes(bytes: &[u8], cutoffs: ColorCutoffs) -> Result<ImageColors> {
    let image = image::load_from_memory(bytes)?;
    let rgba = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CatalogError::EmptyImage);
    }

    colors_from_raw(rgba.as_raw(), 4, cutoffs)
}

/// Extract colors from a raw interleaved buffer with `channels` bytes per pixel (3 or 4)
pub fn colors_from_raw(buffer: &[u8], channels: usize, cutoffs: ColorCutoffs) -> Result<ImageColors> {
    if channels != 3 && channels != 4 {
        return Err(CatalogError::internal(format!(
            "unsupported channel count: {}",
            channels
        )));
    }
    if buffer.len() < channels {
        return Err(CatalogError::EmptyImage);
    }

    Ok(extract_colors(
        buffer.chunks_exact(channels).map(|p| [p[0], p[1], p[2]]),
        cutoffs,
    ))
}

/// Core extraction over RGB triples. Alpha is not considered.
pub fn extract_colors<I>(pixels: I, cutoffs: ColorCutoffs) -> ImageColors
where
    I: IntoIterator<Item = [u8; 3]>,
{
    let mut totals = [0u64; 3];
    let mut included = 0u64;
    // color -> (count, first seen position)
    let mut frequencies: HashMap<[u8; 3], (u64, usize)> = HashMap::new();

    for rgb in pixels {
        if cutoffs.excludes(rgb) {
            continue;
        }

        for (total, &channel) in totals.iter_mut().zip(rgb.iter()) {
            *total += channel as u64;
        }
        let order = frequencies.len();
        frequencies.entry(rgb).or_insert((0, order)).0 += 1;
        included += 1;
    }

    if included == 0 {
        return ImageColors::fallback();
    }

    let average = totals.map(|total| rounded_mean(total, included));

    let most_common = frequencies
        .iter()
        .filter(|(rgb, _)| **rgb != BLACK && **rgb != WHITE)
        .max_by(|(_, (count_a, order_a)), (_, (count_b, order_b))| {
            count_a.cmp(count_b).then(order_b.cmp(order_a))
        })
        .map(|(rgb, _)| to_hex(*rgb))
        .unwrap_or_else(|| FALLBACK_COLOR.to_string());

    ImageColors {
        average_color: to_hex(average),
        most_common_color: most_common,
    }
}

fn rounded_mean(total: u64, count: u64) -> u8 {
    ((total + count / 2) / count).min(255) as u8
}

/// Format an RGB triple as `#rrggbb`
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Parse `#rrggbb` (the leading `#` is optional)
pub fn parse_hex(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Black or white, whichever reads better on top of `background`
pub fn contrasting_text_color(background: &str) -> Option<&'static str> {
    let [r, g, b] = parse_hex(background)?;
    let yiq = (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000;
    Some(if yiq >= 128 { "#000000" } else { "#ffffff" })
}
