use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use std::io::Cursor;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Failed to load envelope image: {0}")]
    Load(#[from] image::ImageError),
    #[error("Failed to encode processed image: {0}")]
    Encode(String),
}

// Tesseract is tuned for ~300 DPI; phone photos of envelopes are often much
// larger than that and only slow recognition down.
const MAX_DIMENSION: u32 = 2600;

/// Load an envelope image from disk and return binarized PNG bytes ready for
/// the OCR engine.
pub fn prepare_envelope(path: &Path) -> Result<Vec<u8>, PreprocessError> {
    let img = image::open(path)?;
    encode_png(binarize(img))
}

/// Same as [`prepare_envelope`] but for in-memory bytes (JPEG / PNG / WEBP).
pub fn prepare_envelope_bytes(data: &[u8]) -> Result<Vec<u8>, PreprocessError> {
    let img = image::load_from_memory(data)?;
    encode_png(binarize(img))
}

/// Downscale, grayscale, and Otsu-threshold to black and white.
///
/// Printed PIN digits on an envelope are high-contrast against the paper, so
/// a global threshold picked from the gray-level histogram separates ink from
/// background well enough for recognition.
fn binarize(img: DynamicImage) -> GrayImage {
    let img = if img.width() > MAX_DIMENSION || img.height() > MAX_DIMENSION {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, image::imageops::FilterType::Lanczos3)
    } else {
        img
    };

    let gray: GrayImage = img.to_luma8();
    let threshold = otsu_threshold(&gray);

    ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y)[0] > threshold {
            Luma([255u8])
        } else {
            Luma([0u8])
        }
    })
}

/// Otsu's method: pick the gray level that maximizes between-class variance
/// of the foreground/background split.
fn otsu_threshold(gray: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in gray.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total = gray.width() as u64 * gray.height() as u64;
    if total == 0 {
        return 0;
    }
    let weighted_sum: u64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as u64 * count)
        .sum();

    let mut best_level = 0u8;
    let mut best_variance = 0.0f64;
    let mut background_count = 0u64;
    let mut background_sum = 0u64;

    for level in 0..256 {
        background_count += histogram[level];
        if background_count == 0 {
            continue;
        }
        let foreground_count = total - background_count;
        if foreground_count == 0 {
            break;
        }
        background_sum += level as u64 * histogram[level];

        let mean_bg = background_sum as f64 / background_count as f64;
        let mean_fg = (weighted_sum - background_sum) as f64 / foreground_count as f64;
        let variance = background_count as f64 * foreground_count as f64
            * (mean_bg - mean_fg)
            * (mean_bg - mean_fg);

        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

fn encode_png(img: GrayImage) -> Result<Vec<u8>, PreprocessError> {
    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PreprocessError::Encode(e.to_string()))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_tone(width: u32, height: u32, dark: u8, light: u8) -> GrayImage {
        // Left half dark, right half light.
        ImageBuffer::from_fn(width, height, |x, _| {
            if x < width / 2 { Luma([dark]) } else { Luma([light]) }
        })
    }

    #[test]
    fn otsu_separates_two_tones() {
        let img = split_tone(100, 10, 30, 220);
        let t = otsu_threshold(&img);
        assert!(t >= 30 && t < 220, "threshold {t} should fall between the tones");
    }

    #[test]
    fn binarize_produces_only_black_and_white() {
        let img = DynamicImage::ImageLuma8(split_tone(40, 40, 50, 200));
        let out = binarize(img);
        assert!(out.pixels().all(|p| p[0] == 0 || p[0] == 255));
    }

    #[test]
    fn uniform_image_does_not_panic() {
        let img: GrayImage = ImageBuffer::from_fn(8, 8, |_, _| Luma([128u8]));
        let _ = binarize(DynamicImage::ImageLuma8(img));
    }

    #[test]
    fn oversized_scan_is_downscaled() {
        let img: GrayImage = ImageBuffer::from_fn(3200, 3200, |_, _| Luma([200u8]));
        let out = binarize(DynamicImage::ImageLuma8(img));
        assert!(out.width() <= MAX_DIMENSION && out.height() <= MAX_DIMENSION);
    }

    #[test]
    fn prepare_bytes_emits_png() {
        let img = DynamicImage::ImageLuma8(split_tone(16, 16, 40, 210));
        let mut jpeg = Vec::new();
        img.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
            .unwrap();
        let out = prepare_envelope_bytes(&jpeg).unwrap();
        assert_eq!(&out[..4], b"\x89PNG");
    }

    #[test]
    fn garbage_bytes_are_a_load_error() {
        let err = prepare_envelope_bytes(b"not an image").unwrap_err();
        assert!(matches!(err, PreprocessError::Load(_)));
    }
}
