//! Pixel statistics used by the screenshot classifier.
//!
//! Everything here operates on RGB8 pixels. Decoded images of any other color
//! type (grayscale, RGBA, 16-bit, palette) are converted first, so the
//! statistics describe colors rather than storage modes.

use crate::error::{AnalyzeError, Failure};
use image::{ImageReader, RgbImage};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Number of leading pixels (row-major) inspected for `common_ratio`.
pub const COMMON_SAMPLE_LEN: usize = 10_000;

/// Statistics describing one decoded image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageStatistics {
    /// Source of the pixels. Not used for classification.
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Distinct RGB triples over the whole image.
    pub unique_colors: usize,
    /// Mean channel intensity over all pixels and channels, in [0, 255].
    pub mean_brightness: f64,
    /// Mean over pixels of the summed squared per-channel deviation.
    ///
    /// This is the sum of the three channel variances (not their average),
    /// measured against per-channel means truncated to integers.
    pub variance: f64,
    /// Share of the prefix sample taken by its most frequent color, in [0, 1].
    pub common_ratio: f64,
    /// Pixels in the prefix sample: `min(width * height, COMMON_SAMPLE_LEN)`.
    pub sample_len: usize,
    /// Occurrences of the most frequent color within the prefix sample.
    pub most_common_count: usize,
}

impl ImageStatistics {
    /// Compute statistics for an already decoded RGB buffer.
    ///
    /// A zero-pixel buffer produces all-zero statistics.
    pub fn from_rgb(path: impl Into<PathBuf>, img: &RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixel_count = u64::from(width) * u64::from(height);

        let mut colors: HashSet<[u8; 3]> = HashSet::new();
        let mut channel_sums = [0u64; 3];
        for pixel in img.pixels() {
            colors.insert(pixel.0);
            for (sum, value) in channel_sums.iter_mut().zip(pixel.0) {
                *sum += u64::from(value);
            }
        }

        if pixel_count == 0 {
            return Self {
                path: path.into(),
                width,
                height,
                unique_colors: 0,
                mean_brightness: 0.0,
                variance: 0.0,
                common_ratio: 0.0,
                sample_len: 0,
                most_common_count: 0,
            };
        }

        let total: u64 = channel_sums.iter().sum();
        let mean_brightness = total as f64 / (pixel_count * 3) as f64;

        // Integer division on purpose: reference outputs use truncated means.
        let channel_means = channel_sums.map(|sum| (sum / pixel_count) as i64);
        let squared: u64 = img
            .pixels()
            .map(|pixel| squared_deviation(pixel.0, channel_means))
            .sum();
        let variance = squared as f64 / pixel_count as f64;

        let (sample_len, most_common_count) = most_common_in_prefix(img, COMMON_SAMPLE_LEN);
        let common_ratio = if sample_len == 0 {
            0.0
        } else {
            most_common_count as f64 / sample_len as f64
        };

        Self {
            path: path.into(),
            width,
            height,
            unique_colors: colors.len(),
            mean_brightness,
            variance,
            common_ratio,
            sample_len,
            most_common_count,
        }
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

fn squared_deviation(rgb: [u8; 3], means: [i64; 3]) -> u64 {
    rgb.iter()
        .zip(means)
        .map(|(&value, mean)| {
            let d = i64::from(value) - mean;
            (d * d) as u64
        })
        .sum()
}

/// Returns `(sample_len, max_frequency)` over the first `limit` pixels.
fn most_common_in_prefix(img: &RgbImage, limit: usize) -> (usize, usize) {
    let mut counts: HashMap<[u8; 3], usize> = HashMap::new();
    let mut sample_len = 0;
    for pixel in img.pixels().take(limit) {
        *counts.entry(pixel.0).or_default() += 1;
        sample_len += 1;
    }
    let most_common = counts.values().copied().max().unwrap_or(0);
    (sample_len, most_common)
}

/// Decode the image at `path` and compute its statistics.
///
/// Any decode or I/O problem comes back as a [`Failure`] carrying the error
/// text; nothing is raised to the caller.
pub fn extract(path: impl AsRef<Path>) -> Result<ImageStatistics, Failure> {
    let path = path.as_ref();
    match load_rgb(path) {
        Ok(img) => Ok(ImageStatistics::from_rgb(path, &img)),
        Err(err) => {
            tracing::warn!("Cannot analyze {}: {err}", path.display());
            Err(Failure::new(path, &err))
        }
    }
}

/// Decode by content, so a misnamed or extensionless screenshot still loads.
fn load_rgb(path: &Path) -> Result<RgbImage, AnalyzeError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    let (width, height) = (img.width(), img.height());
    if width == 0 || height == 0 {
        return Err(AnalyzeError::EmptyImage { width, height });
    }
    Ok(img.to_rgb8())
}
