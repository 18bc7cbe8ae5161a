//! Analyze many screenshots in parallel and count the outcomes.

use crate::classify::Category;
use crate::config::Thresholds;
use crate::stats::{ImageStatistics, extract};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// What happened to a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Classified {
        category: Category,
        stats: ImageStatistics,
    },
    /// Decoding or reading failed; kept apart from `Unknown` on purpose.
    Failed { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageReport {
    pub file: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ImageReport {
    pub fn category(&self) -> Option<Category> {
        match &self.outcome {
            Outcome::Classified { category, .. } => Some(*category),
            Outcome::Failed { .. } => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

/// Analyze and classify one image.
pub fn analyze_one(path: impl AsRef<Path>, thresholds: &Thresholds) -> ImageReport {
    let path = path.as_ref();
    let outcome = match extract(path) {
        Ok(stats) => {
            let category = thresholds.classify(&stats);
            tracing::debug!(
                "{}: {category} (colors={}, brightness={:.1}, variance={:.1}, common={:.3})",
                path.display(),
                stats.unique_colors,
                stats.mean_brightness,
                stats.variance,
                stats.common_ratio
            );
            Outcome::Classified { category, stats }
        }
        Err(failure) => Outcome::Failed {
            message: failure.message,
        },
    };
    ImageReport {
        file: path.to_path_buf(),
        outcome,
    }
}

/// Analyze all `paths` in parallel. Reports keep the input order.
pub fn analyze_batch<P>(paths: &[P], thresholds: &Thresholds) -> Vec<ImageReport>
where
    P: AsRef<Path> + Sync,
{
    analyze_batch_with_progress(paths, thresholds, |_, _| {})
}

/// Like [`analyze_batch`], calling `progress(done, total)` after each image.
///
/// Calls may arrive from several worker threads and out of order.
pub fn analyze_batch_with_progress<P, F>(
    paths: &[P],
    thresholds: &Thresholds,
    progress: F,
) -> Vec<ImageReport>
where
    P: AsRef<Path> + Sync,
    F: Fn(usize, usize) + Sync,
{
    let total = paths.len();
    if total == 0 {
        return Vec::new();
    }
    let done = AtomicUsize::new(0);
    let reports: Vec<ImageReport> = paths
        .par_iter()
        .map(|path| {
            let report = analyze_one(path, thresholds);
            let n = done.fetch_add(1, Ordering::Relaxed) + 1;
            progress(n, total);
            report
        })
        .collect();
    tracing::info!("Analyzed {total} images: {}", Summary::from_reports(&reports));
    reports
}

/// Per-category counts over a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub error_page: usize,
    pub loading: usize,
    pub ui: usize,
    pub unknown: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, report: &ImageReport) {
        match report.category() {
            Some(Category::ErrorPage) => self.error_page += 1,
            Some(Category::Loading) => self.loading += 1,
            Some(Category::Ui) => self.ui += 1,
            Some(Category::Unknown) => self.unknown += 1,
            None => self.failed += 1,
        }
    }

    /// Combine two partial counts. Associative and commutative.
    pub fn merge(self, other: Summary) -> Summary {
        Summary {
            error_page: self.error_page + other.error_page,
            loading: self.loading + other.loading,
            ui: self.ui + other.ui,
            unknown: self.unknown + other.unknown,
            failed: self.failed + other.failed,
        }
    }

    pub fn from_reports(reports: &[ImageReport]) -> Summary {
        reports
            .par_iter()
            .fold(Summary::default, |mut acc, report| {
                acc.record(report);
                acc
            })
            .reduce(Summary::default, Summary::merge)
    }

    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::ErrorPage => self.error_page,
            Category::Loading => self.loading,
            Category::Ui => self.ui,
            Category::Unknown => self.unknown,
        }
    }

    pub fn total(&self) -> usize {
        self.error_page + self.loading + self.ui + self.unknown + self.failed
    }

    /// Images that look broken or blank, plus those that could not be read.
    pub fn flagged(&self) -> usize {
        self.error_page + self.loading + self.failed
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ErrorPage={}, Loading={}, UI={}, Unknown={}, Failed={}",
            self.error_page, self.loading, self.ui, self.unknown, self.failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    fn failed(name: &str) -> ImageReport {
        ImageReport {
            file: PathBuf::from(name),
            outcome: Outcome::Failed {
                message: "boom".into(),
            },
        }
    }

    fn classified(name: &str, category: Category) -> ImageReport {
        let stats = ImageStatistics::from_rgb(name, &RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])));
        ImageReport {
            file: PathBuf::from(name),
            outcome: Outcome::Classified { category, stats },
        }
    }

    #[test]
    fn summary_parallel_matches_sequential_fold() {
        let mut reports = Vec::new();
        for i in 0..500 {
            let name = format!("{i}.png");
            let report = match i % 5 {
                0 => classified(&name, Category::ErrorPage),
                1 => classified(&name, Category::Loading),
                2 => classified(&name, Category::Ui),
                3 => classified(&name, Category::Unknown),
                _ => failed(&name),
            };
            reports.push(report);
        }
        let sequential = reports.iter().fold(Summary::default(), |mut acc, r| {
            acc.record(r);
            acc
        });
        let parallel = Summary::from_reports(&reports);
        assert_eq!(sequential, parallel);
        assert_eq!(parallel.total(), 500);
        assert_eq!(parallel.failed, 100);
        assert_eq!(parallel.flagged(), 300);
        for category in Category::ALL {
            assert_eq!(parallel.count(category), 100);
        }
    }

    #[test]
    fn merge_is_commutative() {
        let a = Summary {
            error_page: 1,
            loading: 2,
            ui: 3,
            unknown: 4,
            failed: 5,
        };
        let b = Summary {
            ui: 7,
            failed: 1,
            ..Summary::default()
        };
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn batch_keeps_order_and_separates_failures() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let white = dir.path().join("white.png");
        RgbImage::from_pixel(32, 32, Rgb([255, 255, 255])).save(&white)?;
        let corrupt = dir.path().join("corrupt.png");
        fs::write(&corrupt, b"garbage")?;
        let black = dir.path().join("black.png");
        RgbImage::from_pixel(32, 32, Rgb([0, 0, 0])).save(&black)?;

        let paths = vec![white.clone(), corrupt.clone(), black.clone()];
        let seen = Mutex::new(Vec::new());
        let reports = analyze_batch_with_progress(&paths, &Thresholds::default(), |done, total| {
            seen.lock().unwrap().push((done, total));
        });

        assert_eq!(
            reports.iter().map(|r| r.file.clone()).collect::<Vec<_>>(),
            paths
        );
        assert_eq!(reports[0].category(), Some(Category::ErrorPage));
        assert!(reports[1].is_failure());
        assert_eq!(reports[2].category(), Some(Category::Loading));

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
        Ok(())
    }

    #[test]
    fn empty_batch_is_empty() {
        let paths: Vec<PathBuf> = Vec::new();
        assert!(analyze_batch(&paths, &Thresholds::default()).is_empty());
    }
}
