//! Threshold rules mapping [`ImageStatistics`] to a [`Category`].

use crate::config::Thresholds;
use crate::stats::ImageStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Screenshot category. Exactly one is assigned per analyzed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ErrorPage,
    Loading,
    #[serde(rename = "UI")]
    Ui,
    /// No rule matched. This is a real outcome, not a decode failure.
    Unknown,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ErrorPage,
        Category::Loading,
        Category::Ui,
        Category::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::ErrorPage => "ErrorPage",
            Category::Loading => "Loading",
            Category::Ui => "UI",
            Category::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of each rule, evaluated independently. More than one may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    pub error_page: bool,
    pub loading: bool,
    pub ui: bool,
}

impl Signals {
    pub fn evaluate(stats: &ImageStatistics, t: &Thresholds) -> Self {
        Self {
            error_page: stats.unique_colors < t.error_max_colors
                && stats.mean_brightness > t.error_min_brightness,
            loading: stats.unique_colors < t.loading_max_colors
                && stats.common_ratio > t.loading_min_common_ratio,
            ui: stats.unique_colors > t.ui_min_colors && stats.variance > t.ui_min_variance,
        }
    }

    /// First matching rule wins: error page, then loading, then UI.
    pub fn resolve(self) -> Category {
        let ordered = [
            (self.error_page, Category::ErrorPage),
            (self.loading, Category::Loading),
            (self.ui, Category::Ui),
        ];
        ordered
            .into_iter()
            .find_map(|(hit, category)| hit.then_some(category))
            .unwrap_or(Category::Unknown)
    }
}

impl Thresholds {
    pub fn classify(&self, stats: &ImageStatistics) -> Category {
        Signals::evaluate(stats, self).resolve()
    }
}

/// Classify with the default thresholds.
pub fn classify(stats: &ImageStatistics) -> Category {
    Thresholds::default().classify(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::path::PathBuf;

    fn stats(
        unique_colors: usize,
        mean_brightness: f64,
        variance: f64,
        common_ratio: f64,
    ) -> ImageStatistics {
        ImageStatistics {
            path: PathBuf::from("synthetic.png"),
            width: 100,
            height: 100,
            unique_colors,
            mean_brightness,
            variance,
            common_ratio,
            sample_len: 10_000,
            most_common_count: (common_ratio * 10_000.0) as usize,
        }
    }

    #[rstest]
    #[case::bright_and_dominant(stats(1, 255.0, 0.0, 1.0), Category::ErrorPage)]
    #[case::bright_few_colors(stats(99, 200.5, 5000.0, 0.1), Category::ErrorPage)]
    #[case::dark_solid(stats(1, 0.0, 0.0, 1.0), Category::Loading)]
    #[case::brightness_at_limit(stats(10, 200.0, 0.0, 0.9), Category::Loading)]
    #[case::gradient(stats(4096, 126.0, 15000.0, 0.001), Category::Ui)]
    #[case::many_colors_bright(stats(5000, 230.0, 3000.0, 0.2), Category::Ui)]
    #[case::middle_band(stats(150, 104.0, 60.0, 0.01), Category::Unknown)]
    #[case::ratio_at_limit(stats(10, 50.0, 0.0, 0.5), Category::Unknown)]
    #[case::colors_at_ui_limit(stats(200, 120.0, 9000.0, 0.1), Category::Unknown)]
    #[case::flat_many_colors(stats(1000, 120.0, 1000.0, 0.1), Category::Unknown)]
    fn default_rules(#[case] input: ImageStatistics, #[case] expected: Category) {
        assert_eq!(classify(&input), expected);
    }

    #[test]
    fn error_page_beats_loading_when_both_match() {
        let s = stats(1, 255.0, 0.0, 1.0);
        let signals = Signals::evaluate(&s, &Thresholds::default());
        assert!(signals.error_page && signals.loading);
        assert_eq!(signals.resolve(), Category::ErrorPage);
    }

    #[test]
    fn resolve_is_first_match_for_every_combination() {
        for bits in 0u8..8 {
            let signals = Signals {
                error_page: bits & 1 != 0,
                loading: bits & 2 != 0,
                ui: bits & 4 != 0,
            };
            let expected = if signals.error_page {
                Category::ErrorPage
            } else if signals.loading {
                Category::Loading
            } else if signals.ui {
                Category::Ui
            } else {
                Category::Unknown
            };
            assert_eq!(signals.resolve(), expected, "{signals:?}");
        }
    }

    #[test]
    fn custom_thresholds_change_the_outcome() {
        let s = stats(150, 104.0, 60.0, 0.01);
        let loose = Thresholds {
            ui_min_colors: 100,
            ui_min_variance: 50.0,
            ..Thresholds::default()
        };
        assert_eq!(loose.classify(&s), Category::Ui);
    }

    #[test]
    fn display_matches_report_labels() {
        let labels: Vec<String> = Category::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels, vec!["ErrorPage", "Loading", "UI", "Unknown"]);
    }
}
