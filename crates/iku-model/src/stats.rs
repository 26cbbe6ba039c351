//! Aggregated result types.

use iku_common::round2;

use crate::department::{HasProgram, Jurusan, jurusan_for};

/// On-track threshold (fraction of target) for donut charts.
pub const DONUT_ON_TRACK: f64 = 0.7;
/// On-track threshold (fraction of target) for bullet, card, thermometer and
/// waffle dashboards.
pub const BULLET_ON_TRACK: f64 = 0.8;

/// `numerator / denominator × 100` rounded to two decimals; 0 when the
/// denominator is 0.
///
/// ```
/// use iku_model::percentage;
///
/// assert_eq!(percentage(4.0, 10.0), 40.0);
/// assert_eq!(percentage(1.0, 3.0), 33.33);
/// assert_eq!(percentage(0.0, 0.0), 0.0);
/// ```
pub fn percentage(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        round2(numerator / denominator * 100.0)
    }
}

/// Faculty-wide totals for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverallStats {
    /// Qualifying count. IKU 6 reports the average per program here.
    pub numerator: f64,
    pub denominator: f64,
    pub percentage: f64,
    /// Denominator is an absolute target rather than an eligible population.
    pub number_based: bool,
}

impl OverallStats {
    pub fn from_counts(numerator: usize, denominator: usize) -> Self {
        let numerator = numerator as f64;
        let denominator = denominator as f64;
        Self {
            numerator,
            denominator,
            percentage: percentage(numerator, denominator),
            number_based: false,
        }
    }

    /// Stats measured against an absolute target.
    pub fn against_target(actual: f64, target: f64) -> Self {
        Self {
            numerator: round2(actual),
            denominator: target,
            percentage: percentage(actual, target),
            number_based: true,
        }
    }

    pub fn achievement(&self, target: f64, on_track_ratio: f64) -> Achievement {
        Achievement::classify(self.percentage, target, on_track_ratio)
    }
}

/// One aggregated category row.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramRow {
    pub program: String,
    pub jurusan: Jurusan,
    pub numerator: u32,
    pub denominator: u32,
    /// Rounded percentage, or the raw count for number-based metrics.
    pub percentage: f64,
}

impl ProgramRow {
    pub fn new(program: impl Into<String>, numerator: u32, denominator: u32) -> Self {
        let program = program.into();
        Self {
            jurusan: jurusan_for(&program),
            percentage: percentage(f64::from(numerator), f64::from(denominator)),
            program,
            numerator,
            denominator,
        }
    }

    /// Row whose displayed value is the raw count.
    pub fn counted(program: impl Into<String>, count: u32, denominator: u32) -> Self {
        let program = program.into();
        Self {
            jurusan: jurusan_for(&program),
            percentage: f64::from(count),
            program,
            numerator: count,
            denominator,
        }
    }
}

impl HasProgram for ProgramRow {
    fn program(&self) -> &str {
        &self.program
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Achievement {
    Achieved,
    OnTrack,
    Gap,
}

impl Achievement {
    /// `Achieved` at or above target, `OnTrack` at or above
    /// `on_track_ratio × target`, `Gap` below.
    pub fn classify(actual: f64, target: f64, on_track_ratio: f64) -> Self {
        if actual >= target {
            Achievement::Achieved
        } else if actual >= target * on_track_ratio {
            Achievement::OnTrack
        } else {
            Achievement::Gap
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Achievement::Achieved => "ACHIEVED",
            Achievement::OnTrack => "ON TRACK",
            Achievement::Gap => "GAP",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_denominator_is_zero_percent() {
        let stats = OverallStats::from_counts(0, 0);
        assert_eq!(stats.percentage, 0.0);
        assert!(!stats.number_based);
    }

    #[test]
    fn number_based_stats() {
        let stats = OverallStats::against_target(7.0, 5.0);
        assert_eq!(stats.percentage, 140.0);
        assert!(stats.number_based);

        let average = OverallStats::against_target(5.0 / 3.0, 2.0);
        assert_eq!(average.numerator, 1.67);
        assert_eq!(average.percentage, 83.33);
    }

    #[test]
    fn rows_pick_up_their_jurusan() {
        let row = ProgramRow::new("Teknik Pertambangan", 3, 12);
        assert_eq!(row.jurusan, Jurusan::TeknikSipil);
        assert_eq!(row.percentage, 25.0);
        assert_eq!(ProgramRow::counted("Kimia", 4, 1).percentage, 4.0);
    }

    #[test]
    fn achievement_thresholds() {
        assert_eq!(Achievement::classify(60.0, 60.0, DONUT_ON_TRACK), Achievement::Achieved);
        assert_eq!(Achievement::classify(42.0, 60.0, DONUT_ON_TRACK), Achievement::OnTrack);
        assert_eq!(Achievement::classify(42.0, 60.0, BULLET_ON_TRACK), Achievement::Gap);
        assert_eq!(Achievement::Gap.label(), "GAP");
    }

    proptest! {
        #[test]
        fn percentage_matches_rounded_ratio(n in 0u32..5000, d in 1u32..5000) {
            let expected = (f64::from(n) / f64::from(d) * 100.0 * 100.0).round() / 100.0;
            prop_assert_eq!(percentage(f64::from(n), f64::from(d)), expected);
        }
    }
}
