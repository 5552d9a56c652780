use serde::Serialize;
use time::Date;

use super::radar::{is_problem_day, AxisAverage};
use crate::config::ScoringConfig;
use crate::dates::shift;
use crate::scoring::types::{Axis, DailyScore};

pub const LONG_WINDOW_DAYS: i64 = 30;
pub const SHORT_WINDOW_DAYS: i64 = 7;
const MAX_DRIVERS: usize = 2;

/// Heuristic thresholds for trend summaries.
#[derive(Debug, Clone, Copy)]
pub struct TrendRules {
    pub problem_threshold: u8,
    pub min_sample_days: usize,
    pub min_problem_days: usize,
    pub driver_gap: f64,
}

impl TrendRules {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            problem_threshold: config.problem_skin_threshold,
            min_sample_days: config.trend_min_sample_days,
            min_problem_days: config.trend_min_problem_days,
            driver_gap: config.trend_driver_gap,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalTrend {
    pub sample_days_30d: usize,
    pub problem_days_30d: usize,
    pub enough_data: bool,
    pub key_drivers_7d: Vec<Axis>,
    pub key_drivers_30d: Vec<Axis>,
    pub problem_days_average: Option<AxisAverage>,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Axes whose window mean sits furthest above the problem-day mean. Falls
/// back to the axes that are lowest on problem days.
fn key_drivers(window: &AxisAverage, problem: &AxisAverage, min_gap: f64) -> Vec<Axis> {
    let mut gaps: Vec<(Axis, f64)> = Axis::DRIVERS
        .iter()
        .map(|&axis| {
            let gap = round2(round2(window.get(axis)) - round2(problem.get(axis)));
            (axis, gap)
        })
        .collect();
    gaps.sort_by(|a, b| b.1.total_cmp(&a.1));

    let drivers: Vec<Axis> = gaps
        .iter()
        .filter(|(_, gap)| *gap >= min_gap)
        .take(MAX_DRIVERS)
        .map(|(axis, _)| *axis)
        .collect();
    if !drivers.is_empty() {
        return drivers;
    }

    let mut lowest: Vec<(Axis, f64)> = Axis::DRIVERS
        .iter()
        .map(|&axis| (axis, round2(problem.get(axis))))
        .collect();
    lowest.sort_by(|a, b| a.1.total_cmp(&b.1));
    lowest.into_iter().take(MAX_DRIVERS).map(|(axis, _)| axis).collect()
}

/// `scores` are the stored scores of the 30 days ending at `target`.
pub fn build_trend(scores: &[DailyScore], target: Date, rules: &TrendRules) -> PersonalTrend {
    let short_start = shift(target, 1 - SHORT_WINDOW_DAYS);
    let problem: Vec<&DailyScore> = scores
        .iter()
        .filter(|s| is_problem_day(&s.axis_details, rules.problem_threshold))
        .collect();

    let problem_avg = AxisAverage::of(problem.iter().map(|s| &s.axis_details));
    let month_avg = AxisAverage::of(scores.iter().map(|s| &s.axis_details));
    let week_avg = AxisAverage::of(
        scores
            .iter()
            .filter(|s| s.date >= short_start && s.date <= target)
            .map(|s| &s.axis_details),
    );

    let (key_drivers_7d, key_drivers_30d) = match problem_avg.as_ref() {
        Some(p) => (
            week_avg
                .as_ref()
                .map(|w| key_drivers(w, p, rules.driver_gap))
                .unwrap_or_default(),
            month_avg
                .as_ref()
                .map(|m| key_drivers(m, p, rules.driver_gap))
                .unwrap_or_default(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    PersonalTrend {
        sample_days_30d: scores.len(),
        problem_days_30d: problem.len(),
        enough_data: scores.len() >= rules.min_sample_days
            && problem.len() >= rules.min_problem_days,
        key_drivers_7d,
        key_drivers_30d,
        problem_days_average: problem_avg,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::types::AxisDetails;
    use time::macros::date;
    use uuid::Uuid;

    fn rules() -> TrendRules {
        TrendRules::from_config(&ScoringConfig::default())
    }

    fn day(date: Date, skin: u8, sleep: u8, stress: u8) -> DailyScore {
        DailyScore {
            user_id: Uuid::nil(),
            date,
            composite_score: i32::from(skin) * 20,
            axis_details: AxisDetails {
                sleep,
                stress,
                skincare_effort: 3,
                menstrual: 3,
                climate: 3,
                skin_condition: skin,
            },
        }
    }

    #[test]
    fn no_scores_means_no_trend() {
        let trend = build_trend(&[], date!(2024-01-31), &rules());
        assert_eq!(trend.sample_days_30d, 0);
        assert!(!trend.enough_data);
        assert!(trend.key_drivers_30d.is_empty());
        assert!(trend.problem_days_average.is_none());
    }

    #[test]
    fn sleep_drop_is_the_key_driver() {
        // 16 days: good days sleep 5, problem days sleep 1
        let mut scores = Vec::new();
        for d in 16..=31u8 {
            let date = Date::from_calendar_date(2024, time::Month::January, d).unwrap();
            let problem = d % 4 == 0;
            scores.push(if problem {
                day(date, 1, 1, 3)
            } else {
                day(date, 4, 5, 3)
            });
        }
        let trend = build_trend(&scores, date!(2024-01-31), &rules());

        assert_eq!(trend.sample_days_30d, 16);
        assert_eq!(trend.problem_days_30d, 4);
        assert!(trend.enough_data);
        assert_eq!(trend.key_drivers_30d, vec![Axis::Sleep]);
        assert_eq!(trend.key_drivers_7d, vec![Axis::Sleep]);
    }

    #[test]
    fn weak_gaps_fall_back_to_lowest_problem_axes() {
        let scores = vec![
            day(date!(2024-01-29), 2, 2, 1),
            day(date!(2024-01-30), 3, 2, 2),
            day(date!(2024-01-31), 2, 2, 1),
        ];
        let trend = build_trend(&scores, date!(2024-01-31), &rules());
        assert!(!trend.enough_data);
        assert_eq!(trend.key_drivers_30d, vec![Axis::Stress, Axis::Sleep]);
    }

    #[test]
    fn short_window_without_scores_has_no_drivers() {
        let scores = vec![day(date!(2024-01-05), 1, 1, 1), day(date!(2024-01-06), 5, 5, 5)];
        let trend = build_trend(&scores, date!(2024-01-31), &rules());
        assert!(trend.key_drivers_7d.is_empty());
        assert!(!trend.key_drivers_30d.is_empty());
    }
}
