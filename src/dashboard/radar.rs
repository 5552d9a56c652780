use serde::{Deserialize, Serialize};
use time::Date;

use crate::scoring::types::{Axis, AxisDetails, DailyScore};

/// Mean value per axis over a set of days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAverage {
    pub sleep: f64,
    pub stress: f64,
    pub skincare_effort: f64,
    pub menstrual: f64,
    pub climate: f64,
    pub skin_condition: f64,
}

impl AxisAverage {
    /// `None` for an empty set.
    pub fn of<'a>(details: impl IntoIterator<Item = &'a AxisDetails>) -> Option<Self> {
        let mut sums = [0.0f64; 6];
        let mut count = 0usize;
        for d in details {
            for (sum, axis) in sums.iter_mut().zip(Axis::ALL) {
                *sum += f64::from(d.get(axis));
            }
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self {
            sleep: sums[0] / n,
            stress: sums[1] / n,
            skincare_effort: sums[2] / n,
            menstrual: sums[3] / n,
            climate: sums[4] / n,
            skin_condition: sums[5] / n,
        })
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Sleep => self.sleep,
            Axis::Stress => self.stress,
            Axis::SkincareEffort => self.skincare_effort,
            Axis::Menstrual => self.menstrual,
            Axis::Climate => self.climate,
            Axis::SkinCondition => self.skin_condition,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadarChart {
    pub period_average: Option<AxisAverage>,
    pub problem_days_average: Option<AxisAverage>,
    pub problem_dates: Vec<Date>,
}

pub fn is_problem_day(details: &AxisDetails, threshold: u8) -> bool {
    details.skin_condition <= threshold
}

/// `scores` ascending by date.
pub fn build_radar_chart(scores: &[DailyScore], problem_threshold: u8) -> RadarChart {
    let problem: Vec<&DailyScore> = scores
        .iter()
        .filter(|s| is_problem_day(&s.axis_details, problem_threshold))
        .collect();

    RadarChart {
        period_average: AxisAverage::of(scores.iter().map(|s| &s.axis_details)),
        problem_days_average: AxisAverage::of(problem.iter().map(|s| &s.axis_details)),
        problem_dates: problem.iter().map(|s| s.date).collect(),
    }
}
