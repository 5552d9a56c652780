use time::Date;

use crate::cycles::repo_types::CycleInterval;
use crate::profile::repo_types::CycleProfile;

/// Inferred hormonal phase for a date. Self-reported menstruation flags
/// are never consulted: only closed interval membership and date
/// arithmetic from the cycle anchor decide the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menstruation,
    /// Late luteal, including up to five days past the predicted start.
    Premenstrual,
    EarlyLuteal,
    Ovulatory,
    Follicular,
    /// No anchor or no cycle length to predict from.
    Unknown,
    /// The prediction is too far off to trust.
    Unreliable,
}

impl Phase {
    pub fn score(self) -> u8 {
        match self {
            Phase::Premenstrual => 1,
            Phase::Menstruation => 2,
            Phase::EarlyLuteal | Phase::Unknown | Phase::Unreliable => 3,
            Phase::Ovulatory => 4,
            Phase::Follicular => 5,
        }
    }

    fn from_days_to_next(days_to_next: i64, cycle_length: i64) -> Phase {
        if days_to_next < -5 || days_to_next > cycle_length + 10 {
            return Phase::Unreliable;
        }
        match days_to_next {
            -5..=6 => Phase::Premenstrual,
            7..=13 => Phase::EarlyLuteal,
            14..=16 => Phase::Ovulatory,
            _ => Phase::Follicular,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseModel {
    /// Length of the assumed menstruation window when only the profile's
    /// last known start is available.
    pub default_menstruation_days: i64,
}

impl Default for PhaseModel {
    fn default() -> Self {
        Self {
            default_menstruation_days: 5,
        }
    }
}

impl PhaseModel {
    /// `last_cycle` is the latest interval starting on or before `target`.
    pub fn classify(
        &self,
        target: Date,
        last_cycle: Option<&CycleInterval>,
        profile: Option<&CycleProfile>,
    ) -> Phase {
        if last_cycle.is_some_and(|c| c.contains(target)) {
            return Phase::Menstruation;
        }

        let anchor = match last_cycle {
            Some(cycle) => cycle.start_date,
            None => {
                let Some(start) = profile.and_then(|p| p.last_menstruation_start) else {
                    return Phase::Unknown;
                };
                if start <= target
                    && (target - start).whole_days() < self.default_menstruation_days
                {
                    return Phase::Menstruation;
                }
                start
            }
        };

        let Some(length) = profile
            .and_then(|p| p.cycle_length_days)
            .filter(|l| *l > 0)
            .map(i64::from)
        else {
            return Phase::Unknown;
        };

        // anchor + length - target, without materialising the predicted date
        let days_to_next = length - (target - anchor).whole_days();
        Phase::from_days_to_next(days_to_next, length)
    }

    pub fn score(
        &self,
        target: Date,
        last_cycle: Option<&CycleInterval>,
        profile: Option<&CycleProfile>,
    ) -> u8 {
        self.classify(target, last_cycle, profile).score()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use uuid::Uuid;

    fn interval(start: Date, end: Option<Date>) -> CycleInterval {
        CycleInterval {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            start_date: start,
            end_date: end,
        }
    }

    fn profile(length: Option<i32>, last_start: Option<Date>) -> CycleProfile {
        CycleProfile {
            user_id: Uuid::nil(),
            cycle_length_days: length,
            last_menstruation_start: last_start,
            region_code: None,
        }
    }

    #[test]
    fn inside_closed_interval_is_menstruation() {
        let cycle = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let p = profile(Some(28), None);
        let score = PhaseModel::default().score(date!(2024-01-03), Some(&cycle), Some(&p));
        assert_eq!(score, 2);
    }

    #[test]
    fn seven_days_before_predicted_start_is_early_luteal() {
        let cycle = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let p = profile(Some(28), None);
        let model = PhaseModel::default();
        assert_eq!(
            model.classify(date!(2024-01-22), Some(&cycle), Some(&p)),
            Phase::EarlyLuteal
        );
        assert_eq!(model.score(date!(2024-01-22), Some(&cycle), Some(&p)), 3);
    }

    #[test]
    fn four_days_before_predicted_start_is_premenstrual() {
        let cycle = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let p = profile(Some(28), None);
        assert_eq!(
            PhaseModel::default().score(date!(2024-01-25), Some(&cycle), Some(&p)),
            1
        );
    }

    #[test]
    fn phase_bands_follow_days_to_next_start() {
        let cycle = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let p = profile(Some(28), None);
        let model = PhaseModel::default();
        // predicted next start is 2024-01-29
        let cases = [
            (date!(2024-02-04), Phase::Unreliable), // -6
            (date!(2024-02-03), Phase::Premenstrual), // -5
            (date!(2024-01-29), Phase::Premenstrual), // 0
            (date!(2024-01-23), Phase::Premenstrual), // 6
            (date!(2024-01-16), Phase::EarlyLuteal), // 13
            (date!(2024-01-15), Phase::Ovulatory),  // 14
            (date!(2024-01-13), Phase::Ovulatory),  // 16
            (date!(2024-01-12), Phase::Follicular), // 17
            (date!(2024-01-06), Phase::Follicular), // 23
        ];
        for (target, expected) in cases {
            assert_eq!(
                model.classify(target, Some(&cycle), Some(&p)),
                expected,
                "target {target}"
            );
        }
    }

    #[test]
    fn open_interval_never_counts_as_menstruation() {
        let cycle = interval(date!(2024-01-01), None);
        let p = profile(Some(28), None);
        // day 2 of an open interval is 26 days before the predicted start
        assert_eq!(
            PhaseModel::default().classify(date!(2024-01-03), Some(&cycle), Some(&p)),
            Phase::Follicular
        );
    }

    #[test]
    fn profile_start_gives_default_menstruation_window() {
        let p = profile(Some(28), Some(date!(2024-03-10)));
        let model = PhaseModel::default();
        assert_eq!(model.score(date!(2024-03-10), None, Some(&p)), 2);
        assert_eq!(model.score(date!(2024-03-14), None, Some(&p)), 2);
        assert_eq!(
            model.classify(date!(2024-03-15), None, Some(&p)),
            Phase::Follicular
        );
        // the window does not reach back before the recorded start
        assert_eq!(
            model.classify(date!(2024-03-09), None, Some(&p)),
            Phase::Follicular
        );
    }

    #[test]
    fn missing_anchor_or_length_is_neutral() {
        let model = PhaseModel::default();
        assert_eq!(model.classify(date!(2024-01-10), None, None), Phase::Unknown);
        let no_start = profile(Some(28), None);
        assert_eq!(
            model.classify(date!(2024-01-10), None, Some(&no_start)),
            Phase::Unknown
        );

        let cycle = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let no_length = profile(None, None);
        assert_eq!(
            model.score(date!(2024-01-20), Some(&cycle), Some(&no_length)),
            3
        );
        assert_eq!(model.score(date!(2024-01-20), Some(&cycle), None), 3);
    }

    #[test]
    fn target_far_before_anchor_is_unreliable() {
        let p = profile(Some(28), Some(date!(2024-01-01)));
        // 89 days to the predicted start, beyond length + 10
        assert_eq!(
            PhaseModel::default().classify(date!(2023-11-01), None, Some(&p)),
            Phase::Unreliable
        );
    }

    #[test]
    fn scores_stay_within_bounds_and_are_deterministic() {
        let cycle = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let p = profile(Some(30), Some(date!(2023-12-01)));
        let model = PhaseModel::default();
        let mut day = date!(2023-11-01);
        while day <= date!(2024-04-01) {
            let last = (cycle.start_date <= day).then_some(&cycle);
            let a = model.score(day, last, Some(&p));
            let b = model.score(day, last, Some(&p));
            assert_eq!(a, b);
            assert!((1..=5).contains(&a), "{day}: {a}");
            day = day.next_day().unwrap();
        }
    }

    #[test]
    fn anchor_at_calendar_end_does_not_overflow() {
        let cycle = interval(date!(9999-12-20), Some(date!(9999-12-24)));
        let p = profile(Some(28), None);
        // the predicted start lies past the last representable date
        assert_eq!(
            PhaseModel::default().classify(date!(9999-12-31), Some(&cycle), Some(&p)),
            Phase::Follicular
        );
        let late = profile(Some(28), Some(date!(9999-12-29)));
        assert_eq!(
            PhaseModel::default().classify(date!(9999-12-31), None, Some(&late)),
            Phase::Menstruation
        );
    }
}
