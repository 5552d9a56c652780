use serde::Serialize;
use time::Date;

use crate::config::ScoringConfig;
use crate::cycles::repo_types::CycleInterval;
use crate::dates::shift;

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Date,
    pub end: Date,
}

impl DateRange {
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn len_days(&self) -> i64 {
        ((self.end - self.start).whole_days() + 1).max(0)
    }
}

/// Resolves which dates may have a different menstrual score after an
/// interval changed shape.
#[derive(Debug, Clone, Copy)]
pub struct RecalcWindow {
    pub days_before: i64,
    pub days_after_open: i64,
    pub days_after_closed: i64,
    pub min_buffer_days: i64,
}

impl Default for RecalcWindow {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

impl RecalcWindow {
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self {
            days_before: config.recalc_days_before,
            days_after_open: config.recalc_days_after_open,
            days_after_closed: config.recalc_days_after_closed,
            min_buffer_days: config.recalc_min_buffer_days,
        }
    }

    /// `previous` is the interval immediately preceding `start`. Call once per
    /// shape: before and after an edit, or the single shape of a create or
    /// delete.
    pub fn resolve(
        &self,
        previous: Option<&CycleInterval>,
        start: Date,
        end: Option<Date>,
        today: Date,
    ) -> DateRange {
        let anchor = previous
            .map(|p| p.end_date.unwrap_or(p.start_date))
            .unwrap_or(start);

        let range_end = match end {
            Some(end) => shift(end, self.days_after_closed),
            None => shift(today, self.days_after_open),
        };
        let range_start =
            shift(anchor, -self.days_before).min(shift(start, -self.min_buffer_days));

        DateRange::new(range_start, range_end)
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

    #[test]
    fn closed_interval_uses_narrow_lookahead() {
        let prev = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let range = RecalcWindow::default().resolve(
            Some(&prev),
            date!(2024-01-29),
            Some(date!(2024-02-02)),
            date!(2024-06-01),
        );
        assert_eq!(range.start, date!(2023-11-06));
        assert_eq!(range.end, date!(2024-02-12));
    }

    #[test]
    fn open_interval_reaches_sixty_days_past_today() {
        let range = RecalcWindow::default().resolve(
            None,
            date!(2024-03-01),
            None,
            date!(2024-03-04),
        );
        assert_eq!(range.start, date!(2024-01-01));
        assert_eq!(range.end, date!(2024-05-03));
    }

    #[test]
    fn open_previous_interval_anchors_on_its_start() {
        let prev = interval(date!(2024-02-01), None);
        let range = RecalcWindow::default().resolve(
            Some(&prev),
            date!(2024-03-01),
            Some(date!(2024-03-05)),
            date!(2024-03-10),
        );
        assert_eq!(range.start, date!(2023-12-03));
    }

    #[test]
    fn start_never_later_than_the_minimum_buffer() {
        let window = RecalcWindow {
            days_before: 0,
            ..RecalcWindow::default()
        };
        let range = window.resolve(None, date!(2024-03-10), Some(date!(2024-03-14)), date!(2024-03-20));
        assert_eq!(range.start, date!(2024-03-07));
    }

    #[test]
    fn closing_edit_resolves_narrower_window_than_open_interval() {
        let prev = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        let window = RecalcWindow::default();
        let start = date!(2024-01-29);
        let end = date!(2024-02-02);

        let closed = window.resolve(Some(&prev), start, Some(end), end);
        let open = window.resolve(Some(&prev), start, None, end);

        assert_eq!(closed.start, open.start);
        assert!(closed.end < open.end);
        assert!(closed.len_days() < open.len_days());
    }

    #[test]
    fn range_contains_both_bounds() {
        let range = DateRange::new(date!(2024-01-01), date!(2024-01-07));
        assert!(range.contains(date!(2024-01-01)));
        assert!(range.contains(date!(2024-01-07)));
        assert!(!range.contains(date!(2024-01-08)));
        assert_eq!(range.len_days(), 7);
    }

    #[test]
    fn window_near_calendar_end_is_clamped() {
        let range = RecalcWindow::default().resolve(
            None,
            date!(9999-12-25),
            Some(date!(9999-12-28)),
            date!(2024-06-01),
        );
        assert_eq!(range.start, date!(9999-10-26));
        assert_eq!(range.end, Date::MAX);
        assert!(range.contains(date!(9999-12-28)));
    }
}
