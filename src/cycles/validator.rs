use time::Date;

use super::error::CycleError;
use super::repo_types::CycleInterval;

/// Checks a proposed interval against its neighbours.
///
/// `previous` is the latest interval starting before `start`, `next` the
/// earliest one starting on or after it; both exclude the interval being
/// edited.
pub fn validate(
    start: Date,
    end: Option<Date>,
    previous: Option<&CycleInterval>,
    next: Option<&CycleInterval>,
) -> Result<(), CycleError> {
    if end.is_some_and(|end| end < start) {
        return Err(CycleError::InvalidRange);
    }

    if let Some(prev) = previous {
        match prev.end_date {
            None => {
                return Err(CycleError::UnresolvedPriorInterval {
                    previous_start: prev.start_date,
                })
            }
            Some(previous_end) if start <= previous_end => {
                return Err(CycleError::OverlapWithPrevious { previous_end })
            }
            Some(_) => {}
        }
    }

    if let Some(next) = next {
        match end {
            None => {
                return Err(CycleError::OpenIntervalMustBeLatest {
                    next_start: next.start_date,
                })
            }
            Some(end) if end >= next.start_date => {
                return Err(CycleError::OverlapWithNext {
                    next_start: next.start_date,
                })
            }
            Some(_) => {}
        }
    }

    Ok(())
}

/// The one open interval a close operation may target.
pub fn single_open(mut open: Vec<CycleInterval>) -> Result<CycleInterval, CycleError> {
    match open.len() {
        0 => Err(CycleError::NothingToClose),
        1 => Ok(open.remove(0)),
        count => Err(CycleError::MultipleOpenIntervals { count }),
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

    /// Validates each interval of `history` against its neighbours the way
    /// an insert in arbitrary order would see them.
    fn validate_history(history: &[CycleInterval]) -> Result<(), CycleError> {
        for (i, current) in history.iter().enumerate() {
            let previous = history[..i].last();
            let next = history.get(i + 1);
            validate(current.start_date, current.end_date, previous, next)?;
        }
        Ok(())
    }

    #[test]
    fn accepts_well_ordered_history() {
        let history = vec![
            interval(date!(2024-01-01), Some(date!(2024-01-05))),
            interval(date!(2024-01-29), Some(date!(2024-02-02))),
            interval(date!(2024-02-03), Some(date!(2024-02-03))),
            interval(date!(2024-02-26), None),
        ];
        assert_eq!(validate_history(&history), Ok(()));
    }

    #[test]
    fn accepts_first_interval_without_neighbours() {
        assert_eq!(validate(date!(2024-01-01), None, None, None), Ok(()));
        assert_eq!(
            validate(date!(2024-01-01), Some(date!(2024-01-01)), None, None),
            Ok(())
        );
    }

    #[test]
    fn rejects_end_before_start() {
        assert_eq!(
            validate(date!(2024-01-05), Some(date!(2024-01-04)), None, None),
            Err(CycleError::InvalidRange)
        );
    }

    #[test]
    fn rejects_touching_or_overlapping_previous() {
        let prev = interval(date!(2024-01-01), Some(date!(2024-01-05)));
        for start in [date!(2024-01-03), date!(2024-01-05)] {
            assert_eq!(
                validate(start, Some(date!(2024-01-09)), Some(&prev), None),
                Err(CycleError::OverlapWithPrevious {
                    previous_end: date!(2024-01-05)
                })
            );
        }
        assert_eq!(
            validate(date!(2024-01-06), Some(date!(2024-01-09)), Some(&prev), None),
            Ok(())
        );
    }

    #[test]
    fn rejects_touching_or_overlapping_next() {
        let next = interval(date!(2024-02-01), Some(date!(2024-02-05)));
        for end in [date!(2024-02-01), date!(2024-02-03)] {
            assert_eq!(
                validate(date!(2024-01-20), Some(end), None, Some(&next)),
                Err(CycleError::OverlapWithNext {
                    next_start: date!(2024-02-01)
                })
            );
        }
    }

    #[test]
    fn open_interval_cannot_precede_another() {
        let next = interval(date!(2024-02-01), Some(date!(2024-02-05)));
        assert_eq!(
            validate(date!(2024-01-20), None, None, Some(&next)),
            Err(CycleError::OpenIntervalMustBeLatest {
                next_start: date!(2024-02-01)
            })
        );
    }

    #[test]
    fn open_previous_blocks_everything_after_it() {
        let prev = interval(date!(2024-01-01), None);
        assert_eq!(
            validate(date!(2024-02-01), Some(date!(2024-02-04)), Some(&prev), None),
            Err(CycleError::UnresolvedPriorInterval {
                previous_start: date!(2024-01-01)
            })
        );
    }

    #[test]
    fn any_overlap_in_history_is_rejected() {
        let base = vec![
            interval(date!(2024-01-01), Some(date!(2024-01-05))),
            interval(date!(2024-01-29), Some(date!(2024-02-02))),
            interval(date!(2024-02-26), Some(date!(2024-03-01))),
        ];
        // stretch each interval's end onto the next start
        for i in 0..base.len() - 1 {
            let mut history = base.clone();
            history[i].end_date = Some(history[i + 1].start_date);
            assert!(matches!(
                validate_history(&history),
                Err(CycleError::OverlapWithNext { .. })
            ));
        }
        // a second open interval
        let mut history = base.clone();
        history[1].end_date = None;
        assert!(matches!(
            validate_history(&history),
            Err(CycleError::OpenIntervalMustBeLatest { .. })
        ));
    }

    #[test]
    fn same_start_as_existing_interval_is_an_overlap() {
        let existing = interval(date!(2024-01-10), Some(date!(2024-01-14)));
        assert!(matches!(
            validate(date!(2024-01-10), Some(date!(2024-01-12)), None, Some(&existing)),
            Err(CycleError::OverlapWithNext { .. })
        ));
        assert!(matches!(
            validate(date!(2024-01-10), None, None, Some(&existing)),
            Err(CycleError::OpenIntervalMustBeLatest { .. })
        ));
    }

    #[test]
    fn close_requires_exactly_one_open_interval() {
        assert_eq!(single_open(vec![]), Err(CycleError::NothingToClose));

        let open = interval(date!(2024-01-01), None);
        assert_eq!(single_open(vec![open.clone()]), Ok(open));

        let two = vec![
            interval(date!(2024-01-01), None),
            interval(date!(2024-02-01), None),
        ];
        assert_eq!(
            single_open(two),
            Err(CycleError::MultipleOpenIntervals { count: 2 })
        );
    }
}
