//! Risk-set tables for right-censored and left-truncated samples.
//!
//! A [`RiskSetTable`] lists every unique time point in ascending order
//! together with the number of events at that time and the number of
//! samples at risk immediately before it. It is the only input the
//! Kaplan-Meier and Nelson-Aalen estimators need.
//!
//! # Examples
//!
//! ```
//! use survkit_stats::risk_set::RiskSetTable;
//!
//! let table = RiskSetTable::right_censored(
//!     &[true, false, true, false],
//!     &[1.0, 2.0, 3.0, 4.0],
//! )
//! .unwrap();
//! assert_eq!(table.times, [1.0, 2.0, 3.0, 4.0]);
//! assert_eq!(table.events, [1, 0, 1, 0]);
//! assert_eq!(table.at_risk, [4, 3, 2, 1]);
//! ```

use crate::{
    error::{InvalidInputError, SurvivalError},
    validation,
};

/// Event and at-risk counts at each unique time point.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskSetTable {
    /// Unique time points in strictly ascending order.
    pub times: Vec<f64>,
    /// Number of events observed at each time point.
    pub events: Vec<usize>,
    /// Number of samples at risk immediately before each time point.
    pub at_risk: Vec<usize>,
}

/// Indices of `values` in ascending order, ties kept in input order.
pub(crate) fn argsort_stable(values: &[f64]) -> Vec<usize> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    order
}

impl RiskSetTable {
    /// Counts events and samples at risk for right-censored data.
    ///
    /// All censoring-only time points are kept (with zero events) so the
    /// table covers every observed time.
    pub fn right_censored(event: &[bool], time: &[f64]) -> Result<Self, SurvivalError> {
        validation::check_survival(event, time, true)?;
        let order = argsort_stable(time);
        Ok(Self::from_sorted(event, time, &order))
    }

    /// Builds the table from indices that sort `time` ascending.
    pub(crate) fn from_sorted(event: &[bool], time: &[f64], order: &[usize]) -> Self {
        let n_samples = order.len();
        let mut times = vec![];
        let mut events = vec![];
        let mut at_risk = vec![];

        // samples with a time strictly before the current group
        let mut exited = 0;
        let mut i = 0;
        while i < n_samples {
            let current_time = time[order[i]];
            let mut event_count = 0;
            let mut j = i;
            while j < n_samples && time[order[j]] == current_time {
                if event[order[j]] {
                    event_count += 1;
                }
                j += 1;
            }

            times.push(current_time);
            events.push(event_count);
            at_risk.push(n_samples - exited);

            exited += j - i;
            i = j;
        }

        log::trace!(
            "risk set table: {} samples, {} unique times",
            n_samples,
            times.len()
        );

        Self {
            times,
            events,
            at_risk,
        }
    }

    /// Counts events and samples at risk for left-truncated, right-censored
    /// data.
    ///
    /// A sample is at risk at time `t` when `entry <= t < exit`. Unique time
    /// points are the union of entry and exit times. The event count at `t`
    /// is the number of samples leaving the study at `t` with an event,
    /// except at the first time point: a sample cannot die on the day it
    /// enters, so no event is counted there.
    pub fn left_truncated(
        event: &[bool],
        entry: &[f64],
        exit: &[f64],
    ) -> Result<Self, SurvivalError> {
        validation::check_survival(event, exit, true)?;
        validation::check_consistent_length(&[("time", exit.len()), ("entry", entry.len())])?;
        validation::check_finite("entry", entry)?;
        validation::check_non_negative("entry", entry)?;
        if let Some(index) = entry.iter().zip(exit).position(|(en, ex)| en > ex) {
            return Err(InvalidInputError::EntryAfterExit { index }.into());
        }

        let n_samples = event.len();
        let order_entry = argsort_stable(entry);
        let order_exit = argsort_stable(exit);

        let mut times = entry.iter().chain(exit).copied().collect::<Vec<_>>();
        times.sort_by(f64::total_cmp);
        times.dedup();

        let mut events = Vec::with_capacity(times.len());
        let mut at_risk = Vec::with_capacity(times.len());

        // Every sample that exited before `t` entered before `t` too, so the
        // risk set size is a difference of two monotone counters.
        let mut idx_entry = 0;
        let mut idx_exit = 0;
        for &t in &times {
            while idx_entry < n_samples && entry[order_entry[idx_entry]] <= t {
                idx_entry += 1;
            }
            while idx_exit < n_samples && exit[order_exit[idx_exit]] < t {
                idx_exit += 1;
            }
            at_risk.push(idx_entry - idx_exit);

            let event_count = order_exit[idx_exit..]
                .iter()
                .take_while(|&&k| exit[k] == t)
                .filter(|&&k| event[k])
                .count();
            events.push(event_count);
        }
        if let Some(first) = events.first_mut() {
            *first = 0;
        }

        log::trace!(
            "left-truncated risk set table: {} samples, {} unique times",
            n_samples,
            times.len()
        );

        Ok(Self {
            times,
            events,
            at_risk,
        })
    }

    /// Number of unique time points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_right_censored_counts() {
        let table =
            RiskSetTable::right_censored(&[true, false, true, false], &[1.0, 2.0, 3.0, 4.0])
                .unwrap();
        assert_eq!(table.at_risk, [4, 3, 2, 1]);
        assert_eq!(table.events, [1, 0, 1, 0]);
    }

    #[test]
    fn test_right_censored_groups_ties() {
        let event = [true, true, false, true, false, true];
        let time = [5.0, 2.0, 2.0, 5.0, 7.0, 2.0];
        let table = RiskSetTable::right_censored(&event, &time).unwrap();
        assert_eq!(table.times, [2.0, 5.0, 7.0]);
        assert_eq!(table.events, [2, 2, 0]);
        assert_eq!(table.at_risk, [6, 3, 1]);
    }

    #[test]
    fn test_right_censored_unsorted_input() {
        let table = RiskSetTable::right_censored(&[false, true, true], &[3.0, 1.0, 2.0]).unwrap();
        assert_eq!(table.times, [1.0, 2.0, 3.0]);
        assert_eq!(table.events, [1, 1, 0]);
        assert_eq!(table.at_risk, [3, 2, 1]);
    }

    #[test]
    fn test_right_censored_rejects_mismatch() {
        assert!(matches!(
            RiskSetTable::right_censored(&[true], &[1.0, 2.0]),
            Err(SurvivalError::InvalidInput(
                InvalidInputError::LengthMismatch { .. }
            ))
        ));
    }

    #[test]
    fn test_left_truncated_counts() {
        // entries: 0, 0, 2, 3 / exits: 3, 4, 5, 6
        let event = [true, false, true, true];
        let entry = [0.0, 0.0, 2.0, 3.0];
        let exit = [3.0, 4.0, 5.0, 6.0];
        let table = RiskSetTable::left_truncated(&event, &entry, &exit).unwrap();
        assert_eq!(table.times, [0.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(table.at_risk, [2, 3, 4, 3, 2, 1]);
        assert_eq!(table.events, [0, 0, 1, 0, 1, 1]);
    }

    #[test]
    fn test_left_truncated_rejects_negative_entry() {
        assert!(matches!(
            RiskSetTable::left_truncated(&[true, true], &[-1.0, 0.0], &[1.0, 2.0]),
            Err(SurvivalError::InvalidInput(InvalidInputError::Negative {
                name: "entry",
                index: 0
            }))
        ));
    }

    #[test]
    fn test_left_truncated_ignores_event_at_first_entry() {
        // the first sample enters and exits at time 0 with an event
        let table =
            RiskSetTable::left_truncated(&[true, true], &[0.0, 0.0], &[0.0, 2.0]).unwrap();
        assert_eq!(table.times, [0.0, 2.0]);
        assert_eq!(table.at_risk, [2, 1]);
        assert_eq!(table.events, [0, 1]);
    }

    #[test]
    fn test_left_truncated_without_truncation_matches_right_censored() {
        let event = [true, false, true, true, false];
        let exit = [4.0, 1.0, 3.0, 4.0, 6.0];
        let entry = [0.0; 5];
        let truncated = RiskSetTable::left_truncated(&event, &entry, &exit).unwrap();
        let censored = RiskSetTable::right_censored(&event, &exit).unwrap();
        // the truncated table has an extra leading point at the common entry time
        assert_eq!(truncated.times[0], 0.0);
        assert_eq!(truncated.at_risk[0], 5);
        assert_eq!(truncated.events[0], 0);
        assert_eq!(&truncated.times[1..], censored.times.as_slice());
        assert_eq!(&truncated.at_risk[1..], censored.at_risk.as_slice());
        assert_eq!(&truncated.events[1..], censored.events.as_slice());
    }

    #[test]
    fn test_left_truncated_rejects_entry_after_exit() {
        let err = RiskSetTable::left_truncated(&[true, true], &[0.0, 3.0], &[1.0, 2.0])
            .unwrap_err();
        assert_eq!(
            err,
            SurvivalError::InvalidInput(InvalidInputError::EntryAfterExit { index: 1 })
        );
    }
}
