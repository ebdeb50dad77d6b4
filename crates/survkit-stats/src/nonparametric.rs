//! Nonparametric step-function estimators.
//!
//! - [`kaplan_meier`]: product-limit estimate of the survival function,
//!   optionally for left-truncated data.
//! - [`nelson_aalen`]: cumulative hazard estimate.
//! - [`ipc_weights`]: inverse probability of censoring weights derived from
//!   the Kaplan-Meier estimate of the censoring distribution.
//!
//! Both estimators return a [`StepFunction`]: a right-continuous curve whose
//! value changes only at the listed time points.

use crate::{error::SurvivalError, risk_set::RiskSetTable, validation};

/// A right-continuous step function evaluated at unique time points.
///
/// For a survival curve the values start below or at `1.0` and never
/// increase. For a cumulative hazard they start at or above `0.0` and never
/// decrease. The risk-set columns the curve was computed from are kept
/// alongside so callers can report them.
#[derive(Debug, Clone, PartialEq)]
pub struct StepFunction {
    /// Unique time points in ascending order.
    pub times: Vec<f64>,
    /// Value of the function from each time point until the next one.
    pub values: Vec<f64>,
    /// Number of samples at risk immediately before each time point.
    pub at_risk: Vec<usize>,
    /// Number of events at each time point.
    pub events: Vec<usize>,
}

impl StepFunction {
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn retain_from(&mut self, start: usize) {
        self.times.drain(..start);
        self.values.drain(..start);
        self.at_risk.drain(..start);
        self.events.drain(..start);
    }

    /// Returns the median survival time of a survival curve.
    ///
    /// The median is the first time at which the survival probability drops
    /// to or below 50%. Linear interpolation is used between the neighbouring
    /// time points. Returns `None` if the curve never reaches 50%.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survkit_stats::nonparametric::kaplan_meier;
    /// let curve = kaplan_meier(&[true; 4], &[10.0, 20.0, 30.0, 40.0], None, None).unwrap();
    /// assert_eq!(curve.median_survival(), Some(20.0));
    /// ```
    #[must_use]
    pub fn median_survival(&self) -> Option<f64> {
        let i = self.values.iter().position(|&s| s <= 0.5)?;
        if i == 0 {
            return Some(self.times[0]);
        }
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let (s0, s1) = (self.values[i - 1], self.values[i]);
        Some(t0 + (0.5 - s0) / (s1 - s0) * (t1 - t0))
    }

    /// Returns the survival curve conditional on survival up to `time_min`.
    ///
    /// Points before `time_min` are dropped and the remaining values are
    /// divided by the survival probability just before `time_min`, so the
    /// result restarts the product-limit estimate at `time_min`. Returns
    /// `None` if the survival probability has already reached zero before
    /// `time_min`.
    #[must_use]
    pub fn conditional_on(&self, time_min: f64) -> Option<Self> {
        let start = self.times.partition_point(|&t| t < time_min);
        let base = if start == 0 {
            1.0
        } else {
            self.values[start - 1]
        };
        if base <= 0.0 {
            return None;
        }
        let mut curve = self.clone();
        curve.retain_from(start);
        for value in &mut curve.values {
            *value /= base;
        }
        Some(curve)
    }
}

/// Kaplan-Meier estimator of the survival function.
///
/// # Arguments
///
/// * `event` - Event indicator for each sample
/// * `time` - Time of event or censoring (exit time for truncated data)
/// * `entry` - Optional entry times for left-truncated data
/// * `time_min` - Optional lower bound: points before it are omitted from
///   the returned curve. The remaining values are the unconditional
///   product-limit estimates, not renormalised; see
///   [`StepFunction::conditional_on`] for the conditional curve.
///
/// An all-censored sample set is accepted and yields a curve of ones.
///
/// # Examples
///
/// ```
/// # use survkit_stats::nonparametric::kaplan_meier;
/// let curve = kaplan_meier(
///     &[true, false, true, false],
///     &[1.0, 2.0, 3.0, 4.0],
///     None,
///     None,
/// )
/// .unwrap();
/// assert_eq!(curve.values, [0.75, 0.75, 0.375, 0.375]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn kaplan_meier(
    event: &[bool],
    time: &[f64],
    entry: Option<&[f64]>,
    time_min: Option<f64>,
) -> Result<StepFunction, SurvivalError> {
    let table = match entry {
        Some(entry) => RiskSetTable::left_truncated(event, entry, time)?,
        None => RiskSetTable::right_censored(event, time)?,
    };

    let mut current_survival = 1.0;
    let values = table
        .events
        .iter()
        .zip(&table.at_risk)
        .map(|(&events, &at_risk)| {
            current_survival *= 1.0 - events as f64 / at_risk as f64;
            current_survival
        })
        .collect();

    let mut curve = StepFunction {
        times: table.times,
        values,
        at_risk: table.at_risk,
        events: table.events,
    };
    if let Some(time_min) = time_min {
        let start = curve.times.partition_point(|&t| t < time_min);
        curve.retain_from(start);
    }
    Ok(curve)
}

/// Nelson-Aalen estimator of the cumulative hazard function.
///
/// Requires at least one event.
///
/// # Examples
///
/// ```
/// # use survkit_stats::nonparametric::nelson_aalen;
/// let curve = nelson_aalen(&[true, false, true, false], &[1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(curve.values, [0.25, 0.25, 0.75, 0.75]);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn nelson_aalen(event: &[bool], time: &[f64]) -> Result<StepFunction, SurvivalError> {
    validation::check_survival(event, time, false)?;
    let table = RiskSetTable::right_censored(event, time)?;

    let mut cumulative_hazard = 0.0;
    let values = table
        .events
        .iter()
        .zip(&table.at_risk)
        .map(|(&events, &at_risk)| {
            cumulative_hazard += events as f64 / at_risk as f64;
            cumulative_hazard
        })
        .collect();

    Ok(StepFunction {
        times: table.times,
        values,
        at_risk: table.at_risk,
        events: table.events,
    })
}

/// Computes inverse probability of censoring weights.
///
/// The censoring distribution `G` is estimated by Kaplan-Meier with the
/// roles of event and censoring swapped. Each event sample gets weight
/// `1 / G(t)` evaluated at its own time; censored samples get `0`. Without
/// any censoring every weight is `1`.
///
/// # Examples
///
/// ```
/// # use survkit_stats::nonparametric::ipc_weights;
/// let weights = ipc_weights(&[true, false, true], &[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(weights, [1.0, 0.0, 2.0]);
/// ```
pub fn ipc_weights(event: &[bool], time: &[f64]) -> Result<Vec<f64>, SurvivalError> {
    validation::check_survival(event, time, true)?;
    if event.iter().all(|&e| e) {
        return Ok(vec![1.0; time.len()]);
    }

    let censored = event.iter().map(|&e| !e).collect::<Vec<_>>();
    let censoring = kaplan_meier(&censored, time, None, None)?;

    event
        .iter()
        .zip(time)
        .map(|(&e, &t)| {
            if !e {
                return Ok(0.0);
            }
            // event times are always present in the unique time points
            let idx = censoring.times.partition_point(|&u| u < t);
            let g = censoring.values[idx];
            if g <= 0.0 {
                return Err(SurvivalError::NonInvertibleCensoringWeight { time: t });
            }
            Ok(1.0 / g)
        })
        .collect()
}
