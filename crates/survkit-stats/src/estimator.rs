//! Fitted survival and censoring distribution estimators.
//!
//! Both estimators wrap a [`FittedStepFunction`], a Kaplan-Meier curve with a
//! leading sentinel point at `-inf` so that probabilities can be looked up at
//! any time before the first observation. They differ only in how the curve
//! is fitted; the censoring variant additionally derives inverse probability
//! of censoring weights.
//!
//! # Examples
//!
//! ```
//! use survkit_stats::{estimator::SurvivalFunctionEstimator, validation::SurvivalData};
//!
//! let data = SurvivalData::new(vec![true, false, true, false], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let estimator = SurvivalFunctionEstimator::fit(&data).unwrap();
//! let prob = estimator.predict_proba(&[0.5, 1.0, 2.5]).unwrap();
//! assert_eq!(prob, [1.0, 0.75, 0.75]);
//! ```

use crate::{
    error::SurvivalError,
    nonparametric,
    validation::{self, SurvivalData},
};

/// An immutable, right-continuous step function with a `-inf` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedStepFunction {
    /// Time points, starting with the `-inf` sentinel.
    times: Vec<f64>,
    /// Probability from each time point until the next one.
    values: Vec<f64>,
}

impl FittedStepFunction {
    fn with_sentinel(times: &[f64], values: &[f64]) -> Self {
        let mut all_times = Vec::with_capacity(times.len() + 1);
        all_times.push(f64::NEG_INFINITY);
        all_times.extend_from_slice(times);

        let mut all_values = Vec::with_capacity(values.len() + 1);
        all_values.push(1.0);
        all_values.extend_from_slice(values);

        Self {
            times: all_times,
            values: all_values,
        }
    }

    /// Observed time points, without the sentinel.
    #[must_use]
    pub fn unique_times(&self) -> &[f64] {
        &self.times[1..]
    }

    /// Probabilities at [`unique_times`](Self::unique_times).
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.values[1..]
    }

    /// Largest observed time point (`-inf` if nothing was observed).
    #[must_use]
    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    fn last_value(&self) -> f64 {
        self.values[self.values.len() - 1]
    }

    /// Looks up the probability at each query time.
    ///
    /// The value at `t` is the one stored for the greatest time point not
    /// exceeding `t`. Time points are matched exactly, with no tolerance: a
    /// query a rounding error below a stored time gets the preceding value.
    /// Queries past the last observed time are only defined
    /// when the curve has already dropped to zero; otherwise the lookup fails
    /// with [`SurvivalError::UndefinedTailProbability`].
    pub fn predict_proba(&self, time: &[f64]) -> Result<Vec<f64>, SurvivalError> {
        validation::check_finite("time", time)?;
        time.iter().map(|&t| self.predict_one(t)).collect()
    }

    fn predict_one(&self, time: f64) -> Result<f64, SurvivalError> {
        let last_time = self.last_time();
        if time > last_time {
            if self.last_value() > 0.0 {
                return Err(SurvivalError::UndefinedTailProbability { time, last_time });
            }
            return Ok(0.0);
        }
        // the sentinel guarantees at least one point <= time
        let idx = self.times.partition_point(|&u| u <= time) - 1;
        Ok(self.values[idx])
    }
}

/// Kaplan-Meier estimate of the survival function `S(t) = P(T > t)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalFunctionEstimator {
    step: FittedStepFunction,
}

impl SurvivalFunctionEstimator {
    /// Estimates the survival distribution. All-censored data is accepted.
    pub fn fit(data: &SurvivalData) -> Result<Self, SurvivalError> {
        let curve = nonparametric::kaplan_meier(data.event(), data.time(), None, None)?;
        log::debug!(
            "fitted survival function on {} samples, {} time points",
            data.len(),
            curve.len()
        );
        Ok(Self {
            step: FittedStepFunction::with_sentinel(&curve.times, &curve.values),
        })
    }

    #[must_use]
    pub fn step_function(&self) -> &FittedStepFunction {
        &self.step
    }

    /// Survival probability at each query time; see
    /// [`FittedStepFunction::predict_proba`].
    pub fn predict_proba(&self, time: &[f64]) -> Result<Vec<f64>, SurvivalError> {
        self.step.predict_proba(time)
    }
}

/// Kaplan-Meier estimate of the censoring distribution `G(t) = P(C > t)`.
///
/// # Examples
///
/// ```
/// use survkit_stats::{estimator::CensoringDistributionEstimator, validation::SurvivalData};
///
/// let train = SurvivalData::new(vec![true, true, false, true], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let censoring = CensoringDistributionEstimator::fit(&train).unwrap();
///
/// let test = SurvivalData::new(vec![true, false, true], vec![1.5, 2.5, 3.5]).unwrap();
/// let weights = censoring.predict_ipcw(&test).unwrap();
/// assert_eq!(weights, [1.0, 0.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CensoringDistributionEstimator {
    step: FittedStepFunction,
}

impl CensoringDistributionEstimator {
    /// Estimates the censoring distribution by treating censoring as the event.
    ///
    /// Requires at least one event. Without any censoring the distribution is
    /// `1` at every observed time point.
    pub fn fit(data: &SurvivalData) -> Result<Self, SurvivalError> {
        data.require_event()?;

        let step = if data.has_censoring() {
            let censored = data.event().iter().map(|&e| !e).collect::<Vec<_>>();
            let curve = nonparametric::kaplan_meier(&censored, data.time(), None, None)?;
            FittedStepFunction::with_sentinel(&curve.times, &curve.values)
        } else {
            let mut times = data.time().to_vec();
            times.sort_by(f64::total_cmp);
            times.dedup();
            let ones = vec![1.0; times.len()];
            FittedStepFunction::with_sentinel(&times, &ones)
        };

        log::debug!(
            "fitted censoring distribution on {} samples ({} censored), {} time points",
            data.len(),
            data.len() - data.n_events(),
            step.unique_times().len()
        );
        Ok(Self { step })
    }

    #[must_use]
    pub fn step_function(&self) -> &FittedStepFunction {
        &self.step
    }

    /// Probability of remaining uncensored at each query time.
    pub fn predict_proba(&self, time: &[f64]) -> Result<Vec<f64>, SurvivalError> {
        self.step.predict_proba(time)
    }

    /// Inverse probability of censoring weights for `data`.
    ///
    /// Event samples get `1 / G(t)` at their own time, censored samples get
    /// `0`. Fails with [`SurvivalError::NonInvertibleCensoringWeight`] if `G`
    /// is zero at any event time.
    pub fn predict_ipcw(&self, data: &SurvivalData) -> Result<Vec<f64>, SurvivalError> {
        data.require_event()?;

        let event_times = data
            .event()
            .iter()
            .zip(data.time())
            .filter(|(e, _)| **e)
            .map(|(_, &t)| t)
            .collect::<Vec<_>>();
        let g = self.predict_proba(&event_times)?;
        if let Some(pos) = g.iter().position(|&p| p == 0.0) {
            return Err(SurvivalError::NonInvertibleCensoringWeight {
                time: event_times[pos],
            });
        }

        let mut g = g.into_iter();
        let weights = data
            .event()
            .iter()
            .map(|&e| if e { g.next().map_or(0.0, |p| 1.0 / p) } else { 0.0 })
            .collect();
        Ok(weights)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn data(event: &[bool], time: &[f64]) -> SurvivalData {
        SurvivalData::new(event.to_vec(), time.to_vec()).unwrap()
    }

    #[test]
    fn test_predict_proba_step_lookup() {
        let train = data(&[true, false, true, false], &[1.0, 2.0, 3.0, 4.0]);
        let estimator = SurvivalFunctionEstimator::fit(&train).unwrap();
        let prob = estimator
            .predict_proba(&[-10.0, 0.999, 1.0, 2.0, 2.999, 3.0, 4.0])
            .unwrap();
        assert_eq!(prob, [1.0, 1.0, 0.75, 0.75, 0.75, 0.375, 0.375]);
    }

    #[test]
    fn test_predict_proba_matches_time_points_exactly() {
        let train = data(&[true, false, true, false], &[1.0, 2.0, 3.0, 4.0]);
        let estimator = SurvivalFunctionEstimator::fit(&train).unwrap();
        let just_below = 3.0 - 4.0 * f64::EPSILON;
        let prob = estimator.predict_proba(&[just_below, 3.0]).unwrap();
        assert_eq!(prob, [0.75, 0.375]);
    }

    #[test]
    fn test_predict_proba_undefined_tail() {
        let estimator =
            SurvivalFunctionEstimator::fit(&data(&[true, false], &[1.0, 2.0])).unwrap();
        assert_eq!(
            estimator.predict_proba(&[1.5, 2.5]),
            Err(SurvivalError::UndefinedTailProbability {
                time: 2.5,
                last_time: 2.0
            })
        );
    }

    #[test]
    fn test_predict_proba_zero_tail_is_defined() {
        let estimator =
            SurvivalFunctionEstimator::fit(&data(&[true, true], &[1.0, 2.0])).unwrap();
        assert_eq!(estimator.predict_proba(&[2.0, 100.0]).unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn test_survival_fit_accepts_all_censored() {
        let estimator =
            SurvivalFunctionEstimator::fit(&data(&[false, false], &[1.0, 2.0])).unwrap();
        assert_eq!(estimator.step_function().probabilities(), [1.0, 1.0]);
        assert_eq!(estimator.step_function().unique_times(), [1.0, 2.0]);
    }

    #[test]
    fn test_censoring_fit_requires_event() {
        assert_eq!(
            CensoringDistributionEstimator::fit(&data(&[false, false], &[1.0, 2.0])),
            Err(SurvivalError::AllCensored)
        );
    }

    #[test]
    fn test_censoring_without_censoring_is_one() {
        let censoring =
            CensoringDistributionEstimator::fit(&data(&[true, true, true], &[3.0, 1.0, 3.0]))
                .unwrap();
        assert_eq!(censoring.step_function().unique_times(), [1.0, 3.0]);
        assert_eq!(censoring.predict_proba(&[0.0, 2.0, 3.0]).unwrap(), [1.0; 3]);

        let test = data(&[true, true, true], &[1.0, 2.0, 3.0]);
        assert_eq!(censoring.predict_ipcw(&test).unwrap(), [1.0; 3]);
    }

    #[test]
    fn test_predict_ipcw_weights() {
        let train = data(&[true, false, true, false], &[1.0, 2.0, 3.0, 4.0]);
        let censoring = CensoringDistributionEstimator::fit(&train).unwrap();
        // G: 1 before 2, 2/3 from 2, 0 from 4
        let weights = censoring
            .predict_ipcw(&data(&[true, true, false, true], &[1.0, 2.0, 2.5, 3.0]))
            .unwrap();
        assert_abs_diff_eq!(weights[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[1], 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[2], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[3], 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_predict_ipcw_non_invertible() {
        let censoring =
            CensoringDistributionEstimator::fit(&data(&[true, false], &[1.0, 2.0])).unwrap();
        assert_eq!(
            censoring.predict_ipcw(&data(&[true, true], &[1.0, 2.0])),
            Err(SurvivalError::NonInvertibleCensoringWeight { time: 2.0 })
        );
    }
}
