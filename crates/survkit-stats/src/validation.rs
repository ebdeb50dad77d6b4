//! Input checks performed before any algorithmic work begins.
//!
//! The estimators and metrics accept plain slices. The helpers here verify
//! that parallel arrays agree in length, that numeric inputs are finite,
//! that times are non-negative and that the sample set carries the events a
//! computation needs.

use crate::error::{InvalidInputError, SurvivalError};

/// Checks that every named array has the same length as the first one.
///
/// The first entry is the reference that the others are compared against.
pub fn check_consistent_length(arrays: &[(&'static str, usize)]) -> Result<(), SurvivalError> {
    let Some(&(reference, expected)) = arrays.first() else {
        return Ok(());
    };
    for &(name, found) in &arrays[1..] {
        if found != expected {
            return Err(InvalidInputError::LengthMismatch {
                name,
                reference,
                expected,
                found,
            }
            .into());
        }
    }
    Ok(())
}

/// Checks that `values` is non-empty and holds only finite numbers.
pub fn check_finite(name: &'static str, values: &[f64]) -> Result<(), SurvivalError> {
    if values.is_empty() {
        return Err(InvalidInputError::Empty { name }.into());
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(InvalidInputError::NonFinite { name, index }.into());
    }
    Ok(())
}

/// Checks that `values` holds no negative numbers.
pub fn check_non_negative(name: &'static str, values: &[f64]) -> Result<(), SurvivalError> {
    if let Some(index) = values.iter().position(|&v| v < 0.0) {
        return Err(InvalidInputError::Negative { name, index }.into());
    }
    Ok(())
}

/// Validates a right-censored sample given as parallel `event`/`time` arrays.
///
/// When `allow_all_censored` is `false`, a sample set without a single event
/// is rejected with [`SurvivalError::AllCensored`].
pub fn check_survival(
    event: &[bool],
    time: &[f64],
    allow_all_censored: bool,
) -> Result<(), SurvivalError> {
    check_consistent_length(&[("event", event.len()), ("time", time.len())])?;
    if event.is_empty() {
        return Err(InvalidInputError::Empty { name: "event" }.into());
    }
    check_finite("time", time)?;
    check_non_negative("time", time)?;
    if !allow_all_censored && !event.iter().any(|&e| e) {
        return Err(SurvivalError::AllCensored);
    }
    Ok(())
}

/// Validates a vector of risk estimates against the sample it scores.
pub fn check_estimate(estimate: &[f64], time: &[f64]) -> Result<(), SurvivalError> {
    check_consistent_length(&[("time", time.len()), ("estimate", estimate.len())])?;
    check_finite("estimate", estimate)
}

/// A validated right-censored sample stored as parallel arrays.
///
/// Index `i` of [`event`](Self::event) and [`time`](Self::time) describe the
/// same subject. At least one sample is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct SurvivalData {
    event: Vec<bool>,
    time: Vec<f64>,
}

impl SurvivalData {
    /// Builds a sample set, accepting an all-censored sample.
    ///
    /// # Examples
    ///
    /// ```
    /// # use survkit_stats::validation::SurvivalData;
    /// let data = SurvivalData::new(vec![true, false], vec![1.0, 2.0]).unwrap();
    /// assert_eq!(data.len(), 2);
    /// assert_eq!(data.n_events(), 1);
    /// assert!(SurvivalData::new(vec![true], vec![1.0, 2.0]).is_err());
    /// ```
    pub fn new(event: Vec<bool>, time: Vec<f64>) -> Result<Self, SurvivalError> {
        check_survival(&event, &time, true)?;
        Ok(Self { event, time })
    }

    /// Builds a sample set from `(event, time)` records.
    pub fn from_records<I>(records: I) -> Result<Self, SurvivalError>
    where
        I: IntoIterator<Item = (bool, f64)>,
    {
        let (event, time) = records.into_iter().unzip();
        Self::new(event, time)
    }

    #[must_use]
    pub fn event(&self) -> &[bool] {
        &self.event
    }

    #[must_use]
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.event.len()
    }

    /// Always `false`; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event.is_empty()
    }

    /// Number of samples that experienced the event.
    #[must_use]
    pub fn n_events(&self) -> usize {
        self.event.iter().filter(|&&e| e).count()
    }

    /// Whether any sample is censored.
    #[must_use]
    pub fn has_censoring(&self) -> bool {
        self.event.iter().any(|&e| !e)
    }

    /// Fails with [`SurvivalError::AllCensored`] if no sample had an event.
    pub fn require_event(&self) -> Result<(), SurvivalError> {
        if self.n_events() == 0 {
            return Err(SurvivalError::AllCensored);
        }
        Ok(())
    }

    #[must_use]
    pub fn min_time(&self) -> f64 {
        self.time.iter().copied().fold(f64::INFINITY, f64::min)
    }

    #[must_use]
    pub fn max_time(&self) -> f64 {
        self.time.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the samples whose `mask` entry is `true`, or `None` if the
    /// mask selects nothing.
    ///
    /// # Panics
    ///
    /// Panics if `mask` and the sample set differ in length.
    #[must_use]
    pub fn select(&self, mask: &[bool]) -> Option<Self> {
        assert_eq!(mask.len(), self.len(), "mask length must match samples");
        let (event, time): (Vec<_>, Vec<_>) = self
            .event
            .iter()
            .zip(&self.time)
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|((&e, &t), _)| (e, t))
            .unzip();
        if event.is_empty() {
            return None;
        }
        Some(Self { event, time })
    }
}
