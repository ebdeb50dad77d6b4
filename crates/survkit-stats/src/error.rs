//! Error taxonomy shared by every estimator and metric.
//!
//! All failures are detected before any partial result is produced and are
//! reported synchronously to the caller.

/// Failure of a survival estimator or evaluation metric.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SurvivalError {
    #[display("invalid input: {_0}")]
    InvalidInput(InvalidInputError),
    #[display("all samples are censored")]
    AllCensored,
    #[display("censoring survival function is zero at time {time}")]
    NonInvertibleCensoringWeight { time: f64 },
    #[display("time {time} must be smaller than largest observed time point {last_time}")]
    UndefinedTailProbability { time: f64, last_time: f64 },
}

/// The precondition that an [`SurvivalError::InvalidInput`] refers to.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InvalidInputError {
    #[display("'{name}' is empty")]
    Empty { name: &'static str },
    #[display("'{name}' has {found} elements, but '{reference}' has {expected}")]
    LengthMismatch {
        name: &'static str,
        reference: &'static str,
        expected: usize,
        found: usize,
    },
    #[display("need a minimum of {min} samples, got {found}")]
    TooFewSamples { min: usize, found: usize },
    #[display("'{name}' contains a non-finite value at index {index}")]
    NonFinite { name: &'static str, index: usize },
    #[display("'{name}' contains a negative value at index {index}")]
    Negative { name: &'static str, index: usize },
    #[display("exit time must be larger than entry time for all samples (sample {index})")]
    EntryAfterExit { index: usize },
    #[display("all times must be within follow-up time of test data: [{min}; {max}[, got {time}")]
    TimeOutOfRange { time: f64, min: f64, max: f64 },
    #[display("no samples have a time smaller than the truncation time {tau}")]
    EmptyTimeRange { tau: f64 },
    #[display("there are no comparable pairs with positive weight")]
    NoComparablePairs,
    #[display("no cases (events at or before time {time}) with positive weight")]
    NoCases { time: f64 },
    #[display("no controls (samples surviving past time {time})")]
    NoControls { time: f64 },
}

impl From<InvalidInputError> for SurvivalError {
    fn from(err: InvalidInputError) -> Self {
        Self::InvalidInput(err)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_invalid_input_exposes_source() {
        let err = SurvivalError::from(InvalidInputError::TooFewSamples { min: 2, found: 1 });
        assert_eq!(
            err.to_string(),
            "invalid input: need a minimum of 2 samples, got 1"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_leaf_errors_have_no_source() {
        let err = SurvivalError::NonInvertibleCensoringWeight { time: 3.0 };
        assert!(err.source().is_none());
        assert_eq!(
            err.to_string(),
            "censoring survival function is zero at time 3"
        );
    }
}
