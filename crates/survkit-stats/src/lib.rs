//! Survival analysis estimators and risk-prediction metrics.
//!
//! This crate provides nonparametric estimators for right-censored (and
//! optionally left-truncated) time-to-event data, together with evaluation
//! metrics that correct for censoring through inverse probability of
//! censoring weighting (IPCW):
//!
//! - **Risk sets**: Event and at-risk counts at each unique time point
//! - **Step-function estimators**: Kaplan-Meier survival and Nelson-Aalen cumulative hazard
//! - **Fitted estimators**: Survival and censoring distributions with probability lookup and IPCW
//! - **Concordance**: Harrell's and Uno's (IPCW) concordance index
//! - **Dynamic AUC**: Cumulative/dynamic time-dependent AUC with an integrated summary
//!
//! # Modules
//!
//! - [`risk_set`]: Risk-set tables for right-censored and left-truncated samples
//! - [`nonparametric`]: Kaplan-Meier and Nelson-Aalen step functions, IPC weights
//! - [`estimator`]: Fitted survival and censoring distribution estimators
//! - [`concordance`]: Concordance index for right-censored data
//! - [`auc`]: Cumulative/dynamic AUC
//! - [`validation`]: Input checks and the [`SurvivalData`] sample container
//! - [`error`]: The [`SurvivalError`] taxonomy
//!
//! # Examples
//!
//! ## Estimating a survival curve
//!
//! ```
//! use survkit_stats::nonparametric::kaplan_meier;
//!
//! let event = [true, false, true, false];
//! let time = [1.0, 2.0, 3.0, 4.0];
//! let curve = kaplan_meier(&event, &time, None, None).unwrap();
//! assert_eq!(curve.values, [0.75, 0.75, 0.375, 0.375]);
//! ```
//!
//! ## Evaluating a risk score
//!
//! ```
//! use survkit_stats::{DEFAULT_TIED_TOL, concordance::concordance_index_censored};
//!
//! let event = [true, true, true, true, true];
//! let time = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let risk = [5.0, 4.0, 3.0, 2.0, 1.0];
//! let result = concordance_index_censored(&event, &time, &risk, DEFAULT_TIED_TOL).unwrap();
//! assert_eq!(result.cindex, 1.0);
//! assert_eq!(result.concordant, 10);
//! ```
//!
//! ## Correcting for censoring
//!
//! ```
//! use survkit_stats::{SurvivalData, estimator::CensoringDistributionEstimator};
//!
//! let train = SurvivalData::new(vec![true, true, false, true], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
//! let censoring = CensoringDistributionEstimator::fit(&train).unwrap();
//! assert_eq!(censoring.predict_proba(&[2.5, 3.0]).unwrap(), [1.0, 0.5]);
//! ```

pub use self::{
    concordance::DEFAULT_TIED_TOL,
    error::{InvalidInputError, SurvivalError},
    validation::SurvivalData,
};

pub mod auc;
pub mod concordance;
pub mod error;
pub mod estimator;
pub mod nonparametric;
pub mod risk_set;
pub mod validation;
