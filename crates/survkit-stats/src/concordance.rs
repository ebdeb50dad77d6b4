//! Concordance index for right-censored data.
//!
//! Two samples are comparable if the one with the shorter time experienced
//! the event. A comparable pair is concordant when the earlier event has the
//! higher estimated risk. Pairs with risk estimates within `tied_tol` of each
//! other count as half concordant.
//!
//! - [`concordance_index_censored`]: Harrell's estimator, every comparable
//!   pair weighted equally.
//! - [`concordance_index_ipcw`]: Uno's estimator, each pair weighted by the
//!   squared inverse probability of censoring weight of its event sample, so
//!   the result does not depend on the censoring distribution of the test
//!   data.
//!
//! # Examples
//!
//! ```
//! use survkit_stats::concordance::{DEFAULT_TIED_TOL, concordance_index_censored};
//!
//! let event = [true; 5];
//! let time = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let risk = [5.0, 4.0, 3.0, 2.0, 1.0];
//! let result = concordance_index_censored(&event, &time, &risk, DEFAULT_TIED_TOL).unwrap();
//! assert_eq!(result.cindex, 1.0);
//! assert_eq!(result.concordant, 10);
//! assert_eq!(result.discordant, 0);
//! ```

use crate::{
    error::{InvalidInputError, SurvivalError},
    estimator::CensoringDistributionEstimator,
    risk_set::argsort_stable,
    validation::{self, SurvivalData},
};

/// Default tolerance below which two risk estimates are considered tied.
pub const DEFAULT_TIED_TOL: f64 = 1e-8;

/// Result of a concordance index calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConcordanceIndex {
    /// Weighted fraction of concordant comparable pairs.
    pub cindex: f64,
    /// Number of concordant pairs.
    pub concordant: usize,
    /// Number of discordant pairs.
    pub discordant: usize,
    /// Number of comparable pairs with tied risk estimates.
    pub tied_risk: usize,
    /// Number of comparable pairs that share the same time (an event and a
    /// censoring at the same time point).
    pub tied_time: usize,
}

/// An event sample and the tied-time block it belongs to, in sorted order.
///
/// The sample is comparable to every censored sample in
/// `block_start..block_end` and to every sample from `block_end` onwards.
#[derive(Debug, Clone, Copy)]
struct ComparableEvent {
    position: usize,
    block_start: usize,
    block_end: usize,
}

impl ComparableEvent {
    fn comparable_positions<'a>(
        &self,
        event: &'a [bool],
        order: &'a [usize],
    ) -> impl Iterator<Item = usize> + 'a {
        let tied = (self.block_start..self.block_end).filter(move |&k| !event[order[k]]);
        tied.chain(self.block_end..order.len())
    }
}

/// Collects every event sample that has comparable partners, together with
/// the number of event/censoring pairs sharing a time point.
fn comparable_events(
    event: &[bool],
    time: &[f64],
    order: &[usize],
) -> (Vec<ComparableEvent>, usize) {
    let n_samples = order.len();
    let mut comparable = vec![];
    let mut tied_time = 0;

    let mut i = 0;
    while i + 1 < n_samples {
        let time_i = time[order[i]];
        let mut end = i + 1;
        while end < n_samples && time[order[end]] == time_i {
            end += 1;
        }

        let censored_in_block = order[i..end].iter().filter(|&&k| !event[k]).count();
        for position in i..end {
            if event[order[position]] {
                comparable.push(ComparableEvent {
                    position,
                    block_start: i,
                    block_end: end,
                });
                tied_time += censored_in_block;
            }
        }
        i = end;
    }

    (comparable, tied_time)
}

/// Accumulates weighted concordant, discordant and tied pairs.
///
/// `weights` holds one non-negative weight per sample, applied to every pair
/// in which that sample is the event.
#[expect(clippy::cast_precision_loss)]
fn estimate_concordance_index(
    event: &[bool],
    time: &[f64],
    estimate: &[f64],
    weights: &[f64],
    tied_tol: f64,
) -> Result<ConcordanceIndex, SurvivalError> {
    let order = argsort_stable(time);
    let (comparable, tied_time) = comparable_events(event, time, &order);

    let mut concordant = 0;
    let mut discordant = 0;
    let mut tied_risk = 0;
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for pair in &comparable {
        let sample = order[pair.position];
        let est_i = estimate[sample];
        let w_i = weights[sample];

        let mut n_comparable = 0_usize;
        let mut n_con = 0_usize;
        let mut n_ties = 0_usize;
        for k in pair.comparable_positions(event, &order) {
            let est_j = estimate[order[k]];
            n_comparable += 1;
            if (est_j - est_i).abs() <= tied_tol {
                n_ties += 1;
            } else if est_j < est_i {
                n_con += 1;
            }
        }

        numerator += w_i * n_con as f64 + 0.5 * w_i * n_ties as f64;
        denominator += w_i * n_comparable as f64;

        tied_risk += n_ties;
        concordant += n_con;
        discordant += n_comparable - n_con - n_ties;
    }

    if denominator <= 0.0 {
        return Err(InvalidInputError::NoComparablePairs.into());
    }

    let total = concordant + discordant + tied_risk;
    if tied_risk * 2 > total {
        log::warn!("{tied_risk} of {total} comparable pairs have tied risk estimates");
    }
    log::debug!(
        "concordance: {concordant} concordant, {discordant} discordant, {tied_risk} tied risk, {tied_time} tied time"
    );

    Ok(ConcordanceIndex {
        cindex: numerator / denominator,
        concordant,
        discordant,
        tied_risk,
        tied_time,
    })
}

fn check_min_samples(n_samples: usize) -> Result<(), SurvivalError> {
    if n_samples < 2 {
        return Err(InvalidInputError::TooFewSamples {
            min: 2,
            found: n_samples,
        }
        .into());
    }
    Ok(())
}

/// Harrell's concordance index for right-censored data.
///
/// # Arguments
///
/// * `event` - Whether an event occurred for each sample
/// * `time` - Time of event or censoring
/// * `estimate` - Estimated risk of experiencing an event
/// * `tied_tol` - Risk estimates whose absolute difference is at most this
///   value are considered tied
///
/// Requires at least two samples and at least one event.
pub fn concordance_index_censored(
    event: &[bool],
    time: &[f64],
    estimate: &[f64],
    tied_tol: f64,
) -> Result<ConcordanceIndex, SurvivalError> {
    validation::check_consistent_length(&[
        ("event", event.len()),
        ("time", time.len()),
        ("estimate", estimate.len()),
    ])?;
    validation::check_survival(event, time, true)?;
    validation::check_estimate(estimate, time)?;
    check_min_samples(time.len())?;
    if !event.iter().any(|&e| e) {
        return Err(SurvivalError::AllCensored);
    }

    let weights = vec![1.0; estimate.len()];
    estimate_concordance_index(event, time, estimate, &weights, tied_tol)
}

/// Uno's concordance index based on inverse probability of censoring
/// weights.
///
/// The censoring distribution is estimated from `train`. Test samples should
/// lie within the follow-up range of the training data; `tau` restricts the
/// comparison to events before that truncation time (samples at or after
/// `tau` get zero weight).
///
/// # Examples
///
/// ```
/// use survkit_stats::{
///     concordance::{DEFAULT_TIED_TOL, concordance_index_ipcw},
///     validation::SurvivalData,
/// };
///
/// let train = SurvivalData::new(vec![true, true, false, true], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let test = SurvivalData::new(vec![true, false, true], vec![1.0, 2.0, 3.5]).unwrap();
/// let result =
///     concordance_index_ipcw(&train, &test, &[3.0, 2.0, 1.0], None, DEFAULT_TIED_TOL).unwrap();
/// assert_eq!(result.cindex, 1.0);
/// ```
pub fn concordance_index_ipcw(
    train: &SurvivalData,
    test: &SurvivalData,
    estimate: &[f64],
    tau: Option<f64>,
    tied_tol: f64,
) -> Result<ConcordanceIndex, SurvivalError> {
    test.require_event()?;
    validation::check_estimate(estimate, test.time())?;
    check_min_samples(test.len())?;

    let censoring = CensoringDistributionEstimator::fit(train)?;
    let ipcw = match tau {
        None => censoring.predict_ipcw(test)?,
        Some(tau) => {
            let mask = test.time().iter().map(|&t| t < tau).collect::<Vec<_>>();
            let subset = test
                .select(&mask)
                .ok_or(InvalidInputError::EmptyTimeRange { tau })?;
            let mut subset_ipcw = censoring.predict_ipcw(&subset)?.into_iter();
            mask.iter()
                .map(|&keep| if keep { subset_ipcw.next().unwrap_or(0.0) } else { 0.0 })
                .collect()
        }
    };

    let weights = ipcw.iter().map(|w| w * w).collect::<Vec<_>>();
    estimate_concordance_index(test.event(), test.time(), estimate, &weights, tied_tol)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rand::{Rng as _, SeedableRng as _};
    use rand_pcg::Pcg32;

    use super::*;

    fn data(event: &[bool], time: &[f64]) -> SurvivalData {
        SurvivalData::new(event.to_vec(), time.to_vec()).unwrap()
    }

    #[test]
    fn test_perfect_ranking() {
        let result = concordance_index_censored(
            &[true; 5],
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[5.0, 4.0, 3.0, 2.0, 1.0],
            DEFAULT_TIED_TOL,
        )
        .unwrap();
        assert_eq!(
            result,
            ConcordanceIndex {
                cindex: 1.0,
                concordant: 10,
                discordant: 0,
                tied_risk: 0,
                tied_time: 0,
            }
        );
    }

    #[test]
    fn test_censored_samples_only_compare_to_earlier_events() {
        // event at 1 compares to all three later samples, event at 3 to the one at 4;
        // the censored sample at 2 is never the earlier member of a pair
        let result = concordance_index_censored(
            &[true, false, true, false],
            &[1.0, 2.0, 3.0, 4.0],
            &[4.0, 1.0, 2.0, 3.0],
            DEFAULT_TIED_TOL,
        )
        .unwrap();
        assert_eq!(result.concordant, 3);
        assert_eq!(result.discordant, 1);
        assert_eq!(result.tied_risk, 0);
        assert_abs_diff_eq!(result.cindex, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_tied_times() {
        // two events at time 2 are not comparable to each other,
        // each is comparable to the censored sample at 2 and the sample at 3
        let result = concordance_index_censored(
            &[true, true, false, false],
            &[2.0, 2.0, 2.0, 3.0],
            &[3.0, 2.0, 1.0, 1.0],
            DEFAULT_TIED_TOL,
        )
        .unwrap();
        assert_eq!(result.tied_time, 2);
        assert_eq!(result.concordant + result.discordant + result.tied_risk, 4);
        assert_eq!(result.concordant, 4);
    }

    #[test]
    fn test_tied_risk_counts_half() {
        let result = concordance_index_censored(
            &[true, true, true],
            &[1.0, 2.0, 3.0],
            &[1.0, 1.0, 0.0],
            DEFAULT_TIED_TOL,
        )
        .unwrap();
        assert_eq!(result.tied_risk, 1);
        assert_eq!(result.concordant, 2);
        assert_abs_diff_eq!(result.cindex, 2.5 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sign_flip_complements_index() {
        let mut rng = Pcg32::seed_from_u64(5);
        let n = 40_u32;
        let time = (0..n).map(|i| f64::from(i) + 1.0).collect::<Vec<_>>();
        let event = (0..n).map(|_| rng.random_bool(0.7)).collect::<Vec<_>>();
        let estimate = (0..n).map(|_| rng.random::<f64>()).collect::<Vec<_>>();
        let flipped = estimate.iter().map(|e| -e).collect::<Vec<_>>();

        let forward = concordance_index_censored(&event, &time, &estimate, 0.0).unwrap();
        let reversed = concordance_index_censored(&event, &time, &flipped, 0.0).unwrap();
        assert_abs_diff_eq!(forward.cindex + reversed.cindex, 1.0, epsilon = 1e-12);
        assert_eq!(forward.concordant, reversed.discordant);
    }

    #[test]
    fn test_preconditions() {
        assert_eq!(
            concordance_index_censored(&[true], &[1.0], &[1.0], DEFAULT_TIED_TOL),
            Err(SurvivalError::InvalidInput(InvalidInputError::TooFewSamples {
                min: 2,
                found: 1
            }))
        );
        assert_eq!(
            concordance_index_censored(&[false, false], &[1.0, 2.0], &[1.0, 2.0], DEFAULT_TIED_TOL),
            Err(SurvivalError::AllCensored)
        );
        assert!(matches!(
            concordance_index_censored(&[true, false], &[1.0, 2.0], &[1.0], DEFAULT_TIED_TOL),
            Err(SurvivalError::InvalidInput(InvalidInputError::LengthMismatch { .. }))
        ));
        assert_eq!(
            concordance_index_censored(&[true, true], &[1.0, 1.0], &[1.0, 2.0], DEFAULT_TIED_TOL),
            Err(SurvivalError::InvalidInput(InvalidInputError::NoComparablePairs))
        );
    }

    #[test]
    fn test_ipcw_without_censoring_matches_harrell() {
        let mut rng = Pcg32::seed_from_u64(17);
        let time = (0..30)
            .map(|_| f64::from(rng.random_range(1_u32..20)))
            .collect::<Vec<_>>();
        let estimate = (0..30).map(|_| rng.random::<f64>()).collect::<Vec<_>>();
        let event = vec![true; time.len()];
        let train = data(&event, &time);
        let test = data(&event, &time);

        let harrell =
            concordance_index_censored(&event, &time, &estimate, DEFAULT_TIED_TOL).unwrap();
        let uno =
            concordance_index_ipcw(&train, &test, &estimate, None, DEFAULT_TIED_TOL).unwrap();
        assert_abs_diff_eq!(harrell.cindex, uno.cindex, epsilon = 1e-12);
        assert_eq!(harrell.concordant, uno.concordant);
        assert_eq!(harrell.tied_time, uno.tied_time);
    }

    #[test]
    fn test_ipcw_weights_late_events_more() {
        // censoring G: 1 until 2, 2/3 from 2 onwards
        let train = data(&[true, false, true, true], &[1.0, 2.0, 3.0, 4.0]);
        let test = data(&[true, true, false], &[1.0, 3.0, 3.5]);
        // event at 1 (weight 1) is discordant with both later samples,
        // event at 3 (weight (1/(2/3))^2) is concordant with the censored sample
        let result =
            concordance_index_ipcw(&train, &test, &[0.0, 2.0, 1.0], None, DEFAULT_TIED_TOL).unwrap();
        assert_eq!(result.concordant, 1);
        assert_eq!(result.discordant, 2);
        let w = 1.5_f64 * 1.5;
        assert_abs_diff_eq!(result.cindex, w / (2.0 + w), epsilon = 1e-9);
    }

    #[test]
    fn test_ipcw_truncation() {
        let train = data(&[true, false, true, false], &[1.0, 2.0, 3.0, 5.0]);
        let test = data(&[true, true, true], &[1.0, 2.0, 4.0]);
        // the event at 4 is beyond tau and gets zero weight
        let result =
            concordance_index_ipcw(&train, &test, &[3.0, 1.0, 2.0], Some(3.0), DEFAULT_TIED_TOL)
                .unwrap();
        // event at 1 is concordant with both later samples (weight 1);
        // event at 2 (weight 1.5^2) is discordant with the sample at 4
        let w = 1.5_f64 * 1.5;
        assert_abs_diff_eq!(result.cindex, 2.0 / (2.0 + w), epsilon = 1e-9);

        assert_eq!(
            concordance_index_ipcw(&train, &test, &[3.0, 1.0, 2.0], Some(0.5), DEFAULT_TIED_TOL),
            Err(SurvivalError::InvalidInput(InvalidInputError::EmptyTimeRange { tau: 0.5 }))
        );
    }

    #[test]
    fn test_ipcw_requires_event_in_test() {
        let train = data(&[true, false], &[1.0, 2.0]);
        let test = data(&[false, false], &[1.0, 2.0]);
        assert_eq!(
            concordance_index_ipcw(&train, &test, &[1.0, 2.0], None, DEFAULT_TIED_TOL),
            Err(SurvivalError::AllCensored)
        );
    }
}
