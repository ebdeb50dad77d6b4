//! Cumulative/dynamic AUC for right-censored time-to-event data.
//!
//! At a horizon `t`, *cumulative cases* are the samples with an event at or
//! before `t` and *dynamic controls* are the samples still event-free after
//! `t`. The AUC at `t` measures how well the risk score separates the two
//! groups. Cases are reweighted by inverse probability of censoring weights
//! estimated on training data.
//!
//! A summary over all horizons is obtained by integrating the AUC against the
//! Kaplan-Meier estimate of the test data's survival function.

use crate::{
    error::{InvalidInputError, SurvivalError},
    estimator::{CensoringDistributionEstimator, SurvivalFunctionEstimator},
    validation::{self, SurvivalData},
};

/// Time-dependent AUC evaluated at a set of horizons.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeDynamicAuc {
    /// Evaluation times, sorted ascending without duplicates.
    pub times: Vec<f64>,
    /// AUC at each evaluation time.
    pub auc: Vec<f64>,
    /// Mean AUC over the evaluation time range, weighted by the drop in the
    /// survival function between consecutive evaluation times.
    pub mean_auc: f64,
}

/// Trapezoidal integral of `y` over `x`.
fn trapezoid(y: &[f64], x: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum()
}

/// Computes the AUC at a single horizon.
///
/// `time`, `event`, `estimate` and `ipcw` must be sorted by descending risk
/// estimate.
fn auc_at(
    horizon: f64,
    time: &[f64],
    event: &[bool],
    estimate: &[f64],
    ipcw: &[f64],
    tied_tol: f64,
) -> Result<f64, SurvivalError> {
    let is_case = |i: usize| event[i] && time[i] <= horizon;
    let is_control = |i: usize| time[i] > horizon;

    let n_controls = (0..time.len()).filter(|&i| is_control(i)).count();
    let case_weight = (0..time.len())
        .filter(|&i| is_case(i))
        .map(|i| ipcw[i])
        .sum::<f64>();
    // horizons below the largest test time always leave the last sample as a control
    if n_controls == 0 {
        return Err(InvalidInputError::NoControls { time: horizon }.into());
    }
    if case_weight <= 0.0 {
        return Err(InvalidInputError::NoCases { time: horizon }.into());
    }

    let mut true_pos = vec![];
    let mut false_pos = vec![];
    let mut tp_value = 0.0;
    let mut fp_value = 0.0;
    let mut est_prev = f64::INFINITY;

    // a new ROC vertex only when the score changes, so tied scores share one vertex
    for (i, &est) in estimate.iter().enumerate() {
        if (est - est_prev).abs() > tied_tol {
            true_pos.push(tp_value);
            false_pos.push(fp_value);
            est_prev = est;
        }
        if is_case(i) {
            tp_value += ipcw[i];
        } else if is_control(i) {
            fp_value += 1.0;
        }
    }
    true_pos.push(tp_value);
    false_pos.push(fp_value);

    #[expect(clippy::cast_precision_loss)]
    let n_controls = n_controls as f64;
    let sensitivity = true_pos.iter().map(|tp| tp / case_weight).collect::<Vec<_>>();
    let false_pos_rate = false_pos.iter().map(|fp| fp / n_controls).collect::<Vec<_>>();
    Ok(trapezoid(&sensitivity, &false_pos_rate))
}

/// Estimates the cumulative/dynamic AUC at the given evaluation times.
///
/// # Arguments
///
/// * `train` - Survival data the censoring distribution is estimated from
/// * `test` - Survival data the risk estimates refer to
/// * `estimate` - Estimated risk for each test sample
/// * `times` - Evaluation times; sorted and de-duplicated before use. Each
///   must lie in `[min(test time), max(test time))`.
/// * `tied_tol` - Risk estimates whose absolute difference is at most this
///   value are merged into one ROC vertex
///
/// # Examples
///
/// ```
/// use survkit_stats::{
///     auc::cumulative_dynamic_auc, concordance::DEFAULT_TIED_TOL, validation::SurvivalData,
/// };
///
/// let data = SurvivalData::new(vec![true; 4], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let risk = [4.0, 3.0, 2.0, 1.0];
/// let result = cumulative_dynamic_auc(&data, &data, &risk, &[1.5, 2.5], DEFAULT_TIED_TOL).unwrap();
/// assert_eq!(result.auc, [1.0, 1.0]);
/// assert_eq!(result.mean_auc, 1.0);
/// ```
pub fn cumulative_dynamic_auc(
    train: &SurvivalData,
    test: &SurvivalData,
    estimate: &[f64],
    times: &[f64],
    tied_tol: f64,
) -> Result<CumulativeDynamicAuc, SurvivalError> {
    test.require_event()?;
    validation::check_estimate(estimate, test.time())?;
    validation::check_finite("times", times)?;

    let mut times = times.to_vec();
    times.sort_by(f64::total_cmp);
    times.dedup();

    let (min_time, max_time) = (test.min_time(), test.max_time());
    if let Some(&time) = times.iter().find(|&&t| t < min_time || t >= max_time) {
        return Err(InvalidInputError::TimeOutOfRange {
            time,
            min: min_time,
            max: max_time,
        }
        .into());
    }

    let censoring = CensoringDistributionEstimator::fit(train)?;
    let ipcw = censoring.predict_ipcw(test)?;

    // sort by risk score, descending
    let mut order = (0..estimate.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| estimate[b].total_cmp(&estimate[a]));
    let sorted_time = order.iter().map(|&i| test.time()[i]).collect::<Vec<_>>();
    let sorted_event = order.iter().map(|&i| test.event()[i]).collect::<Vec<_>>();
    let sorted_estimate = order.iter().map(|&i| estimate[i]).collect::<Vec<_>>();
    let sorted_ipcw = order.iter().map(|&i| ipcw[i]).collect::<Vec<_>>();

    let auc = times
        .iter()
        .map(|&t| {
            let score = auc_at(
                t,
                &sorted_time,
                &sorted_event,
                &sorted_estimate,
                &sorted_ipcw,
                tied_tol,
            )?;
            log::debug!("AUC({t}) = {score:.4}");
            Ok(score)
        })
        .collect::<Result<Vec<_>, SurvivalError>>()?;

    let mean_auc = if auc.len() == 1 {
        auc[0]
    } else {
        let survival = SurvivalFunctionEstimator::fit(test)?;
        let s_times = survival.predict_proba(&times)?;
        let mut prev = 1.0;
        let mut integral = 0.0;
        for (score, &s) in auc.iter().zip(&s_times) {
            integral += score * (prev - s);
            prev = s;
        }
        integral / (1.0 - prev)
    };

    Ok(CumulativeDynamicAuc {
        times,
        auc,
        mean_auc,
    })
}
