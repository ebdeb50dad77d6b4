//! JSON reports written by the commands.

use serde::Serialize;
use survkit_stats::{
    auc::CumulativeDynamicAuc, concordance::ConcordanceIndex, nonparametric::StepFunction,
};

/// A nonparametric step function together with its risk-set columns.
#[derive(Debug, Clone, Serialize)]
pub struct CurveReport {
    pub estimator: &'static str,
    pub times: Vec<f64>,
    pub values: Vec<f64>,
    pub at_risk: Vec<usize>,
    pub events: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median_survival: Option<f64>,
}

impl CurveReport {
    pub fn new(estimator: &'static str, curve: StepFunction, median_survival: Option<f64>) -> Self {
        Self {
            estimator,
            times: curve.times,
            values: curve.values,
            at_risk: curve.at_risk,
            events: curve.events,
            median_survival,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConcordanceReport {
    pub estimator: &'static str,
    pub cindex: f64,
    pub concordant: usize,
    pub discordant: usize,
    pub tied_risk: usize,
    pub tied_time: usize,
}

impl ConcordanceReport {
    pub fn new(estimator: &'static str, result: ConcordanceIndex) -> Self {
        let ConcordanceIndex {
            cindex,
            concordant,
            discordant,
            tied_risk,
            tied_time,
        } = result;
        Self {
            estimator,
            cindex,
            concordant,
            discordant,
            tied_risk,
            tied_time,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicAucReport {
    pub times: Vec<f64>,
    pub auc: Vec<f64>,
    pub mean_auc: f64,
}

impl From<CumulativeDynamicAuc> for DynamicAucReport {
    fn from(result: CumulativeDynamicAuc) -> Self {
        Self {
            times: result.times,
            auc: result.auc,
            mean_auc: result.mean_auc,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightsReport {
    pub times: Vec<f64>,
    pub weights: Vec<f64>,
}
