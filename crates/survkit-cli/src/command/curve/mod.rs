//! Nonparametric curve commands
//!
//! Estimates the Kaplan-Meier survival function or the Nelson-Aalen
//! cumulative hazard of a set of survival records.

mod table;

use std::path::PathBuf;

use clap::Args;
use survkit_stats::nonparametric;

use crate::{command::Format, schema::report::CurveReport, util, util::Output};

#[derive(Default, Debug, Clone, Args)]
pub(crate) struct KaplanMeierArg {
    /// Path to the samples JSON file
    pub samples: PathBuf,
    /// Omit curve points before this time
    #[arg(long)]
    pub time_min: Option<f64>,
    /// With `--time-min`, renormalise the curve to be conditional on survival up to that time
    #[arg(long, requires = "time_min")]
    pub conditional: bool,
    /// Output format (json or table)
    #[arg(long, default_value = "json")]
    pub format: Format,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, Args)]
pub(crate) struct NelsonAalenArg {
    /// Path to the samples JSON file
    pub samples: PathBuf,
    /// Output format (json or table)
    #[arg(long, default_value = "json")]
    pub format: Format,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run_kaplan_meier(arg: &KaplanMeierArg) -> anyhow::Result<()> {
    let KaplanMeierArg {
        samples,
        time_min,
        conditional,
        format,
        output,
    } = arg;

    let columns = util::read_samples_file("samples", samples)?;
    let curve = if *conditional {
        let time_min = time_min.unwrap_or(f64::NEG_INFINITY);
        let curve = nonparametric::kaplan_meier(
            &columns.event,
            &columns.time,
            columns.entry.as_deref(),
            None,
        )?;
        curve.conditional_on(time_min).ok_or_else(|| {
            anyhow::anyhow!("survival probability reaches zero before time {time_min}")
        })?
    } else {
        nonparametric::kaplan_meier(
            &columns.event,
            &columns.time,
            columns.entry.as_deref(),
            *time_min,
        )?
    };
    log::info!("Kaplan-Meier curve has {} time points", curve.len());

    let median = curve.median_survival();
    let report = CurveReport::new("kaplan-meier", curve, median);
    Output::save_report(&report, *format, output.clone(), |w, report| {
        table::write_curve_table(w, report, "S(t)")
    })
}

pub(crate) fn run_nelson_aalen(arg: &NelsonAalenArg) -> anyhow::Result<()> {
    let NelsonAalenArg {
        samples,
        format,
        output,
    } = arg;

    let columns = util::read_samples_file("samples", samples)?;
    if columns.entry.is_some() {
        log::warn!("Entry times are ignored by the Nelson-Aalen estimator");
    }
    let curve = nonparametric::nelson_aalen(&columns.event, &columns.time)?;
    log::info!("Nelson-Aalen curve has {} time points", curve.len());

    let report = CurveReport::new("nelson-aalen", curve, None);
    Output::save_report(&report, *format, output.clone(), |w, report| {
        table::write_curve_table(w, report, "H(t)")
    })
}
