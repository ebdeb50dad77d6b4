use std::{
    io::{self, Write},
    path::PathBuf,
};

use survkit_stats::{estimator::CensoringDistributionEstimator, nonparametric};

use crate::{command::Format, schema::report::WeightsReport, util, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CensoringWeightsArg {
    /// Path to the samples JSON file the weights are computed for
    pub samples: PathBuf,
    /// Estimate the censoring distribution from this file instead of the samples themselves
    #[arg(long)]
    pub train: Option<PathBuf>,
    /// Output format (json or table)
    #[arg(long, default_value = "json")]
    pub format: Format,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CensoringWeightsArg) -> anyhow::Result<()> {
    let CensoringWeightsArg {
        samples,
        train,
        format,
        output,
    } = arg;

    let columns = util::read_samples_file("samples", samples)?;
    let weights = match train {
        Some(train) => {
            let train = util::read_samples_file("train", train)?.survival_data()?;
            let censoring = CensoringDistributionEstimator::fit(&train)?;
            censoring.predict_ipcw(&columns.survival_data()?)?
        }
        None => nonparametric::ipc_weights(&columns.event, &columns.time)?,
    };

    let report = WeightsReport {
        times: columns.time,
        weights,
    };
    Output::save_report(&report, *format, output.clone(), write_weights_table)
}

fn write_weights_table(w: &mut dyn Write, report: &WeightsReport) -> io::Result<()> {
    writeln!(w, "  {:>12} {:>12}", "Time", "Weight")?;
    writeln!(w, "  {}", "-".repeat(25))?;
    for (time, weight) in report.times.iter().zip(&report.weights) {
        writeln!(w, "  {time:>12.4} {weight:>12.6}")?;
    }
    Ok(())
}
