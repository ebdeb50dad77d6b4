//! Concordance index commands
//!
//! Harrell's estimator uses the samples alone. Uno's estimator corrects for
//! censoring with weights estimated on a separate training set.

use std::{
    io::{self, Write},
    path::PathBuf,
};

use survkit_stats::{
    DEFAULT_TIED_TOL,
    concordance::{concordance_index_censored, concordance_index_ipcw},
};

use crate::{command::Format, schema::report::ConcordanceReport, util, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConcordanceArg {
    /// Path to the samples JSON file; every record needs an `estimate`
    pub samples: PathBuf,
    /// Risk estimates closer than this are treated as tied
    #[arg(long, default_value_t = DEFAULT_TIED_TOL)]
    pub tied_tol: f64,
    /// Output format (json or table)
    #[arg(long, default_value = "json")]
    pub format: Format,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ConcordanceIpcwArg {
    /// Path to the training samples JSON file the censoring distribution is estimated from
    #[arg(long)]
    pub train: PathBuf,
    /// Path to the test samples JSON file; every record needs an `estimate`
    pub test: PathBuf,
    /// Only compare pairs whose earlier time is below this truncation time
    #[arg(long)]
    pub tau: Option<f64>,
    /// Risk estimates closer than this are treated as tied
    #[arg(long, default_value_t = DEFAULT_TIED_TOL)]
    pub tied_tol: f64,
    /// Output format (json or table)
    #[arg(long, default_value = "json")]
    pub format: Format,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run_censored(arg: &ConcordanceArg) -> anyhow::Result<()> {
    let ConcordanceArg {
        samples,
        tied_tol,
        format,
        output,
    } = arg;

    let columns = util::read_samples_file("samples", samples)?;
    let result = concordance_index_censored(
        &columns.event,
        &columns.time,
        columns.require_estimate()?,
        *tied_tol,
    )?;
    log::info!("Harrell's C = {:.4}", result.cindex);

    let report = ConcordanceReport::new("harrell", result);
    Output::save_report(&report, *format, output.clone(), write_concordance_table)
}

pub(crate) fn run_ipcw(arg: &ConcordanceIpcwArg) -> anyhow::Result<()> {
    let ConcordanceIpcwArg {
        train,
        test,
        tau,
        tied_tol,
        format,
        output,
    } = arg;

    let train = util::read_samples_file("train", train)?.survival_data()?;
    let test = util::read_samples_file("test", test)?;
    let result = concordance_index_ipcw(
        &train,
        &test.survival_data()?,
        test.require_estimate()?,
        *tau,
        *tied_tol,
    )?;
    log::info!("Uno's C = {:.4}", result.cindex);

    let report = ConcordanceReport::new("uno-ipcw", result);
    Output::save_report(&report, *format, output.clone(), write_concordance_table)
}

fn write_concordance_table(w: &mut dyn Write, report: &ConcordanceReport) -> io::Result<()> {
    writeln!(w, "Estimator   : {}", report.estimator)?;
    writeln!(w, "C-index     : {:.6}", report.cindex)?;
    writeln!(w, "Concordant  : {}", report.concordant)?;
    writeln!(w, "Discordant  : {}", report.discordant)?;
    writeln!(w, "Tied risk   : {}", report.tied_risk)?;
    writeln!(w, "Tied time   : {}", report.tied_time)?;
    Ok(())
}
