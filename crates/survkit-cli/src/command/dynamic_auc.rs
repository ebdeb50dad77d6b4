use std::{
    io::{self, Write},
    path::PathBuf,
};

use survkit_stats::{DEFAULT_TIED_TOL, auc::cumulative_dynamic_auc};

use crate::{command::Format, schema::report::DynamicAucReport, util, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DynamicAucArg {
    /// Path to the training samples JSON file the censoring distribution is estimated from
    #[arg(long)]
    pub train: PathBuf,
    /// Path to the test samples JSON file; every record needs an `estimate`
    pub test: PathBuf,
    /// Evaluation times (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    pub times: Vec<f64>,
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

pub(crate) fn run(arg: &DynamicAucArg) -> anyhow::Result<()> {
    let DynamicAucArg {
        train,
        test,
        times,
        tied_tol,
        format,
        output,
    } = arg;

    let train = util::read_samples_file("train", train)?.survival_data()?;
    let test = util::read_samples_file("test", test)?;
    let result = cumulative_dynamic_auc(
        &train,
        &test.survival_data()?,
        test.require_estimate()?,
        times,
        *tied_tol,
    )?;
    log::info!(
        "Mean AUC = {:.4} over {} time points",
        result.mean_auc,
        result.times.len()
    );

    let report = DynamicAucReport::from(result);
    Output::save_report(&report, *format, output.clone(), write_auc_table)
}

fn write_auc_table(w: &mut dyn Write, report: &DynamicAucReport) -> io::Result<()> {
    writeln!(w, "  {:>12} {:>10}", "Time", "AUC")?;
    writeln!(w, "  {}", "-".repeat(23))?;
    for (time, auc) in report.times.iter().zip(&report.auc) {
        writeln!(w, "  {time:>12.4} {auc:>10.4}")?;
    }
    writeln!(w)?;
    writeln!(w, "Mean AUC: {:.4}", report.mean_auc)?;
    Ok(())
}
