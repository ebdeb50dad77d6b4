use clap::{Parser, Subcommand};

use self::{
    concordance::{ConcordanceArg, ConcordanceIpcwArg},
    curve::{KaplanMeierArg, NelsonAalenArg},
    dynamic_auc::DynamicAucArg,
    weights::CensoringWeightsArg,
};

mod concordance;
mod curve;
mod dynamic_auc;
mod weights;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to estimate
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Estimate the survival function with the Kaplan-Meier estimator
    KaplanMeier(#[clap(flatten)] KaplanMeierArg),
    /// Estimate the cumulative hazard with the Nelson-Aalen estimator
    NelsonAalen(#[clap(flatten)] NelsonAalenArg),
    /// Compute inverse probability of censoring weights
    CensoringWeights(#[clap(flatten)] CensoringWeightsArg),
    /// Harrell's concordance index of risk estimates
    Concordance(#[clap(flatten)] ConcordanceArg),
    /// Uno's IPCW concordance index of risk estimates
    ConcordanceIpcw(#[clap(flatten)] ConcordanceIpcwArg),
    /// Cumulative/dynamic AUC of risk estimates at given times
    DynamicAuc(#[clap(flatten)] DynamicAucArg),
}

/// Output format of a report
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum Format {
    #[default]
    Json,
    Table,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::KaplanMeier(arg) => curve::run_kaplan_meier(&arg)?,
        Mode::NelsonAalen(arg) => curve::run_nelson_aalen(&arg)?,
        Mode::CensoringWeights(arg) => weights::run(&arg)?,
        Mode::Concordance(arg) => concordance::run_censored(&arg)?,
        Mode::ConcordanceIpcw(arg) => concordance::run_ipcw(&arg)?,
        Mode::DynamicAuc(arg) => dynamic_auc::run(&arg)?,
    }
    Ok(())
}
