//! Warm command - one foreground sweep

use clap::{Args, ValueEnum};

use crate::Runtime;
use crate::infrastructure::warming::WarmingReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WarmTarget {
    Concepts,
    ConceptSets,
    All,
}

#[derive(Debug, Args)]
pub struct WarmArgs {
    /// Collection to warm
    #[arg(value_enum, default_value_t = WarmTarget::All)]
    pub target: WarmTarget,
}

pub async fn run(args: WarmArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let runtime = Runtime::from_config(config)?;

    if matches!(args.target, WarmTarget::Concepts | WarmTarget::All) {
        let report = runtime.concepts.sweep().await?;
        print_report(runtime.concepts.name(), &report);
    }

    if matches!(args.target, WarmTarget::ConceptSets | WarmTarget::All) {
        let report = runtime.concept_sets.sweep().await?;
        print_report(runtime.concept_sets.name(), &report);
    }

    Ok(())
}

fn print_report(job: &str, report: &WarmingReport) {
    println!(
        "{}: {} pages, {} items, {} cached in {:.2}s",
        job,
        report.pages,
        report.items,
        report.cached,
        report.elapsed.as_secs_f64()
    );
}
