mod config;
mod dashboard;
mod telemetry;
#[cfg(test)]
mod tests;

use anyhow::Context;
use clap::Parser;
use config::DashboardArgs;
use dashboard::Dashboard;
use respiguard_advisor::RespiratoryAdvisor;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = DashboardArgs::parse();
    telemetry::init(args.log_json)?;

    let advisor = RespiratoryAdvisor::from_env();
    tracing::info!(
        tick_ms = args.tick_ms,
        history = args.history,
        analyze_every = args.analyze_every,
        seed = ?args.seed,
        "starting respiguard dashboard"
    );

    let dashboard = Dashboard::new(args, advisor).context("building dashboard")?;
    let dashboard = dashboard.run().await?;

    let reading = dashboard.current();
    if !reading.within_bounds() {
        tracing::warn!(violations = ?reading.violations(), "final reading out of declared bounds");
    }
    tracing::info!(
        temperature = format_args!("{:.1}", reading.env.temperature),
        pm25 = format_args!("{:.1}", reading.env.pm25),
        spo2 = format_args!("{:.1}", reading.health.spo2),
        "final reading"
    );

    match dashboard.advisor().latest() {
        Some(last) => {
            tracing::info!(
                risk = %last.result.risk_level,
                source = last.source.label(),
                snapshots = dashboard.history().len(),
                "stopped"
            );
            // final assessment goes to stdout for scripting; logs stay on the subscriber
            println!("{}", serde_json::to_string_pretty(&last.result)?);
        }
        None => tracing::info!(snapshots = dashboard.history().len(), "stopped before any assessment"),
    }
    Ok(())
}
