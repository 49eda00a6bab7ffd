use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Headless snow-conditions respiratory dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "respiguard-dashboard", version)]
pub struct DashboardArgs {
    /// Simulation cadence in milliseconds.
    #[arg(long, env = "RESPIGUARD_TICK_MS", default_value_t = 2000, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Number of snapshots retained for trends.
    #[arg(long, env = "RESPIGUARD_HISTORY", default_value_t = 50)]
    pub history: usize,

    /// Run a risk assessment every N ticks; 0 disables periodic assessment.
    #[arg(long, env = "RESPIGUARD_ANALYZE_EVERY", default_value_t = 5)]
    pub analyze_every: u64,

    /// Stop after this many ticks. Runs until interrupted when unset.
    #[arg(long, env = "RESPIGUARD_TICKS")]
    pub ticks: Option<u64>,

    /// Seed for reproducible runs.
    #[arg(long, env = "RESPIGUARD_SEED")]
    pub seed: Option<u64>,

    /// Rewrite Prometheus text metrics to this file on every tick.
    #[arg(long, env = "RESPIGUARD_METRICS_FILE")]
    pub metrics_file: Option<PathBuf>,

    /// Emit JSON log lines.
    #[arg(long, env = "RESPIGUARD_LOG_JSON")]
    pub log_json: bool,
}

impl DashboardArgs {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn should_analyze(&self, tick: u64) -> bool {
        self.analyze_every > 0 && tick % self.analyze_every == 0
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardArgs;
    use clap::Parser;

    #[test]
    fn defaults_match_reference_cadence() {
        let args = DashboardArgs::try_parse_from(["respiguard-dashboard"]).unwrap();
        assert_eq!(args.tick_ms, 2000);
        assert_eq!(args.history, 50);
        assert!(args.should_analyze(5));
        assert!(!args.should_analyze(4));
    }

    #[test]
    fn zero_cadence_is_rejected() {
        assert!(DashboardArgs::try_parse_from(["respiguard-dashboard", "--tick-ms", "0"]).is_err());
    }

    #[test]
    fn zero_analyze_every_disables_assessment() {
        let args =
            DashboardArgs::try_parse_from(["respiguard-dashboard", "--analyze-every", "0"]).unwrap();
        assert!(!args.should_analyze(0));
        assert!(!args.should_analyze(10));
    }
}
