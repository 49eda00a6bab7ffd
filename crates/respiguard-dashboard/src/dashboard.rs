use crate::config::DashboardArgs;
use anyhow::Context;
use chrono::{DateTime, Utc};
use respiguard_advisor::{GeminiAssessor, RespiratoryAdvisor, RiskAssessor};
use respiguard_core::{
    AlertFlags, MetricId, SnapshotHistory, SystemSnapshot, Trend, DEFAULT_CHART_WINDOW,
};
use respiguard_metrics::DashboardMetrics;
use respiguard_sim::Simulator;
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;

pub struct Dashboard<R = GeminiAssessor> {
    args: DashboardArgs,
    simulator: Simulator,
    history: SnapshotHistory,
    current: SystemSnapshot,
    advisor: RespiratoryAdvisor<R>,
    metrics: Arc<DashboardMetrics>,
    banner: Option<&'static str>,
    ticks: u64,
}

impl<R: RiskAssessor + 'static> Dashboard<R> {
    pub fn new(args: DashboardArgs, advisor: RespiratoryAdvisor<R>) -> anyhow::Result<Self> {
        let history = SnapshotHistory::with_capacity(args.history)
            .context("invalid --history")?;
        let simulator = match args.seed {
            Some(seed) => Simulator::seeded(seed),
            None => Simulator::from_entropy(),
        };
        let metrics = DashboardMetrics::new().context("registering dashboard metrics")?;
        Ok(Self {
            args,
            simulator,
            history,
            current: SystemSnapshot::baseline(Utc::now()),
            advisor,
            metrics: Arc::new(metrics),
            banner: None,
            ticks: 0,
        })
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn advisor(&self) -> &RespiratoryAdvisor<R> {
        &self.advisor
    }

    pub fn current(&self) -> &SystemSnapshot {
        &self.current
    }

    /// Advances the simulation one step and records the new snapshot.
    pub fn tick(&mut self, now: DateTime<Utc>) -> &SystemSnapshot {
        let next = self.simulator.step(&self.current, now);
        self.history.push(next.clone());
        self.current = next;
        self.ticks += 1;

        self.metrics
            .observe_snapshot(&self.current, self.advisor.rules());
        self.report_tick();
        &self.current
    }

    fn heart_rate_trend(&self) -> Trend {
        self.history
            .trend(MetricId::HeartRate, DEFAULT_CHART_WINDOW)
            .unwrap_or(Trend::Stable)
    }

    fn report_tick(&mut self) {
        let s = &self.current;
        tracing::info!(
            tick = self.ticks,
            temperature = format_args!("{:.1}", s.env.temperature),
            humidity = format_args!("{:.0}", s.env.humidity),
            pm25 = format_args!("{:.1}", s.env.pm25),
            snow_depth = format_args!("{:.1}", s.env.snow_depth),
            heart_rate = format_args!("{:.0}", s.health.heart_rate),
            spo2 = format_args!("{:.1}", s.health.spo2),
            respiratory_rate = format_args!("{:.0}", s.health.respiratory_rate),
            hr_trend = ?self.heart_rate_trend(),
            "sensors"
        );

        let flags = AlertFlags::from_snapshot(s);
        let banner = flags.banner();
        if banner != self.banner {
            match banner {
                Some(text) => tracing::warn!(alerts = ?flags.active(), "Warning: {text} Seek shelter."),
                None => tracing::info!("alert cleared"),
            }
            self.banner = banner;
        }
    }

    fn spawn_assessment(&self, tasks: &mut JoinSet<()>) {
        let advisor = self.advisor.clone();
        let metrics = Arc::clone(&self.metrics);
        let snapshot = self.current.clone();
        tasks.spawn(async move {
            let stamped = advisor.assess(&snapshot).await;
            metrics.observe_assessment(&stamped);
            tracing::info!(
                risk = %stamped.result.risk_level,
                context = %stamped.result.weather_context,
                source = stamped.source.label(),
                summary = %stamped.result.summary,
                "assessment"
            );
            for (i, rec) in stamped.result.recommendations.iter().enumerate() {
                tracing::info!(n = i + 1, "recommendation: {rec}");
            }
        });
    }

    fn export_metrics(&self, path: &Path) -> anyhow::Result<()> {
        let text = self.metrics.render()?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }

    /// Drives the fixed cadence until `--ticks` is reached or Ctrl-C.
    pub async fn run(mut self) -> anyhow::Result<Self> {
        let mut interval = tokio::time::interval(self.args.tick());
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut tasks = JoinSet::new();
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            if self.args.ticks.is_some_and(|limit| self.ticks >= limit) {
                break;
            }
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut shutdown => {
                    tracing::info!("interrupt received, stopping");
                    break;
                }
            }

            self.tick(Utc::now());
            if self.args.should_analyze(self.ticks) {
                self.spawn_assessment(&mut tasks);
            }
            if let Some(path) = self.args.metrics_file.clone() {
                if let Err(err) = self.export_metrics(&path) {
                    tracing::warn!(error = %err, "metrics export failed");
                }
            }
            while let Some(done) = tasks.try_join_next() {
                if let Err(err) = done {
                    tracing::warn!(error = %err, "assessment task aborted");
                }
            }
        }

        while let Some(done) = tasks.join_next().await {
            if let Err(err) = done {
                tracing::warn!(error = %err, "assessment task aborted");
            }
        }
        Ok(self)
    }
}
