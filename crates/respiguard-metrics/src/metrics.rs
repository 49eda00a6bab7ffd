use prometheus::{Encoder, Gauge, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};
use respiguard_advisor::{AssessmentSource, RuleEngine, StampedAssessment};
use respiguard_core::{AlertFlags, MetricId, SystemSnapshot};

pub struct DashboardMetrics {
    registry: Registry,
    pub env_metric: GaugeVec,
    pub health_metric: GaugeVec,
    pub risk_level: Gauge,
    pub risk_score: Gauge,
    pub assessments_total: IntCounterVec,
    pub alerts_active: GaugeVec,
}

impl DashboardMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("respiguard".into()), None)?;

        let env_metric = GaugeVec::new(
            Opts::new("env_metric", "Latest environmental reading"),
            &["metric"],
        )?;
        let health_metric = GaugeVec::new(
            Opts::new("health_metric", "Latest vital-sign reading"),
            &["metric"],
        )?;
        let risk_level = Gauge::new("risk_level", "Last assessed risk level, 0=Low .. 3=Critical")?;
        let risk_score = Gauge::new("risk_score", "Rule-engine score of the latest snapshot")?;
        let assessments_total = IntCounterVec::new(
            Opts::new("assessments_total", "Completed assessments by producing strategy"),
            &["source"],
        )?;
        let alerts_active = GaugeVec::new(
            Opts::new("alerts_active", "Derived alert flags, 1 when raised"),
            &["alert"],
        )?;

        registry.register(Box::new(env_metric.clone()))?;
        registry.register(Box::new(health_metric.clone()))?;
        registry.register(Box::new(risk_level.clone()))?;
        registry.register(Box::new(risk_score.clone()))?;
        registry.register(Box::new(assessments_total.clone()))?;
        registry.register(Box::new(alerts_active.clone()))?;

        for source in [AssessmentSource::Remote, AssessmentSource::Local] {
            assessments_total.with_label_values(&[source.label()]);
        }

        Ok(Self {
            registry,
            env_metric,
            health_metric,
            risk_level,
            risk_score,
            assessments_total,
            alerts_active,
        })
    }

    pub fn observe_snapshot(&self, snapshot: &SystemSnapshot, rules: &RuleEngine) {
        for metric in MetricId::ALL {
            let vec = if metric.is_environmental() {
                &self.env_metric
            } else {
                &self.health_metric
            };
            vec.with_label_values(&[metric.label()])
                .set(snapshot.get(metric));
        }
        self.risk_score.set(rules.evaluate(snapshot).score);

        let flags = AlertFlags::from_snapshot(snapshot);
        let active = flags.active();
        for name in AlertFlags::all_names() {
            let raised = if active.contains(&name) { 1.0 } else { 0.0 };
            self.alerts_active.with_label_values(&[name]).set(raised);
        }
    }

    pub fn observe_assessment(&self, assessment: &StampedAssessment) {
        self.risk_level
            .set(f64::from(assessment.result.risk_level.rank()));
        self.assessments_total
            .with_label_values(&[assessment.source.label()])
            .inc();
    }

    /// Prometheus text exposition of everything registered here.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
