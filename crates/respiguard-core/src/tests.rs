use crate::{
    AlertFlags, AssessmentResult, CoreError, MetricBound, MetricId, RiskLevel, SnapshotHistory, SystemSnapshot,
    Trend,
};
use chrono::{Duration, TimeZone, Utc};

fn snapshot_at(secs: i64) -> SystemSnapshot {
    SystemSnapshot::baseline(Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap())
}

#[test]
fn risk_levels_are_totally_ordered() {
    assert!(RiskLevel::Low < RiskLevel::Moderate);
    assert!(RiskLevel::Moderate < RiskLevel::High);
    assert!(RiskLevel::High < RiskLevel::Critical);
    assert_eq!(RiskLevel::ALL.iter().max(), Some(&RiskLevel::Critical));
    assert!(RiskLevel::High.is_elevated());
    assert!(!RiskLevel::Moderate.is_elevated());
}

#[test]
fn lenient_parse_ignores_case_and_defaults_low() {
    assert_eq!(RiskLevel::parse_lenient("critical"), RiskLevel::Critical);
    assert_eq!(RiskLevel::parse_lenient(" HIGH "), RiskLevel::High);
    assert_eq!(RiskLevel::parse_lenient("Moderate"), RiskLevel::Moderate);
    assert_eq!(RiskLevel::parse_lenient("severe"), RiskLevel::Low);
    assert_eq!(RiskLevel::parse_lenient(""), RiskLevel::Low);
}

#[test]
fn assessment_uses_camel_case_wire_names() {
    let result = AssessmentResult::new(
        RiskLevel::Moderate,
        "Cold air.",
        vec!["Cover your mouth.".into()],
        "Severe Cold Snap",
    );
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["riskLevel"], "Moderate");
    assert_eq!(value["weatherContext"], "Severe Cold Snap");
    assert_eq!(value["recommendations"][0], "Cover your mouth.");
}

#[test]
fn baseline_is_within_bounds() {
    let s = snapshot_at(0);
    assert!(s.within_bounds());
    assert_eq!(s.get(MetricId::SnowDepth), 15.0);
}

#[test]
fn out_of_range_values_are_reported() {
    let mut s = snapshot_at(0);
    s.env.humidity = 104.0;
    s.env.pm25 = -1.0;
    let violations = s.violations();
    let metrics: Vec<_> = violations.iter().map(|v| v.metric).collect();
    assert_eq!(metrics, vec![MetricId::Humidity, MetricId::Pm25]);
}

#[test]
fn bound_clamp_saturates_and_absorbs_nan() {
    let spo2 = MetricBound::new(90.0, 100.0);
    assert_eq!(spo2.clamp(101.3), 100.0);
    assert_eq!(spo2.clamp(87.0), 90.0);
    assert_eq!(spo2.clamp(95.5), 95.5);
    assert_eq!(spo2.clamp(f64::NAN), 90.0);

    let pm25 = MetricBound::at_least(0.0);
    assert_eq!(pm25.clamp(1.0e9), 1.0e9);
    assert_eq!(pm25.clamp(-3.0), 0.0);
}

#[test]
fn history_rejects_zero_capacity() {
    assert_eq!(
        SnapshotHistory::with_capacity(0).unwrap_err(),
        CoreError::ZeroCapacity
    );
}

#[test]
fn history_evicts_oldest_when_full() {
    let mut history = SnapshotHistory::with_capacity(3).unwrap();
    for i in 0..3 {
        assert!(history.push(snapshot_at(i)).is_none());
    }
    let evicted = history.push(snapshot_at(3)).unwrap();
    assert_eq!(evicted.timestamp, snapshot_at(0).timestamp);
    assert_eq!(history.len(), 3);
    assert_eq!(history.latest().unwrap().timestamp, snapshot_at(3).timestamp);
    let first = history.iter().next().unwrap();
    assert_eq!(first.timestamp, snapshot_at(1).timestamp);
}

#[test]
fn default_history_holds_fifty() {
    let mut history = SnapshotHistory::default();
    for i in 0..75 {
        history.push(snapshot_at(i));
    }
    assert_eq!(history.len(), 50);
    assert_eq!(history.capacity(), 50);
}

#[test]
fn trend_window_returns_most_recent_rows_in_order() {
    let mut history = SnapshotHistory::default();
    for i in 0..30 {
        let mut s = snapshot_at(i);
        s.health.heart_rate = 70.0 + i as f64;
        history.push(s);
    }
    let rows = history.trend_window(20);
    assert_eq!(rows.len(), 20);
    assert_eq!(rows[0].heart_rate, 80.0);
    assert_eq!(rows[19].heart_rate, 99.0);
    assert!(rows[0].timestamp < rows[19].timestamp);
}

#[test]
fn trend_detects_direction_with_tolerance() {
    let mut history = SnapshotHistory::default();
    let start = snapshot_at(0);
    for i in 0..10 {
        let mut s = start.clone();
        s.timestamp = start.timestamp + Duration::seconds(i);
        s.health.spo2 = 98.0 - 0.1 * i as f64;
        s.env.temperature = -2.5 + 0.001 * i as f64;
        history.push(s);
    }
    assert_eq!(history.trend(MetricId::Spo2, 10).unwrap(), Trend::Falling);
    assert_eq!(history.trend(MetricId::Temperature, 10).unwrap(), Trend::Stable);
    assert_eq!(
        history.trend(MetricId::Spo2, 1).unwrap_err(),
        CoreError::WindowTooSmall(1)
    );
}

#[test]
fn alert_flags_follow_dashboard_thresholds() {
    let mut s = snapshot_at(0);
    assert_eq!(AlertFlags::from_snapshot(&s), AlertFlags::default());
    assert!(AlertFlags::from_snapshot(&s).banner().is_none());

    s.env.pm25 = 40.0;
    s.env.temperature = -11.0;
    let flags = AlertFlags::from_snapshot(&s);
    assert!(flags.high_pollution && flags.pm25_elevated && flags.freezing);
    assert_eq!(flags.banner(), Some("High Particulate Matter detected."));

    s.health.spo2 = 93.5;
    let flags = AlertFlags::from_snapshot(&s);
    assert!(flags.hypoxic && flags.spo2_low);
    assert_eq!(flags.banner(), Some("Low Oxygen Saturation Detected."));
    assert_eq!(
        flags.active(),
        vec!["hypoxic", "high_pollution", "freezing", "pm25_elevated", "spo2_low"]
    );
}
