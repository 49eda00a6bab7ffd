use crate::config::DashboardArgs;
use crate::dashboard::Dashboard;
use chrono::Utc;
use clap::Parser;
use respiguard_advisor::{AssessmentSource, RespiratoryAdvisor, RuleEngine};

fn args(extra: &[&str]) -> DashboardArgs {
    let mut argv = vec!["respiguard-dashboard", "--seed", "7", "--tick-ms", "1"];
    argv.extend_from_slice(extra);
    DashboardArgs::try_parse_from(argv).unwrap()
}

fn local_dashboard(extra: &[&str]) -> Dashboard<RuleEngine> {
    Dashboard::new(args(extra), RespiratoryAdvisor::local_only()).unwrap()
}

#[test]
fn zero_history_is_rejected() {
    let advisor: RespiratoryAdvisor<RuleEngine> = RespiratoryAdvisor::local_only();
    assert!(Dashboard::new(args(&["--history", "0"]), advisor).is_err());
}

#[test]
fn history_keeps_only_the_newest_snapshots() {
    let mut dash = local_dashboard(&["--history", "4"]);
    let mut last = None;
    for _ in 0..9 {
        last = Some(dash.tick(Utc::now()).clone());
    }
    assert_eq!(dash.history().len(), 4);
    assert_eq!(dash.history().latest(), last.as_ref());
    assert_eq!(dash.current(), last.as_ref().unwrap());
}

#[test]
fn ticks_stay_within_declared_bounds() {
    let mut dash = local_dashboard(&[]);
    for _ in 0..500 {
        let snapshot = dash.tick(Utc::now());
        assert!(snapshot.within_bounds(), "{:?}", snapshot.violations());
    }
}

#[tokio::test]
async fn bounded_run_assesses_on_cadence() {
    let dash = local_dashboard(&["--ticks", "12", "--history", "10", "--analyze-every", "5"]);
    let dash = dash.run().await.unwrap();

    assert_eq!(dash.history().len(), 10);
    let last = dash.advisor().latest().expect("two assessments were scheduled");
    assert_eq!(last.source, AssessmentSource::Local);
    assert!(!last.result.recommendations.is_empty());
}

#[tokio::test]
async fn disabled_cadence_never_assesses() {
    let dash = local_dashboard(&["--ticks", "6", "--analyze-every", "0"]);
    let dash = dash.run().await.unwrap();
    assert!(dash.advisor().latest().is_none());
}

#[tokio::test]
async fn metrics_file_is_rewritten() {
    let path = std::env::temp_dir().join(format!("respiguard-test-{}.prom", std::process::id()));
    let path_arg = path.to_string_lossy().into_owned();
    let dash = local_dashboard(&["--ticks", "3", "--metrics-file", &path_arg]);
    dash.run().await.unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("respiguard_env_metric"));
    assert!(text.contains("respiguard_alerts_active"));
    let _ = std::fs::remove_file(&path);
}
