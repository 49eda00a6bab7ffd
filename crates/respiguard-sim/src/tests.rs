use crate::{advance, DriftEnvelope, FixedSource, RandSource, SequenceSource, Simulator, UniformSource};
use chrono::{Duration, TimeZone, Utc};
use respiguard_core::SystemSnapshot;

fn start() -> SystemSnapshot {
    SystemSnapshot::baseline(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
}

#[test]
fn temperature_saturates_at_upper_clamp_under_max_draws() {
    let envelope = DriftEnvelope::default_for_winter();
    let mut source = FixedSource(1.0);
    let mut current = start();
    current.env.temperature = 4.5;

    let mut previous_temp = current.env.temperature;
    for i in 0..20 {
        let now = current.timestamp + Duration::seconds(2);
        current = advance(&envelope, &current, now, &mut source);
        assert!(current.env.temperature <= 5.0);
        if previous_temp < 5.0 {
            assert!(current.env.temperature > previous_temp, "step {i} did not rise");
        } else {
            assert_eq!(current.env.temperature, 5.0);
        }
        previous_temp = current.env.temperature;
    }
    assert_eq!(current.env.temperature, 5.0);
}

#[test]
fn starting_at_upper_clamp_stays_there() {
    let envelope = DriftEnvelope::default_for_winter();
    let mut current = start();
    current.env.temperature = 5.0;
    for _ in 0..5 {
        current = advance(&envelope, &current, current.timestamp, &mut FixedSource(1.0));
        assert_eq!(current.env.temperature, 5.0);
    }
}

#[test]
fn zero_draws_saturate_lower_clamps() {
    let envelope = DriftEnvelope::default_for_winter();
    let mut current = start();
    for _ in 0..2_000 {
        current = advance(&envelope, &current, current.timestamp, &mut FixedSource(0.0));
    }
    assert_eq!(current.env.temperature, -15.0);
    assert_eq!(current.env.pm25, 0.0);
    assert_eq!(current.env.humidity, 40.0);
    assert_eq!(current.health.heart_rate, 60.0);
    assert_eq!(current.health.spo2, 90.0);
    assert_eq!(current.health.respiratory_rate, 12.0);
    assert_eq!(current.env.snow_depth, 15.0);
}

#[test]
fn draws_are_consumed_in_field_order() {
    // temperature, pm25, snow, humidity, heart rate, spo2, respiratory rate
    let mut source = SequenceSource::new(vec![1.0, 0.0, 0.9, 0.5, 1.0, 0.4, 0.0]);
    let envelope = DriftEnvelope::default_for_winter();
    let base = start();
    let next = advance(&envelope, &base, base.timestamp, &mut source);

    assert!((next.env.temperature - (-2.4)).abs() < 1e-9);
    assert!((next.env.pm25 - 11.0).abs() < 1e-9);
    assert!((next.env.snow_depth - 15.1).abs() < 1e-9);
    assert_eq!(next.env.humidity, 78.0);
    assert!((next.health.heart_rate - 77.0).abs() < 1e-9);
    assert_eq!(next.health.spo2, 98.0);
    assert!((next.health.respiratory_rate - 15.5).abs() < 1e-9);
}

#[test]
fn stress_amplifies_heart_rate_drift() {
    let envelope = DriftEnvelope::default_for_winter();
    let mut calm = start();
    calm.env.temperature = 0.0;
    let mut stressed = calm.clone();
    stressed.env.pm25 = 50.0;

    let calm_next = advance(&envelope, &calm, calm.timestamp, &mut FixedSource(1.0));
    let stressed_next = advance(&envelope, &stressed, stressed.timestamp, &mut FixedSource(1.0));

    assert!((calm_next.health.heart_rate - 77.0).abs() < 1e-9);
    assert!((stressed_next.health.heart_rate - 77.1).abs() < 1e-9);
}

#[test]
fn body_temperature_and_co_carry_forward() {
    let envelope = DriftEnvelope::default_for_winter();
    let base = start();
    let mut source = RandSource::seeded(11);
    let next = advance(&envelope, &base, base.timestamp, &mut source);
    assert_eq!(next.health.body_temp, base.health.body_temp);
    assert_eq!(next.env.co_level, base.env.co_level);
}

#[test]
fn long_random_walk_holds_bounds_and_accumulates_snow() {
    let mut sim = Simulator::seeded(42);
    let envelope = *sim.envelope();
    let mut current = start();
    for i in 0..5_000 {
        let now = current.timestamp + Duration::seconds(2);
        let next = sim.step(&current, now);
        assert!(next.env.snow_depth >= current.env.snow_depth, "snow fell at step {i}");
        assert!(next.timestamp >= current.timestamp);
        assert!(next.env.temperature >= envelope.temperature.min);
        assert!(next.env.temperature <= envelope.temperature.max);
        assert!((40.0..=100.0).contains(&next.env.humidity));
        assert!(next.env.pm25 >= 0.0);
        assert!((60.0..=130.0).contains(&next.health.heart_rate));
        assert!((90.0..=100.0).contains(&next.health.spo2));
        assert!((12.0..=30.0).contains(&next.health.respiratory_rate));
        assert!(next.within_bounds());
        current = next;
    }
    assert_eq!(sim.steps(), 5_000);
    assert!(current.env.snow_depth > 15.0);
}

#[test]
fn seeded_simulators_are_reproducible() {
    let mut a = Simulator::seeded(7);
    let mut b = Simulator::seeded(7);
    let mut sa = start();
    let mut sb = start();
    for _ in 0..100 {
        sa = a.step(&sa, sa.timestamp);
        sb = b.step(&sb, sb.timestamp);
    }
    assert_eq!(sa, sb);
}

#[test]
fn timestamp_never_moves_backwards() {
    let envelope = DriftEnvelope::default_for_winter();
    let base = start();
    let earlier = base.timestamp - Duration::seconds(30);
    let next = advance(&envelope, &base, earlier, &mut FixedSource(0.5));
    assert_eq!(next.timestamp, base.timestamp);
}

#[test]
fn previous_snapshot_is_untouched() {
    let envelope = DriftEnvelope::default_for_winter();
    let base = start();
    let copy = base.clone();
    let _ = advance(&envelope, &base, base.timestamp, &mut FixedSource(1.0));
    assert_eq!(base, copy);
}

#[test]
fn empty_sequence_is_zero_drift() {
    let mut source = SequenceSource::new(Vec::new());
    assert_eq!(source.next_unit(), 0.5);
}

#[test]
fn walk_clamps_through_declared_bound() {
    let envelope = DriftEnvelope::default_for_winter();
    let spo2 = envelope.spo2;
    assert_eq!(spo2.bound().lower, 90.0);
    assert_eq!(spo2.walk(f64::NAN, 0.9, 1.0), 90.0);
    assert_eq!(spo2.walk(99.9, 1.0, 1.0), 100.0);
    assert_eq!(envelope.pm25.walk(0.5, 0.0, 1.0), 0.0);
}

#[test]
fn spo2_walk_leans_upward() {
    let spo2 = DriftEnvelope::default_for_winter().spo2;
    let mut source = RandSource::seeded(11);
    let (mut up, mut down) = (0u32, 0u32);
    for _ in 0..10_000 {
        let next = spo2.walk(95.0, source.next_unit(), 1.0);
        if next > 95.0 {
            up += 1;
        } else if next < 95.0 {
            down += 1;
        }
    }
    assert!(up > 5_500, "up={up} down={down}");
    assert!(down > 3_500, "up={up} down={down}");
}
