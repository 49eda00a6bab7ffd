use crate::envelope::DriftEnvelope;
use crate::source::{RandSource, UniformSource};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use respiguard_core::{EnvironmentalMetrics, HealthMetrics, SystemSnapshot};

/// Derives the next snapshot from `previous`, one fresh draw per walked
/// field in the order temperature, pm25, snow, humidity, heart rate, SpO2,
/// respiratory rate. Body temperature and CO carry forward unchanged.
pub fn advance<S: UniformSource + ?Sized>(
    envelope: &DriftEnvelope,
    previous: &SystemSnapshot,
    now: DateTime<Utc>,
    source: &mut S,
) -> SystemSnapshot {
    let env = &previous.env;
    let health = &previous.health;

    let temperature = envelope.temperature.walk(env.temperature, source.next_unit(), 1.0);
    let pm25 = envelope.pm25.walk(env.pm25, source.next_unit(), 1.0);
    let snow_gain = if source.next_unit() > envelope.snow_event_above {
        envelope.snow_increment
    } else {
        0.0
    };
    let snow_depth = (env.snow_depth + snow_gain).max(0.0);
    let humidity = envelope.humidity.walk(env.humidity, source.next_unit(), 1.0);

    let stress = envelope.stress.factor_for(pm25, temperature);
    let heart_rate = envelope
        .heart_rate
        .walk(health.heart_rate, source.next_unit(), stress);
    let spo2 = envelope.spo2.walk(health.spo2, source.next_unit(), 1.0);
    let respiratory_rate = envelope
        .respiratory_rate
        .walk(health.respiratory_rate, source.next_unit(), 1.0);

    SystemSnapshot {
        timestamp: now.max(previous.timestamp),
        env: EnvironmentalMetrics {
            temperature,
            humidity,
            pm25,
            snow_depth,
            co_level: env.co_level,
        },
        health: HealthMetrics {
            heart_rate,
            spo2,
            respiratory_rate,
            body_temp: health.body_temp,
        },
    }
}

/// Envelope plus owned randomness, stepped by an external cadence.
#[derive(Debug, Clone)]
pub struct Simulator<S = RandSource<StdRng>> {
    envelope: DriftEnvelope,
    source: S,
    steps: u64,
}

impl Simulator<RandSource<StdRng>> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(DriftEnvelope::default_for_winter(), RandSource::seeded(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(DriftEnvelope::default_for_winter(), RandSource::from_entropy())
    }
}

impl<S: UniformSource> Simulator<S> {
    pub fn new(envelope: DriftEnvelope, source: S) -> Self {
        Self {
            envelope,
            source,
            steps: 0,
        }
    }

    pub fn envelope(&self) -> &DriftEnvelope {
        &self.envelope
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn step(&mut self, previous: &SystemSnapshot, now: DateTime<Utc>) -> SystemSnapshot {
        let next = advance(&self.envelope, previous, now, &mut self.source);
        self.steps += 1;
        tracing::debug!(
            step = self.steps,
            temperature = next.env.temperature,
            pm25 = next.env.pm25,
            heart_rate = next.health.heart_rate,
            spo2 = next.health.spo2,
            "advanced snapshot"
        );
        next
    }
}
