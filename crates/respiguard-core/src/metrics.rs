use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ambient sensor state at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalMetrics {
    /// Celsius.
    pub temperature: f64,
    /// Percent, 0..=100.
    pub humidity: f64,
    /// µg/m³.
    pub pm25: f64,
    /// Centimetres; never decreases within a session.
    pub snow_depth: f64,
    /// ppm carbon monoxide.
    pub co_level: f64,
}

/// Subject vitals at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthMetrics {
    /// Beats per minute.
    pub heart_rate: f64,
    /// Percent saturation, 0..=100.
    pub spo2: f64,
    /// Breaths per minute.
    pub respiratory_rate: f64,
    /// Celsius.
    pub body_temp: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricId {
    Temperature,
    Humidity,
    Pm25,
    SnowDepth,
    CoLevel,
    HeartRate,
    Spo2,
    RespiratoryRate,
    BodyTemp,
}

impl MetricId {
    pub const ALL: [MetricId; 9] = [
        MetricId::Temperature,
        MetricId::Humidity,
        MetricId::Pm25,
        MetricId::SnowDepth,
        MetricId::CoLevel,
        MetricId::HeartRate,
        MetricId::Spo2,
        MetricId::RespiratoryRate,
        MetricId::BodyTemp,
    ];

    /// Stable snake_case label, used for metric labels and log fields.
    pub fn label(self) -> &'static str {
        match self {
            MetricId::Temperature => "temperature",
            MetricId::Humidity => "humidity",
            MetricId::Pm25 => "pm25",
            MetricId::SnowDepth => "snow_depth",
            MetricId::CoLevel => "co_level",
            MetricId::HeartRate => "heart_rate",
            MetricId::Spo2 => "spo2",
            MetricId::RespiratoryRate => "respiratory_rate",
            MetricId::BodyTemp => "body_temp",
        }
    }

    pub fn is_environmental(self) -> bool {
        matches!(
            self,
            MetricId::Temperature
                | MetricId::Humidity
                | MetricId::Pm25
                | MetricId::SnowDepth
                | MetricId::CoLevel
        )
    }

    /// Declared data-model bound for this metric. Open ends use infinities.
    pub fn bound(self) -> MetricBound {
        match self {
            MetricId::Temperature => MetricBound::new(-90.0, 60.0),
            MetricId::Humidity => MetricBound::new(0.0, 100.0),
            MetricId::Pm25 => MetricBound::at_least(0.0),
            MetricId::SnowDepth => MetricBound::at_least(0.0),
            MetricId::CoLevel => MetricBound::at_least(0.0),
            MetricId::HeartRate => MetricBound::new(30.0, 220.0),
            MetricId::Spo2 => MetricBound::new(0.0, 100.0),
            MetricId::RespiratoryRate => MetricBound::at_least(0.0),
            MetricId::BodyTemp => MetricBound::new(25.0, 45.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBound {
    pub lower: f64,
    pub upper: f64,
}

impl MetricBound {
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub const fn at_least(lower: f64) -> Self {
        Self {
            lower,
            upper: f64::INFINITY,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Saturating clamp; NaN collapses to the lower bound.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.lower;
        }
        value.max(self.lower).min(self.upper)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundViolation {
    pub metric: MetricId,
    pub value: f64,
    pub bound: MetricBound,
}

/// One immutable reading of environment and vitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub timestamp: DateTime<Utc>,
    pub env: EnvironmentalMetrics,
    pub health: HealthMetrics,
}

impl SystemSnapshot {
    pub fn new(timestamp: DateTime<Utc>, env: EnvironmentalMetrics, health: HealthMetrics) -> Self {
        Self {
            timestamp,
            env,
            health,
        }
    }

    /// Session-start reading: light frost, fresh snow cover, resting vitals.
    pub fn baseline(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            env: EnvironmentalMetrics {
                temperature: -2.5,
                humidity: 78.0,
                pm25: 12.0,
                snow_depth: 15.0,
                co_level: 0.5,
            },
            health: HealthMetrics {
                heart_rate: 75.0,
                spo2: 98.0,
                respiratory_rate: 16.0,
                body_temp: 36.8,
            },
        }
    }

    pub fn get(&self, metric: MetricId) -> f64 {
        match metric {
            MetricId::Temperature => self.env.temperature,
            MetricId::Humidity => self.env.humidity,
            MetricId::Pm25 => self.env.pm25,
            MetricId::SnowDepth => self.env.snow_depth,
            MetricId::CoLevel => self.env.co_level,
            MetricId::HeartRate => self.health.heart_rate,
            MetricId::Spo2 => self.health.spo2,
            MetricId::RespiratoryRate => self.health.respiratory_rate,
            MetricId::BodyTemp => self.health.body_temp,
        }
    }

    pub fn violations(&self) -> Vec<BoundViolation> {
        MetricId::ALL
            .iter()
            .filter_map(|&metric| {
                let value = self.get(metric);
                let bound = metric.bound();
                (!bound.contains(value)).then_some(BoundViolation {
                    metric,
                    value,
                    bound,
                })
            })
            .collect()
    }

    pub fn within_bounds(&self) -> bool {
        self.violations().is_empty()
    }
}
