use crate::metrics::SystemSnapshot;
use serde::{Deserialize, Serialize};

pub const HYPOXIA_SPO2: f64 = 94.0;
pub const HIGH_POLLUTION_PM25: f64 = 35.0;
pub const FREEZING_TEMPERATURE: f64 = -10.0;
pub const ELEVATED_PM25: f64 = 25.0;
pub const ELEVATED_HEART_RATE: f64 = 110.0;
pub const LOW_SPO2: f64 = 95.0;

/// Alert states derived from a single snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertFlags {
    pub hypoxic: bool,
    pub high_pollution: bool,
    pub freezing: bool,
    pub pm25_elevated: bool,
    pub heart_rate_elevated: bool,
    pub spo2_low: bool,
}

impl AlertFlags {
    pub fn from_snapshot(s: &SystemSnapshot) -> Self {
        Self {
            hypoxic: s.health.spo2 < HYPOXIA_SPO2,
            high_pollution: s.env.pm25 > HIGH_POLLUTION_PM25,
            freezing: s.env.temperature < FREEZING_TEMPERATURE,
            pm25_elevated: s.env.pm25 > ELEVATED_PM25,
            heart_rate_elevated: s.health.heart_rate > ELEVATED_HEART_RATE,
            spo2_low: s.health.spo2 < LOW_SPO2,
        }
    }

    /// Warning banner text. Hypoxia outranks pollution.
    pub fn banner(&self) -> Option<&'static str> {
        if self.hypoxic {
            Some("Low Oxygen Saturation Detected.")
        } else if self.high_pollution {
            Some("High Particulate Matter detected.")
        } else {
            None
        }
    }

    pub fn active(&self) -> Vec<&'static str> {
        [
            (self.hypoxic, "hypoxic"),
            (self.high_pollution, "high_pollution"),
            (self.freezing, "freezing"),
            (self.pm25_elevated, "pm25_elevated"),
            (self.heart_rate_elevated, "heart_rate_elevated"),
            (self.spo2_low, "spo2_low"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect()
    }

    pub fn all_names() -> [&'static str; 6] {
        [
            "hypoxic",
            "high_pollution",
            "freezing",
            "pm25_elevated",
            "heart_rate_elevated",
            "spo2_low",
        ]
    }
}
