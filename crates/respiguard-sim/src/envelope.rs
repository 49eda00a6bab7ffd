use respiguard_core::MetricBound;
use serde::{Deserialize, Serialize};

/// Clamp range and per-tick step for one walked metric.
///
/// A draw `u` moves the value by `(u - center) * step`, then clamps into
/// `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub center: f64,
}

impl WalkRange {
    pub const fn symmetric(min: f64, max: f64, step: f64) -> Self {
        Self {
            min,
            max,
            step,
            center: 0.5,
        }
    }

    pub fn bound(&self) -> MetricBound {
        MetricBound::new(self.min, self.max)
    }

    pub fn walk(&self, value: f64, u: f64, gain: f64) -> f64 {
        self.bound()
            .clamp(value + (u - self.center) * self.step * gain)
    }
}

/// Adverse-environment coupling into heart-rate drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressCoupling {
    pub pm25_above: f64,
    pub temperature_below: f64,
    pub factor: f64,
}

impl StressCoupling {
    pub fn factor_for(&self, pm25: f64, temperature: f64) -> f64 {
        if pm25 > self.pm25_above || temperature < self.temperature_below {
            self.factor
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftEnvelope {
    pub temperature: WalkRange,
    pub humidity: WalkRange,
    /// Floor-only walk; `max` is unused beyond saturation at infinity.
    pub pm25: WalkRange,
    pub snow_event_above: f64,
    pub snow_increment: f64,
    pub heart_rate: WalkRange,
    pub spo2: WalkRange,
    pub respiratory_rate: WalkRange,
    pub stress: StressCoupling,
}

impl DriftEnvelope {
    pub fn default_for_winter() -> Self {
        Self {
            temperature: WalkRange::symmetric(-15.0, 5.0, 0.2),
            humidity: WalkRange::symmetric(40.0, 100.0, 1.0),
            pm25: WalkRange::symmetric(0.0, f64::INFINITY, 2.0),
            snow_event_above: 0.8,
            snow_increment: 0.1,
            heart_rate: WalkRange::symmetric(60.0, 130.0, 4.0),
            // Off-centre draw: saturation steps up about 60% of the time.
            spo2: WalkRange {
                min: 90.0,
                max: 100.0,
                step: 0.5,
                center: 0.4,
            },
            respiratory_rate: WalkRange::symmetric(12.0, 30.0, 1.0),
            stress: StressCoupling {
                pm25_above: 35.0,
                temperature_below: -10.0,
                factor: 1.05,
            },
        }
    }
}

impl Default for DriftEnvelope {
    fn default() -> Self {
        Self::default_for_winter()
    }
}
