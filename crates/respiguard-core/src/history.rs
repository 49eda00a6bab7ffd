use crate::error::CoreError;
use crate::metrics::{MetricId, SystemSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
pub const DEFAULT_CHART_WINDOW: usize = 20;

/// Bounded, most-recent-last snapshot history.
#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    capacity: usize,
    entries: VecDeque<SystemSnapshot>,
}

/// Chart row for the vitals and environment trend plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub heart_rate: f64,
    pub spo2: f64,
    pub temperature: f64,
    pub pm25: f64,
}

impl From<&SystemSnapshot> for TrendPoint {
    fn from(s: &SystemSnapshot) -> Self {
        Self {
            timestamp: s.timestamp,
            heart_rate: s.health.heart_rate,
            spo2: s.health.spo2,
            temperature: s.env.temperature,
            pm25: s.env.pm25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

/// Smallest end-to-end change that counts as movement.
fn trend_tolerance(metric: MetricId) -> f64 {
    match metric {
        MetricId::HeartRate => 1.0,
        MetricId::Pm25 | MetricId::Humidity | MetricId::RespiratoryRate => 0.5,
        MetricId::Spo2 => 0.2,
        MetricId::Temperature | MetricId::BodyTemp | MetricId::SnowDepth | MetricId::CoLevel => {
            0.1
        }
    }
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            entries: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl SnapshotHistory {
    pub fn with_capacity(capacity: usize) -> Result<Self, CoreError> {
        if capacity == 0 {
            return Err(CoreError::ZeroCapacity);
        }
        Ok(Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `snapshot`, returning the evicted oldest entry if full.
    pub fn push(&mut self, snapshot: SystemSnapshot) -> Option<SystemSnapshot> {
        let evicted = if self.entries.len() == self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(snapshot);
        evicted
    }

    pub fn latest(&self) -> Option<&SystemSnapshot> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &SystemSnapshot> + '_ {
        self.entries.iter()
    }

    /// The last `n` snapshots as chart rows, oldest first.
    pub fn trend_window(&self, n: usize) -> Vec<TrendPoint> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).map(TrendPoint::from).collect()
    }

    /// Direction of `metric` across the last `window` snapshots. A history
    /// shorter than two entries reads as stable.
    pub fn trend(&self, metric: MetricId, window: usize) -> Result<Trend, CoreError> {
        if window < 2 {
            return Err(CoreError::WindowTooSmall(window));
        }
        let skip = self.entries.len().saturating_sub(window);
        let mut slice = self.entries.iter().skip(skip);
        let (Some(first), Some(last)) = (slice.next(), self.entries.back()) else {
            return Ok(Trend::Stable);
        };
        let delta = last.get(metric) - first.get(metric);
        let tolerance = trend_tolerance(metric);
        Ok(if delta > tolerance {
            Trend::Rising
        } else if delta < -tolerance {
            Trend::Falling
        } else {
            Trend::Stable
        })
    }
}
