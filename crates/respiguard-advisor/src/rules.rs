use crate::assessor::{AssessmentSource, RiskAssessor};
use crate::error::AdvisorError;
use respiguard_core::{AssessmentResult, RiskLevel, SystemSnapshot};
use serde::{Deserialize, Serialize};
use std::future::{ready, Future};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskWeights {
    pub temperature: f64,
    pub pm25: f64,
    pub spo2: f64,
    pub heart_rate: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            pm25: 0.3,
            spo2: 0.2,
            heart_rate: 0.2,
        }
    }
}

/// Discrete severity multipliers, one per scored metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskFactors {
    pub temperature: f64,
    pub pm25: f64,
    pub spo2: f64,
    pub heart_rate: f64,
}

impl RiskFactors {
    pub fn from_snapshot(s: &SystemSnapshot) -> Self {
        let t = s.env.temperature;
        let pm = s.env.pm25;
        let o2 = s.health.spo2;

        let temperature = if t < -10.0 {
            2.0
        } else if t < 0.0 {
            1.5
        } else {
            1.0
        };
        let pm25 = if pm > 35.0 {
            2.0
        } else if pm > 25.0 {
            1.5
        } else {
            1.0
        };
        let spo2 = if o2 < 95.0 {
            2.0
        } else if o2 < 97.0 {
            1.5
        } else {
            1.0
        };
        let heart_rate = if s.health.heart_rate > 100.0 { 1.5 } else { 1.0 };

        Self {
            temperature,
            pm25,
            spo2,
            heart_rate,
        }
    }

    pub fn score(&self, weights: &RiskWeights) -> f64 {
        weights.temperature * self.temperature
            + weights.pm25 * self.pm25
            + weights.spo2 * self.spo2
            + weights.heart_rate * self.heart_rate
    }
}

/// Lower score bounds per level, checked from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelThresholds {
    pub critical: f64,
    pub high: f64,
    pub moderate: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            critical: 3.0,
            high: 2.2,
            moderate: 1.5,
        }
    }
}

impl LevelThresholds {
    pub fn level_for(&self, score: f64) -> RiskLevel {
        if score >= self.critical {
            RiskLevel::Critical
        } else if score >= self.high {
            RiskLevel::High
        } else if score >= self.moderate {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Narrative {
    pub summary: &'static str,
    pub recommendations: &'static [&'static str],
}

/// One explanatory branch: when `applies` holds, `compose` picks the text for
/// the already-computed level.
#[derive(Clone, Copy)]
pub struct NarrativeRule {
    pub context: &'static str,
    pub applies: fn(&SystemSnapshot) -> bool,
    pub compose: fn(RiskLevel) -> Narrative,
}

impl std::fmt::Debug for NarrativeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeRule")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

const SEVERE_COLD_ELEVATED: Narrative = Narrative {
    summary: "Extreme cold is straining your airways and your vitals show stress. Bronchospasm risk is high.",
    recommendations: &[
        "Stay indoors and avoid breathing cold air directly.",
        "Keep your rescue inhaler within reach and use it as prescribed.",
        "Contact your care provider if breathing becomes difficult.",
    ],
};

const SEVERE_COLD: Narrative = Narrative {
    summary: "Air temperature is below -10°C. Cold, dry air can narrow the airways even while vitals remain steady.",
    recommendations: &[
        "Wear a scarf over your nose and mouth to warm the air.",
        "Limit outdoor exertion.",
        "Carry your rescue inhaler.",
    ],
};

const PARTICULATE_ELEVATED: Narrative = Narrative {
    summary: "Fine particulate levels are hazardous and your vitals indicate significant respiratory stress.",
    recommendations: &[
        "Move indoors and close windows.",
        "Run an air purifier if one is available.",
        "Use your rescue inhaler if you notice wheezing.",
    ],
};

const PARTICULATE: Narrative = Narrative {
    summary: "PM2.5 is above 35 µg/m³. Particulates held in cold winter air may irritate sensitive airways.",
    recommendations: &[
        "Reduce time spent outdoors.",
        "Wear a well-fitted particulate mask outside.",
        "Keep your rescue inhaler accessible.",
    ],
};

const HYPOXEMIA: Narrative = Narrative {
    summary: "Blood oxygen saturation is below 95%. This needs prompt attention regardless of outdoor conditions.",
    recommendations: &[
        "Stop physical activity and rest.",
        "Use your prescribed rescue medication.",
        "Seek medical care if SpO2 does not recover within minutes.",
    ],
};

const INVERSION: Narrative = Narrative {
    summary: "Below-freezing air is trapping pollutants near the ground and raising particulate exposure.",
    recommendations: &[
        "Avoid outdoor exercise until the inversion clears.",
        "Wear a mask when you go outside.",
    ],
};

const SNOW_EXERTION: Narrative = Narrative {
    summary: "Your heart rate is elevated in deep snow, which suggests physical strain from clearing or walking through drifts.",
    recommendations: &[
        "Take frequent breaks from snow clearing.",
        "Breathe through your nose and pace your exertion.",
        "Warm up indoors before continuing.",
    ],
};

const STABLE: Narrative = Narrative {
    summary: "Conditions and vitals are within comfortable ranges. No immediate respiratory concern.",
    recommendations: &[
        "Keep monitoring your vitals.",
        "Dress warmly before heading out.",
    ],
};

fn severe_cold(s: &SystemSnapshot) -> bool {
    s.env.temperature < -10.0
}

fn high_particulates(s: &SystemSnapshot) -> bool {
    s.env.pm25 > 35.0
}

fn hypoxemia(s: &SystemSnapshot) -> bool {
    s.health.spo2 < 95.0
}

fn inversion_layer(s: &SystemSnapshot) -> bool {
    s.env.temperature < 0.0 && s.env.pm25 > 20.0
}

fn snow_exertion(s: &SystemSnapshot) -> bool {
    s.env.snow_depth > 10.0 && s.health.heart_rate > 100.0
}

fn always(_: &SystemSnapshot) -> bool {
    true
}

fn severe_cold_text(level: RiskLevel) -> Narrative {
    if level.is_elevated() {
        SEVERE_COLD_ELEVATED
    } else {
        SEVERE_COLD
    }
}

fn particulate_text(level: RiskLevel) -> Narrative {
    if level.is_elevated() {
        PARTICULATE_ELEVATED
    } else {
        PARTICULATE
    }
}

fn hypoxemia_text(_: RiskLevel) -> Narrative {
    HYPOXEMIA
}

fn inversion_text(_: RiskLevel) -> Narrative {
    INVERSION
}

fn snow_exertion_text(_: RiskLevel) -> Narrative {
    SNOW_EXERTION
}

fn stable_text(_: RiskLevel) -> Narrative {
    STABLE
}

/// Narrative branches in priority order; the first that applies wins.
pub static NARRATIVE_RULES: [NarrativeRule; 6] = [
    NarrativeRule {
        context: "Severe Cold Snap",
        applies: severe_cold,
        compose: severe_cold_text,
    },
    NarrativeRule {
        context: "High Particulate Matter",
        applies: high_particulates,
        compose: particulate_text,
    },
    NarrativeRule {
        context: "Hypoxemia Detected",
        applies: hypoxemia,
        compose: hypoxemia_text,
    },
    NarrativeRule {
        context: "Winter Inversion Layer",
        applies: inversion_layer,
        compose: inversion_text,
    },
    NarrativeRule {
        context: "Snowy Conditions with Elevated Heart Rate",
        applies: snow_exertion,
        compose: snow_exertion_text,
    },
    NarrativeRule {
        context: "Stable Winter Conditions",
        applies: always,
        compose: stable_text,
    },
];

#[derive(Debug, Clone, Copy)]
pub struct RuleEvaluation {
    pub factors: RiskFactors,
    pub score: f64,
    pub level: RiskLevel,
    pub rule: &'static NarrativeRule,
}

impl RuleEvaluation {
    pub fn into_result(self) -> AssessmentResult {
        let narrative = (self.rule.compose)(self.level);
        AssessmentResult {
            risk_level: self.level,
            summary: narrative.summary.to_string(),
            recommendations: narrative
                .recommendations
                .iter()
                .map(|r| r.to_string())
                .collect(),
            weather_context: self.rule.context.to_string(),
        }
    }
}

/// Deterministic local classifier. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleEngine {
    pub weights: RiskWeights,
    pub thresholds: LevelThresholds,
}

impl RuleEngine {
    pub fn new(weights: RiskWeights, thresholds: LevelThresholds) -> Self {
        Self {
            weights,
            thresholds,
        }
    }

    pub fn evaluate(&self, snapshot: &SystemSnapshot) -> RuleEvaluation {
        let factors = RiskFactors::from_snapshot(snapshot);
        let score = factors.score(&self.weights);
        let level = self.thresholds.level_for(score);
        let rule = NARRATIVE_RULES
            .iter()
            .find(|rule| (rule.applies)(snapshot))
            .unwrap_or(&NARRATIVE_RULES[NARRATIVE_RULES.len() - 1]);
        RuleEvaluation {
            factors,
            score,
            level,
            rule,
        }
    }

    pub fn classify(&self, snapshot: &SystemSnapshot) -> AssessmentResult {
        let evaluation = self.evaluate(snapshot);
        tracing::debug!(
            score = evaluation.score,
            level = %evaluation.level,
            context = evaluation.rule.context,
            "rule engine evaluated snapshot"
        );
        evaluation.into_result()
    }
}

impl RiskAssessor for RuleEngine {
    fn name(&self) -> &'static str {
        "rule-engine"
    }

    fn source(&self) -> AssessmentSource {
        AssessmentSource::Local
    }

    fn assess(
        &self,
        snapshot: &SystemSnapshot,
    ) -> impl Future<Output = Result<AssessmentResult, AdvisorError>> + Send {
        ready(Ok(self.classify(snapshot)))
    }
}
