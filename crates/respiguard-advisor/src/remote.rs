use crate::assessor::{AssessmentSource, RiskAssessor};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use reqwest::Client;
use respiguard_core::{AssessmentResult, RiskLevel, SystemSnapshot};
use serde::Deserialize;
use serde_json::{json, Value};

/// Natural-language request embedding the eight monitored readings.
pub fn build_prompt(s: &SystemSnapshot) -> String {
    format!(
        "Analyze the following data from a respiratory health monitoring system in a snowy winter environment.

Environmental Conditions:
- Temperature: {:.1}°C
- Humidity: {:.1}%
- PM2.5: {:.1} µg/m³
- Snow Depth: {:.1} cm

User Vitals:
- Heart Rate: {:.1} bpm
- SpO2: {:.1}%
- Respiratory Rate: {:.1} breaths/min
- Body Temp: {:.1}°C

Context: Cold air and high particulate matter (PM2.5) in winter are major triggers for bronchospasm and asthma.
Provide a JSON response assessing the respiratory risk.",
        s.env.temperature,
        s.env.humidity,
        s.env.pm25,
        s.env.snow_depth,
        s.health.heart_rate,
        s.health.spo2,
        s.health.respiratory_rate,
        s.health.body_temp,
    )
}

fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "riskLevel": {
                "type": "STRING",
                "enum": ["Low", "Moderate", "High", "Critical"],
                "description": "The assessed level of respiratory risk."
            },
            "summary": {
                "type": "STRING",
                "description": "A brief 1-2 sentence summary of the current health situation."
            },
            "recommendations": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of 3 actionable recommendations."
            },
            "weatherContext": {
                "type": "STRING",
                "description": "Brief observation about the weather impact (e.g., 'Cold Snap', 'Inversion Layer')."
            }
        },
        "required": ["riskLevel", "summary", "recommendations", "weatherContext"]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireAssessment {
    risk_level: String,
    summary: String,
    recommendations: Vec<String>,
    weather_context: String,
}

/// Parses the structured text returned by the model. All four fields are
/// required and at least one non-blank recommendation must be present.
pub fn parse_assessment(text: &str) -> Result<AssessmentResult, AdvisorError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(AdvisorError::EmptyResponse);
    }
    let wire: WireAssessment = serde_json::from_str(text)?;
    let recommendations: Vec<String> = wire
        .recommendations
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if recommendations.is_empty() {
        return Err(AdvisorError::MissingRecommendations);
    }
    Ok(AssessmentResult {
        risk_level: RiskLevel::parse_lenient(&wire.risk_level),
        summary: wire.summary,
        recommendations,
        weather_context: wire.weather_context,
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    pub(crate) fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
    }
}

/// Gemini `generateContent` client with a JSON response schema.
#[derive(Clone)]
pub struct GeminiAssessor {
    http: Client,
    api_base: String,
    model: String,
    api_key: String,
}

impl std::fmt::Debug for GeminiAssessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAssessor")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiAssessor {
    pub fn new(api_key: impl Into<String>, config: &AdvisorConfig) -> Self {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    /// Returns `None` when no credential is configured.
    pub fn from_config(config: &AdvisorConfig) -> Option<Self> {
        config
            .api_key
            .as_deref()
            .map(|key| Self::new(key, config))
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn request_body(snapshot: &SystemSnapshot) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": build_prompt(snapshot) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }

    async fn generate(&self, snapshot: &SystemSnapshot) -> Result<String, AdvisorError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&Self::request_body(snapshot))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdvisorError::Status(status.as_u16()));
        }
        let body: GenerateContentResponse = serde_json::from_slice(&response.bytes().await?)?;
        body.first_text().ok_or(AdvisorError::EmptyResponse)
    }
}

impl RiskAssessor for GeminiAssessor {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn source(&self) -> AssessmentSource {
        AssessmentSource::Remote
    }

    async fn assess(&self, snapshot: &SystemSnapshot) -> Result<AssessmentResult, AdvisorError> {
        let text = self.generate(snapshot).await?;
        parse_assessment(&text)
    }
}
