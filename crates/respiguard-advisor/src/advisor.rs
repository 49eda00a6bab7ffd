use crate::assessor::{AssessmentSource, RiskAssessor};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::remote::GeminiAssessor;
use crate::rules::RuleEngine;
use chrono::{DateTime, Utc};
use respiguard_core::{AssessmentResult, SystemSnapshot};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// An assessment plus where and when it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampedAssessment {
    pub result: AssessmentResult,
    pub source: AssessmentSource,
    pub assessed_at: DateTime<Utc>,
    /// Why the remote strategy was bypassed, when it was configured but failed.
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTicket(pub u64);

#[derive(Debug, Default)]
struct SlotState {
    ticket: u64,
    value: Option<StampedAssessment>,
}

/// Shared "last result" cell. Tickets are issued when a request starts; a
/// completion older than the stored one is dropped.
#[derive(Debug, Clone, Default)]
pub struct AssessmentSlot {
    next: Arc<AtomicU64>,
    state: Arc<Mutex<SlotState>>,
}

impl AssessmentSlot {
    pub fn begin(&self) -> SlotTicket {
        SlotTicket(self.next.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Stores `value` unless a newer request already completed. Returns
    /// whether it was stored.
    pub fn complete(&self, ticket: SlotTicket, value: StampedAssessment) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket.0 < state.ticket {
            return false;
        }
        state.ticket = ticket.0;
        state.value = Some(value);
        true
    }

    pub fn latest(&self) -> Option<StampedAssessment> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .value
            .clone()
    }
}

/// Prefers the remote strategy when one is configured and falls back to the
/// rule engine on any failure or timeout. Never fails as a whole.
pub struct RespiratoryAdvisor<R = GeminiAssessor> {
    remote: Option<Arc<R>>,
    rules: RuleEngine,
    timeout: Duration,
    slot: AssessmentSlot,
}

impl<R> Clone for RespiratoryAdvisor<R> {
    fn clone(&self) -> Self {
        Self {
            remote: self.remote.clone(),
            rules: self.rules,
            timeout: self.timeout,
            slot: self.slot.clone(),
        }
    }
}

impl RespiratoryAdvisor<GeminiAssessor> {
    pub fn from_config(config: &AdvisorConfig) -> Self {
        let remote = GeminiAssessor::from_config(config);
        match &remote {
            Some(r) => tracing::info!(model = %config.model, endpoint = %r.endpoint(), "remote advisor enabled"),
            None => tracing::info!("no advisor credential configured, using rule engine only"),
        }
        Self {
            remote: remote.map(Arc::new),
            rules: RuleEngine::default(),
            timeout: config.timeout,
            slot: AssessmentSlot::default(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_config(&AdvisorConfig::from_env())
    }
}

impl<R: RiskAssessor> RespiratoryAdvisor<R> {
    pub fn local_only() -> Self {
        Self {
            remote: None,
            rules: RuleEngine::default(),
            timeout: crate::config::DEFAULT_TIMEOUT,
            slot: AssessmentSlot::default(),
        }
    }

    pub fn with_remote(remote: R, timeout: Duration) -> Self {
        Self {
            remote: Some(Arc::new(remote)),
            rules: RuleEngine::default(),
            timeout,
            slot: AssessmentSlot::default(),
        }
    }

    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub fn latest(&self) -> Option<StampedAssessment> {
        self.slot.latest()
    }

    /// Classifies `snapshot` and publishes the result to the shared slot.
    pub async fn assess(&self, snapshot: &SystemSnapshot) -> StampedAssessment {
        let ticket = self.slot.begin();
        let stamped = self.classify(snapshot).await;
        if !self.slot.complete(ticket, stamped.clone()) {
            tracing::debug!(ticket = ticket.0, "discarded superseded assessment");
        }
        stamped
    }

    /// Classifies `snapshot` without touching the slot.
    pub async fn classify(&self, snapshot: &SystemSnapshot) -> StampedAssessment {
        let Some(remote) = &self.remote else {
            return self.local(snapshot, None);
        };
        match self.try_remote(remote.as_ref(), snapshot).await {
            Ok(result) => StampedAssessment {
                result,
                source: remote.source(),
                assessed_at: Utc::now(),
                fallback_reason: None,
            },
            Err(err) => {
                tracing::warn!(strategy = remote.name(), error = %err, "remote assessment failed, using rule engine");
                self.local(snapshot, Some(err.to_string()))
            }
        }
    }

    async fn try_remote(
        &self,
        remote: &R,
        snapshot: &SystemSnapshot,
    ) -> Result<AssessmentResult, AdvisorError> {
        tokio::time::timeout(self.timeout, remote.assess(snapshot))
            .await
            .map_err(|_| AdvisorError::Timeout(self.timeout))?
    }

    fn local(&self, snapshot: &SystemSnapshot, fallback_reason: Option<String>) -> StampedAssessment {
        StampedAssessment {
            result: self.rules.classify(snapshot),
            source: AssessmentSource::Local,
            assessed_at: Utc::now(),
            fallback_reason,
        }
    }
}
