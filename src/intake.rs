// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Intake orchestrator.
//!
//! Sequences one submission through the pipeline: rate limit, honeypot,
//! challenge gate, schema validation, then the (stubbed) durable record.
//! The order is deliberate and must not be rearranged: the quota check
//! runs first so identity floods stay capped regardless of payload
//! content, and the honeypot runs before validation so bot payloads
//! never reach it.
//!
//! Every outcome resolves locally into a uniform [`SubmissionResponse`];
//! nothing propagates past this boundary.

use crate::filters::{self, ChallengeOutcome};
use crate::limiter::{AdmitDecision, FixedWindowLimiter};
use crate::metrics::IntakeMetrics;
use crate::schema::{self, ApplicationPayload, FieldErrors, ValidatedApplication};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Identity used when the caller cannot supply one. Collapses to a single
/// shared quota rather than bypassing the limiter.
pub const UNKNOWN_IDENTITY: &str = "unknown";

/// Confirmation shown for accepted (and honeypot-masked) submissions.
/// The two must stay identical so automated callers cannot tell them
/// apart.
pub const ACCEPTED_MESSAGE: &str = "Your application has been received. \
    Our team will review and reach out within 5 business days if there's alignment.";

pub const RATE_LIMITED_MESSAGE: &str =
    "Too many submission attempts. Please try again later.";

pub const VERIFICATION_MESSAGE: &str =
    "Verification required. Please complete the challenge and try again.";

pub const VALIDATION_MESSAGE: &str = "Please correct the errors below.";

pub const FAILURE_MESSAGE: &str =
    "An unexpected error occurred. Please try again or contact us directly.";

/// Terminal outcome of one submission. Internal taxonomy; the caller only
/// ever sees the [`SubmissionResponse`] it maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Validated and recorded.
    Accepted,
    /// Honeypot tripped; answered as success, nothing processed.
    HoneypotMasked,
    /// Identity exhausted its submission quota.
    RateLimited,
    /// Challenge token missing or not verified by the caller.
    VerificationRequired,
    /// One or more fields violated the schema.
    ValidationFailed(FieldErrors),
    /// Unexpected fault (e.g. the recorder); detail logged, not exposed.
    Failed,
}

/// Uniform result returned to the form layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl SubmissionResponse {
    fn accepted() -> Self {
        Self {
            success: true,
            message: ACCEPTED_MESSAGE.to_string(),
            errors: None,
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            errors: None,
        }
    }
}

impl From<&Outcome> for SubmissionResponse {
    fn from(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Accepted | Outcome::HoneypotMasked => Self::accepted(),
            Outcome::RateLimited => Self::rejected(RATE_LIMITED_MESSAGE),
            Outcome::VerificationRequired => Self::rejected(VERIFICATION_MESSAGE),
            Outcome::ValidationFailed(errors) => Self {
                success: false,
                message: VALIDATION_MESSAGE.to_string(),
                errors: Some(errors.clone()),
            },
            Outcome::Failed => Self::rejected(FAILURE_MESSAGE),
        }
    }
}

/// Durable side effect performed for accepted applications.
///
/// The production system would persist and notify; the default
/// implementation only logs. Injected so tests can observe or fail it.
pub trait ApplicationRecorder: Send + Sync {
    fn record(&self, application: &ValidatedApplication) -> anyhow::Result<()>;
}

/// Stub recorder: logs an application summary and succeeds.
pub struct LogRecorder;

impl ApplicationRecorder for LogRecorder {
    fn record(&self, application: &ValidatedApplication) -> anyhow::Result<()> {
        info!(
            full_name = %application.full_name,
            email = %application.email,
            company = %application.company_name,
            revenue = %application.revenue_range,
            received_at = %chrono::Utc::now().to_rfc3339(),
            "valid application received"
        );
        Ok(())
    }
}

/// The intake pipeline. One instance serves all submissions; per-identity
/// quota state lives in the limiter.
pub struct IntakeService {
    limiter: Arc<FixedWindowLimiter>,
    recorder: Box<dyn ApplicationRecorder>,
    metrics: Arc<IntakeMetrics>,
}

impl IntakeService {
    pub fn new(
        limiter: Arc<FixedWindowLimiter>,
        recorder: Box<dyn ApplicationRecorder>,
        metrics: Arc<IntakeMetrics>,
    ) -> Self {
        Self {
            limiter,
            recorder,
            metrics,
        }
    }

    /// Process one submission end to end.
    ///
    /// `identity` is the caller-supplied rate-limit key (normally the
    /// client IP); `challenge` is the upstream verification verdict.
    pub async fn submit(
        &self,
        payload: &ApplicationPayload,
        identity: Option<&str>,
        challenge: ChallengeOutcome,
    ) -> SubmissionResponse {
        let outcome = self.decide(payload, identity, challenge).await;
        self.observe(&outcome);
        SubmissionResponse::from(&outcome)
    }

    async fn decide(
        &self,
        payload: &ApplicationPayload,
        identity: Option<&str>,
        challenge: ChallengeOutcome,
    ) -> Outcome {
        let identity = identity.unwrap_or(UNKNOWN_IDENTITY);

        // Quota first: cheapest check, and it caps identity floods before
        // anything else spends work on them.
        if let AdmitDecision::Limited { retry_after } = self.limiter.admit(identity).await {
            info!(identity, ?retry_after, "submission rate limited");
            return Outcome::RateLimited;
        }

        // Tripped honeypot: answer as success and stop. No validation, no
        // record — and no hint to the bot that it was caught.
        if filters::honeypot_tripped(payload) {
            warn!(identity, "honeypot tripped, masking as success");
            return Outcome::HoneypotMasked;
        }

        if !challenge.is_verified() {
            info!(identity, "challenge verification missing");
            return Outcome::VerificationRequired;
        }

        let application = match schema::validate(payload) {
            Ok(application) => application,
            Err(errors) => {
                info!(identity, fields = errors.len(), "submission failed validation");
                return Outcome::ValidationFailed(errors);
            }
        };

        match self.recorder.record(&application) {
            Ok(()) => {
                info!(identity, "application accepted");
                Outcome::Accepted
            }
            Err(fault) => {
                // Logged in full here; the caller only gets the generic
                // message.
                error!(identity, %fault, "recorder failed");
                Outcome::Failed
            }
        }
    }

    fn observe(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Accepted => self.metrics.accepted.inc(),
            Outcome::HoneypotMasked => self.metrics.honeypot_masked.inc(),
            Outcome::RateLimited => self.metrics.rate_limited.inc(),
            Outcome::VerificationRequired => self.metrics.verification_rejected.inc(),
            Outcome::ValidationFailed(_) => self.metrics.validation_rejected.inc(),
            Outcome::Failed => self.metrics.failed.inc(),
        }
    }
}
