// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Prometheus counters for intake outcomes.
//!
//! Honeypot-masked submissions look like acceptances to the caller, so
//! this is the only place the two are told apart operationally.

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

/// One counter per terminal outcome of the intake pipeline.
pub struct IntakeMetrics {
    registry: Registry,
    pub accepted: IntCounter,
    pub honeypot_masked: IntCounter,
    pub rate_limited: IntCounter,
    pub verification_rejected: IntCounter,
    pub validation_rejected: IntCounter,
    pub failed: IntCounter,
}

impl IntakeMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let accepted = IntCounter::new(
            "intake_submissions_accepted_total",
            "Applications accepted and recorded",
        )?;
        let honeypot_masked = IntCounter::new(
            "intake_submissions_honeypot_masked_total",
            "Automated submissions answered with a masked success",
        )?;
        let rate_limited = IntCounter::new(
            "intake_submissions_rate_limited_total",
            "Submissions rejected by the per-identity quota",
        )?;
        let verification_rejected = IntCounter::new(
            "intake_submissions_verification_rejected_total",
            "Submissions rejected for a missing or failed challenge",
        )?;
        let validation_rejected = IntCounter::new(
            "intake_submissions_validation_rejected_total",
            "Submissions rejected with field errors",
        )?;
        let failed = IntCounter::new(
            "intake_submissions_failed_total",
            "Submissions that hit an unexpected fault",
        )?;

        registry.register(Box::new(accepted.clone()))?;
        registry.register(Box::new(honeypot_masked.clone()))?;
        registry.register(Box::new(rate_limited.clone()))?;
        registry.register(Box::new(verification_rejected.clone()))?;
        registry.register(Box::new(validation_rejected.clone()))?;
        registry.register(Box::new(failed.clone()))?;

        Ok(Self {
            registry,
            accepted,
            honeypot_masked,
            rate_limited,
            verification_rejected,
            validation_rejected,
            failed,
        })
    }

    /// Render the registry in the Prometheus text exposition format.
    pub fn encode(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
