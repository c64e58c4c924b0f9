// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Metrics collection for abuse simulation results.

use membership_intake::intake::{
    SubmissionResponse, FAILURE_MESSAGE, RATE_LIMITED_MESSAGE, VALIDATION_MESSAGE,
    VERIFICATION_MESSAGE,
};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// What a single response looked like from the caller's side.
///
/// Masked honeypot successes are indistinguishable from genuine
/// acceptances here, by design; the split comes from the service's own
/// counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Success,
    RateLimited,
    VerificationRejected,
    ValidationRejected,
    Failed,
}

/// Classify a response by its caller-visible shape.
pub fn classify(response: &SubmissionResponse) -> Verdict {
    if response.success {
        return Verdict::Success;
    }
    match response.message.as_str() {
        RATE_LIMITED_MESSAGE => Verdict::RateLimited,
        VERIFICATION_MESSAGE => Verdict::VerificationRejected,
        VALIDATION_MESSAGE => Verdict::ValidationRejected,
        FAILURE_MESSAGE => Verdict::Failed,
        other => panic!("unexpected rejection message: {other}"),
    }
}

/// Collects metrics during a flood simulation.
#[derive(Debug, Default)]
pub struct FloodMetrics {
    start_time: Option<Instant>,
    end_time: Option<Instant>,
    verdicts: HashMap<Verdict, usize>,
    requests_per_identity: HashMap<String, usize>,
    successes_per_identity: HashMap<String, usize>,
}

impl FloodMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Record one response.
    pub fn record(&mut self, identity: &str, response: &SubmissionResponse) {
        let verdict = classify(response);
        *self.verdicts.entry(verdict).or_insert(0) += 1;
        *self
            .requests_per_identity
            .entry(identity.to_string())
            .or_insert(0) += 1;
        if verdict == Verdict::Success {
            *self
                .successes_per_identity
                .entry(identity.to_string())
                .or_insert(0) += 1;
        }
    }

    pub fn total_requests(&self) -> usize {
        self.verdicts.values().sum()
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.verdicts.get(&verdict).copied().unwrap_or(0)
    }

    /// Largest number of caller-visible successes any identity achieved.
    pub fn max_successes_per_identity(&self) -> usize {
        self.successes_per_identity.values().copied().max().unwrap_or(0)
    }

    pub fn unique_identities(&self) -> usize {
        self.requests_per_identity.len()
    }

    pub fn duration(&self) -> Duration {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.duration_since(start),
            (Some(start), None) => start.elapsed(),
            _ => Duration::ZERO,
        }
    }

    /// Ratio of non-success verdicts to total.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            return 0.0;
        }
        (total - self.count(Verdict::Success)) as f64 / total as f64
    }

    /// Generate a summary report.
    pub fn report(&self) -> FloodReport {
        FloodReport {
            total_requests: self.total_requests(),
            success: self.count(Verdict::Success),
            rate_limited: self.count(Verdict::RateLimited),
            verification_rejected: self.count(Verdict::VerificationRejected),
            validation_rejected: self.count(Verdict::ValidationRejected),
            failed: self.count(Verdict::Failed),
            rejection_rate: self.rejection_rate(),
            duration_ms: self.duration().as_millis() as u64,
            unique_identities: self.unique_identities(),
            max_successes_per_identity: self.max_successes_per_identity(),
        }
    }
}

/// Summary report of a flood simulation.
#[derive(Debug, Clone)]
pub struct FloodReport {
    pub total_requests: usize,
    pub success: usize,
    pub rate_limited: usize,
    pub verification_rejected: usize,
    pub validation_rejected: usize,
    pub failed: usize,
    pub rejection_rate: f64,
    pub duration_ms: u64,
    pub unique_identities: usize,
    pub max_successes_per_identity: usize,
}

impl std::fmt::Display for FloodReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Flood Simulation Report ===")?;
        writeln!(f, "Duration:               {} ms", self.duration_ms)?;
        writeln!(f, "Total Submissions:      {}", self.total_requests)?;
        writeln!(f)?;
        writeln!(f, "--- Caller-visible verdicts ---")?;
        writeln!(
            f,
            "Success:                {} ({:.1}%)",
            self.success,
            self.success as f64 / self.total_requests.max(1) as f64 * 100.0
        )?;
        writeln!(f, "Rate Limited:           {}", self.rate_limited)?;
        writeln!(f, "Verification Rejected:  {}", self.verification_rejected)?;
        writeln!(f, "Validation Rejected:    {}", self.validation_rejected)?;
        writeln!(f, "Failed:                 {}", self.failed)?;
        writeln!(f, "Rejection Rate:         {:.1}%", self.rejection_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "--- Distribution ---")?;
        writeln!(f, "Unique Identities:      {}", self.unique_identities)?;
        writeln!(
            f,
            "Max successes/identity: {}",
            self.max_successes_per_identity
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success() -> SubmissionResponse {
        SubmissionResponse {
            success: true,
            message: "ok".to_string(),
            errors: None,
        }
    }

    fn rate_limited() -> SubmissionResponse {
        SubmissionResponse {
            success: false,
            message: RATE_LIMITED_MESSAGE.to_string(),
            errors: None,
        }
    }

    #[test]
    fn verdict_tally() {
        let mut metrics = FloodMetrics::new();
        metrics.start();
        for _ in 0..3 {
            metrics.record("10.0.0.1", &success());
        }
        for _ in 0..7 {
            metrics.record("10.0.0.1", &rate_limited());
        }
        metrics.finish();

        assert_eq!(metrics.total_requests(), 10);
        assert_eq!(metrics.count(Verdict::Success), 3);
        assert_eq!(metrics.count(Verdict::RateLimited), 7);
        assert_eq!(metrics.max_successes_per_identity(), 3);
        assert!((metrics.rejection_rate() - 0.7).abs() < 0.01);
    }

    #[test]
    fn per_identity_success_tracking() {
        let mut metrics = FloodMetrics::new();
        metrics.record("a", &success());
        metrics.record("a", &success());
        metrics.record("b", &success());
        metrics.record("b", &rate_limited());

        assert_eq!(metrics.unique_identities(), 2);
        assert_eq!(metrics.max_successes_per_identity(), 2);
    }
}
