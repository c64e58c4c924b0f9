// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse simulation patterns for security testing.

/// What each simulated submission carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Fully valid application.
    Valid,
    /// Valid fields but a filled honeypot.
    Bot,
    /// Multiple schema violations.
    Garbage,
}

/// Flood pattern configuration.
#[derive(Debug, Clone)]
pub struct FloodConfig {
    /// Total number of submissions to send
    pub total_requests: usize,
    /// Number of distinct identities, cycled round-robin
    pub unique_identities: usize,
    /// Payload sent by every submission
    pub payload: PayloadKind,
    /// Whether the upstream challenge check passed
    pub challenge_verified: bool,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            total_requests: 50,
            unique_identities: 1,
            payload: PayloadKind::Valid,
            challenge_verified: true,
        }
    }
}

/// Predefined abuse patterns.
impl FloodConfig {
    /// One identity hammering the endpoint with valid applications.
    pub fn single_identity_flood() -> Self {
        Self {
            total_requests: 50,
            unique_identities: 1,
            ..Default::default()
        }
    }

    /// Many identities, each staying busy.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 200,
            unique_identities: 20,
            ..Default::default()
        }
    }

    /// Scripted submissions that fill the hidden trap field.
    pub fn bot_flood() -> Self {
        Self {
            total_requests: 30,
            unique_identities: 3,
            payload: PayloadKind::Bot,
            ..Default::default()
        }
    }

    /// Junk payloads probing the validator.
    pub fn garbage_flood() -> Self {
        Self {
            total_requests: 9,
            unique_identities: 3,
            payload: PayloadKind::Garbage,
            ..Default::default()
        }
    }

    /// Submissions that never passed the challenge.
    pub fn unverified_flood() -> Self {
        Self {
            total_requests: 9,
            unique_identities: 3,
            challenge_verified: false,
            ..Default::default()
        }
    }

    /// Quota ceiling for this pattern: no flood can be accepted (or
    /// masked) past it.
    pub fn quota_ceiling(&self, max_per_window: u32) -> usize {
        self.unique_identities * max_per_window as usize
    }
}
