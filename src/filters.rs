// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse filters applied ahead of schema validation.
//!
//! Two independent gates:
//! - the honeypot trap, a form field no human ever sees;
//! - the challenge-token gate, whose verification happens upstream and
//!   arrives here as an opaque outcome.

use crate::schema::ApplicationPayload;

/// Outcome of the upstream proof-of-humanity check.
///
/// The caller verifies the token against the challenge provider; this
/// service only honors the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    Verified,
    Unverified,
}

impl ChallengeOutcome {
    pub fn from_verified(verified: bool) -> Self {
        if verified {
            Self::Verified
        } else {
            Self::Unverified
        }
    }

    pub fn is_verified(self) -> bool {
        matches!(self, Self::Verified)
    }
}

/// True when the hidden trap field carries any content, which marks the
/// submission as automated. Legitimate clients submit it empty or not
/// at all.
pub fn honeypot_tripped(payload: &ApplicationPayload) -> bool {
    payload
        .honeypot
        .as_deref()
        .is_some_and(|value| !value.is_empty())
}
