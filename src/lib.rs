// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Membership application intake.
//!
//! The pipeline that accepts a prospective member's submission and turns
//! it into a uniform verdict:
//!
//! - Per-identity fixed-window rate limiting (3 submissions per hour)
//! - Honeypot trap with a masked success response for bots
//! - Challenge-token gate (verification delegated to the caller)
//! - Schema validation collecting every field violation at once
//! - A stubbed durable record for accepted applications
//!
//! Persistence, notification, and CRM integration are external
//! collaborators; the default recorder only logs.

pub mod config;
pub mod filters;
pub mod handlers;
pub mod intake;
pub mod limiter;
pub mod metrics;
pub mod schema;

pub use config::Config;
pub use filters::ChallengeOutcome;
pub use intake::{ApplicationRecorder, IntakeService, LogRecorder, Outcome, SubmissionResponse};
pub use limiter::{AdmitDecision, FixedWindowLimiter, ManualClock, SystemClock};
pub use metrics::IntakeMetrics;
pub use schema::{ApplicationPayload, FieldErrors, ValidatedApplication};
