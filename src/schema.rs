// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Application schema validator.
//!
//! Turns a raw, untrusted [`ApplicationPayload`] into a
//! [`ValidatedApplication`] or a per-field map of violation messages.
//! Every field is checked independently and all violations are collected,
//! so the form layer can surface every problem in one pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Field name -> user-displayable violation messages.
///
/// Attribution is exact: a message only ever appears under the field that
/// produced it. `BTreeMap` keeps the ordering deterministic.
pub type FieldErrors = BTreeMap<&'static str, Vec<String>>;

/// Raw application fields as received from the form layer.
///
/// Every field is optional at this stage; missing and empty are both
/// handled by the validator. Field names match the rendered form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationPayload {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub revenue_range: Option<String>,
    #[serde(default)]
    pub currently_building: Option<String>,
    #[serde(default)]
    pub hopes_to_gain: Option<String>,
    #[serde(default)]
    pub referral_source: Option<String>,
    /// Hidden trap field; any content marks the submission as automated.
    #[serde(default)]
    pub honeypot: Option<String>,
}

/// Annual revenue bucket. Closed set; anything else is rejected at the
/// boundary rather than carried as a free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevenueRange {
    #[serde(rename = "$100K - $250K")]
    From100kTo250k,
    #[serde(rename = "$250K - $500K")]
    From250kTo500k,
    #[serde(rename = "$500K - $1M")]
    From500kTo1m,
    #[serde(rename = "$1M - $5M")]
    From1mTo5m,
    #[serde(rename = "$5M+")]
    Above5m,
}

impl RevenueRange {
    /// The label shown in (and accepted from) the form's select field.
    pub fn label(self) -> &'static str {
        match self {
            Self::From100kTo250k => "$100K - $250K",
            Self::From250kTo500k => "$250K - $500K",
            Self::From500kTo1m => "$500K - $1M",
            Self::From1mTo5m => "$1M - $5M",
            Self::Above5m => "$5M+",
        }
    }

    pub const ALL: [RevenueRange; 5] = [
        Self::From100kTo250k,
        Self::From250kTo500k,
        Self::From500kTo1m,
        Self::From1mTo5m,
        Self::Above5m,
    ];
}

impl fmt::Display for RevenueRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error for parsing a closed select-field label.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized option: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for RevenueRange {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// How the applicant heard about the club. Closed set, optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferralSource {
    Referral,
    #[serde(rename = "Social Media")]
    SocialMedia,
    #[serde(rename = "Google Search")]
    GoogleSearch,
    Event,
    Other,
}

impl ReferralSource {
    pub fn label(self) -> &'static str {
        match self {
            Self::Referral => "Referral",
            Self::SocialMedia => "Social Media",
            Self::GoogleSearch => "Google Search",
            Self::Event => "Event",
            Self::Other => "Other",
        }
    }

    pub const ALL: [ReferralSource; 5] = [
        Self::Referral,
        Self::SocialMedia,
        Self::GoogleSearch,
        Self::Event,
        Self::Other,
    ];
}

impl fmt::Display for ReferralSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReferralSource {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A fully validated application.
///
/// Only the validator constructs this; holding one is proof that every
/// field satisfied its constraint.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ValidatedApplication {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company_name: String,
    pub role: String,
    pub website: Option<Url>,
    pub revenue_range: RevenueRange,
    pub currently_building: String,
    pub hopes_to_gain: String,
    pub referral_source: Option<ReferralSource>,
}

// Inclusive length bounds per field.
const NAME_MIN: usize = 2;
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const PHONE_MIN: usize = 10;
const PHONE_MAX: usize = 20;
const COMPANY_MIN: usize = 2;
const COMPANY_MAX: usize = 200;
const ROLE_MIN: usize = 2;
const ROLE_MAX: usize = 100;
const ESSAY_MIN: usize = 50;
const ESSAY_MAX: usize = 2000;

/// Validate a raw payload.
///
/// All violations for all fields are collected; there is no cross-field
/// short-circuit. Validating the same payload twice yields identical
/// results (the validator holds no state).
pub fn validate(payload: &ApplicationPayload) -> Result<ValidatedApplication, FieldErrors> {
    let mut errors = FieldErrors::new();

    let full_name = check_full_name(payload.full_name.as_deref(), &mut errors);
    let email = check_email(payload.email.as_deref(), &mut errors);
    let phone = check_phone(payload.phone.as_deref(), &mut errors);
    let company_name = check_company_name(payload.company_name.as_deref(), &mut errors);
    let role = check_role(payload.role.as_deref(), &mut errors);
    let website = check_website(payload.website.as_deref(), &mut errors);
    let revenue_range = check_revenue_range(payload.revenue_range.as_deref(), &mut errors);
    let currently_building = check_essay(
        "currentlyBuilding",
        payload.currently_building.as_deref(),
        "Please provide at least 50 characters about what you're building",
        &mut errors,
    );
    let hopes_to_gain = check_essay(
        "hopesToGain",
        payload.hopes_to_gain.as_deref(),
        "Please provide at least 50 characters about what you hope to gain",
        &mut errors,
    );
    let referral_source = check_referral_source(payload.referral_source.as_deref(), &mut errors);
    check_honeypot(payload.honeypot.as_deref(), &mut errors);

    if !errors.is_empty() {
        debug!(fields = errors.len(), "application failed validation");
        return Err(errors);
    }

    match (
        full_name,
        email,
        phone,
        company_name,
        role,
        revenue_range,
        currently_building,
        hopes_to_gain,
    ) {
        (
            Some(full_name),
            Some(email),
            Some(phone),
            Some(company_name),
            Some(role),
            Some(revenue_range),
            Some(currently_building),
            Some(hopes_to_gain),
        ) => Ok(ValidatedApplication {
            full_name,
            email,
            phone,
            company_name,
            role,
            website,
            revenue_range,
            currently_building,
            hopes_to_gain,
            referral_source,
        }),
        _ => {
            // A failed check always records an error, so this arm is
            // unreachable; report rather than panic if that ever breaks.
            let mut errors = FieldErrors::new();
            push(&mut errors, "form", "Invalid submission".to_string());
            Err(errors)
        }
    }
}

fn push(errors: &mut FieldErrors, field: &'static str, message: String) {
    errors.entry(field).or_default().push(message);
}

/// Missing form fields arrive as absent keys; the form layer also submits
/// untouched inputs as empty strings. Both are validated as empty.
fn raw(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn check_full_name(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let value = raw(value);
    let len = value.chars().count();
    let mut ok = true;

    if len < NAME_MIN {
        push(
            errors,
            "fullName",
            "Full name must be at least 2 characters".to_string(),
        );
        ok = false;
    }
    if len > NAME_MAX {
        push(
            errors,
            "fullName",
            "Full name must be less than 100 characters".to_string(),
        );
        ok = false;
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphabetic() || c.is_whitespace() || matches!(c, '-' | '\'' | '.'))
    {
        push(
            errors,
            "fullName",
            "Full name can only contain letters, spaces, hyphens, apostrophes, and periods"
                .to_string(),
        );
        ok = false;
    }

    ok.then(|| value.to_string())
}

fn check_email(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let value = raw(value);
    let mut ok = true;

    if value.chars().count() > EMAIL_MAX {
        push(
            errors,
            "email",
            "Email must be less than 255 characters".to_string(),
        );
        ok = false;
    }
    if !is_valid_email(value) {
        push(
            errors,
            "email",
            "Please enter a valid email address".to_string(),
        );
        ok = false;
    }

    ok.then(|| value.to_string())
}

/// Syntax-only email check: one `@`, a non-empty local part, and a dotted
/// domain with non-empty labels. Deliverability is not this layer's job.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    domain
        .split('.')
        .all(|label| !label.is_empty() && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
}

fn check_phone(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let value = raw(value);
    let len = value.chars().count();
    let mut ok = true;

    if len < PHONE_MIN {
        push(
            errors,
            "phone",
            "Phone number must be at least 10 digits".to_string(),
        );
        ok = false;
    }
    if len > PHONE_MAX {
        push(
            errors,
            "phone",
            "Phone number must be less than 20 characters".to_string(),
        );
        ok = false;
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || c.is_whitespace() || matches!(c, '+' | '-' | '(' | ')'))
    {
        push(
            errors,
            "phone",
            "Phone number can only contain digits, spaces, and formatting characters".to_string(),
        );
        ok = false;
    }

    ok.then(|| value.to_string())
}

fn check_company_name(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let value = raw(value);
    let len = value.chars().count();
    let mut ok = true;

    if len < COMPANY_MIN {
        push(
            errors,
            "companyName",
            "Company name must be at least 2 characters".to_string(),
        );
        ok = false;
    }
    if len > COMPANY_MAX {
        push(
            errors,
            "companyName",
            "Company name must be less than 200 characters".to_string(),
        );
        ok = false;
    }

    ok.then(|| value.to_string())
}

fn check_role(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let value = raw(value);
    let len = value.chars().count();
    let mut ok = true;

    if len < ROLE_MIN {
        push(errors, "role", "Role must be at least 2 characters".to_string());
        ok = false;
    }
    if len > ROLE_MAX {
        push(
            errors,
            "role",
            "Role must be less than 100 characters".to_string(),
        );
        ok = false;
    }

    ok.then(|| value.to_string())
}

/// Empty or absent means "not provided"; anything else must parse as an
/// absolute http(s) URL with a host.
fn check_website(value: Option<&str>, errors: &mut FieldErrors) -> Option<Url> {
    let value = raw(value);
    if value.is_empty() {
        return None;
    }

    match Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some() => {
            Some(parsed)
        }
        _ => {
            debug!(website = %value, "invalid website URL");
            push(
                errors,
                "website",
                "Please enter a valid URL (including https://)".to_string(),
            );
            None
        }
    }
}

fn check_revenue_range(value: Option<&str>, errors: &mut FieldErrors) -> Option<RevenueRange> {
    match raw(value).parse() {
        Ok(range) => Some(range),
        Err(UnknownLabel(_)) => {
            push(
                errors,
                "revenueRange",
                "Please select your annual revenue range".to_string(),
            );
            None
        }
    }
}

fn check_essay(
    field: &'static str,
    value: Option<&str>,
    min_message: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let value = raw(value);
    let len = value.chars().count();
    let mut ok = true;

    if len < ESSAY_MIN {
        push(errors, field, min_message.to_string());
        ok = false;
    }
    if len > ESSAY_MAX {
        push(
            errors,
            field,
            "Please keep your response under 2000 characters".to_string(),
        );
        ok = false;
    }

    ok.then(|| value.to_string())
}

fn check_referral_source(value: Option<&str>, errors: &mut FieldErrors) -> Option<ReferralSource> {
    let value = raw(value);
    if value.is_empty() {
        return None;
    }

    match value.parse() {
        Ok(source) => Some(source),
        Err(UnknownLabel(_)) => {
            push(
                errors,
                "referralSource",
                "Please select how you heard about us".to_string(),
            );
            None
        }
    }
}

/// Standalone honeypot rule: any content is a violation. The orchestrator
/// intercepts tripped honeypots before validation runs, so this only
/// fires when the validator is invoked directly.
fn check_honeypot(value: Option<&str>, errors: &mut FieldErrors) {
    if !raw(value).is_empty() {
        push(errors, "honeypot", "Invalid submission".to_string());
    }
}
