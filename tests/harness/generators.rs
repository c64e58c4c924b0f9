// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use membership_intake::schema::ApplicationPayload;

/// Generate a pool of identity strings (dotted-quad style, 10.x.x.x).
pub fn generate_identities(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let a = (i >> 16) & 0xFF;
            let b = (i >> 8) & 0xFF;
            let c = i & 0xFF;
            format!("10.{a}.{b}.{c}")
        })
        .collect()
}

/// A fully valid application payload, unique per index.
pub fn valid_payload(index: usize) -> ApplicationPayload {
    ApplicationPayload {
        full_name: Some("Jane Doe".to_string()),
        email: Some(format!("applicant-{index}@acme.example")),
        phone: Some("+1 305 555 0100".to_string()),
        company_name: Some(format!("Venture {index} LLC")),
        role: Some("Founder".to_string()),
        website: Some("https://acme.example".to_string()),
        revenue_range: Some("$1M - $5M".to_string()),
        currently_building: Some(
            "A vertically integrated supply platform for regional food producers.".to_string(),
        ),
        hopes_to_gain: Some(
            "Candid conversations with operators who have scaled past this stage.".to_string(),
        ),
        referral_source: Some("Referral".to_string()),
        honeypot: Some(String::new()),
    }
}

/// A scripted submission: valid everywhere except the trap field.
pub fn bot_payload(index: usize) -> ApplicationPayload {
    let mut payload = valid_payload(index);
    payload.honeypot = Some(format!("https://spam-{index}.example/offer"));
    payload
}

/// A payload violating several field rules at once.
pub fn garbage_payload(index: usize) -> ApplicationPayload {
    ApplicationPayload {
        full_name: Some("X".to_string()),
        email: Some(format!("not-an-email-{index}")),
        phone: Some("call me".to_string()),
        company_name: None,
        role: Some(String::new()),
        website: Some("ftp://files.example/".to_string()),
        revenue_range: Some("lots".to_string()),
        currently_building: Some("stuff".to_string()),
        hopes_to_gain: None,
        referral_source: Some("A guy".to_string()),
        honeypot: Some(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use membership_intake::schema;

    #[test]
    fn identities_are_unique() {
        let identities = generate_identities(256);
        let unique: std::collections::HashSet<_> = identities.iter().collect();
        assert_eq!(unique.len(), 256);
    }

    #[test]
    fn valid_payload_actually_validates() {
        assert!(schema::validate(&valid_payload(0)).is_ok());
    }

    #[test]
    fn garbage_payload_actually_fails() {
        let errors = schema::validate(&garbage_payload(0)).unwrap_err();
        assert!(errors.len() >= 5);
    }
}
