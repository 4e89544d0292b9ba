//! Validation rules for RSVP submissions.
//!
//! The same rules apply wherever a submission is checked. Name, attendance
//! and privacy checks always run; the remaining questions are only asked of
//! guests who answered `yes`, so only that branch enforces them.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

use crate::models::RsvpSubmission;

pub mod domains;

pub use domains::{default_allow_list, is_email_allowed, is_email_syntax_valid};

const MIN_NAME_LEN: usize = 2;
const MIN_INTOLERANCES_LEN: usize = 3;
const MIN_GUESTS_LEN: usize = 2;

const CHOOSE_YES_NO: &str = "Please choose Yes or No";

/// A single violated rule, keyed by the camelCase field path
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Outcome of validating one submission. Errors keep rule order.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationReport {
    errors: Vec<FieldError>,
}

impl ValidationReport {
    fn push(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }
}

/// Tunable parts of the rule set
#[derive(Debug, Clone)]
pub struct ValidationRules {
    /// Lowercased email domains accepted from attending guests
    pub allowed_domains: Arc<HashSet<String>>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            allowed_domains: default_allow_list(),
        }
    }
}

impl ValidationRules {
    pub fn with_allowed_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_domains: Arc::new(
                domains
                    .into_iter()
                    .map(|d| d.as_ref().trim().to_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect(),
            ),
        }
    }
}

fn too_short(value: Option<&str>, min: usize) -> bool {
    value.map(|v| v.trim().chars().count()).unwrap_or(0) < min
}

/// Checks a submission against every rule and reports all violations
pub fn validate(candidate: &RsvpSubmission, rules: &ValidationRules) -> ValidationReport {
    let mut report = ValidationReport::default();

    if too_short(Some(candidate.first_name.as_str()), MIN_NAME_LEN) {
        report.push("firstName", "First name is required");
    }
    if too_short(Some(candidate.last_name.as_str()), MIN_NAME_LEN) {
        report.push("lastName", "Last name is required");
    }
    if candidate.attendance_status.is_none() {
        report.push("attendanceStatus", "Please tell us whether you will attend");
    }
    if !candidate.privacy_accepted {
        report.push(
            "privacyAccepted",
            "You must accept the privacy policy to confirm.",
        );
    }

    if candidate.is_attending() {
        check_attending(candidate, rules, &mut report);
    }

    report
}

fn check_attending(candidate: &RsvpSubmission, rules: &ValidationRules, report: &mut ValidationReport) {
    let email_ok = candidate
        .email_address()
        .map(|e| is_email_syntax_valid(e) && is_email_allowed(e, &rules.allowed_domains))
        .unwrap_or(false);
    if !email_ok {
        report.push("email", "Please enter a valid email");
    }

    match candidate.has_intolerances {
        None => report.push("hasIntolerances", CHOOSE_YES_NO),
        Some(true) if too_short(candidate.intolerances_text.as_deref(), MIN_INTOLERANCES_LEN) => {
            report.push("intolerancesText", "Please specify your intolerances")
        }
        Some(_) => {}
    }

    match candidate.has_food_preferences {
        None => report.push("hasFoodPreferences", CHOOSE_YES_NO),
        Some(true) if candidate.food_preference_type.is_none() => {
            report.push("foodPreferenceType", "Please choose an option")
        }
        Some(_) => {}
    }

    if candidate.needs_hotel.is_none() {
        report.push("needsHotel", CHOOSE_YES_NO);
    }

    if candidate.has_guests == Some(true) && too_short(candidate.guests.as_deref(), MIN_GUESTS_LEN) {
        report.push("guests", "Please enter the names of your companions");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AttendanceStatus, FoodPreference};

    fn attending_guest() -> RsvpSubmission {
        RsvpSubmission {
            first_name: "Anna".to_string(),
            last_name: "Bianchi".to_string(),
            email: Some("anna@gmail.com".to_string()),
            attendance_status: Some(AttendanceStatus::Yes),
            has_intolerances: Some(true),
            intolerances_text: Some("celiac".to_string()),
            has_food_preferences: Some(false),
            needs_hotel: Some(false),
            privacy_accepted: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_declining_guest_is_valid_without_email() {
        let candidate = RsvpSubmission {
            first_name: "Mario".to_string(),
            last_name: "Rossi".to_string(),
            attendance_status: Some(AttendanceStatus::No),
            privacy_accepted: true,
            ..Default::default()
        };

        let report = validate(&candidate, &ValidationRules::default());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors());
    }

    #[test]
    fn test_non_attending_branches_skip_attending_checks() {
        for status in [AttendanceStatus::No, AttendanceStatus::Maybe] {
            let candidate = RsvpSubmission {
                first_name: "Mario".to_string(),
                last_name: "Rossi".to_string(),
                email: Some("not an email".to_string()),
                attendance_status: Some(status),
                has_intolerances: Some(true),
                has_food_preferences: Some(true),
                has_guests: Some(true),
                privacy_accepted: true,
                ..Default::default()
            };

            let report = validate(&candidate, &ValidationRules::default());
            for field in [
                "email",
                "hasIntolerances",
                "intolerancesText",
                "hasFoodPreferences",
                "foodPreferenceType",
                "needsHotel",
                "guests",
            ] {
                assert!(!report.has_error(field), "{field} flagged for {status:?}");
            }
        }
    }

    #[test]
    fn test_incomplete_attending_guest_collects_every_error() {
        let candidate = RsvpSubmission {
            first_name: "A".to_string(),
            attendance_status: Some(AttendanceStatus::Yes),
            privacy_accepted: true,
            ..Default::default()
        };

        let report = validate(&candidate, &ValidationRules::default());
        assert_eq!(
            report.fields(),
            vec![
                "firstName",
                "lastName",
                "email",
                "hasIntolerances",
                "hasFoodPreferences",
                "needsHotel"
            ]
        );
    }

    #[test]
    fn test_complete_attending_guest_is_valid() {
        let report = validate(&attending_guest(), &ValidationRules::default());
        assert!(report.is_valid(), "unexpected errors: {:?}", report.errors());
    }

    #[test]
    fn test_intolerances_text_required_when_declared() {
        for text in [None, Some(""), Some("ab"), Some("  ab  ")] {
            let candidate = RsvpSubmission {
                intolerances_text: text.map(str::to_string),
                ..attending_guest()
            };
            let report = validate(&candidate, &ValidationRules::default());
            assert_eq!(report.fields(), vec!["intolerancesText"], "text={text:?}");
        }
    }

    #[test]
    fn test_explicit_false_skips_dependent_fields() {
        let candidate = RsvpSubmission {
            has_intolerances: Some(false),
            intolerances_text: None,
            has_food_preferences: Some(false),
            food_preference_type: None,
            has_guests: Some(false),
            ..attending_guest()
        };
        assert!(validate(&candidate, &ValidationRules::default()).is_valid());
    }

    #[test]
    fn test_food_preference_type_required_when_declared() {
        let missing = RsvpSubmission {
            has_food_preferences: Some(true),
            ..attending_guest()
        };
        assert_eq!(
            validate(&missing, &ValidationRules::default()).fields(),
            vec!["foodPreferenceType"]
        );

        let chosen = RsvpSubmission {
            has_food_preferences: Some(true),
            food_preference_type: Some(FoodPreference::Vegan),
            ..attending_guest()
        };
        assert!(validate(&chosen, &ValidationRules::default()).is_valid());
    }

    #[test]
    fn test_email_outside_allow_list_is_rejected() {
        let candidate = RsvpSubmission {
            email: Some("anna@bigcorp.example".to_string()),
            ..attending_guest()
        };
        assert_eq!(
            validate(&candidate, &ValidationRules::default()).fields(),
            vec!["email"]
        );

        let rules = ValidationRules::with_allowed_domains(["BigCorp.example"]);
        assert!(validate(&candidate, &rules).is_valid());
    }

    #[test]
    fn test_guest_names_required_when_bringing_guests() {
        let candidate = RsvpSubmission {
            has_guests: Some(true),
            guests: Some(" ".to_string()),
            ..attending_guest()
        };
        assert_eq!(
            validate(&candidate, &ValidationRules::default()).fields(),
            vec!["guests"]
        );
    }

    #[test]
    fn test_privacy_must_be_accepted_for_every_status() {
        let candidate = RsvpSubmission {
            first_name: "Mario".to_string(),
            last_name: "Rossi".to_string(),
            attendance_status: Some(AttendanceStatus::Maybe),
            privacy_accepted: false,
            ..Default::default()
        };
        assert_eq!(
            validate(&candidate, &ValidationRules::default()).fields(),
            vec!["privacyAccepted"]
        );
    }

    #[test]
    fn test_default_rules_share_the_built_in_list() {
        let rules = ValidationRules::default();
        assert!(Arc::ptr_eq(&rules.allowed_domains, &default_allow_list()));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let candidate = RsvpSubmission {
            first_name: "A".to_string(),
            attendance_status: Some(AttendanceStatus::Yes),
            ..Default::default()
        };
        let rules = ValidationRules::default();
        assert_eq!(validate(&candidate, &rules), validate(&candidate, &rules));
    }
}
