use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

pub mod record;

pub use record::SheetRecord;

/// Returns the current time as an RFC 3339 string
pub fn now_str() -> String {
    Utc::now().to_rfc3339()
}

/// Reads an explicit `null` as the type's default value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Guest's answer to "will you attend?"
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Yes,
    No,
    Maybe,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Yes => "yes",
            AttendanceStatus::No => "no",
            AttendanceStatus::Maybe => "maybe",
        }
    }
}

/// Dietary choice offered when a guest declares food preferences.
/// The Italian form labels are accepted on input.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodPreference {
    #[serde(alias = "Vegetariano")]
    Vegetarian,
    #[serde(alias = "Vegano")]
    Vegan,
    #[serde(alias = "Altro")]
    Other,
    #[serde(rename = "None", alias = "NO")]
    NoPreference,
}

/// One RSVP as submitted by the invite page.
///
/// Every field is optional at the type level so that missing answers surface
/// as validation errors instead of decode failures. An absent key and an
/// explicit `null` both read as "not answered": `None` for the optional
/// answers, empty or `false` for the names and the privacy flag.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RsvpSubmission {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, alias = "isAttending")]
    pub attendance_status: Option<AttendanceStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maybe_reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_guests: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<String>,

    #[serde(default)]
    pub has_intolerances: Option<bool>,
    #[serde(default, alias = "intolerances", skip_serializing_if = "Option::is_none")]
    pub intolerances_text: Option<String>,

    #[serde(default)]
    pub has_food_preferences: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_preference_type: Option<FoodPreference>,

    #[serde(default)]
    pub needs_hotel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub privacy_accepted: bool,
}

impl RsvpSubmission {
    pub fn is_attending(&self) -> bool {
        self.attendance_status == Some(AttendanceStatus::Yes)
    }

    /// Non-blank email address, if one was given
    pub fn email_address(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

/// Body of `POST /api/rsvp`
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub rsvp_data: RsvpSubmission,
    #[serde(default)]
    pub telemetry: Option<serde_json::Value>,
}
