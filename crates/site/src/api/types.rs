//! Wire types for the Afritheatre REST API.
//!
//! The API owns these shapes; fields it may omit are defaulted rather than
//! rejected.

use afritheatre_core::{ActivityId, Role, UserRecord, VenueId};
use serde::{Deserialize, Deserializer, Serialize};

/// Read an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub phone: &'a str,
}

/// Successful credential exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// Opaque bearer token.
    pub token: String,
    /// Owner of the token.
    pub user: UserRecord,
}

/// Fields an admin may change on a user account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Venues
// ─────────────────────────────────────────────────────────────────────────────

/// A performance venue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Venue {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<VenueId>,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_county: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body of `POST /api/venues` and `PUT /api/venues/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueInput {
    pub county: String,
    pub sub_county: String,
    pub area: String,
    pub name: String,
    pub capacity: u32,
    pub map_link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Theatre activities
// ─────────────────────────────────────────────────────────────────────────────

/// One recorded theatre activity.
///
/// Every descriptive field is free text as captured by the data-collection
/// form; an empty string means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TheatreActivity {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ActivityId>,
    #[serde(deserialize_with = "null_as_default")]
    pub month: String,
    #[serde(deserialize_with = "null_as_default")]
    pub week: String,
    /// Event date, `YYYY-MM-DD` when supplied.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    /// `public` or `private`.
    #[serde(deserialize_with = "null_as_default")]
    pub sector: String,
    /// `new` or `existing`.
    #[serde(deserialize_with = "null_as_default")]
    pub company_status: String,
    /// `performance`, `capacity` or `outreach`.
    #[serde(deserialize_with = "null_as_default")]
    pub activity_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nature: String,
    #[serde(deserialize_with = "null_as_default")]
    pub event_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub county: String,
    #[serde(deserialize_with = "null_as_default")]
    pub venue: String,
    #[serde(deserialize_with = "null_as_default")]
    pub new_venue: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_sessions: String,
    #[serde(deserialize_with = "null_as_default")]
    pub jobs_created: String,
    #[serde(deserialize_with = "null_as_default")]
    pub indirect_jobs: String,
    #[serde(deserialize_with = "null_as_default")]
    pub direct_jobs: String,
    /// `free` or `paid`.
    #[serde(deserialize_with = "null_as_default")]
    pub entry_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub booking_platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub new_booking_platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_methods: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub other_language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub contact_person: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// `{ "data": [...] }` envelope used by the activity listings.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct DataEnvelope<T> {
    #[serde(default = "Vec::new", deserialize_with = "null_as_default")]
    pub data: Vec<T>,
}

/// Response of `POST /api/upload`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    /// Public URL of the stored file.
    pub url: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_accepts_mongo_id_and_missing_optionals() {
        let venue: Venue = serde_json::from_str(
            r#"{"_id":"v1","county":"Nairobi","name":"Kenya National Theatre","capacity":350}"#,
        )
        .unwrap();

        assert_eq!(venue.id.unwrap().as_str(), "v1");
        assert_eq!(venue.capacity, Some(350));
        assert!(venue.sub_county.is_none());
    }

    #[test]
    fn test_venue_input_serializes_camel_case() {
        let input = VenueInput {
            county: "Kisumu".to_string(),
            sub_county: "Central".to_string(),
            name: "Hall".to_string(),
            capacity: 200,
            ..VenueInput::default()
        };
        let json = serde_json::to_value(&input).unwrap();

        assert_eq!(json["subCounty"], "Central");
        assert_eq!(json["capacity"], 200);
        assert!(json.get("imageUrl").is_none());
    }

    #[test]
    fn test_activity_envelope() {
        let envelope: DataEnvelope<TheatreActivity> = serde_json::from_str(
            r#"{"data":[{"_id":"a1","eventName":"Ngoma","companyName":"Heva","jobsCreated":"12","paymentMethods":["mpesa"]}]}"#,
        )
        .unwrap();

        let activity = envelope.data.first().unwrap();
        assert_eq!(activity.event_name, "Ngoma");
        assert_eq!(activity.jobs_created, "12");
        assert_eq!(activity.payment_methods, vec!["mpesa".to_string()]);
        assert!(activity.county.is_empty());
    }

    #[test]
    fn test_null_fields_do_not_drop_the_listing() {
        let envelope: DataEnvelope<TheatreActivity> = serde_json::from_str(
            r#"{"data":[{"_id":"a1","eventName":"Ok"},{"_id":"a2","eventName":"Bad","notes":null,"paymentMethods":null,"jobsCreated":null}]}"#,
        )
        .unwrap();

        assert_eq!(envelope.data.len(), 2);
        let second = envelope.data.get(1).unwrap();
        assert_eq!(second.event_name, "Bad");
        assert!(second.notes.is_empty());
        assert!(second.payment_methods.is_empty());
        assert!(second.jobs_created.is_empty());
    }

    #[test]
    fn test_venue_null_name_reads_as_empty() {
        let venue: Venue =
            serde_json::from_str(r#"{"_id":"v2","county":null,"name":null,"area":null}"#).unwrap();

        assert!(venue.county.is_empty());
        assert!(venue.name.is_empty());
        assert!(venue.area.is_none());
    }

    #[test]
    fn test_activity_submission_omits_id() {
        let activity = TheatreActivity {
            event_name: "Ngoma".to_string(),
            ..TheatreActivity::default()
        };
        let json = serde_json::to_value(&activity).unwrap();

        assert!(json.get("id").is_none());
        assert_eq!(json["eventName"], "Ngoma");
        assert_eq!(json["companyName"], "");
    }
}
