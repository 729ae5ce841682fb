//! Form payloads and their validation.
//!
//! Every form deserializes leniently (missing fields become empty strings)
//! and is checked by a `validate` method that either produces the API
//! payload or a [`FormErrors`] listing what to fix.

use afritheatre_core::{Email, Role};
use serde::Deserialize;
use thiserror::Error;

use crate::api::{TheatreActivity, UserUpdate, VenueInput};
use crate::listing::leading_int;

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum length of a contact message.
pub const MIN_MESSAGE_LEN: usize = 3;

/// Validation failures keyed by form field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", self.summary())]
pub struct FormErrors {
    errors: Vec<(&'static str, String)>,
}

impl FormErrors {
    /// Record a problem with `field`.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push((field, message.into()));
    }

    /// `true` when nothing was recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message recorded for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    /// All messages joined for a single banner.
    #[must_use]
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>()
            .join(". ")
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() { Ok(value()) } else { Err(self) }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// =============================================================================
// Auth
// =============================================================================

/// Sign-in form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Both fields are required; nothing else is checked locally.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` if either field is empty or the email is blank.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if is_blank(&self.email) || self.password.is_empty() {
            errors.add("email", "Email and password are required");
        }
        errors.into_result(|| ())
    }
}

/// Sign-up form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Check the password pair, then the identity fields.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` for mismatched or short passwords, a missing
    /// name, or an invalid email.
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();

        if self.password != self.confirm_password {
            errors.add("password", "Passwords do not match");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        if is_blank(&self.name) {
            errors.add("name", "Please enter your name");
        }
        if Email::parse(self.email.trim()).is_err() {
            errors.add("email", "Please enter a valid email address");
        }

        errors.into_result(|| ())
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Contact form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A contact message that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// # Errors
    ///
    /// Returns `FormErrors` naming every field that failed.
    pub fn validate(&self) -> Result<ContactMessage, FormErrors> {
        let mut errors = FormErrors::default();

        if self.firstname.is_empty() {
            errors.add("firstname", "Please enter your First name");
        }
        if self.lastname.is_empty() {
            errors.add("lastname", "Please enter your Last name");
        }
        let email = Email::parse(self.email.trim());
        if email.is_err() {
            errors.add("email", "Please enter a valid email address");
        }
        if self.subject.is_empty() {
            errors.add("subject", "Please enter a subject");
        }
        if self.message.chars().count() < MIN_MESSAGE_LEN {
            errors.add(
                "message",
                format!("Message must be at least {MIN_MESSAGE_LEN} characters long"),
            );
        }

        match email {
            Ok(email) if errors.is_empty() => Ok(ContactMessage {
                name: format!("{} {}", self.firstname.trim(), self.lastname.trim()),
                email,
                subject: self.subject.clone(),
                message: self.message.clone(),
            }),
            _ => Err(errors),
        }
    }
}

// =============================================================================
// Venues
// =============================================================================

/// Venue create/edit form. Capacity arrives as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub county: String,
    pub sub_county: String,
    pub area: String,
    pub name: String,
    pub capacity: String,
    pub map_link: String,
    pub image_url: String,
}

impl VenueForm {
    /// Trim every field and parse the capacity.
    ///
    /// # Errors
    ///
    /// Returns `FormErrors` when county, name or capacity is missing, or the
    /// capacity is not a non-negative whole number.
    pub fn validate(&self) -> Result<VenueInput, FormErrors> {
        let mut errors = FormErrors::default();

        if is_blank(&self.county) || is_blank(&self.name) || is_blank(&self.capacity) {
            errors.add("form", "Please fill in all required fields");
            return Err(errors);
        }

        let capacity = leading_int(&self.capacity).and_then(|n| u32::try_from(n).ok());
        let Some(capacity) = capacity else {
            errors.add("capacity", "Please enter a valid number for capacity");
            return Err(errors);
        };

        let image_url = self.image_url.trim();
        Ok(VenueInput {
            county: self.county.trim().to_string(),
            sub_county: self.sub_county.trim().to_string(),
            area: self.area.trim().to_string(),
            name: self.name.trim().to_string(),
            capacity,
            map_link: self.map_link.trim().to_string(),
            image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        })
    }
}

// =============================================================================
// Theatre activities
// =============================================================================

/// Data-collection form for one theatre activity.
///
/// `payment_methods` is a comma-separated list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ActivityForm {
    pub month: String,
    pub week: String,
    pub date: String,
    pub year: String,
    pub time: String,
    pub company_name: String,
    pub sector: String,
    pub company_status: String,
    pub activity_type: String,
    pub nature: String,
    pub event_name: String,
    pub county: String,
    pub venue: String,
    pub new_venue: String,
    pub total_sessions: String,
    pub jobs_created: String,
    pub indirect_jobs: String,
    pub direct_jobs: String,
    pub entry_type: String,
    pub booking_platform: String,
    pub new_booking_platform: String,
    pub payment_methods: String,
    pub language: String,
    pub other_language: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

impl ActivityForm {
    /// Prefill from an existing record (edit page).
    #[must_use]
    pub fn from_activity(a: &TheatreActivity) -> Self {
        Self {
            month: a.month.clone(),
            week: a.week.clone(),
            date: a.date.clone(),
            year: a.year.clone(),
            time: a.time.clone(),
            company_name: a.company_name.clone(),
            sector: a.sector.clone(),
            company_status: a.company_status.clone(),
            activity_type: a.activity_type.clone(),
            nature: a.nature.clone(),
            event_name: a.event_name.clone(),
            county: a.county.clone(),
            venue: a.venue.clone(),
            new_venue: a.new_venue.clone(),
            total_sessions: a.total_sessions.clone(),
            jobs_created: a.jobs_created.clone(),
            indirect_jobs: a.indirect_jobs.clone(),
            direct_jobs: a.direct_jobs.clone(),
            entry_type: a.entry_type.clone(),
            booking_platform: a.booking_platform.clone(),
            new_booking_platform: a.new_booking_platform.clone(),
            payment_methods: a.payment_methods.join(", "),
            language: a.language.clone(),
            other_language: a.other_language.clone(),
            contact_person: a.contact_person.clone(),
            email: a.email.clone(),
            phone: a.phone.clone(),
            notes: a.notes.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns `FormErrors` when company name, event name or contact person is
    /// missing, or a supplied email is invalid.
    pub fn validate(&self) -> Result<TheatreActivity, FormErrors> {
        let mut errors = FormErrors::default();

        if is_blank(&self.company_name) {
            errors.add("company_name", "Please enter the company name");
        }
        if is_blank(&self.event_name) {
            errors.add("event_name", "Please enter the event name");
        }
        if is_blank(&self.contact_person) {
            errors.add("contact_person", "Please enter a contact person");
        }
        if !is_blank(&self.email) && Email::parse(self.email.trim()).is_err() {
            errors.add("email", "Please enter a valid email address");
        }

        errors.into_result(|| self.to_activity())
    }

    fn to_activity(&self) -> TheatreActivity {
        let t = |s: &String| s.trim().to_string();
        TheatreActivity {
            id: None,
            month: t(&self.month),
            week: t(&self.week),
            date: t(&self.date),
            year: t(&self.year),
            time: t(&self.time),
            company_name: t(&self.company_name),
            sector: t(&self.sector),
            company_status: t(&self.company_status),
            activity_type: t(&self.activity_type),
            nature: t(&self.nature),
            event_name: t(&self.event_name),
            county: t(&self.county),
            venue: t(&self.venue),
            new_venue: t(&self.new_venue),
            total_sessions: t(&self.total_sessions),
            jobs_created: t(&self.jobs_created),
            indirect_jobs: t(&self.indirect_jobs),
            direct_jobs: t(&self.direct_jobs),
            entry_type: t(&self.entry_type),
            booking_platform: t(&self.booking_platform),
            new_booking_platform: t(&self.new_booking_platform),
            payment_methods: self
                .payment_methods
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            language: t(&self.language),
            other_language: t(&self.other_language),
            contact_person: t(&self.contact_person),
            email: t(&self.email),
            phone: t(&self.phone),
            notes: t(&self.notes),
            created_at: None,
            updated_at: None,
        }
    }
}

// =============================================================================
// Users
// =============================================================================

/// Admin edit form for a user account.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

impl UserForm {
    /// # Errors
    ///
    /// Returns `FormErrors` for a blank name or an invalid email.
    pub fn validate(&self) -> Result<UserUpdate, FormErrors> {
        let mut errors = FormErrors::default();

        if is_blank(&self.name) {
            errors.add("name", "Please enter a name");
        }
        let email = Email::parse(self.email.trim());
        if email.is_err() {
            errors.add("email", "Please enter a valid email address");
        }

        errors.into_result(|| UserUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: Some(self.phone.trim())
                .filter(|p| !p.is_empty())
                .map(String::from),
            role: Some(self.role.trim())
                .filter(|r| !r.is_empty())
                .map(Role::from),
        })
    }
}
