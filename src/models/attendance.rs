use crate::models::error_log::{ErrorLog, RejectionReason};
use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A successful biometric authentication for a student in an exam session.
/// At most one row exists per `(session_id, matriculation_number)`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Attendance {
    pub id: Uuid,
    pub session_id: Uuid,
    pub matriculation_number: String,
    pub authenticated: bool,
    pub recorded_at: DateTime<Utc>,
}

/// Attendance row joined with the student's name, for report rendering.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendedStudent {
    pub matriculation_number: String,
    pub name: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct AuthenticateRequest {
    pub session_id: Uuid,
    pub matriculation_number: String,
    /// Live fingerprint sample captured at the exam hall.
    pub fingerprint_sample: String,
}

/// Decision of the attendance validator. Every attempt resolves to exactly
/// one variant and writes exactly one row (Attendance or ErrorLog).
#[derive(Debug)]
pub enum AuthenticationOutcome {
    Authenticated(Attendance),
    Rejected(ErrorLog),
}

#[derive(Debug, Serialize)]
pub struct AuthenticateResponse {
    pub authenticated: bool,
    pub matriculation_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<RejectionReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
