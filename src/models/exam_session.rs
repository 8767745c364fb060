use chrono::{DateTime, NaiveDateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ExamSession {
    pub id: Uuid,
    pub course_id: Uuid,
    pub admin_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Session creation payload. Times are campus wall-clock (no offset) and are
/// interpreted in the configured campus timezone before storage.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub course_code: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}

/// Session joined with its course code, as listed on the invigilator console.
#[derive(Debug, sqlx::FromRow)]
pub struct SessionWithCourse {
    pub id: Uuid,
    pub course_id: Uuid,
    pub admin_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub course_code: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub course_code: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}
