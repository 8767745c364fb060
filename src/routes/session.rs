use crate::auth::CurrentAdmin;
use crate::database::course::CourseRepository;
use crate::database::exam_session::ExamSessionRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::exam_session::{CreateSessionRequest, SessionResponse};
use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use tracing::info;

/// The timezone the exam timetable is published in, parsed once at startup.
pub struct CampusTimezone(pub Tz);

impl CampusTimezone {
    /// Interpret a timetable wall-clock time as UTC. Rejects times that do
    /// not exist or are ambiguous around a DST transition.
    pub fn to_utc(&self, local: &NaiveDateTime) -> Result<chrono::DateTime<Utc>, AppError> {
        self.0
            .from_local_datetime(local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| AppError::BadRequest(format!("Time {} is invalid in timezone {}", local, self.0)))
    }
}

#[rocket::post("/", data = "<payload>")]
pub async fn create_session(
    pool: &State<PgPool>,
    campus_tz: &State<CampusTimezone>,
    current_admin: CurrentAdmin,
    payload: Json<CreateSessionRequest>,
) -> Result<(Status, Json<SessionResponse>), AppError> {
    if payload.start_time >= payload.end_time {
        return Err(AppError::BadRequest("start_time must be before end_time".to_string()));
    }

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let course = repo
        .get_course_by_code(&payload.course_code)
        .await?
        .ok_or_else(|| AppError::CourseNotFound(payload.course_code.clone()))?;
    if course.department_id != current_admin.0.department_id {
        return Err(AppError::DepartmentMismatch);
    }

    let start_time = campus_tz.to_utc(&payload.start_time)?;
    let end_time = campus_tz.to_utc(&payload.end_time)?;

    if repo.has_overlapping_session(&course.id, &start_time, &end_time).await? {
        return Err(AppError::SessionOverlap);
    }

    let session = repo.create_session(&course.id, &current_admin.0.id, &start_time, &end_time).await?;
    info!(session_id = %session.id, course_code = %course.course_code, "exam session created");

    Ok((
        Status::Created,
        Json(SessionResponse {
            session_id: session.id,
            course_code: course.course_code,
            start_time: session.start_time,
            end_time: session.end_time,
        }),
    ))
}

/// Sessions owned by the calling admin whose window has not yet closed.
/// Ended sessions stay in the table for reporting; they are only filtered
/// from this listing.
#[rocket::get("/")]
pub async fn list_sessions(pool: &State<PgPool>, current_admin: CurrentAdmin) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };
    let now = Utc::now();
    let sessions = repo.list_active_sessions(&current_admin.0.id, &now).await?;

    Ok(Json(
        sessions
            .into_iter()
            .map(|s| SessionResponse {
                session_id: s.id,
                course_code: s.course_code,
                start_time: s.start_time,
                end_time: s.end_time,
            })
            .collect(),
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![create_session, list_sessions]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn campus_time_converts_to_utc() {
        // WAT is UTC+1 year-round, no DST.
        let tz = CampusTimezone(chrono_tz::Africa::Lagos);
        let local = NaiveDate::from_ymd_opt(2026, 6, 12).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let utc = tz.to_utc(&local).expect("converts");
        assert_eq!(utc, Utc.with_ymd_and_hms(2026, 6, 12, 8, 0, 0).unwrap());
    }
}
