use crate::auth::CurrentAdmin;
use crate::database::exam_session::ExamSessionRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::database::student::StudentRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{AuthenticateRequest, AuthenticateResponse, AuthenticationOutcome};
use crate::models::error_log::{DisputeRequest, DisputeResponse};
use crate::service::attendance::{AttendanceService, SystemClock, session_owned_by};
use crate::service::biometric::BiometricMatcher;
use rocket::serde::json::Json;
use rocket::{State, http::Status, routes};
use sqlx::PgPool;
use std::sync::Arc;
use validator::Validate;

#[rocket::post("/authenticate", data = "<payload>")]
pub async fn authenticate(
    pool: &State<PgPool>,
    matcher: &State<Arc<dyn BiometricMatcher>>,
    current_admin: CurrentAdmin,
    payload: Json<AuthenticateRequest>,
) -> Result<(Status, Json<AuthenticateResponse>), AppError> {
    let repo = PostgresRepository { pool: pool.inner().clone() };

    // Invigilators may only run authentication against their own sessions.
    let session = repo.get_session(&payload.session_id).await?.ok_or(AppError::SessionNotFound)?;
    session_owned_by(&session, &current_admin.0.id)?;

    let clock = SystemClock;
    let service = AttendanceService::new(&repo, &clock, matcher.inner().as_ref());

    match service.authenticate(&payload).await? {
        AuthenticationOutcome::Authenticated(attendance) => {
            let name = repo.get_student(&attendance.matriculation_number).await?.map(|s| s.name);
            Ok((
                Status::Ok,
                Json(AuthenticateResponse {
                    authenticated: true,
                    matriculation_number: attendance.matriculation_number,
                    name,
                    recorded_at: Some(attendance.recorded_at),
                    rejection: None,
                    details: None,
                }),
            ))
        }
        AuthenticationOutcome::Rejected(log) => Ok((
            Status::Forbidden,
            Json(AuthenticateResponse {
                authenticated: false,
                matriculation_number: log.matriculation_number.clone().unwrap_or_default(),
                name: None,
                recorded_at: None,
                rejection: log.reason(),
                details: Some(log.details),
            }),
        )),
    }
}

#[rocket::post("/dispute", data = "<payload>")]
pub async fn dispute(
    pool: &State<PgPool>,
    matcher: &State<Arc<dyn BiometricMatcher>>,
    payload: Json<DisputeRequest>,
) -> Result<(Status, Json<DisputeResponse>), AppError> {
    payload.validate()?;

    let repo = PostgresRepository { pool: pool.inner().clone() };
    let clock = SystemClock;
    let service = AttendanceService::new(&repo, &clock, matcher.inner().as_ref());

    let log = service.dispute(&payload).await?;
    Ok((
        Status::Created,
        Json(DisputeResponse {
            id: log.id,
            error_type: log.error_type,
        }),
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![authenticate, dispute]
}
