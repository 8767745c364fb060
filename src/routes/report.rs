use crate::auth::CurrentAdmin;
use crate::database::exam_session::ExamSessionRepository;
use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::routes::CsvAttachment;
use crate::service::attendance::session_owned_by;
use crate::service::report::ReportService;
use rocket::{State, routes};
use sqlx::PgPool;
use uuid::Uuid;

#[rocket::get("/attendance/<session_id>")]
pub async fn attendance_report(pool: &State<PgPool>, current_admin: CurrentAdmin, session_id: &str) -> Result<CsvAttachment, AppError> {
    let session_id = Uuid::parse_str(session_id)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let session = repo.get_session(&session_id).await?.ok_or(AppError::SessionNotFound)?;
    session_owned_by(&session, &current_admin.0.id)?;

    let content = ReportService::new(&repo).attendance_report(&session).await?;
    Ok(CsvAttachment {
        filename: format!("attendance_report_{}.csv", session.id),
        content,
    })
}

#[rocket::get("/errors/<session_id>")]
pub async fn error_report(pool: &State<PgPool>, current_admin: CurrentAdmin, session_id: &str) -> Result<CsvAttachment, AppError> {
    let session_id = Uuid::parse_str(session_id)?;
    let repo = PostgresRepository { pool: pool.inner().clone() };

    let session = repo.get_session(&session_id).await?.ok_or(AppError::SessionNotFound)?;
    session_owned_by(&session, &current_admin.0.id)?;

    let content = ReportService::new(&repo).error_report(&session).await?;
    Ok(CsvAttachment {
        filename: format!("error_report_{}.csv", session.id),
        content,
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![attendance_report, error_report]
}
