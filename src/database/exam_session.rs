use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::exam_session::{ExamSession, SessionWithCourse};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait ExamSessionRepository {
    async fn create_session(
        &self,
        course_id: &Uuid,
        admin_id: &Uuid,
        start_time: &DateTime<Utc>,
        end_time: &DateTime<Utc>,
    ) -> Result<ExamSession, AppError>;
    async fn get_session(&self, id: &Uuid) -> Result<Option<ExamSession>, AppError>;
    async fn has_overlapping_session(&self, course_id: &Uuid, start_time: &DateTime<Utc>, end_time: &DateTime<Utc>) -> Result<bool, AppError>;
    /// Sessions owned by the admin whose window has not yet closed.
    async fn list_active_sessions(&self, admin_id: &Uuid, now: &DateTime<Utc>) -> Result<Vec<SessionWithCourse>, AppError>;
}

#[async_trait::async_trait]
impl ExamSessionRepository for PostgresRepository {
    async fn create_session(
        &self,
        course_id: &Uuid,
        admin_id: &Uuid,
        start_time: &DateTime<Utc>,
        end_time: &DateTime<Utc>,
    ) -> Result<ExamSession, AppError> {
        let session = sqlx::query_as::<_, ExamSession>(
            r#"
            INSERT INTO exam_sessions (course_id, admin_id, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING id, course_id, admin_id, start_time, end_time
            "#,
        )
        .bind(course_id)
        .bind(admin_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to create exam session", e))?;

        Ok(session)
    }

    async fn get_session(&self, id: &Uuid) -> Result<Option<ExamSession>, AppError> {
        let session = sqlx::query_as::<_, ExamSession>(
            r#"
            SELECT id, course_id, admin_id, start_time, end_time
            FROM exam_sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn has_overlapping_session(&self, course_id: &Uuid, start_time: &DateTime<Utc>, end_time: &DateTime<Utc>) -> Result<bool, AppError> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT COUNT(*)
            FROM exam_sessions
            WHERE course_id = $1 AND start_time <= $3 AND end_time >= $2
            "#,
        )
        .bind(course_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to check session overlap", e))?;

        Ok(row.0 > 0)
    }

    async fn list_active_sessions(&self, admin_id: &Uuid, now: &DateTime<Utc>) -> Result<Vec<SessionWithCourse>, AppError> {
        let sessions = sqlx::query_as::<_, SessionWithCourse>(
            r#"
            SELECT e.id, e.course_id, e.admin_id, e.start_time, e.end_time, c.course_code
            FROM exam_sessions e
            JOIN courses c ON c.id = e.course_id
            WHERE e.admin_id = $1 AND e.end_time >= $2
            ORDER BY e.start_time
            "#,
        )
        .bind(admin_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list sessions", e))?;

        Ok(sessions)
    }
}
