use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::course::{Course, RosterEntry};
use crate::models::report::EnrollmentListRow;
use uuid::Uuid;

#[async_trait::async_trait]
pub trait CourseRepository {
    async fn get_course(&self, id: &Uuid) -> Result<Option<Course>, AppError>;
    async fn get_course_by_code(&self, course_code: &str) -> Result<Option<Course>, AppError>;
    async fn list_courses_for_department(&self, department_id: &Uuid) -> Result<Vec<Course>, AppError>;
    /// Insert or refresh a roster entry; a re-upload updates the CA mark.
    async fn upsert_roster_entry(&self, course_id: &Uuid, matriculation_number: &str, ca_mark: Option<f64>) -> Result<(), AppError>;
    async fn get_roster_entry(&self, course_id: &Uuid, matriculation_number: &str) -> Result<Option<RosterEntry>, AppError>;
    async fn list_roster_students(&self, course_id: &Uuid) -> Result<Vec<EnrollmentListRow>, AppError>;
}

#[async_trait::async_trait]
impl CourseRepository for PostgresRepository {
    async fn get_course(&self, id: &Uuid) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, course_code, course_name, department_id, level_id
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn get_course_by_code(&self, course_code: &str) -> Result<Option<Course>, AppError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, course_code, course_name, department_id, level_id
            FROM courses
            WHERE course_code = $1
            "#,
        )
        .bind(course_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn list_courses_for_department(&self, department_id: &Uuid) -> Result<Vec<Course>, AppError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, course_code, course_name, department_id, level_id
            FROM courses
            WHERE department_id = $1
            ORDER BY course_code
            "#,
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list courses", e))?;

        Ok(courses)
    }

    async fn upsert_roster_entry(&self, course_id: &Uuid, matriculation_number: &str, ca_mark: Option<f64>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO course_rosters (course_id, matriculation_number, ca_mark)
            VALUES ($1, $2, $3)
            ON CONFLICT (course_id, matriculation_number)
            DO UPDATE SET ca_mark = EXCLUDED.ca_mark
            "#,
        )
        .bind(course_id)
        .bind(matriculation_number)
        .bind(ca_mark)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to upsert roster entry", e))?;

        Ok(())
    }

    async fn get_roster_entry(&self, course_id: &Uuid, matriculation_number: &str) -> Result<Option<RosterEntry>, AppError> {
        let entry = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT id, course_id, matriculation_number, ca_mark
            FROM course_rosters
            WHERE course_id = $1 AND matriculation_number = $2
            "#,
        )
        .bind(course_id)
        .bind(matriculation_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    async fn list_roster_students(&self, course_id: &Uuid) -> Result<Vec<EnrollmentListRow>, AppError> {
        let rows = sqlx::query_as::<_, EnrollmentListRow>(
            r#"
            SELECT s.matriculation_number, s.name
            FROM course_rosters r
            JOIN students s ON s.matriculation_number = r.matriculation_number
            WHERE r.course_id = $1
            ORDER BY s.matriculation_number
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list course roster", e))?;

        Ok(rows)
    }
}
