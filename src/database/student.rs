use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::student::{EnrolledCourse, Student};
use uuid::Uuid;

#[async_trait::async_trait]
pub trait StudentRepository {
    /// Enroll a student, or re-enroll them. Re-enrollment replaces the stored
    /// fingerprint template and profile; attendance history is untouched.
    async fn upsert_student(
        &self,
        matriculation_number: &str,
        name: &str,
        department_id: &Uuid,
        level_id: &Uuid,
        fingerprint_template: &str,
        photo: Option<&str>,
    ) -> Result<Student, AppError>;
    async fn get_student(&self, matriculation_number: &str) -> Result<Option<Student>, AppError>;
    async fn get_student_by_template(&self, fingerprint_template: &str) -> Result<Option<Student>, AppError>;
    async fn list_students(&self, department_id: &Uuid, level_id: &Uuid) -> Result<Vec<Student>, AppError>;
    async fn list_enrolled_courses(&self, matriculation_number: &str) -> Result<Vec<EnrolledCourse>, AppError>;
}

#[async_trait::async_trait]
impl StudentRepository for PostgresRepository {
    async fn upsert_student(
        &self,
        matriculation_number: &str,
        name: &str,
        department_id: &Uuid,
        level_id: &Uuid,
        fingerprint_template: &str,
        photo: Option<&str>,
    ) -> Result<Student, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (matriculation_number, name, department_id, level_id, fingerprint_template, photo)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (matriculation_number)
            DO UPDATE SET
                name = EXCLUDED.name,
                department_id = EXCLUDED.department_id,
                level_id = EXCLUDED.level_id,
                fingerprint_template = EXCLUDED.fingerprint_template,
                photo = EXCLUDED.photo
            RETURNING matriculation_number, name, department_id, level_id, fingerprint_template, photo, enrolled_at
            "#,
        )
        .bind(matriculation_number)
        .bind(name)
        .bind(department_id)
        .bind(level_id)
        .bind(fingerprint_template)
        .bind(photo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to enroll student", e))?;

        Ok(student)
    }

    async fn get_student(&self, matriculation_number: &str) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT matriculation_number, name, department_id, level_id, fingerprint_template, photo, enrolled_at
            FROM students
            WHERE matriculation_number = $1
            "#,
        )
        .bind(matriculation_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn get_student_by_template(&self, fingerprint_template: &str) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT matriculation_number, name, department_id, level_id, fingerprint_template, photo, enrolled_at
            FROM students
            WHERE fingerprint_template = $1
            "#,
        )
        .bind(fingerprint_template)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn list_students(&self, department_id: &Uuid, level_id: &Uuid) -> Result<Vec<Student>, AppError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT matriculation_number, name, department_id, level_id, fingerprint_template, photo, enrolled_at
            FROM students
            WHERE department_id = $1 AND level_id = $2
            ORDER BY matriculation_number
            "#,
        )
        .bind(department_id)
        .bind(level_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list students", e))?;

        Ok(students)
    }

    async fn list_enrolled_courses(&self, matriculation_number: &str) -> Result<Vec<EnrolledCourse>, AppError> {
        let rows = sqlx::query_as::<_, (String, String, Option<f64>)>(
            r#"
            SELECT c.course_code, c.course_name, r.ca_mark
            FROM course_rosters r
            JOIN courses c ON c.id = r.course_id
            WHERE r.matriculation_number = $1
            ORDER BY c.course_code
            "#,
        )
        .bind(matriculation_number)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::db("Failed to list enrolled courses", e))?;

        Ok(rows
            .into_iter()
            .map(|(course_code, course_name, ca_mark)| EnrolledCourse {
                course_code,
                course_name,
                ca_mark,
            })
            .collect())
    }
}
