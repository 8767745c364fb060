use chrono::{DateTime, Utc};
use regex::Regex;
use rocket::serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

/// Matriculation numbers as issued by the registry: uppercase alphanumerics
/// with optional slash-separated groups, e.g. `UBA21E0001` or `FE/21/0457`.
static MATRIC_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]+(?:/[A-Z0-9]+)*$").expect("invalid matric number regex"));

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Student {
    pub matriculation_number: String,
    pub name: String,
    pub department_id: Uuid,
    pub level_id: Uuid,
    pub fingerprint_template: String,
    pub photo: Option<String>,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct EnrollStudentRequest {
    #[validate(regex(path = *MATRIC_NUMBER), length(min = 4, max = 32))]
    pub matriculation_number: String,
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    pub department_id: Uuid,
    pub level_id: Uuid,
    #[validate(length(min = 1))]
    pub fingerprint_template: String,
    /// Base64-encoded passport photo, optional.
    pub photo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnrollmentStatusRequest {
    pub fingerprint_template: String,
}

#[derive(Debug, Serialize)]
pub struct EnrolledCourse {
    pub course_code: String,
    pub course_name: String,
    pub ca_mark: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct EnrollmentStatusResponse {
    pub matriculation_number: String,
    pub name: String,
    pub department_id: Uuid,
    pub level_id: Uuid,
    pub photo: Option<String>,
    pub enrolled_courses: Vec<EnrolledCourse>,
}

#[derive(Debug, Serialize)]
pub struct EnrollResponse {
    pub matriculation_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn request(matric: &str) -> EnrollStudentRequest {
        EnrollStudentRequest {
            matriculation_number: matric.to_string(),
            name: "Ada Ngwa".to_string(),
            department_id: Uuid::new_v4(),
            level_id: Uuid::new_v4(),
            fingerprint_template: "tpl-1".to_string(),
            photo: None,
        }
    }

    #[test]
    fn accepts_registry_style_matric_numbers() {
        assert!(request("UBA21E0001").validate().is_ok());
        assert!(request("FE/21/0457").validate().is_ok());
    }

    #[test]
    fn rejects_lowercase_and_spaces() {
        assert!(request("uba21e0001").validate().is_err());
        assert!(request("UBA 21").validate().is_err());
    }

    #[test]
    fn rejects_empty_template() {
        let mut req = request("UBA21E0001");
        req.fingerprint_template = String::new();
        assert!(req.validate().is_err());
    }
}
