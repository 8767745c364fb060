use crate::database::attendance::AttendanceRepository;
use crate::database::course::CourseRepository;
use crate::database::error_log::ErrorLogRepository;
use crate::database::exam_session::ExamSessionRepository;
use crate::database::student::StudentRepository;
use crate::error::app_error::AppError;
use crate::models::attendance::{Attendance, AttendedStudent};
use crate::models::course::{Course, RosterEntry};
use crate::models::error_log::{ErrorLog, RejectionReason};
use crate::models::exam_session::{ExamSession, SessionWithCourse};
use crate::models::report::EnrollmentListRow;
use crate::models::student::{EnrolledCourse, Student};
use crate::service::attendance::Clock;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use uuid::Uuid;

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory stand-in for the Postgres repository, shared by the service
/// tests. Mutexes give the same observable behavior as the real store:
/// rows written by one call are visible to the next.
#[derive(Default)]
pub struct MockRepository {
    sessions: Mutex<Vec<ExamSession>>,
    students: Mutex<Vec<Student>>,
    courses: Mutex<Vec<Course>>,
    roster: Mutex<Vec<RosterEntry>>,
    attendance: Mutex<Vec<Attendance>>,
    errors: Mutex<Vec<ErrorLog>>,
    fail_next_insert: AtomicBool,
}

impl MockRepository {
    pub fn add_course(&mut self, course_code: &str, course_name: &str, department_id: &Uuid, level_id: &Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.courses.lock().unwrap().push(Course {
            id,
            course_code: course_code.to_string(),
            course_name: course_name.to_string(),
            department_id: *department_id,
            level_id: *level_id,
        });
        id
    }

    pub fn add_session(&mut self, course_id: &Uuid, admin_id: &Uuid, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.lock().unwrap().push(ExamSession {
            id,
            course_id: *course_id,
            admin_id: *admin_id,
            start_time,
            end_time,
        });
        id
    }

    pub fn add_student(&mut self, matriculation_number: &str, name: &str, department_id: &Uuid, level_id: &Uuid, template: &str) {
        self.students.lock().unwrap().push(Student {
            matriculation_number: matriculation_number.to_string(),
            name: name.to_string(),
            department_id: *department_id,
            level_id: *level_id,
            fingerprint_template: template.to_string(),
            photo: None,
            enrolled_at: utc(2025, 10, 1, 8, 0),
        });
    }

    pub fn add_roster_entry(&mut self, course_id: &Uuid, matriculation_number: &str, ca_mark: Option<f64>) {
        self.roster.lock().unwrap().push(RosterEntry {
            id: Uuid::new_v4(),
            course_id: *course_id,
            matriculation_number: matriculation_number.to_string(),
            ca_mark,
        });
    }

    pub fn course_department_and_level(&self) -> (Uuid, Uuid) {
        let courses = self.courses.lock().unwrap();
        let course = courses.first().expect("fixture has a course");
        (course.department_id, course.level_id)
    }

    /// Make the next attendance insert behave as if a concurrent request won
    /// the unique-constraint race.
    pub fn fail_next_insert_as_unique_violation(&self) {
        self.fail_next_insert.store(true, Ordering::SeqCst);
    }

    pub fn attendance_count(&self) -> usize {
        self.attendance.lock().unwrap().len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ExamSessionRepository for MockRepository {
    async fn create_session(
        &self,
        course_id: &Uuid,
        admin_id: &Uuid,
        start_time: &DateTime<Utc>,
        end_time: &DateTime<Utc>,
    ) -> Result<ExamSession, AppError> {
        let session = ExamSession {
            id: Uuid::new_v4(),
            course_id: *course_id,
            admin_id: *admin_id,
            start_time: *start_time,
            end_time: *end_time,
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn get_session(&self, id: &Uuid) -> Result<Option<ExamSession>, AppError> {
        Ok(self.sessions.lock().unwrap().iter().find(|s| s.id == *id).cloned())
    }

    async fn has_overlapping_session(&self, course_id: &Uuid, start_time: &DateTime<Utc>, end_time: &DateTime<Utc>) -> Result<bool, AppError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.course_id == *course_id && s.start_time <= *end_time && s.end_time >= *start_time))
    }

    async fn list_active_sessions(&self, admin_id: &Uuid, now: &DateTime<Utc>) -> Result<Vec<SessionWithCourse>, AppError> {
        let courses = self.courses.lock().unwrap();
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.admin_id == *admin_id && s.end_time >= *now)
            .map(|s| SessionWithCourse {
                id: s.id,
                course_id: s.course_id,
                admin_id: s.admin_id,
                start_time: s.start_time,
                end_time: s.end_time,
                course_code: courses
                    .iter()
                    .find(|c| c.id == s.course_id)
                    .map(|c| c.course_code.clone())
                    .unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl StudentRepository for MockRepository {
    async fn upsert_student(
        &self,
        matriculation_number: &str,
        name: &str,
        department_id: &Uuid,
        level_id: &Uuid,
        fingerprint_template: &str,
        photo: Option<&str>,
    ) -> Result<Student, AppError> {
        let student = Student {
            matriculation_number: matriculation_number.to_string(),
            name: name.to_string(),
            department_id: *department_id,
            level_id: *level_id,
            fingerprint_template: fingerprint_template.to_string(),
            photo: photo.map(str::to_string),
            enrolled_at: utc(2025, 10, 1, 8, 0),
        };
        let mut students = self.students.lock().unwrap();
        students.retain(|s| s.matriculation_number != matriculation_number);
        students.push(student.clone());
        Ok(student)
    }

    async fn get_student(&self, matriculation_number: &str) -> Result<Option<Student>, AppError> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.matriculation_number == matriculation_number)
            .cloned())
    }

    async fn get_student_by_template(&self, fingerprint_template: &str) -> Result<Option<Student>, AppError> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.fingerprint_template == fingerprint_template)
            .cloned())
    }

    async fn list_students(&self, department_id: &Uuid, level_id: &Uuid) -> Result<Vec<Student>, AppError> {
        Ok(self
            .students
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.department_id == *department_id && s.level_id == *level_id)
            .cloned()
            .collect())
    }

    async fn list_enrolled_courses(&self, matriculation_number: &str) -> Result<Vec<EnrolledCourse>, AppError> {
        let courses = self.courses.lock().unwrap();
        Ok(self
            .roster
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.matriculation_number == matriculation_number)
            .filter_map(|r| {
                courses.iter().find(|c| c.id == r.course_id).map(|c| EnrolledCourse {
                    course_code: c.course_code.clone(),
                    course_name: c.course_name.clone(),
                    ca_mark: r.ca_mark,
                })
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl CourseRepository for MockRepository {
    async fn get_course(&self, id: &Uuid) -> Result<Option<Course>, AppError> {
        Ok(self.courses.lock().unwrap().iter().find(|c| c.id == *id).cloned())
    }

    async fn get_course_by_code(&self, course_code: &str) -> Result<Option<Course>, AppError> {
        Ok(self.courses.lock().unwrap().iter().find(|c| c.course_code == course_code).cloned())
    }

    async fn list_courses_for_department(&self, department_id: &Uuid) -> Result<Vec<Course>, AppError> {
        Ok(self
            .courses
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.department_id == *department_id)
            .cloned()
            .collect())
    }

    async fn upsert_roster_entry(&self, course_id: &Uuid, matriculation_number: &str, ca_mark: Option<f64>) -> Result<(), AppError> {
        let mut roster = self.roster.lock().unwrap();
        roster.retain(|r| !(r.course_id == *course_id && r.matriculation_number == matriculation_number));
        roster.push(RosterEntry {
            id: Uuid::new_v4(),
            course_id: *course_id,
            matriculation_number: matriculation_number.to_string(),
            ca_mark,
        });
        Ok(())
    }

    async fn get_roster_entry(&self, course_id: &Uuid, matriculation_number: &str) -> Result<Option<RosterEntry>, AppError> {
        Ok(self
            .roster
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.course_id == *course_id && r.matriculation_number == matriculation_number)
            .cloned())
    }

    async fn list_roster_students(&self, course_id: &Uuid) -> Result<Vec<EnrollmentListRow>, AppError> {
        let students = self.students.lock().unwrap();
        Ok(self
            .roster
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.course_id == *course_id)
            .filter_map(|r| {
                students
                    .iter()
                    .find(|s| s.matriculation_number == r.matriculation_number)
                    .map(|s| EnrollmentListRow {
                        matriculation_number: s.matriculation_number.clone(),
                        name: s.name.clone(),
                    })
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl AttendanceRepository for MockRepository {
    async fn get_attendance(&self, session_id: &Uuid, matriculation_number: &str) -> Result<Option<Attendance>, AppError> {
        Ok(self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.session_id == *session_id && a.matriculation_number == matriculation_number)
            .cloned())
    }

    async fn try_insert_attendance(
        &self,
        session_id: &Uuid,
        matriculation_number: &str,
        recorded_at: &DateTime<Utc>,
    ) -> Result<Option<Attendance>, AppError> {
        if self.fail_next_insert.swap(false, Ordering::SeqCst) {
            return Ok(None);
        }

        let mut attendance = self.attendance.lock().unwrap();
        if attendance
            .iter()
            .any(|a| a.session_id == *session_id && a.matriculation_number == matriculation_number)
        {
            return Ok(None);
        }

        let row = Attendance {
            id: Uuid::new_v4(),
            session_id: *session_id,
            matriculation_number: matriculation_number.to_string(),
            authenticated: true,
            recorded_at: *recorded_at,
        };
        attendance.push(row.clone());
        Ok(Some(row))
    }

    async fn list_attendance_for_session(&self, session_id: &Uuid) -> Result<Vec<AttendedStudent>, AppError> {
        let students = self.students.lock().unwrap();
        Ok(self
            .attendance
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.session_id == *session_id && a.authenticated)
            .map(|a| AttendedStudent {
                matriculation_number: a.matriculation_number.clone(),
                name: students
                    .iter()
                    .find(|s| s.matriculation_number == a.matriculation_number)
                    .map(|s| s.name.clone())
                    .unwrap_or_default(),
                recorded_at: a.recorded_at,
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl ErrorLogRepository for MockRepository {
    async fn insert_error_log(
        &self,
        session_id: &Uuid,
        matriculation_number: Option<&str>,
        reason: RejectionReason,
        details: &str,
        recorded_at: &DateTime<Utc>,
    ) -> Result<ErrorLog, AppError> {
        let log = ErrorLog {
            id: Uuid::new_v4(),
            session_id: *session_id,
            matriculation_number: matriculation_number.map(str::to_string),
            error_type: reason.as_db().to_string(),
            details: details.to_string(),
            recorded_at: *recorded_at,
        };
        self.errors.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn list_errors_for_session(&self, session_id: &Uuid) -> Result<Vec<ErrorLog>, AppError> {
        Ok(self
            .errors
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.session_id == *session_id)
            .cloned()
            .collect())
    }
}
