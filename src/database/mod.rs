pub mod postgres_repository;
pub mod admin;
pub mod attendance;
pub mod course;
pub mod department;
pub mod error_log;
pub mod exam_session;
pub mod student;
