pub mod attendance;
pub mod auth;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod error;
pub mod health;
pub mod report;
pub mod session;

use rocket::Request;
use rocket::http::{ContentType, Header};
use rocket::response::{Responder, Response};
use std::io::Cursor;

/// CSV download with an attachment filename, used by the report and
/// enrollment-list routes.
pub struct CsvAttachment {
    pub filename: String,
    pub content: String,
}

impl<'r> Responder<'r, 'static> for CsvAttachment {
    fn respond_to(self, _: &Request<'_>) -> rocket::response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .header(Header::new("Content-Disposition", format!("attachment; filename={}", self.filename)))
            .sized_body(self.content.len(), Cursor::new(self.content))
            .ok()
    }
}
