use std::sync::{Mutex, MutexGuard};

use actix_web::web::Data;

use crate::session::Session;
use crate::store::CsvStore;

pub mod dashboard;
pub mod leave_request;
pub mod user;

/// The process-wide session. The mutex is the single writer lock over the datasets.
pub type AppSession = Mutex<Session<CsvStore>>;

pub fn lock(session: &Data<AppSession>) -> actix_web::Result<MutexGuard<'_, Session<CsvStore>>> {
    session.lock().map_err(|_| {
        tracing::error!("Session lock poisoned");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })
}
