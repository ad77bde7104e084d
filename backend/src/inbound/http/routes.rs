//! Route table shared by the server binary and the HTTP tests.
//!
//! ```text
//! GET  /                      landing page
//! GET  /multiply              multiply two query operands
//! GET  /sessions/register     registration form
//! POST /sessions/register     create an account and log on
//! GET  /sessions/logon        logon form
//! POST /sessions/logon        log on
//! POST /sessions/logoff       log off
//! GET  /jobs                  list own jobs
//! POST /jobs                  create a job
//! GET  /jobs/new              creation form
//! GET  /jobs/edit/{id}        edit form
//! POST /jobs/update/{id}      update a job
//! POST /jobs/delete/{id}      delete a job
//! ```

use actix_web::web;

use super::{jobs, multiply, pages, sessions};

/// Register every page and form route.
///
/// Health probes and the not-found fallback are registered by the caller so
/// they can sit outside the session and rate-limit middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::index)
        .service(multiply::multiply_handler)
        .service(sessions::register_page)
        .service(sessions::register)
        .service(sessions::logon_page)
        .service(sessions::logon)
        .service(sessions::logoff)
        .service(jobs::list_jobs)
        .service(jobs::create_job)
        .service(jobs::new_job)
        .service(jobs::edit_job)
        .service(jobs::update_job)
        .service(jobs::delete_job);
}
