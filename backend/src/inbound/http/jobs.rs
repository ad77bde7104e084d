//! Job listing pages under `/jobs`.
//!
//! Every handler runs behind the authentication gate and works only on the
//! logged-on user's jobs. Expected failures (validation, unknown ids,
//! repository errors) end in a flash message and a redirect; nothing from a
//! repository error reaches the page.

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::error;

use super::auth::{AuthenticatedForm, CurrentUser};
use super::csrf::CsrfSubmission;
use super::error::ApiResult;
use super::flash::Flash;
use super::redirect::flash_redirect;
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{JobPage, JobsPage, PageChrome, render};
use crate::domain::{Error, JobDraft, JobId};

const JOBS_PATH: &str = "/jobs";
const NEW_JOB_PATH: &str = "/jobs/new";

/// Flash after a successful create.
pub const JOB_ADDED: &str = "Job listing added successfully.";
/// Flash after a successful update.
pub const JOB_UPDATED: &str = "Job listing updated.";
/// Flash after a successful delete.
pub const JOB_DELETED: &str = "Job listing deleted.";

/// Fields posted by the create and edit forms.
#[derive(Deserialize)]
pub struct JobForm {
    #[serde(default)]
    company: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    status: String,
    #[serde(rename = "_csrf", default)]
    csrf: String,
}

impl JobForm {
    fn draft(&self) -> Result<JobDraft, String> {
        JobDraft::try_from_parts(&self.company, &self.position, &self.status)
            .map_err(|invalid| invalid.to_string())
    }
}

impl CsrfSubmission for JobForm {
    fn csrf_token(&self) -> &str {
        &self.csrf
    }
}

/// The delete button carries only its token.
#[derive(Deserialize)]
pub struct DeleteForm {
    #[serde(rename = "_csrf", default)]
    csrf: String,
}

impl CsrfSubmission for DeleteForm {
    fn csrf_token(&self) -> &str {
        &self.csrf
    }
}

fn not_found(session: &SessionContext, raw_id: &str) -> ApiResult<HttpResponse> {
    flash_redirect(
        session,
        Flash::error(format!("No job with id: {raw_id} found")),
        JOBS_PATH,
    )
}

/// Log a repository failure and send the user somewhere safe.
fn failed(
    session: &SessionContext,
    failure: &Error,
    message: &'static str,
    location: &str,
) -> ApiResult<HttpResponse> {
    error!(
        code = failure.code().as_str(),
        trace_id = failure.trace_id().unwrap_or_default(),
        error = failure.message(),
        "{message}"
    );
    flash_redirect(session, Flash::error(message), location)
}

fn edit_path(id: &JobId) -> String {
    format!("/jobs/edit/{id}")
}

/// List the user's jobs.
#[get("/jobs")]
pub async fn list_jobs(
    state: web::Data<HttpState>,
    session: SessionContext,
    current: CurrentUser,
) -> ApiResult<HttpResponse> {
    let user = current.into_inner();
    match state.jobs_query.list_jobs(user.id()).await {
        Ok(jobs) => {
            let chrome = PageChrome::build(&session, Some(&user))?;
            render(&JobsPage { chrome, jobs })
        }
        Err(failure) => failed(&session, &failure, "Error fetching jobs", "/"),
    }
}

/// Render the create form.
#[get("/jobs/new")]
pub async fn new_job(session: SessionContext, user: CurrentUser) -> ApiResult<HttpResponse> {
    let chrome = PageChrome::build(&session, Some(&user.0))?;
    render(&JobPage::new_job(chrome))
}

/// Create a job from the submitted form.
#[post("/jobs")]
pub async fn create_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    submission: AuthenticatedForm<JobForm>,
) -> ApiResult<HttpResponse> {
    let AuthenticatedForm { user, form } = submission;
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(message) => return flash_redirect(&session, Flash::error(message), NEW_JOB_PATH),
    };
    match state.jobs_command.create_job(user.id(), draft).await {
        Ok(_) => flash_redirect(&session, Flash::info(JOB_ADDED), JOBS_PATH),
        Err(failure) => failed(&session, &failure, "Error creating job", NEW_JOB_PATH),
    }
}

/// Render the edit form for an owned job.
#[get("/jobs/edit/{id}")]
pub async fn edit_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    current: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = current.into_inner();
    let raw_id = path.into_inner();
    let Ok(id) = raw_id.parse::<JobId>() else {
        return not_found(&session, &raw_id);
    };
    match state.jobs_query.find_job(user.id(), &id).await {
        Ok(Some(job)) => {
            let chrome = PageChrome::build(&session, Some(&user))?;
            render(&JobPage::edit_job(chrome, &job))
        }
        Ok(None) => not_found(&session, &raw_id),
        Err(failure) => failed(&session, &failure, "Error fetching job", JOBS_PATH),
    }
}

/// Apply the submitted form to an owned job.
#[post("/jobs/update/{id}")]
pub async fn update_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    submission: AuthenticatedForm<JobForm>,
) -> ApiResult<HttpResponse> {
    let AuthenticatedForm { user, form } = submission;
    let raw_id = path.into_inner();
    let Ok(id) = raw_id.parse::<JobId>() else {
        return not_found(&session, &raw_id);
    };
    let draft = match form.draft() {
        Ok(draft) => draft,
        Err(message) => return flash_redirect(&session, Flash::error(message), &edit_path(&id)),
    };
    match state.jobs_command.update_job(user.id(), &id, draft).await {
        Ok(Some(_)) => flash_redirect(&session, Flash::info(JOB_UPDATED), JOBS_PATH),
        Ok(None) => not_found(&session, &raw_id),
        Err(failure) => failed(&session, &failure, "Error updating job", &edit_path(&id)),
    }
}

/// Delete an owned job.
#[post("/jobs/delete/{id}")]
pub async fn delete_job(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    submission: AuthenticatedForm<DeleteForm>,
) -> ApiResult<HttpResponse> {
    let user = submission.user;
    let raw_id = path.into_inner();
    let Ok(id) = raw_id.parse::<JobId>() else {
        return not_found(&session, &raw_id);
    };
    match state.jobs_command.delete_job(user.id(), &id).await {
        Ok(true) => flash_redirect(&session, Flash::info(JOB_DELETED), JOBS_PATH),
        Ok(false) => not_found(&session, &raw_id),
        Err(failure) => failed(&session, &failure, "Error deleting job", JOBS_PATH),
    }
}
