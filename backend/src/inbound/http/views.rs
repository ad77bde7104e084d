//! Server-rendered pages.
//!
//! Every page embeds a [`PageChrome`] built from the request's session: the
//! logged-on user's name, the flash messages queued by earlier requests, and
//! the CSRF token that the page's forms must echo back.

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use askama::Template;

use super::session::SessionContext;
use crate::domain::{Error, Job, JobStatus, User};

/// Request-scoped values shared by every page layout.
#[derive(Debug, Clone, Default)]
pub struct PageChrome {
    /// Name of the logged-on user, if any.
    pub user_name: Option<String>,
    /// Informational flashes.
    pub info: Vec<String>,
    /// Error flashes.
    pub errors: Vec<String>,
    /// Token echoed by every form on the page.
    pub csrf_token: String,
}

impl PageChrome {
    /// Consume queued flashes and issue the token for this page's forms.
    pub fn build(session: &SessionContext, user: Option<&User>) -> Result<Self, Error> {
        let flashes = session.take_flashes();
        Ok(Self {
            user_name: user.map(|account| account.name().to_string()),
            info: flashes.info,
            errors: flashes.errors,
            csrf_token: session.issue_csrf_token()?,
        })
    }
}

/// Landing page.
#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexPage {
    /// Shared layout values.
    pub chrome: PageChrome,
}

/// Logon form.
#[derive(Template)]
#[template(path = "logon.html")]
pub struct LogonPage {
    /// Shared layout values.
    pub chrome: PageChrome,
    /// Email to pre-fill.
    pub email: String,
}

/// Registration form.
#[derive(Template)]
#[template(path = "register.html")]
pub struct RegisterPage {
    /// Shared layout values.
    pub chrome: PageChrome,
    /// Name to pre-fill after a rejected submission.
    pub name: String,
    /// Email to pre-fill after a rejected submission.
    pub email: String,
}

/// Table of the user's jobs.
#[derive(Template)]
#[template(path = "jobs.html")]
pub struct JobsPage {
    /// Shared layout values.
    pub chrome: PageChrome,
    /// Jobs owned by the logged-on user.
    pub jobs: Vec<Job>,
}

/// One `<option>` of the status picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    /// Form value.
    pub value: &'static str,
    /// Whether the option starts selected.
    pub selected: bool,
}

/// Create or edit form for one job.
#[derive(Template)]
#[template(path = "job.html")]
pub struct JobPage {
    /// Shared layout values.
    pub chrome: PageChrome,
    /// Page heading.
    pub heading: &'static str,
    /// Route the form posts to.
    pub action: String,
    /// Submit button text.
    pub submit_label: &'static str,
    /// Company to pre-fill.
    pub company: String,
    /// Position to pre-fill.
    pub position: String,
    /// Status picker options.
    pub statuses: Vec<StatusOption>,
}

impl JobPage {
    /// Empty form posting to the create route.
    #[must_use]
    pub fn new_job(chrome: PageChrome) -> Self {
        Self {
            chrome,
            heading: "Add a job listing",
            action: "/jobs".to_owned(),
            submit_label: "Add",
            company: String::new(),
            position: String::new(),
            statuses: status_options(JobStatus::Pending),
        }
    }

    /// Form pre-filled with `job`, posting to its update route.
    #[must_use]
    pub fn edit_job(chrome: PageChrome, job: &Job) -> Self {
        Self {
            chrome,
            heading: "Edit job listing",
            action: format!("/jobs/update/{}", job.id),
            submit_label: "Update",
            company: job.company.clone(),
            position: job.position.clone(),
            statuses: status_options(job.status),
        }
    }
}

fn status_options(selected: JobStatus) -> Vec<StatusOption> {
    JobStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str(),
            selected: status == selected,
        })
        .collect()
}

/// Render a page as a `200 OK` HTML response.
pub fn render<T: Template>(page: &T) -> Result<HttpResponse, Error> {
    let body = page
        .render()
        .map_err(|error| Error::internal(format!("failed to render page: {error}")))?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobDraft, UserId};
    use chrono::Utc;
    use rstest::rstest;

    fn chrome() -> PageChrome {
        PageChrome {
            user_name: Some("Ada <script>".to_owned()),
            info: vec!["Job listing added successfully.".to_owned()],
            errors: vec![],
            csrf_token: "tok123".to_owned(),
        }
    }

    fn job(company: &str) -> Job {
        let draft = JobDraft::try_from_parts(company, "Engineer", "interview").expect("draft");
        Job::create(UserId::random(), draft, Utc::now())
    }

    #[rstest]
    fn jobs_page_has_one_row_per_job_plus_header() {
        let page = JobsPage {
            chrome: chrome(),
            jobs: vec![job("Acme"), job("Globex"), job("Initech")],
        };
        let html = page.render().expect("render");
        assert_eq!(html.matches("<tr>").count(), 4);
        assert!(html.contains("Globex"));
        assert!(html.contains(r#"name="_csrf" value="tok123""#));
    }

    #[rstest]
    fn interpolated_values_are_escaped() {
        let html = IndexPage { chrome: chrome() }.render().expect("render");
        assert!(html.contains("Ada &lt;script&gt; is logged on."));
        assert!(!html.contains("<script>"));
    }

    #[rstest]
    fn flashes_are_rendered() {
        let html = IndexPage { chrome: chrome() }.render().expect("render");
        assert!(html.contains("Job listing added successfully."));
    }

    #[rstest]
    fn edit_form_preselects_status_and_targets_update() {
        let existing = job("Acme");
        let page = JobPage::edit_job(chrome(), &existing);
        let html = page.render().expect("render");
        assert!(html.contains(&format!(r#"action="/jobs/update/{}""#, existing.id)));
        assert!(html.contains(r#"<option value="interview" selected>"#));
        assert!(html.contains(r#"value="Acme""#));
    }

    #[rstest]
    fn new_form_defaults_to_pending() {
        let statuses = JobPage::new_job(chrome()).statuses;
        let selected: Vec<_> = statuses
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.value)
            .collect();
        assert_eq!(selected, vec!["pending"]);
    }
}
