//! End-to-end job tracking flows over the in-memory repositories.

mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use jobs_tracker::domain::ports::JobRepository;
use jobs_tracker::domain::{DEMO_JOB_COUNT, DEMO_PASSWORD, DemoDataSeeder, JobStatus, UserId};
use jobs_tracker::inbound::http::csrf::CSRF_FAILURE;
use jobs_tracker::inbound::http::jobs::{JOB_ADDED, JOB_DELETED, JOB_UPDATED};
use jobs_tracker::inbound::http::test_utils::InMemoryApp;
use mockable::DefaultClock;
use rstest::rstest;

use support::{Browser, add_user, app, log_on};

const ADA: (&str, &str, &str) = ("Ada", "ada@example.com", "secret1");
const BOB: (&str, &str, &str) = ("Bob", "bob@example.com", "secret2");

async fn memory_with(accounts: &[(&str, &str, &str)]) -> (InMemoryApp, Vec<UserId>) {
    let memory = InMemoryApp::new();
    let mut ids = Vec::new();
    for (name, email, password) in accounts {
        ids.push(add_user(&memory.users, name, email, password).await);
    }
    (memory, ids)
}

fn job_fields<'a>(company: &'a str, position: &'a str, status: &'a str) -> [(&'a str, &'a str); 3] {
    [
        ("company", company),
        ("position", position),
        ("status", status),
    ]
}

#[rstest]
#[case("/jobs")]
#[case("/jobs/new")]
#[case("/jobs/edit/00000000-0000-0000-0000-000000000000")]
#[actix_web::test]
async fn anonymous_visitors_are_sent_to_logon(#[case] uri: &str) {
    let memory = InMemoryApp::new();
    let app = test::init_service(app(memory.state)).await;
    let mut browser = Browser::default();

    let page = browser.get(&app, uri).await;
    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location.as_deref(), Some("/sessions/logon"));

    let logon = browser.get(&app, "/sessions/logon").await;
    assert!(logon.body.contains("access that page before logon."));
}

#[actix_web::test]
async fn anonymous_post_creates_nothing() {
    let (memory, ids) = memory_with(&[ADA]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut browser = Browser::default();

    let page = browser
        .post(&app, "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;

    assert_eq!(page.location.as_deref(), Some("/sessions/logon"));
    let owner = ids.first().expect("ada");
    assert!(jobs.list_for_owner(owner).await.expect("list").is_empty());
}

#[actix_web::test]
async fn create_then_list_shows_only_own_jobs() {
    let (memory, _) = memory_with(&[ADA, BOB]).await;
    let app = test::init_service(app(memory.state)).await;

    let mut ada = log_on(&app, ADA.1, ADA.2).await;
    let created = ada
        .submit(&app, "/jobs/new", "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;
    assert_eq!(created.location.as_deref(), Some("/jobs"));

    let mut bob = log_on(&app, BOB.1, BOB.2).await;
    bob.submit(&app, "/jobs/new", "/jobs", &job_fields("Globex", "Analyst", "interview"))
        .await;

    let ada_list = ada.get(&app, "/jobs").await;
    assert!(ada_list.body.contains(JOB_ADDED));
    assert!(ada_list.body.contains("Acme"));
    assert!(!ada_list.body.contains("Globex"));
    assert_eq!(ada_list.table_rows(), 2);

    let bob_list = bob.get(&app, "/jobs").await;
    assert!(bob_list.body.contains("Globex"));
    assert!(!bob_list.body.contains("Acme"));
}

#[rstest]
#[case(job_fields("", "Engineer", "pending"))]
#[case(job_fields("Acme", "", "pending"))]
#[case(job_fields("Acme", "Engineer", ""))]
#[actix_web::test]
async fn blank_field_returns_to_new_form(#[case] fields: [(&str, &str); 3]) {
    let (memory, ids) = memory_with(&[ADA]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut ada = log_on(&app, ADA.1, ADA.2).await;

    let page = ada.submit(&app, "/jobs/new", "/jobs", &fields).await;

    assert_eq!(page.location.as_deref(), Some("/jobs/new"));
    let form = ada.get(&app, "/jobs/new").await;
    assert!(form.body.contains("All fields are required"));
    let owner = ids.first().expect("ada");
    assert!(jobs.list_for_owner(owner).await.expect("list").is_empty());
}

#[actix_web::test]
async fn update_changes_status_and_flashes() {
    let (memory, ids) = memory_with(&[ADA]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut ada = log_on(&app, ADA.1, ADA.2).await;
    ada.submit(&app, "/jobs/new", "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;
    let owner = ids.first().expect("ada");
    let job = jobs
        .list_for_owner(owner)
        .await
        .expect("list")
        .into_iter()
        .next()
        .expect("created job");

    let page = ada
        .submit(
            &app,
            &format!("/jobs/edit/{}", job.id),
            &format!("/jobs/update/{}", job.id),
            &job_fields("Acme", "Lead", "interview"),
        )
        .await;

    assert_eq!(page.location.as_deref(), Some("/jobs"));
    let list = ada.get(&app, "/jobs").await;
    assert!(list.body.contains(JOB_UPDATED));
    let stored = jobs
        .find_for_owner(owner, &job.id)
        .await
        .expect("find")
        .expect("still stored");
    assert_eq!(stored.position, "Lead");
    assert_eq!(stored.status, JobStatus::Interview);
}

#[actix_web::test]
async fn delete_removes_own_job() {
    let (memory, ids) = memory_with(&[ADA]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut ada = log_on(&app, ADA.1, ADA.2).await;
    ada.submit(&app, "/jobs/new", "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;
    let owner = ids.first().expect("ada");
    let job_id = jobs
        .list_for_owner(owner)
        .await
        .expect("list")
        .first()
        .expect("created job")
        .id;

    let page = ada
        .submit(&app, "/jobs", &format!("/jobs/delete/{job_id}"), &[])
        .await;

    assert_eq!(page.location.as_deref(), Some("/jobs"));
    let list = ada.get(&app, "/jobs").await;
    assert!(list.body.contains(JOB_DELETED));
    assert_eq!(list.table_rows(), 1);
}

#[actix_web::test]
async fn deleting_another_users_job_is_not_found() {
    let (memory, ids) = memory_with(&[ADA, BOB]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut ada = log_on(&app, ADA.1, ADA.2).await;
    ada.submit(&app, "/jobs/new", "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;
    let owner = ids.first().expect("ada");
    let job_id = jobs
        .list_for_owner(owner)
        .await
        .expect("list")
        .first()
        .expect("created job")
        .id;

    let mut bob = log_on(&app, BOB.1, BOB.2).await;
    let page = bob
        .submit(&app, "/jobs", &format!("/jobs/delete/{job_id}"), &[])
        .await;

    assert_eq!(page.location.as_deref(), Some("/jobs"));
    let list = bob.get(&app, "/jobs").await;
    assert!(list.body.contains(&format!("No job with id: {job_id} found")));
    assert_eq!(jobs.list_for_owner(owner).await.expect("list").len(), 1);
}

#[actix_web::test]
async fn missing_csrf_token_changes_nothing() {
    let (memory, ids) = memory_with(&[ADA]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut ada = log_on(&app, ADA.1, ADA.2).await;
    ada.get(&app, "/jobs/new").await;

    let page = ada
        .post(&app, "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;

    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location.as_deref(), Some("/"));
    let home = ada.get(&app, "/").await;
    assert!(home.body.contains(CSRF_FAILURE));
    let owner = ids.first().expect("ada");
    assert!(jobs.list_for_owner(owner).await.expect("list").is_empty());
}

#[rstest]
#[case::update_without_token("update", None)]
#[case::update_with_forged_token("update", Some("forged"))]
#[case::delete_without_token("delete", None)]
#[case::delete_with_forged_token("delete", Some("forged"))]
#[actix_web::test]
async fn rejected_token_leaves_existing_job_untouched(
    #[case] action: &str,
    #[case] token: Option<&str>,
) {
    let (memory, ids) = memory_with(&[ADA]).await;
    let jobs = Arc::clone(&memory.jobs);
    let app = test::init_service(app(memory.state)).await;
    let mut ada = log_on(&app, ADA.1, ADA.2).await;
    ada.submit(&app, "/jobs/new", "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;
    let owner = ids.first().expect("ada");
    let before = jobs
        .list_for_owner(owner)
        .await
        .expect("list")
        .into_iter()
        .next()
        .expect("created job");
    ada.get(&app, &format!("/jobs/edit/{}", before.id)).await;

    let mut fields = job_fields("Globex", "Lead", "declined").to_vec();
    if let Some(token) = token {
        fields.push(("_csrf", token));
    }
    let page = ada
        .post(&app, &format!("/jobs/{action}/{}", before.id), &fields)
        .await;

    assert_eq!(page.status, StatusCode::FOUND);
    assert_eq!(page.location.as_deref(), Some("/"));
    let home = ada.get(&app, "/").await;
    assert!(home.body.contains(CSRF_FAILURE));
    let after = jobs
        .find_for_owner(owner, &before.id)
        .await
        .expect("find")
        .expect("still stored");
    assert_eq!(after, before);
}

#[actix_web::test]
async fn seeded_account_lists_every_job() {
    let memory = InMemoryApp::new();
    let seeder = DemoDataSeeder::new(
        Arc::clone(&memory.users),
        Arc::clone(&memory.jobs),
        Arc::new(DefaultClock),
    );
    let user = seeder.seed(7, DEMO_JOB_COUNT).await.expect("seeded");
    let app = test::init_service(app(memory.state)).await;
    let mut demo = log_on(&app, user.email().as_ref(), DEMO_PASSWORD).await;

    assert_eq!(demo.get(&app, "/jobs").await.table_rows(), DEMO_JOB_COUNT + 1);

    demo.submit(&app, "/jobs/new", "/jobs", &job_fields("Acme", "Engineer", "pending"))
        .await;
    assert_eq!(demo.get(&app, "/jobs").await.table_rows(), DEMO_JOB_COUNT + 2);
}
