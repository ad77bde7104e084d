//! Landing page and the fallback for unmatched routes.

use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, get, web};

use super::auth::session_user;
use super::error::ApiResult;
use super::session::SessionContext;
use super::state::HttpState;
use super::views::{IndexPage, PageChrome, render};

/// Landing page.
#[get("/")]
pub async fn index(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let user = session_user(&state, &session).await?;
    let chrome = PageChrome::build(&session, user.as_ref())?;
    render(&IndexPage { chrome })
}

/// Default service: `404` naming the requested URL.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type(ContentType::plaintext())
        .body(format!("That page ({}) was not found.", req.uri()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn unmatched_route_names_the_url() {
        let app =
            test::init_service(App::new().default_service(web::to(not_found))).await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/nowhere?x=1").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            test::read_body(res).await,
            "That page (/nowhere?x=1) was not found."
        );
    }
}
