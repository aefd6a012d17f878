//! HTTP surface.
//!
//! Every resource answers `OPTIONS` with an empty 200 and anything it does
//! not route with a 405 JSON body. CORS headers go on every response.

pub mod analytics;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod export;
pub mod ideas;
pub mod users;

use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpRequest, HttpResponse, Resource};

use crate::auth::ClientInfo;
use crate::error::ApiError;

pub fn cors() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "GET, POST, OPTIONS"))
        .add(("Access-Control-Allow-Headers", "Content-Type, Authorization"))
}

/// Malformed JSON bodies all read as "Invalid input".
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        ApiError::BadRequest("Invalid input".into()).into()
    })
}

async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

fn resource(path: &str) -> Resource {
    web::resource(path)
        .route(web::method(Method::OPTIONS).to(preflight))
        .default_service(web::to(method_not_allowed))
}

pub(crate) fn client_info(req: &HttpRequest) -> ClientInfo {
    ClientInfo {
        ip: req.connection_info().realip_remote_addr().map(str::to_string),
        user_agent: req
            .headers()
            .get("User-Agent")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct ActionQuery {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(resource("/api/chat").route(web::post().to(chat::chat)))
        .service(
            resource("/api/auth")
                .route(web::post().to(auth::demo_post))
                .route(web::get().to(auth::demo_get)),
        )
        .service(resource("/api/auth_db").route(web::post().to(auth::database)))
        .service(resource("/api/check-session").route(web::get().to(auth::check_session)))
        .service(
            resource("/api/users")
                .route(web::get().to(users::read))
                .route(web::post().to(users::write)),
        )
        .service(
            resource("/api/dashboard-data")
                .route(web::get().to(dashboard::read))
                .route(web::post().to(dashboard::write)),
        )
        .service(
            resource("/api/analytics")
                .route(web::get().to(analytics::report))
                .route(web::post().to(analytics::report)),
        )
        .service(resource("/api/export-business-plan").route(web::post().to(export::export_plan)))
        .service(resource("/api/business-plan").route(web::post().to(export::business_plan)))
        .service(resource("/api/ideas").route(web::post().to(ideas::ideas)));
}

#[cfg(test)]
pub(crate) mod testing {
    use actix_web::web;
    use std::sync::Arc;

    use crate::activity_log::ActivityLog;
    use crate::auth::database::tests::memory_auth;
    use crate::auth::demo::DemoAuth;
    use crate::chat::ChatEngine;
    use crate::dashboard::DashboardStore;
    use crate::generator::DisabledGenerator;
    use crate::AppState;

    pub async fn state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let db_auth = memory_auth().await;
        db_auth.seed().await.unwrap();
        web::Data::new(AppState {
            chat: ChatEngine::new(Arc::new(DisabledGenerator)),
            demo_auth: DemoAuth::new(24, 30),
            db_auth,
            dashboard: DashboardStore::open(dir.path().join("dashboard_data.json")).unwrap(),
            activity: ActivityLog::new(dir.path().join("user_activities.log")),
        })
    }

    /// Full app wrapped the way `main` wraps it.
    #[macro_export]
    macro_rules! test_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .wrap($crate::api::cors())
                    .app_data($state.clone())
                    .configure($crate::api::configure),
            )
            .await
        };
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};

    use super::testing;

    #[actix_web::test]
    async fn preflight_and_wrong_methods() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri("/api/chat")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("Access-Control-Allow-Origin").unwrap(), "*");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/chat").to_request()).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn malformed_json_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/ideas")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid input");
    }
}
