use actix_web::{web, HttpResponse};
use serde_json::json;

use super::ActionQuery;
use crate::analytics::{Report, SimulatedAnalytics};
use crate::error::ApiError;
use crate::AppState;

/// `GET|POST /api/analytics?action=<report>`.
pub async fn report(state: web::Data<AppState>, query: web::Query<ActionQuery>) -> Result<HttpResponse, ApiError> {
    let report: Report = query
        .action
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|_| ApiError::InvalidAction)?;

    let data = SimulatedAnalytics::new(&state.dashboard, &state.activity).report(report)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::api::testing;

    #[actix_web::test]
    async fn reports_are_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::get().uri("/api/analytics?action=success_rates").to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["top_performing"], "Local Transport");

        let req = test::TestRequest::post().uri("/api/analytics?action=business_metrics").to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["total_businesses"], 156);
    }

    #[actix_web::test]
    async fn unknown_report_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        for uri in ["/api/analytics", "/api/analytics?action=forecast"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({"success": false, "error": "Invalid action"}));
        }
    }
}
