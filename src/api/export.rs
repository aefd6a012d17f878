use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::client_info;
use crate::error::ApiError;
use crate::export::{self, ExportRequest, PlanBrief};
use crate::AppState;

pub async fn export_plan(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ExportRequest>,
) -> Result<HttpResponse, ApiError> {
    let file = export::export(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    state.activity.track(
        "export",
        json!({ "business_type": body.business_type, "format": file.format }),
        &client_info(&req),
    );
    Ok(HttpResponse::Ok().json(file))
}

/// Free-form plan served as a printable page.
pub async fn business_plan(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<PlanBrief>,
) -> HttpResponse {
    let html = export::brief_html(&body);
    state.activity.track(
        "business_plan",
        json!({ "business_name": body.business_name, "business_type": body.business_type }),
        &client_info(&req),
    );
    HttpResponse::Ok()
        .content_type("text/html; charset=UTF-8")
        .insert_header((header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"))
        .insert_header((header::PRAGMA, "no-cache"))
        .insert_header((header::EXPIRES, "0"))
        .body(html)
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::api::testing;

    #[actix_web::test]
    async fn export_returns_a_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/export-business-plan")
            .set_json(json!({"business_type": "Guesthouse", "format": "excel"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["format"], "excel");
        assert_eq!(body["filename"], "Guesthouse_Business_Plan.csv");
        assert!(body.get("html").is_none());
    }

    #[actix_web::test]
    async fn export_validation_errors() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let cases = [
            (json!({"format": "pdf"}), "Missing required parameters"),
            (json!({"business_type": "Guesthouse", "format": "odt"}), "Invalid format. Allowed: pdf, word, excel, powerpoint"),
        ];
        for (payload, message) in cases {
            let req = test::TestRequest::post().uri("/api/export-business-plan").set_json(payload).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["message"], message);
        }
    }

    #[actix_web::test]
    async fn business_plan_is_html() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/business-plan")
            .set_json(json!({"businessName": "Kinigi Coffee", "businessType": "coffee"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get("Content-Type").unwrap().to_str().unwrap().starts_with("text/html"));
        let body = test::read_body(resp).await;
        let html = std::str::from_utf8(&body).unwrap();
        assert!(html.contains("<h2>Kinigi Coffee</h2>"));
        assert!(html.contains("<strong>Business Type:</strong> Coffee"));
    }
}
