use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::ActionQuery;
use crate::error::ApiError;
use crate::AppState;

const DEFAULT_LIMIT: usize = 10;

pub async fn read(state: web::Data<AppState>, query: web::Query<ActionQuery>) -> Result<HttpResponse, ApiError> {
    let data = match query.action.as_deref().unwrap_or("stats") {
        "stats" => Value::Object(state.dashboard.stats()?),
        "activities" => {
            let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
            serde_json::to_value(state.dashboard.recent_activities(limit)?)
                .map_err(|e| ApiError::Internal(e.to_string()))?
        }
        _ => return Err(ApiError::InvalidAction),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum Command {
    AddActivity {
        #[serde(default, rename = "type")]
        kind: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        description: String,
    },
    UpdateStats {
        #[serde(default)]
        stats: Map<String, Value>,
    },
}

pub async fn write(state: web::Data<AppState>, body: web::Json<Value>) -> Result<HttpResponse, ApiError> {
    let command: Command = serde_json::from_value(body.into_inner()).map_err(|_| ApiError::InvalidAction)?;

    let data = match command {
        Command::AddActivity { kind, title, description } => {
            if kind.is_empty() || title.is_empty() {
                return Ok(HttpResponse::BadRequest().json(json!({
                    "success": false,
                    "error": "Missing required fields",
                })));
            }
            let activity = state.dashboard.add_activity(&kind, &title, &description)?;
            serde_json::to_value(activity).map_err(|e| ApiError::Internal(e.to_string()))?
        }
        Command::UpdateStats { stats } => Value::Object(state.dashboard.update_stats(stats)?),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::api::testing;

    #[actix_web::test]
    async fn stats_and_activities() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::get().uri("/api/dashboard-data?action=stats").to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["active_projects"], 3);

        let req = test::TestRequest::get().uri("/api/dashboard-data?action=activities&limit=2").to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["id"], 1);
    }

    #[actix_web::test]
    async fn add_activity_then_read_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/dashboard-data")
            .set_json(json!({"action": "add_activity", "type": "research", "title": "Market scan"}))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["icon"], "fas fa-search");

        let req = test::TestRequest::get().uri("/api/dashboard-data?action=activities&limit=1").to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"][0]["title"], "Market scan");

        let req = test::TestRequest::post()
            .uri("/api/dashboard-data")
            .set_json(json!({"action": "add_activity", "type": "research"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Missing required fields");
    }

    #[actix_web::test]
    async fn update_stats_and_unknown_actions() {
        let dir = tempfile::tempdir().unwrap();
        let state = testing::state(&dir).await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/dashboard-data")
            .set_json(json!({"action": "update_stats", "stats": {"revenue_generated": 40000}}))
            .to_request();
        let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(body["data"]["revenue_generated"], 40000);

        let req = test::TestRequest::get().uri("/api/dashboard-data?action=everything").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"success": false, "error": "Invalid action"}));

        let req = test::TestRequest::post()
            .uri("/api/dashboard-data")
            .set_json(json!({"action": "drop_tables"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
