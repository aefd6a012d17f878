use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::auth::bearer_user;
use super::ActionQuery;
use crate::auth::account::ProfileUpdate;
use crate::error::ApiError;
use crate::AppState;

pub async fn read(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ActionQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = bearer_user(&state, &req).await?;
    let auth = &state.db_auth;

    let body = match query.action.as_deref().unwrap_or("profile") {
        "profile" => json!({ "success": true, "user": auth.profile(user_id).await? }),
        "stats" => json!({ "success": true, "stats": auth.stats(user_id).await? }),
        "preferences" => json!({ "success": true, "preferences": auth.preferences(user_id).await? }),
        _ => return Err(ApiError::BadRequest("Invalid action".into())),
    };
    Ok(HttpResponse::Ok().json(body))
}

#[derive(Debug, Deserialize)]
struct PasswordChange {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct PreferencesPatch {
    #[serde(default)]
    preferences: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DeleteConfirmation {
    #[serde(default)]
    password: String,
}

fn parse<T: for<'de> Deserialize<'de>>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|_| ApiError::BadRequest("Invalid input".into()))
}

pub async fn write(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ActionQuery>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let user_id = bearer_user(&state, &req).await?;
    let auth = &state.db_auth;
    let body = body.into_inner();

    let message = match query.action.as_deref() {
        Some("update-profile") => {
            auth.update_profile(user_id, &parse::<ProfileUpdate>(body)?).await?;
            "Profile updated successfully"
        }
        Some("change-password") => {
            let change: PasswordChange = parse(body)?;
            auth.change_password(user_id, &change.current_password, &change.new_password).await?;
            "Password changed successfully"
        }
        Some("update-preferences") => {
            let patch: PreferencesPatch = parse(body)?;
            auth.update_preferences(user_id, &patch.preferences).await?;
            "Preferences updated successfully"
        }
        Some("delete-account") => {
            let confirmation: DeleteConfirmation = parse(body)?;
            auth.delete_account(user_id, &confirmation.password).await?;
            "Account deleted successfully"
        }
        _ => return Err(ApiError::BadRequest("Invalid action".into())),
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": message })))
}
