//! `/api/auth` (demo accounts, cookie session), `/api/auth_db` (database
//! accounts, bearer-style session token) and `/api/check-session`.

use actix_web::cookie::{time, Cookie};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{client_info, ActionQuery};
use crate::auth::{AuthError, AuthProvider, Credentials, Registration};
use crate::error::ApiError;
use crate::AppState;

pub const SESSION_COOKIE: &str = "INNOSTART_SESSION";

fn parse<T: for<'de> Deserialize<'de>>(body: &Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone()).map_err(|e| {
        log::debug!("unusable auth payload: {}", e);
        ApiError::BadRequest("Invalid input".into())
    })
}

pub async fn demo_post(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ActionQuery>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    if query.action.as_deref() == Some("register") {
        let registration: Registration = parse(&body)?;
        let registered = state.demo_auth.register(&registration).await?;
        return Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": registered.message,
        })));
    }

    let credentials: Credentials = parse(&body)?;
    let session = state.demo_auth.login(&credentials, &client_info(&req)).await?;

    let mut cookie = Cookie::build(SESSION_COOKIE, session.token.clone())
        .path("/")
        .http_only(true)
        .finish();
    if credentials.remember_me {
        let ttl = state.demo_auth.remember_me_ttl();
        cookie.set_max_age(time::Duration::seconds(ttl.num_seconds()));
    }

    Ok(HttpResponse::Ok().cookie(cookie).json(json!({
        "success": true,
        "message": "Login successful",
        "user": session.user,
        "session_id": session.token,
    })))
}

pub async fn demo_get(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<ActionQuery>,
) -> Result<HttpResponse, ApiError> {
    let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());
    match query.action.as_deref() {
        Some("logout") => {
            if let Some(token) = &token {
                state.demo_auth.logout(token).await?;
            }
            let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
            removal.make_removal();
            Ok(HttpResponse::Ok()
                .cookie(removal)
                .json(json!({ "success": true, "message": "Logged out successfully" })))
        }
        Some("check") => {
            let user = match token {
                Some(token) => state.demo_auth.verify_session(&token).await.ok(),
                None => None,
            };
            Ok(HttpResponse::Ok().json(match user {
                Some(user) => json!({ "success": true, "logged_in": true, "user": user }),
                None => json!({ "success": true, "logged_in": false }),
            }))
        }
        _ => Err(ApiError::MethodNotAllowed),
    }
}

pub async fn check_session(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Ok(user) = state.demo_auth.verify_session(cookie.value()).await {
            return HttpResponse::Ok().json(json!({ "success": true, "logged_in": true, "user": user }));
        }
    }
    HttpResponse::Unauthorized().json(json!({
        "success": false,
        "logged_in": false,
        "message": "Not authenticated",
    }))
}

#[derive(Debug, Deserialize)]
struct DatabaseAction {
    #[serde(default = "default_action")]
    action: String,
    #[serde(default)]
    session_token: String,
}

fn default_action() -> String {
    "login".into()
}

pub async fn database(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let DatabaseAction { action, session_token } = parse(&body)?;
    let auth = &state.db_auth;

    let response = match action.as_str() {
        "login" => {
            let credentials: Credentials = parse(&body)?;
            let session = auth.login(&credentials, &client_info(&req)).await?;
            json!({
                "success": true,
                "message": "Login successful",
                "user": session.user,
                "session_token": session.token,
            })
        }
        "register" => {
            let registered = auth.register(&parse::<Registration>(&body)?).await?;
            json!({
                "success": true,
                "message": registered.message,
                "user_id": registered.user_id,
            })
        }
        "logout" => {
            auth.logout(&session_token).await?;
            json!({ "success": true, "message": "Logged out successfully" })
        }
        "verify" => {
            let user = auth.verify_session(&session_token).await?;
            json!({ "success": true, "user": user })
        }
        _ => return Err(ApiError::BadRequest("Invalid action".into())),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// `Authorization: Bearer <token>` against the database sessions.
pub(crate) async fn bearer_user(state: &AppState, req: &HttpRequest) -> Result<i64, ApiError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("User not authenticated".into()))?;

    match state.db_auth.verify_session(token).await {
        Ok(user) => Ok(user.id),
        Err(AuthError::InvalidSession) => Err(ApiError::Unauthorized("User not authenticated".into())),
        Err(e) => Err(e.into()),
    }
}
