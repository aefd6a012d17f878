use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::client_info;
use crate::chat::ChatRequest;
use crate::error::ApiError;
use crate::AppState;

pub async fn chat(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, ApiError> {
    let ChatRequest { message, history, budget } = body.into_inner();
    let message = message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Message is required".into()))?;

    let reply = state.chat.respond(&message, &history, budget).await;
    state.activity.track(
        "chat",
        json!({ "message_length": message.chars().count(), "history_length": history.len() }),
        &client_info(&req),
    );
    Ok(HttpResponse::Ok().json(reply))
}
