use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::client_info;
use crate::ideas::{self, IdeaRequest};
use crate::AppState;

pub async fn ideas(state: web::Data<AppState>, req: HttpRequest, body: web::Json<IdeaRequest>) -> HttpResponse {
    let response = ideas::respond(body.into_inner());
    state.activity.track(
        "ideas",
        json!({ "location": response.location, "interests": response.interests, "budget": response.budget }),
        &client_info(&req),
    );
    HttpResponse::Ok().json(response)
}
