//! InnoStart: a business-planning assistant for entrepreneurs in Musanze, Rwanda.
//!
//! The library holds the chat engine, both authentication back ends, the
//! dashboard and usage stores, and the document generators. `main.rs` wires
//! them into an actix-web server; `bin/setup.rs` provisions storage.

pub mod activity_log;
pub mod analytics;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod generator;
pub mod ideas;
pub mod settings;

use activity_log::ActivityLog;
use auth::database::DatabaseAuth;
use auth::demo::DemoAuth;
use chat::ChatEngine;
use dashboard::DashboardStore;

/// Shared by every request handler through `web::Data`.
pub struct AppState {
    pub chat: ChatEngine,
    pub demo_auth: DemoAuth,
    pub db_auth: DatabaseAuth,
    pub dashboard: DashboardStore,
    pub activity: ActivityLog,
}
