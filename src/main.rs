use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use innostart::activity_log::ActivityLog;
use innostart::auth::database::DatabaseAuth;
use innostart::auth::demo::DemoAuth;
use innostart::chat::ChatEngine;
use innostart::dashboard::DashboardStore;
use innostart::settings::Settings;
use innostart::{api, generator, AppState};

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::new().context("failed to load configuration")?;

    if let Some(parent) = settings.database.file_path().as_deref().and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("failed to create {:?}", parent))?;
        }
    }
    let db_auth = DatabaseAuth::connect(&settings.database.url, &settings.auth)
        .await
        .with_context(|| format!("failed to open database at {}", settings.database.url))?;
    let purged = db_auth.cleanup_expired_sessions().await?;
    if purged > 0 {
        log::info!("purged {} expired sessions", purged);
    }

    let dashboard = DashboardStore::open(&settings.data.dashboard_file)
        .with_context(|| format!("failed to open {:?}", settings.data.dashboard_file))?;

    let state = web::Data::new(AppState {
        chat: ChatEngine::new(Arc::from(generator::from_settings(&settings.generator))),
        demo_auth: DemoAuth::new(settings.auth.session_ttl_hours, settings.auth.demo_remember_me_days),
        db_auth,
        dashboard,
        activity: ActivityLog::new(&settings.data.activity_log),
    });

    let static_dir = settings.server.static_dir.clone();
    let serve_static = static_dir.is_dir();
    if !serve_static {
        log::warn!("static directory {:?} not found; serving the API only", static_dir);
    }

    let host = settings.server.host.clone();
    let port = settings.server.port;
    log::info!("Starting server at http://{}:{}", host, port);
    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(api::cors())
            .app_data(state.clone())
            .configure(api::configure)
            .configure(move |cfg| {
                // registered last so it never shadows /api
                if serve_static {
                    cfg.service(actix_files::Files::new("/", static_dir).index_file("index.html"));
                }
            })
    })
    .bind((host, port))?
    .run()
    .await?;
    Ok(())
}
