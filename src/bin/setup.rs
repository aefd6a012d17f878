use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use innostart::auth::database::DatabaseAuth;
use innostart::dashboard::DashboardStore;
use innostart::settings::Settings;

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("failed to create {:?}", parent))?;
    }
    Ok(())
}

async fn run() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 1. Load Configuration
    let settings = Settings::new().context("failed to load configuration")?;

    // 2. Prepare data and log directories
    if let Some(db_file) = settings.database.file_path() {
        ensure_parent(&db_file)?;
    }
    ensure_parent(&settings.data.activity_log)?;
    ensure_parent(&settings.data.dashboard_file)?;

    // 3. Create schema and seed rows
    log::info!("Opening database at {}", settings.database.url);
    let db_auth = DatabaseAuth::connect(&settings.database.url, &settings.auth)
        .await
        .context("failed to open database")?;
    let report = db_auth.seed().await.context("failed to seed database")?;
    log::info!(
        "Seeded {} admin users, {} plan templates, {} resources",
        report.admin_users,
        report.templates,
        report.resources
    );

    let purged = db_auth.cleanup_expired_sessions().await?;
    log::info!("Removed {} expired sessions", purged);

    // 4. Dashboard document
    let dashboard = DashboardStore::open(&settings.data.dashboard_file)
        .with_context(|| format!("failed to open {:?}", settings.data.dashboard_file))?;
    let doc = dashboard.document()?;
    log::info!(
        "Dashboard document at {:?} holds {} activities and {} plans",
        dashboard.path(),
        doc.recent_activities.len(),
        doc.business_plans.len()
    );

    log::info!("Setup complete!");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error during setup: {:?}", e);
        std::process::exit(1);
    }
}
