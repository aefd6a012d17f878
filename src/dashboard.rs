//! Dashboard document store.
//!
//! One JSON document on disk holds the headline stats, the recent activity
//! feed and the sample plan and chat lists. Every read-modify-write runs
//! under a single lock and lands on disk through write-to-temp, fsync and
//! rename, so concurrent writers never lose each other's updates.

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// The feed keeps this many entries, newest first.
pub const MAX_ACTIVITIES: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("dashboard file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("dashboard file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    /// Unix seconds.
    pub timestamp: i64,
    pub icon: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSessionSummary {
    pub id: u64,
    pub topic: String,
    pub messages_count: u32,
    pub last_activity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardDocument {
    /// Open-ended so `update_stats` can add keys.
    pub stats: Map<String, Value>,
    pub recent_activities: Vec<Activity>,
    #[serde(default)]
    pub business_plans: Vec<PlanSummary>,
    #[serde(default)]
    pub chat_sessions: Vec<ChatSessionSummary>,
}

fn style_for(kind: &str) -> (&'static str, &'static str) {
    match kind {
        "business_plan" => ("fas fa-file-alt", "primary"),
        "chat" => ("fas fa-comments", "success"),
        "research" => ("fas fa-search", "info"),
        "financial" => ("fas fa-chart-line", "warning"),
        "user" => ("fas fa-user", "secondary"),
        "system" => ("fas fa-cog", "dark"),
        _ => ("fas fa-circle", "secondary"),
    }
}

fn activity(id: u64, kind: &str, title: &str, description: &str, timestamp: i64) -> Activity {
    let (icon, color) = style_for(kind);
    Activity {
        id,
        kind: kind.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        timestamp,
        icon: icon.to_string(),
        color: color.to_string(),
    }
}

impl DashboardDocument {
    pub fn initial(now: i64) -> Self {
        let stats = json!({
            "active_projects": 8,
            "revenue_generated": 32450,
            "total_users": 847,
            "success_rate": 92,
        });
        let plan = |id, name: &str, kind: &str, status: &str, age| PlanSummary {
            id,
            name: name.into(),
            kind: kind.into(),
            status: status.into(),
            created_at: now - age,
        };
        Self {
            stats: stats.as_object().cloned().unwrap_or_default(),
            recent_activities: vec![
                activity(1, "business_plan", "Business Plan Created", "TechStart Solutions business plan completed", now - 7200),
                activity(2, "chat", "AI Chat Session", "Discussed funding strategies with AI assistant", now - 14400),
                activity(3, "research", "Market Research", "Completed competitor analysis for retail sector", now - 86400),
                activity(4, "financial", "Financial Projections", "Updated Q4 revenue projections", now - 172800),
                activity(5, "business_plan", "Business Plan Updated", "Revised marketing strategy section", now - 259200),
            ],
            business_plans: vec![
                plan(1, "TechStart Solutions", "Technology", "completed", 7200),
                plan(2, "Green Energy Co.", "Energy", "in_progress", 86400),
                plan(3, "Local Food Delivery", "Food & Beverage", "completed", 172800),
            ],
            chat_sessions: vec![
                ChatSessionSummary { id: 1, topic: "Funding Strategies".into(), messages_count: 12, last_activity: now - 14400 },
                ChatSessionSummary { id: 2, topic: "Market Analysis".into(), messages_count: 8, last_activity: now - 86400 },
            ],
        }
    }
}

pub struct DashboardStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl DashboardStore {
    /// Opens the document, writing the seed data first if the file is missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into(), lock: Mutex::new(()) };
        if !store.path.exists() {
            log::info!("seeding dashboard document at {:?}", store.path);
            store.save(&DashboardDocument::initial(chrono::Utc::now().timestamp()))?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<DashboardDocument, StoreError> {
        if !self.path.exists() {
            return Ok(DashboardDocument::initial(chrono::Utc::now().timestamp()));
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, doc: &DashboardDocument) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut tmp_name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        let mut tmp = File::create(&tmp_path)?;
        tmp.write_all(serde_json::to_string_pretty(doc)?.as_bytes())?;
        tmp.sync_all()?;
        drop(tmp);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Runs `f` on the current document and persists the result, all under the lock.
    fn update<T>(&self, f: impl FnOnce(&mut DashboardDocument) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.lock();
        let mut doc = self.load()?;
        let out = f(&mut doc);
        self.save(&doc)?;
        Ok(out)
    }

    pub fn document(&self) -> Result<DashboardDocument, StoreError> {
        let _guard = self.lock.lock();
        self.load()
    }

    /// Stored stats with `active_projects` recounted and `total_users` /
    /// `success_rate` jittered. Not idempotent.
    pub fn stats(&self) -> Result<Map<String, Value>, StoreError> {
        let doc = self.document()?;
        let mut stats = doc.stats;
        let mut rng = rand::thread_rng();

        stats.insert("active_projects".into(), json!(doc.business_plans.len()));
        let users = stats.get("total_users").and_then(Value::as_i64).unwrap_or(0);
        stats.insert("total_users".into(), json!(users.saturating_add(rng.gen_range(-10..=10))));
        let rate = stats.get("success_rate").and_then(Value::as_i64).unwrap_or(0);
        stats.insert("success_rate".into(), json!(rate.saturating_add(rng.gen_range(-2..=2)).clamp(0, 100)));
        Ok(stats)
    }

    /// Newest first, at most `limit` entries.
    pub fn recent_activities(&self, limit: usize) -> Result<Vec<Activity>, StoreError> {
        let mut activities = self.document()?.recent_activities;
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        activities.truncate(limit);
        Ok(activities)
    }

    pub fn add_activity(&self, kind: &str, title: &str, description: &str) -> Result<Activity, StoreError> {
        self.update(|doc| {
            let id = doc.recent_activities.iter().map(|a| a.id).max().unwrap_or(0) + 1;
            let entry = activity(id, kind, title, description, chrono::Utc::now().timestamp());
            doc.recent_activities.insert(0, entry.clone());
            doc.recent_activities.truncate(MAX_ACTIVITIES);
            entry
        })
    }

    /// Shallow merge: top-level keys in `partial` replace stored ones.
    pub fn update_stats(&self, partial: Map<String, Value>) -> Result<Map<String, Value>, StoreError> {
        self.update(|doc| {
            doc.stats.extend(partial);
            doc.stats.clone()
        })
    }
}
