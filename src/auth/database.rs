use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use serde_json::json;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;

use super::password::{hash_password, verify_password};
use super::{
    initials, required, AuthError, AuthProvider, AuthUser, ClientInfo, Credentials, Registered,
    Registration, Session,
};
use crate::settings;

pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    phone TEXT,
    country TEXT DEFAULT 'Rwanda',
    city TEXT DEFAULT 'Musanze',
    profile_image TEXT,
    bio TEXT,
    user_type TEXT NOT NULL DEFAULT 'entrepreneur',
    status TEXT NOT NULL DEFAULT 'active',
    email_verified INTEGER NOT NULL DEFAULT 0,
    email_verification_token TEXT,
    last_login TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS user_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    session_token TEXT NOT NULL UNIQUE,
    ip_address TEXT,
    user_agent TEXT,
    expires_at TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS business_plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    business_type TEXT,
    content TEXT,
    status TEXT NOT NULL DEFAULT 'draft',
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS chat_conversations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS chat_messages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    conversation_id INTEGER NOT NULL REFERENCES chat_conversations(id) ON DELETE CASCADE,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    role TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS business_ideas (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    description TEXT,
    category TEXT,
    location TEXT,
    budget_range TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS analytics_data (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    metric_name TEXT NOT NULL,
    metric_value REAL NOT NULL,
    period TEXT,
    recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS resources (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    category TEXT,
    resource_type TEXT,
    url TEXT,
    tags TEXT,
    is_featured INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
CREATE TABLE IF NOT EXISTS user_preferences (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    preference_key TEXT NOT NULL,
    preference_value TEXT,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, preference_key)
);
CREATE TABLE IF NOT EXISTS business_plan_templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    business_type TEXT,
    industry TEXT,
    location TEXT,
    template_data TEXT,
    is_default INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

pub const TABLES: &[&str] = &[
    "users",
    "business_plans",
    "chat_conversations",
    "chat_messages",
    "business_ideas",
    "analytics_data",
    "resources",
    "user_sessions",
    "user_preferences",
    "business_plan_templates",
];

/// Timestamps are stored as sortable UTC text.
pub(crate) fn db_time(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// 32 random bytes, hex encoded.
fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    user_type: String,
    status: String,
    email_verified: bool,
}

impl UserRow {
    fn public(&self) -> AuthUser {
        let name = format!("{} {}", self.first_name, self.last_name);
        AuthUser {
            id: self.id,
            email: self.email.clone(),
            avatar: initials(&name),
            name,
            first_name: Some(self.first_name.clone()),
            last_name: Some(self.last_name.clone()),
            role: None,
            user_type: Some(self.user_type.clone()),
        }
    }
}

const USER_COLUMNS: &str =
    "u.id, u.email, u.password_hash, u.first_name, u.last_name, u.user_type, u.status, u.email_verified";

/// Counts written by [`DatabaseAuth::seed`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub admin_users: u64,
    pub templates: u64,
    pub resources: u64,
}

/// Accounts and sessions in SQLite.
pub struct DatabaseAuth {
    pool: SqlitePool,
    session_ttl: Duration,
    remember_me_ttl: Duration,
}

impl DatabaseAuth {
    pub async fn connect(url: &str, auth: &settings::Auth) -> Result<Self, AuthError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let mut pool = SqlitePoolOptions::new();
        if url.contains(":memory:") {
            // Every connection to :memory: is its own database.
            pool = pool.max_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool.connect_with(options).await?;
        Self::migrate(&pool).await?;
        Ok(Self::with_pool(pool, auth))
    }

    pub fn with_pool(pool: SqlitePool, auth: &settings::Auth) -> Self {
        Self {
            pool,
            session_ttl: Duration::hours(auth.session_ttl_hours),
            remember_me_ttl: Duration::days(auth.remember_me_days),
        }
    }

    pub async fn migrate(pool: &SqlitePool) -> Result<(), AuthError> {
        sqlx::raw_sql(SCHEMA).execute(pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AuthError> {
        let sql = format!("SELECT {} FROM users u WHERE u.email = ?", USER_COLUMNS);
        Ok(sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Deletes every session past its expiry; returns how many went.
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < ?")
            .bind(db_time(Utc::now()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Seeds the verified admin account, plan templates and resources.
    /// Rows already present are left alone.
    pub async fn seed(&self) -> Result<SeedReport, AuthError> {
        let mut report = SeedReport::default();

        if self.find_by_email("admin@innostart.com").await?.is_none() {
            let result = sqlx::query(
                "INSERT INTO users (email, password_hash, first_name, last_name, user_type, status, email_verified) \
                 VALUES ('admin@innostart.com', ?, 'Admin', 'User', 'admin', 'active', 1)",
            )
            .bind(hash_password("admin123")?)
            .execute(&self.pool)
            .await?;
            report.admin_users = result.rows_affected();
        }

        let templates: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM business_plan_templates")
            .fetch_one(&self.pool)
            .await?;
        if templates == 0 {
            for (name, business_type, industry) in SEED_TEMPLATES {
                let data = json!({
                    "sections": {
                        "executive_summary": format!("{} business plan", name),
                        "market_analysis": "Target market analysis",
                        "financial_projections": {
                            "startup_costs": "1000000-10000000",
                            "monthly_revenue": "500000-5000000",
                        },
                    },
                });
                sqlx::query(
                    "INSERT INTO business_plan_templates (name, business_type, industry, location, template_data, is_default, is_active) \
                     VALUES (?, ?, ?, 'Musanze', ?, 1, 1)",
                )
                .bind(name)
                .bind(business_type)
                .bind(industry)
                .bind(data.to_string())
                .execute(&self.pool)
                .await?;
                report.templates += 1;
            }
        }

        let resources: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resources")
            .fetch_one(&self.pool)
            .await?;
        if resources == 0 {
            for (title, description, category, kind) in SEED_RESOURCES {
                let tags = json!([category.to_lowercase(), "startup", "business"]);
                sqlx::query(
                    "INSERT INTO resources (title, description, category, resource_type, tags, is_featured, is_active) \
                     VALUES (?, ?, ?, ?, ?, 1, 1)",
                )
                .bind(title)
                .bind(description)
                .bind(category)
                .bind(kind)
                .bind(tags.to_string())
                .execute(&self.pool)
                .await?;
                report.resources += 1;
            }
        }

        Ok(report)
    }
}

const SEED_TEMPLATES: [(&str, &str, &str); 6] = [
    ("Mountain Hiking Tours", "Tourism", "Adventure Tourism"),
    ("Volcano Trekking", "Tourism", "Adventure Tourism"),
    ("Local Restaurant", "Food & Beverage", "Restaurant"),
    ("Eco-lodges", "Hospitality", "Eco-tourism"),
    ("Food Processing", "Manufacturing", "Food Processing"),
    ("Coffee Processing", "Manufacturing", "Coffee Processing"),
];

const SEED_RESOURCES: [(&str, &str, &str, &str); 6] = [
    ("Market Research Guide", "Comprehensive guide to conducting market research for startups", "Research", "guide"),
    ("Legal Requirements Checklist", "Essential legal requirements for starting a business in Rwanda", "Legal", "checklist"),
    ("Marketing Strategy Framework", "Step-by-step framework for developing marketing strategies", "Marketing", "framework"),
    ("Financial Projections Template", "Excel template for creating financial projections", "Finance", "template"),
    ("Business Plan Structure", "Complete business plan structure and guidelines", "Planning", "template"),
    ("Funding Strategy Toolkit", "Tools and strategies for securing business funding", "Funding", "toolkit"),
];

#[async_trait]
impl AuthProvider for DatabaseAuth {
    async fn login(&self, credentials: &Credentials, client: &ClientInfo) -> Result<Session, AuthError> {
        credentials.validate()?;
        let user = self
            .find_by_email(credentials.email.trim())
            .await?
            .filter(|u| u.status == "active")
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.email_verified {
            return Err(AuthError::EmailNotVerified);
        }

        let now = Utc::now();
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(db_time(now))
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        let ttl = if credentials.remember_me { self.remember_me_ttl } else { self.session_ttl };
        let token = random_token();
        let expires_at = now + ttl;
        sqlx::query(
            "INSERT INTO user_sessions (user_id, session_token, ip_address, user_agent, expires_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user.id)
        .bind(&token)
        .bind(client.ip.as_deref())
        .bind(client.user_agent.as_deref())
        .bind(db_time(expires_at))
        .execute(&self.pool)
        .await?;

        log::info!("user {} logged in", user.id);
        Ok(Session { token, user: user.public(), expires_at })
    }

    async fn register(&self, registration: &Registration) -> Result<Registered, AuthError> {
        let email = required(&registration.email, "email")?;
        let password = required(&registration.password, "password")?;
        let first_name = required(&registration.first_name, "first_name")?;
        let last_name = required(&registration.last_name, "last_name")?;

        if self.find_by_email(email).await?.is_some() {
            return Err(AuthError::AlreadyExists("Email address already registered".into()));
        }

        let verification_token = random_token();
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, first_name, last_name, phone, country, city, user_type, email_verification_token) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(email)
        .bind(hash_password(password)?)
        .bind(first_name)
        .bind(last_name)
        .bind(registration.phone.as_deref())
        .bind(registration.country.as_deref().unwrap_or("Rwanda"))
        .bind(registration.city.as_deref().unwrap_or("Musanze"))
        .bind(registration.user_type.as_deref().unwrap_or("entrepreneur"))
        .bind(&verification_token)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();
        // TODO: deliver the verification token by email; until then the account cannot log in.
        log::warn!("verification email for user {} was not sent; account stays unverified", user_id);

        Ok(Registered {
            user_id: Some(user_id),
            message: "Registration successful. Please check your email to verify your account.".into(),
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM user_sessions WHERE session_token = ?")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn verify_session(&self, token: &str) -> Result<AuthUser, AuthError> {
        let sql = format!(
            "SELECT {} FROM users u JOIN user_sessions s ON u.id = s.user_id \
             WHERE s.session_token = ? AND s.expires_at > ? AND u.status = 'active'",
            USER_COLUMNS
        );
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(token)
            .bind(db_time(Utc::now()))
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.public())
            .ok_or(AuthError::InvalidSession)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn auth_settings() -> settings::Auth {
        settings::Auth { session_ttl_hours: 24, remember_me_days: 7, demo_remember_me_days: 30 }
    }

    pub(crate) async fn memory_auth() -> DatabaseAuth {
        DatabaseAuth::connect("sqlite::memory:", &auth_settings()).await.unwrap()
    }

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials { email: email.into(), password: password.into(), remember_me: false }
    }

    fn form(email: &str) -> Registration {
        Registration {
            email: Some(email.into()),
            password: Some("pa55word".into()),
            first_name: Some("Aline".into()),
            last_name: Some("Uwase".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn seeded_admin_can_log_in_and_hold_a_session() {
        let auth = memory_auth().await;
        let report = auth.seed().await.unwrap();
        assert_eq!(report, SeedReport { admin_users: 1, templates: 6, resources: 6 });
        // seeding twice changes nothing
        assert_eq!(auth.seed().await.unwrap(), SeedReport::default());

        let session = auth.login(&creds("admin@innostart.com", "admin123"), &ClientInfo::default()).await.unwrap();
        assert_eq!(session.token.len(), 64);
        assert_eq!(session.user.name, "Admin User");
        assert_eq!(session.user.avatar, "AU");

        let user = auth.verify_session(&session.token).await.unwrap();
        assert_eq!(user.email, "admin@innostart.com");

        auth.logout(&session.token).await.unwrap();
        assert!(matches!(auth.verify_session(&session.token).await, Err(AuthError::InvalidSession)));
    }

    #[tokio::test]
    async fn wrong_password_is_generic() {
        let auth = memory_auth().await;
        auth.seed().await.unwrap();
        let err = auth.login(&creds("admin@innostart.com", "nope"), &ClientInfo::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid email or password");
    }

    #[tokio::test]
    async fn registered_accounts_stay_unverified() {
        let auth = memory_auth().await;
        let registered = auth.register(&form("aline@example.com")).await.unwrap();
        assert!(registered.user_id.is_some());

        let err = auth.login(&creds("aline@example.com", "pa55word"), &ClientInfo::default()).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailNotVerified));

        let dup = auth.register(&form("aline@example.com")).await.unwrap_err();
        assert_eq!(dup.to_string(), "Email address already registered");
    }

    #[tokio::test]
    async fn registration_names_the_missing_field() {
        let auth = memory_auth().await;
        let mut incomplete = form("x@example.com");
        incomplete.last_name = None;
        let err = auth.register(&incomplete).await.unwrap_err();
        assert_eq!(err.to_string(), "Field 'last_name' is required");
    }

    #[tokio::test]
    async fn expired_sessions_are_invalid_and_cleaned_up() {
        let auth = memory_auth().await;
        auth.seed().await.unwrap();
        sqlx::query("INSERT INTO user_sessions (user_id, session_token, expires_at) VALUES (1, 'old', ?)")
            .bind(db_time(Utc::now() - Duration::hours(1)))
            .execute(auth.pool())
            .await
            .unwrap();

        assert!(auth.verify_session("old").await.is_err());
        assert_eq!(auth.cleanup_expired_sessions().await.unwrap(), 1);
    }
}
