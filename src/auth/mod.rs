//! Two interchangeable login back ends behind one capability trait.
//!
//! [`demo::DemoAuth`] keeps three fixed accounts and an in-process session
//! table; [`database::DatabaseAuth`] stores hashed passwords and expiring
//! session tokens in SQLite. They deliberately do not share semantics beyond
//! [`AuthProvider`].

pub mod account;
pub mod database;
pub mod demo;
pub mod password;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Never says which of the two was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Please verify your email address before logging in")]
    EmailNotVerified,
    #[error("Invalid or expired session")]
    InvalidSession,
    #[error("Field '{0}' is required")]
    MissingField(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    AlreadyExists(String),
    #[error("User not found")]
    NotFound,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Storage(e.to_string())
    }
}

/// Public view of an account, safe to hand to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    pub avatar: String,
}

/// Upper-cased first letters of the first two name parts.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "rememberMe")]
    pub remember_me: bool,
}

impl Credentials {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AuthError::Validation("Email and password are required".into()));
        }
        Ok(())
    }
}

/// Where a login came from; stored with database sessions.
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

/// Present and non-blank, or `MissingField(field)`.
pub(crate) fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AuthError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AuthError::MissingField(field.to_string()))
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Registered {
    pub user_id: Option<i64>,
    pub message: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn login(&self, credentials: &Credentials, client: &ClientInfo) -> Result<Session, AuthError>;
    async fn register(&self, registration: &Registration) -> Result<Registered, AuthError>;
    async fn logout(&self, token: &str) -> Result<(), AuthError>;
    async fn verify_session(&self, token: &str) -> Result<AuthUser, AuthError>;
}
