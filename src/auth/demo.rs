use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{
    initials, AuthError, AuthProvider, AuthUser, ClientInfo, Credentials, Registered, Registration,
    Session,
};

struct DemoAccount {
    id: i64,
    email: &'static str,
    password: &'static str,
    name: &'static str,
    role: &'static str,
}

const ACCOUNTS: &[DemoAccount] = &[
    DemoAccount { id: 1, email: "admin@innostart.com", password: "admin123", name: "John Doe", role: "admin" },
    DemoAccount { id: 2, email: "user@innostart.com", password: "user123", name: "Jane Smith", role: "user" },
    DemoAccount { id: 3, email: "demo@innostart.com", password: "demo123", name: "Demo User", role: "user" },
];

impl DemoAccount {
    fn public(&self) -> AuthUser {
        AuthUser {
            id: self.id,
            email: self.email.to_string(),
            name: self.name.to_string(),
            first_name: None,
            last_name: None,
            role: Some(self.role.to_string()),
            user_type: None,
            avatar: initials(self.name),
        }
    }
}

struct LiveSession {
    user_id: i64,
    expires_at: chrono::DateTime<Utc>,
}

/// Fixed demo accounts with plaintext passwords and an in-process session table.
pub struct DemoAuth {
    sessions: RwLock<HashMap<String, LiveSession>>,
    session_ttl: Duration,
    remember_me_ttl: Duration,
}

impl DemoAuth {
    pub fn new(session_ttl_hours: i64, remember_me_days: i64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            session_ttl: Duration::hours(session_ttl_hours),
            remember_me_ttl: Duration::days(remember_me_days),
        }
    }

    pub fn remember_me_ttl(&self) -> Duration {
        self.remember_me_ttl
    }

    /// Drops every session past its expiry; returns how many went.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    fn account(id: i64) -> Option<&'static DemoAccount> {
        ACCOUNTS.iter().find(|a| a.id == id)
    }
}

#[async_trait]
impl AuthProvider for DemoAuth {
    async fn login(&self, credentials: &Credentials, _client: &ClientInfo) -> Result<Session, AuthError> {
        credentials.validate()?;
        let email = credentials.email.trim();
        let account = ACCOUNTS
            .iter()
            .find(|a| a.email == email && a.password == credentials.password)
            .ok_or(AuthError::InvalidCredentials)?;

        let ttl = if credentials.remember_me { self.remember_me_ttl } else { self.session_ttl };
        let token = uuid::Uuid::new_v4().simple().to_string();
        let now = Utc::now();
        let expires_at = now + ttl;
        {
            let mut sessions = self.sessions.write();
            sessions.retain(|_, s| s.expires_at > now);
            sessions.insert(token.clone(), LiveSession { user_id: account.id, expires_at });
        }

        log::info!("demo login for user {}", account.id);
        Ok(Session { token, user: account.public(), expires_at })
    }

    /// Validates the form only; demo accounts are never persisted.
    async fn register(&self, registration: &Registration) -> Result<Registered, AuthError> {
        let filled = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
        if !(filled(&registration.name) && filled(&registration.email) && filled(&registration.password)) {
            return Err(AuthError::Validation("All fields are required".into()));
        }
        let email = registration.email.as_deref().unwrap_or_default().trim();
        if ACCOUNTS.iter().any(|a| a.email == email) {
            return Err(AuthError::AlreadyExists("User already exists".into()));
        }
        Ok(Registered {
            user_id: None,
            message: "Registration successful! You can now login.".into(),
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.write().remove(token);
        Ok(())
    }

    async fn verify_session(&self, token: &str) -> Result<AuthUser, AuthError> {
        let user_id = {
            let sessions = self.sessions.read();
            match sessions.get(token) {
                Some(s) if s.expires_at > Utc::now() => Some(s.user_id),
                Some(_) => None,
                None => return Err(AuthError::InvalidSession),
            }
        };
        match user_id.and_then(Self::account) {
            Some(account) => Ok(account.public()),
            None => {
                self.sessions.write().remove(token);
                Err(AuthError::InvalidSession)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials { email: email.into(), password: password.into(), remember_me: false }
    }

    #[tokio::test]
    async fn login_then_verify_then_logout() {
        let auth = DemoAuth::new(24, 30);
        let session = auth.login(&creds("admin@innostart.com", "admin123"), &ClientInfo::default()).await.unwrap();
        assert_eq!(session.user.name, "John Doe");
        assert_eq!(session.user.avatar, "JD");
        assert_eq!(session.user.role.as_deref(), Some("admin"));

        let user = auth.verify_session(&session.token).await.unwrap();
        assert_eq!(user.id, 1);

        auth.logout(&session.token).await.unwrap();
        assert!(matches!(auth.verify_session(&session.token).await, Err(AuthError::InvalidSession)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let auth = DemoAuth::new(24, 30);
        let a = auth.login(&creds("admin@innostart.com", "wrongpass"), &ClientInfo::default()).await;
        let b = auth.login(&creds("nobody@innostart.com", "admin123"), &ClientInfo::default()).await;
        assert_eq!(a.unwrap_err().to_string(), b.unwrap_err().to_string());
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected() {
        let auth = DemoAuth::new(0, 30);
        let session = auth.login(&creds("demo@innostart.com", "demo123"), &ClientInfo::default()).await.unwrap();
        assert!(auth.verify_session(&session.token).await.is_err());
    }

    #[tokio::test]
    async fn logins_purge_expired_sessions() {
        let auth = DemoAuth::new(0, 30);
        for _ in 0..5 {
            auth.login(&creds("demo@innostart.com", "demo123"), &ClientInfo::default()).await.unwrap();
        }
        assert_eq!(auth.sessions.read().len(), 1);
        assert_eq!(auth.cleanup_expired_sessions(), 1);
        assert!(auth.sessions.read().is_empty());

        let live = DemoAuth::new(24, 30);
        for _ in 0..3 {
            live.login(&creds("user@innostart.com", "user123"), &ClientInfo::default()).await.unwrap();
        }
        assert_eq!(live.cleanup_expired_sessions(), 0);
        assert_eq!(live.sessions.read().len(), 3);
    }

    #[tokio::test]
    async fn remember_me_extends_the_session() {
        let auth = DemoAuth::new(1, 30);
        let mut c = creds("user@innostart.com", "user123");
        c.remember_me = true;
        let session = auth.login(&c, &ClientInfo::default()).await.unwrap();
        assert!(session.expires_at > Utc::now() + Duration::days(29));
    }

    #[tokio::test]
    async fn registration_checks_fields_and_duplicates() {
        let auth = DemoAuth::new(24, 30);
        let mut form = Registration {
            name: Some("New Person".into()),
            email: Some("user@innostart.com".into()),
            password: Some("secret".into()),
            ..Default::default()
        };
        assert!(matches!(auth.register(&form).await, Err(AuthError::AlreadyExists(_))));

        form.email = Some("new@innostart.com".into());
        let ok = auth.register(&form).await.unwrap();
        assert_eq!(ok.message, "Registration successful! You can now login.");

        form.password = None;
        assert_eq!(auth.register(&form).await.unwrap_err().to_string(), "All fields are required");
    }
}
