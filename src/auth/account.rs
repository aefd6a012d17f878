//! Profile, statistics and preference management for database accounts.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, QueryBuilder, Sqlite};
use std::collections::BTreeMap;

use super::database::{db_time, DatabaseAuth};
use super::password::{hash_password, verify_password};
use super::AuthError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub user_type: String,
    pub status: String,
    pub email_verified: bool,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub business_plans: i64,
    pub business_ideas: i64,
    pub chat_conversations: i64,
    pub chat_messages: i64,
}

impl DatabaseAuth {
    pub async fn profile(&self, user_id: i64) -> Result<Profile, AuthError> {
        sqlx::query_as::<_, Profile>(
            "SELECT id, email, first_name, last_name, phone, country, city, profile_image, bio, \
             user_type, status, email_verified, last_login, created_at, updated_at \
             FROM users WHERE id = ? AND status = 'active'",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or(AuthError::NotFound)
    }

    pub async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<(), AuthError> {
        let fields: Vec<(&str, &String)> = [
            ("first_name", &update.first_name),
            ("last_name", &update.last_name),
            ("phone", &update.phone),
            ("country", &update.country),
            ("city", &update.city),
            ("bio", &update.bio),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_ref().map(|v| (column, v)))
        .collect();

        if fields.is_empty() {
            return Err(AuthError::Validation("No valid fields to update".into()));
        }

        // Column names come from the fixed list above, values are bound.
        let mut query = QueryBuilder::<Sqlite>::new("UPDATE users SET ");
        let mut set = query.separated(", ");
        for (column, value) in fields {
            set.push(format!("{} = ", column));
            set.push_bind_unseparated(value.clone());
        }
        query
            .push(", updated_at = ")
            .push_bind(db_time(Utc::now()))
            .push(" WHERE id = ")
            .push_bind(user_id);

        let result = query.build().execute(self.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(AuthError::NotFound);
        }
        Ok(())
    }

    async fn password_hash(&self, user_id: i64) -> Result<String, AuthError> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(self.pool())
            .await?
            .ok_or(AuthError::NotFound)
    }

    pub async fn change_password(&self, user_id: i64, current: &str, new: &str) -> Result<(), AuthError> {
        if new.is_empty() {
            return Err(AuthError::MissingField("new_password".into()));
        }
        if !verify_password(current, &self.password_hash(user_id).await?)? {
            return Err(AuthError::Validation("Current password is incorrect".into()));
        }
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(hash_password(new)?)
            .bind(db_time(Utc::now()))
            .bind(user_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn count_owned(&self, table: &str, user_id: i64) -> Result<i64, AuthError> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE user_id = ?", table);
        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .bind(user_id)
            .fetch_one(self.pool())
            .await?)
    }

    pub async fn stats(&self, user_id: i64) -> Result<UserStats, AuthError> {
        Ok(UserStats {
            business_plans: self.count_owned("business_plans", user_id).await?,
            business_ideas: self.count_owned("business_ideas", user_id).await?,
            chat_conversations: self.count_owned("chat_conversations", user_id).await?,
            chat_messages: self.count_owned("chat_messages", user_id).await?,
        })
    }

    pub async fn preferences(&self, user_id: i64) -> Result<BTreeMap<String, String>, AuthError> {
        let rows: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT preference_key, preference_value FROM user_preferences WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(rows
            .into_iter()
            .map(|(key, value)| (key, value.unwrap_or_default()))
            .collect())
    }

    /// Upserts every key in one transaction. Non-string values are stored as JSON text.
    pub async fn update_preferences(
        &self,
        user_id: i64,
        preferences: &serde_json::Map<String, Value>,
    ) -> Result<(), AuthError> {
        let now = db_time(Utc::now());
        let mut tx = self.pool().begin().await?;
        for (key, value) in preferences {
            let stored = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            sqlx::query(
                "INSERT INTO user_preferences (user_id, preference_key, preference_value, updated_at) \
                 VALUES (?, ?, ?, ?) \
                 ON CONFLICT (user_id, preference_key) \
                 DO UPDATE SET preference_value = excluded.preference_value, updated_at = excluded.updated_at",
            )
            .bind(user_id)
            .bind(key)
            .bind(stored)
            .bind(&now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Removes the account after re-checking its password; owned rows cascade.
    pub async fn delete_account(&self, user_id: i64, password: &str) -> Result<(), AuthError> {
        if !verify_password(password, &self.password_hash(user_id).await?)? {
            return Err(AuthError::Validation("Invalid password".into()));
        }
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(self.pool())
            .await?;
        log::info!("account {} deleted", user_id);
        Ok(())
    }
}
