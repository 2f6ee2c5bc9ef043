use anyhow::{Context, Result};
use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tokio::task;

use crate::config::SecurityConfig;
use crate::entities::{prelude::*, roles, users};
use crate::models::{NewUser, UserPatch};

/// User row joined with its role. Carries the password hash, so it never
/// leaves the service layer.
#[derive(Debug, Clone)]
pub struct UserWithRole {
    pub user: users::Model,
    pub role: Option<roles::Model>,
}

impl UserWithRole {
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role.as_ref().map_or("", |r| r.name.as_str())
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<UserWithRole>> {
        let row = Users::find_by_id(id)
            .find_also_related(Roles)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(row.map(|(user, role)| UserWithRole { user, role }))
    }

    pub async fn list(&self) -> Result<Vec<UserWithRole>> {
        let rows = Users::find()
            .find_also_related(Roles)
            .order_by_asc(users::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list users")?;

        Ok(rows
            .into_iter()
            .map(|(user, role)| UserWithRole { user, role })
            .collect())
    }

    /// Looks a user up by user name or email. Emails are stored lowercased.
    pub async fn get_by_login(&self, login: &str) -> Result<Option<UserWithRole>> {
        let row = Users::find()
            .filter(
                Condition::any()
                    .add(users::Column::UserName.eq(login))
                    .add(users::Column::Email.eq(login.to_lowercase())),
            )
            .order_by_asc(users::Column::Id)
            .find_also_related(Roles)
            .one(&self.conn)
            .await
            .context("Failed to query user by login")?;

        Ok(row.map(|(user, role)| UserWithRole { user, role }))
    }

    pub async fn get_by_api_key(&self, api_key: &str) -> Result<Option<UserWithRole>> {
        let row = Users::find()
            .filter(users::Column::ApiKey.eq(api_key))
            .find_also_related(Roles)
            .one(&self.conn)
            .await
            .context("Failed to query user by API key")?;

        Ok(row.map(|(user, role)| UserWithRole { user, role }))
    }

    /// Whether another user (not `exclude`) already uses this user name.
    pub async fn user_name_taken(&self, user_name: &str, exclude: Option<i32>) -> Result<bool> {
        let mut query = Users::find().filter(users::Column::UserName.eq(user_name));
        if let Some(id) = exclude {
            query = query.filter(users::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check user name")?;
        Ok(count > 0)
    }

    /// Whether another user (not `exclude`) already uses this email.
    pub async fn email_taken(&self, email: &str, exclude: Option<i32>) -> Result<bool> {
        let mut query = Users::find().filter(users::Column::Email.eq(email));
        if let Some(id) = exclude {
            query = query.filter(users::Column::Id.ne(id));
        }

        let count = query
            .count(&self.conn)
            .await
            .context("Failed to check email")?;
        Ok(count > 0)
    }

    pub async fn count_with_role(&self, role_id: i32) -> Result<u64> {
        Users::find()
            .filter(users::Column::RoleId.eq(role_id))
            .count(&self.conn)
            .await
            .context("Failed to count users with role")
    }

    pub async fn create(
        &self,
        input: &NewUser,
        password_hash: String,
        role_id: i32,
    ) -> Result<users::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        users::ActiveModel {
            user_name: Set(input.user_name.clone()),
            email: Set(input.email.trim().to_lowercase()),
            password_hash: Set(password_hash),
            api_key: Set(generate_api_key()),
            profile: Set(input.profile.clone()),
            birthday: Set(input.birthday.clone()),
            role_id: Set(role_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert user")
    }

    pub async fn update(&self, existing: users::Model, patch: &UserPatch) -> Result<users::Model> {
        let mut active: users::ActiveModel = existing.into();
        if let Some(user_name) = &patch.user_name {
            active.user_name = Set(user_name.clone());
        }
        if let Some(email) = &patch.email {
            active.email = Set(email.trim().to_lowercase());
        }
        if let Some(birthday) = &patch.birthday {
            active.birthday = Set(Some(birthday.clone()));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update user")
    }

    pub async fn update_profile(
        &self,
        existing: users::Model,
        profile: Option<String>,
    ) -> Result<users::Model> {
        let mut active: users::ActiveModel = existing.into();
        active.profile = Set(profile);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update user profile")
    }

    pub async fn update_password_hash(&self, existing: users::Model, hash: String) -> Result<()> {
        let mut active: users::ActiveModel = existing.into();
        active.password_hash = Set(hash);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&self.conn)
            .await
            .context("Failed to update password")?;

        Ok(())
    }

    /// Replaces the user's API key and returns the new one.
    pub async fn regenerate_api_key(&self, existing: users::Model) -> Result<String> {
        let new_api_key = generate_api_key();

        let mut active: users::ActiveModel = existing.into();
        active.api_key = Set(new_api_key.clone());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        active
            .update(&self.conn)
            .await
            .context("Failed to regenerate API key")?;

        Ok(new_api_key)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete user")?;
        Ok(result.rows_affected > 0)
    }
}

/// Hash a password using Argon2id with the configured params.
///
/// CPU bound; call it from `spawn_blocking`.
pub fn hash_password(password: &str, config: &SecurityConfig) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let params = Params::new(
        config.argon2_memory_cost_kib,
        config.argon2_time_cost,
        config.argon2_parallelism,
        None,
    )
    .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Hashes on the blocking pool.
pub async fn hash_password_blocking(password: String, config: SecurityConfig) -> Result<String> {
    task::spawn_blocking(move || hash_password(&password, &config))
        .await
        .context("Password hashing task panicked")?
}

/// Verifies `password` against a stored PHC hash on the blocking pool.
///
/// The parameters are read from the hash itself, so hashes made with older
/// settings still verify.
pub async fn verify_password(password_hash: String, password: String) -> Result<bool> {
    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        Ok::<bool, anyhow::Error>(
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Generate a random API key (64 character hex string)
#[must_use]
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> SecurityConfig {
        SecurityConfig {
            argon2_memory_cost_kib: 1024,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_generate_api_key() {
        let key = generate_api_key();
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(key, generate_api_key());
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hash = hash_password_blocking("correct horse".to_string(), fast_config())
            .await
            .unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));

        assert!(
            verify_password(hash.clone(), "correct horse".to_string())
                .await
                .unwrap()
        );
        assert!(
            !verify_password(hash, "battery staple".to_string())
                .await
                .unwrap()
        );
    }

    #[test]
    fn test_invalid_params_are_rejected() {
        let config = SecurityConfig {
            argon2_memory_cost_kib: 1,
            ..fast_config()
        };
        assert!(hash_password("pw", &config).is_err());
    }
}
