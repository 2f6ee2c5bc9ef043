//! `SeaORM` implementation of the `UserService` trait.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::api::types::{ApiKeyResponse, LoginResponse, RoleDto, UserDto};
use crate::config::{Config, SecurityConfig};
use crate::constants::roles::{ADMIN_ROLE, DEFAULT_ROLE};
use crate::db::repositories::user::{hash_password_blocking, verify_password};
use crate::db::{Store, UserWithRole};
use crate::domain::validation::{
    validate_credentials, validate_new_admin, validate_new_role, validate_new_user,
    validate_password_change, validate_profile_patch, validate_user_patch,
};
use crate::domain::{Actor, Guard, Role, ServiceError};
use crate::entities::roles;
use crate::models::{
    Credentials, NewAdmin, NewRole, NewUser, PasswordChange, ProfilePatch, UserPatch,
};
use crate::services::user_service::UserService;

pub struct SeaOrmUserService {
    store: Arc<Store>,
    config: Arc<RwLock<Config>>,
}

impl SeaOrmUserService {
    #[must_use]
    pub const fn new(store: Arc<Store>, config: Arc<RwLock<Config>>) -> Self {
        Self { store, config }
    }

    async fn security(&self) -> SecurityConfig {
        self.config.read().await.security.clone()
    }

    async fn require_user(&self, user_id: i32) -> Result<UserWithRole, ServiceError> {
        self.store
            .users()
            .get(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    /// User name and email are checked independently so the caller learns
    /// which one collides.
    async fn ensure_unique(
        &self,
        user_name: Option<&str>,
        email: Option<&str>,
        exclude: Option<i32>,
    ) -> Result<(), ServiceError> {
        let users = self.store.users();
        if let Some(user_name) = user_name
            && users.user_name_taken(user_name, exclude).await?
        {
            return Err(ServiceError::conflict("User name is already taken"));
        }
        if let Some(email) = email
            && users.email_taken(&email.trim().to_lowercase(), exclude).await?
        {
            return Err(ServiceError::conflict("Email is already registered"));
        }
        Ok(())
    }

    async fn insert_user(&self, input: NewUser, role_id: i32) -> Result<UserDto, ServiceError> {
        self.ensure_unique(Some(&input.user_name), Some(&input.email), None)
            .await?;

        let security = self.security().await;
        let hash = hash_password_blocking(input.password.clone(), security).await?;

        let user = self
            .store
            .users()
            .create(&input, hash, role_id)
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::Conflict(_) => {
                    ServiceError::conflict("User name or email is already registered")
                }
                other => other,
            })?;

        metrics::counter!("users_created_total").increment(1);
        info!(user_id = user.id, role_id, "User created");

        let created = self.require_user(user.id).await?;
        Ok(user_dto(created))
    }

    async fn apply_patch(&self, user_id: i32, patch: UserPatch) -> Result<UserDto, ServiceError> {
        validate_user_patch(&patch)?;
        let existing = self.require_user(user_id).await?;
        self.ensure_unique(
            patch.user_name.as_deref(),
            patch.email.as_deref(),
            Some(user_id),
        )
        .await?;

        self.store.users().update(existing.user, &patch).await?;
        Ok(user_dto(self.require_user(user_id).await?))
    }

    async fn remove_user(&self, user_id: i32) -> Result<(), ServiceError> {
        if !self.store.users().delete(user_id).await? {
            return Err(ServiceError::not_found("User", user_id));
        }
        info!(user_id, "User deleted");
        Ok(())
    }
}

fn user_dto(row: UserWithRole) -> UserDto {
    let role = row.role_name().to_string();
    let user = row.user;
    UserDto {
        id: user.id,
        user_name: user.user_name,
        email: user.email,
        profile: user.profile,
        birthday: user.birthday,
        role_id: user.role_id,
        role,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn role_dto(role: roles::Model) -> RoleDto {
    RoleDto {
        id: role.id,
        name: role.name,
        created_at: role.created_at,
    }
}

fn actor_for(row: &UserWithRole) -> Actor {
    Actor::new(row.user.id, Role::from_name(row.role_name()))
}

#[async_trait]
impl UserService for SeaOrmUserService {
    async fn register(&self, input: NewUser) -> Result<UserDto, ServiceError> {
        let min_len = self.security().await.min_password_length;
        validate_new_user(&input, min_len)?;

        // A missing default role is a broken deployment, not a client error.
        let role = self
            .store
            .roles()
            .get_by_name(DEFAULT_ROLE)
            .await?
            .ok_or_else(|| ServiceError::internal(format!("Default role '{DEFAULT_ROLE}' is missing")))?;

        self.insert_user(input, role.id).await
    }

    async fn create_admin(&self, actor: Actor, input: NewAdmin) -> Result<UserDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        let min_len = self.security().await.min_password_length;
        validate_new_admin(&input, min_len)?;

        if self.store.roles().get(input.role_id).await?.is_none() {
            return Err(ServiceError::not_found("Role", input.role_id));
        }

        self.insert_user(input.user, input.role_id).await
    }

    async fn update(&self, actor: Actor, patch: UserPatch) -> Result<UserDto, ServiceError> {
        self.apply_patch(actor.user_id, patch).await
    }

    async fn admin_update(
        &self,
        actor: Actor,
        user_id: i32,
        patch: UserPatch,
    ) -> Result<UserDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        self.apply_patch(user_id, patch).await
    }

    async fn update_profile(
        &self,
        actor: Actor,
        patch: ProfilePatch,
    ) -> Result<UserDto, ServiceError> {
        validate_profile_patch(&patch)?;
        let existing = self.require_user(actor.user_id).await?;

        self.store
            .users()
            .update_profile(existing.user, patch.profile)
            .await?;
        Ok(user_dto(self.require_user(actor.user_id).await?))
    }

    async fn change_password(
        &self,
        actor: Actor,
        input: PasswordChange,
    ) -> Result<(), ServiceError> {
        let security = self.security().await;
        validate_password_change(&input, security.min_password_length)?;

        let existing = self.require_user(actor.user_id).await?;

        let matches = verify_password(
            existing.user.password_hash.clone(),
            input.current_password,
        )
        .await?;
        if !matches {
            warn!(actor = %actor, "Password change rejected: current password mismatch");
            return Err(ServiceError::unauthorized("Current password is incorrect"));
        }

        let hash = hash_password_blocking(input.new_password, security).await?;
        self.store
            .users()
            .update_password_hash(existing.user, hash)
            .await?;

        info!(actor = %actor, "Password changed");
        Ok(())
    }

    async fn delete_self(&self, actor: Actor) -> Result<(), ServiceError> {
        self.remove_user(actor.user_id).await
    }

    async fn delete(&self, actor: Actor, user_id: i32) -> Result<(), ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        self.remove_user(user_id).await
    }

    async fn get(&self, actor: Actor, user_id: i32) -> Result<UserDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        Ok(user_dto(self.require_user(user_id).await?))
    }

    async fn list(&self, actor: Actor) -> Result<Vec<UserDto>, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        let users = self.store.users().list().await?;
        Ok(users.into_iter().map(user_dto).collect())
    }

    async fn me(&self, actor: Actor) -> Result<UserDto, ServiceError> {
        Ok(user_dto(self.require_user(actor.user_id).await?))
    }

    async fn authenticate(&self, credentials: Credentials) -> Result<LoginResponse, ServiceError> {
        validate_credentials(&credentials)?;

        let invalid = || ServiceError::unauthorized("Invalid credentials");

        let Some(row) = self
            .store
            .users()
            .get_by_login(credentials.login.trim())
            .await?
        else {
            return Err(invalid());
        };

        let matches =
            verify_password(row.user.password_hash.clone(), credentials.password).await?;
        if !matches {
            return Err(invalid());
        }

        info!(user_id = row.user.id, "User logged in");
        let api_key = row.user.api_key.clone();
        Ok(LoginResponse {
            user: user_dto(row),
            api_key,
        })
    }

    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<Actor>, ServiceError> {
        let row = self.store.users().get_by_api_key(api_key).await?;
        Ok(row.as_ref().map(actor_for))
    }

    async fn resolve_user(&self, user_id: i32) -> Result<Option<Actor>, ServiceError> {
        let row = self.store.users().get(user_id).await?;
        Ok(row.as_ref().map(actor_for))
    }

    async fn api_key(&self, actor: Actor) -> Result<ApiKeyResponse, ServiceError> {
        let row = self.require_user(actor.user_id).await?;
        Ok(ApiKeyResponse {
            api_key: row.user.api_key,
        })
    }

    async fn regenerate_api_key(&self, actor: Actor) -> Result<ApiKeyResponse, ServiceError> {
        let row = self.require_user(actor.user_id).await?;
        let api_key = self.store.users().regenerate_api_key(row.user).await?;
        info!(actor = %actor, "API key regenerated");
        Ok(ApiKeyResponse { api_key })
    }

    async fn list_roles(&self, actor: Actor) -> Result<Vec<RoleDto>, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        let roles = self.store.roles().list().await?;
        Ok(roles.into_iter().map(role_dto).collect())
    }

    async fn create_role(&self, actor: Actor, input: NewRole) -> Result<RoleDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_new_role(&input)?;

        // Stored lowercased, matching how role names map to capabilities.
        let name = input.name.trim().to_lowercase();
        if self.store.roles().get_by_name(&name).await?.is_some() {
            return Err(ServiceError::conflict(format!("Role '{name}' already exists")));
        }

        let role = self.store.roles().create(&name).await?;
        info!(role_id = role.id, "Role created");
        Ok(role_dto(role))
    }

    async fn delete_role(&self, actor: Actor, id: i32) -> Result<(), ServiceError> {
        Guard::for_actor(actor).require_admin()?;

        let role = self
            .store
            .roles()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Role", id))?;

        if role.name.eq_ignore_ascii_case(DEFAULT_ROLE)
            || role.name.eq_ignore_ascii_case(ADMIN_ROLE)
        {
            return Err(ServiceError::conflict(format!(
                "Built-in role '{}' cannot be deleted",
                role.name
            )));
        }
        if self.store.users().count_with_role(id).await? > 0 {
            return Err(ServiceError::conflict(format!(
                "Role '{}' is still assigned to users",
                role.name
            )));
        }

        self.store.roles().delete(id).await?;
        info!(role_id = id, "Role deleted");
        Ok(())
    }
}
