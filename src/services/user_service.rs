//! Domain service for user accounts, credentials and roles.
//!
//! Handles registration, login, password changes and API key management.
//! Plaintext passwords only live long enough to be hashed or verified.

use crate::api::types::{ApiKeyResponse, LoginResponse, RoleDto, UserDto};
use crate::domain::{Actor, ServiceError};
use crate::models::{
    Credentials, NewAdmin, NewRole, NewUser, PasswordChange, ProfilePatch, UserPatch,
};

/// Domain service trait for users.
#[async_trait::async_trait]
pub trait UserService: Send + Sync {
    /// Creates a user with the default `user` role.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::Conflict`] if the user name or email is taken
    /// - [`ServiceError::Internal`] if the default role row is missing
    async fn register(&self, input: NewUser) -> Result<UserDto, ServiceError>;

    /// Creates a user with an explicit role. Admin only.
    async fn create_admin(&self, actor: Actor, input: NewAdmin) -> Result<UserDto, ServiceError>;

    /// Updates the actor's own account.
    async fn update(&self, actor: Actor, patch: UserPatch) -> Result<UserDto, ServiceError>;

    /// Updates any account. Admin only.
    async fn admin_update(
        &self,
        actor: Actor,
        user_id: i32,
        patch: UserPatch,
    ) -> Result<UserDto, ServiceError>;

    async fn update_profile(
        &self,
        actor: Actor,
        patch: ProfilePatch,
    ) -> Result<UserDto, ServiceError>;

    /// # Errors
    ///
    /// - [`ServiceError::Unauthorized`] if the current password does not match
    /// - [`ServiceError::Validation`] if the new password is too short or
    ///   unchanged
    async fn change_password(&self, actor: Actor, input: PasswordChange)
    -> Result<(), ServiceError>;

    async fn delete_self(&self, actor: Actor) -> Result<(), ServiceError>;

    /// Admin only.
    async fn delete(&self, actor: Actor, user_id: i32) -> Result<(), ServiceError>;

    /// Admin only.
    async fn get(&self, actor: Actor, user_id: i32) -> Result<UserDto, ServiceError>;

    /// Admin only.
    async fn list(&self, actor: Actor) -> Result<Vec<UserDto>, ServiceError>;

    async fn me(&self, actor: Actor) -> Result<UserDto, ServiceError>;

    /// Logs in by user name or email.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] for any mismatch without saying
    /// which part was wrong.
    async fn authenticate(&self, credentials: Credentials) -> Result<LoginResponse, ServiceError>;

    /// Resolves an API key to the actor it belongs to.
    async fn resolve_api_key(&self, api_key: &str) -> Result<Option<Actor>, ServiceError>;

    /// Resolves a session's user id to an actor with its current role.
    async fn resolve_user(&self, user_id: i32) -> Result<Option<Actor>, ServiceError>;

    async fn api_key(&self, actor: Actor) -> Result<ApiKeyResponse, ServiceError>;

    async fn regenerate_api_key(&self, actor: Actor) -> Result<ApiKeyResponse, ServiceError>;

    /// Admin only.
    async fn list_roles(&self, actor: Actor) -> Result<Vec<RoleDto>, ServiceError>;

    /// Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] if the name is taken.
    async fn create_role(&self, actor: Actor, input: NewRole) -> Result<RoleDto, ServiceError>;

    /// Admin only.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the role does not exist
    /// - [`ServiceError::Conflict`] for built-in roles or roles still assigned
    async fn delete_role(&self, actor: Actor, id: i32) -> Result<(), ServiceError>;
}
