//! Domain service for user-generated content: comments, likes and favorites.
//!
//! Every mutation runs the ownership guard sequence from
//! [`crate::domain::guard`]: target exists, pair is unique, actor owns the
//! row, then the single write.

use crate::api::types::{CommentDto, FavoriteAnimeDto, FavoriteDto, LikeDto};
use crate::domain::{Actor, LikeTarget, ServiceError};
use crate::models::{CommentPatch, NewComment};

#[async_trait::async_trait]
pub trait SocialService: Send + Sync {
    /// Public.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] for an unknown episode.
    async fn list_comments_for_episode(
        &self,
        episode_id: i32,
    ) -> Result<Vec<CommentDto>, ServiceError>;

    /// Admin only.
    async fn list_comments_for_user(
        &self,
        actor: Actor,
        user_id: i32,
    ) -> Result<Vec<CommentDto>, ServiceError>;

    async fn create_comment(
        &self,
        actor: Actor,
        input: NewComment,
    ) -> Result<CommentDto, ServiceError>;

    /// Only the author may edit a comment.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the comment does not exist
    /// - [`ServiceError::Unauthorized`] if the actor is not the author
    async fn update_comment(
        &self,
        actor: Actor,
        id: i32,
        patch: CommentPatch,
    ) -> Result<CommentDto, ServiceError>;

    /// The author or an admin may delete a comment.
    async fn delete_comment(&self, actor: Actor, id: i32) -> Result<(), ServiceError>;

    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the target does not exist
    /// - [`ServiceError::Conflict`] if the actor already likes it
    async fn like(
        &self,
        actor: Actor,
        target: LikeTarget,
        target_id: i32,
    ) -> Result<LikeDto, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the target or the actor's like on
    /// it does not exist.
    async fn unlike(
        &self,
        actor: Actor,
        target: LikeTarget,
        target_id: i32,
    ) -> Result<(), ServiceError>;

    /// The actor's favorites, oldest first, each with its anime read-model.
    async fn list_favorites(&self, actor: Actor) -> Result<Vec<FavoriteAnimeDto>, ServiceError>;

    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the anime does not exist
    /// - [`ServiceError::Conflict`] if it is already a favorite
    async fn add_favorite(&self, actor: Actor, anime_id: i32) -> Result<FavoriteDto, ServiceError>;

    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] if the favorite does not exist
    /// - [`ServiceError::Unauthorized`] if it belongs to another user
    async fn remove_favorite(&self, actor: Actor, favorite_id: i32) -> Result<(), ServiceError>;
}
