//! `SeaORM` implementation of the `SocialService` trait.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::types::{CommentDto, FavoriteAnimeDto, FavoriteDto, LikeDto};
use crate::db::{Like, Store};
use crate::domain::validation::{validate_comment_patch, validate_new_comment};
use crate::domain::{Actor, AdminOverride, Guard, LikeTarget, ServiceError};
use crate::entities::{comments, favorites};
use crate::models::{CommentPatch, NewComment};
use crate::services::read_model;
use crate::services::social_service::SocialService;

pub struct SeaOrmSocialService {
    store: Arc<Store>,
}

impl SeaOrmSocialService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    async fn comment_dtos(
        &self,
        comments: Vec<comments::Model>,
    ) -> Result<Vec<CommentDto>, ServiceError> {
        let ids: Vec<i32> = comments.iter().map(|c| c.id).collect();
        let likes = self.store.catalog().comment_like_counts(&ids).await?;
        Ok(comments
            .into_iter()
            .map(|c| read_model::comment_dto(c, &likes))
            .collect())
    }

    async fn comment_dto(&self, comment: comments::Model) -> Result<CommentDto, ServiceError> {
        let id = comment.id;
        self.comment_dtos(vec![comment])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found("Comment", id))
    }
}

/// Rewords the generic unique-index conflict for a request that lost the
/// race against an identical one.
fn reword_conflict(err: anyhow::Error, message: &str) -> ServiceError {
    match ServiceError::from(err) {
        ServiceError::Conflict(_) => ServiceError::conflict(message),
        other => other,
    }
}

fn like_dto(like: Like) -> LikeDto {
    LikeDto {
        id: like.id,
        user_id: like.user_id,
        target: like.target.as_str(),
        target_id: like.target_id,
        created_at: like.created_at,
    }
}

fn favorite_dto(favorite: favorites::Model) -> FavoriteDto {
    FavoriteDto {
        id: favorite.id,
        user_id: favorite.user_id,
        anime_id: favorite.anime_id,
        created_at: favorite.created_at,
    }
}

#[async_trait::async_trait]
impl SocialService for SeaOrmSocialService {
    async fn list_comments_for_episode(
        &self,
        episode_id: i32,
    ) -> Result<Vec<CommentDto>, ServiceError> {
        if !self.store.episodes().exists(episode_id).await? {
            return Err(ServiceError::not_found("Episode", episode_id));
        }
        let comments = self.store.comments().list_for_episode(episode_id).await?;
        self.comment_dtos(comments).await
    }

    async fn list_comments_for_user(
        &self,
        actor: Actor,
        user_id: i32,
    ) -> Result<Vec<CommentDto>, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        if self.store.users().get(user_id).await?.is_none() {
            return Err(ServiceError::not_found("User", user_id));
        }
        let comments = self.store.comments().list_for_user(user_id).await?;
        self.comment_dtos(comments).await
    }

    async fn create_comment(
        &self,
        actor: Actor,
        input: NewComment,
    ) -> Result<CommentDto, ServiceError> {
        let guard = Guard::for_actor(actor);
        validate_new_comment(&input)?;

        let episode = self.store.episodes().get(input.episode_id).await?;
        guard.require_target(episode, "Episode", input.episode_id)?;

        let comment = self
            .store
            .comments()
            .create(actor.user_id, input.episode_id, &input.text)
            .await?;

        metrics::counter!("catalog_comments_created_total").increment(1);
        info!(comment_id = comment.id, episode_id = comment.episode_id, actor = %actor, "Comment created");

        self.comment_dto(comment).await
    }

    async fn update_comment(
        &self,
        actor: Actor,
        id: i32,
        patch: CommentPatch,
    ) -> Result<CommentDto, ServiceError> {
        let guard = Guard::for_actor(actor);
        validate_comment_patch(&patch)?;

        let comment = guard.require_target(self.store.comments().get(id).await?, "Comment", id)?;
        guard.require_owner(&comment, AdminOverride::Denied)?;

        let comment = self.store.comments().update_text(comment, &patch.text).await?;
        self.comment_dto(comment).await
    }

    async fn delete_comment(&self, actor: Actor, id: i32) -> Result<(), ServiceError> {
        let guard = Guard::for_actor(actor);

        let comment = guard.require_target(self.store.comments().get(id).await?, "Comment", id)?;
        guard.require_owner(&comment, AdminOverride::Allowed)?;

        self.store.comments().delete(comment.id).await?;
        info!(comment_id = id, actor = %actor, "Comment deleted");
        Ok(())
    }

    async fn like(
        &self,
        actor: Actor,
        target: LikeTarget,
        target_id: i32,
    ) -> Result<LikeDto, ServiceError> {
        let guard = Guard::for_actor(actor);
        let likes = self.store.likes();

        let exists = likes.target_exists(target, target_id).await?;
        guard.require_target(exists.then_some(()), target.resource(), target_id)?;

        let message = format!("You already like this {target}");
        guard.require_absent(
            likes.find_pair(target, actor.user_id, target_id).await?,
            &message,
        )?;

        let like = likes
            .create(target, actor.user_id, target_id)
            .await
            .map_err(|e| reword_conflict(e, &message))?;

        metrics::counter!("catalog_likes_created_total", "target" => target.as_str()).increment(1);
        debug!(like_target = %target, target_id, actor = %actor, "Like created");

        Ok(like_dto(like))
    }

    async fn unlike(
        &self,
        actor: Actor,
        target: LikeTarget,
        target_id: i32,
    ) -> Result<(), ServiceError> {
        let guard = Guard::for_actor(actor);
        let likes = self.store.likes();

        let exists = likes.target_exists(target, target_id).await?;
        guard.require_target(exists.then_some(()), target.resource(), target_id)?;

        let like = likes
            .find_pair(target, actor.user_id, target_id)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("You do not like this {target}"))
            })?;
        guard.require_owner(&like, AdminOverride::Denied)?;

        likes.delete(target, like.id).await?;
        debug!(like_target = %target, target_id, actor = %actor, "Like removed");
        Ok(())
    }

    async fn list_favorites(&self, actor: Actor) -> Result<Vec<FavoriteAnimeDto>, ServiceError> {
        let favorites = self.store.favorites().list_for_user(actor.user_id).await?;
        let anime_ids: Vec<i32> = favorites.iter().map(|f| f.anime_id).collect();

        let animes = self.store.animes().get_by_ids(&anime_ids).await?;
        let rows = self.store.catalog().load(animes, false).await?;
        let mut by_id: HashMap<i32, _> = read_model::build(rows)
            .into_iter()
            .map(|anime| (anime.id, anime))
            .collect();

        Ok(favorites
            .into_iter()
            .filter_map(|favorite| {
                by_id.remove(&favorite.anime_id).map(|anime| FavoriteAnimeDto {
                    favorite_id: favorite.id,
                    anime,
                })
            })
            .collect())
    }

    async fn add_favorite(&self, actor: Actor, anime_id: i32) -> Result<FavoriteDto, ServiceError> {
        let guard = Guard::for_actor(actor);
        let favorites = self.store.favorites();

        guard.require_target(self.store.animes().get(anime_id).await?, "Anime", anime_id)?;

        let message = "This anime is already in your favorites";
        guard.require_absent(favorites.find_pair(actor.user_id, anime_id).await?, message)?;

        let favorite = favorites
            .create(actor.user_id, anime_id)
            .await
            .map_err(|e| reword_conflict(e, message))?;

        info!(favorite_id = favorite.id, anime_id, actor = %actor, "Favorite added");
        Ok(favorite_dto(favorite))
    }

    async fn remove_favorite(&self, actor: Actor, favorite_id: i32) -> Result<(), ServiceError> {
        let guard = Guard::for_actor(actor);
        let favorites = self.store.favorites();

        let favorite =
            guard.require_target(favorites.get(favorite_id).await?, "Favorite", favorite_id)?;
        guard.require_owner(&favorite, AdminOverride::Denied)?;

        favorites.delete(favorite.id).await?;
        info!(favorite_id, actor = %actor, "Favorite removed");
        Ok(())
    }
}
