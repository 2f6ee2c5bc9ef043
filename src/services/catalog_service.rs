//! Domain service for the anime catalog.
//!
//! Reads are public and return anime read-models (see [`super::read_model`]).
//! Writes are admin-managed; the actor's role is checked here, not in the
//! router.

use crate::api::types::{AnimeDto, EpisodeDto, SeasonDto, TagDto};
use crate::db::TagKind;
use crate::domain::{Actor, ServiceError};
use crate::models::{
    AnimePatch, EpisodePatch, NewAnime, NewEpisode, NewSeason, NewTag, SeasonPatch,
};

/// Domain service trait for catalog operations.
///
/// # Examples
///
/// ```rust,ignore
/// use anicat::services::CatalogService;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn CatalogService>) {
///     let show = service.find_by_name("test").await;
/// }
/// ```
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// Every anime with its full tree, comments included.
    async fn list_all(&self) -> Result<Vec<AnimeDto>, ServiceError>;

    /// Featured animes, most recently updated first, at most 10.
    async fn list_featured(&self) -> Result<Vec<AnimeDto>, ServiceError>;

    /// Animes by like count descending, at most 10.
    async fn list_top_liked(&self) -> Result<Vec<AnimeDto>, ServiceError>;

    /// Most recently created animes, at most 10.
    async fn list_newest(&self) -> Result<Vec<AnimeDto>, ServiceError>;

    /// First anime whose name contains `text`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when nothing matches.
    async fn find_by_name(&self, text: &str) -> Result<AnimeDto, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the anime does not exist.
    async fn find_by_id(&self, id: i32) -> Result<AnimeDto, ServiceError>;

    /// # Errors
    ///
    /// - [`ServiceError::Unauthorized`] unless the actor is an admin
    /// - [`ServiceError::NotFound`] for an unknown classification or category id
    async fn create_anime(&self, actor: Actor, input: NewAnime) -> Result<AnimeDto, ServiceError>;

    async fn update_anime(
        &self,
        actor: Actor,
        id: i32,
        patch: AnimePatch,
    ) -> Result<AnimeDto, ServiceError>;

    async fn delete_anime(&self, actor: Actor, id: i32) -> Result<(), ServiceError>;

    async fn create_season(&self, actor: Actor, input: NewSeason)
    -> Result<SeasonDto, ServiceError>;

    async fn update_season(
        &self,
        actor: Actor,
        id: i32,
        patch: SeasonPatch,
    ) -> Result<SeasonDto, ServiceError>;

    async fn delete_season(&self, actor: Actor, id: i32) -> Result<(), ServiceError>;

    async fn create_episode(
        &self,
        actor: Actor,
        input: NewEpisode,
    ) -> Result<EpisodeDto, ServiceError>;

    async fn update_episode(
        &self,
        actor: Actor,
        id: i32,
        patch: EpisodePatch,
    ) -> Result<EpisodeDto, ServiceError>;

    async fn delete_episode(&self, actor: Actor, id: i32) -> Result<(), ServiceError>;

    /// Classifications or categories. Public.
    async fn list_tags(&self, kind: TagKind) -> Result<Vec<TagDto>, ServiceError>;

    /// # Errors
    ///
    /// Returns [`ServiceError::Conflict`] when the name is already used.
    async fn create_tag(
        &self,
        actor: Actor,
        kind: TagKind,
        input: NewTag,
    ) -> Result<TagDto, ServiceError>;

    async fn update_tag(
        &self,
        actor: Actor,
        kind: TagKind,
        id: i32,
        input: NewTag,
    ) -> Result<TagDto, ServiceError>;

    async fn delete_tag(&self, actor: Actor, kind: TagKind, id: i32) -> Result<(), ServiceError>;
}
