//! `SeaORM` implementation of the `CatalogService` trait.

use std::sync::Arc;

use tracing::info;

use crate::api::types::{AnimeDto, EpisodeDto, SeasonDto, TagDto};
use crate::constants::limits::{FEATURED_LIMIT, NEWEST_LIMIT, TOP_LIKED_LIMIT};
use crate::db::{Store, Tag, TagKind};
use crate::domain::validation::{
    validate_anime_patch, validate_episode_patch, validate_new_anime, validate_new_episode,
    validate_new_season, validate_new_tag, validate_season_patch,
};
use crate::domain::{Actor, Guard, ServiceError};
use crate::entities::animes;
use crate::models::{
    AnimePatch, EpisodePatch, NewAnime, NewEpisode, NewSeason, NewTag, SeasonPatch,
};
use crate::services::catalog_service::CatalogService;
use crate::services::read_model;

pub struct SeaOrmCatalogService {
    store: Arc<Store>,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    async fn build(
        &self,
        animes: Vec<animes::Model>,
        include_comments: bool,
    ) -> Result<Vec<AnimeDto>, ServiceError> {
        let rows = self.store.catalog().load(animes, include_comments).await?;
        Ok(read_model::build(rows))
    }

    async fn build_one(
        &self,
        anime: animes::Model,
        include_comments: bool,
    ) -> Result<AnimeDto, ServiceError> {
        let id = anime.id;
        self.build(vec![anime], include_comments)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::internal(format!("Read-model for anime {id} is empty")))
    }

    async fn require_anime(&self, id: i32) -> Result<animes::Model, ServiceError> {
        self.store
            .animes()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Anime", id))
    }

    async fn season_dto(&self, anime_id: i32, season_id: i32) -> Result<SeasonDto, ServiceError> {
        let anime = self.require_anime(anime_id).await?;
        self.build_one(anime, false)
            .await?
            .seasons
            .into_iter()
            .find(|s| s.id == season_id)
            .ok_or_else(|| ServiceError::not_found("Season", season_id))
    }

    async fn episode_dto(&self, season_id: i32, episode_id: i32) -> Result<EpisodeDto, ServiceError> {
        let season = self
            .store
            .seasons()
            .get(season_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Season", season_id))?;

        self.season_dto(season.anime_id, season.id)
            .await?
            .episodes
            .into_iter()
            .find(|e| e.id == episode_id)
            .ok_or_else(|| ServiceError::not_found("Episode", episode_id))
    }

    async fn require_tags(&self, kind: TagKind, ids: &[i32]) -> Result<(), ServiceError> {
        let missing = self.store.taxonomy().missing_ids(kind, ids).await?;
        match missing.first() {
            Some(id) => Err(ServiceError::not_found(kind.resource(), id)),
            None => Ok(()),
        }
    }
}

fn tag_dto(tag: Tag) -> TagDto {
    TagDto {
        id: tag.id,
        name: tag.name,
    }
}

#[async_trait::async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list_all(&self) -> Result<Vec<AnimeDto>, ServiceError> {
        let animes = self.store.animes().list_all().await?;
        self.build(animes, true).await
    }

    async fn list_featured(&self) -> Result<Vec<AnimeDto>, ServiceError> {
        let animes = self.store.animes().list_featured(FEATURED_LIMIT).await?;
        self.build(animes, false).await
    }

    async fn list_top_liked(&self) -> Result<Vec<AnimeDto>, ServiceError> {
        let animes = self.store.animes().list_top_liked(TOP_LIKED_LIMIT).await?;
        self.build(animes, false).await
    }

    async fn list_newest(&self) -> Result<Vec<AnimeDto>, ServiceError> {
        let animes = self.store.animes().list_newest(NEWEST_LIMIT).await?;
        self.build(animes, false).await
    }

    async fn find_by_name(&self, text: &str) -> Result<AnimeDto, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::invalid("name", "must not be empty"));
        }

        let anime = self
            .store
            .animes()
            .find_by_name(text)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("No anime matches '{text}'")))?;

        self.build_one(anime, true).await
    }

    async fn find_by_id(&self, id: i32) -> Result<AnimeDto, ServiceError> {
        let anime = self.require_anime(id).await?;
        self.build_one(anime, true).await
    }

    async fn create_anime(&self, actor: Actor, input: NewAnime) -> Result<AnimeDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_new_anime(&input)?;
        self.require_tags(TagKind::Classification, &input.classification_ids)
            .await?;
        self.require_tags(TagKind::Category, &input.category_ids)
            .await?;

        let anime = self.store.animes().create(&input).await?;
        info!(anime_id = anime.id, actor = %actor, "Anime created");

        self.build_one(anime, true).await
    }

    async fn update_anime(
        &self,
        actor: Actor,
        id: i32,
        patch: AnimePatch,
    ) -> Result<AnimeDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_anime_patch(&patch)?;
        let existing = self.require_anime(id).await?;
        if let Some(ids) = &patch.classification_ids {
            self.require_tags(TagKind::Classification, ids).await?;
        }
        if let Some(ids) = &patch.category_ids {
            self.require_tags(TagKind::Category, ids).await?;
        }

        let anime = self.store.animes().update(existing, &patch).await?;
        info!(anime_id = id, actor = %actor, "Anime updated");

        self.build_one(anime, true).await
    }

    async fn delete_anime(&self, actor: Actor, id: i32) -> Result<(), ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        if !self.store.animes().delete(id).await? {
            return Err(ServiceError::not_found("Anime", id));
        }
        info!(anime_id = id, actor = %actor, "Anime deleted");
        Ok(())
    }

    async fn create_season(
        &self,
        actor: Actor,
        input: NewSeason,
    ) -> Result<SeasonDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_new_season(&input)?;
        self.require_anime(input.anime_id).await?;

        let season = self.store.seasons().create(&input).await?;
        info!(season_id = season.id, anime_id = season.anime_id, "Season created");

        self.season_dto(season.anime_id, season.id).await
    }

    async fn update_season(
        &self,
        actor: Actor,
        id: i32,
        patch: SeasonPatch,
    ) -> Result<SeasonDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_season_patch(&patch)?;
        let existing = self
            .store
            .seasons()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Season", id))?;

        let season = self.store.seasons().update(existing, &patch).await?;
        self.season_dto(season.anime_id, season.id).await
    }

    async fn delete_season(&self, actor: Actor, id: i32) -> Result<(), ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        if !self.store.seasons().delete(id).await? {
            return Err(ServiceError::not_found("Season", id));
        }
        info!(season_id = id, actor = %actor, "Season deleted");
        Ok(())
    }

    async fn create_episode(
        &self,
        actor: Actor,
        input: NewEpisode,
    ) -> Result<EpisodeDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_new_episode(&input)?;
        if self.store.seasons().get(input.season_id).await?.is_none() {
            return Err(ServiceError::not_found("Season", input.season_id));
        }

        let episode = self.store.episodes().create(&input).await?;
        info!(episode_id = episode.id, season_id = episode.season_id, "Episode created");

        self.episode_dto(episode.season_id, episode.id).await
    }

    async fn update_episode(
        &self,
        actor: Actor,
        id: i32,
        patch: EpisodePatch,
    ) -> Result<EpisodeDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_episode_patch(&patch)?;
        let existing = self
            .store
            .episodes()
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Episode", id))?;
        if let Some(season_id) = patch.season_id
            && self.store.seasons().get(season_id).await?.is_none()
        {
            return Err(ServiceError::not_found("Season", season_id));
        }

        let episode = self.store.episodes().update(existing, &patch).await?;
        self.episode_dto(episode.season_id, episode.id).await
    }

    async fn delete_episode(&self, actor: Actor, id: i32) -> Result<(), ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        if !self.store.episodes().delete(id).await? {
            return Err(ServiceError::not_found("Episode", id));
        }
        info!(episode_id = id, actor = %actor, "Episode deleted");
        Ok(())
    }

    async fn list_tags(&self, kind: TagKind) -> Result<Vec<TagDto>, ServiceError> {
        let tags = self.store.taxonomy().list(kind).await?;
        Ok(tags.into_iter().map(tag_dto).collect())
    }

    async fn create_tag(
        &self,
        actor: Actor,
        kind: TagKind,
        input: NewTag,
    ) -> Result<TagDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_new_tag(&input)?;

        let name = input.name.trim();
        if self.store.taxonomy().find_by_name(kind, name).await?.is_some() {
            return Err(ServiceError::conflict(format!(
                "{} '{name}' already exists",
                kind.resource()
            )));
        }

        let tag = self.store.taxonomy().create(kind, name).await?;
        Ok(tag_dto(tag))
    }

    async fn update_tag(
        &self,
        actor: Actor,
        kind: TagKind,
        id: i32,
        input: NewTag,
    ) -> Result<TagDto, ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        validate_new_tag(&input)?;

        let taxonomy = self.store.taxonomy();
        if taxonomy.get(kind, id).await?.is_none() {
            return Err(ServiceError::not_found(kind.resource(), id));
        }

        let name = input.name.trim();
        if let Some(existing) = taxonomy.find_by_name(kind, name).await?
            && existing.id != id
        {
            return Err(ServiceError::conflict(format!(
                "{} '{name}' already exists",
                kind.resource()
            )));
        }

        let tag = taxonomy.rename(kind, id, name).await?;
        Ok(tag_dto(tag))
    }

    async fn delete_tag(&self, actor: Actor, kind: TagKind, id: i32) -> Result<(), ServiceError> {
        Guard::for_actor(actor).require_admin()?;
        if !self.store.taxonomy().delete(kind, id).await? {
            return Err(ServiceError::not_found(kind.resource(), id));
        }
        Ok(())
    }
}
