use crate::entities::{episodes, prelude::*};
use crate::models::{EpisodePatch, NewEpisode};
use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<episodes::Model>> {
        Episodes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query episode by ID")
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn create(&self, input: &NewEpisode) -> Result<episodes::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        episodes::ActiveModel {
            name: Set(input.name.trim().to_string()),
            url: Set(input.url.trim().to_string()),
            episode_order: Set(input.episode_order),
            season_id: Set(input.season_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert episode")
    }

    pub async fn update(
        &self,
        existing: episodes::Model,
        patch: &EpisodePatch,
    ) -> Result<episodes::Model> {
        let mut active: episodes::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(url) = &patch.url {
            active.url = Set(url.trim().to_string());
        }
        if let Some(order) = patch.episode_order {
            active.episode_order = Set(order);
        }
        if let Some(season_id) = patch.season_id {
            active.season_id = Set(season_id);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update episode")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Episodes::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete episode")?;
        Ok(result.rows_affected > 0)
    }
}
