use crate::entities::{prelude::*, seasons};
use crate::models::{NewSeason, SeasonPatch};
use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

pub struct SeasonRepository {
    conn: DatabaseConnection,
}

impl SeasonRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<seasons::Model>> {
        Seasons::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query season by ID")
    }

    pub async fn create(&self, input: &NewSeason) -> Result<seasons::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        seasons::ActiveModel {
            name: Set(input.name.trim().to_string()),
            anime_id: Set(input.anime_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert season")
    }

    pub async fn update(
        &self,
        existing: seasons::Model,
        patch: &SeasonPatch,
    ) -> Result<seasons::Model> {
        let mut active: seasons::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            active.name = Set(name.trim().to_string());
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update season")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Seasons::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete season")?;
        Ok(result.rows_affected > 0)
    }
}
