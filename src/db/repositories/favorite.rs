use crate::entities::{favorites, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct FavoriteRepository {
    conn: DatabaseConnection,
}

impl FavoriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<favorites::Model>> {
        Favorites::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query favorite by ID")
    }

    pub async fn find_pair(&self, user_id: i32, anime_id: i32) -> Result<Option<favorites::Model>> {
        Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .filter(favorites::Column::AnimeId.eq(anime_id))
            .one(&self.conn)
            .await
            .context("Failed to query favorite pair")
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<favorites::Model>> {
        Favorites::find()
            .filter(favorites::Column::UserId.eq(user_id))
            .order_by_asc(favorites::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list favorites")
    }

    /// A concurrent duplicate fails on the `(user_id, anime_id)` unique index.
    pub async fn create(&self, user_id: i32, anime_id: i32) -> Result<favorites::Model> {
        favorites::ActiveModel {
            user_id: Set(user_id),
            anime_id: Set(anime_id),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert favorite")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Favorites::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete favorite")?;
        Ok(result.rows_affected > 0)
    }
}
