use crate::entities::{comments, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct CommentRepository {
    conn: DatabaseConnection,
}

impl CommentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<comments::Model>> {
        Comments::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query comment by ID")
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn list_for_episode(&self, episode_id: i32) -> Result<Vec<comments::Model>> {
        Comments::find()
            .filter(comments::Column::EpisodeId.eq(episode_id))
            .order_by_asc(comments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list comments for episode")
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<comments::Model>> {
        Comments::find()
            .filter(comments::Column::UserId.eq(user_id))
            .order_by_asc(comments::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list comments for user")
    }

    pub async fn create(&self, user_id: i32, episode_id: i32, text: &str) -> Result<comments::Model> {
        let now = chrono::Utc::now().to_rfc3339();

        comments::ActiveModel {
            text: Set(text.trim().to_string()),
            user_id: Set(user_id),
            episode_id: Set(episode_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert comment")
    }

    pub async fn update_text(&self, existing: comments::Model, text: &str) -> Result<comments::Model> {
        let mut active: comments::ActiveModel = existing.into();
        active.text = Set(text.trim().to_string());
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        active
            .update(&self.conn)
            .await
            .context("Failed to update comment")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Comments::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete comment")?;
        Ok(result.rows_affected > 0)
    }
}
