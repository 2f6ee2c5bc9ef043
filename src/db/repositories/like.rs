use crate::domain::{LikeTarget, OwnedByUser};
use crate::entities::{likes_animes, likes_comments, likes_episodes, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};

/// A row from any of the three like tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub id: i32,
    pub user_id: i32,
    pub target: LikeTarget,
    pub target_id: i32,
    pub created_at: String,
}

impl From<likes_animes::Model> for Like {
    fn from(model: likes_animes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            target: LikeTarget::Anime,
            target_id: model.anime_id,
            created_at: model.created_at,
        }
    }
}

impl From<likes_episodes::Model> for Like {
    fn from(model: likes_episodes::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            target: LikeTarget::Episode,
            target_id: model.episode_id,
            created_at: model.created_at,
        }
    }
}

impl From<likes_comments::Model> for Like {
    fn from(model: likes_comments::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            target: LikeTarget::Comment,
            target_id: model.comment_id,
            created_at: model.created_at,
        }
    }
}

impl OwnedByUser for Like {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

pub struct LikeRepository {
    conn: DatabaseConnection,
}

impl LikeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn target_exists(&self, target: LikeTarget, id: i32) -> Result<bool> {
        let found = match target {
            LikeTarget::Anime => Animes::find_by_id(id).one(&self.conn).await?.is_some(),
            LikeTarget::Episode => Episodes::find_by_id(id).one(&self.conn).await?.is_some(),
            LikeTarget::Comment => Comments::find_by_id(id).one(&self.conn).await?.is_some(),
        };
        Ok(found)
    }

    /// The like `user_id` left on the target, if any.
    pub async fn find_pair(
        &self,
        target: LikeTarget,
        user_id: i32,
        target_id: i32,
    ) -> Result<Option<Like>> {
        let like = match target {
            LikeTarget::Anime => LikesAnimes::find()
                .filter(likes_animes::Column::UserId.eq(user_id))
                .filter(likes_animes::Column::AnimeId.eq(target_id))
                .one(&self.conn)
                .await?
                .map(Like::from),
            LikeTarget::Episode => LikesEpisodes::find()
                .filter(likes_episodes::Column::UserId.eq(user_id))
                .filter(likes_episodes::Column::EpisodeId.eq(target_id))
                .one(&self.conn)
                .await?
                .map(Like::from),
            LikeTarget::Comment => LikesComments::find()
                .filter(likes_comments::Column::UserId.eq(user_id))
                .filter(likes_comments::Column::CommentId.eq(target_id))
                .one(&self.conn)
                .await?
                .map(Like::from),
        };
        Ok(like)
    }

    /// A concurrent duplicate fails on the `(user_id, target_id)` unique index.
    pub async fn create(&self, target: LikeTarget, user_id: i32, target_id: i32) -> Result<Like> {
        let now = chrono::Utc::now().to_rfc3339();

        let like: Like = match target {
            LikeTarget::Anime => likes_animes::ActiveModel {
                user_id: Set(user_id),
                anime_id: Set(target_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert anime like")?
            .into(),
            LikeTarget::Episode => likes_episodes::ActiveModel {
                user_id: Set(user_id),
                episode_id: Set(target_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert episode like")?
            .into(),
            LikeTarget::Comment => likes_comments::ActiveModel {
                user_id: Set(user_id),
                comment_id: Set(target_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert comment like")?
            .into(),
        };
        Ok(like)
    }

    pub async fn delete(&self, target: LikeTarget, id: i32) -> Result<bool> {
        let result = match target {
            LikeTarget::Anime => LikesAnimes::delete_by_id(id).exec(&self.conn).await?,
            LikeTarget::Episode => LikesEpisodes::delete_by_id(id).exec(&self.conn).await?,
            LikeTarget::Comment => LikesComments::delete_by_id(id).exec(&self.conn).await?,
        };
        Ok(result.rows_affected > 0)
    }
}
