use crate::entities::{
    comments, episodes, favorites, likes_animes, likes_comments, likes_episodes, prelude::*,
    seasons,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // A user may like/favorite a given target at most once. The service layer
        // pre-checks for a friendlier error; these indexes are what actually hold
        // under concurrent inserts.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_likes_animes_user_target")
                    .table(LikesAnimes)
                    .col(likes_animes::Column::UserId)
                    .col(likes_animes::Column::AnimeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_likes_episodes_user_target")
                    .table(LikesEpisodes)
                    .col(likes_episodes::Column::UserId)
                    .col(likes_episodes::Column::EpisodeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_likes_comments_user_target")
                    .table(LikesComments)
                    .col(likes_comments::Column::UserId)
                    .col(likes_comments::Column::CommentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_favorites_user_anime")
                    .table(Favorites)
                    .col(favorites::Column::UserId)
                    .col(favorites::Column::AnimeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Lookup indexes for the read-model loads.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_seasons_anime")
                    .table(Seasons)
                    .col(seasons::Column::AnimeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_episodes_season")
                    .table(Episodes)
                    .col(episodes::Column::SeasonId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_episode")
                    .table(Comments)
                    .col(comments::Column::EpisodeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for name in [
            "idx_comments_episode",
            "idx_episodes_season",
            "idx_seasons_anime",
            "idx_favorites_user_anime",
            "idx_likes_comments_user_target",
            "idx_likes_episodes_user_target",
            "idx_likes_animes_user_target",
        ] {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS {name}"))
                .await?;
        }

        Ok(())
    }
}
