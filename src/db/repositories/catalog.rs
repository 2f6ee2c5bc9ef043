use std::collections::HashMap;

use crate::entities::{
    anime_categories, anime_classifications, animes, categories, classifications, comments,
    episodes, likes_animes, likes_comments, likes_episodes, prelude::*, seasons,
};
use anyhow::{Context, Result};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};

/// Raw rows behind a list of anime read-models.
///
/// Every collection keeps the order the database returned it in; like counts
/// are keyed by target id and missing keys mean zero likes.
#[derive(Debug, Clone, Default)]
pub struct CatalogRows {
    pub animes: Vec<animes::Model>,
    pub classifications: HashMap<i32, Vec<String>>,
    pub categories: HashMap<i32, Vec<String>>,
    pub seasons: Vec<seasons::Model>,
    pub episodes: Vec<episodes::Model>,
    /// `None` when the listing does not carry comments.
    pub comments: Option<Vec<comments::Model>>,
    pub anime_likes: HashMap<i32, i64>,
    pub episode_likes: HashMap<i32, i64>,
    pub comment_likes: HashMap<i32, i64>,
}

/// SQLite limits the number of bound parameters per statement, so `IN` lists
/// are split into slices of this size.
const IN_LIST_CHUNK: usize = 500;

pub struct CatalogRepository {
    conn: DatabaseConnection,
}

impl CatalogRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Loads everything nested under `animes`, one query per table and id chunk.
    pub async fn load(
        &self,
        animes: Vec<animes::Model>,
        include_comments: bool,
    ) -> Result<CatalogRows> {
        if animes.is_empty() {
            return Ok(CatalogRows {
                comments: include_comments.then(Vec::new),
                ..Default::default()
            });
        }

        let anime_ids: Vec<i32> = animes.iter().map(|a| a.id).collect();

        let mut classification_rows: Vec<(i32, String)> = Vec::new();
        let mut category_rows: Vec<(i32, String)> = Vec::new();
        let mut seasons: Vec<seasons::Model> = Vec::new();

        for chunk in anime_ids.chunks(IN_LIST_CHUNK) {
            classification_rows.extend(
                AnimeClassifications::find()
                    .select_only()
                    .column(anime_classifications::Column::AnimeId)
                    .column(classifications::Column::Name)
                    .join(
                        JoinType::InnerJoin,
                        anime_classifications::Relation::Classification.def(),
                    )
                    .filter(anime_classifications::Column::AnimeId.is_in(chunk.to_vec()))
                    .order_by_asc(anime_classifications::Column::AnimeId)
                    .order_by_asc(classifications::Column::Id)
                    .into_tuple::<(i32, String)>()
                    .all(&self.conn)
                    .await
                    .context("Failed to load anime classifications")?,
            );

            category_rows.extend(
                AnimeCategories::find()
                    .select_only()
                    .column(anime_categories::Column::AnimeId)
                    .column(categories::Column::Name)
                    .join(JoinType::InnerJoin, anime_categories::Relation::Category.def())
                    .filter(anime_categories::Column::AnimeId.is_in(chunk.to_vec()))
                    .order_by_asc(anime_categories::Column::AnimeId)
                    .order_by_asc(categories::Column::Id)
                    .into_tuple::<(i32, String)>()
                    .all(&self.conn)
                    .await
                    .context("Failed to load anime categories")?,
            );

            seasons.extend(
                Seasons::find()
                    .filter(seasons::Column::AnimeId.is_in(chunk.to_vec()))
                    .order_by_asc(seasons::Column::Id)
                    .all(&self.conn)
                    .await
                    .context("Failed to load seasons")?,
            );
        }
        seasons.sort_by_key(|s| s.id);

        let season_ids: Vec<i32> = seasons.iter().map(|s| s.id).collect();
        let mut episodes: Vec<episodes::Model> = Vec::new();
        for chunk in season_ids.chunks(IN_LIST_CHUNK) {
            episodes.extend(
                Episodes::find()
                    .filter(episodes::Column::SeasonId.is_in(chunk.to_vec()))
                    .order_by_asc(episodes::Column::EpisodeOrder)
                    .order_by_asc(episodes::Column::Id)
                    .all(&self.conn)
                    .await
                    .context("Failed to load episodes")?,
            );
        }
        episodes.sort_by_key(|e| (e.episode_order, e.id));

        let episode_ids: Vec<i32> = episodes.iter().map(|e| e.id).collect();

        let comments = if include_comments {
            let mut comments: Vec<comments::Model> = Vec::new();
            for chunk in episode_ids.chunks(IN_LIST_CHUNK) {
                comments.extend(
                    Comments::find()
                        .filter(comments::Column::EpisodeId.is_in(chunk.to_vec()))
                        .order_by_asc(comments::Column::Id)
                        .all(&self.conn)
                        .await
                        .context("Failed to load comments")?,
                );
            }
            comments.sort_by_key(|c| c.id);
            Some(comments)
        } else {
            None
        };

        let comment_ids: Vec<i32> = comments
            .iter()
            .flatten()
            .map(|c| c.id)
            .collect();

        let anime_likes = self.anime_like_counts(&anime_ids).await?;
        let episode_likes = self.episode_like_counts(&episode_ids).await?;
        let comment_likes = self.comment_like_counts(&comment_ids).await?;

        Ok(CatalogRows {
            animes,
            classifications: group_names(classification_rows),
            categories: group_names(category_rows),
            seasons,
            episodes,
            comments,
            anime_likes,
            episode_likes,
            comment_likes,
        })
    }

    pub async fn anime_like_counts(&self, ids: &[i32]) -> Result<HashMap<i32, i64>> {
        let mut counts = HashMap::new();
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let rows: Vec<(i32, i64)> = LikesAnimes::find()
                .select_only()
                .column(likes_animes::Column::AnimeId)
                .column_as(likes_animes::Column::Id.count(), "count")
                .filter(likes_animes::Column::AnimeId.is_in(chunk.to_vec()))
                .group_by(likes_animes::Column::AnimeId)
                .into_tuple()
                .all(&self.conn)
                .await
                .context("Failed to count anime likes")?;
            counts.extend(rows);
        }

        Ok(counts)
    }

    pub async fn episode_like_counts(&self, ids: &[i32]) -> Result<HashMap<i32, i64>> {
        let mut counts = HashMap::new();
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let rows: Vec<(i32, i64)> = LikesEpisodes::find()
                .select_only()
                .column(likes_episodes::Column::EpisodeId)
                .column_as(likes_episodes::Column::Id.count(), "count")
                .filter(likes_episodes::Column::EpisodeId.is_in(chunk.to_vec()))
                .group_by(likes_episodes::Column::EpisodeId)
                .into_tuple()
                .all(&self.conn)
                .await
                .context("Failed to count episode likes")?;
            counts.extend(rows);
        }

        Ok(counts)
    }

    pub async fn comment_like_counts(&self, ids: &[i32]) -> Result<HashMap<i32, i64>> {
        let mut counts = HashMap::new();
        for chunk in ids.chunks(IN_LIST_CHUNK) {
            let rows: Vec<(i32, i64)> = LikesComments::find()
                .select_only()
                .column(likes_comments::Column::CommentId)
                .column_as(likes_comments::Column::Id.count(), "count")
                .filter(likes_comments::Column::CommentId.is_in(chunk.to_vec()))
                .group_by(likes_comments::Column::CommentId)
                .into_tuple()
                .all(&self.conn)
                .await
                .context("Failed to count comment likes")?;
            counts.extend(rows);
        }

        Ok(counts)
    }
}

fn group_names(rows: Vec<(i32, String)>) -> HashMap<i32, Vec<String>> {
    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (anime_id, name) in rows {
        grouped.entry(anime_id).or_default().push(name);
    }
    grouped
}
