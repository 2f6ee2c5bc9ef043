use crate::entities::{anime_categories, anime_classifications, animes, likes_animes, prelude::*};
use crate::models::{AnimePatch, NewAnime};
use anyhow::{Context, Result};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, JoinType,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get(&self, id: i32) -> Result<Option<animes::Model>> {
        Animes::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query anime by ID")
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn get_by_ids(&self, ids: &[i32]) -> Result<Vec<animes::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Animes::find()
            .filter(animes::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(animes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query animes by IDs")
    }

    pub async fn list_all(&self) -> Result<Vec<animes::Model>> {
        Animes::find()
            .order_by_asc(animes::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list animes")
    }

    /// Featured animes, most recently updated first.
    pub async fn list_featured(&self, limit: u64) -> Result<Vec<animes::Model>> {
        Animes::find()
            .filter(animes::Column::Feature.eq(true))
            .order_by_desc(animes::Column::UpdatedAt)
            .order_by_asc(animes::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list featured animes")
    }

    pub async fn list_newest(&self, limit: u64) -> Result<Vec<animes::Model>> {
        Animes::find()
            .order_by_desc(animes::Column::CreatedAt)
            .order_by_desc(animes::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list newest animes")
    }

    /// Animes ordered by how many likes they have. Ties go to the lower id.
    pub async fn list_top_liked(&self, limit: u64) -> Result<Vec<animes::Model>> {
        Animes::find()
            .join(JoinType::LeftJoin, animes::Relation::LikesAnimes.def())
            .group_by(animes::Column::Id)
            .order_by_desc(Expr::col((LikesAnimes, likes_animes::Column::Id)).count())
            .order_by_asc(animes::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list top liked animes")
    }

    /// First anime (lowest id) whose name contains `text`, ignoring case.
    ///
    /// SQLite's `lower()` only folds ASCII, so names are compared here with
    /// Unicode case folding instead of in a LIKE pattern.
    pub async fn find_by_name(&self, text: &str) -> Result<Option<animes::Model>> {
        let needle = text.to_lowercase();

        let names: Vec<(i32, String)> = Animes::find()
            .select_only()
            .column(animes::Column::Id)
            .column(animes::Column::Name)
            .order_by_asc(animes::Column::Id)
            .into_tuple()
            .all(&self.conn)
            .await
            .context("Failed to search anime by name")?;

        match names
            .into_iter()
            .find(|(_, name)| name_matches(name, &needle))
        {
            Some((id, _)) => self.get(id).await,
            None => Ok(None),
        }
    }

    pub async fn create(&self, input: &NewAnime) -> Result<animes::Model> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.conn.begin().await?;

        let anime = animes::ActiveModel {
            name: Set(input.name.trim().to_string()),
            synopsis: Set(input.synopsis.clone()),
            thumbnail_url: Set(input.thumbnail_url.clone()),
            background_url: Set(input.background_url.clone()),
            feature: Set(input.feature),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .context("Failed to insert anime")?;

        replace_classifications(&txn, anime.id, &input.classification_ids).await?;
        replace_categories(&txn, anime.id, &input.category_ids).await?;

        txn.commit().await?;
        Ok(anime)
    }

    pub async fn update(&self, existing: animes::Model, patch: &AnimePatch) -> Result<animes::Model> {
        let txn = self.conn.begin().await?;
        let id = existing.id;

        let mut active: animes::ActiveModel = existing.into();
        if let Some(name) = &patch.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(synopsis) = &patch.synopsis {
            active.synopsis = Set(synopsis.clone());
        }
        if let Some(thumbnail) = &patch.thumbnail_url {
            active.thumbnail_url = Set(thumbnail.clone());
        }
        if let Some(background) = &patch.background_url {
            active.background_url = Set(Some(background.clone()));
        }
        if let Some(feature) = patch.feature {
            active.feature = Set(feature);
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let anime = active
            .update(&txn)
            .await
            .context("Failed to update anime")?;

        if let Some(ids) = &patch.classification_ids {
            replace_classifications(&txn, id, ids).await?;
        }
        if let Some(ids) = &patch.category_ids {
            replace_categories(&txn, id, ids).await?;
        }

        txn.commit().await?;
        Ok(anime)
    }

    /// Seasons, episodes, likes and favorites go with it through the cascades.
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Animes::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete anime")?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        use sea_orm::PaginatorTrait;

        Animes::find()
            .count(&self.conn)
            .await
            .context("Failed to count animes")
    }
}

async fn replace_classifications(txn: &DatabaseTransaction, anime_id: i32, ids: &[i32]) -> Result<()> {
    AnimeClassifications::delete_many()
        .filter(anime_classifications::Column::AnimeId.eq(anime_id))
        .exec(txn)
        .await?;

    if ids.is_empty() {
        return Ok(());
    }

    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let rows = unique
        .into_iter()
        .map(|classification_id| anime_classifications::ActiveModel {
            anime_id: Set(anime_id),
            classification_id: Set(classification_id),
        });
    AnimeClassifications::insert_many(rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

async fn replace_categories(txn: &DatabaseTransaction, anime_id: i32, ids: &[i32]) -> Result<()> {
    AnimeCategories::delete_many()
        .filter(anime_categories::Column::AnimeId.eq(anime_id))
        .exec(txn)
        .await?;

    if ids.is_empty() {
        return Ok(());
    }

    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let rows = unique
        .into_iter()
        .map(|category_id| anime_categories::ActiveModel {
            anime_id: Set(anime_id),
            category_id: Set(category_id),
        });
    AnimeCategories::insert_many(rows)
        .exec_without_returning(txn)
        .await?;
    Ok(())
}

/// Case-insensitive substring match; `needle` is already lowercased.
fn name_matches(name: &str, needle: &str) -> bool {
    name.to_lowercase().contains(needle)
}
