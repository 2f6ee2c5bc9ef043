use crate::entities::{categories, classifications, prelude::*};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// The two name-only lookup tables an anime is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Classification,
    Category,
}

impl TagKind {
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Classification => "Classification",
            Self::Category => "Category",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

impl From<classifications::Model> for Tag {
    fn from(model: classifications::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

impl From<categories::Model> for Tag {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

pub struct TaxonomyRepository {
    conn: DatabaseConnection,
}

impl TaxonomyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self, kind: TagKind) -> Result<Vec<Tag>> {
        let tags = match kind {
            TagKind::Classification => Classifications::find()
                .order_by_asc(classifications::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Tag::from)
                .collect(),
            TagKind::Category => Categories::find()
                .order_by_asc(categories::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Tag::from)
                .collect(),
        };
        Ok(tags)
    }

    pub async fn get(&self, kind: TagKind, id: i32) -> Result<Option<Tag>> {
        let tag = match kind {
            TagKind::Classification => Classifications::find_by_id(id)
                .one(&self.conn)
                .await?
                .map(Tag::from),
            TagKind::Category => Categories::find_by_id(id)
                .one(&self.conn)
                .await?
                .map(Tag::from),
        };
        Ok(tag)
    }

    pub async fn find_by_name(&self, kind: TagKind, name: &str) -> Result<Option<Tag>> {
        let tag = match kind {
            TagKind::Classification => Classifications::find()
                .filter(classifications::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(Tag::from),
            TagKind::Category => Categories::find()
                .filter(categories::Column::Name.eq(name))
                .one(&self.conn)
                .await?
                .map(Tag::from),
        };
        Ok(tag)
    }

    /// Ids from `ids` that have no row.
    pub async fn missing_ids(&self, kind: TagKind, ids: &[i32]) -> Result<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let found: Vec<i32> = match kind {
            TagKind::Classification => Classifications::find()
                .filter(classifications::Column::Id.is_in(ids.to_vec()))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
            TagKind::Category => Categories::find()
                .filter(categories::Column::Id.is_in(ids.to_vec()))
                .all(&self.conn)
                .await?
                .into_iter()
                .map(|m| m.id)
                .collect(),
        };

        let mut missing: Vec<i32> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
        missing.sort_unstable();
        missing.dedup();
        Ok(missing)
    }

    pub async fn create(&self, kind: TagKind, name: &str) -> Result<Tag> {
        let name = name.trim().to_string();
        let tag: Tag = match kind {
            TagKind::Classification => classifications::ActiveModel {
                name: Set(name),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert classification")?
            .into(),
            TagKind::Category => categories::ActiveModel {
                name: Set(name),
                ..Default::default()
            }
            .insert(&self.conn)
            .await
            .context("Failed to insert category")?
            .into(),
        };
        Ok(tag)
    }

    pub async fn rename(&self, kind: TagKind, id: i32, name: &str) -> Result<Tag> {
        let name = name.trim().to_string();
        let tag: Tag = match kind {
            TagKind::Classification => classifications::ActiveModel {
                id: Set(id),
                name: Set(name),
            }
            .update(&self.conn)
            .await
            .context("Failed to rename classification")?
            .into(),
            TagKind::Category => categories::ActiveModel {
                id: Set(id),
                name: Set(name),
            }
            .update(&self.conn)
            .await
            .context("Failed to rename category")?
            .into(),
        };
        Ok(tag)
    }

    pub async fn delete(&self, kind: TagKind, id: i32) -> Result<bool> {
        let result = match kind {
            TagKind::Classification => Classifications::delete_by_id(id).exec(&self.conn).await?,
            TagKind::Category => Categories::delete_by_id(id).exec(&self.conn).await?,
        };
        Ok(result.rows_affected > 0)
    }
}
