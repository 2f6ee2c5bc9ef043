use crate::entities::{prelude::*, roles};
use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<roles::Model>> {
        Roles::find()
            .order_by_asc(roles::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list roles")
    }

    pub async fn get(&self, id: i32) -> Result<Option<roles::Model>> {
        Roles::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query role by ID")
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<roles::Model>> {
        Roles::find()
            .filter(roles::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query role by name")
    }

    pub async fn create(&self, name: &str) -> Result<roles::Model> {
        roles::ActiveModel {
            name: Set(name.trim().to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert role")
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Roles::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete role")?;
        Ok(result.rows_affected > 0)
    }
}
