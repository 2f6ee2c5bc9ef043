use crate::constants::{BOOTSTRAP_API_KEY, roles};
use crate::entities::{prelude::*, roles as role_entity, users};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const USER_ROLE_ID: i32 = 1;
const ADMIN_ROLE_ID: i32 = 2;

/// Hash the bootstrap password using Argon2id
fn hash_bootstrap_password() -> Result<String, DbErr> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(b"password", &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DbErr::Custom(format!("Failed to hash bootstrap password: {e}")))
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let now = chrono::Utc::now().to_rfc3339();

        let insert_roles = Query::insert()
            .into_table(Roles)
            .columns([
                role_entity::Column::Id,
                role_entity::Column::Name,
                role_entity::Column::CreatedAt,
            ])
            .values_panic([
                USER_ROLE_ID.into(),
                roles::DEFAULT_ROLE.into(),
                now.clone().into(),
            ])
            .values_panic([
                ADMIN_ROLE_ID.into(),
                roles::ADMIN_ROLE.into(),
                now.clone().into(),
            ])
            .to_owned();

        manager.exec_stmt(insert_roles).await?;

        let password_hash = hash_bootstrap_password()?;

        let insert_admin = Query::insert()
            .into_table(Users)
            .columns([
                users::Column::UserName,
                users::Column::Email,
                users::Column::PasswordHash,
                users::Column::ApiKey,
                users::Column::RoleId,
                users::Column::CreatedAt,
                users::Column::UpdatedAt,
            ])
            .values_panic([
                "admin".into(),
                "admin@localhost".into(),
                password_hash.into(),
                BOOTSTRAP_API_KEY.into(),
                ADMIN_ROLE_ID.into(),
                now.clone().into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert_admin).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Users)
                    .and_where(Expr::col(users::Column::UserName).eq("admin"))
                    .to_owned(),
            )
            .await?;

        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Roles)
                    .and_where(
                        Expr::col(role_entity::Column::Id).is_in([USER_ROLE_ID, ADMIN_ROLE_ID]),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
