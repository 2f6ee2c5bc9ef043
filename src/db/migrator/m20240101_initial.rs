use crate::entities::prelude::*;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        // Parents before children so foreign keys resolve.
        let tables = vec![
            schema.create_table_from_entity(Roles),
            schema.create_table_from_entity(Users),
            schema.create_table_from_entity(Classifications),
            schema.create_table_from_entity(Categories),
            schema.create_table_from_entity(Animes),
            schema.create_table_from_entity(AnimeClassifications),
            schema.create_table_from_entity(AnimeCategories),
            schema.create_table_from_entity(Seasons),
            schema.create_table_from_entity(Episodes),
            schema.create_table_from_entity(Comments),
            schema.create_table_from_entity(LikesAnimes),
            schema.create_table_from_entity(LikesEpisodes),
            schema.create_table_from_entity(LikesComments),
            schema.create_table_from_entity(Favorites),
        ];

        for mut table in tables {
            manager
                .create_table(table.if_not_exists().to_owned())
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children first.
        manager
            .drop_table(Table::drop().table(Favorites).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LikesComments).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LikesEpisodes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LikesAnimes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Episodes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Seasons).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AnimeCategories).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(AnimeClassifications)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Animes).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classifications).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
