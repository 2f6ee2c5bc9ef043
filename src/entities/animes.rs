use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "animes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub synopsis: String,
    pub thumbnail_url: String,
    pub background_url: Option<String>,
    /// Shown in the featured carousel.
    pub feature: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::seasons::Entity")]
    Seasons,
    #[sea_orm(has_many = "super::likes_animes::Entity")]
    LikesAnimes,
    #[sea_orm(has_many = "super::favorites::Entity")]
    Favorites,
    #[sea_orm(has_many = "super::anime_classifications::Entity")]
    AnimeClassifications,
    #[sea_orm(has_many = "super::anime_categories::Entity")]
    AnimeCategories,
}

impl Related<super::seasons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Seasons.def()
    }
}

impl Related<super::likes_animes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LikesAnimes.def()
    }
}

impl Related<super::favorites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Favorites.def()
    }
}

impl Related<super::classifications::Entity> for Entity {
    fn to() -> RelationDef {
        super::anime_classifications::Relation::Classification.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::anime_classifications::Relation::Anime.def().rev())
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        super::anime_categories::Relation::Category.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::anime_categories::Relation::Anime.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
