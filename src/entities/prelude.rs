pub use super::anime_categories::Entity as AnimeCategories;
pub use super::anime_classifications::Entity as AnimeClassifications;
pub use super::animes::Entity as Animes;
pub use super::categories::Entity as Categories;
pub use super::classifications::Entity as Classifications;
pub use super::comments::Entity as Comments;
pub use super::episodes::Entity as Episodes;
pub use super::favorites::Entity as Favorites;
pub use super::likes_animes::Entity as LikesAnimes;
pub use super::likes_comments::Entity as LikesComments;
pub use super::likes_episodes::Entity as LikesEpisodes;
pub use super::roles::Entity as Roles;
pub use super::seasons::Entity as Seasons;
pub use super::users::Entity as Users;
