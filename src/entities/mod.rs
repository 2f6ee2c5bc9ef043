pub mod prelude;

pub mod anime_categories;
pub mod anime_classifications;
pub mod animes;
pub mod categories;
pub mod classifications;
pub mod comments;
pub mod episodes;
pub mod favorites;
pub mod likes_animes;
pub mod likes_comments;
pub mod likes_episodes;
pub mod roles;
pub mod seasons;
pub mod users;
