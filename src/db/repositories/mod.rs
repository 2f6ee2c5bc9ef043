pub mod anime;
pub mod catalog;
pub mod comment;
pub mod episode;
pub mod favorite;
pub mod like;
pub mod role;
pub mod season;
pub mod taxonomy;
pub mod user;
