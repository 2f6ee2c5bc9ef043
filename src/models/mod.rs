pub mod catalog;
pub mod social;
pub mod user;

pub use catalog::{AnimePatch, EpisodePatch, NewAnime, NewEpisode, NewSeason, NewTag, SeasonPatch};
pub use social::{CommentPatch, NewComment};
pub use user::{Credentials, NewAdmin, NewRole, NewUser, PasswordChange, ProfilePatch, UserPatch};
