//! Input validation.
//!
//! One function per input shape, each returning every field problem at once
//! instead of stopping at the first.

use std::sync::OnceLock;

use regex::Regex;

use super::FieldError;
use crate::constants::limits::{MAX_COMMENT_LENGTH, MAX_NAME_LENGTH};
use crate::models::{
    AnimePatch, CommentPatch, Credentials, EpisodePatch, NewAdmin, NewAnime, NewComment,
    NewEpisode, NewRole, NewSeason, NewTag, NewUser, PasswordChange, ProfilePatch, SeasonPatch,
    UserPatch,
};

pub type Validation = Result<(), Vec<FieldError>>;

/// Collects field errors and turns them into a [`Validation`] result.
#[derive(Debug, Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    fn name(&mut self, field: &'static str, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, "must not be empty");
        } else if trimmed.chars().count() > MAX_NAME_LENGTH {
            self.push(
                field,
                format!("must be at most {MAX_NAME_LENGTH} characters"),
            );
        }
    }

    fn text(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, "must not be empty");
        }
    }

    fn url(&mut self, field: &'static str, value: &str) {
        match url::Url::parse(value.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            _ => self.push(field, "must be an http(s) URL"),
        }
    }

    fn id(&mut self, field: &'static str, value: i32) {
        if value <= 0 {
            self.push(field, "must be a positive integer");
        }
    }

    fn ids(&mut self, field: &'static str, values: &[i32]) {
        if values.iter().any(|id| *id <= 0) {
            self.push(field, "must only contain positive integers");
        }
    }

    fn email(&mut self, value: &str) {
        static EMAIL: OnceLock<Regex> = OnceLock::new();
        let re = EMAIL.get_or_init(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("Invalid regex")
        });
        if !re.is_match(value.trim()) {
            self.push("email", "must be a valid email address");
        }
    }

    fn user_name(&mut self, value: &str) {
        static USER_NAME: OnceLock<Regex> = OnceLock::new();
        let re = USER_NAME
            .get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("Invalid regex"));
        if !re.is_match(value) {
            self.push(
                "userName",
                "must be 3-32 letters, digits, dots, dashes or underscores",
            );
        }
    }

    fn birthday(&mut self, value: &str) {
        if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
            self.push("birthday", "must be a date formatted as YYYY-MM-DD");
        }
    }

    fn password(&mut self, field: &'static str, value: &str, min_len: usize) {
        if value.chars().count() < min_len {
            self.push(field, format!("must be at least {min_len} characters"));
        }
    }

    fn finish(self) -> Validation {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Path ids must be positive.
pub fn validate_id(field: &'static str, id: i32) -> Result<i32, FieldError> {
    if id <= 0 {
        return Err(FieldError::new(
            field,
            format!("Invalid ID: {id}. ID must be a positive integer"),
        ));
    }
    Ok(id)
}

pub fn validate_new_anime(input: &NewAnime) -> Validation {
    let mut c = Checker::default();
    c.name("name", &input.name);
    c.text("synopsis", &input.synopsis);
    c.url("thumbnailUrl", &input.thumbnail_url);
    if let Some(background) = &input.background_url {
        c.url("backgroundUrl", background);
    }
    c.ids("classificationIds", &input.classification_ids);
    c.ids("categoryIds", &input.category_ids);
    c.finish()
}

pub fn validate_anime_patch(input: &AnimePatch) -> Validation {
    let mut c = Checker::default();
    if let Some(name) = &input.name {
        c.name("name", name);
    }
    if let Some(synopsis) = &input.synopsis {
        c.text("synopsis", synopsis);
    }
    if let Some(thumbnail) = &input.thumbnail_url {
        c.url("thumbnailUrl", thumbnail);
    }
    if let Some(background) = &input.background_url {
        c.url("backgroundUrl", background);
    }
    if let Some(ids) = &input.classification_ids {
        c.ids("classificationIds", ids);
    }
    if let Some(ids) = &input.category_ids {
        c.ids("categoryIds", ids);
    }
    c.finish()
}

pub fn validate_new_season(input: &NewSeason) -> Validation {
    let mut c = Checker::default();
    c.name("name", &input.name);
    c.id("animeId", input.anime_id);
    c.finish()
}

pub fn validate_season_patch(input: &SeasonPatch) -> Validation {
    let mut c = Checker::default();
    if let Some(name) = &input.name {
        c.name("name", name);
    }
    c.finish()
}

pub fn validate_new_episode(input: &NewEpisode) -> Validation {
    let mut c = Checker::default();
    c.name("name", &input.name);
    c.url("url", &input.url);
    if input.episode_order < 0 {
        c.push("episodeOrder", "must not be negative");
    }
    c.id("seasonId", input.season_id);
    c.finish()
}

pub fn validate_episode_patch(input: &EpisodePatch) -> Validation {
    let mut c = Checker::default();
    if let Some(name) = &input.name {
        c.name("name", name);
    }
    if let Some(url) = &input.url {
        c.url("url", url);
    }
    if input.episode_order.is_some_and(|order| order < 0) {
        c.push("episodeOrder", "must not be negative");
    }
    if let Some(season_id) = input.season_id {
        c.id("seasonId", season_id);
    }
    c.finish()
}

fn comment_text(c: &mut Checker, text: &str) {
    c.text("text", text);
    if text.chars().count() > MAX_COMMENT_LENGTH {
        c.push(
            "text",
            format!("must be at most {MAX_COMMENT_LENGTH} characters"),
        );
    }
}

pub fn validate_new_comment(input: &NewComment) -> Validation {
    let mut c = Checker::default();
    c.id("episodeId", input.episode_id);
    comment_text(&mut c, &input.text);
    c.finish()
}

pub fn validate_comment_patch(input: &CommentPatch) -> Validation {
    let mut c = Checker::default();
    comment_text(&mut c, &input.text);
    c.finish()
}

pub fn validate_new_user(input: &NewUser, min_password_length: usize) -> Validation {
    let mut c = Checker::default();
    c.user_name(&input.user_name);
    c.email(&input.email);
    c.password("password", &input.password, min_password_length);
    if let Some(profile) = &input.profile {
        c.url("profile", profile);
    }
    if let Some(birthday) = &input.birthday {
        c.birthday(birthday);
    }
    c.finish()
}

pub fn validate_new_admin(input: &NewAdmin, min_password_length: usize) -> Validation {
    let mut errors = validate_new_user(&input.user, min_password_length)
        .err()
        .unwrap_or_default();
    if input.role_id <= 0 {
        errors.push(FieldError::new("roleId", "must be a positive integer"));
    }
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn validate_user_patch(input: &UserPatch) -> Validation {
    let mut c = Checker::default();
    if let Some(user_name) = &input.user_name {
        c.user_name(user_name);
    }
    if let Some(email) = &input.email {
        c.email(email);
    }
    if let Some(birthday) = &input.birthday {
        c.birthday(birthday);
    }
    c.finish()
}

pub fn validate_profile_patch(input: &ProfilePatch) -> Validation {
    let mut c = Checker::default();
    if let Some(profile) = &input.profile {
        c.url("profile", profile);
    }
    c.finish()
}

pub fn validate_password_change(input: &PasswordChange, min_password_length: usize) -> Validation {
    let mut c = Checker::default();
    if input.current_password.is_empty() {
        c.push("currentPassword", "must not be empty");
    }
    c.password("newPassword", &input.new_password, min_password_length);
    if input.new_password == input.current_password {
        c.push("newPassword", "must differ from the current password");
    }
    c.finish()
}

pub fn validate_new_role(input: &NewRole) -> Validation {
    let mut c = Checker::default();
    c.name("name", &input.name);
    c.finish()
}

pub fn validate_new_tag(input: &NewTag) -> Validation {
    let mut c = Checker::default();
    c.name("name", &input.name);
    c.finish()
}

pub fn validate_credentials(input: &Credentials) -> Validation {
    let mut c = Checker::default();
    c.text("login", &input.login);
    if input.password.is_empty() {
        c.push("password", "must not be empty");
    }
    c.finish()
}
