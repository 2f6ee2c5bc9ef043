use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Anime read-model: the anime with its seasons, episodes and derived like
/// counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimeDto {
    pub id: i32,
    pub name: String,
    pub synopsis: String,
    pub thumbnail_url: String,
    pub background_url: Option<String>,
    pub feature: bool,
    pub classifications: Vec<String>,
    pub categories: Vec<String>,
    pub likes: i64,
    pub seasons: Vec<SeasonDto>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDto {
    pub id: i32,
    pub name: String,
    pub anime_id: i32,
    pub episodes: Vec<EpisodeDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDto {
    pub id: i32,
    pub name: String,
    pub url: String,
    pub episode_order: i32,
    pub season_id: i32,
    pub likes: i64,
    /// Absent from the short listings (featured, top liked, newest).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<CommentDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDto {
    pub id: i32,
    pub user_id: i32,
    pub episode_id: i32,
    pub text: String,
    pub likes: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Classification or category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDto {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDto {
    pub id: i32,
    pub user_id: i32,
    pub target: &'static str,
    pub target_id: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteDto {
    pub id: i32,
    pub user_id: i32,
    pub anime_id: i32,
    pub created_at: String,
}

/// A favorite together with the anime it points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAnimeDto {
    pub favorite_id: i32,
    pub anime: AnimeDto,
}

/// Public view of a user. Never carries the password hash or the API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i32,
    pub user_name: String,
    pub email: String,
    pub profile: Option<String>,
    pub birthday: Option<String>,
    pub role_id: i32,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserDto,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
}
