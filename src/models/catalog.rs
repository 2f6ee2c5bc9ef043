use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnime {
    pub name: String,
    pub synopsis: String,
    pub thumbnail_url: String,
    #[serde(default)]
    pub background_url: Option<String>,
    #[serde(default)]
    pub feature: bool,
    #[serde(default)]
    pub classification_ids: Vec<i32>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimePatch {
    pub name: Option<String>,
    pub synopsis: Option<String>,
    pub thumbnail_url: Option<String>,
    pub background_url: Option<String>,
    pub feature: Option<bool>,
    /// Replaces the whole set when present.
    pub classification_ids: Option<Vec<i32>>,
    /// Replaces the whole set when present.
    pub category_ids: Option<Vec<i32>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSeason {
    pub name: String,
    pub anime_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonPatch {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEpisode {
    pub name: String,
    pub url: String,
    pub episode_order: i32,
    pub season_id: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodePatch {
    pub name: Option<String>,
    pub url: Option<String>,
    pub episode_order: Option<i32>,
    pub season_id: Option<i32>,
}

/// Body for classifications and categories, which only carry a name.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
}
