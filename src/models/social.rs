use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub episode_id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentPatch {
    pub text: String,
}
