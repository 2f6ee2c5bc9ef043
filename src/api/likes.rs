use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, LikeDto};
use crate::api::validation::validate_path_id;
use crate::domain::{Actor, LikeTarget};

/// Path segment naming what is liked: `/likes/{target}/{id}`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSegment {
    Animes,
    Episodes,
    Comments,
}

impl From<TargetSegment> for LikeTarget {
    fn from(segment: TargetSegment) -> Self {
        match segment {
            TargetSegment::Animes => Self::Anime,
            TargetSegment::Episodes => Self::Episode,
            TargetSegment::Comments => Self::Comment,
        }
    }
}

/// POST /likes/{target}/{id}
pub async fn like(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path((target, id)): Path<(TargetSegment, i32)>,
) -> Result<Json<ApiResponse<LikeDto>>, ApiError> {
    let id = validate_path_id(id)?;
    let like = state
        .social_service()
        .like(actor, target.into(), id)
        .await?;
    Ok(Json(ApiResponse::success(like)))
}

/// DELETE /likes/{target}/{id}
pub async fn unlike(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path((target, id)): Path<(TargetSegment, i32)>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = validate_path_id(id)?;
    state
        .social_service()
        .unlike(actor, target.into(), id)
        .await?;
    Ok(Json(ApiResponse::success(())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_segment_parsing() {
        let segment: TargetSegment = serde_json::from_str("\"episodes\"").unwrap();
        assert_eq!(LikeTarget::from(segment), LikeTarget::Episode);
        assert!(serde_json::from_str::<TargetSegment>("\"seasons\"").is_err());
    }
}
