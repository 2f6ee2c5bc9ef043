use super::ApiError;
use crate::domain::validation::validate_id;

pub fn validate_anime_id(id: i32) -> Result<i32, ApiError> {
    Ok(validate_id("animeId", id)?)
}

pub fn validate_season_id(id: i32) -> Result<i32, ApiError> {
    Ok(validate_id("seasonId", id)?)
}

pub fn validate_episode_id(id: i32) -> Result<i32, ApiError> {
    Ok(validate_id("episodeId", id)?)
}

pub fn validate_comment_id(id: i32) -> Result<i32, ApiError> {
    Ok(validate_id("commentId", id)?)
}

pub fn validate_user_id(id: i32) -> Result<i32, ApiError> {
    Ok(validate_id("userId", id)?)
}

/// Generic path id for resources without a dedicated field name.
pub fn validate_path_id(id: i32) -> Result<i32, ApiError> {
    Ok(validate_id("id", id)?)
}

pub fn validate_search_query(query: &str) -> Result<&str, ApiError> {
    let trimmed = query.trim();

    if trimmed.is_empty() {
        return Err(ApiError::ValidationError(vec![
            crate::domain::FieldError::new("name", "Search text cannot be empty"),
        ]));
    }

    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ids() {
        assert_eq!(validate_anime_id(3).unwrap(), 3);
        assert!(validate_anime_id(0).is_err());
        assert!(validate_episode_id(-1).is_err());
        assert!(matches!(
            validate_comment_id(0),
            Err(ApiError::ValidationError(ref fields)) if fields[0].field == "commentId"
        ));
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  test ").unwrap(), "test");
        assert!(validate_search_query("   ").is_err());
    }
}
