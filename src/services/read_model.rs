//! Shapes raw catalog rows into anime read-models.
//!
//! Pure and deterministic: the same [`CatalogRows`] always yields the same
//! tree. Every collection keeps the order it arrived in and every `likes`
//! field is the number of like rows for that id (0 when there are none).

use std::collections::HashMap;

use crate::api::types::{AnimeDto, CommentDto, EpisodeDto, SeasonDto};
use crate::db::CatalogRows;
use crate::entities::{comments, episodes, seasons};

#[must_use]
pub fn build(rows: CatalogRows) -> Vec<AnimeDto> {
    let CatalogRows {
        animes,
        mut classifications,
        mut categories,
        seasons,
        episodes,
        comments,
        anime_likes,
        episode_likes,
        comment_likes,
    } = rows;

    let with_comments = comments.is_some();
    let mut comments_by_episode = group_by(comments.unwrap_or_default(), |c| c.episode_id);
    let mut episodes_by_season = group_by(episodes, |e| e.season_id);
    let mut seasons_by_anime = group_by(seasons, |s| s.anime_id);

    animes
        .into_iter()
        .map(|anime| {
            let seasons = seasons_by_anime
                .remove(&anime.id)
                .unwrap_or_default()
                .into_iter()
                .map(|season| {
                    let episodes = episodes_by_season
                        .remove(&season.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|episode| {
                            let comments = with_comments.then(|| {
                                comments_by_episode
                                    .remove(&episode.id)
                                    .unwrap_or_default()
                                    .into_iter()
                                    .map(|c| comment_dto(c, &comment_likes))
                                    .collect()
                            });
                            episode_dto(episode, &episode_likes, comments)
                        })
                        .collect();
                    season_dto(season, episodes)
                })
                .collect();

            AnimeDto {
                id: anime.id,
                likes: count(&anime_likes, anime.id),
                classifications: classifications.remove(&anime.id).unwrap_or_default(),
                categories: categories.remove(&anime.id).unwrap_or_default(),
                seasons,
                name: anime.name,
                synopsis: anime.synopsis,
                thumbnail_url: anime.thumbnail_url,
                background_url: anime.background_url,
                feature: anime.feature,
                created_at: anime.created_at,
                updated_at: anime.updated_at,
            }
        })
        .collect()
}

/// Read-model of a single comment outside an anime tree.
#[must_use]
pub fn comment_dto(comment: comments::Model, likes: &HashMap<i32, i64>) -> CommentDto {
    CommentDto {
        id: comment.id,
        user_id: comment.user_id,
        episode_id: comment.episode_id,
        likes: count(likes, comment.id),
        text: comment.text,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

fn episode_dto(
    episode: episodes::Model,
    likes: &HashMap<i32, i64>,
    comments: Option<Vec<CommentDto>>,
) -> EpisodeDto {
    EpisodeDto {
        id: episode.id,
        likes: count(likes, episode.id),
        name: episode.name,
        url: episode.url,
        episode_order: episode.episode_order,
        season_id: episode.season_id,
        comments,
    }
}

fn season_dto(season: seasons::Model, episodes: Vec<EpisodeDto>) -> SeasonDto {
    SeasonDto {
        id: season.id,
        name: season.name,
        anime_id: season.anime_id,
        episodes,
    }
}

fn count(likes: &HashMap<i32, i64>, id: i32) -> i64 {
    likes.get(&id).copied().unwrap_or(0)
}

/// Groups rows by key, keeping the input order inside every group.
fn group_by<T>(rows: Vec<T>, key: impl Fn(&T) -> i32) -> HashMap<i32, Vec<T>> {
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::animes;

    const TS: &str = "2024-01-01T00:00:00+00:00";

    fn anime(id: i32, name: &str) -> animes::Model {
        animes::Model {
            id,
            name: name.to_string(),
            synopsis: "synopsis".to_string(),
            thumbnail_url: "https://example.com/t.png".to_string(),
            background_url: None,
            feature: true,
            created_at: TS.to_string(),
            updated_at: TS.to_string(),
        }
    }

    fn season(id: i32, anime_id: i32) -> seasons::Model {
        seasons::Model {
            id,
            name: format!("S{id}"),
            anime_id,
            created_at: TS.to_string(),
            updated_at: TS.to_string(),
        }
    }

    fn episode(id: i32, season_id: i32, order: i32) -> episodes::Model {
        episodes::Model {
            id,
            name: format!("E{id}"),
            url: format!("https://example.com/e{id}.mp4"),
            episode_order: order,
            season_id,
            created_at: TS.to_string(),
            updated_at: TS.to_string(),
        }
    }

    fn comment(id: i32, episode_id: i32, user_id: i32) -> comments::Model {
        comments::Model {
            id,
            text: format!("comment {id}"),
            user_id,
            episode_id,
            created_at: TS.to_string(),
            updated_at: TS.to_string(),
        }
    }

    fn sample_rows() -> CatalogRows {
        CatalogRows {
            animes: vec![anime(2, "Second"), anime(1, "First")],
            classifications: HashMap::from([(1, vec!["PG-13".to_string()])]),
            categories: HashMap::from([(1, vec!["Action".to_string(), "Drama".to_string()])]),
            seasons: vec![season(10, 1), season(11, 1), season(20, 2)],
            episodes: vec![episode(101, 10, 1), episode(100, 10, 2), episode(110, 11, 1)],
            comments: Some(vec![comment(7, 101, 3), comment(5, 101, 4)]),
            anime_likes: HashMap::from([(1, 3)]),
            episode_likes: HashMap::from([(100, 2)]),
            comment_likes: HashMap::from([(5, 1)]),
        }
    }

    #[test]
    fn test_single_show_has_zero_likes() {
        let rows = CatalogRows {
            animes: vec![anime(1, "Test Show")],
            seasons: vec![season(1, 1)],
            episodes: vec![episode(1, 1, 1)],
            ..Default::default()
        };

        let tree = build(rows);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].likes, 0);
        assert_eq!(tree[0].seasons.len(), 1);
        assert_eq!(tree[0].seasons[0].episodes.len(), 1);
        assert_eq!(tree[0].seasons[0].episodes[0].likes, 0);
        assert!(tree[0].seasons[0].episodes[0].comments.is_none());
    }

    #[test]
    fn test_counts_replace_like_rows() {
        let tree = build(sample_rows());
        let first = &tree[1];
        assert_eq!(first.id, 1);
        assert_eq!(first.likes, 3);
        assert_eq!(tree[0].likes, 0);

        let episodes = &first.seasons[0].episodes;
        assert_eq!(episodes[0].likes, 0);
        assert_eq!(episodes[1].likes, 2);

        let comments = episodes[0].comments.as_ref().unwrap();
        assert_eq!(comments[0].likes, 0);
        assert_eq!(comments[1].likes, 1);
    }

    #[test]
    fn test_preserves_input_order() {
        let tree = build(sample_rows());
        assert_eq!(tree.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2, 1]);

        let first = &tree[1];
        assert_eq!(
            first.seasons.iter().map(|s| s.id).collect::<Vec<_>>(),
            vec![10, 11]
        );
        assert_eq!(
            first.seasons[0]
                .episodes
                .iter()
                .map(|e| e.id)
                .collect::<Vec<_>>(),
            vec![101, 100]
        );
        let comment_ids: Vec<i32> = first.seasons[0].episodes[0]
            .comments
            .as_ref()
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(comment_ids, vec![7, 5]);
        assert_eq!(first.categories, vec!["Action", "Drama"]);
    }

    #[test]
    fn test_episodes_without_comments_get_empty_list() {
        let tree = build(sample_rows());
        let season = &tree[1].seasons[1];
        assert_eq!(season.episodes[0].comments.as_deref(), Some(&[][..]));
        assert!(tree[0].seasons[0].episodes.is_empty());
    }

    #[test]
    fn test_build_is_idempotent() {
        let rows = sample_rows();
        let first = serde_json::to_string(&build(rows.clone())).unwrap();
        let second = serde_json::to_string(&build(rows)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_short_listing_omits_comments_field() {
        let mut rows = sample_rows();
        rows.comments = None;
        let json = serde_json::to_value(build(rows)).unwrap();
        let episode = &json[1]["seasons"][0]["episodes"][0];
        assert!(episode.get("comments").is_none());
        assert_eq!(episode["episodeOrder"], 1);
    }
}
