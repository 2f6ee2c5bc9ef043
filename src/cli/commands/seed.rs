//! Seed command handler

use anyhow::Context;

use crate::config::Config;
use crate::constants::roles::ADMIN_ROLE;
use crate::db::TagKind;
use crate::domain::{Actor, Role};
use crate::models::{NewAnime, NewEpisode, NewSeason, NewTag};
use crate::state::SharedState;

const CLASSIFICATIONS: &[&str] = &["All ages", "Teen", "Mature"];

const CATEGORIES: &[&str] = &["Action", "Adventure", "Comedy", "Drama", "Fantasy", "Slice of life"];

struct DemoAnime {
    name: &'static str,
    synopsis: &'static str,
    feature: bool,
    classification: &'static str,
    categories: &'static [&'static str],
    episodes: i32,
}

const DEMO_ANIMES: &[DemoAnime] = &[
    DemoAnime {
        name: "Skyward Lantern",
        synopsis: "A courier crosses a floating archipelago to deliver the last lantern.",
        feature: true,
        classification: "All ages",
        categories: &["Adventure", "Fantasy"],
        episodes: 3,
    },
    DemoAnime {
        name: "Night Shift Diner",
        synopsis: "Regulars of a late-night diner trade stories over cold coffee.",
        feature: false,
        classification: "Teen",
        categories: &["Comedy", "Slice of life"],
        episodes: 4,
    },
    DemoAnime {
        name: "Iron Tide",
        synopsis: "A harbor city braces for the storm season and what it brings ashore.",
        feature: true,
        classification: "Mature",
        categories: &["Action", "Drama"],
        episodes: 2,
    },
];

/// Loads a small demo catalog through the catalog service, so the demo data
/// passes the same validation as API input.
pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;

    if state.store.animes().count().await? > 0 {
        println!("Catalog already has animes, skipping seed.");
        return Ok(());
    }

    let admin = state
        .store
        .users()
        .list()
        .await?
        .into_iter()
        .find(|row| row.role_name() == ADMIN_ROLE)
        .context("No admin account found; create one with: anicat create-admin")?;
    let actor = Actor::new(admin.user.id, Role::Admin);

    let classification_ids = ensure_tags(&state, actor, TagKind::Classification, CLASSIFICATIONS).await?;
    let category_ids = ensure_tags(&state, actor, TagKind::Category, CATEGORIES).await?;

    let catalog = &state.catalog_service;
    for demo in DEMO_ANIMES {
        let input = NewAnime {
            name: demo.name.to_string(),
            synopsis: demo.synopsis.to_string(),
            thumbnail_url: format!("https://images.example.com/{}/thumb.jpg", slug(demo.name)),
            background_url: Some(format!(
                "https://images.example.com/{}/background.jpg",
                slug(demo.name)
            )),
            feature: demo.feature,
            classification_ids: lookup(&classification_ids, &[demo.classification]),
            category_ids: lookup(&category_ids, demo.categories),
        };
        let anime = catalog.create_anime(actor, input).await?;

        let season = catalog
            .create_season(
                actor,
                NewSeason {
                    name: "Season 1".to_string(),
                    anime_id: anime.id,
                },
            )
            .await?;

        for order in 1..=demo.episodes {
            catalog
                .create_episode(
                    actor,
                    NewEpisode {
                        name: format!("Episode {order}"),
                        url: format!(
                            "https://videos.example.com/{}/s1e{order}.mp4",
                            slug(demo.name)
                        ),
                        episode_order: order,
                        season_id: season.id,
                    },
                )
                .await?;
        }

        println!("Seeded '{}' with {} episodes", anime.name, demo.episodes);
    }

    Ok(())
}

/// Returns `(name, id)` pairs, creating only the names that are missing.
async fn ensure_tags(
    state: &SharedState,
    actor: Actor,
    kind: TagKind,
    names: &[&str],
) -> anyhow::Result<Vec<(String, i32)>> {
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let id = match state.store.taxonomy().find_by_name(kind, name).await? {
            Some(tag) => tag.id,
            None => {
                state
                    .catalog_service
                    .create_tag(
                        actor,
                        kind,
                        NewTag {
                            name: (*name).to_string(),
                        },
                    )
                    .await?
                    .id
            }
        };
        ids.push(((*name).to_string(), id));
    }
    Ok(ids)
}

fn lookup(ids: &[(String, i32)], names: &[&str]) -> Vec<i32> {
    ids.iter()
        .filter(|(name, _)| names.contains(&name.as_str()))
        .map(|(_, id)| *id)
        .collect()
}

fn slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug() {
        assert_eq!(slug("Night Shift Diner"), "night-shift-diner");
    }

    #[test]
    fn test_lookup_picks_named_ids() {
        let ids = vec![("Action".to_string(), 1), ("Drama".to_string(), 2)];
        assert_eq!(lookup(&ids, &["Drama"]), vec![2]);
        assert!(lookup(&ids, &["Comedy"]).is_empty());
    }

    #[test]
    fn test_demo_tags_exist() {
        for demo in DEMO_ANIMES {
            assert!(CLASSIFICATIONS.contains(&demo.classification));
            for category in demo.categories {
                assert!(CATEGORIES.contains(category));
            }
        }
    }
}
