//! Normalization of raw upstream detail payloads into [`DetailRecord`].

use serde_json::Value;

use crate::models::{DetailRecord, Episode, MediaKind, Season};

use super::fields::{number_field, text_field, text_field_or};

const TITLE: &[&str] = &["title", "name"];
const POSTER: &[&str] = &["poster", "thumb", "image"];
const RATING: &[&str] = &["rating"];
const YEAR: &[&str] = &["year", "release_date"];
const GENRE: &[&str] = &["genre", "genres"];
const DESCRIPTION: &[&str] = &["description", "synopsis", "overview"];
const PLAYER_URL: &[&str] = &["playerUrl", "embed_url", "video_url"];
const DIRECTOR: &[&str] = &["director"];
const CAST: &[&str] = &["cast", "actors"];

const SEASON_NAME: &[&str] = &["seasonName", "name"];
const EPISODE_TITLE: &[&str] = &["title", "name"];
const EPISODE_URL: &[&str] = &["url", "embed_url", "player_url", "playerUrl"];
const EPISODE_NUMBER: &[&str] = &["episode_number", "episodeNumber", "episode"];

/// Convert one raw upstream detail payload into the canonical record.
///
/// Total and idempotent: missing fields become defaults, malformed
/// collections become empty, and feeding an already-canonical payload back
/// in reproduces it.
pub fn normalize_detail(raw: &Value) -> DetailRecord {
    let seasons = normalize_seasons(raw);
    let kind = resolve_kind(raw, &seasons);

    DetailRecord {
        title: text_field_or(raw, TITLE, ""),
        poster: text_field_or(raw, POSTER, ""),
        rating: text_field_or(raw, RATING, "0"),
        year: text_field_or(raw, YEAR, ""),
        genre: text_field_or(raw, GENRE, ""),
        description: text_field_or(raw, DESCRIPTION, ""),
        player_url: text_field_or(raw, PLAYER_URL, ""),
        kind,
        seasons,
        director: text_field_or(raw, DIRECTOR, ""),
        cast: text_field_or(raw, CAST, ""),
    }
}

fn normalize_seasons(raw: &Value) -> Vec<Season> {
    let collection = raw
        .get("seasons")
        .or_else(|| raw.get("episodes_list"))
        .and_then(Value::as_array);
    let Some(collection) = collection else {
        return Vec::new();
    };
    let Some(first) = collection.first() else {
        return Vec::new();
    };

    if is_season_structured(first) {
        collection
            .iter()
            .enumerate()
            .map(|(index, entry)| Season {
                season_name: text_field(entry, SEASON_NAME)
                    .unwrap_or_else(|| format!("Season {}", index + 1)),
                episodes: entry
                    .get("episodes")
                    .and_then(Value::as_array)
                    .map(|episodes| episodes.iter().map(normalize_episode).collect())
                    .unwrap_or_default(),
            })
            .collect()
    } else {
        // Flat episode list: wrap everything in one synthesized season.
        vec![Season {
            season_name: "Season 1".to_string(),
            episodes: collection.iter().map(normalize_episode).collect(),
        }]
    }
}

/// One shape rule for every code path: the collection is a list of seasons
/// iff its first element carries an `episodes` array or a `seasonName`.
fn is_season_structured(first: &Value) -> bool {
    first.get("episodes").is_some_and(Value::is_array) || first.get("seasonName").is_some()
}

fn normalize_episode(raw: &Value) -> Episode {
    Episode {
        title: text_field_or(raw, EPISODE_TITLE, "Episode"),
        url: text_field_or(raw, EPISODE_URL, ""),
        episode_number: number_field(raw, EPISODE_NUMBER),
    }
}

/// An explicit upstream type wins; otherwise more than one episode across
/// all seasons means a series.
fn resolve_kind(raw: &Value, seasons: &[Season]) -> MediaKind {
    match raw.get("type").and_then(Value::as_str) {
        Some("series") | Some("tv") => MediaKind::Series,
        Some("movie") => MediaKind::Movie,
        _ => {
            let total: usize = seasons.iter().map(|s| s.episodes.len()).sum();
            if total > 1 {
                MediaKind::Series
            } else {
                MediaKind::Movie
            }
        }
    }
}
