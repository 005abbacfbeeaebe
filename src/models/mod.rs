mod lenient;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Whether a catalog entry is a standalone film or an episodic series.
///
/// The upstream is loose about this field: listing payloads carry `"tv"`,
/// detail payloads carry `"series"`, and some entries omit it entirely.
/// Deserialization is total; anything unrecognized falls back to `Movie`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Movie,
    Series,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for MediaKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("series") | Some("tv") => MediaKind::Series,
            _ => MediaKind::Movie,
        })
    }
}

/// One entry of a listing or search response.
///
/// Immutable once returned. `(id, detail_path)` is the rendering-uniqueness
/// pair; cache identity comes from the request fingerprint instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub rating: String,
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub year: String,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default, deserialize_with = "lenient::joined_text")]
    pub genre: String,
    #[serde(default)]
    pub detail_path: String,
}

/// Listing/search response shape shared by every catalog action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub has_more: bool,
}

fn default_page() -> u32 {
    1
}

impl CatalogPage {
    /// The benign failure shape: transport and upstream errors both come
    /// back as this, indistinguishable from a legitimately empty answer.
    pub fn empty() -> Self {
        Self {
            success: false,
            items: Vec::new(),
            page: 1,
            has_more: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
}

impl Episode {
    /// An empty url means the upstream has no embed for this episode. The
    /// presentation layer must special-case it instead of attempting
    /// playback.
    pub fn is_playable(&self) -> bool {
        !self.url.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    #[serde(default)]
    pub season_name: String,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Canonical detail record produced by the normalizer. Every field is
/// always present; missing upstream data becomes empty strings ("0" for
/// the rating) or empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub player_url: String,
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    #[serde(default)]
    pub seasons: Vec<Season>,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub cast: String,
}

impl DetailRecord {
    pub fn total_episodes(&self) -> usize {
        self.seasons.iter().map(|s| s.episodes.len()).sum()
    }

    /// The initial playable source: the top-level player url wins, else the
    /// first episode of the first season. `None` means nothing is playable.
    pub fn default_source(&self) -> Option<&str> {
        if !self.player_url.is_empty() {
            return Some(&self.player_url);
        }
        self.seasons
            .first()
            .and_then(|s| s.episodes.first())
            .map(|e| e.url.as_str())
            .filter(|url| !url.is_empty())
    }
}
