use serde::{Deserialize, Deserializer, Serialize};

/// A song in the user's working set. Identity is a stable digest of
/// artist + title so the same entry always maps to the same id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    /// MusicBrainz id when the provider knows one
    pub mbid: Option<String>,
    pub listeners: Option<u64>,
    pub playcount: Option<u64>,
}

impl Song {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        let title = title.into();
        let artist = artist.into();
        let id = format!(
            "{:x}",
            md5::compute(format!(
                "{}\u{0}{}",
                artist.to_lowercase(),
                title.to_lowercase()
            ))
        );

        Song {
            id,
            title,
            artist,
            mbid: None,
            listeners: None,
            playcount: None,
        }
    }
}

/// One entry of a ranked similar-artist list. Ordering is the
/// provider's own ranking and is never re-sorted downstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimilarArtist {
    pub name: String,
    #[serde(rename = "match", deserialize_with = "number_or_string")]
    pub match_score: f64,
    pub mbid: Option<String>,
}

/// A descriptive tag attached to a track.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrackTag {
    pub name: String,
    pub count: Option<u32>,
}

/// Last.fm collapses single-element lists to a bare object. Normalize
/// both shapes to a Vec at the adapter boundary so nothing past the
/// client ever sees the difference.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// Match scores arrive as `"0.87"` or `0.87` depending on the endpoint.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Response envelope for artist.getSimilar
#[derive(Debug, Deserialize)]
pub struct SimilarArtistsResponse {
    #[serde(rename = "similarartists")]
    pub similar_artists: Option<SimilarArtistList>,
    pub error: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SimilarArtistList {
    #[serde(default)]
    pub artist: OneOrMany<SimilarArtist>,
}

/// Response envelope for track.getTopTags
#[derive(Debug, Deserialize)]
pub struct TopTagsResponse {
    #[serde(rename = "toptags")]
    pub top_tags: Option<TagList>,
    pub error: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TagList {
    #[serde(default)]
    pub tag: OneOrMany<TrackTag>,
}

/// Response envelope for track.getInfo
#[derive(Debug, Deserialize)]
pub struct TrackInfoResponse {
    pub track: Option<TrackInfo>,
    pub error: Option<u32>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrackInfo {
    pub mbid: Option<String>,
    #[serde(default, deserialize_with = "optional_count")]
    pub listeners: Option<u64>,
    #[serde(default, deserialize_with = "optional_count")]
    pub playcount: Option<u64>,
}

/// Listener/play counts come back as decimal strings.
fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => Ok(s.trim().parse().ok()),
    }
}
