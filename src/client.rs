use crate::config::Config;
use crate::models::{
    SimilarArtist, SimilarArtistsResponse, TopTagsResponse, TrackInfo, TrackInfoResponse, TrackTag,
};
use crate::oracle::SimilarityOracle;
use anyhow::Result;
use log::{debug, warn};
use std::time::Duration;
use ureq::Agent;
use urlencoding::encode;

/// Last.fm error code for "artist/track not found". Treated as an
/// empty result, not a failure.
const NOT_FOUND_CODES: [u32; 2] = [6, 7];

/// A simple Last.fm API client using API-key authentication
pub struct LastFmClient {
    agent: Agent,
    base_url: String,
    api_key: String,
}

impl LastFmClient {
    /// Create a new client with configuration from environment
    pub fn new(config: Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();

        LastFmClient {
            agent,
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }

    /// Build a request URL for the given method and extra query params
    fn build_url(&self, method: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!(
            "{}?method={}&api_key={}&format=json",
            self.base_url.trim_end_matches('/'),
            method,
            self.api_key
        );
        for (key, value) in params {
            url.push_str(&format!("&{}={}", key, encode(value)));
        }
        url
    }

    /// Send a GET request and return the raw response body
    fn get(&self, url: &str) -> Result<String> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| anyhow::anyhow!("HTTP request failed: {}", e))?;
        Ok(response.into_string()?)
    }

    /// Fetch listener/play counts for one track (best-effort enrichment)
    pub fn get_track_info(&self, artist: &str, track: &str) -> Result<Option<TrackInfo>> {
        let url = self.build_url(
            "track.getInfo",
            &[("artist", artist), ("track", track), ("autocorrect", "1")],
        );
        let response_text = self.get(&url)?;

        let parsed: TrackInfoResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow::anyhow!("Failed to parse track.getInfo response: {}", e))?;

        if let Some(code) = parsed.error {
            if NOT_FOUND_CODES.contains(&code) {
                debug!("track.getInfo: no data for \"{track}\" by {artist}");
                return Ok(None);
            }
            return Err(anyhow::anyhow!(
                "API error {}: {}",
                code,
                parsed.message.unwrap_or_default()
            ));
        }

        Ok(parsed.track)
    }
}

impl SimilarityOracle for LastFmClient {
    fn get_similar_artists(&self, artist: &str, limit: u32) -> Result<Vec<SimilarArtist>> {
        let limit_str = limit.to_string();
        let url = self.build_url(
            "artist.getSimilar",
            &[
                ("artist", artist),
                ("limit", &limit_str),
                ("autocorrect", "1"),
            ],
        );
        let response_text = self.get(&url)?;

        let parsed: SimilarArtistsResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow::anyhow!("Failed to parse artist.getSimilar response: {}", e))?;

        if let Some(code) = parsed.error {
            if NOT_FOUND_CODES.contains(&code) {
                debug!("artist.getSimilar: unknown artist {artist}");
                return Ok(vec![]);
            }
            return Err(anyhow::anyhow!(
                "API error {}: {}",
                code,
                parsed.message.unwrap_or_default()
            ));
        }

        let artists = match parsed.similar_artists {
            Some(list) => list.artist.into_vec(),
            None => {
                warn!("artist.getSimilar: missing similarartists block for {artist}");
                vec![]
            }
        };

        debug!("artist.getSimilar: {} results for {artist}", artists.len());
        Ok(artists)
    }

    fn get_track_tags(&self, artist: &str, track: &str) -> Result<Vec<TrackTag>> {
        let url = self.build_url(
            "track.getTopTags",
            &[("artist", artist), ("track", track), ("autocorrect", "1")],
        );
        let response_text = self.get(&url)?;

        let parsed: TopTagsResponse = serde_json::from_str(&response_text)
            .map_err(|e| anyhow::anyhow!("Failed to parse track.getTopTags response: {}", e))?;

        if let Some(code) = parsed.error {
            if NOT_FOUND_CODES.contains(&code) {
                debug!("track.getTopTags: no data for \"{track}\" by {artist}");
                return Ok(vec![]);
            }
            return Err(anyhow::anyhow!(
                "API error {}: {}",
                code,
                parsed.message.unwrap_or_default()
            ));
        }

        Ok(parsed
            .top_tags
            .map(|list| list.tag.into_vec())
            .unwrap_or_default())
    }
}
