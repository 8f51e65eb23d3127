use super::graph::{
    CancelToken, Connection, ConnectionGraph, LOOKUP_FAILED_MARKER, NO_CONNECTION_DEGREES,
    NO_CONNECTION_MARKER,
};
use crate::error::Error;
use crate::models::{SimilarArtist, Song};
use crate::oracle::SimilarityOracle;
use log::{debug, warn};
use std::collections::{HashMap, HashSet};

/// How many similar artists to request per lookup
pub const SIMILAR_ARTIST_LIMIT: u32 = 50;

/// How many of song A's top similar artists get expanded at depth 3
const EXPANSION_CANDIDATES: usize = 5;

/// Result of the bounded degree search for one pair
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeResult {
    pub degrees: u8,
    pub path: Vec<String>,
}

impl DegreeResult {
    fn not_found(reason: &str) -> Self {
        DegreeResult {
            degrees: NO_CONNECTION_DEGREES,
            path: vec![reason.to_string()],
        }
    }
}

/// Computes degrees-of-separation and tag similarity for song pairs.
///
/// Oracle failures never escape this type: a failed lookup degrades to
/// the degrees=6 error sentinel or similarity 0, so one bad pair can
/// never abort a batch.
pub struct ConnectionResolver<'a> {
    oracle: &'a dyn SimilarityOracle,
}

impl<'a> ConnectionResolver<'a> {
    pub fn new(oracle: &'a dyn SimilarityOracle) -> Self {
        Self { oracle }
    }

    /// Bounded tiered search for the hop count between two songs'
    /// artists. Tiers: 0 same artist, 1 direct similar, 2 common
    /// similar, 3 via expansion of song A's top similars, else the
    /// degrees=6 sentinel.
    pub fn resolve_degrees(&self, song_a: &Song, song_b: &Song) -> DegreeResult {
        let artist_a = &song_a.artist;
        let artist_b = &song_b.artist;

        if artist_a.to_lowercase() == artist_b.to_lowercase() {
            return DegreeResult {
                degrees: 0,
                path: vec![artist_a.clone()],
            };
        }

        // Fan out the two similar-artist lookups, join before deciding
        let (result_a, result_b) = rayon::join(
            || self.oracle.get_similar_artists(artist_a, SIMILAR_ARTIST_LIMIT),
            || self.oracle.get_similar_artists(artist_b, SIMILAR_ARTIST_LIMIT),
        );
        let (similar_a, similar_b) = match (result_a, result_b) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => {
                warn!("similar-artist lookup failed for {artist_a} / {artist_b}: {e:#}");
                return DegreeResult::not_found(LOOKUP_FAILED_MARKER);
            }
        };

        if contains_artist(&similar_a, artist_b) {
            return DegreeResult {
                degrees: 1,
                path: vec![artist_a.clone(), artist_b.clone()],
            };
        }

        if let Some(common) = best_common_artist(&similar_a, &similar_b) {
            return DegreeResult {
                degrees: 2,
                path: vec![artist_a.clone(), common, artist_b.clone()],
            };
        }

        // Depth 3: expand song A's top similars in oracle order, first
        // expansion containing artist B wins
        for candidate in similar_a.iter().take(EXPANSION_CANDIDATES) {
            let expanded = match self
                .oracle
                .get_similar_artists(&candidate.name, SIMILAR_ARTIST_LIMIT)
            {
                Ok(list) => list,
                Err(e) => {
                    warn!("expansion lookup failed for {}: {e:#}", candidate.name);
                    return DegreeResult::not_found(LOOKUP_FAILED_MARKER);
                }
            };
            if contains_artist(&expanded, artist_b) {
                return DegreeResult {
                    degrees: 3,
                    path: vec![artist_a.clone(), candidate.name.clone(), artist_b.clone()],
                };
            }
        }

        debug!("no path within 3 degrees: {artist_a} -> {artist_b}");
        DegreeResult::not_found(NO_CONNECTION_MARKER)
    }

    /// Jaccard overlap of the two tracks' lowercase tag-name sets.
    /// Returns 0 when either track has no tags or a lookup fails.
    pub fn resolve_similarity(&self, song_a: &Song, song_b: &Song) -> f64 {
        let (result_a, result_b) = rayon::join(
            || self.oracle.get_track_tags(&song_a.artist, &song_a.title),
            || self.oracle.get_track_tags(&song_b.artist, &song_b.title),
        );
        let (tags_a, tags_b) = match (result_a, result_b) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), _) | (_, Err(e)) => {
                warn!(
                    "tag lookup failed for \"{}\" / \"{}\": {e:#}",
                    song_a.title, song_b.title
                );
                return 0.0;
            }
        };

        if tags_a.is_empty() || tags_b.is_empty() {
            return 0.0;
        }

        let set_a: HashSet<String> = tags_a.iter().map(|t| t.name.to_lowercase()).collect();
        let set_b: HashSet<String> = tags_b.iter().map(|t| t.name.to_lowercase()).collect();

        let intersection = set_a.intersection(&set_b).count();
        let union = set_a.union(&set_b).count();

        intersection as f64 / union as f64
    }

    /// Resolve the full edge for one pair
    pub fn resolve_connection(&self, song_a: &Song, song_b: &Song) -> Connection {
        let DegreeResult { degrees, path } = self.resolve_degrees(song_a, song_b);
        let similarity = self.resolve_similarity(song_a, song_b);

        Connection {
            song_a: song_a.id.clone(),
            song_b: song_b.id.clone(),
            degrees,
            path,
            similarity,
        }
    }

    /// Resolve all N·(N-1)/2 unordered pairs of the song set,
    /// pair-by-pair so progress can be reported incrementally. The
    /// cancellation token is honored between pairs.
    ///
    /// `progress` is called after each resolved pair with
    /// (pairs done, pairs total, edge just resolved).
    pub fn analyze_collection(
        &self,
        songs: &[Song],
        cancel: &CancelToken,
        mut progress: impl FnMut(usize, usize, &Connection),
    ) -> Result<ConnectionGraph, Error> {
        if songs.len() < 2 {
            return Err(Error::NotEnoughSongs(songs.len()));
        }

        let total = songs.len() * (songs.len() - 1) / 2;
        let mut graph = ConnectionGraph::new();
        let mut done = 0;

        for (i, song_a) in songs.iter().enumerate() {
            for song_b in &songs[i + 1..] {
                if cancel.is_cancelled() {
                    return Err(Error::Cancelled);
                }

                let connection = self.resolve_connection(song_a, song_b);
                done += 1;
                progress(done, total, &connection);
                graph.insert(connection);
            }
        }

        Ok(graph)
    }
}

fn contains_artist(list: &[SimilarArtist], name: &str) -> bool {
    let needle = name.to_lowercase();
    list.iter().any(|a| a.name.to_lowercase() == needle)
}

/// The common artist of both lists maximizing the sum of its match
/// scores. Ties keep the earliest entry of list A (strict `>`), so
/// iteration order of list A decides.
fn best_common_artist(list_a: &[SimilarArtist], list_b: &[SimilarArtist]) -> Option<String> {
    let scores_b: HashMap<String, f64> = list_b
        .iter()
        .rev()
        .map(|a| (a.name.to_lowercase(), a.match_score))
        .collect();

    let mut best: Option<(&SimilarArtist, f64)> = None;
    for entry in list_a {
        if let Some(score_b) = scores_b.get(&entry.name.to_lowercase()) {
            let combined = entry.match_score + score_b;
            match best {
                Some((_, best_score)) if combined <= best_score => {}
                _ => best = Some((entry, combined)),
            }
        }
    }

    best.map(|(entry, _)| entry.name.clone())
}
