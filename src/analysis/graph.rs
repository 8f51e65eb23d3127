use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Degrees value used when no path exists within the bounded search or
/// the oracle failed mid-lookup.
pub const NO_CONNECTION_DEGREES: u8 = 6;

/// Path marker for a pair the bounded search could not connect.
pub const NO_CONNECTION_MARKER: &str = "no connection found within 3 degrees";

/// Path marker for a pair whose lookups failed outright.
pub const LOOKUP_FAILED_MARKER: &str = "similar-artist lookup failed";

/// An edge between two songs: how many artist hops separate them, the
/// artist path taken, and the tag-overlap similarity of the tracks.
///
/// Connections are unordered: (A,B) and (B,A) are the same edge. For a
/// real path `path` starts at song A's artist and ends at song B's;
/// sentinel edges carry a single marker element instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub song_a: String,
    pub song_b: String,
    pub degrees: u8,
    pub path: Vec<String>,
    pub similarity: f64,
}

impl Connection {
    /// Check whether this edge touches the given song
    pub fn involves(&self, song_id: &str) -> bool {
        self.song_a == song_id || self.song_b == song_id
    }

    /// A connection of one hop or less
    pub fn is_strong(&self) -> bool {
        self.degrees <= 1
    }
}

/// All pairwise connections for one analysis run, keyed by unordered
/// song-id pair. At most one edge exists per pair.
#[derive(Debug, Default)]
pub struct ConnectionGraph {
    edges: HashMap<(String, String), Connection>,
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an edge, replacing any existing edge for the same
    /// unordered pair
    pub fn insert(&mut self, connection: Connection) {
        let key = pair_key(&connection.song_a, &connection.song_b);
        self.edges.insert(key, connection);
    }

    /// Look up the edge between two songs, in either order
    pub fn get(&self, song_a: &str, song_b: &str) -> Option<&Connection> {
        self.edges.get(&pair_key(song_a, song_b))
    }

    /// Number of strong connections (degrees <= 1) a song participates in
    pub fn strong_count(&self, song_id: &str) -> usize {
        self.edges
            .values()
            .filter(|c| c.involves(song_id) && c.is_strong())
            .count()
    }

    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.edges.values()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Cooperative cancellation flag checked between pairs during a batch
/// analysis. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
