use crate::analysis::{Connection, ConnectionGraph};
use crate::error::Error;
use crate::models::Song;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;

/// Ordering strategy for the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Strategy {
    /// Greedy nearest-neighbor over degrees, similarity as tie-break
    Optimal,
    /// Seed with the most similar pair, then input order
    Similarity,
    /// Shuffled input
    Random,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Optimal => "optimal",
            Strategy::Similarity => "similarity",
            Strategy::Random => "random",
        };
        write!(f, "{name}")
    }
}

/// The edge between one track and the next in a playlist
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub degrees: u8,
    pub similarity: f64,
}

impl From<&Connection> for Transition {
    fn from(connection: &Connection) -> Self {
        Transition {
            degrees: connection.degrees,
            similarity: connection.similarity,
        }
    }
}

/// One placed song. `next_connection` is the edge to the following
/// track; absent on the last track or when the pair has no recorded
/// connection.
#[derive(Debug, Clone)]
pub struct PlaylistTrack {
    pub song: Song,
    /// 1-based, contiguous
    pub position: usize,
    pub next_connection: Option<Transition>,
}

/// An ordered playlist derived from a song set and its connection
/// graph. Holds no state of its own; rebuild it whenever the inputs or
/// the strategy change.
#[derive(Debug)]
pub struct Playlist {
    pub strategy: Strategy,
    pub tracks: Vec<PlaylistTrack>,
}

impl Playlist {
    /// Export lines in `<position>. "<title>" by <artist>` form
    pub fn to_lines(&self) -> Vec<String> {
        self.tracks
            .iter()
            .map(|t| format!("{}. \"{}\" by {}", t.position, t.song.title, t.song.artist))
            .collect()
    }

    /// Filename the surrounding system writes the export to
    pub fn export_filename(&self) -> String {
        format!("playlist-{}.txt", self.strategy)
    }
}

/// Orders a song set into a playlist under a chosen strategy. Pure
/// over `(songs, graph)`; the random strategy draws from the injected
/// rng only.
pub struct PlaylistBuilder;

impl PlaylistBuilder {
    pub fn build(
        songs: &[Song],
        graph: &ConnectionGraph,
        strategy: Strategy,
        rng: &mut impl Rng,
    ) -> Result<Playlist, Error> {
        if songs.is_empty() {
            return Err(Error::EmptySongSet);
        }

        let ordered = match strategy {
            Strategy::Optimal => Self::order_optimal(songs, graph),
            Strategy::Similarity => Self::order_similarity(songs, graph),
            Strategy::Random => Self::order_random(songs, rng),
        };

        Ok(Playlist {
            strategy,
            tracks: assemble_tracks(ordered, graph),
        })
    }

    /// Greedy nearest-neighbor: start from the song with the most
    /// strong connections, then repeatedly place the remaining song
    /// with the smallest degrees to the current one (larger similarity
    /// breaks degree ties, earlier input order breaks the rest).
    fn order_optimal(songs: &[Song], graph: &ConnectionGraph) -> Vec<Song> {
        // Strict `>` keeps the first song on ties
        let mut start_index = 0;
        let mut best_strong = graph.strong_count(&songs[0].id);
        for (i, song) in songs.iter().enumerate().skip(1) {
            let strong = graph.strong_count(&song.id);
            if strong > best_strong {
                best_strong = strong;
                start_index = i;
            }
        }

        let mut remaining: Vec<&Song> = songs.iter().collect();
        let mut ordered = vec![remaining.remove(start_index).clone()];

        while !remaining.is_empty() {
            let current = ordered.last().expect("playlist has a start song");

            // First remaining song is the fallback when nothing has
            // connection data; only a strict improvement replaces it
            let mut best_index = 0;
            let mut best_edge = graph.get(&current.id, &remaining[0].id);

            for (i, candidate) in remaining.iter().enumerate().skip(1) {
                let edge = graph.get(&current.id, &candidate.id);
                if improves(edge, best_edge) {
                    best_index = i;
                    best_edge = edge;
                }
            }

            ordered.push(remaining.remove(best_index).clone());
        }

        ordered
    }

    /// Seed with the two songs of the highest-similarity connection,
    /// then append the rest in input order. With no connections at all
    /// this falls back to plain input order.
    fn order_similarity(songs: &[Song], graph: &ConnectionGraph) -> Vec<Song> {
        let mut connections: Vec<&Connection> = graph.connections().collect();
        connections.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (&a.song_a, &a.song_b).cmp(&(&b.song_a, &b.song_b)))
        });

        let Some(top) = connections.first() else {
            return songs.to_vec();
        };

        let mut ordered = Vec::with_capacity(songs.len());
        for seed_id in [&top.song_a, &top.song_b] {
            if let Some(song) = songs.iter().find(|s| &s.id == seed_id) {
                ordered.push(song.clone());
            }
        }

        for song in songs {
            if song.id != top.song_a && song.id != top.song_b {
                ordered.push(song.clone());
            }
        }

        ordered
    }

    fn order_random(songs: &[Song], rng: &mut impl Rng) -> Vec<Song> {
        let mut ordered = songs.to_vec();
        ordered.shuffle(rng);
        ordered
    }
}

/// Does `candidate` beat `best`? Smaller degrees wins, similarity
/// breaks degree ties; strict comparisons keep the earlier candidate
/// otherwise. A candidate with no edge never beats one with an edge.
fn improves(candidate: Option<&Connection>, best: Option<&Connection>) -> bool {
    match (candidate, best) {
        (Some(c), Some(b)) => {
            c.degrees < b.degrees || (c.degrees == b.degrees && c.similarity > b.similarity)
        }
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Attach 1-based positions and annotate each adjacent pair with its
/// recorded connection, if any
fn assemble_tracks(ordered: Vec<Song>, graph: &ConnectionGraph) -> Vec<PlaylistTrack> {
    let count = ordered.len();
    ordered
        .iter()
        .enumerate()
        .map(|(i, song)| {
            let next_connection = if i + 1 < count {
                graph.get(&song.id, &ordered[i + 1].id).map(Transition::from)
            } else {
                None
            };
            PlaylistTrack {
                song: song.clone(),
                position: i + 1,
                next_connection,
            }
        })
        .collect()
}
