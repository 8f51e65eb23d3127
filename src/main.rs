use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

mod analysis;
mod client;
mod config;
mod error;
mod models;
mod oracle;
mod playlist;

use crate::analysis::{CancelToken, ConnectionResolver, NO_CONNECTION_DEGREES};
use crate::client::LastFmClient;
use crate::config::load_config;
use crate::models::Song;
use crate::playlist::{PlaylistBuilder, PlaylistStats, Strategy};

#[derive(Parser)]
#[command(name = "song-degrees")]
#[command(about = "Degrees-of-separation playlist builder for Last.fm")]
#[command(version)]
struct Args {
    /// Path to the song list JSON file (array of {title, artist})
    #[arg(default_value = "songs.json")]
    songs_file: String,

    /// Playlist ordering strategy
    #[arg(short = 's', long = "strategy", value_enum, default_value_t = Strategy::Optimal)]
    strategy: Strategy,

    /// Seed for the random strategy (defaults to entropy)
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Directory the playlist text file is written to
    #[arg(short = 'o', long = "output", default_value = ".")]
    output_dir: String,

    /// Debug mode - print the playlist without writing the export file
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

/// One entry of the user's song list file
#[derive(Debug, Deserialize)]
struct SongEntry {
    title: String,
    artist: String,
}

fn load_songs(path: &str) -> Result<Vec<Song>> {
    let content = std::fs::read_to_string(path)?;
    let entries: Vec<SongEntry> = serde_json::from_str(&content)?;
    Ok(entries
        .into_iter()
        .map(|e| Song::new(e.title, e.artist))
        .collect())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Validate that the song list file exists before proceeding
    if !std::path::Path::new(&args.songs_file).exists() {
        eprintln!("Error: Song list file '{}' not found.", args.songs_file);
        eprintln!("Please create it or specify a different file.");
        return Err(anyhow::anyhow!("Song list file '{}' not found", args.songs_file));
    }

    // Load configuration from .env
    let config = load_config()?;
    let client = LastFmClient::new(config);

    // Load the song set
    let mut songs = load_songs(&args.songs_file)?;
    println!("Loaded {} songs from {}", songs.len(), args.songs_file);
    if songs.len() < 2 {
        return Err(anyhow::anyhow!(
            "At least 2 songs are needed to analyze connections, got {}",
            songs.len()
        ));
    }

    // Best-effort enrichment with listener/play counts
    for song in &mut songs {
        match client.get_track_info(&song.artist, &song.title) {
            Ok(Some(info)) => {
                song.mbid = info.mbid;
                song.listeners = info.listeners;
                song.playcount = info.playcount;
            }
            Ok(None) => {}
            Err(e) => log::warn!("track info lookup failed for \"{}\": {e:#}", song.title),
        }
    }

    for song in &songs {
        let listeners = song
            .listeners
            .map(|l| format!("{l} listeners"))
            .unwrap_or_else(|| "no listener data".to_string());
        println!("- \"{}\" by {} ({})", song.title, song.artist, listeners);
    }

    // Resolve all pairwise connections
    println!("\nAnalyzing song connections...");
    let resolver = ConnectionResolver::new(&client);
    let cancel = CancelToken::new();
    let graph = resolver.analyze_collection(&songs, &cancel, |done, total, connection| {
        let label = if connection.degrees == NO_CONNECTION_DEGREES {
            "no link".to_string()
        } else {
            format!("{} degrees", connection.degrees)
        };
        println!(
            "  [{done}/{total}] {} ({label}, similarity {:.2})",
            connection.path.join(" -> "),
            connection.similarity
        );
    })?;

    println!("Resolved {} connections", graph.len());

    // Build the playlist
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let playlist = PlaylistBuilder::build(&songs, &graph, args.strategy, &mut rng)?;

    println!("\n=== PLAYLIST ({} strategy) ===", playlist.strategy);
    for track in &playlist.tracks {
        let transition = match &track.next_connection {
            Some(t) => format!(" -> {} degrees, similarity {:.2}", t.degrees, t.similarity),
            None => String::new(),
        };
        println!(
            "{}. \"{}\" by {}{}",
            track.position, track.song.title, track.song.artist, transition
        );
    }

    let stats = PlaylistStats::from_tracks(&playlist.tracks);
    println!(
        "\nTracks: {} | Avg degrees: {:.2} | Avg similarity: {:.2} | Strong transitions: {}",
        stats.total_tracks,
        stats.average_degrees,
        stats.average_similarity,
        stats.strong_transitions
    );

    if args.debug {
        println!("\nDebug mode - skipping export file");
        return Ok(());
    }

    // Write the export file
    let path = std::path::Path::new(&args.output_dir).join(playlist.export_filename());
    std::fs::write(&path, playlist.to_lines().join("\n") + "\n")?;
    println!("\nWrote {}", path.display());

    Ok(())
}
