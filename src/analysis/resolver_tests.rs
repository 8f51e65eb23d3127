use crate::analysis::graph::{
    CancelToken, LOOKUP_FAILED_MARKER, NO_CONNECTION_DEGREES, NO_CONNECTION_MARKER,
};
use crate::analysis::resolver::ConnectionResolver;
use crate::error::Error;
use crate::models::{SimilarArtist, Song, TrackTag};
use crate::oracle::MockSimilarityOracle;
use approx::assert_relative_eq;

fn similar(name: &str, score: f64) -> SimilarArtist {
    SimilarArtist {
        name: name.to_string(),
        match_score: score,
        mbid: None,
    }
}

fn tags(names: &[&str]) -> Vec<TrackTag> {
    names
        .iter()
        .map(|n| TrackTag {
            name: n.to_string(),
            count: None,
        })
        .collect()
}

/// Mock whose similar-artist lists are keyed by artist name; unknown
/// artists get an empty list
fn oracle_with_lists(lists: Vec<(&str, Vec<SimilarArtist>)>) -> MockSimilarityOracle {
    let lists: Vec<(String, Vec<SimilarArtist>)> = lists
        .into_iter()
        .map(|(name, list)| (name.to_string(), list))
        .collect();
    let mut oracle = MockSimilarityOracle::new();
    oracle.expect_get_similar_artists().returning(move |artist, _| {
        Ok(lists
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(artist))
            .map(|(_, list)| list.clone())
            .unwrap_or_default())
    });
    oracle
}

#[test]
fn same_artist_is_zero_degrees() {
    let oracle = MockSimilarityOracle::new();
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Someone Like You", "adele");

    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, 0);
    assert_eq!(result.path, vec!["Adele".to_string()]);
}

#[test]
fn direct_similar_artist_is_one_degree() {
    let oracle = oracle_with_lists(vec![
        ("Adele", vec![similar("Sia", 0.9), similar("Coldplay", 0.4)]),
        ("Sia", vec![similar("Rihanna", 0.8)]),
    ]);
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Chandelier", "Sia");

    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, 1);
    assert_eq!(result.path, vec!["Adele".to_string(), "Sia".to_string()]);
}

#[test]
fn common_similar_artist_is_two_degrees_with_best_score_sum() {
    // Florence: 0.5 + 0.8 = 1.3 beats Coldplay: 0.9 + 0.3 = 1.2
    let oracle = oracle_with_lists(vec![
        (
            "Adele",
            vec![similar("Coldplay", 0.9), similar("Florence + The Machine", 0.5)],
        ),
        (
            "Muse",
            vec![similar("Florence + The Machine", 0.8), similar("Coldplay", 0.3)],
        ),
    ]);
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Starlight", "Muse");

    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, 2);
    assert_eq!(
        result.path,
        vec![
            "Adele".to_string(),
            "Florence + The Machine".to_string(),
            "Muse".to_string()
        ]
    );
}

#[test]
fn two_degree_score_tie_keeps_first_of_song_a_list() {
    let oracle = oracle_with_lists(vec![
        ("Adele", vec![similar("Coldplay", 0.5), similar("Sia", 0.5)]),
        ("Muse", vec![similar("Sia", 0.5), similar("Coldplay", 0.5)]),
    ]);
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Starlight", "Muse");

    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, 2);
    assert_eq!(result.path[1], "Coldplay");
}

#[test]
fn expansion_hit_is_three_degrees_first_candidate_wins() {
    let oracle = oracle_with_lists(vec![
        (
            "Adele",
            vec![
                similar("Duffy", 0.9),
                similar("Coldplay", 0.8),
                similar("Sia", 0.7),
            ],
        ),
        ("Tool", vec![similar("A Perfect Circle", 0.95)]),
        ("Duffy", vec![similar("Amy Winehouse", 0.9)]),
        ("Coldplay", vec![similar("Muse", 0.9), similar("Tool", 0.2)]),
        ("Sia", vec![similar("Tool", 0.9)]),
    ]);
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Schism", "Tool");

    // Coldplay is the first of Adele's top similars whose own list
    // contains Tool; Sia would match too but is never reached
    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, 3);
    assert_eq!(
        result.path,
        vec!["Adele".to_string(), "Coldplay".to_string(), "Tool".to_string()]
    );
}

#[test]
fn unreachable_pair_degrades_to_not_found_sentinel() {
    let oracle = oracle_with_lists(vec![
        ("Adele", vec![similar("Duffy", 0.9)]),
        ("Tool", vec![similar("A Perfect Circle", 0.95)]),
        ("Duffy", vec![similar("Amy Winehouse", 0.9)]),
    ]);
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Schism", "Tool");

    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, NO_CONNECTION_DEGREES);
    assert_eq!(result.path, vec![NO_CONNECTION_MARKER.to_string()]);
}

#[test]
fn oracle_failure_degrades_to_error_sentinel() {
    let mut oracle = MockSimilarityOracle::new();
    oracle
        .expect_get_similar_artists()
        .returning(|_, _| Err(anyhow::anyhow!("connection timed out")));
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Schism", "Tool");

    let result = resolver.resolve_degrees(&a, &b);
    assert_eq!(result.degrees, NO_CONNECTION_DEGREES);
    assert_eq!(result.path, vec![LOOKUP_FAILED_MARKER.to_string()]);
}

#[test]
fn degrees_are_symmetric() {
    let oracle = oracle_with_lists(vec![
        ("Adele", vec![similar("Coldplay", 0.7)]),
        ("Muse", vec![similar("Coldplay", 0.8)]),
    ]);
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Starlight", "Muse");

    let forward = resolver.resolve_degrees(&a, &b);
    let backward = resolver.resolve_degrees(&b, &a);
    assert_eq!(forward.degrees, backward.degrees);
    assert_eq!(forward.degrees, 2);
}

#[test]
fn similarity_is_jaccard_of_lowercase_tag_sets() {
    let mut oracle = MockSimilarityOracle::new();
    oracle.expect_get_track_tags().returning(|_, track| {
        if track == "Hello" {
            Ok(tags(&["Pop", "soul", "british"]))
        } else {
            Ok(tags(&["pop", "Rock", "british", "live"]))
        }
    });
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Yellow", "Coldplay");

    // intersection {pop, british} = 2, union = 5
    let similarity = resolver.resolve_similarity(&a, &b);
    assert_relative_eq!(similarity, 2.0 / 5.0);
    assert!((0.0..=1.0).contains(&similarity));
}

#[test]
fn similarity_is_zero_when_either_track_has_no_tags() {
    let mut oracle = MockSimilarityOracle::new();
    oracle.expect_get_track_tags().returning(|_, track| {
        if track == "Hello" {
            Ok(tags(&["pop"]))
        } else {
            Ok(vec![])
        }
    });
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Obscure B-Side", "Nobody");

    assert_relative_eq!(resolver.resolve_similarity(&a, &b), 0.0);
}

#[test]
fn similarity_is_zero_on_oracle_failure() {
    let mut oracle = MockSimilarityOracle::new();
    oracle
        .expect_get_track_tags()
        .returning(|_, _| Err(anyhow::anyhow!("503 service unavailable")));
    let resolver = ConnectionResolver::new(&oracle);

    let a = Song::new("Hello", "Adele");
    let b = Song::new("Yellow", "Coldplay");

    assert_relative_eq!(resolver.resolve_similarity(&a, &b), 0.0);
}

#[test]
fn analyze_collection_resolves_every_unordered_pair() {
    let mut oracle = oracle_with_lists(vec![
        ("Adele", vec![similar("Sia", 0.9)]),
        ("Sia", vec![similar("Adele", 0.9)]),
        ("Tool", vec![]),
    ]);
    oracle.expect_get_track_tags().returning(|_, _| Ok(vec![]));
    let resolver = ConnectionResolver::new(&oracle);

    let songs = vec![
        Song::new("Hello", "Adele"),
        Song::new("Chandelier", "Sia"),
        Song::new("Schism", "Tool"),
    ];

    let mut reported = Vec::new();
    let graph = resolver
        .analyze_collection(&songs, &CancelToken::new(), |done, total, _| {
            reported.push((done, total))
        })
        .unwrap();

    assert_eq!(graph.len(), 3);
    assert_eq!(reported, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(graph.get(&songs[0].id, &songs[1].id).unwrap().degrees, 1);
    assert_eq!(
        graph.get(&songs[0].id, &songs[2].id).unwrap().degrees,
        NO_CONNECTION_DEGREES
    );
}

#[test]
fn analyze_collection_survives_a_failing_pair() {
    let mut oracle = MockSimilarityOracle::new();
    oracle.expect_get_similar_artists().returning(|artist, _| {
        if artist == "Tool" {
            Err(anyhow::anyhow!("timed out"))
        } else if artist == "Adele" {
            Ok(vec![similar("Sia", 0.9)])
        } else {
            Ok(vec![])
        }
    });
    oracle.expect_get_track_tags().returning(|_, _| Ok(vec![]));
    let resolver = ConnectionResolver::new(&oracle);

    let songs = vec![
        Song::new("Hello", "Adele"),
        Song::new("Chandelier", "Sia"),
        Song::new("Schism", "Tool"),
    ];

    let graph = resolver
        .analyze_collection(&songs, &CancelToken::new(), |_, _, _| {})
        .unwrap();

    // All three pairs resolved; the two involving Tool carry the
    // error sentinel, the good pair is untouched
    assert_eq!(graph.len(), 3);
    assert_eq!(graph.get(&songs[0].id, &songs[1].id).unwrap().degrees, 1);
    let failed = graph.get(&songs[0].id, &songs[2].id).unwrap();
    assert_eq!(failed.degrees, NO_CONNECTION_DEGREES);
    assert_eq!(failed.path, vec![LOOKUP_FAILED_MARKER.to_string()]);
}

#[test]
fn analyze_collection_requires_at_least_two_songs() {
    let oracle = MockSimilarityOracle::new();
    let resolver = ConnectionResolver::new(&oracle);

    let songs = vec![Song::new("Hello", "Adele")];
    let result = resolver.analyze_collection(&songs, &CancelToken::new(), |_, _, _| {});
    assert_eq!(result.unwrap_err(), Error::NotEnoughSongs(1));
}

#[test]
fn cancellation_is_honored_between_pairs() {
    let oracle = MockSimilarityOracle::new();
    let resolver = ConnectionResolver::new(&oracle);

    let songs = vec![Song::new("Hello", "Adele"), Song::new("Schism", "Tool")];
    let cancel = CancelToken::new();
    cancel.cancel();

    let result = resolver.analyze_collection(&songs, &cancel, |_, _, _| {});
    assert_eq!(result.unwrap_err(), Error::Cancelled);
}
