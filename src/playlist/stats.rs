use super::builder::PlaylistTrack;

/// Aggregate figures for a playlist, derived purely from its track
/// sequence
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistStats {
    pub total_tracks: usize,
    /// Mean degrees across tracks that carry a transition, 0 if none do
    pub average_degrees: f64,
    /// Mean similarity across tracks that carry a transition, 0 if none do
    pub average_similarity: f64,
    /// Transitions with degrees <= 1
    pub strong_transitions: usize,
}

impl PlaylistStats {
    pub fn from_tracks(tracks: &[PlaylistTrack]) -> Self {
        let transitions: Vec<_> = tracks.iter().filter_map(|t| t.next_connection).collect();

        if transitions.is_empty() {
            return PlaylistStats {
                total_tracks: tracks.len(),
                average_degrees: 0.0,
                average_similarity: 0.0,
                strong_transitions: 0,
            };
        }

        let count = transitions.len() as f64;
        let average_degrees = transitions.iter().map(|t| t.degrees as f64).sum::<f64>() / count;
        let average_similarity = transitions.iter().map(|t| t.similarity).sum::<f64>() / count;
        let strong_transitions = transitions.iter().filter(|t| t.degrees <= 1).count();

        PlaylistStats {
            total_tracks: tracks.len(),
            average_degrees,
            average_similarity,
            strong_transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Song;
    use crate::playlist::builder::Transition;
    use approx::assert_relative_eq;

    fn track(position: usize, next: Option<(u8, f64)>) -> PlaylistTrack {
        PlaylistTrack {
            song: Song::new(format!("Track {position}"), "Artist"),
            position,
            next_connection: next.map(|(degrees, similarity)| Transition {
                degrees,
                similarity,
            }),
        }
    }

    #[test]
    fn averages_cover_only_tracks_with_transitions() {
        let tracks = vec![
            track(1, Some((1, 0.8))),
            track(2, Some((3, 0.2))),
            track(3, None),
        ];
        let stats = PlaylistStats::from_tracks(&tracks);

        assert_eq!(stats.total_tracks, 3);
        assert_relative_eq!(stats.average_degrees, 2.0);
        assert_relative_eq!(stats.average_similarity, 0.5);
        assert_eq!(stats.strong_transitions, 1);
    }

    #[test]
    fn no_transitions_yields_zeroes() {
        let tracks = vec![track(1, None), track(2, None)];
        let stats = PlaylistStats::from_tracks(&tracks);

        assert_eq!(stats.total_tracks, 2);
        assert_relative_eq!(stats.average_degrees, 0.0);
        assert_relative_eq!(stats.average_similarity, 0.0);
        assert_eq!(stats.strong_transitions, 0);
    }
}
