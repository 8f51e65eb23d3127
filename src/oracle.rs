use crate::models::{SimilarArtist, TrackTag};
use anyhow::Result;

#[cfg(test)]
use mockall::automock;

/// The external similarity-data provider, abstracted so the analysis
/// core can be driven by a mock in tests.
///
/// Both lookups are fallible: an `Err` means the provider could not be
/// reached or returned garbage, while an empty `Ok` means it answered
/// and simply knows nothing. The resolver treats the two differently
/// (error sentinel vs. not-found sentinel), so implementations must
/// keep that distinction.
#[cfg_attr(test, automock)]
pub trait SimilarityOracle: Send + Sync {
    /// Similar artists ranked by the provider, best match first.
    /// Ordering is the provider's own and must be preserved.
    fn get_similar_artists(&self, artist: &str, limit: u32) -> Result<Vec<SimilarArtist>>;

    /// Descriptive tags for one track; empty when the provider has no
    /// data for it.
    fn get_track_tags(&self, artist: &str, track: &str) -> Result<Vec<TrackTag>>;
}
