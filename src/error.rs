use thiserror::Error;

/// Precondition and control-flow failures surfaced to the caller.
/// Oracle-level failures never show up here; the resolver absorbs them
/// into sentinel connection values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("at least 2 songs are required for analysis, got {0}")]
    NotEnoughSongs(usize),

    #[error("cannot build a playlist from an empty song set")]
    EmptySongSet,

    #[error("analysis cancelled")]
    Cancelled,
}
