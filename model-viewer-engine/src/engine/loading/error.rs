use thiserror::Error;

use super::candidates::CandidateLocation;

/// Resolution failures. None of them is fatal: every path ends in a
/// renderable scene, so these only ever surface as log lines and the
/// status annotation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolutionError {
    #[error("candidate {location} failed to load: {reason}")]
    CandidateNotFound {
        location: CandidateLocation,
        reason: String,
    },

    #[error("all {attempted} candidate locations failed")]
    AllCandidatesExhausted { attempted: usize },

    #[error("Local file failed to load ({location}): {reason}")]
    OverrideLoadFailed {
        location: CandidateLocation,
        reason: String,
    },

    #[error("model bounds are degenerate (largest dimension {max_dimension}); skipping rescale")]
    DegenerateGeometry { max_dimension: f32 },
}

impl ResolutionError {
    /// Whether the failure should be shown to the user rather than only traced.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Self::OverrideLoadFailed { .. })
    }
}
