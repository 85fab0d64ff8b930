//! Fallback distributor: a uniform estimate for when no usable estimate exists.

use super::estimate::RawEstimate;
use crate::survey::Question;

/// Uniform weight 1.0 for every allocation option of the question.
///
/// Normalizing this estimate gives the same even split as all-zero weights,
/// so a failed estimator and an empty-handed one produce identical counts.
pub fn fallback(question: &Question) -> RawEstimate {
    RawEstimate::uniform(question.allocation_options())
}
