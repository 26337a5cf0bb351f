//! Row filtering ahead of the preview

use crate::entities::NewReview;

use super::error::ImportError;

/// Keep only candidates with both a client name and review text
///
/// Every other field has already fallen back to a default, so these two
/// are the only reasons a row is dropped here.
pub fn filter_valid(candidates: Vec<NewReview>) -> Result<Vec<NewReview>, ImportError> {
    let total = candidates.len();
    let valid: Vec<NewReview> = candidates
        .into_iter()
        .filter(NewReview::has_required_fields)
        .collect();

    tracing::debug!(total, kept = valid.len(), "filtered review candidates");

    if valid.is_empty() {
        Err(ImportError::NoValidRows)
    } else {
        Ok(valid)
    }
}
