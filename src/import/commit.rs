//! Bulk commit of validated candidates

use crate::core::store::{Record, RecordStore, StoreError};
use crate::entities::{NewReview, Review, REVIEWS_TABLE};

use super::error::ImportError;

/// Outcome of a successful commit
#[derive(Debug, Clone)]
pub struct CommitReport {
    /// Rows written by the bulk insert
    pub inserted: usize,
    /// `order_index` given to the first inserted row
    pub first_order_index: i64,
    /// The review list as re-read after the insert, `None` if that read failed
    pub reviews: Option<Vec<Review>>,
}

/// Assign positions after `max_order_index` and normalize optional fields
pub fn prepare_rows(candidates: &[NewReview], max_order_index: i64) -> Vec<Review> {
    candidates
        .iter()
        .cloned()
        .enumerate()
        .map(|(position, candidate)| candidate.into_review(max_order_index + 1 + position as i64))
        .collect()
}

/// Append all candidates to the store with a single insert call
///
/// The current maximum `order_index` is read first, then every row gets
/// `max + 1 + position`. Nothing is written unless the insert succeeds as a
/// whole, to the extent the store's insert is atomic.
pub fn bulk_commit<S: RecordStore + ?Sized>(
    store: &mut S,
    candidates: &[NewReview],
) -> Result<CommitReport, ImportError> {
    let max = Review::max_order_index(&*store).map_err(ImportError::CommitFailed)?;

    let records = prepare_rows(candidates, max)
        .iter()
        .map(|review| {
            review.to_record().map_err(|source| StoreError::Malformed {
                table: REVIEWS_TABLE.to_string(),
                source,
            })
        })
        .collect::<Result<Vec<Record>, _>>()
        .map_err(ImportError::CommitFailed)?;

    if let Err(e) = store.insert(REVIEWS_TABLE, &records) {
        tracing::warn!(error = %e, rows = records.len(), "bulk review insert failed");
        return Err(ImportError::CommitFailed(e));
    }

    tracing::info!(
        rows = records.len(),
        first_order_index = max + 1,
        "imported reviews"
    );

    // Rows are written at this point; a failed refresh still reports success
    let reviews = match Review::load_all(&*store) {
        Ok(reviews) => Some(reviews),
        Err(e) => {
            tracing::warn!(error = %e, "could not refresh reviews after import");
            None
        }
    };

    Ok(CommitReport {
        inserted: records.len(),
        first_order_index: max + 1,
        reviews,
    })
}
