//! Double-booking detection for accepting participants.
//!
//! Intervals are half-open, so a meeting ending exactly when another starts
//! is not a conflict.

use crate::model::meeting::TimeRange;
use crate::repo::meeting_repo::{MeetingStore, StoreResult};

/// How a proposed interval intersects an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapShape {
    /// Proposed covers the whole existing meeting (`S <= s` and `E >= e`).
    ContainsExisting,
    /// Proposed starts inside the existing meeting (`s <= S < e`), including
    /// the case where it lies entirely within it.
    StartsInside,
    /// Proposed starts before the existing meeting and ends inside it
    /// (`S < s < E <= e`).
    EndsInside,
}

/// Classifies the intersection of `proposed` with `existing`.
///
/// Returns `None` exactly when `!proposed.overlaps(existing)`.
pub fn classify_overlap(proposed: &TimeRange, existing: &TimeRange) -> Option<OverlapShape> {
    if !proposed.overlaps(existing) {
        return None;
    }

    if proposed.start <= existing.start && proposed.end >= existing.end {
        Some(OverlapShape::ContainsExisting)
    } else if proposed.start >= existing.start {
        Some(OverlapShape::StartsInside)
    } else {
        Some(OverlapShape::EndsInside)
    }
}

/// Finds the first accepted meeting of `(email, name)` that intersects
/// `proposed`, in store order.
///
/// Store failures are returned as errors and never read as "no conflict".
pub fn detect_conflict<S: MeetingStore + ?Sized>(
    store: &S,
    proposed: &TimeRange,
    email: &str,
    name: &str,
) -> StoreResult<Option<(TimeRange, OverlapShape)>> {
    let candidates = store.find_overlap_candidates(email, name)?;
    Ok(candidates.into_iter().find_map(|existing| {
        classify_overlap(proposed, &existing).map(|shape| (existing, shape))
    }))
}

/// Whether `(email, name)` already accepted a meeting intersecting `proposed`.
pub fn has_conflict<S: MeetingStore + ?Sized>(
    store: &S,
    proposed: &TimeRange,
    email: &str,
    name: &str,
) -> StoreResult<bool> {
    Ok(detect_conflict(store, proposed, email, name)?.is_some())
}
