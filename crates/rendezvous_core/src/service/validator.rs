//! Candidate meeting validation.
//!
//! # Responsibility
//! - Turn a `MeetingCandidate` into a validated `Meeting` or report the first
//!   violated rule.
//!
//! # Invariants
//! - Check order is fixed: time range, then per participant (in input order)
//!   duplicate email, email format, RSVP; conflicts run only after every
//!   participant passed.
//! - No store read happens when a structural check fails.
//! - Validation never writes to the store.

use crate::model::meeting::{Meeting, MeetingCandidate, Participant, Rsvp};
use crate::repo::meeting_repo::MeetingStore;
use crate::service::conflict::detect_conflict;
use crate::service::error::SchedulingError;
use chrono::{DateTime, SubsecRound, Utc};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email regex")
});

/// Whether `email` is `local@domain` with 1-63 char alphanumeric/hyphen labels
/// that neither start nor end with a hyphen.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validates `candidate` against structural rules and existing bookings.
///
/// `now` becomes the meeting's `created_at`. All instants of the returned
/// meeting are truncated to milliseconds. The returned meeting has no id.
///
/// # Errors
/// - Validation variants of [`SchedulingError`] for the first failed rule.
/// - `StoreUnavailable` when a conflict lookup fails.
pub fn validate_candidate<S: MeetingStore + ?Sized>(
    candidate: &MeetingCandidate,
    store: &S,
    now: DateTime<Utc>,
) -> Result<Meeting, SchedulingError> {
    // Compare at the precision the store persists.
    let range = candidate.time_range().truncated_to_millis();
    if !range.is_well_ordered() {
        return Err(SchedulingError::InvalidTimeRange);
    }

    let participants = validate_participants(candidate)?;
    let meeting = Meeting {
        id: None,
        title: candidate.title.clone(),
        start_time: range.start,
        end_time: range.end,
        created_at: now.trunc_subsecs(3),
        participants,
    };

    let proposed = meeting.time_range();
    for participant in meeting.accepting_participants() {
        if let Some((_, shape)) =
            detect_conflict(store, &proposed, &participant.email, &participant.name)?
        {
            debug!("event=conflict_detected module=validator shape={shape:?}");
            return Err(SchedulingError::SchedulingConflict(participant.email.clone()));
        }
    }

    Ok(meeting)
}

fn validate_participants(
    candidate: &MeetingCandidate,
) -> Result<Vec<Participant>, SchedulingError> {
    let mut seen = HashSet::with_capacity(candidate.participants.len());
    let mut participants = Vec::with_capacity(candidate.participants.len());

    for input in &candidate.participants {
        if !seen.insert(input.email.as_str()) {
            return Err(SchedulingError::DuplicateParticipant);
        }
        if !is_valid_email(&input.email) {
            return Err(SchedulingError::InvalidEmailFormat);
        }
        let rsvp = Rsvp::parse(&input.rsvp).ok_or(SchedulingError::InvalidRsvp)?;

        participants.push(Participant {
            email: input.email.clone(),
            name: input.name.clone(),
            rsvp,
        });
    }

    Ok(participants)
}
