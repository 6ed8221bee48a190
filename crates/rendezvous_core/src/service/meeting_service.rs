//! Meeting use-case service.
//!
//! # Responsibility
//! - Run validation, conflict detection and persistence for create requests.
//! - Serve lookup and paginated listing queries.
//!
//! # Invariants
//! - Nothing is persisted unless every validation step passed.
//! - The store is injected; the service holds no process-wide handle.
//!
//! # Known limitation
//! The conflict check and the insert are separate store calls. Two concurrent
//! creates naming the same accepting participant with overlapping intervals
//! can both pass validation and both persist. No lock, retry or idempotency
//! key guards this window.

use crate::model::meeting::{Meeting, MeetingCandidate, MeetingId};
use crate::repo::meeting_repo::MeetingStore;
use crate::service::error::SchedulingError;
use crate::service::pagination::{paginate, PageRequest};
use crate::service::validator::validate_candidate;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::num::NonZeroU32;
use std::time::Instant;
use uuid::Uuid;

/// Meeting facade over a store implementation.
pub struct MeetingService<S: MeetingStore> {
    store: S,
    page_size: NonZeroU32,
}

impl<S: MeetingStore> MeetingService<S> {
    /// Creates a service with the given listing page size.
    pub fn new(store: S, page_size: NonZeroU32) -> Self {
        Self { store, page_size }
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Validates and persists a candidate, stamping `created_at` with now.
    pub fn create_meeting(&self, candidate: &MeetingCandidate) -> Result<Meeting, SchedulingError> {
        self.create_meeting_at(candidate, Utc::now())
    }

    /// Same as [`Self::create_meeting`] with an explicit creation instant.
    pub fn create_meeting_at(
        &self,
        candidate: &MeetingCandidate,
        now: DateTime<Utc>,
    ) -> Result<Meeting, SchedulingError> {
        let started_at = Instant::now();
        let participant_count = candidate.participants.len();

        let result = validate_candidate(candidate, &self.store, now).and_then(|mut meeting| {
            let id = self.store.insert(&meeting)?;
            meeting.id = Some(id);
            Ok(meeting)
        });

        match &result {
            Ok(meeting) => info!(
                "event=meeting_create module=service status=ok duration_ms={} participants={} meeting_id={}",
                started_at.elapsed().as_millis(),
                participant_count,
                meeting.id.map(|id| id.to_string()).unwrap_or_default()
            ),
            Err(err) if err.is_validation() => info!(
                "event=meeting_create module=service status=rejected duration_ms={} participants={} error_code={}",
                started_at.elapsed().as_millis(),
                participant_count,
                err.code()
            ),
            Err(err) => warn!(
                "event=meeting_create module=service status=error duration_ms={} participants={} error_code={} error={}",
                started_at.elapsed().as_millis(),
                participant_count,
                err.code(),
                err
            ),
        }

        result
    }

    /// Decodes a JSON payload and creates the meeting it describes.
    ///
    /// # Errors
    /// - `MalformedPayload` when the body is not a meeting candidate.
    pub fn create_meeting_from_json(&self, payload: &str) -> Result<Meeting, SchedulingError> {
        let candidate = decode_candidate(payload)?;
        self.create_meeting(&candidate)
    }

    /// Gets one meeting by id.
    pub fn get_meeting(&self, id: MeetingId) -> Result<Meeting, SchedulingError> {
        self.store.get(id)?.ok_or(SchedulingError::NotFound)
    }

    /// Meetings fully inside `[start, end]`, paginated.
    pub fn list_meetings_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Vec<Meeting>, SchedulingError> {
        let meetings = self.store.find_range(start, end)?;
        Ok(paginate(meetings, page, self.page_size))
    }

    /// Meetings that list `email` as a participant, paginated.
    pub fn list_meetings_for_participant(
        &self,
        email: &str,
        page: PageRequest,
    ) -> Result<Vec<Meeting>, SchedulingError> {
        let meetings = self.store.find_by_participant(email)?;
        Ok(paginate(meetings, page, self.page_size))
    }
}

/// Decodes a JSON request body into a candidate.
pub fn decode_candidate(payload: &str) -> Result<MeetingCandidate, SchedulingError> {
    serde_json::from_str(payload).map_err(|err| SchedulingError::MalformedPayload(err.to_string()))
}

/// Parses a textual meeting id. Unparsable ids can match nothing, so they
/// report `NotFound`.
pub fn parse_meeting_id(raw: &str) -> Result<MeetingId, SchedulingError> {
    Uuid::parse_str(raw.trim()).map_err(|_| SchedulingError::NotFound)
}
