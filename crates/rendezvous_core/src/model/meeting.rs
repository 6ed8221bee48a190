//! Meeting, participant and interval types.
//!
//! # Responsibility
//! - Keep raw request input (`MeetingCandidate`) apart from validated records
//!   (`Meeting`), so unchecked RSVP text never reaches persistence.
//! - Provide half-open interval arithmetic for conflict detection.
//!
//! # Invariants
//! - `Meeting::start_time < Meeting::end_time`.
//! - `Meeting::id` is `None` until the store assigns one.
//! - `TimeRange` is half-open: back-to-back ranges never overlap.
//! - Validated instants carry millisecond precision, the precision the store
//!   persists, so comparisons before and after persistence agree.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Store-assigned meeting identifier.
pub type MeetingId = Uuid;

/// Participant answer to a meeting invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rsvp {
    Yes,
    No,
    Maybe,
    #[serde(rename = "Not Answered")]
    NotAnswered,
}

impl Rsvp {
    /// Parses the wire representation. Matching is exact and case-sensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            "Maybe" => Some(Self::Maybe),
            "Not Answered" => Some(Self::NotAnswered),
            _ => None,
        }
    }

    /// Wire representation, the inverse of [`Rsvp::parse`].
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Maybe => "Maybe",
            Self::NotAnswered => "Not Answered",
        }
    }

    /// Whether this answer blocks the participant's calendar.
    pub fn is_accepting(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl Display for Rsvp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Participant entry as received from a caller.
///
/// Missing fields decode as empty strings and are rejected by the validator
/// rather than by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParticipantInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rsvp: String,
}

impl ParticipantInput {
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        rsvp: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            rsvp: rsvp.into(),
        }
    }
}

/// Proposed meeting that has not been validated or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingCandidate {
    /// Display title. Presence is not enforced here.
    #[serde(default)]
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<ParticipantInput>,
}

impl MeetingCandidate {
    pub fn new(
        title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            start_time,
            end_time,
            participants: Vec::new(),
        }
    }

    /// Appends one participant, keeping input order.
    pub fn with_participant(mut self, participant: ParticipantInput) -> Self {
        self.participants.push(participant);
        self
    }

    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }
}

/// Validated participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub email: String,
    pub name: String,
    pub rsvp: Rsvp,
}

/// Validated meeting record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MeetingId>,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Server-assigned at validation time.
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl Meeting {
    pub fn time_range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// Participants whose RSVP blocks their calendar, in input order.
    pub fn accepting_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants
            .iter()
            .filter(|participant| participant.rsvp.is_accepting())
    }
}

/// Half-open time interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Drops sub-millisecond precision from both bounds.
    pub fn truncated_to_millis(self) -> Self {
        Self {
            start: self.start.trunc_subsecs(3),
            end: self.end.trunc_subsecs(3),
        }
    }

    /// `true` when `start < end`.
    pub fn is_well_ordered(&self) -> bool {
        self.start < self.end
    }

    /// Two half-open intervals overlap iff each starts before the other ends.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[cfg(test)]
mod tests {
    use super::{Rsvp, TimeRange};
    use chrono::{TimeZone, Utc};

    fn range(start_hour: u32, end_hour: u32) -> TimeRange {
        TimeRange::new(
            Utc.with_ymd_and_hms(2020, 10, 19, start_hour, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2020, 10, 19, end_hour, 0, 0).unwrap(),
        )
    }

    #[test]
    fn rsvp_parse_accepts_exact_wire_values_only() {
        for rsvp in [Rsvp::Yes, Rsvp::No, Rsvp::Maybe, Rsvp::NotAnswered] {
            assert_eq!(Rsvp::parse(rsvp.as_str()), Some(rsvp));
        }
        assert_eq!(Rsvp::parse("yes"), None);
        assert_eq!(Rsvp::parse("NotAnswered"), None);
        assert_eq!(Rsvp::parse(""), None);
    }

    #[test]
    fn rsvp_serializes_with_space_for_not_answered() {
        let json = serde_json::to_string(&Rsvp::NotAnswered).unwrap();
        assert_eq!(json, "\"Not Answered\"");
    }

    #[test]
    fn abutting_ranges_do_not_overlap() {
        assert!(!range(15, 17).overlaps(&range(17, 18)));
        assert!(!range(17, 18).overlaps(&range(15, 17)));
    }

    #[test]
    fn truncation_can_collapse_sub_millisecond_range() {
        let start = Utc.with_ymd_and_hms(2020, 10, 19, 15, 0, 0).unwrap();
        let end = start + chrono::TimeDelta::microseconds(500);
        let range = TimeRange::new(start, end);

        assert!(range.is_well_ordered());
        let truncated = range.truncated_to_millis();
        assert_eq!(truncated.start, start);
        assert_eq!(truncated.end, start);
        assert!(!truncated.is_well_ordered());
    }

    #[test]
    fn zero_length_and_inverted_ranges_are_not_well_ordered() {
        assert!(!range(15, 15).is_well_ordered());
        assert!(!range(16, 15).is_well_ordered());
        assert!(range(15, 16).is_well_ordered());
    }
}
