//! Error kinds reported by meeting use-cases.
//!
//! Validation variants render the exact user-facing message text; callers
//! pass `to_string()` through unchanged.

use crate::repo::meeting_repo::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum SchedulingError {
    /// `start_time` is not strictly before `end_time`.
    InvalidTimeRange,
    /// Two participants of one candidate share an email.
    DuplicateParticipant,
    InvalidEmailFormat,
    /// RSVP text outside `Yes | No | Maybe | Not Answered`.
    InvalidRsvp,
    /// An accepting participant is already booked; carries their email.
    SchedulingConflict(String),
    /// Store read or write failed, including busy timeouts.
    StoreUnavailable(StoreError),
    /// Transport payload could not be decoded; carries decoder detail.
    MalformedPayload(String),
    NotFound,
    /// Page parameter is not a positive integer; carries the raw value.
    InvalidPage(String),
}

impl SchedulingError {
    /// Stable snake_case code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTimeRange => "invalid_time_range",
            Self::DuplicateParticipant => "duplicate_participant",
            Self::InvalidEmailFormat => "invalid_email_format",
            Self::InvalidRsvp => "invalid_rsvp",
            Self::SchedulingConflict(_) => "scheduling_conflict",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::MalformedPayload(_) => "malformed_payload",
            Self::NotFound => "not_found",
            Self::InvalidPage(_) => "invalid_page",
        }
    }

    /// Only transport-level store failures (I/O, lock timeouts) may succeed
    /// on a later attempt; corrupt rows and unmigrated schemas never will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(StoreError::Db(_)))
    }

    /// Whether the candidate itself was rejected.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeRange
                | Self::DuplicateParticipant
                | Self::InvalidEmailFormat
                | Self::InvalidRsvp
                | Self::SchedulingConflict(_)
        )
    }
}

impl Display for SchedulingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeRange => f.write_str("Start time is not before End time"),
            Self::DuplicateParticipant => f.write_str("Repeated email found"),
            Self::InvalidEmailFormat => f.write_str("Invalid email in participant list"),
            Self::InvalidRsvp => f.write_str("Invalid RSVP"),
            Self::SchedulingConflict(email) => write!(f, "Overlapping meeting for email {email}"),
            Self::StoreUnavailable(err) if err.is_timeout() => {
                write!(f, "Store unavailable: timed out ({err})")
            }
            Self::StoreUnavailable(err) => write!(f, "Store unavailable: {err}"),
            Self::MalformedPayload(_) => f.write_str("Invalid request payload"),
            Self::NotFound => f.write_str("Meeting not found"),
            Self::InvalidPage(_) => f.write_str("Invalid page value"),
        }
    }
}

impl Error for SchedulingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for SchedulingError {
    fn from(value: StoreError) -> Self {
        Self::StoreUnavailable(value)
    }
}

#[cfg(test)]
mod tests {
    use super::SchedulingError;
    use crate::db::DbError;
    use crate::repo::meeting_repo::StoreError;

    #[test]
    fn validation_messages_are_fixed_text() {
        assert_eq!(
            SchedulingError::InvalidTimeRange.to_string(),
            "Start time is not before End time"
        );
        assert_eq!(
            SchedulingError::DuplicateParticipant.to_string(),
            "Repeated email found"
        );
        assert_eq!(
            SchedulingError::InvalidEmailFormat.to_string(),
            "Invalid email in participant list"
        );
        assert_eq!(SchedulingError::InvalidRsvp.to_string(), "Invalid RSVP");
        assert_eq!(
            SchedulingError::SchedulingConflict("p1@gmail.com".to_string()).to_string(),
            "Overlapping meeting for email p1@gmail.com"
        );
    }

    #[test]
    fn only_transport_store_failures_are_retryable() {
        let transport = SchedulingError::StoreUnavailable(StoreError::Db(DbError::Sqlite(
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                None,
            ),
        )));
        assert!(transport.is_retryable());
        assert!(!transport.is_validation());

        let corrupt = SchedulingError::StoreUnavailable(StoreError::InvalidData("x".into()));
        assert!(!corrupt.is_retryable());
        let unmigrated = SchedulingError::StoreUnavailable(StoreError::UninitializedConnection {
            expected_version: 1,
            actual_version: 0,
        });
        assert!(!unmigrated.is_retryable());

        assert!(!SchedulingError::InvalidRsvp.is_retryable());
        assert!(SchedulingError::InvalidRsvp.is_validation());
        assert!(!SchedulingError::NotFound.is_validation());
    }
}
