//! Meeting scheduling core.
//!
//! Validates proposed meetings, rejects double-bookings of accepting
//! participants, and persists accepted meetings through an injected store.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, LoggingConfig, SchedulerConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::meeting::{
    Meeting, MeetingCandidate, MeetingId, Participant, ParticipantInput, Rsvp, TimeRange,
};
pub use repo::meeting_repo::{MeetingStore, SqliteMeetingStore, StoreError, StoreResult};
pub use service::conflict::{classify_overlap, detect_conflict, has_conflict, OverlapShape};
pub use service::error::SchedulingError;
pub use service::meeting_service::{decode_candidate, parse_meeting_id, MeetingService};
pub use service::pagination::{paginate, PageRequest};
pub use service::validator::{is_valid_email, validate_candidate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
