//! Meeting store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist validated meetings as one atomic unit (meeting row plus
//!   participant rows).
//! - Answer the read queries used by conflict detection and listing.
//!
//! # Invariants
//! - `insert` never leaves a partially written meeting behind.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Timestamps are stored as Unix epoch milliseconds.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::meeting::{Meeting, MeetingId, Participant, Rsvp, TimeRange};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEETING_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    start_time,
    end_time,
    created_at
FROM meetings";

const MEETING_ORDER_SQL: &str = "ORDER BY start_time ASC, uuid ASC";

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for meeting persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl StoreError {
    /// Whether a lock wait exceeded the configured busy timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_timeout())
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted meeting data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) | Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence collaborator for meetings.
pub trait MeetingStore {
    /// Intervals of persisted meetings where `(email, name)` answered `Yes`.
    fn find_overlap_candidates(&self, email: &str, name: &str) -> StoreResult<Vec<TimeRange>>;
    /// Persists a validated meeting and returns its newly assigned id.
    fn insert(&self, meeting: &Meeting) -> StoreResult<MeetingId>;
    /// Meetings with `start_time >= start` and `end_time <= end`.
    fn find_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> StoreResult<Vec<Meeting>>;
    /// Meetings listing a participant with this email, whatever the RSVP.
    fn find_by_participant(&self, email: &str) -> StoreResult<Vec<Meeting>>;
    fn get(&self, id: MeetingId) -> StoreResult<Option<Meeting>>;
}

impl<S: MeetingStore + ?Sized> MeetingStore for &S {
    fn find_overlap_candidates(&self, email: &str, name: &str) -> StoreResult<Vec<TimeRange>> {
        (**self).find_overlap_candidates(email, name)
    }

    fn insert(&self, meeting: &Meeting) -> StoreResult<MeetingId> {
        (**self).insert(meeting)
    }

    fn find_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> StoreResult<Vec<Meeting>> {
        (**self).find_range(start, end)
    }

    fn find_by_participant(&self, email: &str) -> StoreResult<Vec<Meeting>> {
        (**self).find_by_participant(email)
    }

    fn get(&self, id: MeetingId) -> StoreResult<Option<Meeting>> {
        (**self).get(id)
    }
}

/// SQLite-backed meeting store.
pub struct SqliteMeetingStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMeetingStore<'conn> {
    /// Wraps a connection produced by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }

    fn load_meetings(
        &self,
        sql: &str,
        bind: &[&dyn rusqlite::ToSql],
    ) -> StoreResult<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut meetings = Vec::new();
        while let Some(row) = rows.next()? {
            meetings.push(parse_meeting_row(row)?);
        }

        for meeting in &mut meetings {
            if let Some(id) = meeting.id {
                meeting.participants = self.load_participants(id)?;
            }
        }
        Ok(meetings)
    }

    fn load_participants(&self, id: MeetingId) -> StoreResult<Vec<Participant>> {
        let mut stmt = self.conn.prepare(
            "SELECT email, name, rsvp
             FROM meeting_participants
             WHERE meeting_uuid = ?1
             ORDER BY position ASC;",
        )?;
        let mut rows = stmt.query([id.to_string()])?;
        let mut participants = Vec::new();
        while let Some(row) = rows.next()? {
            let rsvp_text: String = row.get("rsvp")?;
            let rsvp = parse_rsvp(&rsvp_text).ok_or_else(|| {
                StoreError::InvalidData(format!(
                    "invalid rsvp `{rsvp_text}` in meeting_participants.rsvp"
                ))
            })?;
            participants.push(Participant {
                email: row.get("email")?,
                name: row.get("name")?,
                rsvp,
            });
        }
        Ok(participants)
    }
}

impl MeetingStore for SqliteMeetingStore<'_> {
    fn find_overlap_candidates(&self, email: &str, name: &str) -> StoreResult<Vec<TimeRange>> {
        let mut stmt = self.conn.prepare(
            "SELECT m.start_time, m.end_time
             FROM meetings m
             JOIN meeting_participants p ON p.meeting_uuid = m.uuid
             WHERE p.email = ?1
               AND p.name = ?2
               AND p.rsvp = ?3
             ORDER BY m.start_time ASC;",
        )?;
        let mut rows = stmt.query(params![email, name, rsvp_to_db(Rsvp::Yes)])?;
        let mut ranges = Vec::new();
        while let Some(row) = rows.next()? {
            ranges.push(TimeRange::new(
                millis_to_datetime(row.get(0)?, "meetings.start_time")?,
                millis_to_datetime(row.get(1)?, "meetings.end_time")?,
            ));
        }
        Ok(ranges)
    }

    fn insert(&self, meeting: &Meeting) -> StoreResult<MeetingId> {
        let id = Uuid::new_v4();
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            "INSERT INTO meetings (
                uuid,
                title,
                start_time,
                end_time,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                id.to_string(),
                meeting.title.as_str(),
                meeting.start_time.timestamp_millis(),
                meeting.end_time.timestamp_millis(),
                meeting.created_at.timestamp_millis(),
            ],
        )?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO meeting_participants (
                    meeting_uuid,
                    position,
                    email,
                    name,
                    rsvp
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
            )?;
            for (position, participant) in meeting.participants.iter().enumerate() {
                let position = i64::try_from(position).map_err(|_| {
                    StoreError::InvalidData(format!("participant position {position} overflows"))
                })?;
                stmt.execute(params![
                    id.to_string(),
                    position,
                    participant.email.as_str(),
                    participant.name.as_str(),
                    rsvp_to_db(participant.rsvp),
                ])?;
            }
        }

        tx.commit()?;
        Ok(id)
    }

    fn find_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> StoreResult<Vec<Meeting>> {
        self.load_meetings(
            &format!(
                "{MEETING_SELECT_SQL}
                 WHERE start_time >= ?1
                   AND end_time <= ?2
                 {MEETING_ORDER_SQL};"
            ),
            params![start.timestamp_millis(), end.timestamp_millis()],
        )
    }

    fn find_by_participant(&self, email: &str) -> StoreResult<Vec<Meeting>> {
        self.load_meetings(
            &format!(
                "{MEETING_SELECT_SQL}
                 WHERE uuid IN (
                    SELECT meeting_uuid FROM meeting_participants WHERE email = ?1
                 )
                 {MEETING_ORDER_SQL};"
            ),
            params![email],
        )
    }

    fn get(&self, id: MeetingId) -> StoreResult<Option<Meeting>> {
        let mut meetings = self.load_meetings(
            &format!("{MEETING_SELECT_SQL} WHERE uuid = ?1;"),
            params![id.to_string()],
        )?;
        Ok(meetings.pop())
    }
}

fn parse_meeting_row(row: &Row<'_>) -> StoreResult<Meeting> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{uuid_text}` in meetings.uuid"))
    })?;

    let meeting = Meeting {
        id: Some(id),
        title: row.get("title")?,
        start_time: millis_to_datetime(row.get("start_time")?, "meetings.start_time")?,
        end_time: millis_to_datetime(row.get("end_time")?, "meetings.end_time")?,
        created_at: millis_to_datetime(row.get("created_at")?, "meetings.created_at")?,
        participants: Vec::new(),
    };

    if !meeting.time_range().is_well_ordered() {
        return Err(StoreError::InvalidData(format!(
            "meeting {id} has start_time not before end_time"
        )));
    }
    Ok(meeting)
}

fn millis_to_datetime(value: i64, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        StoreError::InvalidData(format!("timestamp `{value}` out of range in {column}"))
    })
}

fn rsvp_to_db(rsvp: Rsvp) -> &'static str {
    match rsvp {
        Rsvp::Yes => "yes",
        Rsvp::No => "no",
        Rsvp::Maybe => "maybe",
        Rsvp::NotAnswered => "not_answered",
    }
}

fn parse_rsvp(value: &str) -> Option<Rsvp> {
    match value {
        "yes" => Some(Rsvp::Yes),
        "no" => Some(Rsvp::No),
        "maybe" => Some(Rsvp::Maybe),
        "not_answered" => Some(Rsvp::NotAnswered),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_rsvp, rsvp_to_db};
    use crate::model::meeting::Rsvp;

    #[test]
    fn rsvp_db_mapping_is_stable() {
        for rsvp in [Rsvp::Yes, Rsvp::No, Rsvp::Maybe, Rsvp::NotAnswered] {
            assert_eq!(parse_rsvp(rsvp_to_db(rsvp)), Some(rsvp));
        }
        assert_eq!(parse_rsvp("Yes"), None);
    }
}
