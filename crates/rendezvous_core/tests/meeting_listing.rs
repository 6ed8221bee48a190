use chrono::{DateTime, TimeZone, Utc};
use rendezvous_core::db::open_db_in_memory;
use rendezvous_core::{
    parse_meeting_id, MeetingCandidate, MeetingService, PageRequest, ParticipantInput,
    SchedulingError, SqliteMeetingStore,
};
use std::num::NonZeroU32;

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 10, 19, hour, 0, 0).unwrap()
}

fn page(number: u32) -> PageRequest {
    PageRequest::Page(NonZeroU32::new(number).unwrap())
}

fn seed(service: &MeetingService<SqliteMeetingStore<'_>>) {
    for (title, start) in [("first", 9), ("second", 11), ("third", 13)] {
        service
            .create_meeting(
                &MeetingCandidate::new(title, at(start), at(start + 1)).with_participant(
                    ParticipantInput::new("p1@gmail.com", "p1", "Yes"),
                ),
            )
            .unwrap();
    }
}

fn titles(meetings: Vec<rendezvous_core::Meeting>) -> Vec<String> {
    meetings.into_iter().map(|meeting| meeting.title).collect()
}

#[test]
fn range_listing_pages_by_configured_size() {
    let conn = open_db_in_memory().unwrap();
    let service = MeetingService::new(
        SqliteMeetingStore::try_new(&conn).unwrap(),
        NonZeroU32::new(2).unwrap(),
    );
    seed(&service);

    let list = |request| titles(service.list_meetings_in_range(at(0), at(23), request).unwrap());
    assert_eq!(list(page(1)), vec!["first", "second"]);
    assert_eq!(list(page(2)), vec!["third"]);
    assert!(list(page(3)).is_empty());
    assert_eq!(list(PageRequest::All), vec!["first", "second", "third"]);
}

#[test]
fn participant_listing_pages_by_configured_size() {
    let conn = open_db_in_memory().unwrap();
    let service = MeetingService::new(
        SqliteMeetingStore::try_new(&conn).unwrap(),
        NonZeroU32::new(2).unwrap(),
    );
    seed(&service);

    let list = |request| {
        titles(
            service
                .list_meetings_for_participant("p1@gmail.com", request)
                .unwrap(),
        )
    };
    assert_eq!(list(page(2)), vec!["third"]);
    assert_eq!(list(PageRequest::All).len(), 3);
    assert!(service
        .list_meetings_for_participant("p9@gmail.com", PageRequest::All)
        .unwrap()
        .is_empty());
}

#[test]
fn page_parameter_precondition_is_enforced_before_listing() {
    assert_eq!(PageRequest::parse(None).unwrap(), PageRequest::All);
    assert_eq!(PageRequest::parse(Some("3")).unwrap(), page(3));

    let err = PageRequest::parse(Some("abc")).unwrap_err();
    assert!(matches!(err, SchedulingError::InvalidPage(_)));
    assert_eq!(err.to_string(), "Invalid page value");
}

#[test]
fn lookup_of_missing_meeting_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = MeetingService::new(
        SqliteMeetingStore::try_new(&conn).unwrap(),
        NonZeroU32::new(2).unwrap(),
    );

    let id = parse_meeting_id("5f8d0d55-b54a-4c2f-9e43-8d2b1f0c6a11").unwrap();
    let err = service.get_meeting(id).unwrap_err();
    assert!(matches!(err, SchedulingError::NotFound));
    assert_eq!(err.to_string(), "Meeting not found");
}
