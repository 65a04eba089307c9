//! Parser contract tests — extraction rules, resilience, and UID de-duplication.

use chrono::{TimeZone, Utc};
use ics_codec::{parse, serialize, Alert, CalendarEvent, CustomRecurrence, Recurrence};

/// Wrap VEVENT bodies in a VCALENDAR with CRLF line endings.
fn calendar(events: &[&str]) -> String {
    let mut out = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//Test//EN\r\n");
    for body in events {
        out.push_str("BEGIN:VEVENT\r\n");
        for line in body.lines() {
            out.push_str(line.trim());
            out.push_str("\r\n");
        }
        out.push_str("END:VEVENT\r\n");
    }
    out.push_str("END:VCALENDAR\r\n");
    out
}

// ============================================================================
// Basic extraction
// ============================================================================

#[test]
fn parses_minimal_event() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z
        DTEND:20240101T110000Z"]);
    let events = parse(&ics);

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.id(), "1");
    assert_eq!(event.title, "X");
    assert_eq!(event.start, Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap());
    assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap());
    assert!(!event.is_all_day);
    assert_eq!(event.alert, Alert::None);
    assert_eq!(event.recurrence, Recurrence::None);
}

#[test]
fn parses_all_day_event() {
    let ics = calendar(&["UID:holiday
        SUMMARY:Holiday
        DTSTART;VALUE=DATE:20261225
        DTEND;VALUE=DATE:20261226"]);
    let events = parse(&ics);

    assert_eq!(events.len(), 1);
    assert!(events[0].is_all_day);
    assert_eq!(events[0].start, Utc.with_ymd_and_hms(2026, 12, 25, 0, 0, 0).unwrap());
    assert_eq!(events[0].end, Utc.with_ymd_and_hms(2026, 12, 26, 0, 0, 0).unwrap());
}

#[test]
fn unescapes_text_properties() {
    let ics = calendar(&["UID:1
        SUMMARY:Review\\; part 1\\, draft
        LOCATION:Room 4\\\\B
        DESCRIPTION:line one\\nline two\\Nline three
        URL:https://example.com
        DTSTART:20240101T100000Z
        DTEND:20240101T110000Z"]);
    let event = &parse(&ics)[0];

    assert_eq!(event.title, "Review; part 1, draft");
    assert_eq!(event.location.as_deref(), Some("Room 4\\B"));
    assert_eq!(event.notes.as_deref(), Some("line one\nline two\nline three"));
    assert_eq!(event.url.as_deref(), Some("https://example.com"));
}

#[test]
fn accepts_lf_and_cr_line_endings() {
    let crlf = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z
        DTEND:20240101T110000Z"]);
    assert_eq!(parse(&crlf.replace("\r\n", "\n")).len(), 1);
    assert_eq!(parse(&crlf.replace("\r\n", "\r")).len(), 1);
}

#[test]
fn unfolds_folded_lines() {
    let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:1\r\nSUMMARY:A very long\r\n  title\r\n\
               DTSTART:20240101T100000Z\r\nDTEND:20240101T110000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
    assert_eq!(parse(ics)[0].title, "A very long title");
}

#[test]
fn tolerates_parameters_and_lowercase_names() {
    let ics = calendar(&["uid:1
        SUMMARY;LANGUAGE=en-US:Meeting
        LOCATION;ALTREP=\"http://example.com/room:4\":Room 4
        DTSTART:20240101T100000Z
        DTEND:20240101T110000Z"]);
    let event = &parse(&ics)[0];
    assert_eq!(event.id(), "1");
    assert_eq!(event.title, "Meeting");
    assert_eq!(event.location.as_deref(), Some("Room 4"));
}

#[test]
fn value_may_contain_colons() {
    let ics = calendar(&["UID:1
        SUMMARY:Call: budget
        URL:https://example.com:8443/x
        DTSTART:20240101T100000Z
        DTEND:20240101T110000Z"]);
    let event = &parse(&ics)[0];
    assert_eq!(event.title, "Call: budget");
    assert_eq!(event.url.as_deref(), Some("https://example.com:8443/x"));
}

// ============================================================================
// End derivation
// ============================================================================

#[test]
fn end_derived_from_duration() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z
        DURATION:PT1H30M"]);
    let event = &parse(&ics)[0];
    assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 1, 1, 11, 30, 0).unwrap());
}

#[test]
fn missing_end_defaults_to_start_for_timed_events() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z"]);
    let event = &parse(&ics)[0];
    assert_eq!(event.end, event.start);
}

#[test]
fn missing_end_defaults_to_next_day_for_all_day_events() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART;VALUE=DATE:20240101"]);
    let event = &parse(&ics)[0];
    assert_eq!(event.end, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
}

// ============================================================================
// Resilience
// ============================================================================

#[test]
fn block_missing_summary_is_dropped_but_next_block_survives() {
    let ics = calendar(&[
        "UID:no-summary
         DTSTART:20240101T100000Z
         DTEND:20240101T110000Z",
        "UID:ok
         SUMMARY:Kept
         DTSTART:20240102T100000Z
         DTEND:20240102T110000Z",
    ]);
    let events = parse(&ics);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id(), "ok");
}

#[test]
fn block_with_unparseable_date_is_dropped() {
    let ics = calendar(&[
        "UID:bad
         SUMMARY:Bad
         DTSTART:2024-01-01T10:00:00Z",
        "UID:floating
         SUMMARY:Floating
         DTSTART:20240101T100000",
        "UID:good
         SUMMARY:Good
         DTSTART:20240101T100000Z",
    ]);
    let events = parse(&ics);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id(), "good");
}

#[test]
fn block_missing_dtstart_is_dropped() {
    let ics = calendar(&["UID:1
        SUMMARY:X"]);
    assert!(parse(&ics).is_empty());
}

#[test]
fn block_ending_before_it_starts_is_dropped() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z
        DTEND:20240101T090000Z"]);
    assert!(parse(&ics).is_empty());
}

#[test]
fn block_with_mixed_value_types_is_dropped() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART;VALUE=DATE:20240101
        DTEND:20240101T090000Z"]);
    assert!(parse(&ics).is_empty());
}

#[test]
fn blank_summary_counts_as_missing() {
    let ics = calendar(&["UID:1
        SUMMARY:
        DTSTART:20240101T100000Z"]);
    assert!(parse(&ics).is_empty());
}

#[test]
fn blank_optional_text_is_kept() {
    let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:1\r\nSUMMARY:X\r\n\
               DTSTART:20240101T100000Z\r\nLOCATION:\r\nDESCRIPTION:  \r\nURL: \r\n\
               END:VEVENT\r\nEND:VCALENDAR\r\n";
    let events = parse(ics);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].location.as_deref(), Some(""));
    assert_eq!(events[0].notes.as_deref(), Some("  "));
    assert_eq!(events[0].url.as_deref(), Some(" "));
}

#[test]
fn blank_optional_text_roundtrips() {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    let event = CalendarEvent::new("X", start, start)
        .with_location("")
        .with_notes("  ")
        .with_url(" ");
    let back = parse(&serialize(&[event.clone()]));
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].location, event.location);
    assert_eq!(back[0].notes, event.notes);
    assert_eq!(back[0].url, event.url);
}

#[test]
fn garbage_input_yields_no_events() {
    assert!(parse("").is_empty());
    assert!(parse("not a calendar at all").is_empty());
    assert!(parse("END:VEVENT\r\nEND:VCALENDAR\r\n").is_empty());
}

#[test]
fn properties_outside_vevent_are_ignored() {
    let ics = "BEGIN:VCALENDAR\r\nSUMMARY:Calendar level\r\nDTSTART:20240101T100000Z\r\nEND:VCALENDAR\r\n";
    assert!(parse(ics).is_empty());
}

// ============================================================================
// UID handling
// ============================================================================

#[test]
fn duplicate_uid_keeps_first_event() {
    let ics = calendar(&[
        "UID:same
         SUMMARY:First
         DTSTART:20240101T100000Z",
        "UID:same
         SUMMARY:Second
         DTSTART:20240102T100000Z",
    ]);
    let events = parse(&ics);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "First");
}

#[test]
fn dropped_block_does_not_claim_its_uid() {
    let ics = calendar(&[
        "UID:same
         DTSTART:20240101T100000Z",
        "UID:same
         SUMMARY:Second
         DTSTART:20240102T100000Z",
    ]);
    let events = parse(&ics);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Second");
}

#[test]
fn events_without_uid_are_always_kept() {
    let ics = calendar(&[
        "SUMMARY:A
         DTSTART:20240101T100000Z",
        "SUMMARY:A
         DTSTART:20240101T100000Z",
    ]);
    let events = parse(&ics);
    assert_eq!(events.len(), 2);
    assert_ne!(events[0].id(), events[1].id());
}

// ============================================================================
// Alarms and recurrence
// ============================================================================

#[test]
fn alarm_trigger_becomes_alert() {
    let ics = calendar(&["UID:1
        SUMMARY:Dentist
        DESCRIPTION:Bring forms
        DTSTART:20240101T100000Z
        BEGIN:VALARM
        ACTION:DISPLAY
        DESCRIPTION:Reminder
        TRIGGER:-PT30M
        END:VALARM"]);
    let event = &parse(&ics)[0];
    assert_eq!(event.alert, Alert::ThirtyMinutes);
    // The alarm's DESCRIPTION must not replace the event's.
    assert_eq!(event.notes.as_deref(), Some("Bring forms"));
}

#[test]
fn alarm_properties_do_not_satisfy_event_requirements() {
    let ics = calendar(&["UID:1
        DTSTART:20240101T100000Z
        BEGIN:VALARM
        ACTION:DISPLAY
        SUMMARY:Only in the alarm
        TRIGGER:-PT5M
        END:VALARM"]);
    assert!(parse(&ics).is_empty());
}

#[test]
fn first_alarm_wins() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z
        BEGIN:VALARM
        ACTION:DISPLAY
        TRIGGER:-PT1H
        END:VALARM
        BEGIN:VALARM
        ACTION:DISPLAY
        TRIGGER:-P1D
        END:VALARM"]);
    assert_eq!(parse(&ics)[0].alert, Alert::OneHour);
}

#[test]
fn unknown_trigger_maps_to_no_alert() {
    let ics = calendar(&["UID:1
        SUMMARY:X
        DTSTART:20240101T100000Z
        BEGIN:VALARM
        ACTION:DISPLAY
        TRIGGER;VALUE=DATE-TIME:20231231T090000Z
        END:VALARM"]);
    assert_eq!(parse(&ics)[0].alert, Alert::None);
}

#[test]
fn rrule_is_classified() {
    let ics = calendar(&[
        "UID:1
         SUMMARY:Weekly
         DTSTART:20240101T100000Z
         RRULE:FREQ=WEEKLY;BYDAY=MO,WE",
        "UID:2
         SUMMARY:Odd
         DTSTART:20240101T100000Z
         RRULE:FREQ=HOURLY;BYMONTHDAY=1",
    ]);
    let events = parse(&ics);
    assert_eq!(events[0].recurrence, Recurrence::Weekly);
    assert_eq!(
        events[1].recurrence,
        Recurrence::Custom(CustomRecurrence::default())
    );
}

#[test_log::test]
fn other_components_are_skipped() {
    let ics = "BEGIN:VCALENDAR\r\nBEGIN:VTODO\r\nSUMMARY:Todo\r\nDTSTART:20240101T100000Z\r\nEND:VTODO\r\n\
               BEGIN:VTIMEZONE\r\nTZID:Europe/Berlin\r\nEND:VTIMEZONE\r\n\
               BEGIN:VEVENT\r\nUID:1\r\nSUMMARY:Event\r\nDTSTART:20240101T100000Z\r\nEND:VEVENT\r\n\
               END:VCALENDAR\r\n";
    let events = parse(ics);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Event");
}
