//! Property-based tests for the codec laws.
//!
//! - `parse(serialize([e]))` yields one event equal to `e` on title, start,
//!   end, all-day flag, location, notes, and url
//! - `unfold_lines(fold_line(s)) == s`
//! - `unescape_text(escape_text(s)) == s`
//! - every non-`None` alert survives `Alert::from_trigger(alert.trigger())`
//!
//! Generated text excludes CR: the serializer normalizes CR/CRLF inside text
//! values to a newline, so a lone CR does not survive the roundtrip.
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use ics_codec::text::{escape_text, fold_line, fold_line_with, unescape_text, unfold_lines};
use ics_codec::{parse, serialize, Alert, CalendarEvent, FoldMode};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Free text with the characters that need escaping, plus some non-ASCII.
fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,40}",
        prop::string::string_regex("[a-zA-Z0-9 ;,:\\\\\n\"'.-]{0,60}").unwrap(),
        Just("caf\u{00e9}, cr\u{00e8}me; br\u{00fb}l\u{00e9}e".to_string()),
        Just("\u{65e5}\u{672c}\u{8a9e}\u{306e}\u{30c6}\u{30ad}\u{30b9}\u{30c8}".repeat(8)),
        Just("ends with backslash \\".to_string()),
        Just("\\n is not a newline".to_string()),
    ]
}

/// Non-blank title (blank summaries are rejected by the parser).
fn arb_title() -> impl Strategy<Value = String> {
    arb_text().prop_filter("title must not be blank", |s| !s.trim().is_empty())
}

/// Optional free text, including empty and whitespace-only values.
fn arb_optional_text() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        arb_text(),
        Just(String::new()),
        " {1,8}",
    ])
}

/// A UTC instant between 2000 and 2037, whole seconds.
fn arb_instant() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800i64..2_114_380_800i64).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..13_000).prop_map(|days| {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Duration::days(days)
    })
}

fn arb_timed_event() -> impl Strategy<Value = CalendarEvent> {
    (arb_title(), arb_instant(), 0i64..100_000, arb_optional_text(), arb_optional_text(), arb_optional_text())
        .prop_map(|(title, start, minutes, location, notes, url)| {
            let mut event = CalendarEvent::new(title, start, start + Duration::minutes(minutes));
            event.location = location;
            event.notes = notes;
            event.url = url;
            event
        })
}

fn arb_all_day_event() -> impl Strategy<Value = CalendarEvent> {
    (arb_title(), arb_date(), 0i64..30, arb_optional_text())
        .prop_map(|(title, start, days, notes)| {
            let mut event = CalendarEvent::all_day(title, start, start + Duration::days(days));
            event.notes = notes;
            event
        })
}

fn arb_event() -> impl Strategy<Value = CalendarEvent> {
    prop_oneof![3 => arb_timed_event(), 1 => arb_all_day_event()]
}

fn arb_alert() -> impl Strategy<Value = Alert> {
    prop::sample::select(Alert::ALL.to_vec())
}

// ============================================================================
// Laws
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn serialize_then_parse_preserves_fields(event in arb_event(), alert in arb_alert()) {
        let event = event.with_alert(alert);
        let events = parse(&serialize(std::slice::from_ref(&event)));

        prop_assert_eq!(events.len(), 1);
        let back = &events[0];
        prop_assert_eq!(back.id(), event.id());
        prop_assert_eq!(&back.title, &event.title);
        prop_assert_eq!(back.start, event.start);
        prop_assert_eq!(back.end, event.end);
        prop_assert_eq!(back.is_all_day, event.is_all_day);
        prop_assert_eq!(&back.location, &event.location);
        prop_assert_eq!(&back.notes, &event.notes);
        prop_assert_eq!(&back.url, &event.url);
        prop_assert_eq!(back.alert, event.alert);
    }

    #[test]
    fn serialized_lines_never_exceed_75_octets(events in prop::collection::vec(arb_event(), 0..4)) {
        let ics = serialize(&events);
        for line in ics.split("\r\n") {
            prop_assert!(line.len() <= 75, "line too long: {:?}", line);
        }
    }

    #[test]
    fn unfold_reverses_fold(s in "[^\r\n]{0,300}") {
        prop_assert_eq!(unfold_lines(&fold_line(&s)), s.clone());
        prop_assert_eq!(unfold_lines(&fold_line_with(&s, FoldMode::Characters)), s);
    }

    #[test]
    fn unescape_reverses_escape(s in any::<String>()) {
        prop_assert_eq!(unescape_text(&escape_text(&s)), s);
    }

    #[test]
    fn escaped_text_has_no_raw_specials(s in arb_text()) {
        let escaped = escape_text(&s);
        prop_assert!(!escaped.contains('\n'));
        // Every ; and , is preceded by a backslash.
        let bytes = escaped.as_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if *b == b';' || *b == b',' {
                prop_assert!(i > 0 && bytes[i - 1] == b'\\');
            }
        }
    }

    #[test]
    fn alerts_round_trip_through_triggers(alert in arb_alert()) {
        if let Some(trigger) = alert.trigger() {
            prop_assert_eq!(Alert::from_trigger(trigger), alert);
        }
    }
}
