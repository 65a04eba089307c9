//! Tests for RRULE encoding and the intentionally lossy RRULE classification.

use chrono::{TimeZone, Utc};
use ics_codec::{
    from_rrule_string, to_rrule_string, CustomRecurrence, Frequency, Recurrence, Weekday,
};

// ============================================================================
// Encoding
// ============================================================================

#[test]
fn no_recurrence_has_no_rule() {
    assert_eq!(to_rrule_string(&Recurrence::None), None);
}

#[test]
fn simple_rules_emit_only_freq() {
    assert_eq!(to_rrule_string(&Recurrence::Daily).as_deref(), Some("FREQ=DAILY"));
    assert_eq!(to_rrule_string(&Recurrence::Weekly).as_deref(), Some("FREQ=WEEKLY"));
    assert_eq!(to_rrule_string(&Recurrence::Monthly).as_deref(), Some("FREQ=MONTHLY"));
    assert_eq!(to_rrule_string(&Recurrence::Yearly).as_deref(), Some("FREQ=YEARLY"));
}

#[test]
fn custom_weekly_every_two_weeks_on_monday_and_wednesday() {
    let rule = Recurrence::Custom(
        CustomRecurrence::new(Frequency::Weekly)
            .every(2)
            .on([Weekday::Monday, Weekday::Wednesday]),
    );
    assert_eq!(
        to_rrule_string(&rule).as_deref(),
        Some("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE")
    );
}

#[test]
fn interval_of_one_is_omitted() {
    let rule = Recurrence::Custom(CustomRecurrence::new(Frequency::Daily).every(1));
    assert_eq!(to_rrule_string(&rule).as_deref(), Some("FREQ=DAILY"));
}

#[test]
fn custom_parts_follow_fixed_order() {
    let until = Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap();
    let rule = Recurrence::Custom(
        CustomRecurrence::new(Frequency::Monthly)
            .every(3)
            .count(10)
            .until(until)
            .on([Weekday::Friday]),
    );
    assert_eq!(
        to_rrule_string(&rule).as_deref(),
        Some("FREQ=MONTHLY;INTERVAL=3;COUNT=10;UNTIL=20260630T235959Z;BYDAY=FR")
    );
}

#[test]
fn byday_codes_are_sorted_lexicographically() {
    let rule = Recurrence::Custom(CustomRecurrence::new(Frequency::Weekly).on([
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Friday,
        Weekday::Saturday,
    ]));
    assert_eq!(
        to_rrule_string(&rule).as_deref(),
        Some("FREQ=WEEKLY;BYDAY=FR,MO,SA,SU,TU")
    );
}

#[test]
fn weekday_codes_round_trip() {
    for day in [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ] {
        assert_eq!(Weekday::from_code(day.code()), Some(day));
    }
    assert_eq!(Weekday::from_code("XX"), None);
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn classify_simple_frequencies() {
    assert_eq!(from_rrule_string("FREQ=DAILY"), Recurrence::Daily);
    assert_eq!(from_rrule_string("FREQ=WEEKLY;COUNT=4"), Recurrence::Weekly);
    assert_eq!(from_rrule_string("INTERVAL=2;FREQ=MONTHLY"), Recurrence::Monthly);
    assert_eq!(from_rrule_string("freq=yearly"), Recurrence::Yearly);
}

#[test]
fn classification_drops_custom_parameters() {
    // Interval and weekdays are not recovered.
    assert_eq!(
        from_rrule_string("FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE"),
        Recurrence::Weekly
    );
}

#[test]
fn unknown_frequency_with_by_rule_is_custom() {
    assert_eq!(
        from_rrule_string("FREQ=HOURLY;BYDAY=MO"),
        Recurrence::Custom(CustomRecurrence::default())
    );
    assert_eq!(
        from_rrule_string("BYMONTHDAY=15"),
        Recurrence::Custom(CustomRecurrence::default())
    );
}

#[test]
fn anything_else_is_none() {
    assert_eq!(from_rrule_string("FREQ=HOURLY"), Recurrence::None);
    assert_eq!(from_rrule_string(""), Recurrence::None);
    assert_eq!(from_rrule_string("nonsense"), Recurrence::None);
}

#[test]
fn rrule_prefix_is_tolerated() {
    assert_eq!(from_rrule_string("RRULE:FREQ=DAILY"), Recurrence::Daily);
}
