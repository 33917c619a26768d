use attendance_core::{format_display_date, parse_day_key, DayKey};

#[test]
fn brazilian_and_iso_forms_share_a_day_key() {
    let expected = DayKey::new(5, 3, 2024);
    assert_eq!(parse_day_key("05/03/2024 10:00"), Some(expected));
    assert_eq!(parse_day_key("2024-03-05"), Some(expected));
    assert_eq!(parse_day_key("2024-03-05 14:30"), Some(expected));
    assert_eq!(parse_day_key("5/3/2024"), Some(expected));
}

#[test]
fn invalid_calendar_dates_are_unparseable() {
    assert_eq!(parse_day_key("31/02/2024"), None);
    assert_eq!(parse_day_key("2024-13-01"), None);
    assert_eq!(parse_day_key("aa/bb/cccc"), None);
    assert_eq!(parse_day_key("03/2024"), None);
    assert_eq!(parse_day_key("ontem"), None);
    assert_eq!(parse_day_key(""), None);
}

#[test]
fn offset_timestamps_are_anchored_to_utc() {
    assert_eq!(
        parse_day_key("2024-03-05T23:30:00-03:00"),
        Some(DayKey::new(6, 3, 2024))
    );
    assert_eq!(
        parse_day_key("2024-03-05T10:00:00Z"),
        Some(DayKey::new(5, 3, 2024))
    );
}

#[test]
fn generic_fallback_formats() {
    assert_eq!(parse_day_key("05.03.2024"), Some(DayKey::new(5, 3, 2024)));
    assert_eq!(parse_day_key("March 5, 2024"), Some(DayKey::new(5, 3, 2024)));
}

#[test]
fn day_keys_sort_chronologically() {
    let mut days = vec![
        DayKey::new(1, 1, 2024),
        DayKey::new(31, 12, 2023),
        DayKey::new(2, 3, 2024),
        DayKey::new(15, 1, 2024),
    ];
    days.sort();

    let labels: Vec<String> = days.iter().map(ToString::to_string).collect();
    assert_eq!(
        labels,
        vec!["31/12/2023", "01/01/2024", "15/01/2024", "02/03/2024"]
    );
}

#[test]
fn display_date_formatting() {
    assert_eq!(format_display_date("2024-03-05"), "05/03/2024");
    assert_eq!(format_display_date("5/3/2024 08:00"), "05/03/2024");
    assert_eq!(format_display_date(""), "N/A");
    assert_eq!(format_display_date("sem data"), "sem data");
}

#[test]
fn short_years_are_unparseable() {
    assert_eq!(parse_day_key("05/03/24"), None);
    assert_eq!(parse_day_key("05/03/124 10:00"), None);
    assert_eq!(format_display_date("05/03/24"), "05/03/24");
}
