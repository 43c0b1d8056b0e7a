use chrono::{NaiveDate, NaiveTime};
use mediqueue_core::{
    errors::MediError,
    time_label::{TimeFormat, date_key, parse_date_key, parse_time_label},
};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

#[rstest]
#[case(t(9, 0), "9:00 AM", "09:00")]
#[case(t(12, 0), "12:00 PM", "12:00")]
#[case(t(0, 30), "12:30 AM", "00:30")]
#[case(t(14, 30), "2:30 PM", "14:30")]
#[case(t(20, 30), "8:30 PM", "20:30")]
fn test_format_labels(#[case] time: NaiveTime, #[case] twelve: &str, #[case] twenty_four: &str) {
    assert_eq!(TimeFormat::TwelveHour.format(time), twelve);
    assert_eq!(TimeFormat::TwentyFourHour.format(time), twenty_four);
}

#[rstest]
#[case("14:30", t(14, 30))]
#[case("09:00", t(9, 0))]
#[case("9:00", t(9, 0))]
#[case("14:30:00", t(14, 30))]
#[case("2:30 PM", t(14, 30))]
#[case("2:30 pm", t(14, 30))]
#[case("02:30PM", t(14, 30))]
#[case("12:00 AM", t(0, 0))]
#[case(" 10:30 AM ", t(10, 30))]
fn test_parse_time_label(#[case] label: &str, #[case] expected: NaiveTime) {
    assert_eq!(parse_time_label(label).unwrap(), expected);
}

#[rstest]
#[case("")]
#[case("noon")]
#[case("25:00")]
#[case("13:00 PM")]
fn test_parse_time_label_rejects_garbage(#[case] label: &str) {
    assert!(matches!(parse_time_label(label), Err(MediError::Validation(_))));
}

#[test]
fn test_date_keys_are_zero_padded_iso() {
    let first = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
    let second = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();

    assert_eq!(date_key(first), "2024-12-01");
    assert_eq!(date_key(second), "2024-01-12");
    assert_ne!(date_key(first), date_key(second));
    assert_eq!(parse_date_key("2024-12-01").unwrap(), first);
}

#[test]
fn test_parse_date_key_rejects_unseparated_keys() {
    assert!(parse_date_key("1_12_2024").is_err());
    assert!(parse_date_key("2024-13-01").is_err());
}

#[test]
fn test_time_format_names() {
    assert_eq!("12h".parse::<TimeFormat>().unwrap(), TimeFormat::TwelveHour);
    assert_eq!("24H".parse::<TimeFormat>().unwrap(), TimeFormat::TwentyFourHour);
    assert!("ampm".parse::<TimeFormat>().is_err());

    assert_eq!(TimeFormat::default(), TimeFormat::TwelveHour);
    assert_eq!(TimeFormat::TwentyFourHour.to_string(), "24h");
    assert_eq!(serde_json::to_string(&TimeFormat::TwelveHour).unwrap(), "\"12h\"");
    assert_eq!(
        serde_json::from_str::<TimeFormat>("\"24h\"").unwrap(),
        TimeFormat::TwentyFourHour
    );
}
