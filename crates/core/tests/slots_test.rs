use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, Weekday};
use mediqueue_core::{
    errors::{MediError, MediResult},
    slots::{BookedSlotIndex, BookedSlots, DayBucket, SlotGenerator, SlotWindow},
};
use mockall::mock;
use pretty_assertions::assert_eq;
use rstest::rstest;

mock! {
    pub Lookup {}

    impl BookedSlots for Lookup {
        fn is_booked(&self, date: NaiveDate, time: NaiveTime) -> MediResult<bool>;
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn window(open: NaiveTime, close: NaiveTime, step: u32) -> SlotWindow {
    SlotWindow {
        opening_time: open,
        closing_time: close,
        step_minutes: step,
        working_days: Vec::new(),
    }
}

fn times_of(bucket: &DayBucket) -> Vec<NaiveTime> {
    bucket.slots.iter().map(|slot| slot.time).collect()
}

#[test]
fn test_window_starts_tomorrow_and_spans_lookahead() {
    let generator = SlotGenerator::default();
    let buckets = generator.generate(d(2024, 1, 1), &BookedSlotIndex::new());

    assert_eq!(buckets.len(), 7);
    assert_eq!(buckets.first().unwrap().date, d(2024, 1, 2));
    assert_eq!(buckets.last().unwrap().date, d(2024, 1, 8));
}

#[test]
fn test_booked_time_is_excluded_from_its_day() {
    let today = d(2024, 1, 1);
    let booked = BookedSlotIndex::from_pairs([(d(2024, 1, 2), t(10, 30))]);
    let generator = SlotGenerator::new(window(t(10, 0), t(11, 0), 30), 7);

    let buckets = generator.generate(today, &booked);

    assert_eq!(times_of(&buckets[0]), vec![t(10, 0)]);
    // Other days are unaffected
    assert_eq!(times_of(&buckets[1]), vec![t(10, 0), t(10, 30)]);
}

#[rstest]
#[case::opening_after_closing(window(t(9, 0), t(8, 0), 30))]
#[case::opening_equals_closing(window(t(9, 0), t(9, 0), 30))]
#[case::zero_step(window(t(9, 0), t(17, 0), 0))]
#[case::step_longer_than_window(window(t(9, 0), t(9, 20), 30))]
fn test_misconfigured_window_yields_empty_buckets(#[case] window: SlotWindow) {
    let generator = SlotGenerator::new(window, 7);
    let buckets = generator.generate(d(2024, 1, 1), &BookedSlotIndex::new());

    assert_eq!(buckets.len(), 7);
    assert!(buckets.iter().all(|bucket| bucket.slots.is_empty()));
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(14)]
fn test_bucket_count_matches_lookahead(#[case] lookahead: u32) {
    let fully_booked = |_: NaiveDate, _: NaiveTime| -> MediResult<bool> { Ok(true) };
    let generator = SlotGenerator::new(SlotWindow::default(), lookahead);

    let buckets = generator.generate(d(2024, 2, 27), &fully_booked);

    assert_eq!(buckets.len(), lookahead as usize);
    assert!(buckets.iter().all(|bucket| bucket.slots.is_empty()));
    // Consecutive days, crossing the leap day
    for pair in buckets.windows(2) {
        assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
    }
}

#[test]
fn test_default_window_runs_ten_to_nine_in_half_hours() {
    let buckets = SlotGenerator::default().generate(d(2024, 1, 1), &BookedSlotIndex::new());
    let times = times_of(&buckets[0]);

    assert_eq!(times.len(), 22);
    assert_eq!(times.first(), Some(&t(10, 0)));
    assert_eq!(times.last(), Some(&t(20, 30)));
}

#[rstest]
#[case(t(8, 0), t(12, 0), 15)]
#[case(t(10, 0), t(11, 0), 25)]
#[case(t(9, 30), t(17, 45), 45)]
#[case(t(0, 0), t(23, 59), 60)]
fn test_candidates_stay_inside_the_window(
    #[case] open: NaiveTime,
    #[case] close: NaiveTime,
    #[case] step: u32,
) {
    let generator = SlotGenerator::new(window(open, close, step), 3);

    for bucket in generator.generate(d(2024, 6, 10), &BookedSlotIndex::new()) {
        assert!(!bucket.slots.is_empty());
        for slot in &bucket.slots {
            assert!(slot.time >= open && slot.time < close);
            assert!(slot.time + chrono::Duration::minutes(step as i64) <= close);
            assert_eq!(slot.date, bucket.date);
            assert!(slot.available);
        }
        let times = times_of(&bucket);
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
    }
}

#[test]
fn test_uneven_step_stops_before_closing() {
    let generator = SlotGenerator::new(window(t(10, 0), t(11, 0), 25), 1);
    let buckets = generator.generate(d(2024, 1, 1), &BookedSlotIndex::new());

    assert_eq!(times_of(&buckets[0]), vec![t(10, 0), t(10, 25)]);
}

#[test]
fn test_booked_pairs_never_offered() {
    let today = d(2024, 3, 10);
    let booked = BookedSlotIndex::from_pairs([
        (d(2024, 3, 11), t(10, 0)),
        (d(2024, 3, 11), t(20, 30)),
        (d(2024, 3, 13), t(15, 0)),
        (d(2024, 3, 17), t(12, 30)),
        // Outside the window entirely
        (d(2024, 4, 1), t(10, 0)),
    ]);

    let buckets = SlotGenerator::default().generate(today, &booked);

    for bucket in &buckets {
        for slot in &bucket.slots {
            assert!(!booked.contains(slot.date, slot.time));
        }
    }
    assert_eq!(buckets[0].slots.len(), 20);
    assert_eq!(buckets[2].slots.len(), 21);
    assert_eq!(buckets[1].slots.len(), 22);
}

#[test]
fn test_generation_is_idempotent() {
    let today = d(2024, 1, 1);
    let booked = BookedSlotIndex::from_pairs([(d(2024, 1, 3), t(14, 0))]);
    let generator = SlotGenerator::default();

    assert_eq!(generator.generate(today, &booked), generator.generate(today, &booked));
}

#[test]
fn test_failed_lookup_excludes_only_that_slot() {
    let mut lookup = MockLookup::new();
    lookup.expect_is_booked().returning(|_, time| {
        if time == NaiveTime::from_hms_opt(10, 30, 0).unwrap() {
            Err(MediError::Internal("lookup unavailable".into()))
        } else {
            Ok(false)
        }
    });

    let generator = SlotGenerator::new(window(t(10, 0), t(11, 30), 30), 2);
    let buckets = generator.generate(d(2024, 1, 1), &lookup);

    for bucket in &buckets {
        assert_eq!(times_of(bucket), vec![t(10, 0), t(11, 0)]);
    }
}

#[test]
fn test_lookup_called_once_per_slot() {
    let mut lookup = MockLookup::new();
    lookup.expect_is_booked().times(3 * 2).returning(|_, _| Ok(false));

    let generator = SlotGenerator::new(window(t(10, 0), t(11, 0), 30), 3);
    let buckets = generator.generate(d(2024, 1, 1), &lookup);

    assert_eq!(buckets.len(), 3);
}

#[test]
fn test_non_working_days_are_empty_not_omitted() {
    // 2024-01-01 is a Monday, so the window covers Tue 2nd to Mon 8th
    let window = SlotWindow {
        working_days: vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ],
        ..SlotWindow::default()
    };
    let buckets = SlotGenerator::new(window, 7).generate(d(2024, 1, 1), &BookedSlotIndex::new());

    assert_eq!(buckets.len(), 7);
    for bucket in &buckets {
        let weekend = bucket.date == d(2024, 1, 6) || bucket.date == d(2024, 1, 7);
        assert_eq!(bucket.slots.is_empty(), weekend, "unexpected bucket for {}", bucket.date);
    }
}

#[test]
fn test_availability_grid_flags_booked_slots() {
    let booked = BookedSlotIndex::from_pairs([(d(2024, 1, 2), t(10, 30))]);
    let generator = SlotGenerator::new(window(t(10, 0), t(11, 0), 30), 2);

    let grid = generator.availability_grid(d(2024, 1, 1), &booked);

    assert_eq!(grid[0].slots.len(), 2);
    assert!(grid[0].slots[0].available);
    assert!(!grid[0].slots[1].available);
    assert!(grid[1].slots.iter().all(|slot| slot.available));
}

#[test]
fn test_window_dates_bound_the_generated_range() {
    let generator = SlotGenerator::default();
    let dates = generator.window_dates(d(2024, 12, 28));

    assert_eq!(dates.len(), 7);
    assert_eq!(dates[0], d(2024, 12, 29));
    assert_eq!(dates[6], d(2025, 1, 4));
}

#[test]
fn test_window_offers_only_aligned_working_slots() {
    let window = SlotWindow {
        working_days: vec![Weekday::Tue],
        ..SlotWindow::default()
    };

    // Tuesday
    assert!(window.offers(d(2024, 1, 2), t(10, 0)));
    assert!(window.offers(d(2024, 1, 2), t(20, 30)));
    assert!(!window.offers(d(2024, 1, 2), t(10, 15)));
    assert!(!window.offers(d(2024, 1, 2), t(21, 0)));
    assert!(!window.offers(d(2024, 1, 2), t(9, 30)));
    // Wednesday
    assert!(!window.offers(d(2024, 1, 3), t(10, 0)));
}

#[test]
fn test_index_from_labels_accepts_mixed_formats() {
    let mut labels = HashMap::new();
    labels.insert("2024-01-02", vec!["10:30 AM", "14:00", "2:30 PM", "later"]);
    labels.insert("1_2_2024", vec!["10:00"]);

    let index = BookedSlotIndex::from_labels(&labels);

    assert!(index.contains(d(2024, 1, 2), t(10, 30)));
    assert!(index.contains(d(2024, 1, 2), t(14, 0)));
    assert!(index.contains(d(2024, 1, 2), t(14, 30)));
    assert!(!index.contains(d(2024, 1, 2), t(10, 0)));
    assert!(!index.contains(d(2024, 2, 1), t(10, 0)));
}

#[test]
fn test_empty_index() {
    let index = BookedSlotIndex::new();
    assert!(index.is_empty());
    assert!(!index.is_booked(d(2024, 1, 2), t(10, 0)).unwrap());
}
