//! # Slot Generation
//!
//! Produces the candidate appointment slots a patient can pick from when
//! booking or rescheduling.
//!
//! ## Algorithm
//!
//! For each day from tomorrow through `lookahead_days` days out:
//!
//! 1. Skip the day (empty bucket) if it is not one of the doctor's working days
//! 2. Step through the daily window from opening time, one slot duration at a
//!    time, keeping every start whose slot ends at or before closing time
//! 3. Drop any start that the booked-slots lookup reports as taken, or whose
//!    lookup fails
//!
//! Every day in the look-ahead window yields exactly one bucket, even when it
//! is empty, so callers can render "no availability" for that date. A
//! misconfigured window (opening at or after closing, zero step) produces
//! empty buckets rather than an error.
//!
//! The generator never reads the clock: callers pass `today` in, which keeps
//! the output a pure function of its inputs.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    errors::MediResult,
    time_label::{parse_date_key, parse_time_label},
};

/// Number of days ahead slots are offered for
pub const DEFAULT_LOOKAHEAD_DAYS: u32 = 7;

/// Default consultation length and step between slots
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// Slots start the day after "today".
const FIRST_DAY_OFFSET: u64 = 1;

/// A doctor's daily bookable window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub step_minutes: u32,
    /// Active weekdays; empty means every day.
    #[serde(default)]
    pub working_days: Vec<Weekday>,
}

impl Default for SlotWindow {
    fn default() -> Self {
        Self {
            opening_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            closing_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
            step_minutes: DEFAULT_SLOT_MINUTES,
            working_days: Vec::new(),
        }
    }
}

impl SlotWindow {
    pub fn is_valid(&self) -> bool {
        self.step_minutes > 0 && self.opening_time < self.closing_time
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_days.is_empty() || self.working_days.contains(&date.weekday())
    }

    /// Start times of every slot in one day of this window, ascending.
    pub fn times(&self) -> Vec<NaiveTime> {
        if !self.is_valid() {
            return Vec::new();
        }

        let step = Duration::minutes(i64::from(self.step_minutes));
        let mut times = Vec::new();
        let mut current = self.opening_time;

        loop {
            let (end, wrapped) = current.overflowing_add_signed(step);
            if wrapped != 0 || end > self.closing_time {
                break;
            }
            times.push(current);
            current = end;
        }

        times
    }

    /// Whether `(date, time)` is the start of a slot this window offers.
    pub fn offers(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.is_working_day(date) && self.times().contains(&time)
    }
}

/// Source of truth for which slots are already taken
pub trait BookedSlots {
    fn is_booked(&self, date: NaiveDate, time: NaiveTime) -> MediResult<bool>;
}

impl<F> BookedSlots for F
where
    F: Fn(NaiveDate, NaiveTime) -> MediResult<bool>,
{
    fn is_booked(&self, date: NaiveDate, time: NaiveTime) -> MediResult<bool> {
        self(date, time)
    }
}

/// Already-reserved times, grouped by day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookedSlotIndex {
    by_date: HashMap<NaiveDate, BTreeSet<NaiveTime>>,
}

impl BookedSlotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, NaiveTime)>,
    {
        let mut index = Self::new();
        for (date, time) in pairs {
            index.insert(date, time);
        }
        index
    }

    /// Builds the index from its wire shape: `YYYY-MM-DD` keys mapped to
    /// time labels in either 12-hour or 24-hour form. Entries that do not
    /// parse are skipped.
    pub fn from_labels<K, L>(labels: &HashMap<K, Vec<L>>) -> Self
    where
        K: AsRef<str>,
        L: AsRef<str>,
    {
        let mut index = Self::new();

        for (key, times) in labels {
            let date = match parse_date_key(key.as_ref()) {
                Ok(date) => date,
                Err(e) => {
                    warn!("Skipping booked slots for unparsable date: {}", e);
                    continue;
                }
            };

            for label in times {
                match parse_time_label(label.as_ref()) {
                    Ok(time) => index.insert(date, time),
                    Err(e) => warn!("Skipping booked slot on {}: {}", date, e),
                }
            }
        }

        index
    }

    pub fn insert(&mut self, date: NaiveDate, time: NaiveTime) {
        self.by_date.entry(date).or_default().insert(time);
    }

    pub fn contains(&self, date: NaiveDate, time: NaiveTime) -> bool {
        self.by_date
            .get(&date)
            .is_some_and(|times| times.contains(&time))
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.values().all(BTreeSet::is_empty)
    }
}

impl BookedSlots for BookedSlotIndex {
    fn is_booked(&self, date: NaiveDate, time: NaiveTime) -> MediResult<bool> {
        Ok(self.contains(date, time))
    }
}

/// One proposed appointment start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub available: bool,
}

/// The candidates for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub slots: Vec<SlotCandidate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotGenerator {
    window: SlotWindow,
    lookahead_days: u32,
}

impl SlotGenerator {
    pub fn new(window: SlotWindow, lookahead_days: u32) -> Self {
        Self {
            window,
            lookahead_days,
        }
    }

    pub fn window(&self) -> &SlotWindow {
        &self.window
    }

    pub fn lookahead_days(&self) -> u32 {
        self.lookahead_days
    }

    /// The calendar days covered when generating from `today`, oldest first.
    pub fn window_dates(&self, today: NaiveDate) -> Vec<NaiveDate> {
        (0..u64::from(self.lookahead_days))
            .filter_map(|offset| today.checked_add_days(Days::new(FIRST_DAY_OFFSET + offset)))
            .collect()
    }

    /// Unbooked slots for each day of the look-ahead window.
    pub fn generate<B>(&self, today: NaiveDate, booked: &B) -> Vec<DayBucket>
    where
        B: BookedSlots + ?Sized,
    {
        self.buckets(today, booked, false)
    }

    /// Every slot of the window with its availability flag, booked ones
    /// included.
    pub fn availability_grid<B>(&self, today: NaiveDate, booked: &B) -> Vec<DayBucket>
    where
        B: BookedSlots + ?Sized,
    {
        self.buckets(today, booked, true)
    }

    fn buckets<B>(&self, today: NaiveDate, booked: &B, keep_taken: bool) -> Vec<DayBucket>
    where
        B: BookedSlots + ?Sized,
    {
        let times = self.window.times();

        self.window_dates(today)
            .into_iter()
            .map(|date| {
                if !self.window.is_working_day(date) {
                    return DayBucket {
                        date,
                        slots: Vec::new(),
                    };
                }

                let slots = times
                    .iter()
                    .map(|&time| SlotCandidate {
                        date,
                        time,
                        available: is_free(booked, date, time),
                    })
                    .filter(|slot| keep_taken || slot.available)
                    .collect();

                DayBucket { date, slots }
            })
            .collect()
    }
}

impl Default for SlotGenerator {
    fn default() -> Self {
        Self::new(SlotWindow::default(), DEFAULT_LOOKAHEAD_DAYS)
    }
}

// A failed lookup counts as taken so a slot is never double-booked.
fn is_free<B>(booked: &B, date: NaiveDate, time: NaiveTime) -> bool
where
    B: BookedSlots + ?Sized,
{
    match booked.is_booked(date, time) {
        Ok(taken) => !taken,
        Err(e) => {
            warn!("Booked-slot lookup failed for {} {}: {}", date, time, e);
            false
        }
    }
}
