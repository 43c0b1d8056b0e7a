//! Fixtures served to demo-mode clients.
//!
//! Dates are relative to the caller's `today` so the demo always shows a
//! populated upcoming week.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc, Weekday};
use uuid::Uuid;

use crate::{
    models::{
        appointment::{Appointment, AppointmentStatus},
        schedule::DoctorSchedule,
    },
    slots::{BookedSlotIndex, DEFAULT_SLOT_MINUTES},
    time_label::date_key,
};

pub const DEMO_DOCTOR_ID: Uuid = Uuid::from_u128(0x6d65_6469_7175_6575_0000_0000_0000_0001);
pub const DEMO_PATIENT_ID: Uuid = Uuid::from_u128(0x6d65_6469_7175_6575_0000_0000_0000_0002);

pub fn demo_schedule(doctor_id: Uuid, now: DateTime<Utc>) -> DoctorSchedule {
    DoctorSchedule {
        doctor_id,
        working_days: vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
        ],
        opening_time: hm(10, 0),
        closing_time: hm(21, 0),
        slot_duration_minutes: DEFAULT_SLOT_MINUTES,
        updated_at: now,
    }
}

/// Slots taken over the next few days: every fixture appointment that is not
/// cancelled, plus other patients' bookings in the mixed label formats the
/// booking history carries.
pub fn demo_booked_index(today: NaiveDate) -> BookedSlotIndex {
    let mut labels: HashMap<String, Vec<&str>> = HashMap::new();

    for (offset, times) in [
        (1, vec!["10:30 AM", "14:00"]),
        (2, vec!["11:00", "11:30", "5:00 PM"]),
        (4, vec!["10:00 AM", "7:30 PM"]),
    ] {
        if let Some(date) = today.checked_add_days(Days::new(offset)) {
            labels.insert(date_key(date), times);
        }
    }

    let mut index = BookedSlotIndex::from_labels(&labels);
    for fixture in fixtures(today) {
        if fixture.status != AppointmentStatus::Cancelled {
            index.insert(fixture.date, fixture.time);
        }
    }

    index
}

struct Fixture {
    n: u128,
    date: NaiveDate,
    time: NaiveTime,
    status: AppointmentStatus,
    reason: &'static str,
}

fn fixtures(today: NaiveDate) -> Vec<Fixture> {
    let fixture = |n, days: i64, time, status, reason| {
        let date = if days < 0 {
            today.checked_sub_days(Days::new(days.unsigned_abs()))
        } else {
            today.checked_add_days(Days::new(days.unsigned_abs()))
        }
        .unwrap_or(today);

        Fixture { n, date, time, status, reason }
    };

    vec![
        fixture(1, -7, hm(11, 0), AppointmentStatus::Completed, "Annual check-up"),
        fixture(2, 2, hm(15, 30), AppointmentStatus::Scheduled, "Blood test follow-up"),
        fixture(3, 5, hm(10, 0), AppointmentStatus::Cancelled, "Dermatology consult"),
    ]
}

pub fn demo_appointments(patient_id: Uuid, today: NaiveDate, now: DateTime<Utc>) -> Vec<Appointment> {
    fixtures(today)
        .into_iter()
        .map(|fixture| Appointment {
            id: Uuid::from_u128(0x6d65_6469_7175_6575_0000_0000_0001_0000 + fixture.n),
            patient_id,
            doctor_id: DEMO_DOCTOR_ID,
            date: fixture.date,
            time: fixture.time,
            status: fixture.status,
            reason: Some(fixture.reason.to_string()),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

/// An appointment as it would look once booked, without storing it.
pub fn demo_appointment(
    patient_id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        patient_id,
        doctor_id,
        date,
        time,
        status: AppointmentStatus::Scheduled,
        reason,
        created_at: now,
        updated_at: now,
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}
