use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use eyre::{Result, WrapErr};
use mediqueue_core::models::{
    appointment::{Appointment, AppointmentStatus},
    schedule::DoctorSchedule,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDoctorSchedule {
    pub doctor_id: Uuid,
    /// Weekdays as days from Monday (0 = Monday).
    pub working_days: Vec<i32>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub slot_duration_minutes: i32,
    pub updated_at: DateTime<Utc>,
}

impl DbDoctorSchedule {
    /// Rows are trusted as stored; out-of-range weekday indexes are dropped
    /// and a negative duration becomes zero, which the slot generator treats
    /// as an empty window.
    pub fn into_schedule(self) -> DoctorSchedule {
        DoctorSchedule {
            doctor_id: self.doctor_id,
            working_days: self
                .working_days
                .iter()
                .filter_map(|&index| weekday_from_index(index))
                .collect(),
            opening_time: self.opening_time,
            closing_time: self.closing_time,
            slot_duration_minutes: u32::try_from(self.slot_duration_minutes).unwrap_or(0),
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbAppointment {
    pub fn into_appointment(self) -> Result<Appointment> {
        let status = self
            .status
            .parse::<AppointmentStatus>()
            .wrap_err_with(|| format!("Appointment {} has an invalid status", self.id))?;

        Ok(Appointment {
            id: self.id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            date: self.appointment_date,
            time: self.appointment_time,
            status,
            reason: self.reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub fn weekday_index(day: Weekday) -> i32 {
    day.num_days_from_monday() as i32
}

pub fn weekday_from_index(index: i32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Weekday::Mon)]
    #[case(Weekday::Thu)]
    #[case(Weekday::Sun)]
    fn weekday_index_is_stable(#[case] day: Weekday) {
        assert_eq!(weekday_from_index(weekday_index(day)), Some(day));
    }

    #[test]
    fn stored_schedule_tolerates_bad_values() {
        let row = DbDoctorSchedule {
            doctor_id: Uuid::new_v4(),
            working_days: vec![0, 4, 9, -1],
            opening_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            closing_time: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            slot_duration_minutes: -30,
            updated_at: Utc::now(),
        };

        let schedule = row.into_schedule();

        assert_eq!(schedule.working_days, vec![Weekday::Mon, Weekday::Fri]);
        assert_eq!(schedule.slot_duration_minutes, 0);
        assert!(!schedule.window().is_valid());
    }

    #[test]
    fn appointment_row_with_unknown_status_is_an_error() {
        let now = Utc::now();
        let row = DbAppointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id: Uuid::new_v4(),
            appointment_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            appointment_time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            status: "pending".to_string(),
            reason: None,
            created_at: now,
            updated_at: now,
        };

        assert!(row.clone().into_appointment().is_err());

        let row = DbAppointment {
            status: "scheduled".to_string(),
            ..row
        };
        let appointment = row.into_appointment().unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.time, NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }
}
