use chrono::{DateTime, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{MediError, MediResult},
    slots::SlotWindow,
    time_label::parse_time_label,
};

/// Longest consultation a schedule may configure, in minutes.
pub const MAX_SLOT_MINUTES: u32 = 12 * 60;

/// A doctor's working days and hours
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSchedule {
    pub doctor_id: Uuid,
    pub working_days: Vec<Weekday>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub slot_duration_minutes: u32,
    pub updated_at: DateTime<Utc>,
}

impl DoctorSchedule {
    pub fn window(&self) -> SlotWindow {
        SlotWindow {
            opening_time: self.opening_time,
            closing_time: self.closing_time,
            step_minutes: self.slot_duration_minutes,
            working_days: self.working_days.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorScheduleRequest {
    pub working_days: Vec<Weekday>,
    pub opening_time: String,
    pub closing_time: String,
    pub slot_duration_minutes: u32,
}

impl UpdateDoctorScheduleRequest {
    /// Parses the labels and rejects windows that would never produce a
    /// slot.
    pub fn validate(&self) -> MediResult<SlotWindow> {
        let opening_time = parse_time_label(&self.opening_time)?;
        let closing_time = parse_time_label(&self.closing_time)?;

        if opening_time >= closing_time {
            return Err(MediError::Validation(
                "Opening time must be before closing time".to_string(),
            ));
        }

        if self.slot_duration_minutes == 0 || self.slot_duration_minutes > MAX_SLOT_MINUTES {
            return Err(MediError::Validation(format!(
                "Slot duration must be between 1 and {} minutes",
                MAX_SLOT_MINUTES
            )));
        }

        let mut working_days = self.working_days.clone();
        working_days.sort_by_key(|day| day.num_days_from_monday());
        working_days.dedup();

        let window = SlotWindow {
            opening_time,
            closing_time,
            step_minutes: self.slot_duration_minutes,
            working_days,
        };

        if window.times().is_empty() {
            return Err(MediError::Validation(format!(
                "A {} minute slot does not fit between {} and {}",
                self.slot_duration_minutes,
                opening_time.format("%H:%M"),
                closing_time.format("%H:%M")
            )));
        }

        Ok(window)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorScheduleResponse {
    pub doctor_id: Uuid,
    pub working_days: Vec<Weekday>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
    pub slot_duration_minutes: u32,
    pub updated_at: DateTime<Utc>,
}

impl From<DoctorSchedule> for DoctorScheduleResponse {
    fn from(schedule: DoctorSchedule) -> Self {
        Self {
            doctor_id: schedule.doctor_id,
            working_days: schedule.working_days,
            opening_time: schedule.opening_time,
            closing_time: schedule.closing_time,
            slot_duration_minutes: schedule.slot_duration_minutes,
            updated_at: schedule.updated_at,
        }
    }
}
