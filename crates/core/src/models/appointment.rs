use std::{cmp::Reverse, fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::MediError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = MediError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(MediError::Validation(format!(
                "Unknown appointment status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AppointmentStatus,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    /// `14:30` or `2:30 PM`
    pub time: String,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleAppointmentRequest {
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentScope {
    #[default]
    All,
    Upcoming,
    Past,
}

/// Criteria for the appointment list views
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub doctor_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    #[serde(default)]
    pub scope: AppointmentScope,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment, now: NaiveDateTime) -> bool {
        if self.patient_id.is_some_and(|id| id != appointment.patient_id) {
            return false;
        }
        if self.doctor_id.is_some_and(|id| id != appointment.doctor_id) {
            return false;
        }
        if self.status.is_some_and(|status| status != appointment.status) {
            return false;
        }
        if self.from.is_some_and(|from| appointment.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| appointment.date > to) {
            return false;
        }

        match self.scope {
            AppointmentScope::All => true,
            AppointmentScope::Upcoming => appointment.starts_at() >= now,
            AppointmentScope::Past => appointment.starts_at() < now,
        }
    }

    /// Keeps matching appointments, soonest first for upcoming and
    /// chronological views, most recent first for past ones.
    pub fn apply(&self, appointments: Vec<Appointment>, now: NaiveDateTime) -> Vec<Appointment> {
        let mut matching: Vec<Appointment> = appointments
            .into_iter()
            .filter(|appointment| self.matches(appointment, now))
            .collect();

        match self.scope {
            AppointmentScope::Past => matching.sort_by_key(|a| Reverse(a.starts_at())),
            AppointmentScope::All | AppointmentScope::Upcoming => {
                matching.sort_by_key(Appointment::starts_at)
            }
        }

        matching
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResponse {
    pub appointments: Vec<Appointment>,
}
