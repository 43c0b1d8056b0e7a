use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{slots::DayBucket, time_label::TimeFormat};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotResponse {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub label: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlotsResponse {
    pub date: NaiveDate,
    pub slots: Vec<SlotResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub doctor_id: Uuid,
    pub time_format: TimeFormat,
    pub days: Vec<DaySlotsResponse>,
}

impl AvailabilityResponse {
    pub fn new(doctor_id: Uuid, time_format: TimeFormat, buckets: Vec<DayBucket>) -> Self {
        let days = buckets
            .into_iter()
            .map(|bucket| DaySlotsResponse {
                date: bucket.date,
                slots: bucket
                    .slots
                    .into_iter()
                    .map(|slot| SlotResponse {
                        date: slot.date,
                        time: slot.time,
                        label: time_format.format(slot.time),
                        available: slot.available,
                    })
                    .collect(),
            })
            .collect();

        Self {
            doctor_id,
            time_format,
            days,
        }
    }
}
