use crate::models::{DbDoctorSchedule, weekday_index};
use chrono::Utc;
use eyre::Result;
use mediqueue_core::slots::SlotWindow;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn get_schedule(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
) -> Result<Option<DbDoctorSchedule>> {
    tracing::debug!("Getting schedule for doctor: {}", doctor_id);

    let schedule = sqlx::query_as::<_, DbDoctorSchedule>(
        r#"
        SELECT doctor_id, working_days, opening_time, closing_time, slot_duration_minutes, updated_at
        FROM doctor_schedules
        WHERE doctor_id = $1
        "#,
    )
    .bind(doctor_id)
    .fetch_optional(pool)
    .await?;

    if schedule.is_none() {
        tracing::debug!("No schedule configured for doctor: {}", doctor_id);
    }

    Ok(schedule)
}

/// Creates or replaces a doctor's working window.
pub async fn upsert_schedule(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    window: &SlotWindow,
) -> Result<DbDoctorSchedule> {
    let now = Utc::now();
    let working_days: Vec<i32> = window.working_days.iter().copied().map(weekday_index).collect();
    let slot_duration_minutes = i32::try_from(window.step_minutes)?;

    tracing::debug!(
        "Saving schedule: doctor_id={}, days={:?}, window={}-{}, step={}",
        doctor_id, working_days, window.opening_time, window.closing_time, slot_duration_minutes
    );

    let schedule = sqlx::query_as::<_, DbDoctorSchedule>(
        r#"
        INSERT INTO doctor_schedules
            (doctor_id, working_days, opening_time, closing_time, slot_duration_minutes, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (doctor_id)
        DO UPDATE SET
            working_days = $2,
            opening_time = $3,
            closing_time = $4,
            slot_duration_minutes = $5,
            updated_at = $6
        RETURNING doctor_id, working_days, opening_time, closing_time, slot_duration_minutes, updated_at
        "#,
    )
    .bind(doctor_id)
    .bind(working_days)
    .bind(window.opening_time)
    .bind(window.closing_time)
    .bind(slot_duration_minutes)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(schedule)
}
