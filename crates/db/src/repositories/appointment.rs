use crate::models::DbAppointment;
use chrono::{NaiveDate, NaiveTime, Utc};
use eyre::Result;
use mediqueue_core::models::appointment::AppointmentStatus;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, doctor_id, appointment_date, appointment_time, status, reason, created_at, updated_at";

/// Result of trying to claim a slot
#[derive(Debug)]
pub enum BookingOutcome {
    Booked(DbAppointment),
    SlotTaken,
}

#[derive(Debug)]
pub enum RescheduleOutcome {
    Rescheduled(DbAppointment),
    SlotTaken,
    /// No scheduled appointment with that id
    NotFound,
}

// Postgres unique_violation
fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

pub async fn create_appointment(
    pool: &Pool<Postgres>,
    patient_id: Uuid,
    doctor_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
    reason: Option<&str>,
) -> Result<BookingOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Booking appointment: id={}, doctor_id={}, slot={} {}",
        id, doctor_id, date, time
    );

    let result = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments
            (id, patient_id, doctor_id, appointment_date, appointment_time, status, reason, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(patient_id)
    .bind(doctor_id)
    .bind(date)
    .bind(time)
    .bind(AppointmentStatus::Scheduled.as_str())
    .bind(reason)
    .bind(now)
    .fetch_one(pool)
    .await;

    match result {
        Ok(appointment) => Ok(BookingOutcome::Booked(appointment)),
        Err(e) if is_unique_violation(&e) => {
            tracing::debug!("Slot already taken: doctor_id={}, slot={} {}", doctor_id, date, time);
            Ok(BookingOutcome::SlotTaken)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn get_appointment_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Appointments for a patient, a doctor, or both, in chronological order.
pub async fn list_appointments(
    pool: &Pool<Postgres>,
    patient_id: Option<Uuid>,
    doctor_id: Option<Uuid>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {APPOINTMENT_COLUMNS}
        FROM appointments
        WHERE ($1::uuid IS NULL OR patient_id = $1)
          AND ($2::uuid IS NULL OR doctor_id = $2)
        ORDER BY appointment_date ASC, appointment_time ASC
        "#
    ))
    .bind(patient_id)
    .bind(doctor_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Slots held by non-cancelled appointments between `from` and `to`
/// inclusive.
pub async fn get_booked_times(
    pool: &Pool<Postgres>,
    doctor_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<(NaiveDate, NaiveTime)>> {
    let booked = sqlx::query_as::<_, (NaiveDate, NaiveTime)>(
        r#"
        SELECT appointment_date, appointment_time
        FROM appointments
        WHERE doctor_id = $1
          AND appointment_date BETWEEN $2 AND $3
          AND status <> 'cancelled'
        ORDER BY appointment_date ASC, appointment_time ASC
        "#,
    )
    .bind(doctor_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    tracing::debug!(
        "Found {} booked slots for doctor {} between {} and {}",
        booked.len(), doctor_id, from, to
    );

    Ok(booked)
}

/// Moves a scheduled appointment to a new slot. The unique slot index
/// decides conflicts, so two patients racing for the same slot cannot both
/// win.
pub async fn reschedule_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<RescheduleOutcome> {
    let now = Utc::now();

    let result = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET appointment_date = $2, appointment_time = $3, updated_at = $4
        WHERE id = $1 AND status = 'scheduled'
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(date)
    .bind(time)
    .bind(now)
    .fetch_optional(pool)
    .await;

    match result {
        Ok(Some(appointment)) => Ok(RescheduleOutcome::Rescheduled(appointment)),
        Ok(None) => Ok(RescheduleOutcome::NotFound),
        Err(e) if is_unique_violation(&e) => Ok(RescheduleOutcome::SlotTaken),
        Err(e) => Err(e.into()),
    }
}

/// Cancels a scheduled appointment, releasing its slot. Returns `None` when
/// no scheduled appointment has that id.
pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> Result<Option<DbAppointment>> {
    let now = Utc::now();

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = 'cancelled', updated_at = $2
        WHERE id = $1 AND status = 'scheduled'
        RETURNING {APPOINTMENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(now)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}
