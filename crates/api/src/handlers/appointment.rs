//! # Appointment Handlers
//!
//! Booking, rescheduling, cancelling and listing appointments.
//!
//! A confirmed selection is validated against the doctor's schedule before
//! it is written: the date must fall inside the look-ahead window and the
//! time must be a slot the window offers. Whether the slot is still free is
//! decided by the database at commit time; losing that race yields
//! `409 Conflict` with `retryable: true`.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use mediqueue_core::{
    demo,
    errors::MediError,
    mode::ClientMode,
    models::{
        appointment::{
            Appointment, AppointmentFilter, AppointmentListResponse, AppointmentStatus,
            BookAppointmentRequest, RescheduleAppointmentRequest,
        },
        schedule::DoctorSchedule,
    },
    slots::SlotGenerator,
    time_label::parse_time_label,
};
use mediqueue_db::repositories::appointment::{BookingOutcome, RescheduleOutcome};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::schedule::load_schedule,
    middleware::{error_handling::AppError, mode::RequestMode},
};

/// Checks that `(date, time)` is a slot the schedule would have offered.
fn ensure_offered(
    state: &ApiState,
    schedule: &DoctorSchedule,
    today: NaiveDate,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<(), MediError> {
    let generator = SlotGenerator::new(schedule.window(), state.slots.lookahead_days);

    if !generator.window_dates(today).contains(&date) {
        return Err(MediError::Validation(format!(
            "{} is outside the booking window of the next {} days",
            date, state.slots.lookahead_days
        )));
    }

    if !generator.window().offers(date, time) {
        return Err(MediError::Validation(format!(
            "{} {} is not a slot offered by this doctor",
            date,
            time.format("%H:%M")
        )));
    }

    Ok(())
}

fn find_demo_appointment(
    id: Uuid,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<Appointment, MediError> {
    demo::demo_appointments(demo::DEMO_PATIENT_ID, today, now)
        .into_iter()
        .find(|appointment| appointment.id == id)
        .ok_or_else(|| MediError::NotFound(format!("Appointment with ID {} not found", id)))
}

async fn load_appointment(
    state: &ApiState,
    mode: ClientMode,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<Appointment, AppError> {
    let appointment = match mode {
        ClientMode::Demo => find_demo_appointment(id, now.date_naive(), now)?,
        ClientMode::Live => {
            mediqueue_db::repositories::appointment::get_appointment_by_id(&state.db_pool, id)
                .await
                .map_err(MediError::Database)?
                .ok_or_else(|| MediError::NotFound(format!("Appointment with ID {} not found", id)))?
                .into_appointment()?
        }
    };

    Ok(appointment)
}

/// Only scheduled appointments can be moved or cancelled.
fn ensure_scheduled(appointment: &Appointment, action: &str) -> Result<(), MediError> {
    if appointment.status != AppointmentStatus::Scheduled {
        return Err(MediError::Validation(format!(
            "Only scheduled appointments can be {}, this one is {}",
            action, appointment.status
        )));
    }

    Ok(())
}

fn no_longer_scheduled(id: Uuid) -> MediError {
    MediError::NotFound(format!("Appointment with ID {} is no longer scheduled", id))
}

/// Books a new appointment
///
/// ```text
/// POST /api/appointments
/// ```
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<ApiState>>,
    RequestMode(mode): RequestMode,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let now = state.clock.now();
    let today = now.date_naive();
    let time = parse_time_label(&payload.time)?;

    let schedule = load_schedule(&state, mode, payload.doctor_id).await?;
    ensure_offered(&state, &schedule, today, payload.date, time)?;

    let appointment = match mode {
        ClientMode::Demo => {
            if demo::demo_booked_index(today).contains(payload.date, time) {
                return Err(MediError::slot_taken().into());
            }
            demo::demo_appointment(
                payload.patient_id,
                payload.doctor_id,
                payload.date,
                time,
                payload.reason,
                now,
            )
        }
        ClientMode::Live => {
            let outcome = mediqueue_db::repositories::appointment::create_appointment(
                &state.db_pool,
                payload.patient_id,
                payload.doctor_id,
                payload.date,
                time,
                payload.reason.as_deref(),
            )
            .await
            .map_err(MediError::Database)?;

            match outcome {
                BookingOutcome::Booked(db_appointment) => db_appointment.into_appointment()?,
                BookingOutcome::SlotTaken => return Err(MediError::slot_taken().into()),
            }
        }
    };

    tracing::info!(
        "Booked appointment {} with doctor {} on {} at {}",
        appointment.id, appointment.doctor_id, appointment.date, appointment.time
    );

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Moves an appointment to another slot
///
/// ```text
/// PUT /api/appointments/:id/reschedule
/// ```
///
/// # Errors
///
/// * `MediError::NotFound` - No appointment with that ID
/// * `MediError::Validation` - The appointment is not scheduled, or the slot is not offered
/// * `MediError::Conflict` - The slot was taken in the meantime
#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    RequestMode(mode): RequestMode,
    Json(payload): Json<RescheduleAppointmentRequest>,
) -> Result<Json<Appointment>, AppError> {
    let now = state.clock.now();
    let today = now.date_naive();
    let time = parse_time_label(&payload.time)?;

    let current = load_appointment(&state, mode, id, now).await?;
    ensure_scheduled(&current, "rescheduled")?;

    let schedule = load_schedule(&state, mode, current.doctor_id).await?;
    ensure_offered(&state, &schedule, today, payload.date, time)?;

    let appointment = match mode {
        ClientMode::Demo => {
            let unchanged = payload.date == current.date && time == current.time;
            if !unchanged && demo::demo_booked_index(today).contains(payload.date, time) {
                return Err(MediError::slot_taken().into());
            }
            Appointment {
                date: payload.date,
                time,
                updated_at: now,
                ..current
            }
        }
        ClientMode::Live => {
            let outcome = mediqueue_db::repositories::appointment::reschedule_appointment(
                &state.db_pool,
                id,
                payload.date,
                time,
            )
            .await
            .map_err(MediError::Database)?;

            match outcome {
                RescheduleOutcome::Rescheduled(db_appointment) => db_appointment.into_appointment()?,
                RescheduleOutcome::SlotTaken => return Err(MediError::slot_taken().into()),
                // Cancelled or removed since it was read
                RescheduleOutcome::NotFound => return Err(no_longer_scheduled(id).into()),
            }
        }
    };

    tracing::info!(
        "Rescheduled appointment {} to {} at {}",
        appointment.id, appointment.date, appointment.time
    );

    Ok(Json(appointment))
}

/// Cancels a scheduled appointment, freeing its slot
///
/// ```text
/// POST /api/appointments/:id/cancel
/// ```
///
/// # Errors
///
/// * `MediError::NotFound` - No appointment with that ID
/// * `MediError::Validation` - The appointment is already completed or cancelled
#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    RequestMode(mode): RequestMode,
) -> Result<Json<Appointment>, AppError> {
    let now = state.clock.now();

    let current = load_appointment(&state, mode, id, now).await?;
    ensure_scheduled(&current, "cancelled")?;

    let appointment = match mode {
        ClientMode::Demo => Appointment {
            status: AppointmentStatus::Cancelled,
            updated_at: now,
            ..current
        },
        ClientMode::Live => {
            mediqueue_db::repositories::appointment::cancel_appointment(&state.db_pool, id)
                .await
                .map_err(MediError::Database)?
                // Cancelled or completed since it was read
                .ok_or_else(|| no_longer_scheduled(id))?
                .into_appointment()?
        }
    };

    tracing::info!("Cancelled appointment {}", appointment.id);

    Ok(Json(appointment))
}

/// Lists appointments for a patient or doctor
///
/// ```text
/// GET /api/appointments?patient_id=...&status=scheduled&scope=upcoming
/// ```
#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<ApiState>>,
    RequestMode(mode): RequestMode,
    Query(filter): Query<AppointmentFilter>,
) -> Result<Json<AppointmentListResponse>, AppError> {
    if filter.patient_id.is_none() && filter.doctor_id.is_none() {
        return Err(MediError::Validation(
            "Either patient_id or doctor_id is required".to_string(),
        )
        .into());
    }

    let now = state.clock.now();

    let appointments = match mode {
        ClientMode::Demo => demo::demo_appointments(
            filter.patient_id.unwrap_or(demo::DEMO_PATIENT_ID),
            now.date_naive(),
            now,
        ),
        ClientMode::Live => mediqueue_db::repositories::appointment::list_appointments(
            &state.db_pool,
            filter.patient_id,
            filter.doctor_id,
        )
        .await
        .map_err(MediError::Database)?
        .into_iter()
        .map(|db_appointment| db_appointment.into_appointment())
        .collect::<eyre::Result<Vec<_>>>()?,
    };

    let appointments = filter.apply(appointments, now.naive_utc());

    Ok(Json(AppointmentListResponse { appointments }))
}
