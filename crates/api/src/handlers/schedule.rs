use axum::{
    Json,
    extract::{Path, State},
};
use mediqueue_core::{
    demo,
    errors::MediError,
    mode::ClientMode,
    models::schedule::{DoctorSchedule, DoctorScheduleResponse, UpdateDoctorScheduleRequest},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    middleware::{error_handling::AppError, mode::RequestMode},
};

/// Loads a doctor's schedule for the given mode.
pub(crate) async fn load_schedule(
    state: &ApiState,
    mode: ClientMode,
    doctor_id: Uuid,
) -> Result<DoctorSchedule, AppError> {
    match mode {
        ClientMode::Demo => Ok(demo::demo_schedule(doctor_id, state.clock.now())),
        ClientMode::Live => {
            let db_schedule =
                mediqueue_db::repositories::schedule::get_schedule(&state.db_pool, doctor_id)
                    .await
                    .map_err(MediError::Database)?
                    .ok_or_else(|| {
                        MediError::NotFound(format!(
                            "No schedule configured for doctor with ID {}",
                            doctor_id
                        ))
                    })?;

            Ok(db_schedule.into_schedule())
        }
    }
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    RequestMode(mode): RequestMode,
) -> Result<Json<DoctorScheduleResponse>, AppError> {
    let schedule = load_schedule(&state, mode, doctor_id).await?;

    Ok(Json(schedule.into()))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    RequestMode(mode): RequestMode,
    Json(payload): Json<UpdateDoctorScheduleRequest>,
) -> Result<Json<DoctorScheduleResponse>, AppError> {
    let window = payload.validate()?;

    let schedule = match mode {
        // Echo the validated schedule without storing it
        ClientMode::Demo => DoctorSchedule {
            doctor_id,
            working_days: window.working_days,
            opening_time: window.opening_time,
            closing_time: window.closing_time,
            slot_duration_minutes: window.step_minutes,
            updated_at: state.clock.now(),
        },
        ClientMode::Live => {
            mediqueue_db::repositories::schedule::upsert_schedule(&state.db_pool, doctor_id, &window)
                .await
                .map_err(MediError::Database)?
                .into_schedule()
        }
    };

    tracing::info!("Schedule updated for doctor {} ({:?} mode)", doctor_id, mode);

    Ok(Json(schedule.into()))
}
