//! # Availability Handlers
//!
//! Serves the bookable slots of a doctor for the coming days. The handler
//! gathers the two inputs the slot generator needs (the doctor's working
//! window and the already-booked times) and leaves the rest to
//! [`SlotGenerator`].
//!
//! Candidates are computed fresh on every request and never stored. A slot
//! that looks free here can still be taken before the patient submits; the
//! booking endpoints re-check at commit time and answer `409 Conflict`.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use mediqueue_core::{
    demo,
    errors::MediError,
    mode::ClientMode,
    models::availability::AvailabilityResponse,
    slots::{BookedSlotIndex, SlotGenerator},
    time_label::TimeFormat,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    ApiState,
    handlers::schedule::load_schedule,
    middleware::{error_handling::AppError, mode::RequestMode},
};

/// Query parameters for the slots endpoint
///
/// * `format` - `12h` or `24h` labels (default: server setting)
/// * `include_booked` - also return taken slots, flagged unavailable
#[derive(Debug, Default, Deserialize)]
pub struct SlotQuery {
    pub format: Option<TimeFormat>,

    #[serde(default)]
    pub include_booked: bool,
}

/// Lists a doctor's slots, tomorrow through the configured look-ahead
///
/// # Endpoint
///
/// ```text
/// GET /api/doctors/:id/slots?format=24h&include_booked=true
/// ```
///
/// Every day of the window appears in the response, in order, even when it
/// has no free slots.
///
/// # Errors
///
/// * `MediError::NotFound` - The doctor has no schedule configured
/// * `MediError::Database` - Database error
#[axum::debug_handler]
pub async fn get_doctor_slots(
    State(state): State<Arc<ApiState>>,
    Path(doctor_id): Path<Uuid>,
    RequestMode(mode): RequestMode,
    Query(query): Query<SlotQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let today = state.clock.now().date_naive();
    let time_format = query.format.unwrap_or(state.slots.time_format);

    let schedule = load_schedule(&state, mode, doctor_id).await?;
    let generator = SlotGenerator::new(schedule.window(), state.slots.lookahead_days);

    let booked = match mode {
        ClientMode::Demo => demo::demo_booked_index(today),
        ClientMode::Live => {
            let dates = generator.window_dates(today);
            match (dates.first(), dates.last()) {
                (Some(&from), Some(&to)) => {
                    let pairs = mediqueue_db::repositories::appointment::get_booked_times(
                        &state.db_pool,
                        doctor_id,
                        from,
                        to,
                    )
                    .await
                    .map_err(MediError::Database)?;
                    BookedSlotIndex::from_pairs(pairs)
                }
                _ => BookedSlotIndex::new(),
            }
        }
    };

    let buckets = if query.include_booked {
        generator.availability_grid(today, &booked)
    } else {
        generator.generate(today, &booked)
    };

    tracing::debug!(
        "Generated {} day buckets for doctor {} ({} slots)",
        buckets.len(),
        doctor_id,
        buckets.iter().map(|bucket| bucket.slots.len()).sum::<usize>()
    );

    Ok(Json(AvailabilityResponse::new(doctor_id, time_format, buckets)))
}
