use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create doctor_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS doctor_schedules (
            doctor_id UUID PRIMARY KEY,
            working_days INTEGER[] NOT NULL DEFAULT '{}',
            opening_time TIME NOT NULL,
            closing_time TIME NOT NULL,
            slot_duration_minutes INTEGER NOT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_opening_hours CHECK (closing_time > opening_time),
            CONSTRAINT valid_slot_duration CHECK (slot_duration_minutes > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            patient_id UUID NOT NULL,
            doctor_id UUID NOT NULL,
            appointment_date DATE NOT NULL,
            appointment_time TIME NOT NULL,
            status VARCHAR(16) NOT NULL DEFAULT 'scheduled',
            reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_status CHECK (status IN ('scheduled', 'completed', 'cancelled'))
        );
        "#,
    )
    .execute(pool)
    .await?;

    // One live booking per doctor and slot; cancelled rows free the slot
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS uniq_appointments_doctor_slot
            ON appointments(doctor_id, appointment_date, appointment_time)
            WHERE status <> 'cancelled';
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_appointments_patient_id ON appointments(patient_id)",
        "CREATE INDEX IF NOT EXISTS idx_appointments_doctor_date ON appointments(doctor_id, appointment_date)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
