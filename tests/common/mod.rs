// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use consultorio::application::ReportService;
use consultorio::domain::{
    Appointment, AppointmentState, Payment, PaymentStatus, Timestamp, Viewer, ViewerRole,
};
use consultorio::io::{RecordSet, write_snapshot};
use tempfile::TempDir;

/// Parse "YYYY-MM-DD HH:MM" into a clinic-local timestamp.
pub fn at(s: &str) -> Timestamp {
    Timestamp::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

pub fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Reference "now" used across tests: Wednesday 15 January 2025.
pub fn mid_january() -> Timestamp {
    at("2025-01-15 10:30")
}

pub fn appointment(
    id: i64,
    psychologist: &str,
    state: AppointmentState,
    price_cents: i64,
    when: &str,
) -> Appointment {
    Appointment::new(id, 100 + id, 1, at(when), state)
        .with_price(price_cents)
        .with_psychologist_name(psychologist)
}

pub fn payment(
    id: i64,
    psychologist: &str,
    status: PaymentStatus,
    amount: i64,
    when: &str,
) -> Payment {
    Payment::new(id, 100 + id, 1, amount, status, at(when)).with_psychologist_name(psychologist)
}

/// Test fixture: the two-psychologist clinic used in the admin scenario.
pub struct AdminScenario;

impl AdminScenario {
    pub fn appointments() -> Vec<Appointment> {
        vec![
            appointment(1, "Ana", AppointmentState::Completed, 8000, "2025-01-06 09:00"),
            appointment(2, "Ana", AppointmentState::Reserved, 8000, "2025-01-13 09:00"),
            appointment(3, "Luis", AppointmentState::Cancelled, 10000, "2025-01-08 16:00"),
        ]
    }

    pub fn payments() -> Vec<Payment> {
        vec![
            payment(1, "Ana", PaymentStatus::Completed, 8000, "2025-01-06 10:00")
                .with_appointment(1),
        ]
    }

    pub fn records() -> RecordSet {
        RecordSet::new(Self::appointments(), Self::payments())
    }
}

pub fn admin() -> Viewer {
    Viewer::new(Some(1), "Admin", ViewerRole::Admin)
}

/// Helper to write a snapshot into a temporary directory and load a service
/// from it.
pub fn snapshot_service(viewer: Viewer, records: &RecordSet) -> Result<(ReportService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("snapshot.json");
    let file = std::fs::File::create(&path)?;
    write_snapshot(records, at("2025-01-31 20:00"), file)?;
    let service = ReportService::from_snapshot(viewer, &path)?;
    Ok((service, temp_dir))
}
