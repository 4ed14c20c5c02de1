use std::io::Read;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::AppError;
use crate::domain::{Appointment, Payment, Timestamp, wire};

/// A record that could not be decoded and was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub error: String,
}

/// Result of decoding a collection element by element.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

/// Decode each JSON element independently. Elements that do not match the
/// record shape are skipped and reported instead of failing the batch.
pub fn decode_records<T: DeserializeOwned>(kind: &str, values: Vec<Value>) -> Decoded<T> {
    let mut records = Vec::with_capacity(values.len());
    let mut skipped = Vec::new();

    for (index, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(kind, index, error = %e, "skipping malformed record");
                skipped.push(SkippedRecord {
                    index,
                    error: e.to_string(),
                });
            }
        }
    }

    Decoded { records, skipped }
}

/// Read-only snapshot of the records one aggregation pass works on.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub appointments: Vec<Appointment>,
    pub payments: Vec<Payment>,
    /// Malformed records dropped while loading.
    pub skipped: usize,
}

impl RecordSet {
    pub fn new(appointments: Vec<Appointment>, payments: Vec<Payment>) -> Self {
        Self {
            appointments,
            payments,
            skipped: 0,
        }
    }

    /// Build a record set from raw backend collections.
    pub fn from_values(appointments: Vec<Value>, payments: Vec<Value>) -> Self {
        let appointments = decode_records::<Appointment>("appointment", appointments);
        let payments = decode_records::<Payment>("payment", payments);
        Self {
            skipped: appointments.skipped.len() + payments.skipped.len(),
            appointments: appointments.records,
            payments: payments.records,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty() && self.payments.is_empty()
    }
}

/// On-disk snapshot of backend records, as written by `fetch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "exportedAt", default, with = "optional_wire")]
    pub exported_at: Option<Timestamp>,
    #[serde(default)]
    pub appointments: Vec<Value>,
    #[serde(default)]
    pub payments: Vec<Value>,
}

mod optional_wire {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Wrapped(#[serde(with = "wire")] Timestamp);

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        ts.map(Wrapped).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(ts)| ts))
    }
}

/// Load a snapshot, skipping records that do not decode.
pub fn load_snapshot<R: Read>(reader: R) -> Result<RecordSet, AppError> {
    let snapshot: Snapshot = serde_json::from_reader(reader)?;
    let records = RecordSet::from_values(snapshot.appointments, snapshot.payments);
    tracing::info!(
        appointments = records.appointments.len(),
        payments = records.payments.len(),
        skipped = records.skipped,
        "loaded snapshot"
    );
    Ok(records)
}
