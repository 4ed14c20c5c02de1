use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::{Cents, Timestamp, UnknownVariant, amount, wire};

pub type AppointmentId = i64;
pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentState {
    #[serde(rename = "RESERVADA")]
    Reserved,
    #[serde(rename = "COMPLETADA")]
    Completed,
    #[serde(rename = "CANCELADA")]
    Cancelled,
}

impl AppointmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentState::Reserved => "RESERVADA",
            AppointmentState::Completed => "COMPLETADA",
            AppointmentState::Cancelled => "CANCELADA",
        }
    }
}

impl FromStr for AppointmentState {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "RESERVADA" | "RESERVED" => Ok(AppointmentState::Reserved),
            "COMPLETADA" | "COMPLETED" => Ok(AppointmentState::Completed),
            "CANCELADA" | "CANCELLED" => Ok(AppointmentState::Cancelled),
            _ => Err(UnknownVariant::new("appointment state", s)),
        }
    }
}

impl std::fmt::Display for AppointmentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a session is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    #[serde(rename = "PRESENCIAL")]
    InPerson,
    #[serde(rename = "VIDEOLLAMADA")]
    VideoCall,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::InPerson => "PRESENCIAL",
            Modality::VideoCall => "VIDEOLLAMADA",
        }
    }
}

impl FromStr for Modality {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PRESENCIAL" | "IN_PERSON" => Ok(Modality::InPerson),
            "VIDEOLLAMADA" | "VIDEO_CALL" => Ok(Modality::VideoCall),
            _ => Err(UnknownVariant::new("modality", s)),
        }
    }
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scheduled session between a patient and a psychologist, as served by the
/// backend. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    #[serde(rename = "pacienteId")]
    pub patient_id: UserId,
    #[serde(rename = "psicologoId")]
    pub psychologist_id: UserId,
    #[serde(rename = "fechaHora", with = "wire")]
    pub scheduled_at: Timestamp,
    #[serde(rename = "estado")]
    pub state: AppointmentState,
    #[serde(rename = "modalidad")]
    pub modality: Modality,
    /// Session price; the backend allows it to be absent, which reads as zero.
    #[serde(rename = "precio", with = "amount", default)]
    pub price: Cents,
    /// Nullable on the backend; `null` reads as unpaid.
    #[serde(rename = "pagado", default, deserialize_with = "null_as_false")]
    pub paid: bool,
    #[serde(rename = "nombrePaciente", default)]
    pub patient_name: Option<String>,
    #[serde(rename = "nombrePsicologo", default)]
    pub psychologist_name: Option<String>,
    /// Free-text notes; opaque to reporting.
    #[serde(rename = "notas", default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Option::<bool>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Appointment {
    pub fn new(
        id: AppointmentId,
        patient_id: UserId,
        psychologist_id: UserId,
        scheduled_at: Timestamp,
        state: AppointmentState,
    ) -> Self {
        Self {
            id,
            patient_id,
            psychologist_id,
            scheduled_at,
            state,
            modality: Modality::InPerson,
            price: 0,
            paid: false,
            patient_name: None,
            psychologist_name: None,
            notes: None,
        }
    }

    pub fn with_price(mut self, price: Cents) -> Self {
        self.price = price;
        self
    }

    pub fn with_paid(mut self, paid: bool) -> Self {
        self.paid = paid;
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_patient_name(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }

    pub fn with_psychologist_name(mut self, name: impl Into<String>) -> Self {
        self.psychologist_name = Some(name.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.state == AppointmentState::Completed
    }

    /// Display name used to group per-psychologist statistics. Missing names
    /// group together under the empty string, as the dashboards did.
    pub fn psychologist_key(&self) -> &str {
        self.psychologist_name.as_deref().unwrap_or("")
    }
}
