use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{AppointmentId, Cents, Timestamp, UnknownVariant, UserId, amount, wire};

pub type PaymentId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "COMPLETADO")]
    Completed,
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "FALLIDO")]
    Failed,
    #[serde(rename = "REEMBOLSADO")]
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "COMPLETADO",
            PaymentStatus::Pending => "PENDIENTE",
            PaymentStatus::Failed => "FALLIDO",
            PaymentStatus::Refunded => "REEMBOLSADO",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "COMPLETADO" | "COMPLETED" => Ok(PaymentStatus::Completed),
            "PENDIENTE" | "PENDING" => Ok(PaymentStatus::Pending),
            "FALLIDO" | "FAILED" => Ok(PaymentStatus::Failed),
            "REEMBOLSADO" | "REFUNDED" => Ok(PaymentStatus::Refunded),
            _ => Err(UnknownVariant::new("payment status", s)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "YAPE")]
    Yape,
    #[serde(rename = "PLIN")]
    Plin,
    #[serde(rename = "TARJETA")]
    Card,
    #[serde(rename = "TRANSFERENCIA")]
    Transfer,
    #[serde(rename = "EFECTIVO")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Yape => "YAPE",
            PaymentMethod::Plin => "PLIN",
            PaymentMethod::Card => "TARJETA",
            PaymentMethod::Transfer => "TRANSFERENCIA",
            PaymentMethod::Cash => "EFECTIVO",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment recorded against an appointment. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    #[serde(rename = "appointmentId", default)]
    pub appointment_id: Option<AppointmentId>,
    #[serde(rename = "pacienteId")]
    pub patient_id: UserId,
    #[serde(rename = "psicologoId")]
    pub psychologist_id: UserId,
    #[serde(rename = "monto", with = "amount")]
    pub amount: Cents,
    #[serde(rename = "metodoPago")]
    pub method: PaymentMethod,
    #[serde(rename = "estado")]
    pub status: PaymentStatus,
    #[serde(rename = "fechaPago", with = "wire")]
    pub paid_at: Timestamp,
    #[serde(rename = "numeroTransaccion", default)]
    pub transaction_number: Option<String>,
    #[serde(rename = "numeroComprobante", default)]
    pub receipt_number: Option<String>,
    #[serde(rename = "conceptoPago", default)]
    pub concept: Option<String>,
    #[serde(rename = "observaciones", default)]
    pub observations: Option<String>,
    #[serde(rename = "nombrePaciente", default)]
    pub patient_name: Option<String>,
    #[serde(rename = "nombrePsicologo", default)]
    pub psychologist_name: Option<String>,
}

impl Payment {
    pub fn new(
        id: PaymentId,
        patient_id: UserId,
        psychologist_id: UserId,
        amount: Cents,
        status: PaymentStatus,
        paid_at: Timestamp,
    ) -> Self {
        Self {
            id,
            appointment_id: None,
            patient_id,
            psychologist_id,
            amount,
            method: PaymentMethod::Cash,
            status,
            paid_at,
            transaction_number: None,
            receipt_number: None,
            concept: None,
            observations: None,
            patient_name: None,
            psychologist_name: None,
        }
    }

    pub fn with_appointment(mut self, appointment_id: AppointmentId) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    pub fn with_method(mut self, method: PaymentMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_psychologist_name(mut self, name: impl Into<String>) -> Self {
        self.psychologist_name = Some(name.into());
        self
    }

    pub fn with_patient_name(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }

    pub fn with_transaction_number(mut self, number: impl Into<String>) -> Self {
        self.transaction_number = Some(number.into());
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    pub fn is_pending(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    pub fn psychologist_key(&self) -> &str {
        self.psychologist_name.as_deref().unwrap_or("")
    }
}
