use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{UnknownVariant, UserId};

/// Who is looking at a report. Determines which aggregate fields are
/// meaningful and how the backend scopes the records it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewerRole {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "PSICOLOGO")]
    Psychologist,
    #[serde(rename = "PACIENTE")]
    Patient,
}

impl ViewerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerRole::Admin => "ADMIN",
            ViewerRole::Psychologist => "PSICOLOGO",
            ViewerRole::Patient => "PACIENTE",
        }
    }

    /// Lowercase form used in export file names: `reporte_psicologo_...`.
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl FromStr for ViewerRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ADMIN" => Ok(ViewerRole::Admin),
            "PSICOLOGO" | "PSYCHOLOGIST" => Ok(ViewerRole::Psychologist),
            "PACIENTE" | "PATIENT" => Ok(ViewerRole::Patient),
            _ => Err(UnknownVariant::new("role", s)),
        }
    }
}

impl std::fmt::Display for ViewerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    /// Backend user id; administrators may report without one.
    pub id: Option<UserId>,
    pub name: String,
    pub role: ViewerRole,
}

impl Viewer {
    pub fn new(id: Option<UserId>, name: impl Into<String>, role: ViewerRole) -> Self {
        Self {
            id,
            name: name.into(),
            role,
        }
    }
}
