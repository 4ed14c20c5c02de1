use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Cents, TimeWindow, ViewerRole};

/// Per-psychologist rollup shown to administrators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PsychologistStats {
    pub total_appointments: usize,
    pub completed: usize,
    pub revenue: Cents,
}

/// Statistics for one viewer over one time window.
///
/// Built fresh from the filtered records on every filter change and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub role: ViewerRole,
    pub window: Option<TimeWindow>,
    pub period_label: String,

    pub total_appointments: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Appointments still in the RESERVADA state.
    pub pending: usize,
    pub paid_appointments: usize,

    pub completed_payments: usize,
    pub pending_payments: usize,
    /// Sum of completed payment amounts.
    pub total_revenue: Cents,
    /// Sum of pending payment amounts.
    pub pending_revenue: Cents,
    /// Greater of `total_revenue` and the summed price of paid appointments.
    pub estimated_revenue: Cents,

    /// Distinct patients seen; only filled in for psychologists.
    pub unique_patients: usize,
    /// Patient-facing aliases of the revenue totals; zero for other roles.
    pub total_spent: Cents,
    pub pending_to_pay: Cents,

    /// Keyed by psychologist display name; only filled in for administrators.
    pub per_psychologist: BTreeMap<String, PsychologistStats>,
}

impl ReportSummary {
    /// All-zero summary, used before any window has been resolved.
    pub fn empty(role: ViewerRole) -> Self {
        Self {
            role,
            window: None,
            period_label: String::new(),
            total_appointments: 0,
            completed: 0,
            cancelled: 0,
            pending: 0,
            paid_appointments: 0,
            completed_payments: 0,
            pending_payments: 0,
            total_revenue: 0,
            pending_revenue: 0,
            estimated_revenue: 0,
            unique_patients: 0,
            total_spent: 0,
            pending_to_pay: 0,
            per_psychologist: BTreeMap::new(),
        }
    }

    /// Completed appointments as a percentage of all appointments.
    pub fn completion_rate(&self) -> f64 {
        percentage(self.completed, self.total_appointments)
    }

    /// Cancelled appointments as a percentage of all appointments.
    pub fn cancellation_rate(&self) -> f64 {
        percentage(self.cancelled, self.total_appointments)
    }

    /// Confirmed revenue divided by completed appointments, rounded to the cent.
    pub fn average_revenue_per_completed(&self) -> Cents {
        if self.completed == 0 {
            return 0;
        }
        (self.total_revenue as f64 / self.completed as f64).round() as Cents
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rates_on_empty_summary_are_zero() {
        let summary = ReportSummary::empty(ViewerRole::Admin);
        assert_eq!(summary.completion_rate(), 0.0);
        assert_eq!(summary.cancellation_rate(), 0.0);
        assert_eq!(summary.average_revenue_per_completed(), 0);
        assert!(summary.completion_rate().is_finite());
    }

    #[test]
    fn test_rates() {
        let mut summary = ReportSummary::empty(ViewerRole::Admin);
        summary.total_appointments = 4;
        summary.completed = 3;
        summary.cancelled = 1;
        summary.total_revenue = 25000;

        assert_eq!(summary.completion_rate(), 75.0);
        assert_eq!(summary.cancellation_rate(), 25.0);
        assert_eq!(summary.average_revenue_per_completed(), 8333);
    }
}
