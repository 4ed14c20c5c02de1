use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Appointment, AppointmentState, Cents, InvalidWindow, Payment, PaymentStatus, PeriodSelector,
    TimeWindow, Timestamp, ViewerRole, filter_by_window, resolve_time_window,
};

use super::{PsychologistStats, ReportSummary};

/// Filter parameters a dashboard sends when it wants a fresh summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub role: ViewerRole,
    pub selector: PeriodSelector,
    pub custom_start: Option<NaiveDate>,
    pub custom_end: Option<NaiveDate>,
}

impl ReportRequest {
    pub fn new(role: ViewerRole, selector: PeriodSelector) -> Self {
        Self {
            role,
            selector,
            custom_start: None,
            custom_end: None,
        }
    }

    pub fn with_custom_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.custom_start = start;
        self.custom_end = end;
        self
    }

    pub fn resolve_window(&self, now: Timestamp) -> Result<TimeWindow, InvalidWindow> {
        resolve_time_window(self.selector, now, self.custom_start, self.custom_end)
    }
}

/// Roll filtered appointments and payments up into a summary.
///
/// Only the records handed in are counted; callers filter by window first.
/// Empty input yields an all-zero summary that still carries the period label.
pub fn summarize<'a>(
    appointments: impl IntoIterator<Item = &'a Appointment>,
    payments: impl IntoIterator<Item = &'a Payment>,
    role: ViewerRole,
    window: &TimeWindow,
) -> ReportSummary {
    let mut summary = ReportSummary::empty(role);
    summary.window = Some(*window);
    summary.period_label = window.label();

    let mut patients = HashSet::new();
    let mut paid_price_total: Cents = 0;
    let mut per_psychologist: BTreeMap<String, PsychologistStats> = BTreeMap::new();

    for appointment in appointments {
        summary.total_appointments += 1;
        match appointment.state {
            AppointmentState::Completed => summary.completed += 1,
            AppointmentState::Cancelled => summary.cancelled += 1,
            AppointmentState::Reserved => summary.pending += 1,
        }
        if appointment.paid {
            summary.paid_appointments += 1;
            paid_price_total = paid_price_total.saturating_add(appointment.price);
        }
        patients.insert(appointment.patient_id);

        if role == ViewerRole::Admin {
            let stats = per_psychologist
                .entry(appointment.psychologist_key().to_string())
                .or_default();
            stats.total_appointments += 1;
            if appointment.is_completed() {
                stats.completed += 1;
            }
        }
    }

    for payment in payments {
        match payment.status {
            PaymentStatus::Completed => {
                summary.completed_payments += 1;
                summary.total_revenue = summary.total_revenue.saturating_add(payment.amount);
                // Revenue only lands on psychologists that have appointments in
                // the window.
                if let Some(stats) = per_psychologist.get_mut(payment.psychologist_key()) {
                    stats.revenue = stats.revenue.saturating_add(payment.amount);
                }
            }
            PaymentStatus::Pending => {
                summary.pending_payments += 1;
                summary.pending_revenue = summary.pending_revenue.saturating_add(payment.amount);
            }
            PaymentStatus::Failed | PaymentStatus::Refunded => {}
        }
    }

    summary.estimated_revenue = summary.total_revenue.max(paid_price_total);

    match role {
        ViewerRole::Admin => summary.per_psychologist = per_psychologist,
        ViewerRole::Psychologist => summary.unique_patients = patients.len(),
        ViewerRole::Patient => {
            summary.total_spent = summary.total_revenue;
            summary.pending_to_pay = summary.pending_revenue;
        }
    }

    summary
}

/// Resolve the request's window against `now`, filter both record sets and
/// summarize them.
pub fn build_report(
    appointments: &[Appointment],
    payments: &[Payment],
    request: &ReportRequest,
    now: Timestamp,
) -> Result<ReportSummary, InvalidWindow> {
    let window = request.resolve_window(now)?;

    let appointments = filter_by_window(appointments, &window, |a| a.scheduled_at);
    let payments = filter_by_window(payments, &window, |p| p.paid_at);

    tracing::debug!(
        role = %request.role,
        selector = %request.selector,
        period = %window.label(),
        appointments = appointments.len(),
        payments = payments.len(),
        "summarizing window"
    );

    Ok(summarize(appointments, payments, request.role, &window))
}
