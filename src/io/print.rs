use std::fmt::Write;

use chrono::NaiveDate;

use crate::application::ReportSummary;
use crate::config::CLINIC_NAME;
use crate::domain::{Viewer, ViewerRole, format_money};

const RULE_WIDTH: usize = 60;

/// Render the printable report: clinic header, the viewer's sections and a
/// confidentiality footer.
pub fn render_printable(
    summary: &ReportSummary,
    viewer: &Viewer,
    generated_on: NaiveDate,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, summary, viewer, generated_on);
    out
}

fn write_report(
    out: &mut String,
    summary: &ReportSummary,
    viewer: &Viewer,
    generated_on: NaiveDate,
) -> std::fmt::Result {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", CLINIC_NAME)?;
    writeln!(out, "Statistics report")?;
    writeln!(out, "Generated: {}", generated_on.format("%d/%m/%Y"))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out)?;
    writeln!(out, "{}: {}", role_title(viewer.role), viewer.name)?;
    writeln!(out, "Period: {}", summary.period_label)?;
    writeln!(out)?;

    match summary.role {
        ViewerRole::Admin => write_admin(out, summary)?,
        ViewerRole::Psychologist => write_psychologist(out, summary)?,
        ViewerRole::Patient => write_patient(out, summary)?,
    }

    writeln!(out)?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;
    writeln!(out, "Confidential document. For internal use of {} only.", CLINIC_NAME)?;
    Ok(())
}

fn role_title(role: ViewerRole) -> &'static str {
    match role {
        ViewerRole::Admin => "Administrator",
        ViewerRole::Psychologist => "Psychologist",
        ViewerRole::Patient => "Patient",
    }
}

fn write_admin(out: &mut String, summary: &ReportSummary) -> std::fmt::Result {
    writeln!(out, "General summary")?;
    writeln!(out, "  Total appointments:   {:>10}", summary.total_appointments)?;
    writeln!(
        out,
        "  Completed:            {:>10} ({:.1}%)",
        summary.completed,
        summary.completion_rate()
    )?;
    writeln!(out, "  Pending:              {:>10}", summary.pending)?;
    writeln!(
        out,
        "  Cancelled:            {:>10} ({:.1}%)",
        summary.cancelled,
        summary.cancellation_rate()
    )?;
    writeln!(out)?;
    writeln!(out, "Revenue")?;
    writeln!(out, "  Total revenue:        {:>14}", format_money(summary.total_revenue))?;
    writeln!(out, "  Pending revenue:      {:>14}", format_money(summary.pending_revenue))?;
    writeln!(
        out,
        "  Avg per completed:    {:>14}",
        format_money(summary.average_revenue_per_completed())
    )?;

    if !summary.per_psychologist.is_empty() {
        writeln!(out)?;
        writeln!(out, "By psychologist")?;
        writeln!(out, "  {:<24} {:>8} {:>10} {:>14}", "NAME", "TOTAL", "COMPLETED", "REVENUE")?;
        writeln!(out, "  {}", "-".repeat(RULE_WIDTH - 2))?;
        for (name, stats) in &summary.per_psychologist {
            let name = if name.is_empty() { "(unnamed)" } else { name.as_str() };
            writeln!(
                out,
                "  {:<24} {:>8} {:>10} {:>14}",
                truncate(name, 24),
                stats.total_appointments,
                stats.completed,
                format_money(stats.revenue)
            )?;
        }
    }
    Ok(())
}

fn write_psychologist(out: &mut String, summary: &ReportSummary) -> std::fmt::Result {
    writeln!(out, "My activity")?;
    writeln!(out, "  Total appointments:   {:>10}", summary.total_appointments)?;
    writeln!(
        out,
        "  Completed:            {:>10} ({:.1}%)",
        summary.completed,
        summary.completion_rate()
    )?;
    writeln!(out, "  Pending:              {:>10}", summary.pending)?;
    writeln!(out, "  Unique patients:      {:>10}", summary.unique_patients)?;
    writeln!(out)?;
    writeln!(out, "Revenue")?;
    writeln!(out, "  Total revenue:        {:>14}", format_money(summary.total_revenue))?;
    Ok(())
}

fn write_patient(out: &mut String, summary: &ReportSummary) -> std::fmt::Result {
    writeln!(out, "My sessions")?;
    writeln!(out, "  Total sessions:       {:>10}", summary.total_appointments)?;
    writeln!(out, "  Completed sessions:   {:>10}", summary.completed)?;
    writeln!(out)?;
    writeln!(out, "Payments")?;
    writeln!(out, "  Total spent:          {:>14}", format_money(summary.total_spent))?;
    writeln!(out, "  Pending payment:      {:>14}", format_money(summary.pending_to_pay))?;
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PsychologistStats;

    fn generated() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
    }

    #[test]
    fn test_admin_report_lists_psychologists() {
        let mut summary = ReportSummary::empty(ViewerRole::Admin);
        summary.period_label = "01/01/2025 - 01/02/2025".to_string();
        summary.total_revenue = 8000;
        summary.per_psychologist.insert(
            "Ana".to_string(),
            PsychologistStats {
                total_appointments: 2,
                completed: 1,
                revenue: 8000,
            },
        );
        let viewer = Viewer::new(Some(1), "Admin", ViewerRole::Admin);

        let text = render_printable(&summary, &viewer, generated());
        assert!(text.contains(CLINIC_NAME));
        assert!(text.contains("Generated: 31/01/2025"));
        assert!(text.contains("Period: 01/01/2025 - 01/02/2025"));
        assert!(text.contains("By psychologist"));
        assert!(text.contains("Ana"));
        assert!(text.contains("S/ 80.00"));
        assert!(text.contains("Confidential document"));
    }

    #[test]
    fn test_patient_report_has_no_revenue_table() {
        let mut summary = ReportSummary::empty(ViewerRole::Patient);
        summary.total_spent = 16000;
        let viewer = Viewer::new(Some(7), "María", ViewerRole::Patient);

        let text = render_printable(&summary, &viewer, generated());
        assert!(text.contains("Patient: María"));
        assert!(text.contains("S/ 160.00"));
        assert!(!text.contains("By psychologist"));
        assert!(!text.contains("Total revenue"));
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("Ana", 24), "Ana");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
