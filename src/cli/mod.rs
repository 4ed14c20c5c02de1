use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Args, Parser, Subcommand};

use crate::application::{ReportRequest, ReportService, ReportSummary, fetch_for_viewer};
use crate::backend::BackendClient;
use crate::config::{API_URL_ENV, DEFAULT_API_URL};
use crate::domain::validation::{RegistrationForm, UserForm, validate_form, validate_registration};
use crate::domain::{
    InvalidWindow, PeriodSelector, Timestamp, Viewer, ViewerRole, format_money, parse_date,
    parse_timestamp,
};
use crate::io::{ExportFormat, export_file_name, export_summary, render_printable, write_snapshot};

/// Consultorio - clinic reporting tool
#[derive(Parser)]
#[command(name = "consultorio")]
#[command(about = "Appointment and payment statistics for a psychology clinic")]
#[command(version)]
pub struct Cli {
    /// Backend REST API root
    #[arg(long, global = true, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show statistics for a period
    Report {
        #[command(flatten)]
        args: ReportArgs,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Write the statistics to a CSV or spreadsheet file
    Export {
        #[command(flatten)]
        args: ReportArgs,

        /// File format: csv, xls
        #[arg(long, default_value = "csv")]
        format: String,

        /// Directory the file is written to
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Render the printable report
    Print {
        #[command(flatten)]
        args: ReportArgs,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Download the viewer's records into a snapshot file
    Fetch {
        #[command(flatten)]
        viewer: ViewerArgs,

        /// Snapshot file to write
        #[arg(short, long, default_value = "snapshot.json")]
        output: PathBuf,
    },

    /// Check user form input against the field rules
    #[command(subcommand)]
    Validate(ValidateCommands),

    /// Check that the backend is reachable
    Health,
}

#[derive(Args)]
pub struct ViewerArgs {
    /// Viewer role: admin, psicologo, paciente
    #[arg(long, default_value = "admin")]
    pub role: String,

    /// Backend user id (required for psychologists and patients)
    #[arg(long)]
    pub viewer_id: Option<i64>,

    /// Name printed on reports
    #[arg(long, default_value = "")]
    pub viewer_name: String,
}

impl ViewerArgs {
    fn viewer(&self) -> Result<Viewer> {
        let role: ViewerRole = self.role.parse()?;
        Ok(Viewer::new(self.viewer_id, self.viewer_name.clone(), role))
    }
}

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub viewer: ViewerArgs,

    /// Period: today, week, month, quarter, year, custom
    #[arg(short, long, default_value = "month")]
    pub period: String,

    /// Custom period start (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Custom period end, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Read records from a snapshot file instead of the backend
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Reference time for period resolution (defaults to now)
    #[arg(long)]
    pub now: Option<String>,
}

impl ReportArgs {
    fn now(&self) -> Result<Timestamp> {
        resolve_now(self.now.as_deref())
    }

    fn request(&self, role: ViewerRole) -> Result<ReportRequest> {
        let selector = PeriodSelector::parse_lenient(&self.period);
        let start = self.from.as_deref().map(parse_date_arg).transpose()?;
        let end = self.to.as_deref().map(parse_date_arg).transpose()?;
        Ok(ReportRequest::new(role, selector).with_custom_range(start, end))
    }
}

#[derive(Subcommand)]
pub enum ValidateCommands {
    /// Validate a user created or edited by an administrator
    User {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        username: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        password: String,

        #[arg(long)]
        phone: Option<String>,

        #[arg(long)]
        specialty: Option<String>,

        /// The user is a patient (specialty not required)
        #[arg(long)]
        patient: bool,
    },

    /// Validate a patient self-registration
    Registration {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        username: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        password: String,

        #[arg(long, default_value = "")]
        confirm_password: String,

        #[arg(long)]
        accept_terms: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Report { args, format } => {
                let service = load_service(&args, &self.api_url).await?;
                let summary = build_summary(&service, &args)?;
                run_report_command(&summary, &format)?;
            }

            Commands::Export {
                args,
                format,
                output,
            } => {
                let format: ExportFormat = format.parse()?;
                let service = load_service(&args, &self.api_url).await?;
                let summary = build_summary(&service, &args)?;
                let request = args.request(service.viewer().role)?;
                let name = export_file_name(
                    summary.role,
                    request.selector,
                    args.now()?.date(),
                    format,
                );
                let path = output.join(name);
                let file = File::create(&path)
                    .with_context(|| format!("Cannot create {}", path.display()))?;
                let count = export_summary(&summary, format, BufWriter::new(file))?;
                eprintln!("Exported {} metrics to {}", count, path.display());
            }

            Commands::Print { args, output } => {
                let service = load_service(&args, &self.api_url).await?;
                let summary = build_summary(&service, &args)?;
                let text = render_printable(&summary, service.viewer(), args.now()?.date());
                match output {
                    Some(path) => {
                        std::fs::write(&path, text)
                            .with_context(|| format!("Cannot write {}", path.display()))?;
                        eprintln!("Report written to {}", path.display());
                    }
                    None => print!("{}", text),
                }
            }

            Commands::Fetch { viewer, output } => {
                let viewer = viewer.viewer()?;
                let client = BackendClient::new(&self.api_url)?;
                let records = fetch_for_viewer(&viewer, &client).await?;
                let file = File::create(&output)
                    .with_context(|| format!("Cannot create {}", output.display()))?;
                write_snapshot(&records, Local::now().naive_local(), BufWriter::new(file))?;

                println!("Saved snapshot: {}", output.display());
                println!("  Appointments: {}", records.appointments.len());
                println!("  Payments:     {}", records.payments.len());
                println!("  Skipped:      {}", records.skipped);
            }

            Commands::Validate(cmd) => run_validate_command(cmd)?,

            Commands::Health => {
                let client = BackendClient::new(&self.api_url)?;
                if client.health_check().await {
                    println!("Backend reachable: {}", client.base_url());
                } else {
                    bail!("Backend not reachable at {}", client.base_url());
                }
            }
        }

        Ok(())
    }
}

async fn load_service(args: &ReportArgs, api_url: &str) -> Result<ReportService> {
    let viewer = args.viewer.viewer()?;
    let service = match &args.snapshot {
        Some(path) => ReportService::from_snapshot(viewer, path)
            .with_context(|| format!("Cannot load snapshot {}", path.display()))?,
        None => {
            let client = BackendClient::new(api_url)?;
            ReportService::from_backend(viewer, &client).await?
        }
    };

    if service.records().skipped > 0 {
        eprintln!(
            "Warning: {} malformed record(s) were skipped",
            service.records().skipped
        );
    }
    Ok(service)
}

fn build_summary(service: &ReportService, args: &ReportArgs) -> Result<ReportSummary> {
    let request = args.request(service.viewer().role)?;
    let summary = service
        .report(&request, args.now()?)
        .context("Cannot resolve report period")?;
    Ok(summary)
}

fn run_report_command(summary: &ReportSummary, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        "csv" => {
            export_summary(summary, ExportFormat::Csv, std::io::stdout())?;
        }
        _ => print_summary_table(summary),
    }
    Ok(())
}

fn print_summary_table(summary: &ReportSummary) {
    println!("Statistics Report ({})", summary.role);
    println!("Period: {}", summary.period_label);
    println!();

    match summary.role {
        ViewerRole::Admin => {
            println!("Appointments:     {:>12}", summary.total_appointments);
            println!(
                "  Completed:      {:>12} ({:.1}%)",
                summary.completed,
                summary.completion_rate()
            );
            println!("  Pending:        {:>12}", summary.pending);
            println!(
                "  Cancelled:      {:>12} ({:.1}%)",
                summary.cancelled,
                summary.cancellation_rate()
            );
            println!("  Paid:           {:>12}", summary.paid_appointments);
            println!();
            println!("Total revenue:    {:>12}", format_money(summary.total_revenue));
            println!("Pending revenue:  {:>12}", format_money(summary.pending_revenue));
            println!("Estimated:        {:>12}", format_money(summary.estimated_revenue));

            if !summary.per_psychologist.is_empty() {
                println!();
                println!(
                    "{:<24} {:>8} {:>10} {:>14}",
                    "PSYCHOLOGIST", "TOTAL", "COMPLETED", "REVENUE"
                );
                println!("{}", "-".repeat(59));
                for (name, stats) in &summary.per_psychologist {
                    println!(
                        "{:<24} {:>8} {:>10} {:>14}",
                        name,
                        stats.total_appointments,
                        stats.completed,
                        format_money(stats.revenue)
                    );
                }
            }
        }
        ViewerRole::Psychologist => {
            println!("Appointments:     {:>12}", summary.total_appointments);
            println!("  Completed:      {:>12}", summary.completed);
            println!("  Pending:        {:>12}", summary.pending);
            println!("Unique patients:  {:>12}", summary.unique_patients);
            println!();
            println!("Total revenue:    {:>12}", format_money(summary.total_revenue));
        }
        ViewerRole::Patient => {
            println!("Sessions:         {:>12}", summary.total_appointments);
            println!("  Completed:      {:>12}", summary.completed);
            println!();
            println!("Total spent:      {:>12}", format_money(summary.total_spent));
            println!("Pending payment:  {:>12}", format_money(summary.pending_to_pay));
        }
    }
}

fn run_validate_command(cmd: ValidateCommands) -> Result<()> {
    match cmd {
        ValidateCommands::User {
            name,
            username,
            email,
            password,
            phone,
            specialty,
            patient,
        } => {
            let form = UserForm {
                name,
                username,
                email,
                password,
                phone,
                specialty,
            };
            let errors = validate_form(&form, patient);
            if errors.is_empty() {
                println!("Validation successful");
                return Ok(());
            }
            println!("Validation failed:");
            for (field, message) in &errors {
                println!("  {:<14} {}", field, message);
            }
            bail!("{} field(s) failed validation", errors.len());
        }

        ValidateCommands::Registration {
            name,
            username,
            email,
            password,
            confirm_password,
            accept_terms,
        } => {
            let form = RegistrationForm {
                name,
                username,
                email,
                password,
                confirm_password,
                accept_terms,
            };
            validate_registration(&form)?;
            println!("Validation successful");
        }
    }
    Ok(())
}

fn resolve_now(raw: Option<&str>) -> Result<Timestamp> {
    match raw {
        Some(s) => parse_timestamp(s)
            .with_context(|| format!("Invalid --now value '{}'. Use YYYY-MM-DD[THH:MM]", s)),
        None => Ok(Local::now().naive_local()),
    }
}

fn parse_date_arg(s: &str) -> Result<chrono::NaiveDate> {
    parse_date(s)
        .ok_or_else(|| InvalidWindow::InvalidDate(s.to_string()))
        .context("Date must be in YYYY-MM-DD format")
}
