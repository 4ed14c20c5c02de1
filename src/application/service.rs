use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::backend::{BackendClient, RecordEndpoints};
use crate::domain::{Timestamp, Viewer};
use crate::io::{RecordSet, load_snapshot};

use super::{AppError, ReportRequest, ReportSummary, build_report};

/// Application service behind every dashboard's report panel.
///
/// Holds the current record snapshot and the last summary it produced. The
/// aggregation itself is stateless; the retained summary only exists so an
/// incomplete custom period can keep showing the previous numbers.
pub struct ReportService {
    viewer: Viewer,
    records: RecordSet,
    last: Option<ReportSummary>,
}

impl ReportService {
    /// Create a service over records already scoped to `viewer`.
    pub fn new(viewer: Viewer, records: RecordSet) -> Self {
        Self {
            viewer,
            records,
            last: None,
        }
    }

    /// Load records from a snapshot file written by `fetch`.
    pub fn from_snapshot(viewer: Viewer, path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)?;
        let records = load_snapshot(BufReader::new(file))?;
        Ok(Self::new(viewer, records))
    }

    /// Fetch the viewer's records from the backend.
    pub async fn from_backend(viewer: Viewer, client: &BackendClient) -> Result<Self, AppError> {
        let records = fetch_for_viewer(&viewer, client).await?;
        Ok(Self::new(viewer, records))
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    /// Swap in freshly fetched records. The last summary is kept until the
    /// next `apply`.
    pub fn replace_records(&mut self, records: RecordSet) {
        self.records = records;
    }

    /// Last summary produced by `apply`, if any.
    pub fn last_summary(&self) -> Option<&ReportSummary> {
        self.last.as_ref()
    }

    /// Compute a summary for `request`, failing on an unusable window.
    pub fn report(
        &self,
        request: &ReportRequest,
        now: Timestamp,
    ) -> Result<ReportSummary, AppError> {
        Ok(build_report(
            &self.records.appointments,
            &self.records.payments,
            request,
            now,
        )?)
    }

    /// Recompute after a filter change.
    ///
    /// An invalid window (a custom period missing a date) does not replace
    /// anything: the previous summary stays, or an all-zero one if there is
    /// none yet.
    pub fn apply(&mut self, request: &ReportRequest, now: Timestamp) -> &ReportSummary {
        match self.report(request, now) {
            Ok(summary) => {
                self.last = Some(summary);
            }
            Err(e) => {
                tracing::debug!(error = %e, "keeping previous summary");
            }
        }
        self.last.get_or_insert_with(|| ReportSummary::empty(request.role))
    }
}

/// Fetch the appointments and payments `viewer` is allowed to see.
pub async fn fetch_for_viewer(
    viewer: &Viewer,
    client: &BackendClient,
) -> Result<RecordSet, AppError> {
    let endpoints = RecordEndpoints::for_viewer(viewer.role, viewer.id)
        .ok_or_else(|| AppError::MissingViewerId(viewer.role.to_string()))?;
    Ok(client.fetch_records(&endpoints).await?)
}
