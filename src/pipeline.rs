//! End-to-end helpers: upload → enriched records → teams → report.

use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::assign::assign_teams_seeded;
use crate::email::{self, DispatchReport, Outbox, OutgoingEmail};
use crate::enrich::parse_participants;
use crate::error::{HackathonError, Result};
use crate::io::excel_read::{self, SheetRows};
use crate::io::excel_write;
use crate::model::{Assignment, Participant};
use crate::report::{ReportLabels, build_report};
use crate::settings::Settings;

/// Per-run knobs that do not belong in the settings file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Seed for the shuffle; a fresh OS seed is used when absent.
    pub seed: Option<u64>,
    pub labels: ReportLabels,
}

/// Everything produced by one upload.
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub assignment: Assignment,
    /// Upload columns shown on the `General` sheet.
    pub columns: Vec<String>,
    /// The `.xlsx` report.
    pub report: Vec<u8>,
}

/// Enriches, assigns and reports on an already-read worksheet.
#[instrument(level = "info", skip_all, fields(rows = sheet.rows.len()))]
pub fn process_sheet(
    sheet: &SheetRows,
    settings: &Settings,
    options: &RunOptions,
) -> Result<UploadOutcome> {
    let parsed = parse_participants(&sheet.headers, &sheet.rows);
    info!(participant_count = parsed.participants.len(), "parsed participants");

    let mut assignment = assign_teams_seeded(
        parsed.participants,
        &settings.assignment,
        &settings.teams.display_names(),
        options.seed,
    );
    assignment.teams = settings.teams.apply(assignment.teams);

    let document = build_report(
        &assignment.participants,
        &assignment.teams,
        &parsed.columns,
        &options.labels,
    );
    let report = excel_write::workbook_bytes(&document)?;
    debug!(bytes = report.len(), "report rendered");

    Ok(UploadOutcome {
        assignment,
        columns: parsed.columns,
        report,
    })
}

/// Processes an upload received as raw `.xlsx` bytes.
pub fn process_upload(
    bytes: &[u8],
    settings: &Settings,
    options: &RunOptions,
) -> Result<UploadOutcome> {
    let sheet = excel_read::read_rows_from_bytes(bytes)?;
    process_sheet(&sheet, settings, options)
}

/// Reads the upload at `input` and writes the report to `output`.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display())
)]
pub fn assign_file(
    input: &Path,
    output: &Path,
    settings: &Settings,
    options: &RunOptions,
) -> Result<UploadOutcome> {
    if !input.exists() {
        return Err(HackathonError::MissingInput(input.to_path_buf()));
    }
    let sheet = excel_read::read_rows(input)?;
    let outcome = process_sheet(&sheet, settings, options)?;
    fs::write(output, &outcome.report)?;
    Ok(outcome)
}

/// Re-exports the report for participants that already carry placements,
/// rebuilding every team from the roster.
#[instrument(level = "info", skip_all, fields(participants = participants.len()))]
pub fn export_report(
    participants: Vec<Participant>,
    settings: &Settings,
    labels: &ReportLabels,
) -> Result<(Assignment, Vec<u8>)> {
    let assignment = settings
        .teams
        .regroup(participants, settings.assignment.max_teams);
    let document = build_report(&assignment.participants, &assignment.teams, &[], labels);
    let report = excel_write::workbook_bytes(&document)?;
    Ok((assignment, report))
}

/// Composes the confirmation emails for every participant of the upload at
/// `input`, without delivering them.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn preview_emails(
    input: &Path,
    settings: &Settings,
    requested_sender: Option<&str>,
) -> Result<(Vec<OutgoingEmail>, DispatchReport)> {
    if !input.exists() {
        return Err(HackathonError::MissingInput(input.to_path_buf()));
    }
    let sheet = excel_read::read_rows(input)?;
    let parsed = parse_participants(&sheet.headers, &sheet.rows);
    let sender = email::resolve_sender(
        requested_sender,
        &settings.mail.allowed_senders,
        &settings.mail.default_sender,
    );

    let mut outbox = Outbox::default();
    let (_, report) = email::dispatch(parsed.participants, &sender, &mut outbox);
    Ok((outbox.messages, report))
}
