use std::fmt::Write;

use serde::Serialize;

use super::domain::{EvidencePriority, EvidenceRecord};
use super::injection::{EvidenceInjector, EvidenceValidation};
use crate::workflows::documents::PolicyId;
use crate::workflows::templates::format_long_date;

/// Ordered keyword table for evidence codes. First match wins.
const CODE_PREFIXES: &[(&[&str], &str)] = &[
    (&["privacy officer"], "EV-PO"),
    (&["security officer"], "EV-SO"),
    (&["training"], "EV-TR"),
    (&["risk"], "EV-RA"),
    (&["business associate", "baa"], "EV-BA"),
    (&["incident", "breach"], "EV-IR"),
    (&["backup"], "EV-BK"),
    (&["disaster", "contingency"], "EV-CP"),
    (&["encryption"], "EV-EN"),
    (&["mfa", "access"], "EV-AC"),
    (&["audit", "log"], "EV-AL"),
    (&["sanction"], "EV-SN"),
    (&["device", "inventory"], "EV-DI"),
    (&["privacy practices", "policy"], "EV-PL"),
];

const GENERIC_PREFIX: &str = "EV-GN";

/// Heuristic evidence code: a keyword-derived prefix plus a zero-padded
/// sequence number.
pub fn generate_evidence_id(title: &str, sequence: u32) -> String {
    let title = title.to_lowercase();
    let prefix = CODE_PREFIXES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| title.contains(keyword)))
        .map(|(_, prefix)| *prefix)
        .unwrap_or(GENERIC_PREFIX);
    format!("{prefix}-{sequence:03}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegisterStatus {
    #[serde(rename = "On File")]
    OnFile,
    #[serde(rename = "Missing")]
    Missing,
}

impl RegisterStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RegisterStatus::OnFile => "On File",
            RegisterStatus::Missing => "Missing",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterEntry {
    pub code: String,
    pub evidence_id: String,
    pub name: String,
    pub priority: EvidencePriority,
    pub status: RegisterStatus,
    pub record_title: Option<String>,
    pub file_name: Option<String>,
    pub uploaded_on: Option<String>,
    pub retention_years: Option<u8>,
}

/// One row per evidence kind the policy references, in mapping order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceRegister {
    pub policy: PolicyId,
    pub entries: Vec<RegisterEntry>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegisterExportError {
    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("csv output was not valid utf-8")]
    Encoding,
}

impl EvidenceRegister {
    pub fn build(
        injector: &EvidenceInjector,
        policy: PolicyId,
        evidence: &[EvidenceRecord],
    ) -> Self {
        let mut entries: Vec<RegisterEntry> = Vec::new();
        let points = injector
            .map()
            .get(policy)
            .into_iter()
            .flat_map(|mapping| mapping.points());

        for point in points {
            if let Some(existing) = entries
                .iter_mut()
                .find(|entry| entry.evidence_id == point.evidence_id)
            {
                existing.priority = existing.priority.min(point.priority);
                continue;
            }

            let field = injector.catalog().get(&point.evidence_id);
            let name = field
                .map(|field| field.name.to_string())
                .unwrap_or_else(|| point.evidence_id.clone());
            let record = injector.find_by_id(&point.evidence_id, evidence);
            let sequence = entries.len() as u32 + 1;

            // On-file records are coded by their own title.
            let coded_title = record.map(|record| record.title.as_str()).unwrap_or(&name);
            entries.push(RegisterEntry {
                code: generate_evidence_id(coded_title, sequence),
                evidence_id: point.evidence_id.clone(),
                name,
                priority: point.priority,
                status: if record.is_some() {
                    RegisterStatus::OnFile
                } else {
                    RegisterStatus::Missing
                },
                record_title: record.map(|record| record.title.clone()),
                file_name: record.and_then(|record| record.file_name.clone()),
                uploaded_on: record.map(|record| format_long_date(record.uploaded_at.date_naive())),
                retention_years: field.map(|field| field.retention_years),
            });
        }

        Self { policy, entries }
    }

    pub fn on_file(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.status == RegisterStatus::OnFile)
            .count()
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "| Code | Evidence | Priority | Status | Record | Uploaded |");
        let _ = writeln!(output, "|------|----------|----------|--------|--------|----------|");
        for entry in &self.entries {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} |",
                entry.code,
                table_cell(&entry.name),
                entry.priority.label(),
                entry.status.label(),
                table_cell(entry.record_title.as_deref().unwrap_or("-")),
                entry.uploaded_on.as_deref().unwrap_or("-"),
            );
        }
        output
    }

    pub fn to_csv(&self) -> Result<String, RegisterExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "code",
            "evidence_id",
            "name",
            "priority",
            "status",
            "record_title",
            "file_name",
            "uploaded_on",
            "retention_years",
        ])?;
        for entry in &self.entries {
            let retention = entry
                .retention_years
                .map(|years| years.to_string())
                .unwrap_or_default();
            writer.write_record([
                entry.code.as_str(),
                entry.evidence_id.as_str(),
                entry.name.as_str(),
                entry.priority.label(),
                entry.status.label(),
                entry.record_title.as_deref().unwrap_or(""),
                entry.file_name.as_deref().unwrap_or(""),
                entry.uploaded_on.as_deref().unwrap_or(""),
                retention.as_str(),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|error| RegisterExportError::Csv(error.into_error().into()))?;
        String::from_utf8(bytes).map_err(|_| RegisterExportError::Encoding)
    }
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

pub const EVIDENCE_SUMMARY_HEADING: &str = "## Evidence Summary";

/// Closing section appended to a generated policy.
pub fn summary_section(validation: &EvidenceValidation, register: &EvidenceRegister) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{EVIDENCE_SUMMARY_HEADING}");
    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "- High-priority coverage: {}% ({} of {})",
        validation.coverage_percent, validation.required_present, validation.required_total
    );
    let _ = writeln!(
        output,
        "- Evidence on file: {} of {}",
        register.on_file(),
        register.entries.len()
    );

    let missing: Vec<&str> = register
        .entries
        .iter()
        .filter(|entry| {
            entry.status == RegisterStatus::Missing && entry.priority != EvidencePriority::Low
        })
        .map(|entry| entry.name.as_str())
        .collect();
    if missing.is_empty() {
        let _ = writeln!(output, "- Outstanding evidence: none");
    } else {
        let _ = writeln!(output, "- Outstanding evidence: {}", missing.join(", "));
    }

    if !register.entries.is_empty() {
        let _ = writeln!(output);
        output.push_str(&register.to_markdown());
    }
    output
}
