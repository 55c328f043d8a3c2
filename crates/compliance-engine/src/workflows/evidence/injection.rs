use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use super::catalog::EvidenceCatalog;
use super::domain::{EvidencePriority, EvidenceRecord};
use super::mapping::{
    DateField, EvidenceInjectionPoint, InjectionPosition, InjectionType, PolicyEvidenceMap,
};
use crate::workflows::documents::PolicyId;
use crate::workflows::templates::{
    apply, format_long_date, guard, unguard, Stage, EVIDENCE_PLACEHOLDER_PREFIX,
};

pub const EVIDENCE_REFERENCES_HEADING: &str = "## Evidence References";
pub const EVIDENCE_APPENDIX_HEADING: &str = "## Appendix: Supporting Evidence";

/// Completeness of the high-priority evidence for one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceValidation {
    pub policy: PolicyId,
    pub can_generate: bool,
    pub missing_high_priority: Vec<String>,
    pub missing_medium_priority: Vec<String>,
    pub coverage_percent: u8,
    pub required_total: usize,
    pub required_present: usize,
}

/// Resolves evidence references inside rendered policy text.
#[derive(Debug, Clone)]
pub struct EvidenceInjector {
    catalog: Arc<EvidenceCatalog>,
    map: Arc<PolicyEvidenceMap>,
}

impl EvidenceInjector {
    pub fn new(catalog: Arc<EvidenceCatalog>, map: Arc<PolicyEvidenceMap>) -> Self {
        Self { catalog, map }
    }

    pub fn catalog(&self) -> &EvidenceCatalog {
        &self.catalog
    }

    pub fn map(&self) -> &PolicyEvidenceMap {
        &self.map
    }

    /// Insert the policy's evidence lines into `document` and resolve every
    /// `{{Evidence: ...}}` reference. Missing evidence is rendered as a
    /// visible gap, never an error.
    pub fn inject(&self, document: &str, policy: PolicyId, evidence: &[EvidenceRecord]) -> String {
        unguard(&self.inject_guarded(document, policy, evidence))
    }

    /// [`EvidenceInjector::inject`] over renderer output whose substituted
    /// values are still guarded. Record titles are guarded the same way.
    pub(crate) fn inject_guarded(
        &self,
        document: &str,
        policy: PolicyId,
        evidence: &[EvidenceRecord],
    ) -> String {
        let lines: Vec<&str> = document.lines().collect();
        let headings = headings(&lines);

        let mut after_line: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut before_line: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        let mut unplaced: Vec<(&str, Vec<String>)> = Vec::new();
        let mut appendix: Vec<String> = Vec::new();

        if let Some(mapping) = self.map.get(policy) {
            for section in &mapping.sections {
                let located = headings
                    .iter()
                    .position(|heading| heading.title.eq_ignore_ascii_case(section.title.trim()));
                let mut orphaned = Vec::new();

                for point in &section.injection_points {
                    let line = self.resolve_fragment(point, evidence);
                    if point.injection_type == InjectionType::Appendix {
                        appendix.push(format!("- {line}"));
                        continue;
                    }
                    match (located, point.position) {
                        (Some(index), InjectionPosition::AfterHeading) => {
                            after_line.entry(headings[index].line).or_default().push(line);
                        }
                        (Some(index), InjectionPosition::EndOfSection) => {
                            let end = section_end(&headings, index, lines.len());
                            before_line.entry(end).or_default().push(line);
                        }
                        (None, _) => orphaned.push(line),
                    }
                }

                if !orphaned.is_empty() {
                    unplaced.push((section.title.as_str(), orphaned));
                }
            }
        }

        let mut output: Vec<String> = Vec::with_capacity(lines.len() + 16);
        for (index, line) in lines.iter().enumerate() {
            if let Some(block) = before_line.get(&index) {
                push_block(&mut output, block);
            }
            if line.trim().is_empty() && output.last().is_some_and(|last| last.is_empty()) {
                continue;
            }
            output.push((*line).to_string());
            if let Some(block) = after_line.get(&index) {
                push_block(&mut output, block);
            }
        }
        if let Some(block) = before_line.get(&lines.len()) {
            push_block(&mut output, block);
        }

        if !unplaced.is_empty() {
            push_heading(&mut output, EVIDENCE_REFERENCES_HEADING);
            for (title, block) in unplaced {
                if output.last().map(|line| !line.trim().is_empty()).unwrap_or(false) {
                    output.push(String::new());
                }
                output.push(format!("### {title}"));
                output.extend(block);
            }
        }

        if !appendix.is_empty() {
            push_heading(&mut output, EVIDENCE_APPENDIX_HEADING);
            output.extend(appendix);
        }

        let mut text = output.join("\n");
        if document.ends_with('\n') {
            text.push('\n');
        }

        apply(&text, &self.stage(evidence, DateField::UploadedAt))
    }

    /// Coverage over high-priority injection points, counted once per id.
    pub fn validate(&self, policy: PolicyId, evidence: &[EvidenceRecord]) -> EvidenceValidation {
        let mut high: BTreeSet<&str> = BTreeSet::new();
        let mut medium: BTreeSet<&str> = BTreeSet::new();
        let mut ordered_high = Vec::new();
        let mut ordered_medium = Vec::new();

        for point in self.map.get(policy).into_iter().flat_map(|mapping| mapping.points()) {
            let id = point.evidence_id.as_str();
            match point.priority {
                EvidencePriority::High => {
                    if high.insert(id) {
                        ordered_high.push(id);
                    }
                }
                EvidencePriority::Medium => {
                    if medium.insert(id) {
                        ordered_medium.push(id);
                    }
                }
                EvidencePriority::Low => {}
            }
        }
        ordered_medium.retain(|id| !high.contains(id));

        let missing = |ids: &[&str]| -> Vec<String> {
            ids.iter()
                .filter(|id| self.find_by_id(id, evidence).is_none())
                .map(|id| id.to_string())
                .collect()
        };
        let missing_high_priority = missing(&ordered_high);
        let missing_medium_priority = missing(&ordered_medium);

        let required_total = ordered_high.len();
        let required_present = required_total - missing_high_priority.len();
        let coverage_percent = if required_total == 0 {
            100
        } else {
            ((required_present as f64 * 100.0) / required_total as f64).round() as u8
        };

        EvidenceValidation {
            policy,
            can_generate: missing_high_priority.is_empty(),
            missing_high_priority,
            missing_medium_priority,
            coverage_percent,
            required_total,
            required_present,
        }
    }

    /// Most recent record uploaded for a catalog id, falling back to a name
    /// match on the catalog display name.
    pub fn find_by_id<'r>(
        &self,
        evidence_id: &str,
        evidence: &'r [EvidenceRecord],
    ) -> Option<&'r EvidenceRecord> {
        let name = self
            .catalog
            .get(evidence_id)
            .map(|field| field.name)
            .unwrap_or(evidence_id);
        find_record(evidence, Some(evidence_id), name)
    }

    fn find_by_name<'r>(
        &self,
        name: &str,
        evidence: &'r [EvidenceRecord],
    ) -> Option<&'r EvidenceRecord> {
        let field_id = self.catalog.by_name(name).map(|field| field.id);
        find_record(evidence, field_id, name)
    }

    fn resolve_fragment(
        &self,
        point: &EvidenceInjectionPoint,
        evidence: &[EvidenceRecord],
    ) -> String {
        let date_field = point.date_field.unwrap_or(DateField::UploadedAt);
        apply(&point.template_fragment, &self.stage(evidence, date_field))
    }

    fn stage<'s>(
        &'s self,
        evidence: &'s [EvidenceRecord],
        date_field: DateField,
    ) -> EvidenceStage<'s> {
        EvidenceStage {
            injector: self,
            evidence,
            date_field,
        }
    }
}

struct EvidenceStage<'s> {
    injector: &'s EvidenceInjector,
    evidence: &'s [EvidenceRecord],
    date_field: DateField,
}

impl Stage for EvidenceStage<'_> {
    fn placeholder(&self, name: &str) -> Option<String> {
        let expected = name.strip_prefix(EVIDENCE_PLACEHOLDER_PREFIX)?.trim();
        if expected.is_empty() {
            return None;
        }
        let line = match self.injector.find_by_name(expected, self.evidence) {
            Some(record) => reference_line(record, self.date_field),
            None => missing_line(expected),
        };
        Some(line)
    }
}

pub(crate) fn reference_line(record: &EvidenceRecord, date_field: DateField) -> String {
    let mut line = guard(record.title.trim());
    if let Some(file_name) = record.file_name.as_deref().filter(|name| !name.trim().is_empty()) {
        line.push_str(&format!(" ({})", guard(file_name.trim())));
    }
    line.push_str(&format!(
        ", uploaded {}",
        format_long_date(record.uploaded_at.date_naive())
    ));
    match (record.attested_at, date_field) {
        (Some(attested), _) => line.push_str(&format!(
            ", attested {}",
            format_long_date(attested.date_naive())
        )),
        (None, DateField::AttestedAt) => line.push_str(", attestation pending"),
        (None, DateField::UploadedAt) => {}
    }
    line
}

pub(crate) fn missing_line(name: &str) -> String {
    format!("Evidence Required: {name} — not found")
}

pub(crate) fn find_record<'r>(
    evidence: &'r [EvidenceRecord],
    field_id: Option<&str>,
    name: &str,
) -> Option<&'r EvidenceRecord> {
    let latest = |candidates: Vec<&'r EvidenceRecord>| {
        candidates
            .into_iter()
            .max_by_key(|record| record.uploaded_at)
    };

    if let Some(field_id) = field_id {
        let by_field: Vec<_> = evidence
            .iter()
            .filter(|record| record.field_id.as_deref() == Some(field_id))
            .collect();
        if !by_field.is_empty() {
            return latest(by_field);
        }
    }

    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    let by_name = |matches: &dyn Fn(&str) -> bool| {
        let candidates: Vec<_> = evidence
            .iter()
            .filter(|record| {
                matches(record.title.as_str())
                    || record.file_name.as_deref().is_some_and(matches)
            })
            .collect();
        latest(candidates)
    };

    by_name(&|candidate: &str| candidate.trim().to_lowercase() == wanted).or_else(|| {
        by_name(&|candidate: &str| {
            let candidate = candidate.trim().to_lowercase();
            !candidate.is_empty() && candidate.contains(&wanted)
        })
    })
}

struct Heading<'a> {
    line: usize,
    level: usize,
    title: &'a str,
}

fn headings<'a>(lines: &[&'a str]) -> Vec<Heading<'a>> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(line, text)| {
            let trimmed = text.trim_start();
            let level = trimmed.chars().take_while(|ch| *ch == '#').count();
            if level == 0 || level > 6 {
                return None;
            }
            let rest = &trimmed[level..];
            if !rest.starts_with(' ') {
                return None;
            }
            Some(Heading {
                line,
                level,
                title: rest.trim(),
            })
        })
        .collect()
}

/// Index of the first line after the section: the next heading at the same
/// or a higher level, or the end of the document. Trailing blank lines stay
/// after inserted content.
fn section_end(headings: &[Heading<'_>], index: usize, total_lines: usize) -> usize {
    let level = headings[index].level;
    headings[index + 1..]
        .iter()
        .find(|heading| heading.level <= level)
        .map(|heading| heading.line)
        .unwrap_or(total_lines)
}

fn push_block(output: &mut Vec<String>, block: &[String]) {
    if output.last().map(|line| !line.trim().is_empty()).unwrap_or(false) {
        output.push(String::new());
    }
    output.extend(block.iter().cloned());
    output.push(String::new());
}

fn push_heading(output: &mut Vec<String>, heading: &str) {
    if output.last().map(|line| !line.trim().is_empty()).unwrap_or(false) {
        output.push(String::new());
    }
    output.push(heading.to_string());
    output.push(String::new());
}
