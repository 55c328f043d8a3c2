//! Statement generators: `{{#KIND:arg:arg}}` markup that expands to fixed prose.

pub(crate) const GAP_ACKNOWLEDGMENT: &str = "GAP_ACKNOWLEDGMENT";
pub(crate) const REMEDIATION_COMMITMENT: &str = "REMEDIATION_COMMITMENT";

/// Expand a statement generator. Unknown kinds, wrong arity, and empty
/// arguments return `None` so the markup survives for diagnostics.
pub(crate) fn expand(kind: &str, args: &[&str]) -> Option<String> {
    if args.iter().any(|arg| arg.is_empty()) {
        return None;
    }

    match (kind, args) {
        (GAP_ACKNOWLEDGMENT, [control, timeline]) => Some(gap_acknowledgment(control, timeline)),
        (REMEDIATION_COMMITMENT, [control, priority, timeline]) => {
            Some(remediation_commitment(control, priority, timeline))
        }
        _ => None,
    }
}

fn humanize(control: &str) -> String {
    control
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn gap_acknowledgment(control: &str, timeline: &str) -> String {
    let control = humanize(control);
    format!(
        "**Gap Acknowledgment:** The organization has determined that {control} is not yet \
         fully implemented. This gap is recorded in the risk management plan, interim \
         safeguards remain in effect, and full implementation of {control} is scheduled \
         within {timeline}."
    )
}

fn remediation_commitment(control: &str, priority: &str, timeline: &str) -> String {
    let control = humanize(control);
    let priority = capitalize(priority);
    format!(
        "**Remediation Commitment ({priority} Priority):** The organization commits to \
         implementing {control} within {timeline}. Progress is tracked by the Security \
         Officer and reviewed at each periodic risk assessment."
    )
}
