use std::collections::BTreeMap;

use super::placeholders::{organization_condition, organization_placeholder};
use super::statements;
use super::tokenizer::{parse, tokenize, Node, Token};
use crate::workflows::documents::OrganizationData;
use crate::workflows::questionnaire::ComplianceState;

/// Name prefix reserved for document-level evidence references. Those are
/// resolved by the evidence injector, not by the renderer.
pub const EVIDENCE_PLACEHOLDER_PREFIX: &str = "Evidence:";

/// Stand-in for `{` inside substituted values. Later passes cannot read
/// markup out of data, and [`unguard`] restores the braces once every pass
/// has run.
const GUARDED_BRACE: &str = "\u{E000}";

/// Mark a substituted value as opaque text.
pub(crate) fn guard(value: &str) -> String {
    value.replace('{', GUARDED_BRACE)
}

pub(crate) fn unguard(text: &str) -> String {
    text.replace(GUARDED_BRACE, "{")
}

/// One resolution pass over the template. Anything a stage does not
/// recognise is written back verbatim for the following stages.
pub(crate) trait Stage {
    fn condition(&self, _name: &str) -> Option<bool> {
        None
    }

    fn placeholder(&self, _name: &str) -> Option<String> {
        None
    }

    fn statement(&self, _kind: &str, _args: &[&str]) -> Option<String> {
        None
    }
}

pub(crate) fn apply(input: &str, stage: &impl Stage) -> String {
    let nodes = parse(input);
    let mut output = String::with_capacity(input.len());
    write_nodes(&nodes, stage, &mut output);
    output
}

fn write_nodes(nodes: &[Node<'_>], stage: &impl Stage, output: &mut String) {
    for node in nodes {
        match node {
            Node::Token(Token::Placeholder { raw, name }) => match stage.placeholder(name) {
                Some(value) => output.push_str(&value),
                None => output.push_str(raw),
            },
            Node::Token(Token::Statement { raw, kind, args }) => {
                match stage.statement(kind, args) {
                    Some(prose) => output.push_str(&prose),
                    None => output.push_str(raw),
                }
            }
            Node::Token(token) => output.push_str(token.raw()),
            Node::Block(block) => match stage.condition(block.condition) {
                Some(present) => {
                    if present != block.negated {
                        write_nodes(&block.children, stage, output);
                    }
                }
                None => {
                    output.push_str(block.open);
                    write_nodes(&block.children, stage, output);
                    output.push_str(block.close);
                }
            },
        }
    }
}

/// Inputs available to a single render: organization facts, the optional
/// compliance state, and caller-supplied extras for document kinds that need
/// more than the organization record (breach letters, for example).
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub organization: &'a OrganizationData,
    pub state: Option<&'a ComplianceState>,
    pub values: BTreeMap<String, String>,
    pub flags: BTreeMap<String, bool>,
}

impl<'a> RenderContext<'a> {
    pub fn new(organization: &'a OrganizationData) -> Self {
        Self {
            organization,
            state: None,
            values: BTreeMap::new(),
            flags: BTreeMap::new(),
        }
    }

    pub fn with_state(mut self, state: Option<&'a ComplianceState>) -> Self {
        self.state = state;
        self
    }

    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn with_flag(mut self, name: impl Into<String>, value: bool) -> Self {
        self.flags.insert(name.into(), value);
        self
    }
}

struct OrganizationConditions<'c, 'a>(&'c RenderContext<'a>);

impl Stage for OrganizationConditions<'_, '_> {
    fn condition(&self, name: &str) -> Option<bool> {
        self.0
            .flags
            .get(name)
            .copied()
            .or_else(|| organization_condition(self.0.organization, name))
    }
}

struct OrganizationPlaceholders<'c, 'a>(&'c RenderContext<'a>);

impl Stage for OrganizationPlaceholders<'_, '_> {
    fn placeholder(&self, name: &str) -> Option<String> {
        self.0
            .values
            .get(name)
            .cloned()
            .or_else(|| organization_placeholder(self.0.organization, name))
            .map(|value| guard(&value))
    }
}

struct StateConditions<'s>(&'s ComplianceState);

impl Stage for StateConditions<'_> {
    fn condition(&self, name: &str) -> Option<bool> {
        self.0
            .field(&name.to_ascii_lowercase())
            .map(|value| !value.is_missing())
    }
}

struct StatementGenerators;

impl Stage for StatementGenerators {
    fn statement(&self, kind: &str, args: &[&str]) -> Option<String> {
        statements::expand(kind, args)
    }
}

struct NumericPlaceholders<'s>(&'s ComplianceState);

impl Stage for NumericPlaceholders<'_> {
    fn placeholder(&self, name: &str) -> Option<String> {
        self.0
            .field(name)
            .and_then(|value| value.as_number())
            .map(|number| number.to_string())
    }
}

/// Render a template against organization facts and an optional compliance
/// state. Condition names no stage recognises are left in place.
pub fn render(
    template: &str,
    organization: &OrganizationData,
    state: Option<&ComplianceState>,
) -> String {
    render_with(template, &RenderContext::new(organization).with_state(state))
}

pub fn render_with(template: &str, context: &RenderContext<'_>) -> String {
    unguard(&render_guarded(template, context))
}

/// Render without restoring substituted braces, for callers that run further
/// markup passes over the result.
pub(crate) fn render_guarded(template: &str, context: &RenderContext<'_>) -> String {
    let mut text = apply(template, &OrganizationConditions(context));
    text = apply(&text, &OrganizationPlaceholders(context));
    if let Some(state) = context.state {
        text = apply(&text, &StateConditions(state));
    }
    text = apply(&text, &StatementGenerators);
    if let Some(state) = context.state {
        text = apply(&text, &NumericPlaceholders(state));
    }
    collapse_blank_lines(&text)
}

/// Markup that survived rendering, excluding evidence references.
pub fn unresolved_markup(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|token| match token {
            Token::Text(_) => false,
            Token::Placeholder { name, .. } => !name.starts_with(EVIDENCE_PLACEHOLDER_PREFIX),
            _ => true,
        })
        .map(|token| token.raw().to_string())
        .collect()
}

fn collapse_blank_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut newlines = 0;
    for ch in text.chars() {
        if ch == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        output.push(ch);
    }
    output
}
