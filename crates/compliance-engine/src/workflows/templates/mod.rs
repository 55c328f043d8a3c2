//! Policy templates and the staged renderer that resolves their markup.

mod content;
mod placeholders;
mod renderer;
mod statements;
mod tokenizer;

pub use content::{builtin_template, StaticTemplateLibrary, TemplateError, TemplateSource};
pub use placeholders::{format_long_date, NOT_ASSIGNED, NOT_PROVIDED};
pub use renderer::{
    render, render_with, unresolved_markup, RenderContext, EVIDENCE_PLACEHOLDER_PREFIX,
};
pub(crate) use renderer::{apply, guard, render_guarded, unguard, Stage};
