pub mod breach;
pub mod documents;
pub mod evidence;
pub mod questionnaire;
pub mod templates;
