//! Templates command: list the bundled scene presets.

use crate::app::AppContext;
use crate::domain::template::TemplateSummary;
use crate::ports::{CredentialStore, TemplateStore};

/// Execute the templates command.
pub fn execute<T: TemplateStore, C: CredentialStore>(ctx: &AppContext<T, C>) -> Vec<TemplateSummary> {
    ctx.templates().list()
}
