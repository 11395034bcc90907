//! Scene template registry port definition.

use crate::domain::template::{SceneTemplate, TemplateSummary};

/// Read-only registry of scene presets.
///
/// Absence is signaled with `None`; lookup has no other failure mode.
pub trait TemplateStore {
    /// All presets, ordered by key.
    fn list(&self) -> Vec<TemplateSummary>;

    /// Look up one preset by its key.
    fn get(&self, key: &str) -> Option<SceneTemplate>;
}
