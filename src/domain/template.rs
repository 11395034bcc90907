//! Scene template domain types.

use serde::Deserialize;

/// Ordered vocabulary lists for one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Vocabulary {
    /// Core roles and fixtures of the scene.
    #[serde(default)]
    pub core: Vec<String>,
    /// Common objects and tools.
    #[serde(default)]
    pub items: Vec<String>,
    /// Environment and decoration words.
    #[serde(default)]
    pub env: Vec<String>,
}

/// A scene preset: display metadata plus the vocabulary to label.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SceneTemplate {
    /// Stable identifier used on the command line.
    pub key: String,
    /// Scene display name; doubles as the poster theme.
    pub name: String,
    /// Poster headline.
    pub title: String,
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

impl SceneTemplate {
    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary { key: self.key.clone(), name: self.name.clone(), title: self.title.clone() }
    }
}

/// Listing row for the `templates` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSummary {
    pub key: String,
    pub name: String,
    pub title: String,
}
