//! Embedded scene template store implementation.

use include_dir::{Dir, include_dir};

use crate::domain::error::AppError;
use crate::domain::template::{SceneTemplate, TemplateSummary};
use crate::ports::TemplateStore;

static TEMPLATE_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/assets/templates");

/// Scene presets compiled into the binary.
#[derive(Debug, Clone)]
pub struct EmbeddedTemplateStore {
    templates: Vec<SceneTemplate>,
}

impl EmbeddedTemplateStore {
    /// Parse every embedded preset. Fails only when a shipped asset is
    /// malformed, which is a packaging defect rather than a user error.
    pub fn new() -> Result<Self, AppError> {
        let mut templates = Vec::new();
        for file in TEMPLATE_DIR.files() {
            let Some(content) = file.contents_utf8() else {
                continue;
            };
            let template: SceneTemplate = serde_yaml::from_str(content)?;
            templates.push(template);
        }
        templates.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(Self { templates })
    }
}

impl TemplateStore for EmbeddedTemplateStore {
    fn list(&self) -> Vec<TemplateSummary> {
        self.templates.iter().map(SceneTemplate::summary).collect()
    }

    fn get(&self, key: &str) -> Option<SceneTemplate> {
        self.templates.iter().find(|template| template.key == key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ships_the_four_scene_presets_in_key_order() {
        let store = EmbeddedTemplateStore::new().unwrap();
        let keys: Vec<String> = store.list().into_iter().map(|summary| summary.key).collect();
        assert_eq!(keys, vec!["hospital", "park", "school", "supermarket"]);
    }

    #[test]
    fn supermarket_preset_has_full_vocabulary() {
        let store = EmbeddedTemplateStore::new().unwrap();
        let template = store.get("supermarket").unwrap();

        assert_eq!(template.name, "超市");
        assert_eq!(template.title, "走进超市");
        assert_eq!(template.vocabulary.core.len(), 5);
        assert_eq!(template.vocabulary.items.len(), 8);
        assert_eq!(template.vocabulary.env.len(), 5);
        assert_eq!(template.vocabulary.core[0], "shōu yín yuán 收银员");
    }

    #[test]
    fn unknown_key_is_absent_not_an_error() {
        let store = EmbeddedTemplateStore::new().unwrap();
        assert!(store.get("castle").is_none());
    }
}
