//! Poster prompt assembly.
//!
//! The prompt is a fixed Markdown document rendered from an embedded
//! minijinja template; theme, title, and vocabulary are substituted verbatim.
//! The destination is a generative model, so no escaping is applied.

use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::error::AppError;
use crate::domain::template::Vocabulary;

/// Maximum prompt size accepted by the provider, in characters.
pub const MAX_PROMPT_CHARS: usize = 20_000;

static POSTER_PROMPT: &str = include_str!("../assets/prompt/poster_prompt.j2");

/// Render the poster prompt for a scene.
///
/// Deterministic: the same inputs always produce the same document.
/// Vocabulary lists are joined with `", "`; empty lists render as empty
/// sections.
pub fn build_prompt(theme: &str, title: &str, vocabulary: &Vocabulary) -> Result<String, AppError> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    env.render_str(
        POSTER_PROMPT,
        context! {
            theme => theme,
            title => title,
            core_words => vocabulary.core.join(", "),
            item_words => vocabulary.items.join(", "),
            env_words => vocabulary.env.join(", "),
        },
    )
    .map_err(|err| AppError::PromptRender(err.to_string()))
}

/// True when `prompt` exceeds the provider's character limit.
/// Exactly [`MAX_PROMPT_CHARS`] characters is still acceptable.
pub fn is_too_long(prompt: &str) -> bool {
    prompt.chars().count() > MAX_PROMPT_CHARS
}

/// Split raw vocabulary input on commas or newlines.
///
/// Pieces are trimmed, empty pieces are dropped, order and duplicates are
/// preserved.
pub fn parse_vocabulary_input(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}
