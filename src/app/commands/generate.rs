//! Generate command: assemble a poster prompt and drive a generation task.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::thread;

use crate::adapters::{HttpGenerationClient, PollingGenerator, fetch_image};
use crate::app::AppContext;
use crate::domain::configuration::{
    API_KEY_ENV, AspectRatio, GenerationConfig, OutputFormat, Resolution,
};
use crate::domain::credential::Credential;
use crate::domain::error::AppError;
use crate::domain::generation::{CancelToken, GenerationError, ProgressEvent, ProgressSink};
use crate::domain::prompt::{MAX_PROMPT_CHARS, build_prompt, is_too_long, parse_vocabulary_input};
use crate::domain::template::Vocabulary;
use crate::ports::{CredentialStore, TaskRequest, TemplateStore};

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Scene template key to start from.
    pub template: Option<String>,
    /// Poster theme; overrides the template's scene name.
    pub theme: Option<String>,
    /// Poster headline; overrides the template's title.
    pub title: Option<String>,
    /// Core vocabulary override, comma/newline separated.
    pub core: Option<String>,
    /// Items vocabulary override, comma/newline separated.
    pub items: Option<String>,
    /// Environment vocabulary override, comma/newline separated.
    pub env: Option<String>,
    pub aspect_ratio: Option<AspectRatio>,
    pub resolution: Option<Resolution>,
    pub output_format: Option<OutputFormat>,
    /// Directory the first result image is saved into.
    pub out_dir: Option<PathBuf>,
    /// Skip the download step and only print URLs.
    pub no_download: bool,
    /// Print the assembled prompt without submitting anything.
    pub dry_run: bool,
}

/// Result of a generate execution.
#[derive(Debug)]
pub struct GenerateResult {
    /// Assembled prompt size in characters.
    pub prompt_chars: usize,
    /// Result URLs in provider order (empty for dry runs).
    pub urls: Vec<String>,
    /// Where the first image was saved, when the download succeeded.
    pub saved_to: Option<PathBuf>,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

/// Fully resolved poster inputs after template and override merging.
#[derive(Debug)]
struct PosterSpec {
    theme: String,
    title: String,
    vocabulary: Vocabulary,
}

/// Execute the generate command.
pub fn execute<T: TemplateStore, C: CredentialStore>(
    ctx: &AppContext<T, C>,
    config: &GenerationConfig,
    options: GenerateOptions,
) -> Result<GenerateResult, AppError> {
    let spec = resolve_poster_spec(ctx.templates(), &options)?;
    let prompt = build_prompt(&spec.theme, &spec.title, &spec.vocabulary)?;

    let prompt_chars = prompt.chars().count();
    if is_too_long(&prompt) {
        return Err(AppError::PromptTooLong { length: prompt_chars, limit: MAX_PROMPT_CHARS });
    }

    if options.dry_run {
        println!("{prompt}");
        return Ok(GenerateResult { prompt_chars, urls: vec![], saved_to: None, dry_run: true });
    }

    let credential = resolve_credential(ctx.credentials())?;
    let client = HttpGenerationClient::new(credential, config)?;
    let generator =
        PollingGenerator::new(Box::new(client), config.poll_interval_ms, config.max_poll_attempts);

    let output_format = options.output_format.unwrap_or(config.output_format);
    let request = TaskRequest {
        prompt,
        aspect_ratio: options.aspect_ratio.unwrap_or(config.aspect_ratio),
        resolution: options.resolution.unwrap_or(config.resolution),
        output_format,
    };

    let progress = ProgressSink::new();
    let events = progress.subscribe();
    let printer = thread::spawn(move || {
        for event in events {
            match event {
                ProgressEvent::Creating => println!("Creating generation task..."),
                ProgressEvent::Submitted { task_id } => {
                    println!("Task {task_id} accepted, generating the poster...");
                }
                ProgressEvent::Polling { attempt, state } => {
                    println!("  poll {attempt}: {}", state.label());
                }
                ProgressEvent::Completed { count } => println!("Done: {count} image(s)"),
            }
        }
    });

    let outcome = generator.generate(&request, &progress, &CancelToken::new());
    // Dropping the sink closes the channel so the printer thread drains and exits.
    drop(progress);
    let _ = printer.join();
    let urls = outcome?;

    for url in &urls {
        println!("{url}");
    }

    let saved_to = if options.no_download || urls.is_empty() {
        None
    } else {
        let out_dir = options.out_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        match download_first(&urls[0], &out_dir, output_format, config.timeout_secs) {
            Ok(path) => {
                println!("Saved {}", path.display());
                Some(path)
            }
            Err(err) => {
                println!("Download failed ({err}); open the URL directly:\n  {}", urls[0]);
                None
            }
        }
    };

    Ok(GenerateResult { prompt_chars, urls, saved_to, dry_run: false })
}

/// Merge a template (when given) with command-line overrides.
///
/// Theme and title must be non-empty after trimming; vocabulary lists may be
/// empty.
fn resolve_poster_spec<T: TemplateStore>(
    templates: &T,
    options: &GenerateOptions,
) -> Result<PosterSpec, AppError> {
    let template = match &options.template {
        Some(key) => {
            Some(templates.get(key).ok_or_else(|| AppError::TemplateNotFound(key.clone()))?)
        }
        None => None,
    };

    let theme = options
        .theme
        .clone()
        .or_else(|| template.as_ref().map(|t| t.name.clone()))
        .map(|value| value.trim().to_string())
        .unwrap_or_default();
    if theme.is_empty() {
        return Err(AppError::EmptyField { field: "theme" });
    }

    let title = options
        .title
        .clone()
        .or_else(|| template.as_ref().map(|t| t.title.clone()))
        .map(|value| value.trim().to_string())
        .unwrap_or_default();
    if title.is_empty() {
        return Err(AppError::EmptyField { field: "title" });
    }

    let mut vocabulary = template.map(|t| t.vocabulary).unwrap_or_default();
    if let Some(raw) = &options.core {
        vocabulary.core = parse_vocabulary_input(raw);
    }
    if let Some(raw) = &options.items {
        vocabulary.items = parse_vocabulary_input(raw);
    }
    if let Some(raw) = &options.env {
        vocabulary.env = parse_vocabulary_input(raw);
    }

    Ok(PosterSpec { theme, title, vocabulary })
}

/// Resolve the credential: environment first, then the store.
///
/// Absence is an auth error here so the user gets an actionable message
/// before any client is built.
fn resolve_credential<C: CredentialStore>(store: &C) -> Result<Credential, AppError> {
    if let Ok(raw) = env::var(API_KEY_ENV) {
        let credential = Credential::new(raw);
        if !credential.as_str().is_empty() {
            return Ok(credential);
        }
    }

    match store.load()? {
        Some(credential) => Ok(credential),
        None => Err(GenerationError::Auth(format!(
            "No API key configured. Run 'xiaobao auth set' or set {API_KEY_ENV}."
        ))
        .into()),
    }
}

/// Save the first result image under `out_dir` with a timestamped name.
fn download_first(
    url: &str,
    out_dir: &std::path::Path,
    format: OutputFormat,
    timeout_secs: u64,
) -> Result<PathBuf, AppError> {
    let bytes = fetch_image(url, timeout_secs).map_err(|err| AppError::Download(err.to_string()))?;

    fs::create_dir_all(out_dir)?;
    let filename =
        format!("poster-{}.{}", chrono::Local::now().format("%Y%m%d-%H%M%S"), format.extension());
    let path = out_dir.join(filename);
    fs::write(&path, bytes)?;
    Ok(path)
}
