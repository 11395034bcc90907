//! CLI adapter.

use std::io::ErrorKind;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dialoguer::{Error as DialoguerError, Password, Select};

use crate::app::api;
use crate::app::api::GenerateOptions;
use crate::domain::configuration::{AspectRatio, OutputFormat, Resolution};
use crate::domain::error::AppError;

#[derive(Parser)]
#[command(name = "xiaobao")]
#[command(version)]
#[command(
    about = "Generate illustrated children's literacy posters from scene templates",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default .xiaobao/config.toml
    #[clap(visible_alias = "i")]
    Init,
    /// List bundled scene templates
    #[clap(visible_alias = "t")]
    Templates,
    /// Generate a poster image
    #[clap(visible_alias = "g")]
    Generate {
        /// Scene template key (see 'xiaobao templates')
        #[arg(short, long)]
        template: Option<String>,
        /// Poster theme; overrides the template's scene name
        #[arg(long)]
        theme: Option<String>,
        /// Poster headline; overrides the template's title
        #[arg(long)]
        title: Option<String>,
        /// Core roles and fixtures, comma or newline separated
        #[arg(long)]
        core: Option<String>,
        /// Common objects and tools, comma or newline separated
        #[arg(long)]
        items: Option<String>,
        /// Environment and decoration words, comma or newline separated
        #[arg(long)]
        env: Option<String>,
        /// Aspect ratio: 1:1, 3:4, 4:3, 9:16, 16:9
        #[arg(long)]
        aspect_ratio: Option<AspectRatio>,
        /// Resolution: 1K, 2K, 4K
        #[arg(long)]
        resolution: Option<Resolution>,
        /// Output format: png or jpeg
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Directory to save the first result image into
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Print result URLs only, skip the download
        #[arg(long)]
        no_download: bool,
        /// Print the assembled prompt without submitting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage the API key
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Store an API key (prompted interactively when omitted)
    Set { key: Option<String> },
    /// Show the stored API key, masked
    Show,
    /// Remove the stored API key
    Clear,
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    let result: Result<(), AppError> = match cli.command {
        Commands::Init => run_init(),
        Commands::Templates => run_templates(),
        Commands::Generate {
            template,
            theme,
            title,
            core,
            items,
            env,
            aspect_ratio,
            resolution,
            format,
            out,
            no_download,
            dry_run,
        } => run_generate(GenerateOptions {
            template,
            theme,
            title,
            core,
            items,
            env,
            aspect_ratio,
            resolution,
            output_format: format,
            out_dir: out,
            no_download,
            dry_run,
        }),
        Commands::Auth { command } => match command {
            AuthCommands::Set { key } => run_auth_set(key),
            AuthCommands::Show => run_auth_show(),
            AuthCommands::Clear => run_auth_clear(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_init() -> Result<(), AppError> {
    let path = api::init_workspace()?;
    println!("✅ Wrote {}", path.display());
    Ok(())
}

fn run_templates() -> Result<(), AppError> {
    let summaries = api::list_templates()?;
    println!("Available scene templates:");
    for summary in &summaries {
        println!("  {:<12} {}（{}）", summary.key, summary.name, summary.title);
    }
    Ok(())
}

fn run_generate(mut options: GenerateOptions) -> Result<(), AppError> {
    if options.template.is_none() && options.theme.is_none() && options.title.is_none() {
        match prompt_template_key()? {
            Some(key) => options.template = Some(key),
            None => return Ok(()),
        }
    }

    let result = api::generate(options)?;
    if !result.dry_run && result.urls.is_empty() {
        println!("The provider returned no image URLs; try again later.");
    }
    Ok(())
}

fn run_auth_set(key: Option<String>) -> Result<(), AppError> {
    let key = match key {
        Some(value) => value,
        None => match prompt_api_key()? {
            Some(value) => value,
            None => return Ok(()),
        },
    };

    api::set_credential(&key)?;
    println!("✅ API key saved to .xiaobao/credential");
    Ok(())
}

fn run_auth_show() -> Result<(), AppError> {
    match api::credential_status()? {
        Some(masked) => println!("API key: {masked}"),
        None => println!("No API key stored."),
    }
    Ok(())
}

fn run_auth_clear() -> Result<(), AppError> {
    if api::clear_credential()? {
        println!("✅ Removed stored API key");
    } else {
        println!("No API key stored.");
    }
    Ok(())
}

fn prompt_template_key() -> Result<Option<String>, AppError> {
    let summaries = api::list_templates()?;
    let labels: Vec<String> = summaries
        .iter()
        .map(|summary| format!("{}  {}（{}）", summary.key, summary.name, summary.title))
        .collect();

    match Select::new().with_prompt("Scene template").items(&labels).default(0).interact() {
        Ok(index) => Ok(Some(summaries[index].key.clone())),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::config_error(format!(
            "No template selected ({err}). Pass --template or --theme/--title."
        ))),
    }
}

fn prompt_api_key() -> Result<Option<String>, AppError> {
    match Password::new().with_prompt("API key").interact() {
        Ok(value) => Ok(Some(value)),
        Err(DialoguerError::IO(err)) if err.kind() == ErrorKind::Interrupted => Ok(None),
        Err(err) => Err(AppError::config_error(format!("Failed to read API key: {err}"))),
    }
}
