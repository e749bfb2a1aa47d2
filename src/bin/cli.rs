//! Curriculum Crawler CLI
//!
//! Local execution entry point for gathering, transforming and looking up
//! school curriculum files.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use curriculum_crawler::{
    error::{AppError, Result},
    models::Config,
    pipeline,
    services::OpenAiClient,
    storage::{self, LocalStorage},
};

/// Curriculum Crawler - University Catalog Curriculum Extractor
#[derive(Parser, Debug)]
#[command(
    name = "curriculum-crawler",
    version,
    about = "Crawl academic catalogs and normalize per-major curricula"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "data/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a school's catalog and write its curriculum file
    Gather {
        /// School display name (prompted for when omitted)
        #[arg(long)]
        name: Option<String>,

        /// Main academic catalog URL (prompted for when omitted)
        #[arg(long)]
        url: Option<String>,
    },

    /// Flatten a gathered file into the lookup format
    Transform {
        /// Gathered school file
        input: PathBuf,

        /// Output path (default: <input stem>_transformed.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Look up a school in a gathered or flattened dataset and list its majors
    Lookup {
        /// Gathered or flattened dataset file
        dataset: PathBuf,

        /// School name (case-insensitive)
        school: String,
    },

    /// Validate configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Use the given value or ask for it on stdin.
fn value_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        return Ok(value.trim().to_string());
    }

    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim().to_string();
    if line.is_empty() {
        return Err(AppError::validation(format!("No input given for: {}", prompt.trim())));
    }
    Ok(line)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Gather { name, url } => {
            let school_name = value_or_prompt(name, "Enter the school name: ")?;
            let base_url = value_or_prompt(url, "Enter the main academic catalog URL: ")?;

            config.validate()?;
            let model = OpenAiClient::from_config(reqwest::Client::new(), &config.model)?;
            let storage = LocalStorage::new(config.output.dir_path(Path::new(".")));

            let (school, path) =
                pipeline::run_gather(&config, Arc::new(model), &storage, &school_name, &base_url)
                    .await?;

            log::info!(
                "Gathered {} majors for {} into {}",
                school.major_count(),
                school.school_name,
                path.display()
            );
        }

        Command::Transform { input, output } => {
            let output = output.unwrap_or_else(|| storage::transformed_path(&input));
            let outputs = pipeline::transform_file(&input, &output).await?;
            let majors: usize = outputs.iter().map(|o| o.majors.len()).sum();
            log::info!("Wrote {} majors to {}", majors, output.display());
        }

        Command::Lookup { dataset, school } => {
            let storage = LocalStorage::default();
            let dataset = storage.load_dataset(&dataset.to_string_lossy()).await?;

            let Some((name, majors)) = dataset.find_majors(&school) else {
                return Err(AppError::validation(format!("School not found: {school}")));
            };

            if majors.is_empty() {
                return Err(AppError::validation(format!("No majors found for {name}")));
            }

            println!("{name}");
            for major in majors {
                println!("  {major}");
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("Config OK");
        }
    }

    Ok(())
}
