//! ats-scorer: resume vs. job description ATS compatibility scoring

use ats_scorer::cli::{self, Cli, Commands, ConfigAction, JobInput};
use ats_scorer::config::Config;
use ats_scorer::error::{AtsScorerError, Result};
use ats_scorer::input::{ExtractedDocument, InputManager};
use ats_scorer::llm::augmenter::Augmenter;
use ats_scorer::llm::client::{ChatCompletionsClient, CompletionClient};
use ats_scorer::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use ats_scorer::processing::analyzer::AnalysisEngine;
use ats_scorer::processing::job_context;
use clap::Parser;
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        if e.is_client_error() {
            error!("Invalid request: {}", e);
        } else {
            error!("Command failed: {}", e);
        }
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Analyze {
            resume,
            job,
            no_ai,
            output,
            save,
        } => run_analyze(&config, resume, job, no_ai, output, save).await,

        Commands::Classify { job } => {
            let mut input_manager = InputManager::new();
            let job_text = read_job(&mut input_manager, &job).await?;
            let context = job_context::classify(&job_text);
            println!("Level:  {}", context.level);
            println!("Domain: {}", context.domain);
            Ok(())
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let rendered = toml::to_string_pretty(&config)
                    .map_err(|e| AtsScorerError::Configuration(format!("Failed to render config: {}", e)))?;
                println!("# {}", config_path.display());
                println!("{}", rendered);
                Ok(())
            }
            ConfigAction::Reset => {
                Config::default().save_to(config_path)?;
                println!("Configuration reset to defaults at {}", config_path.display());
                Ok(())
            }
        },
    }
}

async fn run_analyze(
    config: &Config,
    resume: PathBuf,
    job: JobInput,
    no_ai: bool,
    output: Option<String>,
    save: Option<PathBuf>,
) -> Result<()> {
    info!("Starting ATS analysis");

    cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
        .map_err(|e| AtsScorerError::InvalidInput(format!("Resume file: {}", e)))?;

    let output_format = match output {
        Some(format) => cli::parse_output_format(&format).map_err(AtsScorerError::InvalidInput)?,
        None => config.output.format,
    };

    let mut input_manager = InputManager::new();
    let resume_doc = input_manager.extract(&resume).await?;
    let job_text = read_job(&mut input_manager, &job).await?;

    let formatting_penalty = resume_doc.formatting_penalty();
    info!(
        "Resume: {} page(s), {} words, formatting penalty {}",
        resume_doc.pages.len(),
        resume_doc.word_count(),
        formatting_penalty
    );

    let mut engine = AnalysisEngine::new()?;
    if no_ai || !config.ai.enabled {
        info!("Model refinement disabled; using local scoring");
    } else {
        match ChatCompletionsClient::from_config(&config.ai)? {
            Some(client) => {
                info!("Model refinement enabled: {} via {}", client.model_name(), client.endpoint());
                let augmenter = Augmenter::new(
                    Box::new(client),
                    config.ai.max_output_tokens,
                    Duration::from_secs(config.ai.timeout_secs),
                );
                engine = engine.with_augmenter(augmenter);
            }
            None => warn!(
                "{} is not set; model refinement disabled, using local scoring",
                config.ai.api_key_env
            ),
        }
    }

    let report = engine.analyze(&resume_doc.text, &job_text, formatting_penalty).await?;

    let use_colors = config.output.color_output && save.is_none();
    let rendered = ReportGenerator::with_options(use_colors, true, true).generate_report(&report, &output_format)?;
    println!("{}", rendered);

    if let Some(save) = save {
        let path = resolve_save_path(&save, &output_format, &resume);
        save_report_to_file(&rendered, &path)?;
        info!("Report saved to {}", path.display());
    }

    Ok(())
}

async fn read_job(input_manager: &mut InputManager, job: &JobInput) -> Result<String> {
    let document = match (&job.job, &job.job_text) {
        (Some(path), _) => input_manager.extract(path).await?,
        (None, Some(text)) => ExtractedDocument::from_text(text),
        (None, None) => {
            return Err(AtsScorerError::InvalidInput("No job description provided".to_string()));
        }
    };

    if document.is_empty() {
        return Err(AtsScorerError::InvalidInput("Job description is empty".to_string()));
    }
    Ok(document.text)
}
