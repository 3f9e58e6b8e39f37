//! CLI interface for the ATS scorer

use crate::config::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ats-scorer")]
#[command(about = "Score a resume against a job description for ATS compatibility")]
#[command(
    long_about = "Extract skills, experience, education and certifications from a resume and a job description, score their overlap, and suggest improvements. An OpenAI-compatible model can refine the result; local scoring is used whenever it is unavailable."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        #[command(flatten)]
        job: JobInput,

        /// Skip the model call and use local scoring only
        #[arg(long)]
        no_ai: bool,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Classify a job description by seniority level and technical domain
    Classify {
        #[command(flatten)]
        job: JobInput,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

/// A job description given either as a file or inline.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct JobInput {
    /// Path to job description file (TXT, MD, PDF)
    #[arg(short, long)]
    pub job: Option<PathBuf>,

    /// Job description text
    #[arg(long)]
    pub job_text: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, markdown",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
