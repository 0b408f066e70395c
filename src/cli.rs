//! CLI interface for the resume screener

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-screener")]
#[command(about = "Rank candidate resumes against a job description")]
#[command(long_about = "Score a directory of resumes against a job description using embedding similarity and skill-keyword overlap, then print a ranked shortlist")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resumes against a job description
    Rank {
        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        jd: PathBuf,

        /// Directory of resume files (TXT, MD, PDF)
        #[arg(short, long)]
        resumes: PathBuf,

        /// Number of candidates to display
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Embedding model to use
        #[arg(short, long)]
        model: Option<String>,

        /// Run heuristic entity extraction (organizations, dates)
        #[arg(long)]
        entities: bool,

        /// Output format: console, json, csv
        #[arg(short, long, default_value = "console")]
        output: String,

        /// Save the full ranking to a file (CSV or JSON depending on --output)
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show education, experience and entity details per candidate
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, csv",
            format
        )),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("console").unwrap(), OutputFormat::Console);
        assert_eq!(parse_output_format("CSV").unwrap(), OutputFormat::Csv);
        assert!(parse_output_format("yaml").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(&PathBuf::from("jd.txt"), &["txt", "md"]).is_ok());
        assert!(validate_file_extension(&PathBuf::from("jd.docx"), &["txt", "md"]).is_err());
        assert!(validate_file_extension(&PathBuf::from("jd"), &["txt"]).is_err());
    }
}
