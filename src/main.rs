//! Resume screener: rank candidate resumes against a job description

use clap::Parser;
use log::{error, info, warn};
use resume_screener::cli::{self, Cli, Commands, ConfigAction};
use resume_screener::config::{Config, OutputFormat};
use resume_screener::error::{Result, ScreenerError};
use resume_screener::input::manager::InputManager;
use resume_screener::output::formatter::{self, CsvFormatter, JsonFormatter};
use resume_screener::processing::embedding_manager::ModelManager;
use resume_screener::processing::embeddings::EmbeddingEngine;
use resume_screener::processing::ranker::{Ranker, ResumeInput};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    // Execute command
    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Rank {
            jd,
            resumes,
            top_k,
            model,
            entities,
            output,
            save,
            detailed,
        } => {
            cli::validate_file_extension(&jd, &["txt", "md"])
                .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;

            let output_format =
                cli::parse_output_format(&output).map_err(ScreenerError::InvalidInput)?;

            let mut input_manager = InputManager::new();

            info!("Reading job description: {}", jd.display());
            let jd_text = input_manager.extract_text(&jd).await?;

            let resume_paths = input_manager.discover_resumes(&resumes).await?;
            if resume_paths.is_empty() {
                return Err(ScreenerError::InvalidInput(format!(
                    "No resumes found in {}. Supported formats: txt, md, pdf",
                    resumes.display()
                )));
            }
            info!("Found {} resume(s)", resume_paths.len());

            // Per-file extraction failures degrade to error rows instead of
            // aborting the batch.
            let mut inputs = Vec::with_capacity(resume_paths.len());
            for path in &resume_paths {
                let source = path.to_string_lossy().to_string();
                match input_manager.extract_text(path).await {
                    Ok(text) => inputs.push(ResumeInput::ok(source, text)),
                    Err(e) => {
                        warn!("Failed to extract {}: {}", path.display(), e);
                        inputs.push(ResumeInput::failed(source, e.to_string()));
                    }
                }
            }

            // Model load failure is fatal: similarity cannot be computed.
            config.ensure_models_dir()?;
            let model_name = model.unwrap_or_else(|| config.models.default_embedding_model.clone());
            let model_manager = ModelManager::new(config.models.models_dir.clone()).await?;
            let model_path = model_manager.ensure_model_available(&config, &model_name).await?;
            let engine = EmbeddingEngine::load(&model_path, &model_name)?;

            let ranker = Ranker::new(&config, entities)?;
            let ranked = ranker.rank(&engine, &jd_text, inputs)?;

            let top_k = top_k.unwrap_or(config.output.top_k);
            let rendered = formatter::render(
                &ranked,
                &output_format,
                top_k,
                config.output.color_output,
                detailed,
            )?;
            println!("{}", rendered);

            if let Some(save_path) = save {
                save_ranking(&ranked, &output_format, &save_path)?;
                info!("Full ranking saved to {}", save_path.display());
            }
        }

        Commands::Config { action } => match action.unwrap_or(ConfigAction::Show) {
            ConfigAction::Show => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    ScreenerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("{}", content);
            }
            ConfigAction::Reset => {
                let defaults = Config::default();
                defaults.save()?;
                println!("Configuration reset to defaults");
            }
        },
    }

    Ok(())
}

/// Write the complete ranking to disk. Console runs export CSV so the full
/// table is always available even when the terminal view was truncated.
fn save_ranking(
    ranked: &[resume_screener::processing::ranker::ScoredCandidate],
    format: &OutputFormat,
    path: &PathBuf,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json = JsonFormatter::new(true).format(ranked)?;
            std::fs::write(path, json)?;
        }
        OutputFormat::Csv | OutputFormat::Console => {
            CsvFormatter.write_to_path(ranked, path)?;
        }
    }
    Ok(())
}
