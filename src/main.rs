//! Terminal front end for Image Studio

use image_studio::{
    backend::GeminiBackend,
    config::{LoggingConfig, Settings},
    response::FileRenderer,
    AppError, ModelId, Studio,
};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const HELP: &str = "\
Commands:
  models                 list available models
  model <id>             select a model (generation models run immediately)
  upload <path|data-url> set the image to edit
  prompt <text>          set the edit prompt
  edit [text]            submit the edit, optionally setting the prompt first
  generate               generate again with the selected model
  help                   show this message
  quit                   exit";

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry.with(fmt::layer().with_writer(std::io::stderr)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_tracing(&settings.logging);
    info!(
        base_url = %settings.api.base_url,
        output = %settings.output.dir,
        "Starting Image Studio"
    );

    let backend = Arc::new(GeminiBackend::new(&settings.api)?);
    let renderer = Arc::new(FileRenderer::new(&settings.output.dir));
    renderer.ensure_storage_dir()?;

    let studio = Studio::new(backend, renderer);
    report(studio.start().await);

    println!("{}", HELP);
    println!("Selected model: {}", studio.model());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line
            .split_once(char::is_whitespace)
            .map(|(command, arg)| (command, arg.trim()))
            .unwrap_or((line, ""));

        match command {
            "" => {}
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "models" => {
                let current = studio.model();
                for model in ModelId::ALL {
                    let marker = if model == current { "*" } else { " " };
                    println!("{} {} ({:?})", marker, model, model.mode());
                }
            }
            "model" => match arg.parse::<ModelId>() {
                Ok(model) => report(studio.set_mode(model).await),
                Err(e) => eprintln!("{}", e),
            },
            "upload" if arg.starts_with("data:") => report(studio.upload_data_url(arg)),
            "upload" => report(studio.upload_file(arg).await),
            "prompt" => studio.set_prompt(arg),
            "edit" => {
                if !arg.is_empty() {
                    studio.set_prompt(arg);
                }
                report(studio.submit_edit().await);
            }
            "generate" => report(studio.generate(studio.model()).await),
            other => eprintln!("Unknown command '{}'. Type `help`.", other),
        }
    }

    info!("Shutting down");
    Ok(())
}

/// Errors were already shown by the renderer; only log them here
fn report<T>(result: image_studio::Result<T>) {
    match result {
        Err(AppError::RequestInFlight) => eprintln!("A request is already running."),
        Err(e) if e.is_validation() => debug!(error = %e, "Input rejected"),
        Err(e) => warn!(error = %e, "Request did not produce images"),
        Ok(_) => {}
    }
}
