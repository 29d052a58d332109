//! Command-line front end: select one file, extract it through Gemini,
//! print the normalized result and optionally store it via the backend.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use docuscan::{
    config::{GeminiConfig, DEFAULT_GEMINI_API_BASE, DEFAULT_GEMINI_MODEL},
    models::SelectedFile,
    services::{DocumentApiClient, GeminiClient},
    telemetry, UploadController,
};

#[derive(Debug, Parser)]
#[command(name = "docuscan-cli", version, about = "Extract text or structured data from a document")]
struct Args {
    /// PDF, JPG, PNG or WEBP file to extract
    file: PathBuf,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: String,

    #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    model: String,

    #[arg(long, env = "GEMINI_API_BASE", default_value = DEFAULT_GEMINI_API_BASE)]
    api_base: String,

    /// Write the result to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Store the result through the backend's /api/data endpoint
    #[arg(long)]
    save: bool,

    /// Document type used when the result carries none
    #[arg(long, default_value = "Unknown")]
    document_type: String,

    /// Base URL of the docuscan backend
    #[arg(long, env = "DOCUSCAN_API_URL", default_value = "http://localhost:3006")]
    api_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    telemetry::init_tracing("docuscan=warn");

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = GeminiConfig::new(args.api_key)
        .with_model(args.model)
        .with_api_base(args.api_base);

    let mut controller = UploadController::new(GeminiClient::new(config));
    controller.select_file(SelectedFile::from_path(&args.file)?);

    let state = controller.extract().await;
    if let Some(message) = state.last_error() {
        anyhow::bail!("{}", message);
    }
    let text = state
        .normalized_result()
        .context("extraction finished without a result")?;

    match &args.output {
        Some(path) => tokio::fs::write(path, text)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{text}"),
    }

    if args.save {
        let (document_type, data) = state
            .finalize(&args.document_type)
            .context("no result to save")?;
        let stored = DocumentApiClient::new(&args.api_url)
            .save(&document_type, &data)
            .await?;
        eprintln!("saved {} document {}", stored.document_type, stored.id);
    }

    Ok(())
}
