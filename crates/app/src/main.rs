use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use pinroute_core::{route, Registry, RoutingResult};
use pinroute_ocr::{spawn_intake_watcher, EnvelopePipeline, OcrEngine};

#[derive(Debug, Parser)]
#[command(name = "pinroute", about = "Envelope PIN-code routing demo", version)]
struct Cli {
    /// Registry TOML file; the built-in demo table is used when omitted.
    #[arg(long, global = true)]
    registry: Option<PathBuf>,

    /// Emit the routing result as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    /// Tesseract data directory (tesseract builds only).
    #[arg(long, global = true)]
    tessdata: Option<String>,

    /// OCR language code.
    #[arg(long, global = true, default_value = "eng")]
    lang: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sort a single envelope image.
    Image { path: PathBuf },
    /// Route already-recognized text, skipping OCR.
    Text { text: String },
    /// Watch an intake folder and sort each new image dropped into it.
    Watch { dir: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let registry = match &cli.registry {
        Some(path) => Registry::load(path)
            .with_context(|| format!("loading registry from {}", path.display()))?,
        None => Registry::demo(),
    };
    tracing::debug!("Registry loaded with {} centers", registry.len());

    match &cli.command {
        Command::Text { text } => {
            let routing = route(text, &registry);
            print_result(&routing, None, cli.json)?;
        }
        Command::Image { path } => {
            let pipeline = EnvelopePipeline::new(build_engine(&cli)?, registry);
            let result = pipeline.process_file(path).await?;
            print_result(&result.routing, Some(&result.ocr_text), cli.json)?;
        }
        Command::Watch { dir } => {
            let pipeline = EnvelopePipeline::new(build_engine(&cli)?, registry);

            // The channel bridges the notify watcher thread and the async
            // processor. The watcher must be kept alive while we loop.
            let (tx, mut rx) = mpsc::channel::<PathBuf>(64);
            let _watcher = spawn_intake_watcher(dir, tx)
                .with_context(|| format!("watching intake folder {}", dir.display()))?;
            tracing::info!("Watching intake folder: {}", dir.display());

            while let Some(path) = rx.recv().await {
                tracing::info!("Processing envelope: {}", path.display());
                match pipeline.process_file(&path).await {
                    Ok(result) => print_result(&result.routing, None, cli.json)?,
                    Err(e) => tracing::warn!("Envelope pipeline error: {e}"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "tesseract")]
fn build_engine(cli: &Cli) -> anyhow::Result<Box<dyn OcrEngine>> {
    use pinroute_ocr::recognizer::tesseract::TesseractEngine;
    Ok(Box::new(TesseractEngine::new(cli.tessdata.clone(), &cli.lang)))
}

#[cfg(not(feature = "tesseract"))]
fn build_engine(_cli: &Cli) -> anyhow::Result<Box<dyn OcrEngine>> {
    anyhow::bail!(
        "this build has no OCR engine; rebuild with `--features tesseract`, \
         or use the `text` subcommand to route recognized text directly"
    )
}

fn print_result(
    routing: &RoutingResult,
    ocr_text: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(routing)?);
        return Ok(());
    }
    if let Some(text) = ocr_text {
        println!("Extracted text:\n{text}\n");
    }
    match &routing.pin {
        Some(pin) => println!("PIN Code: {pin}"),
        None => println!("PIN Code: Not Found"),
    }
    println!("Sorting Center: {}", routing.facility);
    Ok(())
}
