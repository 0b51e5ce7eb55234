use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};

use research_session::classify::HfZeroShotClassifier;
use research_session::config::Config;
use research_session::export::ExportFormat;
use research_session::fetch::{HttpPageFetcher, SerpApiSearch, SourceFetcher};
use research_session::input::{ImageAttachment, ResearchInput, ResearchRequest, SessionMode};
use research_session::llm::ChatClient;
use research_session::{Orchestrator, Session, SessionOptions};

#[derive(Parser)]
#[command(
    name = "research-session",
    about = "Conversational research assistant over live web sources"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a topic, URL, or image and write a detailed report
    Report {
        /// Research goal
        topic: Option<String>,

        /// Research a single page instead of searching
        #[arg(long)]
        url: Option<String>,

        /// Path to a PNG or JPEG to report on
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Explain a topic, page, or image at a chosen difficulty
    Explain {
        /// Topic to explain
        topic: Option<String>,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        image: Option<PathBuf>,

        /// Target audience, e.g. "10-year-old"
        #[arg(long, default_value = "10-year-old")]
        difficulty: String,
    },
}

fn load_image(path: &Path) -> Result<ImageAttachment> {
    let bytes =
        std::fs::read(path).context(format!("Failed to read image {}", path.display()))?;
    let media_type = match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        other => anyhow::bail!("Unsupported image extension: {:?}", other),
    };
    Ok(ImageAttachment {
        media_type: media_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}

fn parse_export(args: &str) -> Option<(ExportFormat, &str)> {
    let mut parts = args.split_whitespace();
    let format = match parts.next()? {
        "md" | "markdown" => ExportFormat::Markdown,
        "txt" | "text" => ExportFormat::PlainText,
        "pdf" | "doc" => ExportFormat::Document,
        _ => return None,
    };
    Some((format, parts.next().unwrap_or("")))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let fetcher = SourceFetcher::new(
        Arc::new(SerpApiSearch::new(&config.serpapi_api_key)),
        Arc::new(HttpPageFetcher::new()),
        config.max_source_links,
    );
    let classifier = Arc::new(HfZeroShotClassifier::new(
        &config.hf_api_key,
        &config.classifier_model,
    ));
    let model = Arc::new(ChatClient::new(
        &config.llm_api_key,
        &config.llm_base_url,
        &config.chat_model,
    ));
    let orchestrator = Orchestrator::new(
        fetcher,
        classifier,
        model,
        SessionOptions::from(&config),
    );

    let (topic, url, image_path, mode) = match cli.command {
        Commands::Report { topic, url, image } => (topic, url, image, SessionMode::Report),
        Commands::Explain {
            topic,
            url,
            image,
            difficulty,
        } => (topic, url, image, SessionMode::Explain { difficulty }),
    };

    let image = image_path.as_deref().map(load_image).transpose()?;
    let input = ResearchInput::from_fields(topic, url, image)?;

    let mut session = Session::new();
    let exchange = orchestrator
        .start_research(&mut session, ResearchRequest { input, mode })
        .await?;

    println!("\n{}\n", exchange.model_text);
    println!("Ask a follow-up, or :export md|txt|pdf [path], :quit");

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line == ":quit" || line == ":q" {
            break;
        }
        if let Some(args) = line.strip_prefix(":export") {
            match parse_export(args.trim()) {
                Some((format, path)) => match orchestrator.export(&session, format) {
                    Ok(artifact) => {
                        let path = if path.is_empty() {
                            artifact.filename
                        } else {
                            path
                        };
                        std::fs::write(path, &artifact.bytes)
                            .context(format!("Failed to write {}", path))?;
                        println!("Wrote {} ({} bytes)", path, artifact.bytes.len());
                    }
                    Err(e) => eprintln!("Export failed: {}", e),
                },
                None => eprintln!("Usage: :export md|txt|pdf [path]"),
            }
            continue;
        }

        match orchestrator.ask_follow_up(&mut session, line).await {
            Ok(exchange) => println!("\n{}\n", exchange.model_text),
            Err(e) => eprintln!("Follow-up failed: {}", e),
        }
    }

    Ok(())
}
