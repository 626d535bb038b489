use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use draftsmith_common::{Config, ContentMode, DraftsmithError, ModelChoice, PublishedDocument, SearchProvider};
use draftsmith_pipeline::{AiBackend, Pipeline, PipelineRequest};

const PREVIEW_CHARS: usize = 500;

/// Shape of the `--output` file.
#[derive(Serialize)]
struct SavedPost<'a> {
    topic: &'a str,
    blog_post: &'a PublishedDocument,
}

/// Research, draft, select and format a blog post for a topic.
#[derive(Parser, Debug)]
#[command(name = "draftsmith", version)]
struct Cli {
    /// The topic to write about
    topic: String,

    /// Save the generated post as JSON to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Research provider: "gemini" or "openai" (hosted web search)
    #[arg(short = 'p', long = "search-provider", default_value = "gemini")]
    search_provider: SearchProvider,

    /// Model for planning, writing and editing: "gemini" or "gpt-4o-mini"
    #[arg(long, default_value = "gemini")]
    model: ModelChoice,

    /// Number of research searches (1-7)
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=7))]
    searches: u8,

    /// Number of writer personas (1-3)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=3))]
    styles: u8,

    /// Long-form Medium article instead of a standard blog post
    #[arg(long)]
    medium: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut filter = EnvFilter::from_default_env();
    for directive in ["draftsmith=info", "ai_client=info"] {
        if let Ok(d) = directive.parse() {
            filter = filter.add_directive(d);
        }
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env(cli.model, cli.search_provider)?;
    config.log_redacted();

    let mode = if cli.medium { ContentMode::Structured } else { ContentMode::Standard };
    let request = PipelineRequest::builder()
        .topic(cli.topic.clone())
        .search_count(cli.searches as usize)
        .style_count(cli.styles as usize)
        .mode(mode)
        .build();

    info!(topic = cli.topic.as_str(), %mode, searches = cli.searches, "Generating");

    let backend = Arc::new(AiBackend::from_config(&config)?);
    let output = Pipeline::new(backend).run(&request).await?;

    print_summary(&output.document);

    if let Some(path) = &cli.output {
        let saved = SavedPost {
            topic: &cli.topic,
            blog_post: &output.document,
        };
        let text = serde_json::to_string_pretty(&saved)?;
        std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "Results saved");
    }

    Ok(())
}

fn print_summary(doc: &PublishedDocument) {
    println!("\nTitle:              {}", doc.title);
    println!("Slug:               {}", doc.slug);
    println!("Reading time:       {} minutes", doc.reading_time);
    println!("Tags:               {}", doc.tags.join(", "));
    println!("Meta description:   {}", doc.meta_description);
    println!("Featured image alt: {}", doc.featured_image_alt);

    let preview: String = doc.content.chars().take(PREVIEW_CHARS).collect();
    println!("\nContent preview:\n{preview}");
    if doc.content.chars().count() > PREVIEW_CHARS {
        println!("...");
    }
}

/// User-facing description of a fatal error.
fn describe_failure(err: &anyhow::Error) -> String {
    let text = format!("{err:#}").to_lowercase();
    if (text.contains("api_key") && text.contains("invalid")) || text.contains("api error (401)") {
        "API key error: check GOOGLE_API_KEY or OPENAI_API_KEY".to_string()
    } else if text.contains("quota") || text.contains("rate limit") || text.contains("api error (429)") {
        "Quota exceeded: try again later or use a different model".to_string()
    } else if text.contains("network") || text.contains("connection") {
        "Network error: check your internet connection".to_string()
    } else if text.contains("timeout") || text.contains("timed out") {
        "Timeout: the request took too long, try again".to_string()
    } else {
        format!("{err:#}")
    }
}

fn report(err: &anyhow::Error) {
    if let Some(DraftsmithError::UnsafeTopic(verdict)) = err.downcast_ref::<DraftsmithError>() {
        error!("Topic safety check failed");
        eprintln!("Topic safety check failed:");
        for issue in &verdict.issues_found {
            eprintln!("  - {issue}");
        }
        eprintln!("\nRecommendations:");
        for rec in &verdict.recommendations {
            eprintln!("  - {rec}");
        }
        return;
    }

    let message = describe_failure(err);
    error!(error = %format!("{err:#}"), "Generation failed");
    eprintln!("Error: {message}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["draftsmith", "Rust tips"]);
        assert_eq!(cli.topic, "Rust tips");
        assert_eq!(cli.model, ModelChoice::Gemini);
        assert_eq!(cli.search_provider, SearchProvider::Gemini);
        assert_eq!(cli.searches, 3);
        assert_eq!(cli.styles, 3);
        assert!(!cli.medium);
        assert!(cli.output.is_none());
    }

    #[test]
    fn cli_options() {
        let cli = Cli::parse_from([
            "draftsmith", "Rust tips", "-o", "out.json", "-p", "openai", "--model", "gpt-4o-mini", "-s", "7",
            "--styles", "1", "--medium",
        ]);
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert_eq!(cli.search_provider, SearchProvider::OpenAi);
        assert_eq!(cli.model, ModelChoice::Gpt4oMini);
        assert_eq!(cli.searches, 7);
        assert_eq!(cli.styles, 1);
        assert!(cli.medium);
    }

    #[test]
    fn cli_rejects_out_of_range_counts() {
        assert!(Cli::try_parse_from(["draftsmith", "t", "-s", "8"]).is_err());
        assert!(Cli::try_parse_from(["draftsmith", "t", "-s", "0"]).is_err());
        assert!(Cli::try_parse_from(["draftsmith", "t", "--styles", "4"]).is_err());
        assert!(Cli::try_parse_from(["draftsmith", "t", "--model", "claude"]).is_err());
    }

    #[test]
    fn failures_are_classified() {
        assert!(describe_failure(&anyhow!("Invalid API_KEY supplied")).starts_with("API key error"));
        assert!(describe_failure(&anyhow!("Quota exhausted")).starts_with("Quota exceeded"));
        assert!(describe_failure(&anyhow!("connection refused")).starts_with("Network error"));
        assert!(describe_failure(&anyhow!("operation timed out")).starts_with("Timeout"));
        assert_eq!(describe_failure(&anyhow!("something odd")), "something odd");
    }

    #[test]
    fn context_chain_is_searched() {
        let err = anyhow!("API error (429): slow down").context("research phase failed");
        assert!(describe_failure(&err).starts_with("Quota exceeded"));
    }
}
