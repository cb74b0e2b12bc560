//! Veridoc CLI: run the document analysis pipeline from the terminal.
//!
//! Reads an extracted-text file, runs every analysis stage, and prints the
//! assembled report as JSON (default) or a human-readable summary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use veridoc_core::{AnalysisReport, DocumentAnalyzer, ExtractedDocument, load_config};

/// Veridoc: document-integrity analysis
#[derive(Parser, Debug)]
#[command(name = "veridoc", version, about, long_about = None)]
struct Cli {
    /// Extracted-text file to analyze
    input: PathBuf,

    /// Document title (defaults to the file stem)
    #[arg(short, long)]
    title: Option<String>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;

    let text = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read '{}'", cli.input.display()))?;
    let title = cli
        .title
        .clone()
        .unwrap_or_else(|| title_from_path(&cli.input));
    let doc = ExtractedDocument::from_text(text, title);

    let analyzer = DocumentAnalyzer::new(config);
    let report = analyzer
        .analyze(&doc)
        .await
        .with_context(|| format!("analysis refused for '{}'", cli.input.display()))?;

    tracing::info!(
        citations = report.stats.citations_count,
        fact_checks = report.stats.fact_checks_count,
        "Analysis complete"
    );

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render_text(&report)),
    }
    Ok(())
}

fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}

fn render_text(report: &AnalysisReport) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    let _ = writeln!(out, "Summary");
    let _ = writeln!(out, "  {}", report.summary);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Plagiarism score: {:.1}%",
        report.plagiarism * 100.0
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Citations ({}):", report.citations.len());
    for citation in &report.citations {
        let marker = if citation.valid { "+" } else { "-" };
        let _ = writeln!(out, "  [{marker}] {}", citation.reference);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Fact checks ({}):", report.fact_check.facts.len());
    for fact in &report.fact_check.facts {
        let _ = writeln!(out, "  [{}] {}", fact.status, fact.claim);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Words analyzed: {}", report.stats.word_count);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use veridoc_core::types::{CitationEntry, FactCheckSection, FactEntry, ReportStats};

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            id: uuid::Uuid::nil(),
            generated_at: chrono::DateTime::UNIX_EPOCH,
            summary: "A short summary.".to_string(),
            plagiarism: 0.42,
            plagiarism_details: Vec::new(),
            citations: vec![CitationEntry {
                reference: "[1] Smith, J. (2020). A Study.".to_string(),
                valid: true,
            }],
            fact_check: FactCheckSection {
                facts: vec![FactEntry {
                    claim: "Claim text.".to_string(),
                    status: "Unverified".to_string(),
                }],
            },
            stats: ReportStats {
                word_count: 321,
                plagiarism_percent: 0.42,
                citations_count: 1,
                fact_checks_count: 1,
            },
        }
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path(Path::new("papers/draft.txt")), "draft");
        assert_eq!(title_from_path(Path::new("/")), "Untitled");
    }

    #[test]
    fn test_render_text_sections() {
        let rendered = render_text(&sample_report());
        assert!(rendered.contains("A short summary."));
        assert!(rendered.contains("Plagiarism score: 42.0%"));
        assert!(rendered.contains("[+] [1] Smith, J. (2020). A Study."));
        assert!(rendered.contains("[Unverified] Claim text."));
        assert!(rendered.contains("Words analyzed: 321"));
    }

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["veridoc", "paper.txt"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("paper.txt"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.title.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "veridoc", "paper.txt", "--format", "text", "-vv", "--title", "My Paper",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.title.as_deref(), Some("My Paper"));
    }
}
