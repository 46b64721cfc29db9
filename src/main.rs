use std::io::Read;

use clap::Parser;
use serde::Serialize;

use biaslens::{AnalysisResult, Analyzer, HighlightSpan, WordListSentiment};

#[derive(Parser)]
#[command(
    name = "biaslens",
    about = "Score civic proposal text for linguistic neutrality",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,
    /// Enable the extended NPOV rule set
    #[arg(long)]
    extended: bool,
    /// Include highlight spans in the output
    #[arg(long)]
    highlight: bool,
    /// Include a suggested neutral rewrite in the output
    #[arg(long)]
    rewrite: bool,
}

#[derive(Serialize)]
struct Report {
    analysis: AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    highlights: Option<Vec<HighlightSpan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewrite: Option<String>,
}

fn report(text: &str, cli: &Cli) -> Report {
    let analyzer = Analyzer::new()
        .with_sentiment(Box::new(WordListSentiment))
        .extended(cli.extended);
    Report {
        analysis: analyzer.analyze(text),
        highlights: cli.highlight.then(|| biaslens::highlight(text)),
        rewrite: cli.rewrite.then(|| biaslens::rewrite(text)),
    }
}

fn main() {
    let cli = Cli::parse();

    if cli.files.is_empty() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .expect("Failed to read stdin");
        println!(
            "{}",
            serde_json::to_string_pretty(&report(&input, &cli)).unwrap()
        );
    } else {
        for path in &cli.files {
            let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("Error reading {path}: {e}");
                std::process::exit(1);
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&report(&text, &cli)).unwrap()
            );
        }
    }
}
