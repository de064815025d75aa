mod batch;
mod config;
mod error;
mod ocr;
mod output;
mod parser;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};

use ocr::{OcrProvider, TextFileProvider};
use parser::classify::Classifier;
use parser::Record;

#[derive(Parser)]
#[command(
    name = "profile_extract",
    about = "Turn OCR'd profile-card screenshots into a Name/Designation/Company table"
)]
struct Cli {
    /// Settings file (default: ./profile_extract.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR every image under a directory and write the deduplicated table
    Run {
        /// Directory to scan recursively
        #[arg(short, long)]
        input: PathBuf,
        /// Output CSV (default: profiles_<timestamp>.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Worker threads (default: from settings)
        #[arg(short = 'j', long)]
        workers: Option<usize>,
        /// Inputs are .txt files with already-extracted OCR text
        #[arg(long)]
        text: bool,
    },
    /// Segment one OCR text file (or stdin) and print the records
    Parse {
        /// Text file to read; stdin when omitted
        file: Option<PathBuf>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the active keyword sets
    Keywords,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let settings = config::load(cli.config.as_deref()).context("loading settings")?;
    let classifier = Classifier::new(settings.keywords());

    let result = match cli.command {
        Commands::Run {
            input,
            output,
            workers,
            text,
        } => {
            let workers = workers.unwrap_or(settings.workers).max(1);
            let output = output.unwrap_or_else(default_output_path);
            let (provider, extensions): (Box<dyn OcrProvider>, Vec<String>) = if text {
                (Box::new(TextFileProvider), vec!["txt".to_string()])
            } else {
                (ocr::image_provider(&settings), settings.image_extensions.clone())
            };

            println!("Scanning {} ({} workers)...", input.display(), workers);
            let summary = batch::run(
                &input,
                &output,
                provider.as_ref(),
                &classifier,
                &extensions,
                workers,
            )?;
            summary.print();
            Ok(())
        }
        Commands::Parse { file, json } => {
            let text = read_input(file.as_deref())?;
            let records = parser::process_page(&classifier, &text);
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No records found.");
            } else {
                print_table(&records);
            }
            Ok(())
        }
        Commands::Keywords => {
            println!("Designation keywords ({}):", classifier.designation_keywords().len());
            println!("  {}", classifier.designation_keywords().join(", "));
            println!("Company indicators ({}):", classifier.company_indicators().len());
            println!("  {}", classifier.company_indicators().join(", "));
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from(
        chrono::Local::now()
            .format("profiles_%Y%m%d_%H%M%S.csv")
            .to_string(),
    )
}

fn print_table(records: &[Record]) {
    println!(
        "{:>3} | {:<24} | {:<32} | {:<28}",
        "#", "Name", "Designation", "Company"
    );
    println!("{}", "-".repeat(96));
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>3} | {:<24} | {:<32} | {:<28}",
            i + 1,
            truncate(&r.name, 24),
            truncate(&r.designation, 32),
            truncate(&r.company, 28)
        );
    }
    println!("\n{} records", records.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
