use clap::Parser;
use colored::*;
use log::{error, info};

use pyp_downloader::cli::{Cli, Command};
use pyp_downloader::downloader::Downloader;
use pyp_downloader::parser;
use pyp_downloader::types::{Outcome, ParsedBatch, RejectedRow};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    info!("Starting past-year paper downloader");

    let cli = Cli::parse();

    let (papers, rejected, common) = match cli.command {
        Command::Batch { input_file, common } => {
            let ParsedBatch { papers, rejected } = match parser::parse_csv(&input_file).await {
                Ok(batch) => batch,
                Err(e) => {
                    error!("Failed to parse input file: {}", e);
                    eprintln!("{}", "Failed to parse input file".red());
                    return Err(e.into());
                }
            };
            info!(
                "Parsed {} records ({} rejected) from {}",
                papers.len(),
                rejected.len(),
                input_file.display()
            );
            (papers, rejected, common)
        }
        Command::Select { selection, common } => {
            let papers = selection.expand()?;
            info!("Expanded selection into {} records", papers.len());
            (papers, Vec::new(), common)
        }
    };

    let downloader = Downloader::new(common.base_url, common.output_dir);
    let summary = match downloader.download_all(papers).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("Download run failed: {}", e);
            eprintln!("{}", "Download run failed".red());
            return Err(e.into());
        }
    };

    println!("\n{}", "Download Summary:".bold());
    for report in &summary.reports {
        match report.outcome {
            Outcome::Downloaded => println!("✓ {} - {}", report.name.green(), report.outcome),
            Outcome::AlreadyExists => println!("• {} - {}", report.name.yellow(), report.outcome),
            Outcome::NotFound => println!("✗ {} - {}", report.name.red(), report.outcome),
        }
    }
    println!(
        "\nTotal: {} records, {} downloaded, {} not found, {} already present",
        summary.total_records,
        summary.downloaded.to_string().green(),
        summary.not_found.to_string().red(),
        summary.already_exists.to_string().yellow()
    );
    println!(
        "Total data written: {:.2} MB",
        summary.total_bytes_written as f64 / 1_048_576.0
    );

    if !rejected.is_empty() {
        println!("\n{}", "Rejected rows:".red().bold());
        for RejectedRow { line, error } in &rejected {
            println!("  line {}: {}", line, error);
        }
        error!("{} input rows were rejected", rejected.len());
        return Err(anyhow::anyhow!(
            "{} input rows were rejected",
            rejected.len()
        ));
    }

    Ok(())
}
