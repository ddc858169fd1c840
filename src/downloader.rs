use crate::error::DownloaderError;
use crate::naming;
use crate::types::{FetchReport, Outcome, Paper, RunSummary};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::path::PathBuf;

pub struct Downloader {
    client: reqwest::Client,
    base_url: String,
    root: PathBuf,
}

impl Downloader {
    pub fn new(base_url: String, root: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            root,
        }
    }

    /// Processes the records one at a time, in order. Per-record outcomes
    /// (not found, already exists) are collected in the summary; transport
    /// and filesystem errors abort the run.
    pub async fn download_all(&self, papers: Vec<Paper>) -> Result<RunSummary, DownloaderError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let pb = self.create_progress_bar(papers.len() as u64);
        let mut reports = Vec::with_capacity(papers.len());

        for paper in papers {
            let report = self.fetch_paper(paper).await?;
            pb.set_message(format!("{}: {}", report.outcome, report.name));
            pb.inc(1);
            reports.push(report);
        }
        pb.finish();

        let total_records = reports.len();
        let downloaded = reports
            .iter()
            .filter(|r| r.outcome == Outcome::Downloaded)
            .count();
        let not_found = reports
            .iter()
            .filter(|r| r.outcome == Outcome::NotFound)
            .count();
        let already_exists = total_records - downloaded - not_found;
        let total_bytes_written: u64 = reports.iter().map(|r| r.bytes_written).sum();

        Ok(RunSummary {
            total_records,
            downloaded,
            not_found,
            already_exists,
            total_bytes_written,
            reports,
        })
    }

    async fn fetch_paper(&self, paper: Paper) -> Result<FetchReport, DownloaderError> {
        let url = naming::document_url(&self.base_url, &paper);
        let name = naming::local_name(&paper);
        info!("Fetching {} from {}", name, url);

        let resp = self.client.get(&url).send().await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            info!("Host returned 404 for {}", url);
            return Ok(FetchReport {
                paper,
                name,
                outcome: Outcome::NotFound,
                bytes_written: 0,
            });
        }
        if !resp.status().is_success() {
            return Err(DownloaderError::UnexpectedStatus {
                status: resp.status(),
                url,
            });
        }

        // The host answers missing documents with a 200 error page; nothing
        // may touch disk until the body has been checked for it.
        let body = resp.bytes().await?;
        if is_error_page(&body) {
            info!("Host served its missing-page text for {}", url);
            return Ok(FetchReport {
                paper,
                name,
                outcome: Outcome::NotFound,
                bytes_written: 0,
            });
        }

        let staged = self.root.join(naming::host_name(&paper));
        tokio::fs::write(&staged, &body).await?;
        debug!("Staged {} bytes at {}", body.len(), staged.display());

        let target_dir = naming::target_dir(&self.root, &paper);
        tokio::fs::create_dir_all(&target_dir).await?;

        let target = target_dir.join(&name);
        if tokio::fs::try_exists(&target).await? {
            info!(
                "{} already exists, leaving staged copy at {}",
                target.display(),
                staged.display()
            );
            return Ok(FetchReport {
                paper,
                name,
                outcome: Outcome::AlreadyExists,
                bytes_written: body.len() as u64,
            });
        }

        tokio::fs::rename(&staged, &target).await?;
        info!("Filed {}", target.display());

        Ok(FetchReport {
            paper,
            name,
            outcome: Outcome::Downloaded,
            bytes_written: body.len() as u64,
        })
    }

    fn create_progress_bar(&self, total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap()
                .progress_chars("#>-"),
        );
        pb
    }
}

fn is_error_page(body: &[u8]) -> bool {
    String::from_utf8_lossy(body).contains(naming::NOT_FOUND_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_detection() {
        assert!(is_error_page(
            b"<html><body>Error 404 - Page Not Found</body></html>"
        ));
        assert!(!is_error_page(b"%PDF-1.4 actual paper content"));
        assert!(!is_error_page(b""));
    }
}
