//! Deterministic name and URL derivation for a validated [`Paper`].
//!
//! Two naming conventions are in play: the one the host embeds in its URLs
//! and serves files under, and the normalized one used for local storage.
//! Both are pure functions of the record.

use std::path::{Path, PathBuf};

use crate::types::{Kind, Month, Paper};

/// Host prefix up to and including the year-indexed archive folder.
pub const DEFAULT_BASE_URL: &str = "https://www.ibdocuments.com/IB%20PAST%20PAPERS%20-%20YEAR";

/// Text the host serves on its soft-404 page instead of an HTTP error.
pub const NOT_FOUND_SENTINEL: &str = "Error 404 - Page Not Found";

/// November has a single administration, and May 2016 papers carry no
/// timezone marker on the host (legacy anomaly). Every other May session
/// distinguishes TZ1/TZ2.
fn session_has_timezone(paper: &Paper) -> bool {
    paper.month == Month::May && paper.year != 2016
}

/// Filename the host uses for this document, both in the URL path and as the
/// name it serves the file under.
pub fn host_name(paper: &Paper) -> String {
    let mut name = format!("Physics_paper_{}__", paper.number.digit());
    if session_has_timezone(paper) {
        name.push_str("TZ");
        name.push(paper.timezone.digit());
        name.push('_');
    }
    name.push_str(paper.level.as_str());
    if paper.kind == Kind::MarkScheme {
        name.push_str("_markscheme");
    }
    name.push_str(".pdf");
    name
}

/// Normalized local filename, e.g. `Physics_HL_M19_TZ2_qp3.pdf`.
pub fn local_name(paper: &Paper) -> String {
    let mut name = format!(
        "Physics_{}_{}{:02}_",
        paper.level.as_str(),
        paper.month.initial(),
        paper.year % 100
    );
    if session_has_timezone(paper) {
        name.push_str("TZ");
        name.push(paper.timezone.digit());
        name.push('_');
    }
    name.push_str(paper.kind.code());
    name.push(paper.number.digit());
    name.push_str(".pdf");
    name
}

/// Full document URL under `base_url`. Session and subject segments contain
/// spaces and are percent-encoded; the base is expected pre-encoded.
pub fn document_url(base_url: &str, paper: &Paper) -> String {
    let session = format!("{} Examination Session", paper.year);
    let month_session = format!(
        "{} {} Examination Session",
        paper.month.full_name(),
        paper.year
    );
    // The May 2016 archive sits under a differently named subject folder.
    let subject = if paper.month == Month::May && paper.year == 2016 {
        "Group 4 - Experimental Sciences"
    } else {
        "Experimental sciences"
    };

    format!(
        "{}/{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(&session),
        urlencoding::encode(&month_session),
        urlencoding::encode(subject),
        host_name(paper)
    )
}

/// Directory the paper is filed under: `{root}/{LEVEL}/{year}/{MONTH}`.
pub fn target_dir(root: &Path, paper: &Paper) -> PathBuf {
    root.join(paper.level.as_str())
        .join(paper.year.to_string())
        .join(paper.month.dir_name())
}
