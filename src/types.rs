use std::fmt;
use std::str::FromStr;

use crate::error::DownloaderError;

/// Exam level, HL or SL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Hl,
    Sl,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Hl => "HL",
            Level::Sl => "SL",
        }
    }
}

impl FromStr for Level {
    type Err = DownloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hl" => Ok(Level::Hl),
            "sl" => Ok(Level::Sl),
            other => Err(DownloaderError::format(
                "level",
                format!("expected HL or SL, got {:?}", other),
            )),
        }
    }
}

/// Examination session month. Only May and November sessions exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    May,
    Nov,
}

impl Month {
    /// Full month name as the host spells it in session path segments.
    pub fn full_name(&self) -> &'static str {
        match self {
            Month::May => "May",
            Month::Nov => "November",
        }
    }

    /// Single-letter month code used in normalized local names.
    pub fn initial(&self) -> char {
        match self {
            Month::May => 'M',
            Month::Nov => 'N',
        }
    }

    /// Uppercase directory name in the local storage tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Month::May => "MAY",
            Month::Nov => "NOV",
        }
    }
}

impl FromStr for Month {
    type Err = DownloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "may" => Ok(Month::May),
            "nov" => Ok(Month::Nov),
            other => Err(DownloaderError::format(
                "month",
                format!("expected May or Nov, got {:?}", other),
            )),
        }
    }
}

/// Timezone disambiguator. May sessions run TZ1/TZ2, November runs TZ0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timezone {
    Tz0,
    Tz1,
    Tz2,
}

impl Timezone {
    pub fn digit(&self) -> char {
        match self {
            Timezone::Tz0 => '0',
            Timezone::Tz1 => '1',
            Timezone::Tz2 => '2',
        }
    }
}

impl FromStr for Timezone {
    type Err = DownloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Timezone::Tz0),
            "1" => Ok(Timezone::Tz1),
            "2" => Ok(Timezone::Tz2),
            other => Err(DownloaderError::format(
                "tz",
                format!("expected 0, 1 or 2, got {:?}", other),
            )),
        }
    }
}

/// Paper number within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Number {
    P1,
    P2,
    P3,
}

impl Number {
    pub fn digit(&self) -> char {
        match self {
            Number::P1 => '1',
            Number::P2 => '2',
            Number::P3 => '3',
        }
    }
}

impl FromStr for Number {
    type Err = DownloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(Number::P1),
            "2" => Ok(Number::P2),
            "3" => Ok(Number::P3),
            other => Err(DownloaderError::format(
                "number",
                format!("expected 1, 2 or 3, got {:?}", other),
            )),
        }
    }
}

/// Document kind, question paper or mark scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    QuestionPaper,
    MarkScheme,
}

impl Kind {
    /// Short code used in normalized local names.
    pub fn code(&self) -> &'static str {
        match self {
            Kind::QuestionPaper => "qp",
            Kind::MarkScheme => "ms",
        }
    }
}

impl FromStr for Kind {
    type Err = DownloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "qp" | "questionpaper" => Ok(Kind::QuestionPaper),
            "ms" | "markscheme" => Ok(Kind::MarkScheme),
            other => Err(DownloaderError::format(
                "kind",
                format!("expected qp or ms, got {:?}", other),
            )),
        }
    }
}

/// A session paired with its timezone, as offered on the command line.
///
/// Mirrors the three combinations that actually exist on the host: the single
/// November administration and the two May administrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Session {
    NovTz0,
    MayTz1,
    MayTz2,
}

impl Session {
    pub fn month(&self) -> Month {
        match self {
            Session::NovTz0 => Month::Nov,
            Session::MayTz1 | Session::MayTz2 => Month::May,
        }
    }

    pub fn timezone(&self) -> Timezone {
        match self {
            Session::NovTz0 => Timezone::Tz0,
            Session::MayTz1 => Timezone::Tz1,
            Session::MayTz2 => Timezone::Tz2,
        }
    }
}

impl FromStr for Session {
    type Err = DownloaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nov-tz0" => Ok(Session::NovTz0),
            "may-tz1" => Ok(Session::MayTz1),
            "may-tz2" => Ok(Session::MayTz2),
            other => Err(DownloaderError::format(
                "session",
                format!("expected nov-tz0, may-tz1 or may-tz2, got {:?}", other),
            )),
        }
    }
}

/// A validated query record. Construct through [`Paper::new`], which enforces
/// the year floor and the month/timezone pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Paper {
    pub level: Level,
    pub year: u16,
    pub month: Month,
    pub timezone: Timezone,
    pub number: Number,
    pub kind: Kind,
}

impl Paper {
    pub fn new(
        level: Level,
        year: u16,
        month: Month,
        timezone: Timezone,
        number: Number,
        kind: Kind,
    ) -> Result<Self, DownloaderError> {
        if year < 2016 {
            return Err(DownloaderError::format(
                "year",
                format!("no earlier than 2016, got {}", year),
            ));
        }
        match month {
            Month::May => {
                if timezone == Timezone::Tz0 {
                    return Err(DownloaderError::format(
                        "tz",
                        "May sessions run TZ1 or TZ2",
                    ));
                }
            }
            Month::Nov => {
                if timezone != Timezone::Tz0 {
                    return Err(DownloaderError::format(
                        "tz",
                        "November sessions run TZ0 only",
                    ));
                }
            }
        }
        Ok(Paper {
            level,
            year,
            month,
            timezone,
            number,
            kind,
        })
    }
}

/// Per-record result of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Downloaded,
    NotFound,
    AlreadyExists,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Downloaded => write!(f, "Downloaded"),
            Outcome::NotFound => write!(f, "Not found"),
            Outcome::AlreadyExists => write!(f, "File already exists"),
        }
    }
}

#[derive(Debug)]
pub struct FetchReport {
    pub paper: Paper,
    /// Normalized local name, also the record's display name in reports.
    pub name: String,
    pub outcome: Outcome,
    pub bytes_written: u64,
}

/// A batch input row that failed validation.
#[derive(Debug)]
pub struct RejectedRow {
    /// 1-based line number in the input file, header included.
    pub line: u64,
    pub error: DownloaderError,
}

/// Batch input after per-row validation: valid records plus rejected rows.
#[derive(Debug)]
pub struct ParsedBatch {
    pub papers: Vec<Paper>,
    pub rejected: Vec<RejectedRow>,
}

#[derive(Debug)]
pub struct RunSummary {
    pub total_records: usize,
    pub downloaded: usize,
    pub not_found: usize,
    pub already_exists: usize,
    pub total_bytes_written: u64,
    pub reports: Vec<FetchReport>,
}
