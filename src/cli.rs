use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::error::DownloaderError;
use crate::naming;
use crate::types::{Kind, Level, Number, Paper, Session};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the papers listed in a CSV file
    Batch {
        /// Input CSV file with columns level,year,month,tz,number,kind
        #[arg(short, long)]
        input_file: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Download every combination of the given search criteria
    Select {
        #[command(flatten)]
        selection: Selection,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Root directory for downloaded papers
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Base URL of the document host, pre-encoded
    #[arg(long, default_value = naming::DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// The selection form: each repeatable flag is one axis of the cross-product.
#[derive(Args, Debug)]
pub struct Selection {
    /// Levels to fetch (hl, sl)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub level: Vec<Level>,

    /// First year of the range
    #[arg(long)]
    pub year_from: u16,

    /// Last year of the range
    #[arg(long)]
    pub year_to: u16,

    /// Sessions to fetch (nov-tz0, may-tz1, may-tz2)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub session: Vec<Session>,

    /// Paper numbers to fetch (1, 2, 3)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub number: Vec<Number>,

    /// Document kinds to fetch (qp, ms)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub kind: Vec<Kind>,
}

impl Selection {
    /// Expands the selection into individual records, year-outermost.
    pub fn expand(&self) -> Result<Vec<Paper>, DownloaderError> {
        if self.year_from > self.year_to {
            return Err(DownloaderError::format(
                "year",
                format!(
                    "from-year {} is later than to-year {}",
                    self.year_from, self.year_to
                ),
            ));
        }

        let mut papers = Vec::new();
        for year in self.year_from..=self.year_to {
            for session in &self.session {
                for level in &self.level {
                    for number in &self.number {
                        for kind in &self.kind {
                            papers.push(Paper::new(
                                *level,
                                year,
                                session.month(),
                                session.timezone(),
                                *number,
                                *kind,
                            )?);
                        }
                    }
                }
            }
        }
        Ok(papers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Month, Timezone};

    fn selection() -> Selection {
        Selection {
            level: vec![Level::Hl, Level::Sl],
            year_from: 2018,
            year_to: 2019,
            session: vec![Session::NovTz0, Session::MayTz1],
            number: vec![Number::P1, Number::P2],
            kind: vec![Kind::QuestionPaper, Kind::MarkScheme],
        }
    }

    #[test]
    fn expansion_covers_the_cross_product() {
        let papers = selection().expand().unwrap();
        assert_eq!(papers.len(), 2 * 2 * 2 * 2 * 2);
    }

    #[test]
    fn expansion_order_is_year_session_level_number_kind() {
        let papers = selection().expand().unwrap();
        assert_eq!(papers[0].year, 2018);
        assert_eq!(papers[0].month, Month::Nov);
        assert_eq!(papers[0].level, Level::Hl);
        assert_eq!(papers[0].number, Number::P1);
        assert_eq!(papers[0].kind, Kind::QuestionPaper);

        // Kind varies fastest, year slowest.
        assert_eq!(papers[1].kind, Kind::MarkScheme);
        assert_eq!(papers[1].number, Number::P1);
        let half = papers.len() / 2;
        assert_eq!(papers[half].year, 2019);
    }

    #[test]
    fn session_flag_fixes_the_timezone() {
        let mut sel = selection();
        sel.session = vec![Session::MayTz2];
        let papers = sel.expand().unwrap();
        assert!(papers
            .iter()
            .all(|p| p.month == Month::May && p.timezone == Timezone::Tz2));
    }

    #[test]
    fn inverted_year_range_is_a_format_error() {
        let mut sel = selection();
        sel.year_from = 2021;
        sel.year_to = 2018;
        let err = sel.expand().unwrap_err();
        assert!(matches!(
            err,
            DownloaderError::Format { field: "year", .. }
        ));
    }

    #[test]
    fn pre_2016_selection_is_rejected_on_expansion() {
        let mut sel = selection();
        sel.year_from = 2014;
        sel.year_to = 2016;
        assert!(sel.expand().is_err());
    }
}
