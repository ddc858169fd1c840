use crate::error::DownloaderError;
use crate::types::{Kind, Level, Month, Number, Paper, ParsedBatch, RejectedRow, Timezone};
use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

struct Columns {
    level: usize,
    year: usize,
    month: usize,
    tz: usize,
    number: usize,
    kind: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, DownloaderError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or(DownloaderError::MissingColumn(name))
        };
        Ok(Columns {
            level: find("level")?,
            year: find("year")?,
            month: find("month")?,
            tz: find("tz")?,
            number: find("number")?,
            kind: find("kind")?,
        })
    }
}

/// Parses the batch CSV into validated records. Rows that fail validation are
/// collected as rejected, not fatal; an unreadable file or malformed CSV is.
pub async fn parse_csv(path: &Path) -> Result<ParsedBatch, DownloaderError> {
    let mut file = File::open(path).await?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).await?;

    let mut reader = ReaderBuilder::new().from_reader(contents.as_bytes());
    let columns = Columns::locate(reader.headers()?)?;

    let mut papers = Vec::new();
    let mut rejected = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Header occupies line 1.
        let line = i as u64 + 2;

        match paper_from_record(&record, &columns) {
            Ok(paper) => {
                debug!("Parsed record at line {}: {:?}", line, paper);
                papers.push(paper);
            }
            Err(error) => {
                warn!("Rejected row at line {}: {}", line, error);
                rejected.push(RejectedRow { line, error });
            }
        }
    }

    Ok(ParsedBatch { papers, rejected })
}

fn paper_from_record(record: &StringRecord, columns: &Columns) -> Result<Paper, DownloaderError> {
    let field = |idx: usize, name: &'static str| {
        record
            .get(idx)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DownloaderError::format(name, "missing value"))
    };

    let level: Level = field(columns.level, "level")?.parse()?;
    let year_raw = field(columns.year, "year")?;
    let year: u16 = year_raw
        .parse()
        .map_err(|_| DownloaderError::format("year", format!("must be an integer, got {:?}", year_raw)))?;
    let month: Month = field(columns.month, "month")?.parse()?;
    let timezone: Timezone = field(columns.tz, "tz")?.parse()?;
    let number: Number = field(columns.number, "number")?.parse()?;
    let kind: Kind = field(columns.kind, "kind")?.parse()?;

    Paper::new(level, year, month, timezone, number, kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Level, Month, Timezone};
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn parses_valid_rows() {
        let file = write_csv(
            "level,year,month,tz,number,kind\n\
             HL,2021,Nov,0,1,qp\n\
             sl,2019,may,2,3,ms\n",
        );
        let batch = parse_csv(file.path()).await.unwrap();
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.papers.len(), 2);
        assert_eq!(batch.papers[0].level, Level::Hl);
        assert_eq!(batch.papers[0].month, Month::Nov);
        assert_eq!(batch.papers[1].timezone, Timezone::Tz2);
    }

    #[tokio::test]
    async fn invalid_rows_are_collected_not_fatal() {
        let file = write_csv(
            "level,year,month,tz,number,kind\n\
             HL,2021,Nov,0,1,qp\n\
             HL,2015,Nov,0,1,qp\n\
             SL,2019,May,0,2,ms\n",
        );
        let batch = parse_csv(file.path()).await.unwrap();
        assert_eq!(batch.papers.len(), 1);
        assert_eq!(batch.rejected.len(), 2);
        assert_eq!(batch.rejected[0].line, 3);
        assert!(matches!(
            batch.rejected[0].error,
            DownloaderError::Format { field: "year", .. }
        ));
        assert_eq!(batch.rejected[1].line, 4);
        assert!(matches!(
            batch.rejected[1].error,
            DownloaderError::Format { field: "tz", .. }
        ));
    }

    #[tokio::test]
    async fn column_order_does_not_matter() {
        let file = write_csv(
            "kind,tz,month,year,level,number\n\
             ms,1,May,2018,hl,2\n",
        );
        let batch = parse_csv(file.path()).await.unwrap();
        assert_eq!(batch.papers.len(), 1);
        assert_eq!(batch.papers[0].year, 2018);
    }

    #[tokio::test]
    async fn missing_column_is_fatal() {
        let file = write_csv("level,year,month,number,kind\nHL,2021,Nov,1,qp\n");
        let err = parse_csv(file.path()).await.unwrap_err();
        assert!(matches!(err, DownloaderError::MissingColumn("tz")));
    }
}
