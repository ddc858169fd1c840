use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error("format error: check {field} input: {reason}")]
    Format { field: &'static str, reason: String },

    #[error("request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for {url}")]
    UnexpectedStatus {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column {0:?} in input file")]
    MissingColumn(&'static str),
}

impl DownloaderError {
    pub fn format(field: &'static str, reason: impl Into<String>) -> Self {
        DownloaderError::Format {
            field,
            reason: reason.into(),
        }
    }
}
