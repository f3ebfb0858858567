use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PwhoisError>;

#[derive(Error, Debug)]
pub enum PwhoisError {
    #[error("no valid values provided")]
    NoValidInput,

    #[error("values slice larger than maximum: {max} (got {size})")]
    BatchTooLarge { size: usize, max: usize },

    #[error("invalid asn value: {0}")]
    InvalidAsn(String),

    #[error("cannot connect to pwhois server {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to write query to pwhois server: {0}")]
    Write(#[source] io::Error),

    #[error("failed to read response from pwhois server: {0}")]
    Read(#[source] io::Error),

    #[error("execute connect to establish a connection first")]
    NotConnected,

    #[error("{0}")]
    QuotaExceeded(String),

    #[error("pwhois server error: {0}")]
    ServiceError(String),

    #[error("empty response from pwhois server")]
    EmptyResponse,

    #[error("no header found")]
    NoHeader,

    #[error("no data rows found")]
    NoDataRows,

    #[error("no records returned")]
    NoRecordsReturned,
}
