use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum NdefError {
    #[error("Too short input vector")]
    TruncatedRecord,

    #[error("Too short body: expected {}, found {}", expected, found)]
    TooShortBody { expected: usize, found: usize },

    #[error("Message contains no records")]
    EmptyMessage,

    #[error("First record has no MB flag")]
    MissingMessageBegin,

    #[error("MB flag set on record {}", index)]
    UnexpectedMessageBegin { index: usize },

    #[error("Last record has no ME flag")]
    MissingMessageEnd,

    #[error("{} trailing bytes after ME record", count)]
    TrailingBytes { count: usize },

    #[error("Chunked records are not supported")]
    ChunkedRecord,

    #[error("TNF {} is not allowed here", tnf)]
    InvalidTnf { tnf: u8 },

    #[error("Record with TNF {} has invalid {}", tnf, field)]
    InvalidRecordField { tnf: u8, field: &'static str },

    #[error("Invalid MIME type: {0}")]
    InvalidMimeType(String),

    #[error("Non-ASCII character {:?} at position {}", character, position)]
    NonAscii { position: usize, character: char },

    #[error("Payload value parse error: {0}")]
    ParsePayloadValue(String),
}
