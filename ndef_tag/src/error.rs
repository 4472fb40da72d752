use ndef_parser::NdefError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    #[error("format error: {0}")]
    Format(String),
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<NdefError> for TagError {
    fn from(error: NdefError) -> Self {
        TagError::Format(format!("{}", error))
    }
}
