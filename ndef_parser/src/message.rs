use std::fmt;

use crate::error::NdefError;
use crate::record::{NdefRecord, FLAG_MB, FLAG_ME};

/// One or more records, as stored on a tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    pub fn new(record: NdefRecord) -> Self {
        Self {
            records: vec![record],
        }
    }

    pub fn from_records(records: Vec<NdefRecord>) -> Result<Self, NdefError> {
        if records.is_empty() {
            return Err(NdefError::EmptyMessage);
        }

        Ok(Self { records })
    }

    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<NdefRecord> {
        self.records
    }

    /// Returns size of encoded message in bytes
    pub fn byte_len(&self) -> usize {
        self.records.iter().fold(0, |sum, x| sum + x.len())
    }

    /// Returns NDEF-encoded array of bytes
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndef_parser::message::*;
    /// # use ndef_parser::record::*;
    /// let message = NdefMessage::from_records(vec![
    ///     NdefRecord::create_mime("a/b", vec![0x01]).unwrap(),
    ///     NdefRecord::empty()]).unwrap();
    /// assert_eq!(message.to_vec(), vec![0x92, 0x03, 0x01, 0x61, 0x2F, 0x62, 0x01, 0x50, 0x00, 0x00]);
    /// ```
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        let last = self.records.len() - 1;

        for (i, record) in self.records.iter().enumerate() {
            record.write_to(&mut out, i == 0, i == last);
        }

        out
    }

    /// Initializes NdefMessage object from [u8] slice
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndef_parser::message::*;
    /// let message = NdefMessage::from_vec(&[0xD1, 0x01, 0x03, 0x54, 0x00, 0x48, 0x69]).unwrap();
    /// assert_eq!(message.records().len(), 1);
    /// assert_eq!(message.records()[0].payload(), [0x00, 0x48, 0x69]);
    /// ```
    pub fn from_vec(slice: &[u8]) -> Result<Self, NdefError> {
        if slice.is_empty() {
            return Err(NdefError::EmptyMessage);
        }

        let iter = &mut slice.iter();
        let mut records = Vec::new();

        loop {
            let (header, record) = NdefRecord::read_from(iter)?;
            let index = records.len();

            if index == 0 && header & FLAG_MB == 0 {
                return Err(NdefError::MissingMessageBegin);
            }
            if index > 0 && header & FLAG_MB != 0 {
                return Err(NdefError::UnexpectedMessageBegin { index });
            }

            records.push(record);

            if header & FLAG_ME != 0 {
                if iter.len() != 0 {
                    return Err(NdefError::TrailingBytes { count: iter.len() });
                }
                break;
            }

            if iter.len() == 0 {
                return Err(NdefError::MissingMessageEnd);
            }
        }

        Ok(Self { records })
    }
}

impl From<NdefRecord> for NdefMessage {
    fn from(record: NdefRecord) -> Self {
        NdefMessage::new(record)
    }
}

impl fmt::Display for NdefMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.records {
            writeln!(f, "- {}", record)?;
        }
        Ok(())
    }
}
