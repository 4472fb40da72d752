use std::fmt;
use std::slice::Iter;

use byteorder::{BigEndian, ByteOrder};

use crate::error::NdefError;
use crate::payload_value::{PayloadValue, WellKnownText};

pub(crate) const FLAG_MB: u8 = 0x80;
pub(crate) const FLAG_ME: u8 = 0x40;
const FLAG_CF: u8 = 0x20;
const FLAG_SR: u8 = 0x10;
const FLAG_IL: u8 = 0x08;
const TNF_MASK: u8 = 0x07;

/// Record type of a well-known Text record
pub const RTD_TEXT: &[u8] = b"T";

/// Type Name Format of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tnf {
    Empty = 0x00,
    WellKnown = 0x01,
    MimeMedia = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    pub fn from_bits(bits: u8) -> Tnf {
        match bits & TNF_MASK {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::MimeMedia,
            0x03 => Tnf::AbsoluteUri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    tnf: Tnf,
    record_type: Vec<u8>,
    id: Vec<u8>,
    payload: Vec<u8>,
}

impl NdefRecord {
    /// Creates NdefRecord object
    ///
    /// Checks the field combination allowed for `tnf`: Empty records carry
    /// nothing, Unknown and Unchanged records carry no type, every other
    /// format requires a type.
    ///
    /// # Examples:
    ///
    /// ```
    /// # use ndef_parser::record::*;
    /// let record = NdefRecord::new(Tnf::External, b"example.com:t".to_vec(), vec![], vec![0x01]).unwrap();
    /// assert_eq!(record.to_vec(), vec![0xD4, 0x0D, 0x01, 0x65, 0x78, 0x61, 0x6D, 0x70, 0x6C, 0x65,
    ///     0x2E, 0x63, 0x6F, 0x6D, 0x3A, 0x74, 0x01]);
    /// ```
    pub fn new(
        tnf: Tnf,
        record_type: Vec<u8>,
        id: Vec<u8>,
        payload: Vec<u8>,
    ) -> Result<NdefRecord, NdefError> {
        let invalid = |field| NdefError::InvalidRecordField {
            tnf: tnf.bits(),
            field,
        };

        match tnf {
            Tnf::Empty => {
                if !record_type.is_empty() {
                    return Err(invalid("type"));
                }
                if !id.is_empty() {
                    return Err(invalid("id"));
                }
                if !payload.is_empty() {
                    return Err(invalid("payload"));
                }
            }
            Tnf::Unknown | Tnf::Unchanged => {
                if !record_type.is_empty() {
                    return Err(invalid("type"));
                }
            }
            Tnf::Reserved => return Err(NdefError::InvalidTnf { tnf: tnf.bits() }),
            _ => {
                if record_type.is_empty() {
                    return Err(invalid("type"));
                }
            }
        }

        if record_type.len() > 0xFF {
            return Err(invalid("type length"));
        }
        if id.len() > 0xFF {
            return Err(invalid("id length"));
        }

        Ok(NdefRecord {
            tnf,
            record_type,
            id,
            payload,
        })
    }

    /// Creates record with TNF Empty
    pub fn empty() -> NdefRecord {
        NdefRecord {
            tnf: Tnf::Empty,
            record_type: vec![],
            id: vec![],
            payload: vec![],
        }
    }

    /// Creates MIME media record
    ///
    /// MIME type is trimmed, lower-cased and stripped of parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// # use ndef_parser::record::*;
    /// let record = NdefRecord::create_mime(" Text/Plain; charset=US-ASCII", b"Hi".to_vec()).unwrap();
    /// assert_eq!(record.mime_type().unwrap(), "text/plain");
    /// ```
    pub fn create_mime(mime_type: &str, payload: Vec<u8>) -> Result<NdefRecord, NdefError> {
        let mime_type = normalize_mime_type(mime_type);

        if mime_type.is_empty() {
            return Err(NdefError::InvalidMimeType(format!("MIME type is empty")));
        }
        if !mime_type.is_ascii() {
            return Err(NdefError::InvalidMimeType(mime_type));
        }
        match mime_type.find('/') {
            Some(0) => Err(NdefError::InvalidMimeType(format!(
                "{} has no major type",
                mime_type
            ))),
            Some(i) if i == mime_type.len() - 1 => Err(NdefError::InvalidMimeType(format!(
                "{} has no minor type",
                mime_type
            ))),
            Some(_) => NdefRecord::new(Tnf::MimeMedia, mime_type.into_bytes(), vec![], payload),
            None => Err(NdefError::InvalidMimeType(format!(
                "{} has no '/'",
                mime_type
            ))),
        }
    }

    pub fn create_mime_value(
        mime_type: &str,
        value: &impl PayloadValue,
    ) -> Result<NdefRecord, NdefError> {
        NdefRecord::create_mime(mime_type, value.bytes())
    }

    /// Creates well-known Text record with UTF-8 body
    pub fn create_text(language: &str, text: &str) -> Result<NdefRecord, NdefError> {
        let value = WellKnownText::new(language, text)?;
        NdefRecord::new(Tnf::WellKnown, RTD_TEXT.to_vec(), vec![], value.bytes())
    }

    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    pub fn id(&self) -> &[u8] {
        &self.id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns MIME type for MIME media records
    pub fn mime_type(&self) -> Option<String> {
        match self.tnf {
            Tnf::MimeMedia => String::from_utf8(self.record_type.clone()).ok(),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        self.tnf == Tnf::WellKnown && self.record_type == RTD_TEXT
    }

    pub fn payload_ext<T>(&self) -> Result<T, NdefError>
    where
        T: PayloadValue,
    {
        T::from_raw(&self.payload)
    }

    /// Returns size of encoded record in bytes
    pub fn len(&self) -> usize {
        let payload_len_size = if self.is_short() { 1 } else { 4 };
        let id_len_size = if self.id.is_empty() { 0 } else { 1 };

        1 + 1 + payload_len_size + id_len_size + self.record_type.len() + self.id.len() + self.payload.len()
    }

    /// Returns encoded record as the only record of a message
    pub fn to_vec(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len());
        self.write_to(&mut out, true, true);
        out
    }

    fn is_short(&self) -> bool {
        self.payload.len() <= 0xFF
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>, first: bool, last: bool) {
        let mut header = self.tnf.bits();
        if first {
            header |= FLAG_MB;
        }
        if last {
            header |= FLAG_ME;
        }
        if self.is_short() {
            header |= FLAG_SR;
        }
        if !self.id.is_empty() {
            header |= FLAG_IL;
        }

        out.push(header);
        out.push(self.record_type.len() as u8);

        if self.is_short() {
            out.push(self.payload.len() as u8);
        } else {
            let mut len = [0; 4];
            BigEndian::write_u32(&mut len, self.payload.len() as u32);
            out.extend_from_slice(&len);
        }

        if !self.id.is_empty() {
            out.push(self.id.len() as u8);
        }

        out.extend_from_slice(&self.record_type);
        out.extend_from_slice(&self.id);
        out.extend_from_slice(&self.payload);
    }

    /// Reads out one record, returns it with its header byte
    pub(crate) fn read_from(iter: &mut Iter<u8>) -> Result<(u8, NdefRecord), NdefError> {
        let header = read_byte(iter)?;

        if header & FLAG_CF != 0 {
            return Err(NdefError::ChunkedRecord);
        }

        let tnf = Tnf::from_bits(header);
        if let Tnf::Unchanged | Tnf::Reserved = tnf {
            return Err(NdefError::InvalidTnf { tnf: tnf.bits() });
        }

        let type_len = read_byte(iter)? as usize;

        let payload_len = if header & FLAG_SR != 0 {
            read_byte(iter)? as usize
        } else {
            BigEndian::read_u32(&read_bytes(iter, 4)?) as usize
        };

        let id_len = if header & FLAG_IL != 0 {
            read_byte(iter)? as usize
        } else {
            0
        };

        let record_type = read_bytes(iter, type_len)?;
        let id = read_bytes(iter, id_len)?;
        let payload = read_bytes(iter, payload_len)?;

        Ok((header, NdefRecord::new(tnf, record_type, id, payload)?))
    }
}

impl fmt::Display for NdefRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {}: {:02X?}",
            self.tnf,
            String::from_utf8_lossy(&self.record_type),
            self.payload
        )
    }
}

fn normalize_mime_type(mime_type: &str) -> String {
    let mime_type = match mime_type.find(';') {
        Some(i) => &mime_type[..i],
        None => mime_type,
    };
    mime_type.trim().to_ascii_lowercase()
}

fn read_byte(iter: &mut Iter<u8>) -> Result<u8, NdefError> {
    iter.next().cloned().ok_or(NdefError::TruncatedRecord)
}

fn read_bytes(iter: &mut Iter<u8>, len: usize) -> Result<Vec<u8>, NdefError> {
    let remain = iter.len();
    if remain < len {
        return Err(NdefError::TooShortBody {
            expected: len,
            found: remain,
        });
    }

    Ok(iter.by_ref().take(len).cloned().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_mime_record_test() {
        let record = NdefRecord::create_mime("text/plain", b"Hi".to_vec()).unwrap();

        let mut expected = vec![0xD2, 0x0A, 0x02];
        expected.extend_from_slice(b"text/plain");
        expected.extend_from_slice(b"Hi");

        assert_eq!(record.to_vec(), expected);
        assert_eq!(record.len(), expected.len());
    }

    #[test]
    fn long_record_test() {
        let record = NdefRecord::create_mime("text/plain", vec![0x41; 300]).unwrap();
        let raw = record.to_vec();

        assert_eq!(&raw[0..6], [0xC2, 0x0A, 0x00, 0x00, 0x01, 0x2C]);
        assert_eq!(raw.len(), record.len());

        let (header, parsed) = NdefRecord::read_from(&mut raw.iter()).unwrap();
        assert_eq!(header & FLAG_SR, 0);
        assert_eq!(parsed, record);
    }

    #[test]
    fn id_record_test() {
        let record =
            NdefRecord::new(Tnf::Unknown, vec![], vec![0x01, 0x02], vec![0xAA]).unwrap();
        let raw = record.to_vec();

        assert_eq!(raw, vec![0xDD, 0x00, 0x01, 0x02, 0x01, 0x02, 0xAA]);
        assert_eq!(NdefRecord::read_from(&mut raw.iter()).unwrap().1, record);
    }

    #[test]
    fn mime_type_test() {
        let record = NdefRecord::create_mime("  Text/Plain ", vec![]).unwrap();
        assert_eq!(record.mime_type().unwrap(), "text/plain");
        assert_eq!(record.tnf(), Tnf::MimeMedia);

        assert!(NdefRecord::create_mime("", vec![]).is_err());
        assert!(NdefRecord::create_mime("/plain", vec![]).is_err());
        assert!(NdefRecord::create_mime("text/", vec![]).is_err());
        assert!(NdefRecord::create_mime("textplain", vec![]).is_err());
    }

    #[test]
    fn invalid_record_test() {
        assert_eq!(
            NdefRecord::new(Tnf::Empty, vec![], vec![], vec![0x01]),
            Err(NdefError::InvalidRecordField {
                tnf: 0,
                field: "payload"
            })
        );
        assert!(NdefRecord::new(Tnf::WellKnown, vec![], vec![], vec![]).is_err());
        assert!(NdefRecord::new(Tnf::Unknown, b"x".to_vec(), vec![], vec![]).is_err());
        assert_eq!(
            NdefRecord::new(Tnf::Reserved, b"x".to_vec(), vec![], vec![]),
            Err(NdefError::InvalidTnf { tnf: 7 })
        );
    }

    #[test]
    fn read_from_error_test() {
        // chunked
        let raw = vec![0xB2, 0x01, 0x00, 0x41];
        assert_eq!(
            NdefRecord::read_from(&mut raw.iter()),
            Err(NdefError::ChunkedRecord)
        );

        // payload shorter than declared
        let raw = vec![0xD2, 0x01, 0x05, 0x41, 0x00];
        assert_eq!(
            NdefRecord::read_from(&mut raw.iter()),
            Err(NdefError::TooShortBody {
                expected: 5,
                found: 1
            })
        );

        // header only
        let raw = vec![0xD2];
        assert_eq!(
            NdefRecord::read_from(&mut raw.iter()),
            Err(NdefError::TruncatedRecord)
        );
    }

    #[test]
    fn text_record_test() {
        let record = NdefRecord::create_text("en", "Hello").unwrap();

        assert!(record.is_text());
        assert_eq!(record.payload(), b"\x02enHello");
        assert_eq!(record.payload_ext::<WellKnownText>().unwrap().text(), "Hello");
    }
}
