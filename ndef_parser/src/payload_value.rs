use std::ops::Deref;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::error::NdefError;

const TEXT_UTF16: u8 = 0x80;
const TEXT_LANGUAGE_MASK: u8 = 0x3F;

/// Typed view over a record payload
pub trait PayloadValue {
    fn from_raw(raw: &[u8]) -> Result<Self, NdefError>
    where
        Self: Sized;

    fn bytes(&self) -> Vec<u8>;
}

/// Text restricted to 7-bit ASCII
///
/// Construction fails on the first non-ASCII character instead of replacing
/// it, so a payload never carries bytes that differ from the input text.
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiText {
    val: String,
}

impl AsciiText {
    pub fn new(val: &str) -> Result<Self, NdefError> {
        if let Some((position, character)) = val.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
            return Err(NdefError::NonAscii {
                position,
                character,
            });
        }

        Ok(Self {
            val: val.to_owned(),
        })
    }
}

impl Deref for AsciiText {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.val
    }
}

impl PayloadValue for AsciiText {
    fn from_raw(raw: &[u8]) -> Result<Self, NdefError> {
        if let Some(position) = raw.iter().position(|b| !b.is_ascii()) {
            return Err(NdefError::NonAscii {
                position,
                character: raw[position] as char,
            });
        }

        Ok(Self {
            val: raw.iter().map(|&b| b as char).collect(),
        })
    }

    fn bytes(&self) -> Vec<u8> {
        self.val.bytes().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utf8Text {
    val: String,
}

impl Utf8Text {
    pub fn new(val: String) -> Self {
        Self { val }
    }

    pub fn into_string(self) -> String {
        self.val
    }
}

impl Deref for Utf8Text {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.val
    }
}

impl PayloadValue for Utf8Text {
    fn from_raw(raw: &[u8]) -> Result<Self, NdefError> {
        Ok(Self {
            val: String::from_utf8(raw.to_vec())
                .map_err(|x| NdefError::ParsePayloadValue(format!("{}", x)))?,
        })
    }

    fn bytes(&self) -> Vec<u8> {
        self.val.bytes().collect()
    }
}

/// Payload of a well-known Text record
///
/// Layout: status byte (bit 7 set for UTF-16, bits 0-5 language code
/// length), language code, text. Always encoded as UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct WellKnownText {
    language: String,
    text: String,
}

impl WellKnownText {
    pub fn new(language: &str, text: &str) -> Result<Self, NdefError> {
        if !language.is_ascii() || language.len() > TEXT_LANGUAGE_MASK as usize {
            return Err(NdefError::ParsePayloadValue(format!(
                "invalid language code: {}",
                language
            )));
        }

        Ok(Self {
            language: language.to_owned(),
            text: text.to_owned(),
        })
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl PayloadValue for WellKnownText {
    fn from_raw(raw: &[u8]) -> Result<Self, NdefError> {
        let status = *raw
            .get(0)
            .ok_or_else(|| NdefError::ParsePayloadValue(format!("text payload is empty")))?;

        let language_len = (status & TEXT_LANGUAGE_MASK) as usize;
        if raw.len() < 1 + language_len {
            return Err(NdefError::TooShortBody {
                expected: 1 + language_len,
                found: raw.len(),
            });
        }

        let language = String::from_utf8(raw[1..1 + language_len].to_vec())
            .map_err(|x| NdefError::ParsePayloadValue(format!("{}", x)))?;

        let body = &raw[1 + language_len..];
        let text = if status & TEXT_UTF16 != 0 {
            decode_utf16(body)?
        } else {
            String::from_utf8(body.to_vec())
                .map_err(|x| NdefError::ParsePayloadValue(format!("{}", x)))?
        };

        Ok(Self { language, text })
    }

    fn bytes(&self) -> Vec<u8> {
        let mut out = vec![self.language.len() as u8];
        out.extend_from_slice(self.language.as_bytes());
        out.extend_from_slice(self.text.as_bytes());
        out
    }
}

/// Big-endian unless a byte order mark says otherwise
fn decode_utf16(body: &[u8]) -> Result<String, NdefError> {
    if body.len() % 2 != 0 {
        return Err(NdefError::ParsePayloadValue(format!(
            "odd UTF-16 body length: {}",
            body.len()
        )));
    }

    let (body, little_endian) = match body {
        [0xFF, 0xFE, rest @ ..] => (rest, true),
        [0xFE, 0xFF, rest @ ..] => (rest, false),
        _ => (body, false),
    };

    let units: Vec<u16> = body
        .chunks(2)
        .map(|x| match little_endian {
            true => LittleEndian::read_u16(x),
            false => BigEndian::read_u16(x),
        })
        .collect();

    String::from_utf16(&units).map_err(|x| NdefError::ParsePayloadValue(format!("{}", x)))
}
