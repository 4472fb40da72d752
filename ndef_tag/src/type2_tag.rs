use crate::block_channel;
use crate::error;
use crate::tag;

use std::ops::Range;

use byteorder::{BigEndian, ByteOrder};
use ndef_parser::{NdefMessage, NdefRecord};

use block_channel::{BlockChannel, PAGE_SIZE};
use error::*;
use tag::NdefTag;

const CC_PAGE: u8 = 3;
const DATA_PAGE: u8 = 4;
const CC_MAGIC: u8 = 0xE1;
const CC_MAPPING_MAJOR: u8 = 0x01;
const MAX_PAGES: usize = 0x100;

const TLV_NULL: u8 = 0x00;
const TLV_NDEF: u8 = 0x03;
const TLV_TERMINATOR: u8 = 0xFE;
const TLV_LONG_LENGTH: u8 = 0xFF;

#[derive(Debug, Clone, Copy)]
struct CapabilityContainer {
    data_size: usize,
    writable: bool,
}

impl CapabilityContainer {
    fn from_raw(raw: &[u8]) -> Result<Self, TagError> {
        if raw[0] != CC_MAGIC {
            return Err(TagError::Format(format!(
                "tag is not NDEF formatted, CC magic {:02X}",
                raw[0]
            )));
        }
        if raw[1] >> 4 != CC_MAPPING_MAJOR {
            return Err(TagError::Format(format!(
                "unsupported mapping version {:02X}",
                raw[1]
            )));
        }

        let data_size = raw[2] as usize * 8;
        if DATA_PAGE as usize + data_size / PAGE_SIZE > MAX_PAGES {
            return Err(TagError::Format(format!(
                "data area of {} bytes needs sector select",
                data_size
            )));
        }

        Ok(Self {
            data_size,
            writable: raw[3] & 0x0F == 0,
        })
    }
}

enum TlvScan {
    /// NDEF message TLV starting at `offset`
    Ndef { offset: usize, value: Range<usize> },
    /// No NDEF TLV, first free byte at `offset`
    Absent { offset: usize },
}

/// NFC Forum Type 2 tag holding its NDEF message in a TLV of the data area
pub struct Type2Tag<TBlockChannel>
where
    TBlockChannel: BlockChannel,
{
    channel: TBlockChannel,
    cc: Option<CapabilityContainer>,
}

impl<TBlockChannel> Type2Tag<TBlockChannel>
where
    TBlockChannel: BlockChannel,
{
    pub fn new(channel: TBlockChannel) -> Self {
        Self { channel, cc: None }
    }

    pub fn channel(&self) -> &TBlockChannel {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut TBlockChannel {
        &mut self.channel
    }

    /// Size of the data area, known once connected
    pub fn get_data_size(&self) -> Option<usize> {
        self.cc.map(|x| x.data_size)
    }

    pub fn is_writable(&self) -> Option<bool> {
        self.cc.map(|x| x.writable)
    }

    fn cc(&self) -> Result<CapabilityContainer, TagError> {
        self.cc
            .ok_or_else(|| TagError::Transport(format!("tag is not connected")))
    }

    fn read_data_area(&mut self, size: usize) -> Result<Vec<u8>, TagError> {
        let mut data = Vec::with_capacity(size + block_channel::READ_SIZE);
        let mut page = DATA_PAGE as usize;

        while data.len() < size {
            data.extend_from_slice(&self.channel.read(page as u8)?);
            page += block_channel::READ_SIZE / PAGE_SIZE;
        }

        data.truncate(size);
        Ok(data)
    }

    fn scan_tlvs(data: &[u8]) -> Result<TlvScan, TagError> {
        let mut pos = 0;
        let mut free = 0;

        while pos < data.len() {
            let tag = data[pos];
            match tag {
                TLV_NULL => {
                    pos += 1;
                    continue;
                }
                TLV_TERMINATOR => return Ok(TlvScan::Absent { offset: pos }),
                _ => {}
            }

            let (len, header) = Self::read_tlv_len(data, pos + 1)?;
            let value = (pos + header)..(pos + header + len);
            if value.end > data.len() {
                return Err(TagError::Format(format!(
                    "TLV {:02X} overruns data area",
                    tag
                )));
            }

            if tag == TLV_NDEF {
                return Ok(TlvScan::Ndef { offset: pos, value });
            }

            log::debug!("skip TLV {:02X}: {} bytes", tag, len);
            pos = value.end;
            free = pos;
        }

        Ok(TlvScan::Absent { offset: free })
    }

    /// Returns value length and full header size (tag + length field)
    fn read_tlv_len(data: &[u8], pos: usize) -> Result<(usize, usize), TagError> {
        let truncated = || TagError::Format(format!("truncated TLV length"));

        let first = *data.get(pos).ok_or_else(truncated)?;
        if first == TLV_LONG_LENGTH {
            let raw = data.get((pos + 1)..(pos + 3)).ok_or_else(truncated)?;
            Ok((BigEndian::read_u16(raw) as usize, 4))
        } else {
            Ok((first as usize, 2))
        }
    }

    fn encode_ndef_tlv(message: &[u8]) -> Result<Vec<u8>, TagError> {
        let mut tlv = vec![TLV_NDEF];

        if message.len() < TLV_LONG_LENGTH as usize {
            tlv.push(message.len() as u8);
        } else if message.len() < 0xFFFF {
            let mut len = [0; 2];
            BigEndian::write_u16(&mut len, message.len() as u16);
            tlv.push(TLV_LONG_LENGTH);
            tlv.extend_from_slice(&len);
        } else {
            return Err(TagError::Format(format!(
                "message of {} bytes is too long for a TLV",
                message.len()
            )));
        }

        tlv.extend_from_slice(message);
        Ok(tlv)
    }
}

impl<TBlockChannel> NdefTag for Type2Tag<TBlockChannel>
where
    TBlockChannel: BlockChannel,
{
    fn connect(&mut self) -> Result<(), TagError> {
        let raw = self.channel.read(CC_PAGE)?;
        let cc = CapabilityContainer::from_raw(&raw[0..PAGE_SIZE])?;

        log::debug!(
            "type 2 tag: {} bytes data area, writable: {}",
            cc.data_size,
            cc.writable
        );

        self.cc = Some(cc);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.cc.is_some()
    }

    fn read_records(&mut self) -> Result<Vec<NdefRecord>, TagError> {
        let cc = self.cc()?;
        let data = self.read_data_area(cc.data_size)?;

        match Self::scan_tlvs(&data)? {
            TlvScan::Ndef { value, .. } if !value.is_empty() => {
                Ok(NdefMessage::from_vec(&data[value])?.into_records())
            }
            _ => Ok(vec![]),
        }
    }

    fn write_records(&mut self, records: &[NdefRecord]) -> Result<(), TagError> {
        let cc = self.cc()?;
        if !cc.writable {
            return Err(TagError::Transport(format!("tag is read-only")));
        }

        let message = NdefMessage::from_records(records.to_vec())?;
        let mut data = self.read_data_area(cc.data_size)?;

        let offset = match Self::scan_tlvs(&data)? {
            TlvScan::Ndef { offset, .. } => offset,
            TlvScan::Absent { offset } => offset,
        };

        let mut tlv = Self::encode_ndef_tlv(&message.to_vec())?;
        if offset + tlv.len() > data.len() {
            return Err(TagError::Transport(format!(
                "message of {} bytes exceeds {} bytes of tag memory",
                message.byte_len(),
                data.len() - offset
            )));
        }
        if offset + tlv.len() < data.len() {
            tlv.push(TLV_TERMINATOR);
        }

        let end = offset + tlv.len();
        data[offset..end].copy_from_slice(&tlv);

        for page in (offset / PAGE_SIZE)..=((end - 1) / PAGE_SIZE) {
            let mut raw = [0; PAGE_SIZE];
            raw.copy_from_slice(&data[(page * PAGE_SIZE)..((page + 1) * PAGE_SIZE)]);
            self.channel.write(DATA_PAGE + page as u8, &raw)?;
        }

        Ok(())
    }

    fn close(&mut self) -> Result<(), TagError> {
        self.cc = None;
        Ok(())
    }
}
